//! Signed session tokens.
//!
//! A token is a base64url JSON claims payload and an HMAC-SHA256 tag over
//! it, joined by a dot. Verification recomputes the tag, compares it in
//! constant time and then checks expiry. Nothing is stored server-side,
//! so a token stays valid until it expires or the signing key changes.

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Email the session was issued for.
    pub sub: String,
    /// Issue time, Unix seconds.
    pub iat: i64,
    /// Expiry time, Unix seconds.
    pub exp: i64,
}

pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    /// Build a signer from the configured secret. Without one, a random
    /// per-process key is generated and sessions die with the process.
    pub fn new(secret: Option<&str>) -> Self {
        let key = match secret {
            Some(secret) if !secret.is_empty() => secret.as_bytes().to_vec(),
            _ => {
                let mut key = vec![0u8; 32];
                rand::rng().fill(&mut key[..]);
                key
            }
        };
        Self { key }
    }

    /// Issue a token for `email` that expires `ttl` after `now`.
    pub fn issue(
        &self,
        email: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>)> {
        let expires_at = now + ttl;
        let claims = SessionClaims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let tag = self.sign(payload.as_bytes())?;
        Ok((format!("{payload}.{tag}"), expires_at))
    }

    /// Verify a token and return its claims when the tag matches and the
    /// token has not expired at `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Option<SessionClaims> {
        let (payload, tag) = token.split_once('.')?;
        let expected = self.sign(payload.as_bytes()).ok()?;
        if !bool::from(expected.as_bytes().ct_eq(tag.as_bytes())) {
            return None;
        }

        let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: SessionClaims = serde_json::from_slice(&decoded).ok()?;
        if claims.exp < now.timestamp() {
            return None;
        }
        Some(claims)
    }

    fn sign(&self, payload: &[u8]) -> Result<String> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).context("failed to initialize HMAC key")?;
        mac.update(payload);
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }
}
