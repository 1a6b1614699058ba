//! LinkSnap: a URL shortener demo with click analytics.
//!
//! The interesting part lives in [`analytics`]: pure aggregation of raw
//! click events into the bucketed reports the admin dashboard renders.
//! Everything else is the service around it: an in-memory [`storage`]
//! backend behind a trait, the [`api`] and [`redirect`] routers, admin
//! [`auth`], the AI [`insights`] proxy and the demo [`seed`] data.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod insights;
pub mod models;
pub mod redirect;
pub mod seed;
pub mod storage;
