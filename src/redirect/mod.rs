//! Public redirect server: resolves short codes and records click events.

pub mod handlers;
pub mod routes;
