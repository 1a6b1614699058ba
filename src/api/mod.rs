//! Admin API server: shortening, listing, analytics, auth and insights.

pub mod analytics;
pub mod handlers;
pub mod insights;
pub mod routes;
