use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::auth::{auth_middleware, AuthService};
use crate::insights::InsightsService;
use crate::storage::Storage;

use super::analytics::{get_site_stats, get_url_stats};
use super::handlers::{health_check, list_urls, login, shorten_url, AppState};
use super::insights::generate_insights;

pub fn create_api_router(
    storage: Arc<dyn Storage>,
    auth_service: Arc<AuthService>,
    insights: Option<Arc<InsightsService>>,
    public_base_url: String,
) -> Router {
    let state = Arc::new(AppState {
        storage,
        auth: Arc::clone(&auth_service),
        insights,
        public_base_url,
    });

    // Everything the admin dashboard reads sits behind the session check.
    let protected = Router::new()
        .route("/api/urls", get(list_urls))
        .route("/api/analytics", get(get_site_stats))
        .route("/api/analytics/{code}", get(get_url_stats))
        .route("/api/ai/insights", post(generate_insights))
        .route_layer(middleware::from_fn(
            move |headers: HeaderMap, request: Request, next: Next| {
                auth_middleware(Arc::clone(&auth_service), headers, request, next)
            },
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/shorten", post(shorten_url))
        .route("/api/auth/login", post(login))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
