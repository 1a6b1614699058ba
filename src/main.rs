use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use linksnap::api::routes::create_api_router;
use linksnap::auth::AuthService;
use linksnap::config::Config;
use linksnap::insights::InsightsService;
use linksnap::redirect::routes::create_redirect_router;
use linksnap::seed::seed_demo_data;
use linksnap::storage::{MemoryStore, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let store = Arc::new(MemoryStore::new());
    if config.seed_demo_data {
        let seeded = seed_demo_data(&store, chrono::Utc::now(), rand::random::<u64>(), None)?;
        info!("🌱 Seeded {} demo URLs", seeded);
    }
    let storage: Arc<dyn Storage> = store;

    // Initialize auth and the optional insights proxy
    let auth_service = Arc::new(AuthService::new(&config.auth));
    let insights = InsightsService::from_config(&config.insights)?.map(Arc::new);
    match &insights {
        Some(_) => info!("🤖 AI insights enabled"),
        None => info!("AI insights disabled (INSIGHTS_API_URL not set)"),
    }

    // Create routers
    let api_router = create_api_router(
        Arc::clone(&storage),
        auth_service,
        insights,
        config.public_base_url.clone(),
    );
    let redirect_router = create_redirect_router(Arc::clone(&storage));

    // Start API server
    let api_addr = config.api_server.bind_addr();
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API server to {api_addr}"))?;
    info!("🚀 API server listening on http://{}", api_addr);
    info!("   - API endpoints available at http://{}/api/...", api_addr);

    // Start redirect server
    let redirect_addr = config.redirect_server.bind_addr();
    let redirect_listener = tokio::net::TcpListener::bind(&redirect_addr)
        .await
        .with_context(|| format!("failed to bind redirect server to {redirect_addr}"))?;
    info!("🔗 Redirect server listening on http://{}", redirect_addr);

    // Run both servers concurrently
    tokio::try_join!(
        axum::serve(api_listener, api_router),
        axum::serve(redirect_listener, redirect_router),
    )?;

    Ok(())
}
