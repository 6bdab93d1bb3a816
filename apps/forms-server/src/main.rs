//! Forms server
//!
//! Serves the administrative forms of the local animal and plant health
//! unit in the browser and turns them into printable PDFs:
//!
//! - Timesheets (inmate, activity report, SUGESP) with calendar-aware rows
//! - Vehicle usage log
//! - Installment and restitution requests, clearance declaration
//!
//! Filled values live in an in-memory session keyed by a cookie. The same
//! renderers are exposed as a JSON API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use form_engine::Assets;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod pages;
mod state;
mod ui;
#[cfg(test)]
mod tests;

use api::{
    handle_discounts, handle_health, handle_import, handle_list_forms, handle_parse_holidays,
    handle_plan, handle_render_pdf, handle_render_preview,
};
use state::{AppState, SharedState};
use ui::{handle_download, handle_form_page, handle_import_upload, handle_index, handle_submit_form};

/// Command-line arguments for the forms server
#[derive(Parser, Debug)]
#[command(name = "forms-server")]
#[command(about = "Fill administrative forms in the browser and download them as PDF")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory holding the logo images
    #[arg(long, default_value = "assets")]
    assets_dir: String,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Largest accepted upload in megabytes
    #[arg(long, default_value = "10")]
    max_upload_mb: usize,

    /// Minutes without activity before a session is dropped
    #[arg(long, default_value = "120")]
    session_idle_minutes: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Routes shared by the binary and the tests; rate limiting and CORS are
/// added in `main`
pub fn app_router(state: SharedState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Browser UI
        .route("/", get(handle_index))
        .route("/forms/:kind", get(handle_form_page).post(handle_submit_form))
        .route("/forms/:kind/download", get(handle_download))
        .route("/forms/:kind/import", post(handle_import_upload))
        // API endpoints
        .route("/api/forms", get(handle_list_forms))
        .route("/api/forms/:kind/pdf", post(handle_render_pdf))
        .route("/api/forms/:kind/preview", post(handle_render_preview))
        .route("/api/import/:kind", post(handle_import))
        .route("/api/installments/discounts", get(handle_discounts))
        .route("/api/installments/plan", post(handle_plan))
        .route("/api/holidays/parse", post(handle_parse_holidays))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting forms server on {}:{}", args.host, args.port);

    let assets = Assets::load(&args.assets_dir);
    if assets.loaded_count() == 0 {
        warn!(dir = %args.assets_dir, "No logos found; documents will print without them");
    }

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.max(1).into())
            .burst_size(args.rate_limit.max(1) * 2)
            .finish()
            .ok_or_else(|| anyhow!("Invalid rate limit: {}", args.rate_limit))?,
    );

    let state = Arc::new(
        AppState::new(assets, args.max_upload_mb * 1024 * 1024)
            .with_session_idle(Duration::from_secs(args.session_idle_minutes * 60)),
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = app_router(state).layer(
        ServiceBuilder::new()
            .layer(cors)
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Upload limit: {} MB", args.max_upload_mb);
    info!("Session idle timeout: {} minutes", args.session_idle_minutes);

    // The rate limiter keys on the peer address
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
