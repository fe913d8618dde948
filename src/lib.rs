//! Backend for Clean Connect, a community issue and contribution tracker.
//!
//! # General Infrastructure
//! - SvelteKit/React frontend talks to this backend over JSON
//! - Backend talks to a hosted MongoDB cluster (Atlas), one client for the
//!   whole process lifetime
//! - Every route handler is one database call: parse the request, build a
//!   filter or update document, run the operation, echo the raw result
//! - No in-process state besides the shared client, so nothing to lock
//!
//! # Collections
//! - `issues`: reported problems, arbitrary caller fields plus `email`,
//!   `category`, `status`, `date`
//! - `contributions`: submissions pointing at an issue via `issueId` (weak
//!   reference, nothing enforces it)
//! - `users`: keyed by `email`, upserted on login, `role` is `user` or
//!   `admin`
//!
//! # Setup
//!
//! Run locally against the cluster.
//! ```sh
//! MONGODB_PASSWORD=... cargo run
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, patch, post},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod contributions;
pub mod database;
pub mod error;
pub mod issues;
pub mod state;
pub mod users;
pub mod utils;

use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = router(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route(
            "/issues",
            get(issues::list_issues_handler).post(issues::create_issue_handler),
        )
        .route(
            "/issues/{id}",
            get(issues::issue_details_handler)
                .put(issues::update_issue_handler)
                .delete(issues::delete_issue_handler),
        )
        .route("/my-issues/{email}", get(issues::my_issues_handler))
        .route("/latest-issues", get(issues::latest_issues_handler))
        .route(
            "/contributions",
            get(contributions::list_contributions_handler)
                .post(contributions::create_contribution_handler),
        )
        .route(
            "/contributions-by-issue",
            get(contributions::contributions_by_issue_handler),
        )
        .route("/user-role/{email}", get(users::user_role_handler))
        .route("/save-user", post(users::save_user_handler))
        .route("/make-admin/{email}", patch(users::make_admin_handler))
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "Clean Connect server is up and running!"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
