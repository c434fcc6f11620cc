use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::auth::middleware::auth_context;
use crate::pages;
use crate::posts;
use crate::registration;
use crate::state::AppState;
use crate::uploads;
use crate::ws::handler as ws_handler;

/// Request-logging middleware: method, path, and resulting status.
async fn log_request(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    tracing::info!(%method, %path, status = %response.status(), "request");
    response
}

/// Build the full axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Server-rendered pages
    let page_routes = Router::new()
        .route("/", get(pages::index_page))
        .route("/chat", get(pages::chat_page));

    // Registration: HTML form and JSON API variants
    let user_routes = Router::new()
        .route("/register", post(registration::register_form))
        .route("/api/register", post(registration::register_api));

    // Authenticated post creation
    let post_routes = Router::new().route("/api/posts", post(posts::create_post));

    // File uploads (multipart in, static serving out)
    let upload_routes = Router::new().route("/api/uploads", post(uploads::upload_files));

    // WebSocket endpoint onto the broadcast relay
    let ws_routes = Router::new().route("/ws", get(ws_handler::ws_upgrade));

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(page_routes)
        .merge(user_routes)
        .merge(post_routes)
        .merge(upload_routes)
        .merge(ws_routes)
        .merge(health)
        .nest_service("/uploads", ServeDir::new(&state.uploads_dir))
        // Static files from the public directory are the catch-all fallback
        .fallback_service(ServeDir::new(&state.public_dir))
        .layer(middleware::from_fn_with_state(state.clone(), auth_context))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Basic health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
