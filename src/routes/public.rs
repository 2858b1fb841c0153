use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that never require a session. The guard evaluation endpoint takes
/// the session in its body rather than from credentials, so it is public too.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /api/routes
        // The registered page routes with their access policies.
        .route("/api/routes", get(handlers::list_routes))
        // POST /api/guard/evaluate
        // Decision for {path, session}; 404 when the path has no route.
        .route("/api/guard/evaluate", post(handlers::evaluate_route))
        // GET /api/session
        // The session the server resolves from this request's credentials.
        .route("/api/session", get(handlers::get_session))
}
