use crate::{AppState, handlers, route_table::RouteTable};
use axum::{Extension, Router, routing::get};
use std::sync::Arc;

/// Page Router Module
///
/// Mounts every route-table entry as a `GET` endpoint served by the shared
/// `render_page` handler. Each entry rides along as an `Extension`, so adding a
/// page is a table change, not a new handler.
pub fn page_routes(table: &RouteTable) -> Router<AppState> {
    let router = table
        .entries()
        .iter()
        .fold(Router::new(), |router, entry| {
            router.route(
                &entry.path,
                get(handlers::render_page).layer(Extension(Arc::new(entry.clone()))),
            )
        });

    router
        // GET /dashboard
        // Redirects a signed-in user to their role's dashboard.
        .route("/dashboard", get(handlers::go_to_dashboard))
}
