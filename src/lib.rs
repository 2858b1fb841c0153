use axum::{Router, extract::FromRef, http::HeaderName};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::{Layer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod route_table;

// Module for routing segregation (Public API, Guarded Pages).
pub mod routes;
use routes::{pages, public};

// --- Public Re-exports ---

pub use auth::{JwtSessionProvider, MockSessionProvider, SessionProviderState};
pub use config::AppConfig;
pub use guard::{AccessPolicy, Decision, evaluate};
pub use handlers::RouteTableState;
pub use route_table::{RouteTable, lms_route_table};

/// ApiDoc
///
/// OpenAPI document for the JSON API, served at `/api-docs/openapi.json`.
/// Page routes are generated from the route table and listed by `/api/routes`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_routes, handlers::evaluate_route, handlers::get_session,
        handlers::go_to_dashboard
    ),
    components(
        schemas(
            models::Role, models::EducationLevel, models::SessionUser, models::SessionState,
            models::Page, models::PageView, models::DenialView, models::LoadingView,
            models::RouteSummary, models::EvaluateRequest, models::EvaluateResponse,
            models::NotFoundView, guard::AccessPolicy, guard::Decision,
        )
    ),
    tags(
        (name = "lms-route-guard", description = "LMS role and education-level route guard")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable container shared by every request: the session
/// provider and the route table. Configuration is consumed while building it.
#[derive(Clone)]
pub struct AppState {
    /// Auth State Provider: resolves request credentials into a session.
    pub sessions: SessionProviderState,
    /// The guarded route table.
    pub routes: RouteTableState,
}

impl AppState {
    /// Builds the state with the JWT provider for `config` and the given table.
    pub fn new(config: AppConfig, table: RouteTable) -> Self {
        Self {
            sessions: Arc::new(JwtSessionProvider::new(&config)),
            routes: Arc::new(table),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionProviderState {
    fn from_ref(app_state: &AppState) -> SessionProviderState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for RouteTableState {
    fn from_ref(app_state: &AppState) -> RouteTableState {
        app_state.routes.clone()
    }
}

/// create_router
///
/// Assembles the API routes, the guarded page routes generated from the state's
/// route table, and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let app_router: Router = Router::new()
        .merge(public::public_routes())
        // Every page route is evaluated by the guard inside `render_page`.
        .merge(pages::page_routes(&state.routes))
        .fallback(handlers::page_not_found)
        .with_state(state);

    // Trailing slashes are trimmed before routing, the same way
    // `RouteTable::find` reads a path. Swagger UI stays outside: it serves
    // `/swagger-ui/` and redirects the bare path there.
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(NormalizePathLayer::trim_trailing_slash().layer(app_router));

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for each request carrying method, URI and the `x-request-id` set above,
/// so every log line of a request is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
