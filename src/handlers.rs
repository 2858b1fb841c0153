use crate::{
    auth::CurrentSession,
    guard::{self, AccessPolicy, Decision},
    models::{
        DenialView, EvaluateRequest, EvaluateResponse, LoadingView, NotFoundView, Page, PageView,
        RouteSummary, SessionState,
    },
    route_table::{RouteEntry, RouteTable},
};
use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// RouteTableState
///
/// The shared, read-only route table.
pub type RouteTableState = Arc<RouteTable>;

// --- Decision Mapping ---

/// decision_response
///
/// Turns a guard decision into the HTTP response for a page request:
/// render → 200 `PageView`, redirect → 303, denial → 403 `DenialView`,
/// loading → 202 `LoadingView` with `Retry-After`.
pub fn decision_response(
    path: &str,
    page: Page,
    session: SessionState,
    decision: Decision,
) -> Response {
    match decision {
        Decision::RenderComponent => Json(PageView {
            path: path.to_string(),
            page,
            user: session.user,
        })
        .into_response(),
        Decision::RedirectTo { path } => Redirect::to(&path).into_response(),
        Decision::RenderDenialView {
            message,
            allowed_roles,
        } => (
            StatusCode::FORBIDDEN,
            Json(DenialView {
                message,
                allowed_roles,
            }),
        )
            .into_response(),
        Decision::ShowLoadingIndicator => (
            StatusCode::ACCEPTED,
            [(header::RETRY_AFTER, "1")],
            Json(LoadingView { loading: true }),
        )
            .into_response(),
    }
}

// --- Handlers ---

/// render_page
///
/// [Guarded Page] Shared handler mounted once per route-table entry. The entry is
/// attached to each route as an `Extension`, so a single function serves the
/// whole table.
pub async fn render_page(
    Extension(entry): Extension<Arc<RouteEntry>>,
    CurrentSession(session): CurrentSession,
    uri: Uri,
) -> Response {
    let decision = guard::evaluate(&entry.policy, &session);

    tracing::info!(
        route = %entry.path,
        page = ?entry.page,
        role = ?session.user.as_ref().map(|user| user.role),
        decision = ?decision,
        "guard decision"
    );

    decision_response(uri.path(), entry.page, session, decision)
}

/// list_routes
///
/// [Public Route] Lists the registered page routes and their access policies.
#[utoipa::path(
    get,
    path = "/api/routes",
    responses((status = 200, description = "Route table", body = [RouteSummary]))
)]
pub async fn list_routes(State(routes): State<RouteTableState>) -> Json<Vec<RouteSummary>> {
    Json(routes.summaries())
}

/// evaluate_route
///
/// [Public Route] Evaluates the guard for a path against an explicitly supplied
/// session. This is what the client-rendered router calls on every navigation or
/// session change.
#[utoipa::path(
    post,
    path = "/api/guard/evaluate",
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "Decision", body = EvaluateResponse),
        (status = 404, description = "No route matches the path")
    )
)]
pub async fn evaluate_route(
    State(routes): State<RouteTableState>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, StatusCode> {
    let Some(entry) = routes.find(&payload.path) else {
        tracing::debug!(path = %payload.path, "no route for evaluated path");
        return Err(StatusCode::NOT_FOUND);
    };

    let decision = guard::evaluate(&entry.policy, &payload.session);

    Ok(Json(EvaluateResponse {
        path: payload.path,
        page: entry.page,
        decision,
    }))
}

/// get_session
///
/// [Public Route] Returns the session resolved from the request's credentials.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Current session", body = SessionState))
)]
pub async fn get_session(CurrentSession(session): CurrentSession) -> Json<SessionState> {
    Json(session)
}

/// go_to_dashboard
///
/// [Authenticated Page] Sends a signed-in user to their role's dashboard. Anonymous
/// and still-loading sessions get the same treatment as any authenticated page.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 303, description = "Redirect to the role dashboard or to login"),
        (status = 202, description = "Session still loading", body = LoadingView)
    )
)]
pub async fn go_to_dashboard(CurrentSession(session): CurrentSession) -> Response {
    match guard::evaluate(&AccessPolicy::Authenticated, &session) {
        Decision::RenderComponent => match session.user.as_ref() {
            Some(user) => Redirect::to(user.role.dashboard_path()).into_response(),
            None => Redirect::to(guard::LOGIN_PATH).into_response(),
        },
        decision => decision_response("/dashboard", Page::Landing, session, decision),
    }
}

/// page_not_found
///
/// Fallback for any path outside the route table.
pub async fn page_not_found(uri: Uri) -> (StatusCode, Json<NotFoundView>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundView {
            path: uri.path().to_string(),
            message: "The page you are looking for does not exist.".to_string(),
        }),
    )
}
