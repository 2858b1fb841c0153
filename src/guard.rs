//! Access decisions for page routes.
//!
//! `evaluate` is a pure function of an [`AccessPolicy`] and the current
//! [`SessionState`]. It never fails: every unauthorized attempt resolves to a
//! redirect or a denial view, and a session that is still resolving suspends
//! rendering behind a loading indicator.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::{EducationLevel, Role, SessionState};

/// Where anonymous visitors are sent.
pub const LOGIN_PATH: &str = "/auth";
/// Where students without the required education level are sent.
pub const CAREER_GUIDANCE_PATH: &str = "/career-guidance";
/// Where non-students hitting an education-level page are sent.
pub const HOME_PATH: &str = "/";

/// AccessPolicy
///
/// The access predicate attached to a route when the route table is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum AccessPolicy {
    /// No authentication required.
    Public,
    /// Any signed-in user.
    Authenticated,
    /// Signed-in users whose role is in `allowed`.
    Roles { allowed: Vec<Role> },
    /// Students whose current education level is in `allowed`.
    EducationLevels { allowed: Vec<EducationLevel> },
}

impl AccessPolicy {
    pub fn roles(allowed: impl IntoIterator<Item = Role>) -> Self {
        AccessPolicy::Roles {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn education_levels(allowed: impl IntoIterator<Item = EducationLevel>) -> Self {
        AccessPolicy::EducationLevels {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn requires_authentication(&self) -> bool {
        !matches!(self, AccessPolicy::Public)
    }
}

/// Decision
///
/// Exactly one of these is produced per evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Decision {
    ShowLoadingIndicator,
    RenderComponent,
    RedirectTo { path: String },
    RenderDenialView { message: String, allowed_roles: Vec<Role> },
}

impl Decision {
    fn redirect(path: &str) -> Self {
        Decision::RedirectTo {
            path: path.to_string(),
        }
    }
}

/// GuardState
///
/// Classification of one evaluation. Re-computed on every navigation or session
/// change, so none of these is terminal beyond the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Unauthenticated,
    Unrestricted,
    AuthorizedRoleOnly,
    AuthorizedEducationLevel,
    DeniedRole,
    DeniedEducationLevel { is_student: bool },
}

/// assess
///
/// Walks the policy against the session and reports which state the route is in.
pub fn assess(policy: &AccessPolicy, session: &SessionState) -> GuardState {
    if session.is_loading {
        return GuardState::Loading;
    }

    if !policy.requires_authentication() {
        return GuardState::Unrestricted;
    }

    let Some(user) = session.user.as_ref() else {
        return GuardState::Unauthenticated;
    };

    match policy {
        AccessPolicy::Public | AccessPolicy::Authenticated => GuardState::AuthorizedRoleOnly,
        AccessPolicy::Roles { allowed } => {
            if allowed.contains(&user.role) {
                GuardState::AuthorizedRoleOnly
            } else {
                GuardState::DeniedRole
            }
        }
        AccessPolicy::EducationLevels { allowed } => {
            if user.role != Role::Student {
                return GuardState::DeniedEducationLevel { is_student: false };
            }
            match user.current_education_level {
                Some(level) if allowed.contains(&level) => GuardState::AuthorizedEducationLevel,
                _ => GuardState::DeniedEducationLevel { is_student: true },
            }
        }
    }
}

/// evaluate
///
/// Decides what the router should do for `policy` given the current session.
pub fn evaluate(policy: &AccessPolicy, session: &SessionState) -> Decision {
    match assess(policy, session) {
        GuardState::Loading => Decision::ShowLoadingIndicator,
        GuardState::Unauthenticated => Decision::redirect(LOGIN_PATH),
        GuardState::Unrestricted
        | GuardState::AuthorizedRoleOnly
        | GuardState::AuthorizedEducationLevel => Decision::RenderComponent,
        GuardState::DeniedRole => {
            let allowed_roles = match policy {
                AccessPolicy::Roles { allowed } => allowed.clone(),
                _ => Vec::new(),
            };
            Decision::RenderDenialView {
                message: denial_message(&allowed_roles),
                allowed_roles,
            }
        }
        GuardState::DeniedEducationLevel { is_student: true } => {
            Decision::redirect(CAREER_GUIDANCE_PATH)
        }
        GuardState::DeniedEducationLevel { is_student: false } => Decision::redirect(HOME_PATH),
    }
}

/// denial_message
///
/// Text of the denial view. Names every permitted role, in policy order.
pub fn denial_message(allowed: &[Role]) -> String {
    if allowed.is_empty() {
        return "Access denied. No role is permitted to view this page.".to_string();
    }

    let names = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Access denied. This page is only available to: {}.", names)
}
