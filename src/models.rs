use serde::{
    Deserialize, Serialize,
    de::{IntoDeserializer, value::StrDeserializer},
};
use std::fmt;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::guard::{AccessPolicy, Decision};

// --- Identity Enums ---

/// Role
///
/// The fixed set of user categories recognised by the LMS. Baseline page access
/// is decided from this value alone; education level only refines it for students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Student,
    Instructor,
    Admin,
    Employer,
    UniversityAdmin,
    MinistryOfficial,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Student,
        Role::Instructor,
        Role::Admin,
        Role::Employer,
        Role::UniversityAdmin,
        Role::MinistryOfficial,
    ];

    /// The wire name, as stored in the auth provider's profile record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
            Role::Employer => "employer",
            Role::UniversityAdmin => "university_admin",
            Role::MinistryOfficial => "ministry_official",
        }
    }

    /// dashboard_path
    ///
    /// The landing dashboard each role is sent to after signing in (GET /dashboard).
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Student => "/student/dashboard",
            Role::Instructor => "/instructor/dashboard",
            Role::Admin => "/admin/dashboard",
            Role::Employer => "/employer/dashboard",
            Role::UniversityAdmin => "/university-admin/dashboard",
            Role::MinistryOfficial => "/ministry/dashboard",
        }
    }

    /// Parses the wire name. Unknown strings yield `None` rather than a default role.
    pub fn parse(value: &str) -> Option<Role> {
        parse_wire_name(value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// EducationLevel
///
/// A student-only attribute gating access to level-specific subject-selection pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EducationLevel {
    OLevel,
    ALevel,
    Undergraduate,
    Postgraduate,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 4] = [
        EducationLevel::OLevel,
        EducationLevel::ALevel,
        EducationLevel::Undergraduate,
        EducationLevel::Postgraduate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::OLevel => "o_level",
            EducationLevel::ALevel => "a_level",
            EducationLevel::Undergraduate => "undergraduate",
            EducationLevel::Postgraduate => "postgraduate",
        }
    }

    pub fn parse(value: &str) -> Option<EducationLevel> {
        parse_wire_name(value)
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads a unit enum variant through its serde representation, so header
/// values and JSON bodies accept exactly the same names.
fn parse_wire_name<'de, T: Deserialize<'de>>(value: &'de str) -> Option<T> {
    let deserializer: StrDeserializer<'de, serde::de::value::Error> = value.into_deserializer();
    T::deserialize(deserializer).ok()
}

// --- Session Schemas (Supplied by the Auth State Provider) ---

/// SessionUser
///
/// The identity resolved by the auth provider for the current request.
/// The guard treats it as read-only input; it is never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    // Only meaningful for students; other roles normally carry `None`.
    #[serde(default)]
    pub current_education_level: Option<EducationLevel>,
}

impl SessionUser {
    pub fn new(role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: None,
            role,
            current_education_level: None,
        }
    }

    pub fn student(level: Option<EducationLevel>) -> Self {
        Self {
            current_education_level: level,
            ..Self::new(Role::Student)
        }
    }
}

/// SessionState
///
/// Snapshot of the auth provider: either still resolving (`is_loading`), resolved
/// without a user (anonymous), or resolved with a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionState {
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl SessionState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            user: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            is_loading: false,
            user: Some(user),
        }
    }
}

// --- Page Components ---

/// Page
///
/// Reference to the client-rendered component a route resolves to. The components
/// themselves live in the front end; the server only names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Page {
    Landing,
    Auth,
    CareerGuidance,
    CourseCatalog,
    CourseDetail,
    Profile,
    StudentDashboard,
    InstructorDashboard,
    AdminDashboard,
    EmployerDashboard,
    UniversityAdminDashboard,
    MinistryDashboard,
    CourseManagement,
    OLevelSubjects,
    ALevelSubjects,
    JobPostings,
    JobBoard,
}

// --- Response Payloads (Output Schemas) ---

/// PageView
///
/// Body returned when the guard decides to render: tells the client which
/// component to mount and who it is mounted for.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageView {
    pub path: String,
    pub page: Page,
    pub user: Option<SessionUser>,
}

/// DenialView
///
/// Body of the in-place "access denied" view (HTTP 403).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DenialView {
    pub message: String,
    pub allowed_roles: Vec<Role>,
}

/// LoadingView
///
/// Body returned while the session is still resolving (HTTP 202).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoadingView {
    pub loading: bool,
}

/// RouteSummary
///
/// One row of the registered route table (GET /api/routes).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RouteSummary {
    pub path: String,
    pub page: Page,
    pub policy: AccessPolicy,
}

/// --- Request Payloads (Input Schemas) ---

/// EvaluateRequest
///
/// Input for POST /api/guard/evaluate. The session is supplied explicitly so the
/// client can ask for a decision against its own auth state.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct EvaluateRequest {
    pub path: String,
    #[serde(default)]
    pub session: SessionState,
}

/// EvaluateResponse
///
/// The matched route and the guard's decision for it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct EvaluateResponse {
    pub path: String,
    pub page: Page,
    pub decision: Decision,
}

/// NotFoundView
///
/// Body for page paths with no registered route.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NotFoundView {
    pub path: String,
    pub message: String,
}
