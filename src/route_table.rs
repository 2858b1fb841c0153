//! The declarative route table: which page each path renders and the policy
//! guarding it. Built once at startup and shared read-only.

use crate::{
    guard::AccessPolicy,
    models::{EducationLevel, Page, Role, RouteSummary},
};

/// RouteEntry
///
/// One guarded route registration. `path` uses axum's `{param}` syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub path: String,
    pub page: Page,
    pub policy: AccessPolicy,
}

impl RouteEntry {
    /// Whether a concrete request path (e.g. `/courses/42`) matches this entry.
    pub fn matches(&self, path: &str) -> bool {
        let pattern = segments(&self.path);
        let candidate = segments(path);

        pattern.len() == candidate.len()
            && pattern.iter().zip(&candidate).all(|(expected, actual)| {
                (is_param(expected) && !actual.is_empty()) || expected == actual
            })
    }

    /// Whether `path` would occupy the same router slot, i.e. equal literal
    /// segments and parameters in the same positions whatever their names.
    fn same_shape(&self, path: &str) -> bool {
        let ours = segments(&self.path);
        let theirs = segments(path);

        ours.len() == theirs.len()
            && ours.iter().zip(&theirs).all(|(a, b)| {
                (is_param(a) && is_param(b)) || (!is_param(a) && !is_param(b) && a == b)
            })
    }

    fn is_literal(&self) -> bool {
        !segments(&self.path).iter().any(|segment| is_param(segment))
    }
}

/// Fixed endpoints mounted next to the table. Entries may not claim them.
pub const RESERVED_PATHS: [&str; 2] = ["/dashboard", "/health"];

/// First segments owned by the JSON API and its documentation.
pub const RESERVED_PREFIXES: [&str; 3] = ["api", "api-docs", "swagger-ui"];

/// Whether `path` belongs to an endpoint the router mounts outside the table.
pub fn is_reserved(path: &str) -> bool {
    let path = canonical(path);
    RESERVED_PATHS.contains(&path.as_str())
        || segments(&path)
            .first()
            .is_some_and(|first| RESERVED_PREFIXES.contains(first))
}

/// Query and fragment dropped, outer slashes trimmed to the single leading one
/// the router sees once trailing slashes are normalised.
fn canonical(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    format!("/{}", path.trim_matches('/'))
}

fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Vec::new();
    }
    // Inner empty segments are kept: `/a//b` is not `/a/b` to the router either.
    path.split('/').collect()
}

fn is_param(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// RouteTable
///
/// Ordered collection of [`RouteEntry`]. Registering a path with the same shape
/// as an existing one (`/courses/{id}` and `/courses/{slug}` included) replaces
/// the earlier entry, so a path always maps to exactly one policy.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// register
    ///
    /// Adds a guarded route. Chainable so tables read as a declaration.
    /// Reserved paths (see [`is_reserved`]) are skipped with a warning.
    pub fn register(mut self, path: &str, page: Page, policy: AccessPolicy) -> Self {
        let path = canonical(path);
        if is_reserved(&path) {
            tracing::warn!(path = %path, ?page, "path is reserved, route not registered");
            return self;
        }

        let entry = RouteEntry { path, page, policy };
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.same_shape(&entry.path))
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    pub fn public(self, path: &str, page: Page) -> Self {
        self.register(path, page, AccessPolicy::Public)
    }

    pub fn authenticated(self, path: &str, page: Page) -> Self {
        self.register(path, page, AccessPolicy::Authenticated)
    }

    pub fn with_roles(self, path: &str, page: Page, roles: impl IntoIterator<Item = Role>) -> Self {
        self.register(path, page, AccessPolicy::roles(roles))
    }

    pub fn with_education_levels(
        self,
        path: &str,
        page: Page,
        levels: impl IntoIterator<Item = EducationLevel>,
    ) -> Self {
        self.register(path, page, AccessPolicy::education_levels(levels))
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// find
    ///
    /// Resolves a concrete path to its entry. Literal routes win over
    /// parameterised ones, so `/courses/new` beats `/courses/{id}`.
    pub fn find(&self, path: &str) -> Option<&RouteEntry> {
        let mut matching = self.entries.iter().filter(|entry| entry.matches(path));
        let first = matching.next()?;
        if first.is_literal() {
            return Some(first);
        }
        matching.find(|entry| entry.is_literal()).or(Some(first))
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.entries
            .iter()
            .map(|entry| RouteSummary {
                path: entry.path.clone(),
                page: entry.page,
                policy: entry.policy.clone(),
            })
            .collect()
    }
}

/// lms_route_table
///
/// The LMS page routes and their access policies.
pub fn lms_route_table() -> RouteTable {
    RouteTable::new()
        // --- Open pages ---
        .public("/", Page::Landing)
        .public("/auth", Page::Auth)
        .public("/courses", Page::CourseCatalog)
        .public("/courses/{id}", Page::CourseDetail)
        // --- Any signed-in user ---
        .authenticated("/profile", Page::Profile)
        .authenticated("/career-guidance", Page::CareerGuidance)
        // --- Role dashboards ---
        .with_roles("/student/dashboard", Page::StudentDashboard, [Role::Student])
        .with_roles(
            "/instructor/dashboard",
            Page::InstructorDashboard,
            [Role::Instructor],
        )
        .with_roles("/admin/dashboard", Page::AdminDashboard, [Role::Admin])
        .with_roles("/employer/dashboard", Page::EmployerDashboard, [Role::Employer])
        .with_roles(
            "/university-admin/dashboard",
            Page::UniversityAdminDashboard,
            [Role::UniversityAdmin],
        )
        .with_roles(
            "/ministry/dashboard",
            Page::MinistryDashboard,
            [Role::MinistryOfficial],
        )
        // --- Shared role pages ---
        .with_roles(
            "/instructor/courses",
            Page::CourseManagement,
            [Role::Instructor, Role::Admin],
        )
        .with_roles(
            "/employer/jobs",
            Page::JobPostings,
            [Role::Employer, Role::Admin],
        )
        .with_roles(
            "/jobs",
            Page::JobBoard,
            [Role::Student, Role::Employer, Role::Admin],
        )
        // --- Education-level subject selection ---
        .with_education_levels(
            "/subjects/o-level",
            Page::OLevelSubjects,
            [EducationLevel::OLevel],
        )
        .with_education_levels(
            "/subjects/a-level",
            Page::ALevelSubjects,
            [EducationLevel::ALevel],
        )
}
