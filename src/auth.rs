use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::{EducationLevel, Role, SessionState, SessionUser},
};

/// Header carrying the user id for the local development bypass.
pub const DEV_USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the role for the local development bypass.
pub const DEV_ROLE_HEADER: &str = "x-user-role";
/// Header carrying the (optional) education level for the local development bypass.
pub const DEV_EDUCATION_LEVEL_HEADER: &str = "x-education-level";

/// Claims
///
/// Payload of the session JWT issued by the external auth service. Role and
/// education level travel as custom claims so no profile lookup is needed here.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's id.
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub current_education_level: Option<EducationLevel>,
    /// Expiration Time (exp). Always validated.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        SessionUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
            current_education_level: claims.current_education_level,
        }
    }
}

/// SessionProvider
///
/// The Auth State Provider seam. Implementations turn request credentials into a
/// `SessionState`; the guard only ever reads what they return.
///
/// `Send + Sync + async_trait` so that `Arc<dyn SessionProvider>` can live in the
/// shared `AppState`.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves the session for a request. Missing or bad credentials yield an
    /// anonymous session, never an error.
    async fn resolve(&self, headers: &HeaderMap) -> SessionState;
}

/// SessionProviderState
///
/// The shared handle stored in `AppState`.
pub type SessionProviderState = Arc<dyn SessionProvider>;

/// JwtSessionProvider
///
/// Validates `Authorization: Bearer <jwt>` sessions (HS256, expiry enforced).
/// In `Env::Local` it also accepts the `x-user-id` / `x-user-role` headers.
#[derive(Clone)]
pub struct JwtSessionProvider {
    env: Env,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionProvider {
    pub fn new(config: &AppConfig) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            env: config.env.clone(),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    fn dev_bypass(headers: &HeaderMap) -> Option<SessionUser> {
        let id = Uuid::parse_str(header_str(headers, DEV_USER_ID_HEADER)?).ok()?;
        let role = Role::parse(header_str(headers, DEV_ROLE_HEADER)?)?;
        let current_education_level =
            header_str(headers, DEV_EDUCATION_LEVEL_HEADER).and_then(EducationLevel::parse);

        Some(SessionUser {
            id,
            email: None,
            role,
            current_education_level,
        })
    }

    fn bearer_user(&self, headers: &HeaderMap) -> Option<SessionUser> {
        let token = header_str(headers, header::AUTHORIZATION.as_str())?.strip_prefix("Bearer ")?;

        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims.into()),
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("session token expired"),
                    kind => tracing::debug!(?kind, "session token rejected"),
                }
                None
            }
        }
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn resolve(&self, headers: &HeaderMap) -> SessionState {
        // The header bypass only exists in local mode; a bad bypass falls through
        // to the bearer token.
        if self.env == Env::Local {
            if let Some(user) = Self::dev_bypass(headers) {
                return SessionState::signed_in(user);
            }
        }

        match self.bearer_user(headers) {
            Some(user) => SessionState::signed_in(user),
            None => SessionState::anonymous(),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// MockSessionProvider
///
/// Returns the same session for every request. Used by tests and demos.
#[derive(Clone, Default)]
pub struct MockSessionProvider {
    pub session: SessionState,
}

impl MockSessionProvider {
    pub fn new(session: SessionState) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionProvider for MockSessionProvider {
    async fn resolve(&self, _headers: &HeaderMap) -> SessionState {
        self.session.clone()
    }
}

/// CurrentSession
///
/// Extractor yielding the session of the request. It never rejects: an anonymous
/// session is a valid input for the guard, which redirects it to login.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionState);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    SessionProviderState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let provider = SessionProviderState::from_ref(state);
        Ok(CurrentSession(provider.resolve(&parts.headers).await))
    }
}
