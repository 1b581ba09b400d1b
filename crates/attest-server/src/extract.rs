//! Request extractors resolving who is calling and which test they address.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use attest_core::entities::PopulatedAcceptanceTest;
use attest_core::enums::TestState;
use attest_core::identity::Caller;
use attest_core::responses::{AcceptanceTestView, OwnerDetail};

use crate::app::AppState;
use crate::error::ApiError;

/// The caller, if the request carries the caller header.
///
/// A missing or blank header is anonymous. A header naming an unknown user
/// is rejected with 401.
#[derive(Debug, Clone)]
pub struct CallerContext(pub Option<Caller>);

impl FromRequestParts<AppState> for CallerContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(&state.caller_header) else {
            return Ok(Self(None));
        };
        let user_id = value
            .to_str()
            .map_err(|_| ApiError::unauthorized("malformed caller header"))?
            .trim();
        if user_id.is_empty() {
            return Ok(Self(None));
        }

        match state.service.find_user(user_id).await? {
            Some(user) => Ok(Self(Some(Caller::from(&user)))),
            None => {
                tracing::warn!(user_id, "request from unknown user");
                Err(ApiError::unauthorized("unknown user"))
            }
        }
    }
}

/// An authenticated caller; anonymous requests get 401.
#[derive(Debug, Clone)]
pub struct RequireCaller(pub Caller);

impl FromRequestParts<AppState> for RequireCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CallerContext(caller) = CallerContext::from_request_parts(parts, state).await?;
        caller
            .map(Self)
            .ok_or_else(|| ApiError::unauthorized("authentication required"))
    }
}

/// The acceptance test named by the `{id}` path segment, as seen by the caller.
///
/// Answers 404 when the test does not exist, and also when an anonymous
/// caller asks for a test that is not validated.
#[derive(Debug, Clone)]
pub struct ResolvedTest {
    pub caller: Option<Caller>,
    pub test: PopulatedAcceptanceTest,
}

impl ResolvedTest {
    #[must_use]
    pub fn view(&self) -> AcceptanceTestView {
        AcceptanceTestView::for_caller(self.caller.as_ref(), &self.test, OwnerDetail::Profile)
    }
}

impl FromRequestParts<AppState> for ResolvedTest {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state).await?;
        let CallerContext(caller) = CallerContext::from_request_parts(parts, state).await?;

        let test = state
            .service
            .get_populated_acceptance_test(&id)
            .await
            .map_err(|err| match err {
                attest_db::error::DatabaseError::NoResult => {
                    ApiError::not_found(format!("acceptance test {id} not found"))
                }
                other => ApiError::from(other),
            })?;

        if caller.is_none() && test.test.state != TestState::Validated {
            return Err(ApiError::not_found(format!("acceptance test {id} not found")));
        }

        Ok(Self { caller, test })
    }
}
