// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity extraction for the server.
//!
//! The fronting identity provider authenticates the user and forwards the
//! result in request headers. This module only turns those headers into an
//! `AuthenticatedActor`; it never checks credentials itself.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
    response::{IntoResponse, Response},
};
use shiftly_api::{ApiError, AuthenticatedActor, AuthenticationService};
use tracing::{debug, warn};

use crate::HttpError;

/// Header carrying the provider's opaque user identifier.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the user's display name.
pub const USER_NAME_HEADER: &str = "x-user-name";
/// Header carrying the user's email address.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Extractor for the authenticated caller.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     CallerIdentity(actor): CallerIdentity,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Rejects the request with HTTP 401 if `x-user-id` is missing, blank,
/// or not valid UTF-8.
pub struct CallerIdentity(pub AuthenticatedActor);

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = IdentityError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id: Option<&str> = header_value(&parts.headers, USER_ID_HEADER)?;
        let display_name: Option<&str> = header_value(&parts.headers, USER_NAME_HEADER)?;
        let email: Option<&str> = header_value(&parts.headers, USER_EMAIL_HEADER)?;

        let actor: AuthenticatedActor =
            AuthenticationService::authenticate(user_id, display_name, email).map_err(|e| {
                debug!(error = %e, "Request carried no usable identity");
                IdentityError(ApiError::from(e))
            })?;

        debug!(user_id = %actor.user_id, "Caller identified");

        Ok(Self(actor))
    }
}

/// Reads an optional header as UTF-8.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, IdentityError> {
    headers
        .get(name)
        .map(|value| {
            value.to_str().map_err(|_| {
                warn!(header = name, "Identity header is not valid UTF-8");
                IdentityError(ApiError::AuthenticationFailed {
                    reason: format!("header {name} is not valid UTF-8"),
                })
            })
        })
        .transpose()
}

/// Identity extraction failure.
///
/// Rendered with the same JSON error body as every other failure.
#[derive(Debug)]
pub struct IdentityError(ApiError);

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        HttpError::from(self.0).into_response()
    }
}
