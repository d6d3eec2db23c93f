//! `AuthUser` extractor: pulls the access token from the Authorization
//! header or the auth cookie, validates it, and injects context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use vault_core::error::AppError;
use vault_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
        {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_string(),
            Err(rejection) if matches!(rejection.reason(), TypedHeaderRejectionReason::Missing) => {
                // Browser clients carry the token in a cookie instead
                CookieJar::from_headers(&parts.headers)
                    .get(&state.config.auth.cookie_name)
                    .map(|cookie| cookie.value().to_string())
                    .ok_or_else(|| AppError::authentication("Missing access token"))?
            }
            Err(_) => {
                return Err(AppError::authentication("Invalid Authorization header format").into());
            }
        };

        let user_id = state.jwt_decoder.authenticate(&token)?;
        Ok(AuthUser(RequestContext::new(user_id)))
    }
}
