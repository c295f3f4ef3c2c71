use crate::error::Error;
use crate::TokenResolver;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

/// Middleware to authenticate requests using the provided resolver.
///
/// On success the [`AuthenticationContext`](crate::AuthenticationContext) is
/// inserted into the request extensions.
///
/// # Errors
/// - 401 if the authorization header is missing.
/// - 401 if the token is rejected.
/// - 502 if the `IdP` answered with a malformed payload.
/// - 500 for any other failure.
pub async fn authentication_middleware<T: TokenResolver>(
    State(resolver): State<T>,
    authorization: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(authorization) = authorization else {
        tracing::debug!("Missing authorization header");
        return (StatusCode::UNAUTHORIZED, "Missing authorization header").into_response();
    };

    let token = authorization.token();
    let auth_result = resolver.resolve(token).await;

    match auth_result {
        Ok(auth) => {
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Unauthenticated: {e}");
            match e {
                Error::InvalidCredentials { .. } => {
                    (StatusCode::UNAUTHORIZED, "Invalid access token").into_response()
                }
                Error::MalformedUserInfo { .. } => (
                    StatusCode::BAD_GATEWAY,
                    "Identity provider returned malformed user info",
                )
                    .into_response(),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authentication failed with internal error",
                )
                    .into_response(),
            }
        }
    }
}
