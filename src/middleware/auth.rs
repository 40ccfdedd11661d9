// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::SessionContext,
};

// O middleware em si: valida o Bearer e guarda a sessão nos extensions
pub async fn auth_guard(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    let locale = Locale::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_or_default();

    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &app_state)
            .await
            .map_err(|_| AppError::InvalidToken.to_api_error(&locale))?;

    let session = app_state
        .auth_service
        .validate_token(bearer.token())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    parts.extensions.insert(session);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

// Extrator para obter a sessão autenticada diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionContext);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| ApiError::from(AppError::InvalidToken))
    }
}
