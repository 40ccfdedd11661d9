// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::SessionContext,
};

/// 1. O Trait que define uma exigência de papel
pub trait RoleDef: Send + Sync + 'static {
    fn allows(session: &SessionContext) -> bool;
}

/// 2. O Extractor (Guardião). Carrega a sessão já verificada.
pub struct RequireRole<T>(pub SessionContext, pub PhantomData<T>);

impl<T> RequireRole<T> {
    pub fn session(&self) -> &SessionContext {
        &self.0
    }
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_request_parts(parts, state)
            .await
            .unwrap_or_default();

        // A. Extrai a sessão colocada pelo auth_guard
        let AuthenticatedUser(session) = AuthenticatedUser::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InvalidToken.to_api_error(&locale))?;

        // B. Verifica o papel
        if !T::allows(&session) {
            return Err(AppError::PermissionDenied.to_api_error(&locale));
        }

        Ok(RequireRole(session, PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AnyAdmin;
impl RoleDef for AnyAdmin {
    fn allows(session: &SessionContext) -> bool {
        session.is_admin()
    }
}

pub struct SuperAdminOnly;
impl RoleDef for SuperAdminOnly {
    fn allows(session: &SessionContext) -> bool {
        session.is_super_admin()
    }
}
