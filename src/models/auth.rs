// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE app_role do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "app_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
}

// Representa um usuário vindo do banco (profiles + user_roles)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    // Usuário sem papel atribuído não acessa o painel
    pub role: Option<Role>,

    pub created_at: DateTime<Utc>,
}

/// Contexto da sessão autenticada, resolvido uma vez no login.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: Option<Role>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub session_id: Uuid,
}

impl SessionContext {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Some(Role::Admin | Role::SuperAdmin))
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Some(Role::SuperAdmin)
    }

    // Guardas explícitas usadas antes de toda mutação administrativa
    pub fn require_admin(&self) -> Result<(), crate::common::error::AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(crate::common::error::AppError::PermissionDenied)
        }
    }

    pub fn require_super_admin(&self) -> Result<(), crate::common::error::AppError> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(crate::common::error::AppError::PermissionDenied)
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Criação de usuário administrativo (apenas super_admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "guardia@example.com")]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Carlos Pérez")]
    pub full_name: String,

    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Admin
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID do usuário
    pub sid: Uuid,  // ID da sessão
    pub email: String,
    pub role: Option<Role>,
    pub exp: usize,
    pub iat: usize,
}
