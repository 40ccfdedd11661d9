// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::{self, MessageKey};
use crate::middleware::i18n::Locale;

// Erro de domínio usado por serviços e repositórios.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Número de cédula vazio")]
    EmptyIdNumber,

    #[error("Dados adicionais inválidos: {0:?}")]
    CustomDataValidationError(HashMap<String, String>),

    #[error("Dados adicionais devem ser um objeto JSON")]
    CustomDataJson,

    #[error("Nome de campo inválido: {0}")]
    InvalidFieldName(String),

    #[error("Visitante não encontrado")]
    VisitorNotFound,

    #[error("Campo personalizado não encontrado")]
    CustomFieldNotFound,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cédula já cadastrada")]
    IdNumberAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão negada")]
    PermissionDenied,

    #[error("Um super admin não pode remover a si mesmo")]
    CannotDeleteSelf,

    #[error("Registro de ingresso negado: {0}")]
    RegistrationDenied(String),

    #[error("Armazenamento indisponível")]
    StoreUnavailable,

    #[error("Tipo de foto não suportado: {0}")]
    UnsupportedPhotoType(String),

    #[error("Caminho de foto inválido")]
    InvalidPhotoPath,

    #[error("Foto não encontrada")]
    PhotoNotFound,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[source] sqlx::Error),

    #[error("Erro ao gravar foto: {0}")]
    PhotoStorageError(#[from] std::io::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// Falhas de conexão viram StoreUnavailable; o resto é erro de banco.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => AppError::StoreUnavailable,
            other => AppError::DatabaseError(other),
        }
    }
}

/// Resposta de erro serializada para o cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::EmptyIdNumber
            | AppError::CustomDataValidationError(_)
            | AppError::CustomDataJson
            | AppError::InvalidFieldName(_)
            | AppError::CannotDeleteSelf
            | AppError::InvalidPhotoPath => StatusCode::BAD_REQUEST,
            AppError::VisitorNotFound
            | AppError::CustomFieldNotFound
            | AppError::UserNotFound
            | AppError::PhotoNotFound => StatusCode::NOT_FOUND,
            AppError::IdNumberAlreadyExists
            | AppError::EmailAlreadyExists
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::RegistrationDenied(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UnsupportedPhotoType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::DatabaseError(_)
            | AppError::PhotoStorageError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> MessageKey {
        match self {
            AppError::ValidationError(_) | AppError::CustomDataValidationError(_) => {
                MessageKey::InvalidFields
            }
            AppError::EmptyIdNumber => MessageKey::EmptyIdNumber,
            AppError::CustomDataJson => MessageKey::CustomDataJson,
            AppError::InvalidFieldName(_) => MessageKey::InvalidFieldName,
            AppError::VisitorNotFound => MessageKey::VisitorNotFound,
            AppError::CustomFieldNotFound => MessageKey::CustomFieldNotFound,
            AppError::UserNotFound => MessageKey::UserNotFound,
            AppError::IdNumberAlreadyExists => MessageKey::IdNumberAlreadyExists,
            AppError::EmailAlreadyExists => MessageKey::EmailAlreadyExists,
            AppError::UniqueConstraintViolation(_) => MessageKey::AlreadyExists,
            AppError::InvalidCredentials => MessageKey::InvalidCredentials,
            AppError::InvalidToken => MessageKey::InvalidToken,
            AppError::PermissionDenied => MessageKey::PermissionDenied,
            AppError::CannotDeleteSelf => MessageKey::CannotDeleteSelf,
            AppError::RegistrationDenied(_) => MessageKey::RegistrationDenied,
            AppError::StoreUnavailable => MessageKey::StoreUnavailable,
            AppError::UnsupportedPhotoType(_) => MessageKey::UnsupportedPhotoType,
            AppError::InvalidPhotoPath => MessageKey::InvalidPhotoPath,
            AppError::PhotoNotFound => MessageKey::PhotoNotFound,
            AppError::DatabaseError(_)
            | AppError::PhotoStorageError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => MessageKey::Unexpected,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            AppError::CustomDataValidationError(errors) => Some(json!(errors)),
            AppError::InvalidFieldName(name) => Some(json!({ "name": name })),
            _ => None,
        }
    }

    /// Converte o erro numa resposta traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        } else {
            tracing::debug!("Requisição rejeitada ({}): {}", status, self);
        }

        ApiError {
            status,
            error: i18n::translate(&locale.0, self.message_key()).to_string(),
            details: self.details(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error(&Locale::default())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
