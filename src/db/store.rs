// src/db/store.rs

// Contratos de armazenamento usados pelos serviços.
// As implementações Postgres ficam nos *_repo.rs; os testes usam db::memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Role, User},
        custom_field::{CustomField, CustomFieldDraft},
        visitor::{Visitor, VisitorDraft},
    },
};

#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Todos os visitantes, do mais recente para o mais antigo.
    async fn list(&self) -> Result<Vec<Visitor>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Visitor>, AppError>;

    async fn find_by_id_number(&self, id_number: &str) -> Result<Option<Visitor>, AppError>;

    async fn insert(&self, draft: &VisitorDraft) -> Result<Visitor, AppError>;

    /// Não altera `last_entry_at` nem `photo_url`.
    async fn update(&self, id: Uuid, draft: &VisitorDraft) -> Result<Visitor, AppError>;

    async fn update_photo(&self, id: Uuid, photo_url: &str) -> Result<Visitor, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Registro atômico de ingresso numa única chamada ao armazenamento.
    /// O armazenamento pode recusar (`RegistrationDenied`).
    async fn register_entry(&self, id: Uuid) -> Result<Visitor, AppError>;
}

#[async_trait]
pub trait CustomFieldStore: Send + Sync {
    /// Ordenados por `display_order`, empates pela ordem de inserção.
    async fn list(&self) -> Result<Vec<CustomField>, AppError>;

    async fn insert(&self, draft: &CustomFieldDraft) -> Result<CustomField, AppError>;

    async fn update(&self, id: Uuid, draft: &CustomFieldDraft) -> Result<CustomField, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Cria o perfil e o papel na mesma transação.
    async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError>;

    /// Remove o usuário junto com papel e sessões.
    async fn delete_user(&self, id: Uuid) -> Result<(), AppError>;

    async fn create_session(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<Uuid, AppError>;

    async fn is_session_active(&self, session_id: Uuid, user_id: Uuid) -> Result<bool, AppError>;

    async fn revoke_session(&self, session_id: Uuid) -> Result<(), AppError>;
}
