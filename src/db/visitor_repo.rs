// src/db/visitor_repo.rs

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::VisitorStore,
    models::visitor::{Visitor, VisitorDraft},
};

const VISITOR_COLUMNS: &str = r#"
    id, id_number, full_name, company, authorization_expiry, authorized,
    notes, additional_data, photo_url, last_entry_at, created_at, updated_at
"#;

// O repositório de visitantes, responsável pela tabela 'visitors'
#[derive(Clone)]
pub struct VisitorRepository {
    pool: PgPool,
}

impl VisitorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Converte a violação de unicidade da cédula num erro amigável
fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("visitors_id_number_key") => AppError::IdNumberAlreadyExists,
                Some(constraint) => AppError::UniqueConstraintViolation(constraint.to_string()),
                None => AppError::UniqueConstraintViolation("visitors".to_string()),
            };
        }
    }
    e.into()
}

// Erros levantados pela função register_entry (ver migração)
fn map_register_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.code().as_deref() {
            Some("P0002") => return AppError::VisitorNotFound,
            Some("P0001") => return AppError::RegistrationDenied(db_err.message().to_string()),
            _ => {}
        }
    }
    e.into()
}

#[async_trait]
impl VisitorStore for VisitorRepository {
    async fn list(&self) -> Result<Vec<Visitor>, AppError> {
        let sql = format!("SELECT {VISITOR_COLUMNS} FROM visitors ORDER BY created_at DESC");
        let visitors = sqlx::query_as::<_, Visitor>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(visitors)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Visitor>, AppError> {
        let sql = format!("SELECT {VISITOR_COLUMNS} FROM visitors WHERE id = $1");
        let visitor = sqlx::query_as::<_, Visitor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(visitor)
    }

    async fn find_by_id_number(&self, id_number: &str) -> Result<Option<Visitor>, AppError> {
        let sql = format!("SELECT {VISITOR_COLUMNS} FROM visitors WHERE id_number = $1");
        let visitor = sqlx::query_as::<_, Visitor>(&sql)
            .bind(id_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(visitor)
    }

    async fn insert(&self, draft: &VisitorDraft) -> Result<Visitor, AppError> {
        let sql = format!(
            r#"
            INSERT INTO visitors (
                id_number, full_name, company, authorization_expiry,
                authorized, notes, additional_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {VISITOR_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Visitor>(&sql)
            .bind(&draft.id_number)
            .bind(&draft.full_name)
            .bind(draft.company.as_deref())
            .bind(draft.authorization_expiry)
            .bind(draft.authorized)
            .bind(draft.notes.as_deref())
            .bind(Json(&draft.additional_data))
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update(&self, id: Uuid, draft: &VisitorDraft) -> Result<Visitor, AppError> {
        let sql = format!(
            r#"
            UPDATE visitors
            SET id_number = $2, full_name = $3, company = $4,
                authorization_expiry = $5, authorized = $6, notes = $7,
                additional_data = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {VISITOR_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Visitor>(&sql)
            .bind(id)
            .bind(&draft.id_number)
            .bind(&draft.full_name)
            .bind(draft.company.as_deref())
            .bind(draft.authorization_expiry)
            .bind(draft.authorized)
            .bind(draft.notes.as_deref())
            .bind(Json(&draft.additional_data))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or(AppError::VisitorNotFound)
    }

    async fn update_photo(&self, id: Uuid, photo_url: &str) -> Result<Visitor, AppError> {
        let sql = format!(
            "UPDATE visitors SET photo_url = $2, updated_at = NOW() WHERE id = $1 RETURNING {VISITOR_COLUMNS}"
        );

        sqlx::query_as::<_, Visitor>(&sql)
            .bind(id)
            .bind(photo_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::VisitorNotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM visitors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::VisitorNotFound);
        }
        Ok(())
    }

    async fn register_entry(&self, id: Uuid) -> Result<Visitor, AppError> {
        // Uma única chamada: a função trava a linha, valida e avança last_entry_at
        let sql = format!("SELECT {VISITOR_COLUMNS} FROM register_entry($1)");

        sqlx::query_as::<_, Visitor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_register_error)?
            .ok_or(AppError::VisitorNotFound)
    }
}
