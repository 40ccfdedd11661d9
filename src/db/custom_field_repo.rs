// src/db/custom_field_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::CustomFieldStore,
    models::custom_field::{CustomField, CustomFieldDraft},
};

#[derive(Clone)]
pub struct CustomFieldRepository {
    pool: PgPool,
}

impl CustomFieldRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(format!("A chave '{}' já existe.", name));
        }
    }
    e.into()
}

#[async_trait]
impl CustomFieldStore for CustomFieldRepository {
    async fn list(&self) -> Result<Vec<CustomField>, AppError> {
        let fields = sqlx::query_as::<_, CustomField>(
            r#"
            SELECT id, name, label, field_type, required, display_order, created_at
            FROM custom_field_config
            ORDER BY display_order ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(fields)
    }

    async fn insert(&self, draft: &CustomFieldDraft) -> Result<CustomField, AppError> {
        sqlx::query_as::<_, CustomField>(
            r#"
            INSERT INTO custom_field_config (name, label, field_type, required, display_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, label, field_type, required, display_order, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.label)
        .bind(draft.field_type)
        .bind(draft.required)
        .bind(draft.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &draft.name))
    }

    async fn update(&self, id: Uuid, draft: &CustomFieldDraft) -> Result<CustomField, AppError> {
        sqlx::query_as::<_, CustomField>(
            r#"
            UPDATE custom_field_config
            SET name = $2, label = $3, field_type = $4, required = $5, display_order = $6
            WHERE id = $1
            RETURNING id, name, label, field_type, required, display_order, created_at
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.label)
        .bind(draft.field_type)
        .bind(draft.required)
        .bind(draft.display_order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &draft.name))?
        .ok_or(AppError::CustomFieldNotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        // Os dados já gravados em additional_data continuam lá, apenas deixam de ser exibidos
        let result = sqlx::query("DELETE FROM custom_field_config WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::CustomFieldNotFound);
        }
        Ok(())
    }
}
