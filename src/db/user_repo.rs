// src/db/user_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::UserStore,
    models::auth::{Role, User},
};

const USER_SELECT: &str = r#"
    SELECT p.id, p.email, p.full_name, p.password_hash, r.role, p.created_at
    FROM profiles p
    LEFT JOIN user_roles r ON r.user_id = p.id
"#;

// O repositório de usuários: perfis, papéis e sessões
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("{USER_SELECT} WHERE lower(p.email) = lower($1)");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("{USER_SELECT} WHERE p.id = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("{USER_SELECT} ORDER BY p.created_at ASC");
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO profiles (email, full_name, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
            .bind(user_id)
            .bind(role)
            .execute(&mut *tx)
            .await?;

        let sql = format!("{USER_SELECT} WHERE p.id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        // Se algo falhar antes daqui, o drop do tx faz rollback
        tx.commit().await?;

        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        // user_roles e user_sessions caem por ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    async fn create_session(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<Uuid, AppError> {
        let session_id: Uuid = sqlx::query_scalar(
            "INSERT INTO user_sessions (user_id, expires_at) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(session_id)
    }

    async fn is_session_active(&self, session_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let active: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_sessions
                WHERE id = $1 AND user_id = $2
                  AND revoked_at IS NULL
                  AND expires_at > NOW()
            )
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(active)
    }

    async fn revoke_session(&self, session_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE user_sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
