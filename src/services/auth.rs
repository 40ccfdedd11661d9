// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{AuthResponse, Claims, CreateUserPayload, Role, SessionContext, User},
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt_secret: String,
        token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            jwt_secret,
            token_ttl,
            bcrypt_cost,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let now = Utc::now();
        let expires_at = now + self.token_ttl;
        let session_id = self.users.create_session(user.id, expires_at).await?;

        let claims = Claims {
            sub: user.id,
            sid: session_id,
            email: user.email.clone(),
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?;

        tracing::info!("🔑 Login de {}", user.email);
        Ok(AuthResponse { token, user })
    }

    /// Decodifica o JWT e confere se a sessão ainda está ativa.
    pub async fn validate_token(&self, token: &str) -> Result<SessionContext, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        if !self.users.is_session_active(claims.sid, claims.sub).await? {
            return Err(AppError::InvalidToken);
        }

        Ok(SessionContext {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            session_id: claims.sid,
        })
    }

    pub async fn logout(&self, session: &SessionContext) -> Result<(), AppError> {
        self.users.revoke_session(session.session_id).await?;
        tracing::info!("🔒 Logout de {}", session.email);
        Ok(())
    }

    pub async fn current_user(&self, session: &SessionContext) -> Result<User, AppError> {
        self.users
            .find_by_id(session.user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // --- Gestão de usuários (apenas super_admin) ---

    pub async fn list_users(&self, actor: &SessionContext) -> Result<Vec<User>, AppError> {
        actor.require_super_admin()?;
        self.users.list().await
    }

    pub async fn create_user(
        &self,
        actor: &SessionContext,
        payload: CreateUserPayload,
    ) -> Result<User, AppError> {
        actor.require_super_admin()?;
        payload.validate()?;

        let user = self
            .register(
                payload.email.trim(),
                &payload.password,
                payload.full_name.trim(),
                payload.role,
            )
            .await?;

        tracing::info!("👥 Usuário {} criado por {}", user.email, actor.email);
        Ok(user)
    }

    pub async fn delete_user(&self, actor: &SessionContext, id: Uuid) -> Result<(), AppError> {
        actor.require_super_admin()?;
        if actor.user_id == id {
            return Err(AppError::CannotDeleteSelf);
        }

        self.users.delete_user(id).await?;
        tracing::info!("👥 Usuário {} removido por {}", id, actor.email);
        Ok(())
    }

    /// Cria o primeiro super_admin quando ainda não há nenhum usuário.
    pub async fn ensure_bootstrap_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        if self.users.count().await? > 0 {
            return Ok(None);
        }

        let user = self
            .register(email.trim(), password, "Administrador", Role::SuperAdmin)
            .await?;
        tracing::warn!("👑 Super admin inicial criado: {}", user.email);
        Ok(Some(user))
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.users
            .create_user(&normalize_email(email), full_name, &hashed_password, role)
            .await
    }
}

// E-mails são gravados e buscados sempre em minúsculas
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
