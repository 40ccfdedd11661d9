// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{ensure, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::broadcast;

use crate::{
    db::{
        CustomFieldRepository, CustomFieldStore, UserRepository, UserStore, VisitorRepository,
        VisitorStore,
    },
    services::{
        auth::AuthService,
        custom_field_service::CustomFieldService,
        dashboard_service::DashboardService,
        photo_storage::{LocalPhotoStorage, PhotoStorage},
        visitor_service::VisitorService,
    },
    models::dashboard::VisitorEvent,
};

const MIN_ADMIN_PASSWORD_LEN: usize = 6;
const MAX_JWT_TTL_HOURS: i64 = 24 * 365;
const EVENT_BUFFER: usize = 64;

/// Configuração lida das variáveis de ambiente.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bind_addr: String,
    pub photo_dir: PathBuf,
    pub public_base_url: String,
    pub max_photo_bytes: usize,
    pub bcrypt_cost: u32,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} deve ser definida"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bootstrap_admin = match (lookup("BOOTSTRAP_ADMIN_EMAIL"), lookup("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                ensure!(
                    password.chars().count() >= MIN_ADMIN_PASSWORD_LEN,
                    "BOOTSTRAP_ADMIN_PASSWORD deve ter ao menos {MIN_ADMIN_PASSWORD_LEN} caracteres"
                );
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        let jwt_ttl_hours: i64 = parse(&lookup, "JWT_TTL_HOURS", 168)?;
        ensure!(
            (1..=MAX_JWT_TTL_HOURS).contains(&jwt_ttl_hours),
            "JWT_TTL_HOURS deve estar entre 1 e {MAX_JWT_TTL_HOURS}: {jwt_ttl_hours}"
        );

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours,
            bind_addr: or_default("BIND_ADDR", "0.0.0.0:3000"),
            photo_dir: PathBuf::from(or_default("PHOTO_DIR", "./data/photos")),
            public_base_url: or_default("PUBLIC_BASE_URL", "http://localhost:3000"),
            max_photo_bytes: parse(&lookup, "MAX_PHOTO_BYTES", 5 * 1024 * 1024)?,
            bcrypt_cost: parse(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            bootstrap_admin,
        })
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválida: {raw:?}")),
        None => Ok(default),
    }
}

pub async fn connect_pool(config: &Config) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub visitor_service: VisitorService,
    pub custom_field_service: CustomFieldService,
    pub dashboard_service: DashboardService,
    pub visitor_events: broadcast::Sender<VisitorEvent>,
}

impl AppState {
    pub fn new(config: Config, db_pool: PgPool) -> Self {
        let photos = Arc::new(LocalPhotoStorage::new(
            config.photo_dir.clone(),
            &config.public_base_url,
        ));

        Self::with_stores(
            config,
            Arc::new(VisitorRepository::new(db_pool.clone())),
            Arc::new(CustomFieldRepository::new(db_pool.clone())),
            Arc::new(UserRepository::new(db_pool)),
            photos,
        )
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_stores(
        config: Config,
        visitors: Arc<dyn VisitorStore>,
        fields: Arc<dyn CustomFieldStore>,
        users: Arc<dyn UserStore>,
        photos: Arc<dyn PhotoStorage>,
    ) -> Self {
        let (visitor_events, _) = broadcast::channel(EVENT_BUFFER);
        let custom_field_service = CustomFieldService::new(fields);
        let visitor_service = VisitorService::new(
            visitors.clone(),
            custom_field_service.clone(),
            photos,
            visitor_events.clone(),
        );
        let dashboard_service = DashboardService::new(visitors, visitor_events.clone());
        let auth_service = AuthService::new(
            users,
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.jwt_ttl_hours),
            config.bcrypt_cost,
        );

        Self {
            config: Arc::new(config),
            auth_service,
            visitor_service,
            custom_field_service,
            dashboard_service,
            visitor_events,
        }
    }
}
