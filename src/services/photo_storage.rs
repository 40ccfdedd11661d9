// src/services/photo_storage.rs

use std::path::PathBuf;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::common::error::AppError;

/// Armazenamento de fotos de visitantes.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Grava (sobrescrevendo) e devolve a URL pública.
    async fn upload(&self, path: &str, bytes: Bytes) -> Result<String, AppError>;

    async fn read(&self, path: &str) -> Result<Option<Bytes>, AppError>;
}

/// Extensão do arquivo a partir do Content-Type aceito.
pub fn extension_for(content_type: &str) -> Result<&'static str, AppError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/webp" => Ok("webp"),
        _ => Err(AppError::UnsupportedPhotoType(mime)),
    }
}

pub fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

// Apenas nomes simples: nada de separadores ou "..".
fn check_path(path: &str) -> Result<(), AppError> {
    let valid = !path.is_empty()
        && !path.contains("..")
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid { Ok(()) } else { Err(AppError::InvalidPhotoPath) }
}

/// Fotos gravadas no disco e servidas pela própria aplicação em `/photos`.
pub struct LocalPhotoStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalPhotoStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn upload(&self, path: &str, bytes: Bytes) -> Result<String, AppError> {
        check_path(path)?;

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(path), &bytes).await?;

        tracing::debug!("📷 Foto gravada: {} ({} bytes)", path, bytes.len());
        Ok(format!("{}/photos/{}", self.public_base_url, path))
    }

    async fn read(&self, path: &str) -> Result<Option<Bytes>, AppError> {
        check_path(path)?;

        match tokio::fs::read(self.root.join(path)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
