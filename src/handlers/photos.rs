// src/handlers/photos.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{AnyAdmin, RequireRole},
    },
    models::visitor::Visitor,
    services::photo_storage,
};

// PUT /api/admin/visitors/{id}/photo (corpo bruto + Content-Type)
#[utoipa::path(
    put,
    path = "/api/admin/visitors/{id}/photo",
    tag = "Visitors",
    params(("id" = Uuid, Path, description = "ID do visitante")),
    request_body(content = Vec<u8>, content_type = "image/jpeg", description = "JPEG, PNG ou WEBP"),
    responses(
        (status = 200, description = "Foto atualizada", body = Visitor),
        (status = 404, description = "Visitante não encontrado"),
        (status = 413, description = "Arquivo grande demais"),
        (status = 415, description = "Tipo de arquivo não suportado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Visitor>, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let visitor = app_state
        .visitor_service
        .upload_photo(role.session(), id, content_type, body)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(visitor))
}

// GET /photos/{file}
#[utoipa::path(
    get,
    path = "/photos/{file}",
    tag = "Public",
    params(("file" = String, Path, description = "Nome do arquivo")),
    responses(
        (status = 200, description = "Imagem"),
        (status = 404, description = "Foto não encontrada")
    )
)]
pub async fn get_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = app_state
        .visitor_service
        .read_photo(&file)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    match bytes {
        Some(bytes) => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, photo_storage::content_type_for(&file))],
            bytes,
        )),
        None => Err(AppError::PhotoNotFound.to_api_error(&locale)),
    }
}
