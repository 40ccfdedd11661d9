// src/handlers/custom_fields.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{AnyAdmin, RequireRole},
    },
    models::custom_field::{CustomField, CustomFieldPayload},
};

#[utoipa::path(
    get,
    path = "/api/admin/custom-fields",
    tag = "Custom Fields",
    responses(
        (status = 200, description = "Campos na ordem de exibição", body = Vec<CustomField>),
        (status = 403, description = "Sem papel administrativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_fields(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
) -> Result<Json<Vec<CustomField>>, ApiError> {
    let fields = app_state
        .custom_field_service
        .list(role.session())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(fields))
}

#[utoipa::path(
    post,
    path = "/api/admin/custom-fields",
    tag = "Custom Fields",
    request_body = CustomFieldPayload,
    responses(
        (status = 201, description = "Campo criado", body = CustomField),
        (status = 400, description = "Nome inválido"),
        (status = 409, description = "Nome já utilizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_field(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Json(payload): Json<CustomFieldPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let field = app_state
        .custom_field_service
        .create(role.session(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(field)))
}

#[utoipa::path(
    put,
    path = "/api/admin/custom-fields/{id}",
    tag = "Custom Fields",
    params(("id" = Uuid, Path, description = "ID do campo")),
    request_body = CustomFieldPayload,
    responses(
        (status = 200, description = "Campo atualizado", body = CustomField),
        (status = 404, description = "Campo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_field(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomFieldPayload>,
) -> Result<Json<CustomField>, ApiError> {
    let field = app_state
        .custom_field_service
        .update(role.session(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(field))
}

#[utoipa::path(
    delete,
    path = "/api/admin/custom-fields/{id}",
    tag = "Custom Fields",
    params(("id" = Uuid, Path, description = "ID do campo")),
    responses(
        (status = 204, description = "Campo removido"),
        (status = 404, description = "Campo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_field(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .custom_field_service
        .delete(role.session(), id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
