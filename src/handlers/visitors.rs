// src/handlers/visitors.rs

use axum::{
    extract::{Path, Query, State},
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
    models::visitor::{Visitor, VisitorListQuery, VisitorPayload},
};

// GET /api/admin/visitors
#[utoipa::path(
    get,
    path = "/api/admin/visitors",
    tag = "Visitors",
    params(VisitorListQuery),
    responses(
        (status = 200, description = "Visitantes, mais recentes primeiro", body = Vec<Visitor>),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Sem papel administrativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_visitors(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Query(query): Query<VisitorListQuery>,
) -> Result<Json<Vec<Visitor>>, ApiError> {
    let visitors = app_state
        .visitor_service
        .list(role.session(), query.q.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(visitors))
}

#[utoipa::path(
    get,
    path = "/api/admin/visitors/{id}",
    tag = "Visitors",
    params(("id" = Uuid, Path, description = "ID do visitante")),
    responses(
        (status = 200, body = Visitor),
        (status = 404, description = "Visitante não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_visitor(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Visitor>, ApiError> {
    let visitor = app_state
        .visitor_service
        .get(role.session(), id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(visitor))
}

// POST /api/admin/visitors
#[utoipa::path(
    post,
    path = "/api/admin/visitors",
    tag = "Visitors",
    request_body = VisitorPayload,
    responses(
        (status = 201, description = "Visitante criado", body = Visitor),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Cédula já cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_visitor(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Json(payload): Json<VisitorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let visitor = app_state
        .visitor_service
        .create(role.session(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(visitor)))
}

#[utoipa::path(
    put,
    path = "/api/admin/visitors/{id}",
    tag = "Visitors",
    params(("id" = Uuid, Path, description = "ID do visitante")),
    request_body = VisitorPayload,
    responses(
        (status = 200, description = "Visitante atualizado", body = Visitor),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Visitante não encontrado"),
        (status = 409, description = "Cédula já cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_visitor(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisitorPayload>,
) -> Result<Json<Visitor>, ApiError> {
    let visitor = app_state
        .visitor_service
        .update(role.session(), id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(visitor))
}

#[utoipa::path(
    delete,
    path = "/api/admin/visitors/{id}",
    tag = "Visitors",
    params(("id" = Uuid, Path, description = "ID do visitante")),
    responses(
        (status = 204, description = "Visitante removido"),
        (status = 404, description = "Visitante não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_visitor(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .visitor_service
        .delete(role.session(), id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
