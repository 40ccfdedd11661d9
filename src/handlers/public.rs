// src/handlers/public.rs

// Superfície pública da portaria: consulta por cédula e registro de ingresso.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::visitor::{SearchOutcome, SearchQuery, Visitor},
};

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Public",
    responses((status = 200, description = "Serviço no ar", body = String))
)]
pub async fn health() -> &'static str {
    "OK"
}

// GET /api/public/visitors/search?idNumber=...
#[utoipa::path(
    get,
    path = "/api/public/visitors/search",
    tag = "Public",
    params(SearchQuery),
    responses(
        (status = 200, description = "Resultado da consulta (inclusive não encontrado)", body = SearchOutcome),
        (status = 400, description = "Cédula vazia"),
        (status = 503, description = "Banco indisponível")
    )
)]
pub async fn search_visitor(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchOutcome>, ApiError> {
    let outcome = app_state
        .visitor_service
        .search(&query.id_number, &locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(outcome))
}

// POST /api/public/visitors/{id}/entry
#[utoipa::path(
    post,
    path = "/api/public/visitors/{id}/entry",
    tag = "Public",
    params(("id" = Uuid, Path, description = "ID do visitante")),
    responses(
        (status = 200, description = "Ingresso registrado", body = Visitor),
        (status = 404, description = "Visitante não encontrado"),
        (status = 422, description = "Ingresso recusado pelo banco"),
        (status = 503, description = "Banco indisponível")
    )
)]
pub async fn register_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Visitor>, ApiError> {
    let visitor = app_state
        .visitor_service
        .register_entry(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(visitor))
}
