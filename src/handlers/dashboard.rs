// src/handlers/dashboard.rs

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{AnyAdmin, RequireRole},
    },
    models::dashboard::{DailyEntryCount, DashboardStats, HistogramQuery, VisitorEvent},
};

// GET /api/admin/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contadores do painel", body = DashboardStats),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Sem papel administrativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = app_state
        .dashboard_service
        .stats(role.session())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(stats))
}

// GET /api/admin/dashboard/entries?days=7
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/entries",
    tag = "Dashboard",
    params(HistogramQuery),
    responses(
        (status = 200, description = "Ingressos por dia, do mais antigo ao mais recente", body = Vec<DailyEntryCount>),
        (status = 400, description = "Quantidade de dias fora do intervalo 1..=90")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_entries(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
    Query(query): Query<HistogramQuery>,
) -> Result<Json<Vec<DailyEntryCount>>, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let entries = app_state
        .dashboard_service
        .entries(role.session(), query.days)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(entries))
}

// GET /api/admin/dashboard/events (text/event-stream)
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/events",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Stream SSE `visitor_changed`; cada evento traz um VisitorEvent em JSON",
            body = VisitorEvent, content_type = "text/event-stream"),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Sem papel administrativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_events(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<AnyAdmin>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let receiver = app_state
        .dashboard_service
        .subscribe(role.session())
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("📡 Painel conectado ao stream de eventos: {}", role.session().email);

    let events = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let data = serde_json::to_string(&event).unwrap_or_default();
                    let frame = Event::default().event("visitor_changed").data(data);
                    return Some((Ok::<_, Infallible>(frame), receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Stream do painel atrasado, {} eventos descartados", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
