// src/models/dashboard.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// 1. Cartões do topo do painel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub authorized_count: usize,
    pub unauthorized_count: usize,
    pub expiring_soon_count: usize,
    pub entered_count: usize,
}

// 2. Gráfico de ingressos por dia
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntryCount {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    #[schema(example = "16/10")]
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Deserialize, Validate, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistogramQuery {
    /// Quantidade de dias (padrão 7)
    #[validate(range(min = 1, max = 90, message = "out_of_range"))]
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    7
}

// 3. Atualização em tempo real do painel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisitorChange {
    Created,
    Updated,
    Deleted,
    PhotoUpdated,
    EntryRegistered,
}

/// Aviso enviado pelo stream `/api/admin/dashboard/events` a cada alteração de visitante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitorEvent {
    pub change: VisitorChange,
    pub visitor_id: Uuid,
    pub at: DateTime<Utc>,
}
