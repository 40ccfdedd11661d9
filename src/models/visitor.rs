// src/models/visitor.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Representa um visitante vindo do banco de dados
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: Uuid,

    #[schema(example = "1020304050")]
    pub id_number: String,

    #[schema(example = "María Fernanda Gómez")]
    pub full_name: String,

    #[schema(example = "Constructora Andina")]
    pub company: Option<String>,

    #[schema(value_type = String, format = Date, example = "2026-12-31")]
    pub authorization_expiry: NaiveDate,

    pub authorized: bool,

    pub notes: Option<String>,

    // { "placa_vehiculo": "ABC123", "requiere_escolta": true }
    #[schema(value_type = Object)]
    pub additional_data: Value,

    pub photo_url: Option<String>,

    pub last_entry_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Visitor {
    /// Instante em que a autorização deixa de valer: 00:00 UTC da data gravada.
    pub fn authorization_expires_at(&self) -> DateTime<Utc> {
        self.authorization_expiry.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn additional_value(&self, key: &str) -> Option<&Value> {
        self.additional_data.as_object().and_then(|obj| obj.get(key))
    }
}

/// Resultado da avaliação de acesso. Derivado, nunca persistido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Authorized,
    ExpiredAuthorization,
    Unauthorized,
    NotFound,
}

// Dados validados prontos para gravação (criação e edição)
#[derive(Debug, Clone)]
pub struct VisitorDraft {
    pub id_number: String,
    pub full_name: String,
    pub company: Option<String>,
    pub authorization_expiry: NaiveDate,
    pub authorized: bool,
    pub notes: Option<String>,
    pub additional_data: Map<String, Value>,
}

pub fn validate_digits(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("digits_only").with_message("digits_only".into()))
    }
}

// Payload de criação/edição vindo do painel administrativo
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitorPayload {
    #[validate(custom(function = "validate_digits"))]
    #[schema(example = "1020304050")]
    pub id_number: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "María Fernanda Gómez")]
    pub full_name: String,

    pub company: Option<String>,

    #[schema(value_type = String, format = Date, example = "2026-12-31")]
    pub authorization_expiry: NaiveDate,

    #[serde(default = "default_authorized")]
    pub authorized: bool,

    pub notes: Option<String>,

    #[serde(default)]
    #[schema(value_type = Object, example = json!({"placa_vehiculo": "ABC123"}))]
    pub additional_data: Value,
}

fn default_authorized() -> bool {
    true
}

// Campos vazios do formulário viram None
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl VisitorPayload {
    pub fn into_draft(self, additional_data: Map<String, Value>) -> VisitorDraft {
        VisitorDraft {
            id_number: self.id_number.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            company: non_blank(self.company),
            authorization_expiry: self.authorization_expiry,
            authorized: self.authorized,
            notes: non_blank(self.notes),
            additional_data,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Número de cédula do visitante
    #[serde(default)]
    pub id_number: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VisitorListQuery {
    /// Filtro por cédula, nome ou empresa
    pub q: Option<String>,
}

/// Valor de um campo personalizado pronto para exibição.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayField {
    pub name: String,
    pub label: String,
    pub value: String,
}

// Resposta da consulta pública
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub decision: AccessDecision,
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_notice: Option<String>,
    pub can_register_entry: bool,
    pub visitor: Option<Visitor>,
    pub custom_fields: Vec<DisplayField>,
    pub searched_at: DateTime<Utc>,
}
