// src/models/custom_field.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE custom_field_type do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "custom_field_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    Text,
    Textarea,
    Number,
    Date,
    Boolean,
}

// Definição de um campo adicional do visitante (o "molde")
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: Uuid,

    #[schema(example = "placa_vehiculo")]
    pub name: String,

    #[schema(example = "Placa del vehículo")]
    pub label: String,

    pub field_type: CustomFieldType,

    pub required: bool,

    #[schema(example = 0)]
    pub display_order: i32,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CustomFieldDraft {
    pub name: String,
    pub label: String,
    pub field_type: CustomFieldType,
    pub required: bool,
    pub display_order: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldPayload {
    #[validate(length(min = 1, max = 64, message = "required"))]
    #[schema(example = "Placa Vehiculo")]
    pub name: String,

    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Placa del vehículo")]
    pub label: String,

    #[serde(default = "default_field_type")]
    pub field_type: CustomFieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub display_order: i32,
}

fn default_field_type() -> CustomFieldType {
    CustomFieldType::Text
}
