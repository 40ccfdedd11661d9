// src/services/custom_field_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        i18n::{self, MessageKey},
    },
    db::CustomFieldStore,
    models::{
        auth::SessionContext,
        custom_field::{CustomField, CustomFieldDraft, CustomFieldPayload, CustomFieldType},
        visitor::DisplayField,
    },
};

#[derive(Clone)]
pub struct CustomFieldService {
    store: Arc<dyn CustomFieldStore>,
}

impl CustomFieldService {
    pub fn new(store: Arc<dyn CustomFieldStore>) -> Self {
        Self { store }
    }

    /// Definições na ordem de exibição (uso interno, sem guarda de papel).
    pub async fn descriptors(&self) -> Result<Vec<CustomField>, AppError> {
        self.store.list().await
    }

    pub async fn list(&self, actor: &SessionContext) -> Result<Vec<CustomField>, AppError> {
        actor.require_admin()?;
        self.store.list().await
    }

    pub async fn create(
        &self,
        actor: &SessionContext,
        payload: CustomFieldPayload,
    ) -> Result<CustomField, AppError> {
        actor.require_admin()?;
        let draft = draft_from_payload(payload)?;

        let field = self.store.insert(&draft).await?;
        tracing::info!("🧩 Campo '{}' criado por {}", field.name, actor.email);
        Ok(field)
    }

    pub async fn update(
        &self,
        actor: &SessionContext,
        id: Uuid,
        payload: CustomFieldPayload,
    ) -> Result<CustomField, AppError> {
        actor.require_admin()?;
        let draft = draft_from_payload(payload)?;
        self.store.update(id, &draft).await
    }

    pub async fn delete(&self, actor: &SessionContext, id: Uuid) -> Result<(), AppError> {
        actor.require_admin()?;
        self.store.delete(id).await?;
        tracing::info!("🧩 Campo {} removido por {}", id, actor.email);
        Ok(())
    }
}

fn draft_from_payload(payload: CustomFieldPayload) -> Result<CustomFieldDraft, AppError> {
    payload.validate()?;

    let name = normalize_field_name(&payload.name);
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(AppError::InvalidFieldName(name));
    }

    Ok(CustomFieldDraft {
        name,
        label: payload.label.trim().to_string(),
        field_type: payload.field_type,
        required: payload.required,
        display_order: payload.display_order,
    })
}

/// "Placa  Vehiculo" -> "placa_vehiculo"
pub fn normalize_field_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn matches_type(field_type: CustomFieldType, value: &Value) -> bool {
    match field_type {
        CustomFieldType::Text | CustomFieldType::Textarea => value.is_string(),
        // Formulários costumam mandar números como texto
        CustomFieldType::Number => match value {
            Value::Number(_) => true,
            Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            _ => false,
        },
        CustomFieldType::Date => value
            .as_str()
            .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
        CustomFieldType::Boolean => value.is_boolean(),
    }
}

fn error_code(field_type: CustomFieldType) -> &'static str {
    match field_type {
        CustomFieldType::Text | CustomFieldType::Textarea => "invalid_text",
        CustomFieldType::Number => "invalid_number",
        CustomFieldType::Date => "invalid_date_format",
        CustomFieldType::Boolean => "invalid_boolean",
    }
}

/// Valida os dados adicionais contra as definições atuais.
///
/// `null` é tratado como objeto vazio. Chaves sem definição são preservadas.
pub fn validate_additional_data(
    definitions: &[CustomField],
    data: Value,
) -> Result<Map<String, Value>, AppError> {
    let obj = match data {
        Value::Null => Map::new(),
        Value::Object(obj) => obj,
        _ => return Err(AppError::CustomDataJson),
    };

    // Mapa de erros: chave do campo -> código do erro
    let mut errors: HashMap<String, String> = HashMap::new();

    for def in definitions {
        let value = obj.get(&def.name);

        match value {
            None => {
                if def.required {
                    errors.insert(def.name.clone(), "required".to_string());
                }
            }
            Some(v) if is_blank(v) => {
                if def.required {
                    errors.insert(def.name.clone(), "required".to_string());
                }
            }
            Some(v) => {
                if !matches_type(def.field_type, v) {
                    errors.insert(def.name.clone(), error_code(def.field_type).to_string());
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(AppError::CustomDataValidationError(errors));
    }

    Ok(obj)
}

/// Valores prontos para exibição, na ordem das definições.
/// Valores vazios e chaves órfãs não aparecem.
pub fn display_fields(definitions: &[CustomField], data: &Value, lang: &str) -> Vec<DisplayField> {
    let Some(obj) = data.as_object() else {
        return Vec::new();
    };

    definitions
        .iter()
        .filter_map(|def| {
            let value = obj.get(&def.name)?;
            if is_blank(value) {
                return None;
            }

            let rendered = match value {
                Value::Bool(true) => i18n::translate(lang, MessageKey::Yes).to_string(),
                Value::Bool(false) => i18n::translate(lang, MessageKey::No).to_string(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };

            Some(DisplayField {
                name: def.name.clone(),
                label: def.label.clone(),
                value: rendered,
            })
        })
        .collect()
}
