// src/services/visitor_service.rs

use std::sync::Arc;

use axum::body::Bytes;
use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        i18n::{self, MessageKey},
    },
    db::VisitorStore,
    models::{
        auth::SessionContext,
        dashboard::{VisitorChange, VisitorEvent},
        visitor::{AccessDecision, SearchOutcome, Visitor, VisitorPayload},
    },
    services::{
        access,
        custom_field_service::{self, CustomFieldService},
        photo_storage::{self, PhotoStorage},
    },
};

#[derive(Clone)]
pub struct VisitorService {
    store: Arc<dyn VisitorStore>,
    fields: CustomFieldService,
    photos: Arc<dyn PhotoStorage>,
    events: broadcast::Sender<VisitorEvent>,
}

impl VisitorService {
    pub fn new(
        store: Arc<dyn VisitorStore>,
        fields: CustomFieldService,
        photos: Arc<dyn PhotoStorage>,
        events: broadcast::Sender<VisitorEvent>,
    ) -> Self {
        Self {
            store,
            fields,
            photos,
            events,
        }
    }

    fn publish(&self, change: VisitorChange, visitor_id: Uuid) {
        // Sem painel aberto não há receptores; o envio falha e tudo bem
        let _ = self.events.send(VisitorEvent {
            change,
            visitor_id,
            at: Utc::now(),
        });
    }

    // =========================================================================
    //  SUPERFÍCIE PÚBLICA
    // =========================================================================

    /// Consulta por cédula. Apenas leitura.
    pub async fn search(&self, id_number: &str, lang: &str) -> Result<SearchOutcome, AppError> {
        let id_number = id_number.trim();
        if id_number.is_empty() {
            return Err(AppError::EmptyIdNumber);
        }

        let record = self.store.find_by_id_number(id_number).await?;
        let now = Utc::now();
        let decision = access::evaluate(record.as_ref(), now);

        tracing::info!("🔎 Consulta de cédula: {:?}", decision);

        let (headline, detail) = match decision {
            AccessDecision::Authorized => (MessageKey::HeadlineAuthorized, None),
            AccessDecision::NotFound => (
                MessageKey::HeadlineNotFound,
                Some(i18n::translate(lang, MessageKey::NotFoundDetail).to_string()),
            ),
            AccessDecision::ExpiredAuthorization | AccessDecision::Unauthorized => {
                (MessageKey::HeadlineDenied, None)
            }
        };

        // O aviso de vencimento aparece também para visitantes não autorizados
        let expired_notice = record
            .as_ref()
            .filter(|v| access::is_expired(v, now))
            .map(|_| i18n::translate(lang, MessageKey::ExpiredNotice).to_string());

        let custom_fields = match &record {
            Some(visitor) => {
                let definitions = self.fields.descriptors().await?;
                custom_field_service::display_fields(&definitions, &visitor.additional_data, lang)
            }
            None => Vec::new(),
        };

        Ok(SearchOutcome {
            decision,
            headline: i18n::translate(lang, headline).to_string(),
            detail,
            expired_notice,
            can_register_entry: decision == AccessDecision::Authorized,
            visitor: record,
            custom_fields,
            searched_at: now,
        })
    }

    /// Registra o ingresso. Confia na avaliação prévia do chamador;
    /// o armazenamento pode recusar por conta própria.
    pub async fn register_entry(&self, id: Uuid) -> Result<Visitor, AppError> {
        let visitor = self.store.register_entry(id).await?;
        tracing::info!("🚪 Ingresso registrado para o visitante {}", visitor.id);
        self.publish(VisitorChange::EntryRegistered, visitor.id);
        Ok(visitor)
    }

    // =========================================================================
    //  PAINEL ADMINISTRATIVO
    // =========================================================================

    pub async fn list(
        &self,
        actor: &SessionContext,
        query: Option<&str>,
    ) -> Result<Vec<Visitor>, AppError> {
        actor.require_admin()?;
        let visitors = self.store.list().await?;

        Ok(match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => filter_visitors(visitors, q),
            None => visitors,
        })
    }

    pub async fn get(&self, actor: &SessionContext, id: Uuid) -> Result<Visitor, AppError> {
        actor.require_admin()?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::VisitorNotFound)
    }

    pub async fn create(
        &self,
        actor: &SessionContext,
        mut payload: VisitorPayload,
    ) -> Result<Visitor, AppError> {
        actor.require_admin()?;
        payload.id_number = payload.id_number.trim().to_string();
        payload.validate()?;

        let definitions = self.fields.descriptors().await?;
        let additional =
            custom_field_service::validate_additional_data(&definitions, payload.additional_data.take())?;

        let visitor = self.store.insert(&payload.into_draft(additional)).await?;
        tracing::info!("👤 Visitante {} criado por {}", visitor.id, actor.email);
        self.publish(VisitorChange::Created, visitor.id);
        Ok(visitor)
    }

    pub async fn update(
        &self,
        actor: &SessionContext,
        id: Uuid,
        mut payload: VisitorPayload,
    ) -> Result<Visitor, AppError> {
        actor.require_admin()?;
        payload.id_number = payload.id_number.trim().to_string();
        payload.validate()?;

        let definitions = self.fields.descriptors().await?;
        let additional =
            custom_field_service::validate_additional_data(&definitions, payload.additional_data.take())?;

        let visitor = self.store.update(id, &payload.into_draft(additional)).await?;
        tracing::info!("👤 Visitante {} atualizado por {}", visitor.id, actor.email);
        self.publish(VisitorChange::Updated, visitor.id);
        Ok(visitor)
    }

    pub async fn delete(&self, actor: &SessionContext, id: Uuid) -> Result<(), AppError> {
        actor.require_admin()?;
        self.store.delete(id).await?;
        tracing::info!("👤 Visitante {} removido por {}", id, actor.email);
        self.publish(VisitorChange::Deleted, id);
        Ok(())
    }

    pub async fn upload_photo(
        &self,
        actor: &SessionContext,
        id: Uuid,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<Visitor, AppError> {
        actor.require_admin()?;
        let extension = photo_storage::extension_for(content_type)?;

        let visitor = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AppError::VisitorNotFound)?;

        let file_name = format!(
            "{}-{}.{}",
            visitor.id_number,
            Utc::now().timestamp_millis(),
            extension
        );
        let public_url = self.photos.upload(&file_name, bytes).await?;

        let visitor = self.store.update_photo(id, &public_url).await?;
        self.publish(VisitorChange::PhotoUpdated, visitor.id);
        Ok(visitor)
    }

    pub async fn read_photo(&self, path: &str) -> Result<Option<Bytes>, AppError> {
        self.photos.read(path).await
    }
}

/// Filtro do painel: cédula, nome ou empresa, sem diferenciar maiúsculas.
pub fn filter_visitors(visitors: Vec<Visitor>, query: &str) -> Vec<Visitor> {
    let needle = query.to_lowercase();
    visitors
        .into_iter()
        .filter(|v| {
            v.id_number.to_lowercase().contains(&needle)
                || v.full_name.to_lowercase().contains(&needle)
                || v
                    .company
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}
