// src/db/memory.rs

// Implementações em memória dos stores, usadas apenas nos testes.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CustomFieldStore, UserStore, VisitorStore},
    models::{
        auth::{Role, User},
        custom_field::{CustomField, CustomFieldDraft},
        visitor::{Visitor, VisitorDraft},
    },
};

pub fn visitor(id_number: &str, authorized: bool, expiry: NaiveDate) -> Visitor {
    let now = Utc::now();
    Visitor {
        id: Uuid::new_v4(),
        id_number: id_number.to_string(),
        full_name: format!("Visitante {id_number}"),
        company: None,
        authorization_expiry: expiry,
        authorized,
        notes: None,
        additional_data: Value::Object(Map::new()),
        photo_url: None,
        last_entry_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct MemoryVisitorStore {
    visitors: Mutex<Vec<Visitor>>,
}

impl MemoryVisitorStore {
    pub fn with(visitors: Vec<Visitor>) -> Self {
        Self {
            visitors: Mutex::new(visitors),
        }
    }

    pub fn snapshot(&self, id: Uuid) -> Option<Visitor> {
        self.visitors
            .lock()
            .expect("lock")
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    fn apply(&self, id: Uuid, change: impl FnOnce(&mut Visitor)) -> Result<Visitor, AppError> {
        let mut guard = self.visitors.lock().expect("lock");
        let visitor = guard
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(AppError::VisitorNotFound)?;
        change(visitor);
        visitor.updated_at = Utc::now();
        Ok(visitor.clone())
    }
}

fn fill(visitor: &mut Visitor, draft: &VisitorDraft) {
    visitor.id_number = draft.id_number.clone();
    visitor.full_name = draft.full_name.clone();
    visitor.company = draft.company.clone();
    visitor.authorization_expiry = draft.authorization_expiry;
    visitor.authorized = draft.authorized;
    visitor.notes = draft.notes.clone();
    visitor.additional_data = Value::Object(draft.additional_data.clone());
}

#[async_trait]
impl VisitorStore for MemoryVisitorStore {
    async fn list(&self) -> Result<Vec<Visitor>, AppError> {
        let mut visitors = self.visitors.lock().expect("lock").clone();
        visitors.reverse();
        Ok(visitors)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Visitor>, AppError> {
        Ok(self.snapshot(id))
    }

    async fn find_by_id_number(&self, id_number: &str) -> Result<Option<Visitor>, AppError> {
        Ok(self
            .visitors
            .lock()
            .expect("lock")
            .iter()
            .find(|v| v.id_number == id_number)
            .cloned())
    }

    async fn insert(&self, draft: &VisitorDraft) -> Result<Visitor, AppError> {
        let mut guard = self.visitors.lock().expect("lock");
        if guard.iter().any(|v| v.id_number == draft.id_number) {
            return Err(AppError::IdNumberAlreadyExists);
        }
        let mut created = visitor(&draft.id_number, draft.authorized, draft.authorization_expiry);
        fill(&mut created, draft);
        guard.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, draft: &VisitorDraft) -> Result<Visitor, AppError> {
        {
            let guard = self.visitors.lock().expect("lock");
            if guard.iter().any(|v| v.id != id && v.id_number == draft.id_number) {
                return Err(AppError::IdNumberAlreadyExists);
            }
        }
        self.apply(id, |v| fill(v, draft))
    }

    async fn update_photo(&self, id: Uuid, photo_url: &str) -> Result<Visitor, AppError> {
        self.apply(id, |v| v.photo_url = Some(photo_url.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut guard = self.visitors.lock().expect("lock");
        let before = guard.len();
        guard.retain(|v| v.id != id);
        if guard.len() == before {
            return Err(AppError::VisitorNotFound);
        }
        Ok(())
    }

    // Mesmas regras da função register_entry do Postgres
    async fn register_entry(&self, id: Uuid) -> Result<Visitor, AppError> {
        let now = Utc::now();
        let mut guard = self.visitors.lock().expect("lock");
        let visitor = guard
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(AppError::VisitorNotFound)?;

        if !visitor.authorized {
            return Err(AppError::RegistrationDenied("visitor is not authorized".into()));
        }
        if visitor.authorization_expires_at() < now {
            return Err(AppError::RegistrationDenied("authorization expired".into()));
        }

        visitor.last_entry_at = Some(visitor.last_entry_at.map_or(now, |last| last.max(now)));
        visitor.updated_at = now;
        Ok(visitor.clone())
    }
}

/// Store que simula o banco fora do ar.
pub struct UnavailableVisitorStore;

#[async_trait]
impl VisitorStore for UnavailableVisitorStore {
    async fn list(&self) -> Result<Vec<Visitor>, AppError> {
        Err(AppError::StoreUnavailable)
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Visitor>, AppError> {
        Err(AppError::StoreUnavailable)
    }

    async fn find_by_id_number(&self, _id_number: &str) -> Result<Option<Visitor>, AppError> {
        Err(AppError::StoreUnavailable)
    }

    async fn insert(&self, _draft: &VisitorDraft) -> Result<Visitor, AppError> {
        Err(AppError::StoreUnavailable)
    }

    async fn update(&self, _id: Uuid, _draft: &VisitorDraft) -> Result<Visitor, AppError> {
        Err(AppError::StoreUnavailable)
    }

    async fn update_photo(&self, _id: Uuid, _photo_url: &str) -> Result<Visitor, AppError> {
        Err(AppError::StoreUnavailable)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), AppError> {
        Err(AppError::StoreUnavailable)
    }

    async fn register_entry(&self, _id: Uuid) -> Result<Visitor, AppError> {
        Err(AppError::StoreUnavailable)
    }
}

#[derive(Default)]
pub struct MemoryCustomFieldStore {
    fields: Mutex<Vec<CustomField>>,
}

#[async_trait]
impl CustomFieldStore for MemoryCustomFieldStore {
    async fn list(&self) -> Result<Vec<CustomField>, AppError> {
        let mut fields = self.fields.lock().expect("lock").clone();
        // sort_by_key é estável: empates mantêm a ordem de inserção
        fields.sort_by_key(|f| f.display_order);
        Ok(fields)
    }

    async fn insert(&self, draft: &CustomFieldDraft) -> Result<CustomField, AppError> {
        let mut guard = self.fields.lock().expect("lock");
        if guard.iter().any(|f| f.name == draft.name) {
            return Err(AppError::UniqueConstraintViolation(draft.name.clone()));
        }
        let field = CustomField {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            label: draft.label.clone(),
            field_type: draft.field_type,
            required: draft.required,
            display_order: draft.display_order,
            created_at: Utc::now(),
        };
        guard.push(field.clone());
        Ok(field)
    }

    async fn update(&self, id: Uuid, draft: &CustomFieldDraft) -> Result<CustomField, AppError> {
        let mut guard = self.fields.lock().expect("lock");
        if guard.iter().any(|f| f.id != id && f.name == draft.name) {
            return Err(AppError::UniqueConstraintViolation(draft.name.clone()));
        }
        let field = guard
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(AppError::CustomFieldNotFound)?;
        field.name = draft.name.clone();
        field.label = draft.label.clone();
        field.field_type = draft.field_type;
        field.required = draft.required;
        field.display_order = draft.display_order;
        Ok(field.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut guard = self.fields.lock().expect("lock");
        let before = guard.len();
        guard.retain(|f| f.id != id);
        if guard.len() == before {
            return Err(AppError::CustomFieldNotFound);
        }
        Ok(())
    }
}

struct StoredSession {
    id: Uuid,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    sessions: Mutex<Vec<StoredSession>>,
}

impl MemoryUserStore {
    /// Perfil sem linha em user_roles: autentica mas não tem papel.
    pub fn insert_without_role(&self, email: &str, password_hash: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: "Sem Papel".to_string(),
            password_hash: password_hash.to_string(),
            role: None,
            created_at: Utc::now(),
        };
        self.users.lock().expect("lock").push(user.clone());
        user
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .expect("lock")
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .expect("lock")
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.lock().expect("lock").clone())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.users.lock().expect("lock").len() as i64)
    }

    async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let mut guard = self.users.lock().expect("lock");
        if guard.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(AppError::EmailAlreadyExists);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            password_hash: password_hash.to_string(),
            role: Some(role),
            created_at: Utc::now(),
        };
        guard.push(user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        let mut guard = self.users.lock().expect("lock");
        let before = guard.len();
        guard.retain(|u| u.id != id);
        if guard.len() == before {
            return Err(AppError::UserNotFound);
        }
        self.sessions
            .lock()
            .expect("lock")
            .retain(|s| s.user_id != id);
        Ok(())
    }

    async fn create_session(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        self.sessions.lock().expect("lock").push(StoredSession {
            id,
            user_id,
            expires_at,
            revoked: false,
        });
        Ok(id)
    }

    async fn is_session_active(&self, session_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let now = Utc::now();
        Ok(self.sessions.lock().expect("lock").iter().any(|s| {
            s.id == session_id && s.user_id == user_id && !s.revoked && s.expires_at > now
        }))
    }

    async fn revoke_session(&self, session_id: Uuid) -> Result<(), AppError> {
        if let Some(session) = self
            .sessions
            .lock()
            .expect("lock")
            .iter_mut()
            .find(|s| s.id == session_id)
        {
            session.revoked = true;
        }
        Ok(())
    }
}
