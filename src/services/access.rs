// src/services/access.rs

use chrono::{DateTime, Utc};

use crate::models::visitor::{AccessDecision, Visitor};

/// Decide o acesso de um visitante no instante `now`.
///
/// A validade termina às 00:00 UTC da data de expiração; a comparação é
/// feita instante a instante (`expiração < now` significa vencida).
pub fn evaluate(record: Option<&Visitor>, now: DateTime<Utc>) -> AccessDecision {
    let Some(visitor) = record else {
        return AccessDecision::NotFound;
    };

    if !visitor.authorized {
        return AccessDecision::Unauthorized;
    }

    if visitor.authorization_expires_at() < now {
        AccessDecision::ExpiredAuthorization
    } else {
        AccessDecision::Authorized
    }
}

/// A data de expiração já passou (independente do flag `authorized`).
pub fn is_expired(visitor: &Visitor, now: DateTime<Utc>) -> bool {
    visitor.authorization_expires_at() < now
}
