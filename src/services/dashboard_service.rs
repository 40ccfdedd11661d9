// src/services/dashboard_service.rs

use std::sync::Arc;

use chrono::{DateTime, Days, Duration, Local, NaiveDate, TimeZone, Utc};
use tokio::sync::broadcast;

use crate::{
    common::error::AppError,
    db::VisitorStore,
    models::{
        auth::SessionContext,
        dashboard::{DailyEntryCount, DashboardStats, VisitorEvent},
        visitor::Visitor,
    },
};

const EXPIRING_SOON_DAYS: i64 = 7;

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn VisitorStore>,
    events: broadcast::Sender<VisitorEvent>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn VisitorStore>, events: broadcast::Sender<VisitorEvent>) -> Self {
        Self { store, events }
    }

    /// Recebe as alterações de visitantes publicadas a partir de agora.
    pub fn subscribe(
        &self,
        actor: &SessionContext,
    ) -> Result<broadcast::Receiver<VisitorEvent>, AppError> {
        actor.require_admin()?;
        Ok(self.events.subscribe())
    }

    pub async fn stats(&self, actor: &SessionContext) -> Result<DashboardStats, AppError> {
        actor.require_admin()?;
        let visitors = self.store.list().await?;
        Ok(compute_stats(&visitors, Utc::now()))
    }

    pub async fn entries(
        &self,
        actor: &SessionContext,
        days: u32,
    ) -> Result<Vec<DailyEntryCount>, AppError> {
        actor.require_admin()?;
        let visitors = self.store.list().await?;
        Ok(daily_entry_histogram(&visitors, Local::now(), days))
    }
}

/// Contadores dos cartões do painel.
pub fn compute_stats(records: &[Visitor], now: DateTime<Utc>) -> DashboardStats {
    let horizon = now + Duration::days(EXPIRING_SOON_DAYS);

    records.iter().fold(DashboardStats::default(), |mut stats, v| {
        stats.total += 1;
        if v.authorized {
            stats.authorized_count += 1;
            let expires_at = v.authorization_expires_at();
            if expires_at >= now && expires_at <= horizon {
                stats.expiring_soon_count += 1;
            }
        } else {
            stats.unauthorized_count += 1;
        }
        if v.last_entry_at.is_some() {
            stats.entered_count += 1;
        }
        stats
    })
}

/// Um balde por dia, do mais antigo até hoje, no fuso de `now`.
pub fn daily_entry_histogram<Tz: TimeZone>(
    records: &[Visitor],
    now: DateTime<Tz>,
    days: u32,
) -> Vec<DailyEntryCount> {
    let tz = now.timezone();
    let today = now.date_naive();

    let dates: Vec<NaiveDate> = (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .collect();

    let mut counts = vec![0usize; dates.len()];
    for entered_at in records.iter().filter_map(|v| v.last_entry_at) {
        let local_day = entered_at.with_timezone(&tz).date_naive();
        if let Ok(idx) = dates.binary_search(&local_day) {
            counts[idx] += 1;
        }
    }

    dates
        .into_iter()
        .zip(counts)
        .map(|(date, count)| DailyEntryCount {
            date,
            label: date.format("%d/%m").to_string(),
            count,
        })
        .collect()
}
