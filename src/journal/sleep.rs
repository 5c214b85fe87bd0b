use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::JournalError;
use super::identity::IdentityProvider;
use super::store::{DreamStore, StoreError};

/// One night's sleep, logged by the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: String,
    pub owner: String,
    pub date: NaiveDate,
    pub hours_slept: f64,
    /// Subjective quality, 1 (worst) to 5 (best)
    pub quality: u8,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate view over the owner's sleep records.
#[derive(Debug, Clone, Serialize)]
pub struct SleepSummary {
    pub record_count: usize,
    pub average_hours: f64,
    pub average_quality: f64,
}

/// Owner-scoped sleep log over the document store.
pub struct SleepLog {
    store: Arc<dyn DreamStore>,
    identity: Arc<dyn IdentityProvider>,
    collection: String,
}

impl SleepLog {
    pub fn new(store: Arc<dyn DreamStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            identity,
            collection: "sleep".to_string(),
        }
    }

    /// Log a night of sleep. Requires a signed-in owner.
    pub async fn add(
        &self,
        date: NaiveDate,
        hours_slept: f64,
        quality: u8,
        notes: String,
    ) -> Result<SleepRecord, JournalError> {
        if !(0.0..=24.0).contains(&hours_slept) {
            return Err(JournalError::Validation(
                "hours slept must be between 0 and 24".to_string(),
            ));
        }
        if !(1..=5).contains(&quality) {
            return Err(JournalError::Validation(
                "sleep quality must be between 1 and 5".to_string(),
            ));
        }

        let Some(owner) = self.identity.current_owner() else {
            warn!("No signed-in owner; sleep record rejected");
            return Err(JournalError::Anonymous);
        };

        let mut record = SleepRecord {
            id: String::new(),
            owner,
            date,
            hours_slept,
            quality,
            notes,
            created_at: Utc::now(),
        };

        let document =
            serde_json::to_value(&record).map_err(|e| StoreError::Malformed(e.to_string()))?;
        record.id = self.store.create(&self.collection, document).await?;

        info!("Sleep record added for {}", record.date);

        Ok(record)
    }

    /// The owner's records in date order. Anonymous sessions see an empty
    /// log.
    pub async fn list(&self) -> Result<Vec<SleepRecord>, JournalError> {
        let Some(owner) = self.identity.current_owner() else {
            warn!("No signed-in owner; sleep log is empty");
            return Ok(Vec::new());
        };

        let documents = self
            .store
            .query(&self.collection, &owner, "date", false)
            .await?;

        documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value(doc)
                    .map_err(|e| JournalError::Store(StoreError::Malformed(e.to_string())))
            })
            .collect()
    }

    /// Count and averages over the owner's records.
    pub async fn summary(&self) -> Result<SleepSummary, JournalError> {
        let records = self.list().await?;
        if records.is_empty() {
            return Ok(SleepSummary {
                record_count: 0,
                average_hours: 0.0,
                average_quality: 0.0,
            });
        }

        let count = records.len();
        let total_hours: f64 = records.iter().map(|r| r.hours_slept).sum();
        let total_quality: f64 = records.iter().map(|r| r.quality as f64).sum();

        Ok(SleepSummary {
            record_count: count,
            average_hours: total_hours / count as f64,
            average_quality: total_quality / count as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::identity::StaticIdentity;
    use crate::journal::store::MemoryStore;

    fn log_for(owner: Option<&str>) -> SleepLog {
        SleepLog::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StaticIdentity::new(owner.map(String::from))),
        )
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn add_and_list_in_date_order() {
        let log = log_for(Some("ada@example.com"));
        log.add(day("2026-03-10"), 6.0, 2, "woke up several times".into())
            .await
            .unwrap();
        log.add(day("2026-03-09"), 7.5, 4, "slept well".into())
            .await
            .unwrap();

        let records = log.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, day("2026-03-09"));
        assert_eq!(records[1].date, day("2026-03-10"));
    }

    #[tokio::test]
    async fn hours_out_of_range_are_rejected() {
        let log = log_for(Some("ada@example.com"));
        let result = log.add(day("2026-03-09"), 25.0, 3, String::new()).await;
        assert!(matches!(result, Err(JournalError::Validation(_))));
    }

    #[tokio::test]
    async fn quality_out_of_range_is_rejected() {
        let log = log_for(Some("ada@example.com"));
        let result = log.add(day("2026-03-09"), 7.0, 0, String::new()).await;
        assert!(matches!(result, Err(JournalError::Validation(_))));
        let result = log.add(day("2026-03-09"), 7.0, 6, String::new()).await;
        assert!(matches!(result, Err(JournalError::Validation(_))));
    }

    #[tokio::test]
    async fn anonymous_writes_fail_loudly() {
        let log = log_for(None);
        let result = log.add(day("2026-03-09"), 7.0, 3, String::new()).await;
        assert!(matches!(result, Err(JournalError::Anonymous)));
    }

    #[tokio::test]
    async fn anonymous_reads_are_empty_not_demo_data() {
        let log = log_for(None);
        assert!(log.list().await.unwrap().is_empty());
        assert_eq!(log.summary().await.unwrap().record_count, 0);
    }

    #[tokio::test]
    async fn summary_averages_hours_and_quality() {
        let log = log_for(Some("ada@example.com"));
        log.add(day("2026-03-09"), 6.0, 2, String::new()).await.unwrap();
        log.add(day("2026-03-10"), 8.0, 4, String::new()).await.unwrap();

        let summary = log.summary().await.unwrap();
        assert_eq!(summary.record_count, 2);
        assert!((summary.average_hours - 7.0).abs() < f64::EPSILON);
        assert!((summary.average_quality - 3.0).abs() < f64::EPSILON);
    }
}
