//! Idempotent write path for event registrations.
//!
//! The backing store offers plain query/insert with no unique constraint and
//! no compare-and-swap, so the ledger uses check-then-write and serializes
//! registration writes through an in-process guard, which turns the check
//! into a conditional insert within this process. Writers in other processes
//! can still race; a duplicate that becomes visible later is a benign
//! condition handled by read-time deduplication, never a fatal error.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domains::registration::models::{NewRegistration, RegistrationRecord};
use crate::kernel::{BaseRegistrationStore, StoreError};

/// Outcome of a registration attempt. `AlreadyRegistered` is a no-op the
/// caller treats as success, not an error to surface loudly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registered {
    Created(String),
    AlreadyRegistered(String),
}

impl Registered {
    pub fn id(&self) -> &str {
        match self {
            Registered::Created(id) | Registered::AlreadyRegistered(id) => id,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("registration store error: {0}")]
    Store(#[from] StoreError),
}

pub struct RegistrationLedger {
    store: Arc<dyn BaseRegistrationStore>,
    // Serializes check-then-write within this process.
    write_guard: Mutex<()>,
}

impl RegistrationLedger {
    pub fn new(store: Arc<dyn BaseRegistrationStore>) -> Self {
        Self {
            store,
            write_guard: Mutex::new(()),
        }
    }

    /// Register `user_id` for `event_id`, at most once.
    ///
    /// Check-then-write: an existing record short-circuits to
    /// `AlreadyRegistered` with its id; otherwise a new record is inserted
    /// with a server-assigned timestamp. No side effects beyond the store
    /// write - ticket generation is a downstream, best-effort step.
    pub async fn register(&self, event_id: &str, user_id: &str) -> Result<Registered, LedgerError> {
        let _guard = self.write_guard.lock().await;

        let existing = self.store.query(event_id, user_id).await?;
        if let Some(record) = authoritative(existing) {
            info!(
                "user {} already registered for event {} ({})",
                user_id, event_id, record.id
            );
            return Ok(Registered::AlreadyRegistered(record.id));
        }

        let id = self
            .store
            .insert(NewRegistration {
                event_id: event_id.to_string(),
                user_id: user_id.to_string(),
                registered_at: Utc::now(),
            })
            .await?;
        info!("user {} registered for event {} ({})", user_id, event_id, id);
        Ok(Registered::Created(id))
    }

    /// Audit read: the one record that counts for (event_id, user_id).
    ///
    /// If concurrent cross-process writes ever produced duplicates, the
    /// earliest record wins and the rest are ignored.
    pub async fn authoritative_registration(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<RegistrationRecord>, LedgerError> {
        let records = self.store.query(event_id, user_id).await?;
        if records.len() > 1 {
            warn!(
                "{} duplicate registrations for ({}, {}); deduplicating at read",
                records.len(),
                event_id,
                user_id
            );
        }
        Ok(authoritative(records))
    }

    /// All registrations for a user, one per event.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<RegistrationRecord>, LedgerError> {
        let records = self.store.list_by_user(user_id).await?;
        Ok(dedupe_by(records, |r| r.event_id.clone()))
    }

    /// All registrations for an event, one per user. Organizer dashboard read
    /// path.
    pub async fn list_for_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<RegistrationRecord>, LedgerError> {
        let records = self.store.list_for_event(event_id).await?;
        Ok(dedupe_by(records, |r| r.user_id.clone()))
    }
}

/// Earliest record by (registered_at, id); ties broken by id so the pick is
/// stable across readers.
fn authoritative(mut records: Vec<RegistrationRecord>) -> Option<RegistrationRecord> {
    records.sort_by(|a, b| {
        a.registered_at
            .cmp(&b.registered_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    records.into_iter().next()
}

fn dedupe_by<K: std::hash::Hash + Eq>(
    records: Vec<RegistrationRecord>,
    key: impl Fn(&RegistrationRecord) -> K,
) -> Vec<RegistrationRecord> {
    let mut sorted = records;
    sorted.sort_by(|a, b| {
        a.registered_at
            .cmp(&b.registered_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    let mut seen = std::collections::HashSet::new();
    sorted.retain(|r| seen.insert(key(r)));
    sorted
}
