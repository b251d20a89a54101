// TestDependencies - mock implementations for testing
//
// In-memory collaborators that can be injected into ServerDeps for tests.
// They record calls so tests can assert on what the core asked them to do.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domains::identity::models::{Profile, ProfilePatch};
use crate::domains::registration::models::{NewRegistration, RegistrationRecord};
use crate::kernel::traits::{
    BaseNotifier, BaseProfileStore, BaseRegistrationStore, DeliveryError, StoreError,
};

// =============================================================================
// Mock Notifier
// =============================================================================

/// One captured send call
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails, as if the provider rejected the credential.
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn was_sent_to(&self, email: &str) -> bool {
        self.sent.lock().unwrap().iter().any(|s| s.to_email == email)
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn send(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError("mock notifier set to fail".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to_email: to_email.to_string(),
            to_name: to_name.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// In-Memory Profile Store
// =============================================================================

pub struct InMemoryProfileStore {
    profiles: Arc<Mutex<HashMap<String, Profile>>>,
    /// First N gets return Ok(None) regardless of contents, simulating
    /// read-after-write lag.
    hidden_gets_remaining: Arc<Mutex<u32>>,
    /// First N gets fail outright, simulating a store outage.
    failing_gets_remaining: Arc<Mutex<u32>>,
    get_calls: Arc<Mutex<u32>>,
    set_calls: Arc<Mutex<Vec<(String, ProfilePatch)>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(HashMap::new())),
            hidden_gets_remaining: Arc::new(Mutex::new(0)),
            failing_gets_remaining: Arc::new(Mutex::new(0)),
            get_calls: Arc::new(Mutex::new(0)),
            set_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.uid.clone(), profile);
        self
    }

    /// Hide stored profiles from the first `n` gets (read-after-write lag).
    pub fn hiding_first(self, n: u32) -> Self {
        *self.hidden_gets_remaining.lock().unwrap() = n;
        self
    }

    /// Fail the first `n` gets (store outage).
    pub fn failing_first(self, n: u32) -> Self {
        *self.failing_gets_remaining.lock().unwrap() = n;
        self
    }

    pub fn get_calls(&self) -> u32 {
        *self.get_calls.lock().unwrap()
    }

    pub fn set_calls(&self) -> Vec<(String, ProfilePatch)> {
        self.set_calls.lock().unwrap().clone()
    }

    pub fn stored(&self, uid: &str) -> Option<Profile> {
        self.profiles.lock().unwrap().get(uid).cloned()
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseProfileStore for InMemoryProfileStore {
    async fn get(&self, uid: &str) -> Result<Option<Profile>, StoreError> {
        *self.get_calls.lock().unwrap() += 1;

        {
            let mut failing = self.failing_gets_remaining.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(StoreError("simulated outage".to_string()));
            }
        }
        {
            let mut hidden = self.hidden_gets_remaining.lock().unwrap();
            if *hidden > 0 {
                *hidden -= 1;
                return Ok(None);
            }
        }

        Ok(self.profiles.lock().unwrap().get(uid).cloned())
    }

    async fn set(&self, uid: &str, patch: ProfilePatch) -> Result<(), StoreError> {
        self.set_calls
            .lock()
            .unwrap()
            .push((uid.to_string(), patch.clone()));

        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(uid)
            .ok_or_else(|| StoreError(format!("no profile for {}", uid)))?;
        if let Some(role) = patch.role {
            profile.role = Some(role);
        }
        Ok(())
    }
}

// =============================================================================
// In-Memory Registration Store
// =============================================================================

/// Plain append-only store: no unique constraint, duplicates are the
/// caller's problem, exactly like the real document store.
pub struct InMemoryRegistrationStore {
    records: Arc<Mutex<Vec<RegistrationRecord>>>,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Seed a record directly, bypassing the ledger (e.g. a duplicate written
    /// by another process).
    pub fn seed(&self, record: RegistrationRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn all(&self) -> Vec<RegistrationRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for InMemoryRegistrationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRegistrationStore for InMemoryRegistrationStore {
    async fn query(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Vec<RegistrationRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id && r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, new: NewRegistration) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.records.lock().unwrap().push(RegistrationRecord {
            id: id.clone(),
            event_id: new.event_id,
            user_id: new.user_id,
            registered_at: new.registered_at,
        });
        Ok(id)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<RegistrationRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_for_event(&self, event_id: &str) -> Result<Vec<RegistrationRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }
}
