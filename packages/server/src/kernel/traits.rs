// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The email
// notifier, profile store, and registration store are external collaborators;
// the core only names the capability it needs from each.
//
// Naming convention: Base* for trait names (e.g., BaseNotifier)

use async_trait::async_trait;

use crate::domains::identity::models::{Profile, ProfilePatch};
use crate::domains::registration::models::{NewRegistration, RegistrationRecord};

/// The notifier was unreachable or rejected the send.
#[derive(Debug, thiserror::Error)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// A collaborator store call failed (transport or backend fault).
#[derive(Debug, Clone, thiserror::Error)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

// =============================================================================
// Notifier Trait (Infrastructure - email delivery)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Send a transactional email. Transport is the adapter's business.
    async fn send(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DeliveryError>;
}

// =============================================================================
// Profile Store Trait (Infrastructure - user profiles)
// =============================================================================

/// Eventually consistent: a `get` right after account creation may return
/// `Ok(None)` even though the profile exists. Callers retry with backoff.
#[async_trait]
pub trait BaseProfileStore: Send + Sync {
    async fn get(&self, uid: &str) -> Result<Option<Profile>, StoreError>;

    /// Merge `patch` into the stored profile.
    async fn set(&self, uid: &str, patch: ProfilePatch) -> Result<(), StoreError>;
}

// =============================================================================
// Registration Store Trait (Infrastructure - registration records)
// =============================================================================

/// Serializes individual document writes but offers no cross-document
/// transactions and no unique constraint; `query` may therefore surface
/// duplicates for one (event, user) pair.
#[async_trait]
pub trait BaseRegistrationStore: Send + Sync {
    async fn query(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Vec<RegistrationRecord>, StoreError>;

    /// Insert a record; the store assigns and returns the id.
    async fn insert(&self, new: NewRegistration) -> Result<String, StoreError>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<RegistrationRecord>, StoreError>;

    async fn list_for_event(&self, event_id: &str) -> Result<Vec<RegistrationRecord>, StoreError>;
}
