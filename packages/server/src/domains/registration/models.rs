//! Registration domain data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored registration. At most one live record should exist per
/// (event_id, user_id) pair; see `RegistrationLedger` for how that is held up
/// without a store-level unique constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub registered_at: DateTime<Utc>,
}

/// A registration about to be inserted; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegistration {
    pub event_id: String,
    pub user_id: String,
    pub registered_at: DateTime<Utc>,
}
