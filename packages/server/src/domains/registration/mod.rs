//! Registration domain - idempotent event registration writes.

pub mod ledger;
pub mod models;

pub use ledger::{LedgerError, Registered, RegistrationLedger};
pub use models::{NewRegistration, RegistrationRecord};
