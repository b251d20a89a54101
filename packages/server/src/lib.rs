// Campus Events API Core
//
// Identity & registration integrity layer for the campus-events platform:
// stateless email OTP verification, role resolution after identity-provider
// sign-in, and idempotent event registration. Event CRUD and UI rendering
// live elsewhere; the backing document stores and the email notifier are
// external collaborators behind trait seams in `kernel`.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
