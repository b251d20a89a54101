//! Auth domain - stateless email OTP verification.
//!
//! Proves ownership of an email address before account creation without
//! keeping any server-side challenge record: the token handed to the client
//! is a keyed MAC over (email, code, expiry) that only the holder of the
//! process-wide secret can mint.
//!
//! Responsibilities:
//! - Signed OTP token issue/verify (TokenCodec)
//! - Challenge orchestration and email delivery (OtpService)

pub mod emails;
pub mod service;
pub mod token;

pub use service::{ChallengeIssued, OtpError, OtpService};
pub use token::{TokenCodec, VerifyError};
