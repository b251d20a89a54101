//! Challenge orchestration: generate a code, sign a token, deliver the email.
//!
//! Stateless by design. Concurrent requests for one email are independent;
//! the client only holds the latest token, so only that one can succeed.
//! Failures are never retried here - a retry is the user requesting a fresh
//! challenge.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::domains::auth::emails;
use crate::domains::auth::token::{generate_code, TokenCodec, VerifyError};
use crate::kernel::{BaseNotifier, DeliveryError};

/// Result of a successful challenge request. `delivered` tells the caller
/// plainly whether a real message went out or the send was simulated.
#[derive(Debug, Clone)]
pub struct ChallengeIssued {
    pub token: String,
    pub delivered: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    /// The notifier was unreachable or rejected the send, and the
    /// simulate-send fallback is disabled. Retried only by explicit user
    /// action.
    #[error("failed to deliver verification email")]
    DeliveryFailed(#[from] DeliveryError),
}

pub struct OtpService {
    codec: TokenCodec,
    notifier: Arc<dyn BaseNotifier>,
    ttl: Duration,
    /// When the delivery credential is absent (development), a failed send
    /// still yields a usable token with `delivered = false`.
    simulate_send: bool,
}

impl OtpService {
    pub fn new(
        codec: TokenCodec,
        notifier: Arc<dyn BaseNotifier>,
        ttl: Duration,
        simulate_send: bool,
    ) -> Self {
        Self {
            codec,
            notifier,
            ttl,
            simulate_send,
        }
    }

    /// Issue a challenge for `email` and deliver the code.
    pub async fn request_challenge(
        &self,
        email: &str,
        name: &str,
    ) -> Result<ChallengeIssued, OtpError> {
        let code = generate_code();
        let token = self
            .codec
            .issue(email, &code, Utc::now().timestamp_millis(), self.ttl);

        let subject = emails::verification_subject();
        let body = emails::verification_body(name, &code, self.ttl.num_minutes());

        match self.notifier.send(email, name, subject, &body).await {
            Ok(()) => {
                info!("verification code sent to {}", email);
                Ok(ChallengeIssued {
                    token,
                    delivered: true,
                })
            }
            Err(e) if self.simulate_send => {
                warn!("notifier unavailable, simulating send to {}: {}", email, e);
                Ok(ChallengeIssued {
                    token,
                    delivered: false,
                })
            }
            Err(e) => Err(OtpError::DeliveryFailed(e)),
        }
    }

    /// Verify a (email, code, token) triple against the current clock.
    pub fn confirm_challenge(
        &self,
        email: &str,
        code: &str,
        token: &str,
    ) -> Result<(), VerifyError> {
        self.codec
            .verify(email, code, token, Utc::now().timestamp_millis())
    }
}
