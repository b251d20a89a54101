//! Signed OTP tokens.
//!
//! Wire format: `"<hex-hmac>.<expiry-epoch-ms>"` where the MAC covers
//! `email + "." + code + "." + expiry`. Validity is purely a function of the
//! signature matching and the clock; nothing is stored, so a challenge cannot
//! be revoked early and an attacker without the secret cannot forge one.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// OTP token verification failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// Token shape is wrong (missing separator, non-numeric expiry).
    /// The user must restart the flow.
    #[error("verification token is malformed")]
    Malformed,

    /// The challenge timed out; the user must request a fresh code.
    #[error("verification code expired")]
    Expired,

    /// Signature does not match the supplied (email, code, expiry).
    #[error("invalid verification code")]
    Mismatch,
}

/// Issues and verifies signed OTP tokens. Stateless; the secret is read-only
/// after startup, so a single codec can be shared freely.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Build a token for (email, code) expiring `ttl` after `now_ms`.
    /// Deterministic: same inputs always produce the same token.
    pub fn issue(&self, email: &str, code: &str, now_ms: i64, ttl: chrono::Duration) -> String {
        let expires_at_ms = now_ms + ttl.num_milliseconds();
        let sig = self.signature(email, code, expires_at_ms);
        format!("{}.{}", sig, expires_at_ms)
    }

    /// Check a token against (email, code) at time `now_ms`.
    ///
    /// Order: shape, then expiry, then constant-time MAC comparison.
    pub fn verify(
        &self,
        email: &str,
        code: &str,
        token: &str,
        now_ms: i64,
    ) -> Result<(), VerifyError> {
        let (sig_hex, expiry) = token.split_once('.').ok_or(VerifyError::Malformed)?;
        let expires_at_ms: i64 = expiry.parse().map_err(|_| VerifyError::Malformed)?;

        if now_ms > expires_at_ms {
            return Err(VerifyError::Expired);
        }

        // A corrupted signature is a mismatch whether or not it still decodes
        // as hex; shape errors cover only the separator and the expiry.
        let sig = hex::decode(sig_hex).map_err(|_| VerifyError::Mismatch)?;

        // new_from_slice accepts any key length for SHA256
        let mut mac = <HmacSha256>::new_from_slice(&self.secret)
            .map_err(|_| VerifyError::Malformed)?;
        mac.update(payload(email, code, expires_at_ms).as_bytes());
        mac.verify_slice(&sig).map_err(|_| VerifyError::Mismatch)
    }

    fn signature(&self, email: &str, code: &str, expires_at_ms: i64) -> String {
        let mut mac = match <HmacSha256>::new_from_slice(&self.secret) {
            Ok(m) => m,
            Err(_) => return String::new(), // Unreachable: any key length is valid
        };
        mac.update(payload(email, code, expires_at_ms).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

fn payload(email: &str, code: &str, expires_at_ms: i64) -> String {
    format!("{}.{}.{}", email, code, expires_at_ms)
}

/// Draw a fixed-width 6-digit code, uniform over [100000, 999999].
pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    code.to_string()
}
