use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Signing key for stateless OTP tokens. Rotating it invalidates all
    /// outstanding tokens, which is acceptable at a 5-minute TTL.
    pub otp_secret: String,
    pub otp_ttl_seconds: i64,
    /// Brevo delivery credential. When absent, sends are simulated and the
    /// caller is told no real message went out.
    pub brevo_api_key: Option<String>,
    pub sender_email: String,
    pub sender_name: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            otp_secret: env::var("OTP_SECRET").context("OTP_SECRET must be set")?,
            otp_ttl_seconds: env::var("OTP_TTL_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .context("OTP_TTL_SECONDS must be a valid number")?,
            brevo_api_key: env::var("BREVO_API_KEY").ok(),
            sender_email: env::var("SENDER_EMAIL")
                .unwrap_or_else(|_| "no-reply@campus-events.local".to_string()),
            sender_name: env::var("SENDER_NAME").unwrap_or_else(|_| "Campus Events".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}
