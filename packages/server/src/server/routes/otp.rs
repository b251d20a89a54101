//! OTP wire endpoints.
//!
//! `POST /api/send-otp` and `POST /api/verify-otp`. Client-side validation
//! failures map to 400, delivery/internal failures to 500. Responses carry
//! one human-readable message; internal codes and hashes stay internal.

use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domains::auth::{OtpError, VerifyError};
use crate::server::app::AppState;

/// Only institutional addresses may create accounts.
const ALLOWED_EMAIL_SUFFIX: &str = ".edu.in";

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SendOtpResponse {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            token: None,
            email: None,
        }
    }
}

pub async fn send_otp_handler(
    Extension(state): Extension<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> (StatusCode, Json<SendOtpResponse>) {
    let email = req.email.trim().to_lowercase();
    let name = req.name.trim();

    if email.is_empty() || name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(SendOtpResponse::failure("Email and name are required")),
        );
    }
    if !email.ends_with(ALLOWED_EMAIL_SUFFIX) {
        return (
            StatusCode::BAD_REQUEST,
            Json(SendOtpResponse::failure(
                "Only institutional emails ending in .edu.in are allowed",
            )),
        );
    }

    match state.deps.otp.request_challenge(&email, name).await {
        Ok(issued) => {
            let message = if issued.delivered {
                "Verification code sent"
            } else {
                "Verification simulated"
            };
            (
                StatusCode::OK,
                Json(SendOtpResponse {
                    success: true,
                    message: message.to_string(),
                    token: Some(issued.token),
                    email: Some(email),
                }),
            )
        }
        Err(OtpError::DeliveryFailed(e)) => {
            error!("failed to deliver verification email to {}: {}", email, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendOtpResponse::failure("Failed to send verification email")),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
}

impl VerifyOtpResponse {
    fn new(success: bool, message: &str) -> Self {
        Self {
            success,
            message: message.to_string(),
        }
    }
}

pub async fn verify_otp_handler(
    Extension(state): Extension<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> (StatusCode, Json<VerifyOtpResponse>) {
    let email = req.email.trim().to_lowercase();

    if email.is_empty() || req.code.is_empty() || req.token.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(VerifyOtpResponse::new(
                false,
                "Email, code, and token are required",
            )),
        );
    }

    match state.deps.otp.confirm_challenge(&email, &req.code, &req.token) {
        Ok(()) => (
            StatusCode::OK,
            Json(VerifyOtpResponse::new(true, "Email verified successfully")),
        ),
        Err(e) => {
            let message = match e {
                VerifyError::Expired => "Verification code expired",
                VerifyError::Mismatch => "Invalid verification code",
                VerifyError::Malformed => "Verification token is malformed",
            };
            (
                StatusCode::BAD_REQUEST,
                Json(VerifyOtpResponse::new(false, message)),
            )
        }
    }
}
