use serde::{Deserialize, Serialize};

/// Named email address as Brevo expects it on both sender and recipient side.
#[derive(Debug, Clone, Serialize)]
pub struct EmailAddress {
    pub name: String,
    pub email: String,
}

/// Request body for POST /v3/smtp/email
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub sender: EmailAddress,
    pub to: Vec<EmailAddress>,
    pub subject: String,
    pub html_content: String,
}

/// Successful response from POST /v3/smtp/email
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub message_id: Option<String>,
}
