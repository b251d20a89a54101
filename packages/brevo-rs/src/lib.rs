// https://developers.brevo.com/reference/sendtransacemail

pub mod models;

use reqwest::{header, Client};

use crate::models::{EmailAddress, SendEmailRequest, SendEmailResponse};

#[derive(Debug, Clone)]
pub struct BrevoOptions {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: String,
}

#[derive(Debug, Clone)]
pub struct BrevoService {
    options: BrevoOptions,
}

impl BrevoService {
    pub fn new(options: BrevoOptions) -> Self {
        Self { options }
    }

    pub async fn send_email(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<SendEmailResponse, &'static str> {
        let url = "https://api.brevo.com/v3/smtp/email";

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "accept",
            "application/json"
                .parse()
                .expect("Header value should parse correctly"),
        );
        headers.insert(
            "api-key",
            self.options
                .api_key
                .parse()
                .map_err(|_| "Invalid Brevo API key")?,
        );

        let body = SendEmailRequest {
            sender: EmailAddress {
                name: self.options.sender_name.clone(),
                email: self.options.sender_email.clone(),
            },
            to: vec![EmailAddress {
                name: to_name.to_string(),
                email: to_email.to_string(),
            }],
            subject: subject.to_string(),
            html_content: html_body.to_string(),
        };

        let client = Client::new();
        let res = client.post(url).headers(headers).json(&body).send().await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    // Log the error response from Brevo
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("Brevo error ({}): {}", status, error_body);
                    return Err("Brevo returned an error");
                }

                let result = response.json::<SendEmailResponse>().await;
                match result {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        eprintln!("Failed to parse Brevo response: {}", e);
                        Err("Error parsing send response")
                    }
                }
            }
            Err(e) => {
                eprintln!("Request to Brevo failed: {}", e);
                Err("Error sending email")
            }
        }
    }
}
