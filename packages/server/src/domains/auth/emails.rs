//! Verification email content.

pub fn verification_subject() -> &'static str {
    "Your verification code"
}

/// Minimal HTML body for the OTP email. The code is the only dynamic secret
/// in here; it goes to the recipient and nowhere else.
pub fn verification_body(name: &str, code: &str, ttl_minutes: i64) -> String {
    format!(
        r#"<html>
  <body style="font-family: sans-serif; color: #1f2937;">
    <h2>Verify your email address</h2>
    <p>Hi {name},</p>
    <p>Use the code below to finish creating your account:</p>
    <p style="font-size: 32px; font-weight: bold; letter-spacing: 8px; font-family: monospace;">{code}</p>
    <p>This code expires in <strong>{ttl_minutes} minutes</strong>.
       If you didn't request it, you can ignore this email.</p>
  </body>
</html>"#
    )
}
