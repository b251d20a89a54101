pub mod health;
pub mod otp;

pub use health::health_handler;
pub use otp::{send_otp_handler, verify_otp_handler};
