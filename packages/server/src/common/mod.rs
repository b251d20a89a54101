// Common types and utilities shared across the application

pub mod retry;

pub use retry::{retry_with_backoff, RetryError, RetryPolicy};
