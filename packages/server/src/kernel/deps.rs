//! Server dependencies (using traits for testability)
//!
//! Central dependency container wiring the collaborator trait objects into
//! the domain services. Constructed once at startup (or per test harness);
//! nothing in here is a module-level singleton.

use std::sync::Arc;

use async_trait::async_trait;
use brevo::BrevoService;
use chrono::Duration;

use crate::domains::auth::{OtpService, TokenCodec};
use crate::domains::identity::RoleResolver;
use crate::domains::registration::RegistrationLedger;
use crate::kernel::traits::{
    BaseNotifier, BaseProfileStore, BaseRegistrationStore, DeliveryError,
};

// =============================================================================
// BrevoService Adapter (implements BaseNotifier trait)
// =============================================================================

/// Wrapper around BrevoService that implements the BaseNotifier trait
pub struct BrevoAdapter(pub Arc<BrevoService>);

impl BrevoAdapter {
    pub fn new(service: Arc<BrevoService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseNotifier for BrevoAdapter {
    async fn send(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), DeliveryError> {
        self.0
            .send_email(to_email, to_name, subject, html_body)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError(e.to_string()))
    }
}

/// Stand-in notifier for environments without a delivery credential. Every
/// send fails, which routes the OtpService into its simulate-send path.
pub struct NullNotifier;

#[async_trait]
impl BaseNotifier for NullNotifier {
    async fn send(&self, _: &str, _: &str, _: &str, _: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError(
            "no delivery credential configured".to_string(),
        ))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Composition root for the core services.
#[derive(Clone)]
pub struct ServerDeps {
    pub notifier: Arc<dyn BaseNotifier>,
    pub profile_store: Arc<dyn BaseProfileStore>,
    pub registration_store: Arc<dyn BaseRegistrationStore>,
    pub otp: Arc<OtpService>,
    pub role_resolver: Arc<RoleResolver>,
    pub ledger: Arc<RegistrationLedger>,
}

impl ServerDeps {
    pub fn new(
        notifier: Arc<dyn BaseNotifier>,
        profile_store: Arc<dyn BaseProfileStore>,
        registration_store: Arc<dyn BaseRegistrationStore>,
        otp_secret: &str,
        otp_ttl: Duration,
        simulate_send: bool,
    ) -> Self {
        let otp = Arc::new(OtpService::new(
            TokenCodec::new(otp_secret),
            Arc::clone(&notifier),
            otp_ttl,
            simulate_send,
        ));
        let role_resolver = Arc::new(RoleResolver::new(Arc::clone(&profile_store)));
        let ledger = Arc::new(RegistrationLedger::new(Arc::clone(&registration_store)));

        Self {
            notifier,
            profile_store,
            registration_store,
            otp,
            role_resolver,
            ledger,
        }
    }
}
