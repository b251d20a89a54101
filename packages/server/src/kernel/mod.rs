// Kernel - infrastructure seams shared by all domains

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{BrevoAdapter, NullNotifier, ServerDeps};
pub use test_dependencies::{
    InMemoryProfileStore, InMemoryRegistrationStore, MockNotifier, SentEmail,
};
pub use traits::{
    BaseNotifier, BaseProfileStore, BaseRegistrationStore, DeliveryError, StoreError,
};
