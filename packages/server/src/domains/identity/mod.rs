//! Identity domain - role resolution after identity-provider sign-in.
//!
//! Sign-in itself happens against an external identity provider; this domain
//! owns what comes after: fetching the profile (tolerating read-after-write
//! lag), deriving and pinning the role, and emitting at most one navigation
//! intent per session.

pub mod models;
pub mod resolver;

pub use models::{derive_role, Profile, ProfilePatch, UserRole};
pub use resolver::{
    Identity, Navigation, ProfileFetchOutcome, ResolveError, ResolverState, RoleResolver, Session,
};
