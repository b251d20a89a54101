//! Role resolution state machine.
//!
//! A session moves `Init -> AwaitingProfile -> Resolved(role) -> Redirected`
//! (or terminally to `Unavailable` when the profile cannot be fetched). The
//! single-redirect guarantee is structural: navigation is only emitted on the
//! `Resolved -> Redirected` edge, and `Redirected` is terminal, so duplicate
//! or late profile-fetch completions can never re-trigger it.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::common::retry::{retry_with_backoff, RetryPolicy};
use crate::domains::identity::models::{derive_role, Profile, ProfilePatch, UserRole};
use crate::kernel::BaseProfileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Init,
    AwaitingProfile,
    Resolved(UserRole),
    /// Terminal success: the one automatic navigation for this session fired.
    Redirected(UserRole),
    /// Terminal failure: profile could not be fetched; the user must
    /// re-authenticate.
    Unavailable,
}

/// Where the client should be sent once the role is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    OrganizerHome,
    RequestedDestination,
}

/// Identity-provider view of the signed-in user.
#[derive(Debug, Clone)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Completed profile fetch, tagged with the session it was started for.
/// A session only applies outcomes bearing its own id; anything else is a
/// stale completion from a signed-out session and is dropped.
#[derive(Debug, Clone)]
pub struct ProfileFetchOutcome {
    pub session_id: Uuid,
    pub profile: Profile,
}

/// Per-client-run session state, created on sign-in and destroyed on
/// sign-out. Threaded explicitly through the resolver; never global.
#[derive(Debug)]
pub struct Session {
    session_id: Uuid,
    identity: Identity,
    profile: Option<Profile>,
    state: ResolverState,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            identity,
            profile: None,
            state: ResolverState::Init,
        }
    }

    pub fn id(&self) -> Uuid {
        self.session_id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn resolved_role(&self) -> Option<UserRole> {
        match self.state {
            ResolverState::Resolved(role) | ResolverState::Redirected(role) => Some(role),
            _ => None,
        }
    }

    /// Registration UI is gated on this: role resolution must have completed
    /// with the plain-user role before any registration attempt is permitted.
    pub fn can_register(&self) -> bool {
        self.resolved_role() == Some(UserRole::User)
    }

    fn accepts(&self, outcome: &ProfileFetchOutcome) -> bool {
        outcome.session_id == self.session_id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// All fetch attempts failed or the profile genuinely does not exist.
    /// Surfaced to the user; defaulting a role without data risks granting
    /// or denying capability incorrectly.
    #[error("profile unavailable after {attempts} attempts")]
    ProfileUnavailable { attempts: u32 },
}

pub struct RoleResolver {
    profile_store: Arc<dyn BaseProfileStore>,
    retry: RetryPolicy,
}

impl RoleResolver {
    pub fn new(profile_store: Arc<dyn BaseProfileStore>) -> Self {
        Self {
            profile_store,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Drive a session from sign-in to a pinned role and its navigation
    /// intent.
    ///
    /// Returns `Ok(Some(nav))` exactly once per session; `Ok(None)` if the
    /// session already navigated. The fetch tolerates read-after-write lag in
    /// the profile store with a bounded retry.
    pub async fn resolve(&self, session: &mut Session) -> Result<Option<Navigation>, ResolveError> {
        match session.state {
            ResolverState::Init => {}
            ResolverState::Redirected(_) | ResolverState::Resolved(_) => return Ok(None),
            ResolverState::AwaitingProfile => return Ok(None),
            ResolverState::Unavailable => {
                return Err(ResolveError::ProfileUnavailable {
                    attempts: self.retry.max_attempts,
                })
            }
        }

        session.state = ResolverState::AwaitingProfile;
        let session_id = session.session_id;
        let uid = session.identity.uid.clone();

        let fetched = retry_with_backoff(self.retry, |attempt| {
            let store = Arc::clone(&self.profile_store);
            let uid = uid.clone();
            async move {
                if attempt > 1 {
                    debug!("profile fetch attempt {} for {}", attempt, uid);
                }
                store.get(&uid).await
            }
        })
        .await;

        let profile = match fetched {
            Ok(profile) => profile,
            Err(e) => {
                warn!(
                    "profile unavailable for {} after {} attempts: {:?}",
                    uid, e.attempts, e.last_error
                );
                session.state = ResolverState::Unavailable;
                return Err(ResolveError::ProfileUnavailable {
                    attempts: e.attempts,
                });
            }
        };

        let needs_role_persist = profile.role.is_none();
        let navigation = self.apply_completion(
            session,
            ProfileFetchOutcome {
                session_id,
                profile,
            },
        );

        // First derivation: write the role back so the store and the derived
        // view agree. The in-memory pin stays authoritative if this fails.
        if needs_role_persist {
            if let Some(role) = session.resolved_role() {
                if let Err(e) = self
                    .profile_store
                    .set(&uid, ProfilePatch { role: Some(role) })
                    .await
                {
                    warn!("failed to persist derived role for {}: {}", uid, e);
                }
            }
        }

        Ok(navigation)
    }

    /// Apply a completed profile fetch to a session.
    ///
    /// Emits the navigation intent the first time a role is pinned and never
    /// again; stale completions (wrong session id) are discarded without
    /// touching the session.
    pub fn apply_completion(
        &self,
        session: &mut Session,
        outcome: ProfileFetchOutcome,
    ) -> Option<Navigation> {
        if !session.accepts(&outcome) {
            warn!(
                "discarding stale profile fetch for session {} (current {})",
                outcome.session_id, session.session_id
            );
            return None;
        }

        let previous = session.resolved_role().or(outcome.profile.role);
        let role = derive_role(outcome.profile.user_type.as_deref(), previous);

        match session.state {
            ResolverState::Redirected(_) | ResolverState::Unavailable => {
                // Late duplicate: refresh the cached profile, nothing else.
                session.profile = Some(outcome.profile);
                None
            }
            _ => {
                session.profile = Some(outcome.profile);
                session.state = ResolverState::Resolved(role);
                let navigation = match role {
                    UserRole::Organizer => Navigation::OrganizerHome,
                    UserRole::User => Navigation::RequestedDestination,
                };
                session.state = ResolverState::Redirected(role);
                info!(
                    "role pinned for {}: {:?}, navigating once",
                    session.identity.uid, role
                );
                Some(navigation)
            }
        }
    }
}
