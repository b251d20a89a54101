//! Role resolution: retry behavior, the single-redirect guarantee, and
//! discarding of stale fetch completions after sign-out.

use std::sync::Arc;
use std::time::Duration;

use server_core::common::RetryPolicy;
use server_core::domains::identity::{
    Identity, Navigation, Profile, ProfileFetchOutcome, ResolveError, ResolverState, RoleResolver,
    Session, UserRole,
};
use server_core::kernel::InMemoryProfileStore;

fn identity(uid: &str) -> Identity {
    Identity {
        uid: uid.to_string(),
        email: format!("{}@univ.edu.in", uid),
    }
}

fn fast_retries() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO)
}

#[tokio::test]
async fn organizer_profile_pins_organizer_and_navigates_home() {
    let store = Arc::new(
        InMemoryProfileStore::new()
            .with_profile(Profile::new("u1", "Club Account", "club@univ.edu.in").with_user_type("host")),
    );
    let resolver = RoleResolver::new(store).with_retry_policy(fast_retries());
    let mut session = Session::new(identity("u1"));

    let nav = resolver.resolve(&mut session).await.unwrap();
    assert_eq!(nav, Some(Navigation::OrganizerHome));
    assert_eq!(session.state(), ResolverState::Redirected(UserRole::Organizer));
    assert_eq!(session.resolved_role(), Some(UserRole::Organizer));
    assert_eq!(session.identity().uid, "u1");
    assert!(!session.can_register());
}

#[tokio::test]
async fn plain_user_navigates_to_requested_destination() {
    let store = Arc::new(
        InMemoryProfileStore::new()
            .with_profile(Profile::new("u2", "Alice", "alice@univ.edu.in").with_user_type("user")),
    );
    let resolver = RoleResolver::new(store).with_retry_policy(fast_retries());
    let mut session = Session::new(identity("u2"));

    let nav = resolver.resolve(&mut session).await.unwrap();
    assert_eq!(nav, Some(Navigation::RequestedDestination));
    assert!(session.can_register());
}

#[tokio::test]
async fn profile_visible_on_third_attempt_still_resolves() {
    // Read-after-write lag: the store hides the profile from the first two
    // reads.
    let store = Arc::new(
        InMemoryProfileStore::new()
            .with_profile(Profile::new("u3", "Alice", "alice@univ.edu.in").with_user_type("user"))
            .hiding_first(2),
    );
    let resolver = RoleResolver::new(Arc::clone(&store) as _).with_retry_policy(fast_retries());
    let mut session = Session::new(identity("u3"));

    let nav = resolver.resolve(&mut session).await.unwrap();
    assert_eq!(nav, Some(Navigation::RequestedDestination));
    assert_eq!(store.get_calls(), 3);
}

#[tokio::test]
async fn store_outage_then_recovery_still_resolves() {
    let store = Arc::new(
        InMemoryProfileStore::new()
            .with_profile(Profile::new("u4", "Alice", "alice@univ.edu.in").with_user_type("user"))
            .failing_first(2),
    );
    let resolver = RoleResolver::new(store).with_retry_policy(fast_retries());
    let mut session = Session::new(identity("u4"));

    assert!(resolver.resolve(&mut session).await.unwrap().is_some());
}

#[tokio::test]
async fn exhausted_attempts_are_terminal_for_the_session() {
    let store = Arc::new(InMemoryProfileStore::new()); // no profile at all
    let resolver = RoleResolver::new(Arc::clone(&store) as _).with_retry_policy(fast_retries());
    let mut session = Session::new(identity("missing"));

    let err = resolver.resolve(&mut session).await.unwrap_err();
    assert!(matches!(err, ResolveError::ProfileUnavailable { attempts: 3 }));
    assert_eq!(session.state(), ResolverState::Unavailable);
    assert_eq!(store.get_calls(), 3);

    // Still terminal on a second call; the user must re-authenticate.
    assert!(resolver.resolve(&mut session).await.is_err());
    assert_eq!(store.get_calls(), 3);
}

#[tokio::test]
async fn five_duplicate_completions_emit_exactly_one_navigation() {
    let profile = Profile::new("u5", "Club Account", "club@univ.edu.in").with_user_type("host");
    let store = Arc::new(InMemoryProfileStore::new().with_profile(profile.clone()));
    let resolver = RoleResolver::new(store).with_retry_policy(fast_retries());
    let mut session = Session::new(identity("u5"));

    let mut navigations = 0;
    if resolver.resolve(&mut session).await.unwrap().is_some() {
        navigations += 1;
    }
    // Late-arriving duplicate fetch completions for the same session
    for _ in 0..5 {
        let outcome = ProfileFetchOutcome {
            session_id: session.id(),
            profile: profile.clone(),
        };
        if resolver.apply_completion(&mut session, outcome).is_some() {
            navigations += 1;
        }
    }

    assert_eq!(navigations, 1);
    assert_eq!(session.state(), ResolverState::Redirected(UserRole::Organizer));
}

#[tokio::test]
async fn stale_completion_from_previous_session_is_discarded() {
    let store = Arc::new(InMemoryProfileStore::new());
    let resolver = RoleResolver::new(store);

    // Session A signs out while its fetch is in flight; session B begins.
    let session_a = Session::new(identity("u6"));
    let stale = ProfileFetchOutcome {
        session_id: session_a.id(),
        profile: Profile::new("u6", "Alice", "alice@univ.edu.in").with_user_type("host"),
    };
    drop(session_a);
    let mut session_b = Session::new(identity("u6"));

    assert!(resolver.apply_completion(&mut session_b, stale).is_none());
    assert_eq!(session_b.state(), ResolverState::Init);
    assert!(session_b.profile().is_none());
}

#[tokio::test]
async fn first_derivation_persists_the_role() {
    let store = Arc::new(
        InMemoryProfileStore::new()
            .with_profile(Profile::new("u7", "Club Account", "club@univ.edu.in").with_user_type("host")),
    );
    let resolver = RoleResolver::new(Arc::clone(&store) as _).with_retry_policy(fast_retries());
    let mut session = Session::new(identity("u7"));

    resolver.resolve(&mut session).await.unwrap();

    let sets = store.set_calls();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].0, "u7");
    assert_eq!(sets[0].1.role, Some(UserRole::Organizer));
    assert_eq!(store.stored("u7").unwrap().role, Some(UserRole::Organizer));
}

#[tokio::test]
async fn already_derived_role_is_not_rewritten() {
    let store = Arc::new(
        InMemoryProfileStore::new().with_profile(
            Profile::new("u8", "Alice", "alice@univ.edu.in")
                .with_user_type("user")
                .with_role(UserRole::User),
        ),
    );
    let resolver = RoleResolver::new(Arc::clone(&store) as _).with_retry_policy(fast_retries());
    let mut session = Session::new(identity("u8"));

    resolver.resolve(&mut session).await.unwrap();
    assert!(store.set_calls().is_empty());
}

#[tokio::test]
async fn absent_user_type_preserves_previously_pinned_role() {
    let store = Arc::new(
        InMemoryProfileStore::new()
            .with_profile(Profile::new("u9", "Club Account", "club@univ.edu.in").with_role(UserRole::Organizer)),
    );
    let resolver = RoleResolver::new(store).with_retry_policy(fast_retries());
    let mut session = Session::new(identity("u9"));

    let nav = resolver.resolve(&mut session).await.unwrap();
    assert_eq!(nav, Some(Navigation::OrganizerHome));
    assert_eq!(session.resolved_role(), Some(UserRole::Organizer));
}
