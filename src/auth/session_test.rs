use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::auth::cookies::testing::MemoryCookies;
use crate::auth::cookies::{CookieOptions, REFRESH_COOKIE, TOKEN_COOKIE};

// =============================================================
// Scripted auth API stub
// =============================================================

#[derive(Default)]
struct StubApi {
    sign_in_result: RefCell<Option<Result<SessionGrant, AuthError>>>,
    identity_result: RefCell<Option<Result<User, AuthError>>>,
    bearer: RefCell<Option<String>>,
    sign_in_calls: Cell<usize>,
    identity_calls: Cell<usize>,
}

impl StubApi {
    fn with_sign_in(result: Result<SessionGrant, AuthError>) -> Self {
        let stub = Self::default();
        *stub.sign_in_result.borrow_mut() = Some(result);
        stub
    }

    fn with_identity(result: Result<User, AuthError>) -> Self {
        let stub = Self::default();
        *stub.identity_result.borrow_mut() = Some(result);
        stub
    }

    fn bearer(&self) -> Option<String> {
        self.bearer.borrow().clone()
    }
}

impl AuthApi for StubApi {
    fn set_bearer(&self, token: Option<&str>) {
        *self.bearer.borrow_mut() = token.map(str::to_owned);
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<SessionGrant, AuthError> {
        self.sign_in_calls.set(self.sign_in_calls.get() + 1);
        self.sign_in_result
            .borrow()
            .clone()
            .unwrap_or(Err(AuthError::Network("unscripted sign-in".to_owned())))
    }

    async fn fetch_identity(&self) -> Result<User, AuthError> {
        self.identity_calls.set(self.identity_calls.get() + 1);
        self.identity_result
            .borrow()
            .clone()
            .unwrap_or(Err(AuthError::Network("unscripted identity fetch".to_owned())))
    }
}

fn grant() -> SessionGrant {
    SessionGrant {
        token: "t1".to_owned(),
        refresh_token: "r1".to_owned(),
        permissions: vec!["metrics.list".to_owned()],
        roles: vec!["administrator".to_owned()],
    }
}

fn identity() -> User {
    User {
        email: "a@x.com".to_owned(),
        permissions: vec!["metrics.list".to_owned()],
        roles: vec!["administrator".to_owned()],
    }
}

// =============================================================
// Sign-in
// =============================================================

#[test]
fn sign_in_success_establishes_session_and_credentials() {
    let mut manager = SessionManager::new(StubApi::with_sign_in(Ok(grant())), MemoryCookies::new());

    block_on(manager.sign_in("a@x.com", "p")).expect("sign-in");

    assert!(manager.is_authenticated());
    assert_eq!(manager.phase(), SessionPhase::Authenticated);
    assert_eq!(manager.user(), Some(&identity()));
    assert_eq!(manager.api().bearer(), Some("t1".to_owned()));
}

#[test]
fn sign_in_writes_both_cookies_together() {
    let cookies = Rc::new(MemoryCookies::new());
    let mut manager = SessionManager::new(StubApi::with_sign_in(Ok(grant())), Rc::clone(&cookies));

    block_on(manager.sign_in("a@x.com", "p")).expect("sign-in");

    assert_eq!(cookies.get(TOKEN_COOKIE), Some("t1".to_owned()));
    assert_eq!(cookies.get(REFRESH_COOKIE), Some("r1".to_owned()));
}

#[test]
fn sign_in_failure_leaves_state_and_store_untouched() {
    let cookies = Rc::new(MemoryCookies::new());
    let mut manager = SessionManager::new(
        StubApi::with_sign_in(Err(AuthError::InvalidCredentials)),
        Rc::clone(&cookies),
    );

    let err = block_on(manager.sign_in("a@x.com", "wrong")).expect_err("rejected");

    assert_eq!(err, AuthError::InvalidCredentials);
    assert!(!manager.is_authenticated());
    assert_eq!(manager.phase(), SessionPhase::Unauthenticated);
    assert_eq!(cookies.len(), 0);
    assert_eq!(manager.api().bearer(), None);
}

#[test]
fn repeat_sign_in_replaces_identity_and_credential_pair() {
    let cookies = Rc::new(MemoryCookies::new());
    let mut manager = SessionManager::new(StubApi::with_sign_in(Ok(grant())), Rc::clone(&cookies));

    block_on(manager.sign_in("a@x.com", "p")).expect("first sign-in");

    let second = SessionGrant {
        token: "t2".to_owned(),
        refresh_token: "r2".to_owned(),
        permissions: vec!["users.list".to_owned()],
        roles: vec!["editor".to_owned()],
    };
    *manager.api().sign_in_result.borrow_mut() = Some(Ok(second));
    block_on(manager.sign_in("b@x.com", "p")).expect("second sign-in");

    assert_eq!(cookies.get(TOKEN_COOKIE), Some("t2".to_owned()));
    assert_eq!(cookies.get(REFRESH_COOKIE), Some("r2".to_owned()));
    let user = manager.user().expect("user");
    assert_eq!(user.email, "b@x.com");
    assert_eq!(user.roles, vec!["editor".to_owned()]);
    assert_eq!(manager.api().bearer(), Some("t2".to_owned()));
}

// =============================================================
// Sign-out
// =============================================================

#[test]
fn sign_out_clears_everything_and_is_idempotent() {
    let cookies = Rc::new(MemoryCookies::new());
    let mut manager = SessionManager::new(StubApi::with_sign_in(Ok(grant())), Rc::clone(&cookies));
    block_on(manager.sign_in("a@x.com", "p")).expect("sign-in");

    manager.sign_out();
    assert!(!manager.is_authenticated());
    assert_eq!(manager.phase(), SessionPhase::Unauthenticated);
    assert_eq!(cookies.len(), 0);
    assert_eq!(manager.api().bearer(), None);

    // Signing out again from the empty state is a quiet no-op.
    manager.sign_out();
    assert!(!manager.is_authenticated());
    assert_eq!(cookies.len(), 0);
}

// =============================================================
// Restore-on-load
// =============================================================

#[test]
fn restore_without_credentials_makes_no_network_call() {
    let mut manager = SessionManager::new(StubApi::with_identity(Ok(identity())), MemoryCookies::new());

    let outcome = block_on(manager.restore());

    assert_eq!(outcome, RestoreOutcome::NoCredentials);
    assert_eq!(manager.api().identity_calls.get(), 0);
    assert!(!manager.is_authenticated());
}

#[test]
fn restore_with_partial_pair_makes_no_network_call() {
    let cookies = MemoryCookies::new();
    cookies.set(TOKEN_COOKIE, "t1", CookieOptions::credential());
    let mut manager = SessionManager::new(StubApi::with_identity(Ok(identity())), cookies);

    let outcome = block_on(manager.restore());

    assert_eq!(outcome, RestoreOutcome::NoCredentials);
    assert_eq!(manager.api().identity_calls.get(), 0);
}

#[test]
fn restore_success_rebuilds_the_session() {
    let cookies = MemoryCookies::with_credentials("t1", "r1");
    let mut manager = SessionManager::new(StubApi::with_identity(Ok(identity())), cookies);

    let outcome = block_on(manager.restore());

    assert_eq!(outcome, RestoreOutcome::Authenticated);
    assert!(manager.is_authenticated());
    assert_eq!(manager.phase(), SessionPhase::Authenticated);
    assert_eq!(manager.user(), Some(&identity()));
    assert_eq!(manager.api().bearer(), Some("t1".to_owned()));
}

#[test]
fn restore_failure_runs_the_sign_out_path() {
    let cookies = Rc::new(MemoryCookies::with_credentials("t1", "r1"));
    let mut manager = SessionManager::new(
        StubApi::with_identity(Err(AuthError::SessionExpired)),
        Rc::clone(&cookies),
    );

    let outcome = block_on(manager.restore());

    assert_eq!(outcome, RestoreOutcome::SignedOut(AuthError::SessionExpired));
    assert!(!manager.is_authenticated());
    assert_eq!(cookies.len(), 0);
    assert_eq!(manager.api().bearer(), None);
}

#[test]
fn restore_moves_through_the_restoring_phase() {
    let cookies = MemoryCookies::with_credentials("t1", "r1");
    let mut manager = SessionManager::new(StubApi::with_identity(Ok(identity())), cookies);

    let ticket = manager.begin_restore().expect("ticket");
    assert_eq!(manager.phase(), SessionPhase::Restoring);

    manager.finish_restore(ticket, Ok(identity()));
    assert_eq!(manager.phase(), SessionPhase::Authenticated);
}

#[test]
fn stale_restore_result_is_discarded_after_sign_out() {
    let cookies = Rc::new(MemoryCookies::with_credentials("t1", "r1"));
    let mut manager = SessionManager::new(StubApi::with_identity(Ok(identity())), Rc::clone(&cookies));

    let ticket = manager.begin_restore().expect("ticket");
    manager.sign_out();

    let outcome = manager.finish_restore(ticket, Ok(identity()));

    assert_eq!(outcome, RestoreOutcome::Discarded);
    assert!(!manager.is_authenticated());
    assert_eq!(cookies.len(), 0);
}

#[test]
fn stale_restore_result_is_discarded_after_newer_sign_in() {
    let cookies = Rc::new(MemoryCookies::with_credentials("old", "old-r"));
    let api = StubApi::with_sign_in(Ok(grant()));
    *api.identity_result.borrow_mut() = Some(Ok(User {
        email: "stale@x.com".to_owned(),
        permissions: vec![],
        roles: vec![],
    }));
    let mut manager = SessionManager::new(api, Rc::clone(&cookies));

    let ticket = manager.begin_restore().expect("ticket");
    block_on(manager.sign_in("a@x.com", "p")).expect("sign-in");

    let outcome = manager.finish_restore(ticket, Ok(manager.user().cloned().expect("user")));
    assert_eq!(outcome, RestoreOutcome::Discarded);

    // The newer sign-in stands.
    assert_eq!(manager.user().map(|u| u.email.as_str()), Some("a@x.com"));
    assert_eq!(cookies.get(TOKEN_COOKIE), Some("t1".to_owned()));
}

#[test]
fn manager_seeds_bearer_from_stored_token() {
    let cookies = MemoryCookies::with_credentials("t1", "r1");
    let manager = SessionManager::new(StubApi::default(), cookies);
    assert_eq!(manager.api().bearer(), Some("t1".to_owned()));
}

// =============================================================
// Round trip: sign-in, fresh load, equivalent session
// =============================================================

#[test]
fn fresh_load_after_sign_in_reproduces_the_session() {
    let cookies = Rc::new(MemoryCookies::new());

    let mut first = SessionManager::new(StubApi::with_sign_in(Ok(grant())), Rc::clone(&cookies));
    block_on(first.sign_in("a@x.com", "p")).expect("sign-in");
    let original = first.user().cloned().expect("user");
    drop(first);

    // Fresh context over the same cookie jar; the identity endpoint echoes
    // the same identity back.
    let mut second = SessionManager::new(StubApi::with_identity(Ok(identity())), Rc::clone(&cookies));
    let outcome = block_on(second.restore());

    assert_eq!(outcome, RestoreOutcome::Authenticated);
    assert!(second.is_authenticated());
    assert_eq!(second.user(), Some(&original));
}
