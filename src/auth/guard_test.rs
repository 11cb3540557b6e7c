use std::cell::Cell;

use futures::executor::block_on;

use super::*;
use crate::auth::cookies::testing::MemoryCookies;
use crate::auth::cookies::{CookieOptions, TOKEN_COOKIE};

#[test]
fn request_without_credentials_redirects_and_skips_the_page() {
    let store = MemoryCookies::new();
    let invoked = Cell::new(false);

    let outcome = block_on(guard_page(&store, |_token| {
        invoked.set(true);
        async { Ok::<_, AuthError>(0) }
    }))
    .expect("guard");

    assert_eq!(outcome, GuardOutcome::RedirectToLogin);
    assert!(!invoked.get());
}

#[test]
fn request_with_partial_pair_redirects() {
    let store = MemoryCookies::new();
    store.set(TOKEN_COOKIE, "t1", CookieOptions::credential());

    let outcome = block_on(guard_page(&store, |_token| async { Ok::<_, AuthError>(0) })).expect("guard");

    assert_eq!(outcome, GuardOutcome::RedirectToLogin);
}

#[test]
fn page_receives_the_stored_token_and_its_value_passes_through() {
    let store = MemoryCookies::with_credentials("t1", "r1");

    let outcome = block_on(guard_page(&store, |token| async move {
        assert_eq!(token, "t1");
        Ok::<_, AuthError>("prepared")
    }))
    .expect("guard");

    assert_eq!(outcome, GuardOutcome::Allow("prepared"));
}

#[test]
fn expired_session_clears_credentials_and_redirects() {
    let store = MemoryCookies::with_credentials("t1", "r1");

    let outcome = block_on(guard_page(&store, |_token| async {
        Err::<(), _>(AuthError::SessionExpired)
    }))
    .expect("guard");

    assert_eq!(outcome, GuardOutcome::RedirectToLogin);
    assert_eq!(store.len(), 0);
}

#[test]
fn network_failure_propagates_and_keeps_credentials() {
    let store = MemoryCookies::with_credentials("t1", "r1");

    let err = block_on(guard_page(&store, |_token| async {
        Err::<(), _>(AuthError::Network("boom".to_owned()))
    }))
    .expect_err("propagates");

    assert_eq!(err, AuthError::Network("boom".to_owned()));
    assert_eq!(store.len(), 2);
}
