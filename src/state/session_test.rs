use super::*;

// =============================================================
// SessionState snapshot
// =============================================================

#[test]
fn session_state_default_is_unauthenticated() {
    let state = SessionState::default();
    assert!(state.user.is_none());
    assert!(!state.is_authenticated());
}

#[test]
fn session_state_with_user_is_authenticated() {
    let state = SessionState {
        user: Some(User {
            email: "a@x.com".to_owned(),
            permissions: vec![],
            roles: vec![],
        }),
        loading: false,
    };
    assert!(state.is_authenticated());
}
