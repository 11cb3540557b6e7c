//! Session and authorization core.
//!
//! ARCHITECTURE
//! ============
//! `session` owns the lifecycle state machine, `cookies` the persisted
//! credential pair, `authorize` the pure permission/role predicate, and
//! `guard` the server-side page wrapper. The browser-facing glue lives in
//! `state::session`; everything here is platform-pure behind traits.

pub mod authorize;
pub mod cookies;
pub mod error;
pub mod guard;
pub mod session;
