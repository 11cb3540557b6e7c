//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration: the login page drives
//! sign-in, the protected pages apply the session gate and the server-side
//! page guard.

pub mod dashboard;
pub mod login;
