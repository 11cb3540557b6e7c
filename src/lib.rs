//! # dashpanel
//!
//! Leptos + WASM frontend core for the Dashpanel metrics application.
//!
//! The crate centers on the session/authorization layer: cookie-backed
//! credential persistence shared between the browser and server-rendered
//! requests, a session manager covering sign-in, restore-on-load, and
//! sign-out, a pure permission/role authorization check, the `<Can>` render
//! gate, and a server-side page guard for `#[server]` page preparation.

pub mod app;
pub mod auth;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;

/// Browser entry point: install panic/log hooks and hydrate the app.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
