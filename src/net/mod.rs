//! Network boundary: wire DTOs and the auth API handles.
//!
//! ARCHITECTURE
//! ============
//! The backend is an external collaborator reached only through these
//! handles: `api::HttpAuthApi` in the browser and `server_api::ServerApi`
//! during server-side page preparation.

pub mod api;
#[cfg(feature = "ssr")]
pub mod server_api;
pub mod types;
