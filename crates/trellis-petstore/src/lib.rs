//! A pet store API declared as a trellis route tree.
//!
//! Used by the `petstore` binary and as a worked example of groups,
//! inherited tags and security, hidden routes and request/response
//! structures.

pub mod api;
pub mod handlers;
pub mod models;
pub mod state;

pub use api::{app, build_api, default_config};
pub use state::AppState;
