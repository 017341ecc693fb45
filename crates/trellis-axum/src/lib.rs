//! axum binding for trellis route trees.
//!
//! [`AxumHost`] lets an [`ApiRouter`](trellis::ApiRouter) register handlers
//! on an `axum::Router`. [`ApiRouterExt::into_axum`] assembles the final
//! router and adds the API description and documentation page endpoints.
//!
//! ```
//! use trellis::{ApiRouter, GroupConfig, RouteConfig};
//! use trellis_axum::{handler, ApiRouterExt, AxumHost};
//! use trellis_openapi::SpecConfig;
//!
//! async fn list_pets() -> &'static str {
//!     "[]"
//! }
//!
//! let api = ApiRouter::from_config(AxumHost::<()>::new(), SpecConfig::new());
//! let pets = api.group("/pets").with(GroupConfig::new().with_tag("pet"));
//! pets.get("", handler(list_pets))
//!     .with(RouteConfig::new().with_operation_id("listPets"));
//!
//! let app: axum::Router = api.into_axum().unwrap();
//! ```

pub mod docs;
pub mod host;
pub mod problem;

pub use docs::ApiRouterExt;
pub use host::{handler, AxumHandler, AxumHost};
pub use problem::{ProblemDetails, ValidationIssue};
