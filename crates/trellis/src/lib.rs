//! Declare HTTP routes once; get live routing and an OpenAPI document.
//!
//! An [`ApiRouter`] is a tree of path-prefix groups. Each route registers its
//! handler with a host web framework through the [`HostRouter`] trait and
//! collects operation metadata for the API description. Groups carry tags,
//! security requirements and visibility that their routes and subgroups
//! inherit as a snapshot taken when they are created.
//!
//! Nothing is documented until the description is first needed. At that
//! point the whole tree is compiled exactly once, even under concurrent
//! callers, and every problem found is reported together through
//! [`BuildErrors`].
//!
//! # Usage
//!
//! ```
//! use http::Method;
//! use trellis::{ApiRouter, GroupConfig, NoHost, RouteConfig};
//! use trellis_openapi::{Format, SpecConfig};
//!
//! let api = ApiRouter::from_config(NoHost, SpecConfig::new().with_title("Pets"));
//!
//! let pets = api.group("/pets").with(GroupConfig::new().with_tag("pet"));
//! pets.add_route(Method::GET, "/:petId").with(
//!     RouteConfig::new()
//!         .with_operation_id("getPet")
//!         .with_response::<String>(200),
//! );
//!
//! let yaml = String::from_utf8(api.generate_schema(Format::Yaml).unwrap()).unwrap();
//! assert!(yaml.contains("/pets/{petId}:"));
//! ```

mod compile;
pub mod config;
mod context;
pub mod error;
pub mod host;
pub mod path;
mod router;

#[cfg(test)]
mod testing;

pub use compile::Schema;
pub use config::{GroupConfig, Metadata, ResponseConfig, RouteConfig};
pub use error::{BuildError, BuildErrors, Error, ErrorList};
pub use host::{HostError, HostRouter, NoHost};
pub use path::{join_paths, normalize_path};
pub use router::{ApiRouter, Route};
