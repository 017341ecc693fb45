//! OpenAPI document generation for trellis.
//!
//! This crate owns everything that knows about the OpenAPI format: the
//! serialized [`Document`] model, the [`SpecConfig`] describing its root
//! fields, the [`OperationBuilder`] a route fills in, and the
//! [`SpecBuilder`] trait the route tree talks to. [`OpenApiGenerator`] is the
//! default [`SpecBuilder`].

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod operation;
pub mod structure;

pub use config::{OpenApiVersion, SpecConfig};
pub use error::SpecError;
pub use generator::{validate_path_template, Format, OpenApiGenerator, SpecBuilder};
pub use model::{
    Components, Document, Info, MediaType, OperationObject, Parameter, ParameterLocation,
    PathItem, RequestBody, Response, SecurityScheme, Server, Tag,
};
pub use operation::{
    OperationBuilder, RequestBinding, ResponseBinding, SecurityRequirement, DEFAULT_CONTENT_TYPE,
};
pub use structure::{SchemaRegistry, Structure, ToSchema};
