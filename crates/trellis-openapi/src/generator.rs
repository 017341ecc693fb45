use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use http::Method;

use crate::config::SpecConfig;
use crate::error::SpecError;
use crate::model::{
    Components, Document, Info, MediaType, OperationObject, Parameter, ParameterLocation,
    RequestBody, Response,
};
use crate::operation::{default_description, OperationBuilder};
use crate::structure::SchemaRegistry;

/// Serialization format of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    Json,
    #[default]
    Yaml,
}

impl Format {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// JSON for `.json` files, YAML for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Yaml => "application/yaml",
        }
    }
}

/// The document-building collaborator behind a route tree.
///
/// The tree asks for one [`OperationBuilder`] per documented route, fills it
/// in, and hands it back through [`SpecBuilder::register_operation`] during
/// compilation.
pub trait SpecBuilder: Send {
    /// Start an operation for a method and a brace-syntax path.
    fn new_operation(&self, method: &Method, path: &str) -> Result<OperationBuilder, SpecError>;

    /// Add a finished operation to the document.
    fn register_operation(&mut self, operation: OperationBuilder) -> Result<(), SpecError>;

    /// Serialize the document.
    fn serialize(&self, format: Format) -> Result<Vec<u8>, SpecError>;

    fn config(&self) -> &SpecConfig;

    /// Whether routes should be documented at all.
    fn enabled(&self) -> bool {
        !self.config().disabled
    }
}

/// Builds an OpenAPI [`Document`] from registered operations.
#[derive(Debug, Clone)]
pub struct OpenApiGenerator {
    config: SpecConfig,
    document: Document,
    schemas: SchemaRegistry,
    /// Registered operations in registration order.
    operations: Vec<OperationBuilder>,
    seen_operation_ids: HashMap<String, String>,
    seen_routes: HashSet<(String, String)>,
}

impl OpenApiGenerator {
    pub fn new(config: SpecConfig) -> Self {
        let document = Document {
            openapi: config.openapi_version.as_str().to_string(),
            info: Info {
                title: config.title.clone(),
                version: config.version.clone(),
                description: config.description.clone(),
            },
            servers: config.servers.clone(),
            tags: config.tags.clone(),
            paths: BTreeMap::new(),
            components: Components {
                schemas: BTreeMap::new(),
                security_schemes: config.security_schemes.clone(),
            },
        };

        Self {
            config,
            document,
            schemas: SchemaRegistry::new(),
            operations: Vec::new(),
            seen_operation_ids: HashMap::new(),
            seen_routes: HashSet::new(),
        }
    }

    /// The document built so far.
    pub fn document(&self) -> Document {
        let mut document = self.document.clone();
        document.components.schemas = self.schemas.schemas().clone();
        document
    }

    /// Registered operations in registration order.
    pub fn operations(&self) -> &[OperationBuilder] {
        &self.operations
    }

    fn build_operation(&mut self, op: &OperationBuilder) -> Result<OperationObject, SpecError> {
        let location = op.location();

        let parameters = op
            .path_params()
            .iter()
            .map(|name| Parameter {
                name: name.clone(),
                location: ParameterLocation::Path,
                required: true,
                schema: Some(serde_json::json!({ "type": "string" })),
            })
            .collect();

        let mut request_content = BTreeMap::new();
        for binding in op.requests() {
            let schema = self.schemas.reflect(
                &binding.structure,
                &format!("{} request body", location),
            )?;
            if schema.is_some() {
                request_content.insert(binding.content_type.clone(), MediaType { schema });
            }
        }
        let request_body = (!request_content.is_empty()).then(|| RequestBody {
            required: true,
            content: request_content,
        });

        let mut responses: BTreeMap<String, Response> = BTreeMap::new();
        for binding in op.responses() {
            let schema = self.schemas.reflect(
                &binding.structure,
                &format!("{} response {}", location, binding.status),
            )?;
            let response = responses.entry(binding.status.to_string()).or_default();
            if let Some(description) = &binding.description {
                response.description = description.clone();
            } else if response.description.is_empty() {
                response.description = default_description(binding.status);
            }
            if schema.is_some() {
                response
                    .content
                    .insert(binding.content_type.clone(), MediaType { schema });
            }
        }
        if responses.is_empty() {
            responses.insert(
                "default".to_string(),
                Response {
                    description: "Default response".to_string(),
                    content: BTreeMap::new(),
                },
            );
        }

        let security = op
            .security()
            .iter()
            .map(|req| BTreeMap::from([(req.name.clone(), req.scopes.clone())]))
            .collect();

        Ok(OperationObject {
            tags: op.tags().to_vec(),
            summary: op.summary().map(str::to_string),
            description: op.description().map(str::to_string),
            operation_id: op.id().map(str::to_string),
            parameters,
            request_body,
            responses,
            deprecated: op.deprecated(),
            security,
        })
    }
}

impl SpecBuilder for OpenApiGenerator {
    fn new_operation(&self, method: &Method, path: &str) -> Result<OperationBuilder, SpecError> {
        let location = format!("{} {}", method, path);
        let params = validate_path_template(path, &location)?;
        Ok(OperationBuilder::new(method.clone(), path.to_string(), params))
    }

    fn register_operation(&mut self, operation: OperationBuilder) -> Result<(), SpecError> {
        let location = operation.location();

        if let Some(id) = operation.id() {
            if let Some(first) = self.seen_operation_ids.get(id) {
                return Err(SpecError::DuplicateOperationId {
                    id: id.to_string(),
                    first: first.clone(),
                    duplicate: location,
                });
            }
        }

        let key = (operation.path().to_string(), operation.method().to_string());
        if self.seen_routes.contains(&key) {
            return Err(SpecError::RoutingConflict(format!(
                "{} is declared more than once",
                location
            )));
        }

        // Reflection may fail; nothing is recorded until it succeeds.
        let snapshot = self.schemas.clone();
        let object = match self.build_operation(&operation) {
            Ok(object) => object,
            Err(e) => {
                self.schemas = snapshot;
                return Err(e);
            }
        };

        if let Some(id) = operation.id() {
            self.seen_operation_ids.insert(id.to_string(), location.clone());
        }
        self.seen_routes.insert(key);

        self.document
            .paths
            .entry(operation.path().to_string())
            .or_default()
            .operations
            .insert(operation.method().as_str().to_lowercase(), object);

        tracing::trace!(operation = %location, "operation registered");
        self.operations.push(operation);
        Ok(())
    }

    fn serialize(&self, format: Format) -> Result<Vec<u8>, SpecError> {
        let document = self.document();
        let result = match format {
            Format::Json => serde_json::to_vec_pretty(&document).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::to_string(&document)
                .map(String::into_bytes)
                .map_err(|e| e.to_string()),
        };
        result.map_err(|reason| SpecError::Serialize {
            format: format.as_str().to_string(),
            reason,
        })
    }

    fn config(&self) -> &SpecConfig {
        &self.config
    }
}

/// Validate a brace-syntax path template and return its parameter names.
///
/// Rejects nested, unmatched, unclosed or empty braces, duplicate
/// parameters, and parameter names outside `[A-Za-z0-9_]`.
pub fn validate_path_template(path: &str, location: &str) -> Result<Vec<String>, SpecError> {
    if !path.starts_with('/') {
        return Err(SpecError::InvalidPathTemplate(format!(
            "{} - path must start with '/'",
            location
        )));
    }

    let mut params: Vec<String> = Vec::new();
    let mut seen_params: HashSet<String> = HashSet::new();
    let mut current_param = String::new();
    let mut in_param = false;

    for ch in path.chars() {
        match ch {
            '{' => {
                if in_param {
                    return Err(SpecError::InvalidPathTemplate(format!(
                        "{} - nested braces not allowed",
                        location
                    )));
                }
                in_param = true;
            }
            '}' => {
                if !in_param {
                    return Err(SpecError::InvalidPathTemplate(format!(
                        "{} - unmatched closing brace",
                        location
                    )));
                }
                in_param = false;

                if current_param.is_empty() {
                    return Err(SpecError::InvalidPathTemplate(format!(
                        "{} - empty parameter name",
                        location
                    )));
                }
                if !seen_params.insert(current_param.clone()) {
                    return Err(SpecError::InvalidPathTemplate(format!(
                        "{} - duplicate parameter '{}'",
                        location, current_param
                    )));
                }
                params.push(std::mem::take(&mut current_param));
            }
            _ if in_param => {
                if !ch.is_ascii_alphanumeric() && ch != '_' {
                    return Err(SpecError::InvalidPathTemplate(format!(
                        "{} - invalid character '{}' in parameter name",
                        location, ch
                    )));
                }
                current_param.push(ch);
            }
            _ => {}
        }
    }

    if in_param {
        return Err(SpecError::InvalidPathTemplate(format!(
            "{} - unclosed brace",
            location
        )));
    }

    Ok(params)
}
