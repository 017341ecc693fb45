use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::structure::Structure;

/// Content type used when a binding does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A security requirement: a scheme name plus the scopes it needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityRequirement {
    pub name: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl SecurityRequirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scopes: Vec::new(),
        }
    }

    pub fn with_scopes<I, S>(name: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for SecurityRequirement {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A request body binding.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBinding {
    pub structure: Structure,
    pub content_type: String,
}

/// A response binding for one status code.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBinding {
    pub status: u16,
    pub structure: Structure,
    pub content_type: String,
    pub description: Option<String>,
}

/// One operation that has not been registered yet.
///
/// Created by [`SpecBuilder::new_operation`](crate::SpecBuilder::new_operation)
/// for a method and a brace-syntax path, then filled in by the route tree.
/// Nothing is validated or serialized until the operation is registered.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationBuilder {
    method: Method,
    path: String,
    path_params: Vec<String>,
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    deprecated: bool,
    tags: Vec<String>,
    security: Vec<SecurityRequirement>,
    requests: Vec<RequestBinding>,
    responses: Vec<ResponseBinding>,
}

impl OperationBuilder {
    pub fn new(method: Method, path: String, path_params: Vec<String>) -> Self {
        Self {
            method,
            path,
            path_params,
            id: None,
            summary: None,
            description: None,
            deprecated: false,
            tags: Vec::new(),
            security: Vec::new(),
            requests: Vec::new(),
            responses: Vec::new(),
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) -> &mut Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_deprecated(&mut self, deprecated: bool) -> &mut Self {
        self.deprecated = deprecated;
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.push(tag.into());
        self
    }

    pub fn add_security(&mut self, requirement: SecurityRequirement) -> &mut Self {
        self.security.push(requirement);
        self
    }

    /// Bind a request body. `content_type` defaults to JSON.
    pub fn add_request(&mut self, structure: Structure, content_type: Option<&str>) -> &mut Self {
        self.requests.push(RequestBinding {
            structure,
            content_type: content_type.unwrap_or(DEFAULT_CONTENT_TYPE).to_string(),
        });
        self
    }

    /// Bind a response for `status`. `content_type` defaults to JSON.
    pub fn add_response(
        &mut self,
        status: u16,
        structure: Structure,
        content_type: Option<&str>,
    ) -> &mut Self {
        self.responses.push(ResponseBinding {
            status,
            structure,
            content_type: content_type.unwrap_or(DEFAULT_CONTENT_TYPE).to_string(),
            description: None,
        });
        self
    }

    /// Set the description of every response bound for `status`.
    pub fn set_response_description(
        &mut self,
        status: u16,
        description: impl Into<String>,
    ) -> &mut Self {
        let description = description.into();
        for response in self.responses.iter_mut().filter(|r| r.status == status) {
            response.description = Some(description.clone());
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parameter names found in the path template, in order.
    pub fn path_params(&self) -> &[String] {
        &self.path_params
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn security(&self) -> &[SecurityRequirement] {
        &self.security
    }

    pub fn requests(&self) -> &[RequestBinding] {
        &self.requests
    }

    pub fn responses(&self) -> &[ResponseBinding] {
        &self.responses
    }

    /// "GET /pets/{id}", used as the location in error messages.
    pub fn location(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Reason phrase for a status code, used as the default response description.
pub(crate) fn default_description(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Response")
        .to_string()
}
