//! Document configuration (`trellis.yaml` or built in code).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::model::{SecurityScheme, Server, Tag};

/// OpenAPI version written into the `openapi` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenApiVersion {
    #[serde(rename = "3.0.3")]
    V3_0,
    #[default]
    #[serde(rename = "3.1.0")]
    V3_1,
}

impl OpenApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V3_0 => "3.0.3",
            Self::V3_1 => "3.1.0",
        }
    }

    /// Parse from string ("3.0", "3.0.3", "3.1", "3.1.0").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "3.0" | "3.0.3" => Some(Self::V3_0),
            "3.1" | "3.1.0" => Some(Self::V3_1),
            _ => None,
        }
    }
}

/// Configuration for the generated document and its documentation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecConfig {
    /// OpenAPI version (default: 3.1.0).
    pub openapi_version: OpenApiVersion,

    /// `info.title` (default: "API").
    pub title: String,

    /// `info.version` (default: "1.0.0").
    pub version: String,

    /// `info.description`.
    pub description: Option<String>,

    /// Servers listed at the document root.
    pub servers: Vec<Server>,

    /// Tag definitions listed at the document root.
    pub tags: Vec<Tag>,

    /// Security schemes keyed by the name routes refer to.
    /// BTreeMap for deterministic output order.
    pub security_schemes: BTreeMap<String, SecurityScheme>,

    /// Disable the API description entirely. Routes still dispatch.
    pub disabled: bool,

    /// Path of the documentation page (default: "/docs").
    pub docs_path: String,

    /// Path serving the document itself (default: "/docs/openapi.yaml").
    /// A `.json` suffix serves JSON, anything else YAML.
    pub spec_path: String,

    /// Theme passed to the documentation UI (default: "purple").
    pub ui_theme: String,
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            openapi_version: OpenApiVersion::default(),
            title: "API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
            servers: Vec::new(),
            tags: Vec::new(),
            security_schemes: BTreeMap::new(),
            disabled: false,
            docs_path: "/docs".to_string(),
            spec_path: "/docs/openapi.yaml".to_string(),
            ui_theme: "purple".to_string(),
        }
    }
}

impl SpecConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpecError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a config from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, SpecError> {
        let config: SpecConfig = serde_yaml::from_str(content)
            .map_err(|e| SpecError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the documentation endpoints are usable.
    pub fn validate(&self) -> Result<(), SpecError> {
        for (field, value) in [("docs_path", &self.docs_path), ("spec_path", &self.spec_path)] {
            if !value.starts_with('/') {
                return Err(SpecError::InvalidConfig(format!(
                    "{} must start with '/', got '{}'",
                    field, value
                )));
            }
        }
        if self.docs_path == self.spec_path {
            return Err(SpecError::InvalidConfig(format!(
                "docs_path and spec_path must differ (both '{}')",
                self.docs_path
            )));
        }
        Ok(())
    }

    pub fn with_openapi_version(mut self, version: OpenApiVersion) -> Self {
        self.openapi_version = version;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_server(mut self, url: impl Into<String>, description: Option<&str>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description: description.map(str::to_string),
        });
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, description: Option<&str>) -> Self {
        self.tags.push(Tag {
            name: name.into(),
            description: description.map(str::to_string),
        });
        self
    }

    pub fn with_security_scheme(mut self, name: impl Into<String>, scheme: SecurityScheme) -> Self {
        self.security_schemes.insert(name.into(), scheme);
        self
    }

    /// Disable or enable the API description.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_docs_path(mut self, path: impl Into<String>) -> Self {
        self.docs_path = path.into();
        self
    }

    pub fn with_spec_path(mut self, path: impl Into<String>) -> Self {
        self.spec_path = path.into();
        self
    }

    pub fn with_ui_theme(mut self, theme: impl Into<String>) -> Self {
        self.ui_theme = theme.into();
        self
    }
}
