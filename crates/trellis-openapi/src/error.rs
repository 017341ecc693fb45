use thiserror::Error;

/// Errors produced while building or serializing an OpenAPI document.
///
/// Every variant is cheap to clone so one compile outcome can be handed to
/// every caller that asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// E1010: Two operations share a method and path.
    #[error("E1010: routing conflict: {0}")]
    RoutingConflict(String),

    /// E1054: Malformed path template.
    #[error("E1054: invalid path template: {0}")]
    InvalidPathTemplate(String),

    /// E1055: Two operations share an operationId.
    #[error("E1055: duplicate operationId '{id}' (first at {first}, duplicate at {duplicate})")]
    DuplicateOperationId {
        id: String,
        first: String,
        duplicate: String,
    },

    /// E1060: A request or response structure cannot be turned into a schema.
    #[error("E1060: cannot reflect {target} at {location}: {reason}")]
    Unreflectable {
        target: String,
        location: String,
        reason: String,
    },

    /// E1061: Two different schemas registered under one component name.
    #[error("E1061: conflicting definitions for schema '{name}' (at {location})")]
    ConflictingSchema { name: String, location: String },

    /// E1070: Configuration could not be loaded or is inconsistent.
    #[error("E1070: invalid configuration: {0}")]
    InvalidConfig(String),

    /// E1080: The document could not be serialized.
    #[error("E1080: failed to serialize document as {format}: {reason}")]
    Serialize { format: String, reason: String },
}

impl SpecError {
    /// The stable error code, e.g. `E1055`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoutingConflict(_) => "E1010",
            Self::InvalidPathTemplate(_) => "E1054",
            Self::DuplicateOperationId { .. } => "E1055",
            Self::Unreflectable { .. } => "E1060",
            Self::ConflictingSchema { .. } => "E1061",
            Self::InvalidConfig(_) => "E1070",
            Self::Serialize { .. } => "E1080",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_matches_message_prefix() {
        let err = SpecError::DuplicateOperationId {
            id: "getPet".into(),
            first: "GET /pet/{petId}".into(),
            duplicate: "GET /pets/{id}".into(),
        };
        assert_eq!(err.code(), "E1055");
        assert!(err.to_string().starts_with("E1055: "));
        assert_eq!(SpecError::InvalidConfig(String::new()).code(), "E1070");
    }
}
