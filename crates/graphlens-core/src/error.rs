use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which part of the import document a field error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Meta,
    Node,
    Edge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meta => write!(f, "meta"),
            Self::Node => write!(f, "nodes"),
            Self::Edge => write!(f, "edges"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Source,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
    /// string, number or boolean
    Scalar,
}

impl JsonKind {
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(_) => Self::Boolean,
            serde_json::Value::Number(_) => Self::Number,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
            Self::Scalar => "string, number or boolean",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    WrongType { expected: JsonKind, found: JsonKind },
    InvalidValue { found: String, allowed: Vec<String> },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "required field is missing"),
            Self::WrongType { expected, found } => write!(f, "expected {expected}, found {found}"),
            Self::InvalidValue { found, allowed } => {
                write!(f, "invalid value `{found}`, expected one of: {}", allowed.join(", "))
            }
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralIssue {
    #[error("top-level value must be an object")]
    RootNotObject,
    #[error("`meta` must be an object")]
    MetaNotObject,
    #[error("`nodes` must be an array")]
    NodesNotArray,
    #[error("`edges` must be an array")]
    EdgesNotArray,
    #[error("`nodes` must contain at least one node")]
    NoNodes,
}

/// One violation found while checking an import document.
///
/// The validator collects every violation it can find so the user sees the
/// whole list at once.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },
    #[error("{issue}")]
    Structural { issue: StructuralIssue },
    #[error("{}: {problem}", field_path(.entity, .index, .field))]
    Field {
        entity: EntityKind,
        index: Option<usize>,
        field: String,
        problem: FieldProblem,
    },
    #[error("nodes[{index}].id: duplicate node id `{id}`")]
    DuplicateId { index: usize, id: String },
    #[error("edges[{edge_index}].{endpoint}: unknown node id `{node_id}`")]
    Referential {
        edge_index: usize,
        endpoint: Endpoint,
        node_id: String,
    },
}

impl ValidationError {
    pub fn missing(entity: EntityKind, index: Option<usize>, field: impl Into<String>) -> Self {
        Self::Field {
            entity,
            index,
            field: field.into(),
            problem: FieldProblem::Missing,
        }
    }

    /// Short category name shown next to each violation.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "ParseError",
            Self::Structural { .. } => "StructuralError",
            Self::Field { .. } | Self::DuplicateId { .. } => "FieldError",
            Self::Referential { .. } => "ReferentialError",
        }
    }
}

fn field_path(entity: &EntityKind, index: &Option<usize>, field: &str) -> String {
    match (index, field.is_empty()) {
        (Some(index), true) => format!("{entity}[{index}]"),
        (Some(index), false) => format!("{entity}[{index}].{field}"),
        (None, true) => entity.to_string(),
        (None, false) => format!("{entity}.{field}"),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("sample graph unavailable: {message}")]
    Unavailable { message: String },
    #[error("failed to read sample graph {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("graph rejected with {} validation error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

impl ImportError {
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let err = ValidationError::missing(EntityKind::Node, Some(2), "id");
        assert_eq!(err.to_string(), "nodes[2].id: required field is missing");
        assert_eq!(err.kind_name(), "FieldError");

        let err = ValidationError::missing(EntityKind::Meta, None, "title");
        assert_eq!(err.to_string(), "meta.title: required field is missing");
    }

    #[test]
    fn test_other_displays() {
        let err = ValidationError::Referential {
            edge_index: 0,
            endpoint: Endpoint::Target,
            node_id: "ghost".to_string(),
        };
        assert_eq!(err.to_string(), "edges[0].target: unknown node id `ghost`");
        assert_eq!(err.kind_name(), "ReferentialError");

        let err = ValidationError::Structural {
            issue: StructuralIssue::NoNodes,
        };
        assert_eq!(err.to_string(), "`nodes` must contain at least one node");

        let err = ValidationError::Field {
            entity: EntityKind::Edge,
            index: Some(1),
            field: "style.lineType".to_string(),
            problem: FieldProblem::InvalidValue {
                found: "wavy".to_string(),
                allowed: vec!["solid".to_string(), "dashed".to_string()],
            },
        };
        assert_eq!(
            err.to_string(),
            "edges[1].style.lineType: invalid value `wavy`, expected one of: solid, dashed"
        );
    }

    #[test]
    fn test_serialization_is_tagged() {
        let err = ValidationError::DuplicateId {
            index: 3,
            id: "a".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"kind":"duplicate_id","index":3,"id":"a"}"#);
    }

    #[test]
    fn test_import_error_violations() {
        let err = ImportError::Invalid(vec![ValidationError::Structural {
            issue: StructuralIssue::RootNotObject,
        }]);
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.to_string(), "graph rejected with 1 validation error(s)");

        let err: ImportError = FetchError::Unavailable {
            message: "offline".to_string(),
        }
        .into();
        assert!(err.violations().is_empty());
    }
}
