//! Import-format validation.
//!
//! Turns raw JSON into a [`ValidGraph`], or into the complete list of
//! [`ValidationError`]s found in the document. Nothing here panics on
//! malformed input and nothing here has side effects.

mod checks;

use checks::Checker;
use graphlens_core::{GraphData, StructuralIssue, ValidationError};
use serde::Deserialize;
use serde_json::Value;
use std::ops::Deref;

/// A graph that passed [`validate`].
///
/// Only this crate can construct one, so holding a `ValidGraph` is proof the
/// data satisfies every import rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidGraph(GraphData);

impl ValidGraph {
    pub fn as_graph(&self) -> &GraphData {
        &self.0
    }

    pub fn into_inner(self) -> GraphData {
        self.0
    }
}

impl Deref for ValidGraph {
    type Target = GraphData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<GraphData> for ValidGraph {
    type Error = Vec<ValidationError>;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        validate(&data.to_json_value())
    }
}

/// Parse JSON text and validate it. Syntax errors are reported alone, before
/// any shape checks run.
pub fn parse_graph(text: &str) -> Result<ValidGraph, Vec<ValidationError>> {
    let value: Value = serde_json::from_str(text).map_err(|e| vec![parse_error(&e)])?;
    validate(&value)
}

pub fn validate(raw: &Value) -> Result<ValidGraph, Vec<ValidationError>> {
    let Some(root) = raw.as_object() else {
        return Err(vec![structural(StructuralIssue::RootNotObject)]);
    };

    let meta = root.get("meta").and_then(Value::as_object);
    let nodes = root.get("nodes").and_then(Value::as_array);
    let edges = root.get("edges").and_then(Value::as_array);

    let mut issues = Vec::new();
    if meta.is_none() {
        issues.push(structural(StructuralIssue::MetaNotObject));
    }
    match nodes {
        None => issues.push(structural(StructuralIssue::NodesNotArray)),
        Some(nodes) if nodes.is_empty() => issues.push(structural(StructuralIssue::NoNodes)),
        Some(_) => {}
    }
    if edges.is_none() {
        issues.push(structural(StructuralIssue::EdgesNotArray));
    }

    let (Some(meta), Some(nodes), Some(edges)) = (meta, nodes, edges) else {
        return Err(issues);
    };
    if !issues.is_empty() {
        return Err(issues);
    }

    let mut checker = Checker::default();
    checker.check_meta(meta);
    let node_ids = checker.check_nodes(nodes);
    checker.check_edges(edges, &node_ids);

    if !checker.errors.is_empty() {
        tracing::debug!(
            violations = checker.errors.len(),
            "graph document failed validation"
        );
        return Err(checker.errors);
    }

    let graph = GraphData::deserialize(raw).map_err(|e| vec![parse_error(&e)])?;
    Ok(ValidGraph(graph))
}

fn structural(issue: StructuralIssue) -> ValidationError {
    ValidationError::Structural { issue }
}

fn parse_error(err: &serde_json::Error) -> ValidationError {
    // serde_json appends " at line N column M"; the location has its own fields.
    let full = err.to_string();
    let message = match full.rfind(" at line ") {
        Some(pos) if err.line() > 0 => full[..pos].to_string(),
        _ => full,
    };
    ValidationError::Parse {
        message,
        line: err.line(),
        column: err.column(),
    }
}
