use graphlens_core::{
    Direction, Endpoint, EntityKind, FieldProblem, JsonKind, LineType, ValidationError,
};
use serde_json::{Map, Value};
use std::collections::HashSet;

type Object = Map<String, Value>;

/// Accumulates violations while walking a document whose top-level shape is
/// already known to be sound.
#[derive(Default)]
pub(crate) struct Checker {
    pub(crate) errors: Vec<ValidationError>,
}

impl Checker {
    fn push(&mut self, entity: EntityKind, index: Option<usize>, field: &str, problem: FieldProblem) {
        self.errors.push(ValidationError::Field {
            entity,
            index,
            field: field.to_string(),
            problem,
        });
    }

    /// `null` counts as missing, matching how optional fields deserialize.
    fn required_str<'v>(
        &mut self,
        obj: &'v Object,
        entity: EntityKind,
        index: Option<usize>,
        field: &str,
    ) -> Option<&'v str> {
        match obj.get(field) {
            None | Some(Value::Null) => {
                self.push(entity, index, field, FieldProblem::Missing);
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.wrong_type(entity, index, field, JsonKind::String, other);
                None
            }
        }
    }

    fn optional_str<'v>(
        &mut self,
        value: Option<&'v Value>,
        entity: EntityKind,
        index: Option<usize>,
        field: &str,
    ) -> Option<&'v str> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.wrong_type(entity, index, field, JsonKind::String, other);
                None
            }
        }
    }

    fn optional_object<'v>(
        &mut self,
        value: Option<&'v Value>,
        entity: EntityKind,
        index: Option<usize>,
        field: &str,
    ) -> Option<&'v Object> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::Object(obj)) => Some(obj),
            Some(other) => {
                self.wrong_type(entity, index, field, JsonKind::Object, other);
                None
            }
        }
    }

    fn wrong_type(
        &mut self,
        entity: EntityKind,
        index: Option<usize>,
        field: &str,
        expected: JsonKind,
        found: &Value,
    ) {
        self.push(
            entity,
            index,
            field,
            FieldProblem::WrongType {
                expected,
                found: JsonKind::of(found),
            },
        );
    }

    fn invalid_value(
        &mut self,
        entity: EntityKind,
        index: Option<usize>,
        field: &str,
        found: &str,
        allowed: &[&str],
    ) {
        self.push(
            entity,
            index,
            field,
            FieldProblem::InvalidValue {
                found: found.to_string(),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            },
        );
    }

    pub(crate) fn check_meta(&mut self, meta: &Object) {
        self.required_str(meta, EntityKind::Meta, None, "title");
        self.optional_str(meta.get("description"), EntityKind::Meta, None, "description");
    }

    /// Checks every node and returns the set of well-formed ids.
    pub(crate) fn check_nodes<'v>(&mut self, nodes: &'v [Value]) -> HashSet<&'v str> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());

        for (index, value) in nodes.iter().enumerate() {
            let at = Some(index);
            let Some(node) = value.as_object() else {
                self.push(
                    EntityKind::Node,
                    at,
                    "",
                    FieldProblem::WrongType {
                        expected: JsonKind::Object,
                        found: JsonKind::of(value),
                    },
                );
                continue;
            };

            if let Some(id) = self.required_str(node, EntityKind::Node, at, "id")
                && !seen.insert(id)
            {
                self.errors.push(ValidationError::DuplicateId {
                    index,
                    id: id.to_string(),
                });
            }
            self.required_str(node, EntityKind::Node, at, "label");
            self.required_str(node, EntityKind::Node, at, "type");
            self.optional_str(node.get("group"), EntityKind::Node, at, "group");

            if let Some(properties) =
                self.optional_object(node.get("properties"), EntityKind::Node, at, "properties")
            {
                for (key, prop) in properties {
                    if !matches!(prop, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
                        self.wrong_type(
                            EntityKind::Node,
                            at,
                            &format!("properties.{key}"),
                            JsonKind::Scalar,
                            prop,
                        );
                    }
                }
            }

            if let Some(style) =
                self.optional_object(node.get("style"), EntityKind::Node, at, "style")
            {
                self.optional_str(style.get("color"), EntityKind::Node, at, "style.color");
                self.optional_str(style.get("shape"), EntityKind::Node, at, "style.shape");
            }
        }

        seen
    }

    pub(crate) fn check_edges(&mut self, edges: &[Value], node_ids: &HashSet<&str>) {
        for (index, value) in edges.iter().enumerate() {
            let at = Some(index);
            let Some(edge) = value.as_object() else {
                self.push(
                    EntityKind::Edge,
                    at,
                    "",
                    FieldProblem::WrongType {
                        expected: JsonKind::Object,
                        found: JsonKind::of(value),
                    },
                );
                continue;
            };

            let source = self.required_str(edge, EntityKind::Edge, at, "source");
            let target = self.required_str(edge, EntityKind::Edge, at, "target");
            for (endpoint, id) in [
                (Endpoint::Source, source),
                (Endpoint::Target, target),
            ] {
                if let Some(id) = id
                    && !node_ids.contains(id)
                {
                    self.errors.push(ValidationError::Referential {
                        edge_index: index,
                        endpoint,
                        node_id: id.to_string(),
                    });
                }
            }

            self.optional_str(edge.get("label"), EntityKind::Edge, at, "label");
            if let Some(direction) =
                self.optional_str(edge.get("direction"), EntityKind::Edge, at, "direction")
                && Direction::from_wire(direction).is_none()
            {
                self.invalid_value(
                    EntityKind::Edge,
                    at,
                    "direction",
                    direction,
                    &Direction::WIRE_VALUES,
                );
            }

            if let Some(style) =
                self.optional_object(edge.get("style"), EntityKind::Edge, at, "style")
            {
                self.optional_str(style.get("color"), EntityKind::Edge, at, "style.color");
                if let Some(line_type) =
                    self.optional_str(style.get("lineType"), EntityKind::Edge, at, "style.lineType")
                    && LineType::from_wire(line_type).is_none()
                {
                    self.invalid_value(
                        EntityKind::Edge,
                        at,
                        "style.lineType",
                        line_type,
                        &LineType::WIRE_VALUES,
                    );
                }
            }
        }
    }
}
