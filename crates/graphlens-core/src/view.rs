use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {what} `{value}`, expected one of: {}", .allowed.join(", "))]
pub struct ParseModeError {
    pub what: &'static str,
    pub value: String,
    pub allowed: Vec<&'static str>,
}

/// Key the projection uses for colouring and clustering nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    None,
    #[default]
    Type,
    Group,
}

impl GroupBy {
    pub const ALL: [GroupBy; 3] = [GroupBy::None, GroupBy::Type, GroupBy::Group];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Type => "type",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseModeError {
                what: "group-by mode",
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|m| m.as_str()).collect(),
            })
    }
}

/// Layout algorithm requested from the rendering backend. Layout itself is
/// computed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Cose,
    Concentric,
    Grid,
    Circle,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 4] = [
        LayoutMode::Cose,
        LayoutMode::Concentric,
        LayoutMode::Grid,
        LayoutMode::Circle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cose => "cose",
            Self::Concentric => "concentric",
            Self::Grid => "grid",
            Self::Circle => "circle",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseModeError {
                what: "layout",
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|m| m.as_str()).collect(),
            })
    }
}

/// Transient viewer selections. Survives imports; only `reset` restores the
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub group_by: GroupBy,
    pub layout: LayoutMode,
    pub search_term: String,
    pub selected_node_id: Option<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let view = ViewState::default();
        assert_eq!(view.group_by, GroupBy::Type);
        assert_eq!(view.layout, LayoutMode::Cose);
        assert!(view.search_term.is_empty());
        assert!(view.selected_node_id.is_none());
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("group".parse::<GroupBy>(), Ok(GroupBy::Group));
        assert_eq!("concentric".parse::<LayoutMode>(), Ok(LayoutMode::Concentric));

        let err = "spiral".parse::<LayoutMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown layout `spiral`, expected one of: cose, concentric, grid, circle"
        );
        assert!("Type".parse::<GroupBy>().is_err());
    }

    #[test]
    fn test_display_matches_wire_name() {
        for mode in LayoutMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{mode}\""));
        }
        for mode in GroupBy::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{mode}\""));
        }
    }
}
