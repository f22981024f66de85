//! Colour and shape resolution for projected nodes and edges.
//!
//! Explicit styling on an entity always wins. Everything else comes from a
//! fixed palette indexed by a stable hash of the colour key, so the same type
//! (or group) gets the same colour on every run.

use graphlens_core::{GraphEdge, GraphNode, GroupBy, LineType};

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `#RGB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => Some(Self::rgb(
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            )),
            3 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..=i], 16).map(|v| v * 17);
                Some(Self::rgb(channel(0).ok()?, channel(1).ok()?, channel(2).ok()?))
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_NODE_PALETTE: [Color; 12] = [
    Color::rgb(0x4E, 0x79, 0xA7),
    Color::rgb(0xF2, 0x8E, 0x2B),
    Color::rgb(0xE1, 0x57, 0x59),
    Color::rgb(0x76, 0xB7, 0xB2),
    Color::rgb(0x59, 0xA1, 0x4F),
    Color::rgb(0xED, 0xC9, 0x48),
    Color::rgb(0xB0, 0x7A, 0xA1),
    Color::rgb(0xFF, 0x9D, 0xA7),
    Color::rgb(0x9C, 0x75, 0x5F),
    Color::rgb(0xBA, 0xB0, 0xAC),
    Color::rgb(0x3B, 0x8E, 0xA5),
    Color::rgb(0x8C, 0xD1, 0x7D),
];

pub const DEFAULT_EDGE_COLOR: Color = Color::rgb(0x9E, 0x9E, 0x9E);

pub const DEFAULT_NODE_SHAPE: &str = "ellipse";

/// 32-bit FNV-1a. Std's hasher is randomly seeded, which would reshuffle the
/// palette between runs.
fn fnv1a(key: &str) -> u32 {
    const OFFSET: u32 = 0x811C_9DC5;
    const PRIME: u32 = 0x0100_0193;
    key.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(PRIME))
}

/// Key used to pick a palette colour for `node`.
pub fn color_key(node: &GraphNode, group_by: GroupBy) -> &str {
    match group_by {
        GroupBy::Group => node.group.as_deref().unwrap_or(&node.node_type),
        GroupBy::None | GroupBy::Type => &node.node_type,
    }
}

/// Key the backend clusters nodes by; `None` disables clustering.
pub fn cluster_key(node: &GraphNode, group_by: GroupBy) -> Option<&str> {
    match group_by {
        GroupBy::None => None,
        GroupBy::Type | GroupBy::Group => Some(color_key(node, group_by)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePalette {
    node_colors: Vec<String>,
    edge_color: String,
    node_shape: String,
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            node_colors: DEFAULT_NODE_PALETTE.iter().map(Color::to_hex).collect(),
            edge_color: DEFAULT_EDGE_COLOR.to_hex(),
            node_shape: DEFAULT_NODE_SHAPE.to_string(),
        }
    }
}

impl StylePalette {
    /// An empty `node_colors` falls back to [`DEFAULT_NODE_PALETTE`].
    pub fn new(node_colors: Vec<String>, edge_color: String, node_shape: String) -> Self {
        let node_colors = if node_colors.is_empty() {
            DEFAULT_NODE_PALETTE.iter().map(Color::to_hex).collect()
        } else {
            node_colors
        };
        Self {
            node_colors,
            edge_color,
            node_shape,
        }
    }

    pub fn color_for_key(&self, key: &str) -> &str {
        let slot = fnv1a(key) as usize % self.node_colors.len();
        &self.node_colors[slot]
    }

    pub fn node_color(&self, node: &GraphNode, group_by: GroupBy) -> String {
        node.style
            .as_ref()
            .and_then(|s| s.color.clone())
            .unwrap_or_else(|| self.color_for_key(color_key(node, group_by)).to_string())
    }

    pub fn node_shape(&self, node: &GraphNode) -> String {
        node.style
            .as_ref()
            .and_then(|s| s.shape.clone())
            .unwrap_or_else(|| self.node_shape.clone())
    }

    pub fn edge_color(&self, edge: &GraphEdge) -> String {
        edge.style
            .as_ref()
            .and_then(|s| s.color.clone())
            .unwrap_or_else(|| self.edge_color.clone())
    }

    pub fn line_type(&self, edge: &GraphEdge) -> LineType {
        edge.style
            .as_ref()
            .and_then(|s| s.line_type)
            .unwrap_or_default()
    }
}
