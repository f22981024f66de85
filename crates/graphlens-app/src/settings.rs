use crate::sample::{EmbeddedSample, FileSample, SampleSource};
use anyhow::{Context, Result};
use graphlens_graph::{Color, DEFAULT_EDGE_COLOR, DEFAULT_NODE_SHAPE, StylePalette};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Viewer configuration, stored as JSON. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Hex colours for palette slots. Empty means the built-in palette.
    pub node_palette: Vec<String>,
    pub default_edge_color: String,
    pub default_node_shape: String,
    /// Where "load sample" reads from; the bundled sample when unset.
    pub sample_path: Option<PathBuf>,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            node_palette: Vec::new(),
            default_edge_color: DEFAULT_EDGE_COLOR.to_hex(),
            default_node_shape: DEFAULT_NODE_SHAPE.to_string(),
            sample_path: None,
        }
    }
}

impl ViewerSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings: ViewerSettings = serde_json::from_str(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Build the style palette. Palette entries that are not hex colours are
    /// skipped.
    pub fn palette(&self) -> StylePalette {
        let colors = self
            .node_palette
            .iter()
            .filter_map(|entry| match Color::from_hex(entry) {
                Some(color) => Some(color.to_hex()),
                None => {
                    tracing::warn!(entry = %entry, "ignoring palette entry that is not a hex colour");
                    None
                }
            })
            .collect();
        StylePalette::new(
            colors,
            self.default_edge_color.clone(),
            self.default_node_shape.clone(),
        )
    }

    pub fn sample_source(&self) -> Box<dyn SampleSource> {
        match &self.sample_path {
            Some(path) => Box::new(FileSample::new(path.clone())),
            None => Box::new(EmbeddedSample),
        }
    }
}
