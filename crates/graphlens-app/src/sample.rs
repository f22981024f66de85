use graphlens_core::FetchError;
use std::fs;
use std::path::PathBuf;

/// Graph bundled with the viewer for "load sample".
pub const SAMPLE_GRAPH: &str = include_str!("../assets/sample_graph.json");

/// Read-only provider of the sample graph document.
pub trait SampleSource {
    fn fetch(&self) -> Result<String, FetchError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSample;

impl SampleSource for EmbeddedSample {
    fn fetch(&self) -> Result<String, FetchError> {
        Ok(SAMPLE_GRAPH.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct FileSample {
    path: PathBuf,
}

impl FileSample {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for FileSample {
    fn fetch(&self) -> Result<String, FetchError> {
        fs::read_to_string(&self.path).map_err(|e| FetchError::Io {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}
