//! Renderer configuration.
//!
//! Defaults reproduce the reprocessing pipeline exactly; a JSON file can
//! override any field.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default auto-scale percentile passed to the imaging renderer.
pub const DEFAULT_AUTOSCALE: f64 = 99.5;

/// Pixel size of the thumbnail profile.
pub const THUMBNAIL_SIZE: u32 = 128;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Requested output size of an imaging preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputSize {
    /// Longest side scaled to this many pixels
    Fixed(u32),
    /// Original image size
    Natural,
}

impl OutputSize {
    /// Value of the renderer's `--output-size` flag (`-1` means natural size).
    pub fn as_arg(&self) -> String {
        match self {
            OutputSize::Fixed(pixels) => pixels.to_string(),
            OutputSize::Natural => "-1".to_string(),
        }
    }
}

/// One imaging output: file name suffix and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputProfile {
    pub suffix: String,
    pub size: OutputSize,
}

impl OutputProfile {
    pub fn new(suffix: &str, size: OutputSize) -> Self {
        Self {
            suffix: suffix.to_string(),
            size,
        }
    }

    /// The two profiles produced for every imaging input.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("_thumb", OutputSize::Fixed(THUMBNAIL_SIZE)),
            Self::new("", OutputSize::Natural),
        ]
    }
}

/// Which files a successful spectral render reports as produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpectralListing {
    /// Only files created or modified by the renderer run
    #[default]
    NewFiles,
    /// Every file in the output directory, including stale ones
    DirectoryContents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Executable for 2-D image previews
    pub imaging_program: String,
    /// Executable for spectral previews
    pub spectral_program: String,
    /// Auto-scale percentile for image previews
    pub autoscale: f64,
    /// Imaging output profiles, rendered in order
    pub profiles: Vec<OutputProfile>,
    pub spectral_listing: SpectralListing,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            imaging_program: "fitscut".to_string(),
            spectral_program: "make_hst_spec_previews".to_string(),
            autoscale: DEFAULT_AUTOSCALE,
            profiles: OutputProfile::defaults(),
            spectral_listing: SpectralListing::default(),
        }
    }
}

impl PreviewConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
