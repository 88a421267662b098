//! Preview image generation for reprocessed FITS products.
//!
//! Each FITS input is classified from the header of its first extension as
//! imaging or spectral data, rendered by the matching external tool, and the
//! resulting JPEG/PNG previews are copied to a local directory or uploaded to
//! an object-storage prefix.

pub mod classify;
pub mod collector;
pub mod config;
pub mod error;
pub mod fits_header;
pub mod input;
pub mod location;
pub mod orchestrator;
pub mod renderer;
pub mod telemetry;
pub mod transfer;

pub use classify::Classification;
pub use config::PreviewConfig;
pub use error::{PreviewError, Result};
pub use orchestrator::{Orchestrator, RunRequest, RunSummary};
