//! FITS inputs discovered for preview generation.

use std::path::{Path, PathBuf};

/// A FITS file and the base name its preview artifacts are named after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitsInput {
    pub path: PathBuf,
    pub base_name: String,
}

impl FitsInput {
    /// Input found in a local directory; the base name drops only the final
    /// extension (`a.b.fits` -> `a.b`).
    pub fn from_local(path: PathBuf) -> Self {
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, base_name }
    }

    /// Input staged for an object-storage run; the base name is everything
    /// before the first `.` (`a.b.fits` -> `a`).
    pub fn from_staged(path: PathBuf) -> Self {
        let base_name = file_name(&path)
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();
        Self { path, base_name }
    }

    /// Directory holding the input; previews land here in local mode.
    pub fn parent_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Final path component as a string, empty if the path has none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
