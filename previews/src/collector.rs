//! Collection of rendered preview files from a preview directory.

use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{PreviewError, Result};

/// Preview file patterns, in collection order.
pub const PREVIEW_PATTERNS: [&str; 2] = ["*.png", "*.jpg"];

/// Paths in `dir` matching `pattern`, with the directory part escaped.
/// Hidden files only match a pattern that starts with `.`.
pub fn glob_in(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let paths = glob_with(&full, options).map_err(|source| PreviewError::Pattern {
        pattern: full.clone(),
        source,
    })?;
    Ok(paths.filter_map(|entry| entry.ok()).collect())
}

/// All PNG and JPEG previews in `search_dir`, sorted lexicographically.
///
/// Zero-length files are skipped with a warning, so every returned path is a
/// non-empty file.
pub fn collect(search_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut previews = Vec::new();
    for pattern in PREVIEW_PATTERNS {
        previews.extend(glob_in(search_dir, pattern)?);
    }
    previews.sort();

    Ok(previews
        .into_iter()
        .filter(|path| match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_file() && metadata.len() > 0 => true,
            _ => {
                warn!("Skipping empty preview {}", path.display());
                false
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collects_png_and_jpg_sorted() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["x1d.png", "a_thumb.jpg", "a.jpg", "x1d_thumb.png", "notes.txt"] {
            std::fs::write(temp_dir.path().join(name), b"data").unwrap();
        }

        let previews = collect(temp_dir.path()).unwrap();
        let names: Vec<String> = previews
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "a_thumb.jpg", "x1d.png", "x1d_thumb.png"]);
    }

    #[test]
    fn test_skips_empty_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("empty.jpg"), b"").unwrap();
        std::fs::write(temp_dir.path().join("full.jpg"), b"jpeg").unwrap();

        let previews = collect(temp_dir.path()).unwrap();
        assert_eq!(previews, vec![temp_dir.path().join("full.jpg")]);
        for path in &previews {
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(collect(&temp_dir.path().join("previews")).unwrap().is_empty());
    }

    #[test]
    fn test_directory_with_glob_characters() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("run[1]");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.png"), b"png").unwrap();

        assert_eq!(collect(&dir).unwrap(), vec![dir.join("a.png")]);
    }
}
