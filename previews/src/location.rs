//! Input and destination locations.
//!
//! A location is either a local directory (optionally written as a `file:`
//! URI) or an object-storage URI `scheme://bucket/key/prefix`.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Schemes that address object storage.
pub const OBJECT_SCHEMES: [&str; 1] = ["s3"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocationError {
    #[error("Unsupported URI scheme '{scheme}' in {uri}")]
    UnsupportedScheme { scheme: String, uri: String },
    #[error("Object storage URI {uri} has no bucket")]
    MissingBucket { uri: String },
    #[error("Empty location")]
    Empty,
}

/// Bucket and key prefix of an object-storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUri {
    pub scheme: String,
    pub bucket: String,
    /// Key prefix without leading or trailing `/`; may be empty
    pub prefix: String,
}

impl ObjectUri {
    /// Object key for a file named `basename` under this prefix.
    pub fn key_for(&self, basename: &str) -> String {
        if self.prefix.is_empty() {
            basename.to_string()
        } else {
            format!("{}/{}", self.prefix, basename)
        }
    }
}

impl fmt::Display for ObjectUri {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(PathBuf),
    Object(ObjectUri),
}

impl Location {
    pub fn parse(uri: &str) -> Result<Self, LocationError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(LocationError::Empty);
        }

        if let Some((scheme, rest)) = uri.split_once("://") {
            if scheme == "file" {
                return Ok(Location::Local(PathBuf::from(format!("/{}", rest.trim_start_matches('/')))));
            }
            if !OBJECT_SCHEMES.contains(&scheme) {
                return Err(LocationError::UnsupportedScheme {
                    scheme: scheme.to_string(),
                    uri: uri.to_string(),
                });
            }
            let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket.is_empty() {
                return Err(LocationError::MissingBucket {
                    uri: uri.to_string(),
                });
            }
            return Ok(Location::Object(ObjectUri {
                scheme: scheme.to_string(),
                bucket: bucket.to_string(),
                prefix: prefix.trim_matches('/').to_string(),
            }));
        }

        let path = uri.strip_prefix("file:").unwrap_or(uri);
        Ok(Location::Local(PathBuf::from(path)))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Location::Object(_))
    }
}

/// `path` made absolute against `base` if it is relative.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
