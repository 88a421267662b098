//! Staging of preview artifacts to their destination.
//!
//! A destination is a local directory (copy) or an object-storage prefix
//! (upload through an [`ObjectStore`]). Every artifact keeps its file name.
//! Errors here are not recovered: they end the run.

pub mod local;
pub mod memory;
pub mod object_store;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::input::file_name;
use crate::location::{Location, ObjectUri};

pub use local::copy_to_dir;
pub use memory::MemoryObjectStore;
pub use object_store::{ObjectStore, S3ObjectStore};

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to create destination directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read {path} for upload: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to upload to {scheme}://{bucket}/{key}: {message}")]
    Upload {
        scheme: String,
        bucket: String,
        key: String,
        message: String,
    },
    #[error("Object storage client unavailable: {0}")]
    Client(String),
    #[error("No object store configured for destination {0}")]
    NoObjectStore(String),
}

/// Where one artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transferred {
    Copied(PathBuf),
    /// Source and destination were already the same file
    InPlace(PathBuf),
    Uploaded { bucket: String, key: String },
}

/// Upload `artifacts` under `uri`, keyed by their file names.
pub fn upload_all(
    store: &dyn ObjectStore,
    artifacts: &[PathBuf],
    uri: &ObjectUri,
) -> Result<Vec<Transferred>, TransferError> {
    let mut transferred = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let key = uri.key_for(&file_name(artifact));
        info!("Uploading {} to {}://{}/{}", artifact.display(), uri.scheme, uri.bucket, key);

        let bytes = std::fs::read(artifact).map_err(|source| TransferError::Read {
            path: artifact.display().to_string(),
            source,
        })?;
        store.put(uri, &key, bytes)?;

        transferred.push(Transferred::Uploaded {
            bucket: uri.bucket.clone(),
            key,
        });
    }
    Ok(transferred)
}

/// Copy every artifact into the local directory `dest_dir`.
pub fn copy_all(artifacts: &[PathBuf], dest_dir: &Path) -> Result<Vec<Transferred>, TransferError> {
    artifacts
        .iter()
        .map(|artifact| copy_to_dir(artifact, dest_dir))
        .collect()
}

/// Stage `artifacts` to `destination`.
///
/// `store` is required only when the destination is object storage.
pub fn transfer(
    artifacts: &[PathBuf],
    destination: &Location,
    store: Option<&dyn ObjectStore>,
) -> Result<Vec<Transferred>, TransferError> {
    match destination {
        Location::Local(dir) => copy_all(artifacts, dir),
        Location::Object(uri) => {
            let store = store.ok_or_else(|| TransferError::NoObjectStore(uri.to_string()))?;
            upload_all(store, artifacts, uri)
        }
    }
}
