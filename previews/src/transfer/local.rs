use std::path::Path;
use tracing::{debug, info};

use super::{TransferError, Transferred};
use crate::input::file_name;

/// True if both paths resolve to the same existing file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy `artifact` to `dest_dir/<file name>`, creating `dest_dir` as needed.
///
/// Copying a file onto itself is a no-op.
pub fn copy_to_dir(artifact: &Path, dest_dir: &Path) -> Result<Transferred, TransferError> {
    let dest = dest_dir.join(file_name(artifact));

    std::fs::create_dir_all(dest_dir).map_err(|source| TransferError::CreateDir {
        path: dest_dir.display().to_string(),
        source,
    })?;

    if same_file(artifact, &dest) {
        debug!("{} is already in place", dest.display());
        return Ok(Transferred::InPlace(dest));
    }

    info!("Copying {} to {}", artifact.display(), dest.display());
    std::fs::copy(artifact, &dest).map_err(|source| TransferError::Copy {
        from: artifact.display().to_string(),
        to: dest.display().to_string(),
        source,
    })?;
    Ok(Transferred::Copied(dest))
}
