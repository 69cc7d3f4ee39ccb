use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{Result, TriageError};
use crate::report::model::{ArtifactHash, ArtifactInfo};

/// Fingerprint an artifact on disk.
///
/// The identity depends only on the file bytes; timestamps and permissions
/// are ignored. The file is streamed through the hasher, never loaded whole.
pub fn read_artifact(path: &Path) -> Result<ArtifactInfo> {
    let not_found = || TriageError::ArtifactNotFound {
        path: path.to_path_buf(),
    };

    // Checked before opening: opening a FIFO blocks until a writer appears.
    let metadata = std::fs::metadata(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => not_found(),
        _ => TriageError::Io(err),
    })?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    let mut file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => not_found(),
        _ => TriageError::Io(err),
    })?;

    let mut hasher = Sha256::new();
    let size_bytes = io::copy(&mut file, &mut hasher)?;

    Ok(ArtifactInfo {
        path: path.display().to_string(),
        size_bytes,
        hash: ArtifactHash {
            algorithm: "sha256".to_string(),
            value: hex::encode(hasher.finalize()),
        },
    })
}
