//! Content digests for equality checks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use blake3::Hasher;

use twinsync_core::{ContentHash, Result, SyncError};

const READ_BUFFER: usize = 64 * 1024;

/// Compute the full BLAKE3 digest of a file.
///
/// # Errors
///
/// Returns [`SyncError::HashComputationFailure`] if the file cannot be opened
/// or read. Callers must not treat a failure as either "equal" or "differs".
pub fn hash_file(path: &Path) -> Result<ContentHash> {
    let failure = |source: std::io::Error| SyncError::HashComputationFailure {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(failure)?;
    let mut hasher = Hasher::new();
    hasher
        .update_reader(BufReader::with_capacity(READ_BUFFER, file))
        .map_err(failure)?;

    Ok(ContentHash::new(*hasher.finalize().as_bytes()))
}
