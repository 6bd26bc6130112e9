//! Sanitizing persister: raw page bytes to one file on disk
//!
//! Filenames are derived deterministically from the source URL and declared
//! content type, so re-fetching a page overwrites its previous copy instead
//! of accumulating duplicates. Single-file writes are the unit of
//! durability; there is no multi-file transaction.

mod filename;

pub use filename::{file_name, MAX_FILE_NAME_LENGTH};

use crate::PersistError;
use std::path::{Path, PathBuf};
use url::Url;

/// Writes the full payload under `dir` and returns the created path.
///
/// The caller is responsible for `dir` existing. A name collision silently
/// overwrites; that is accepted rather than guarded against.
pub async fn save(
    bytes: &[u8],
    dir: &Path,
    url: &Url,
    content_type: &str,
    prefix: &str,
) -> Result<PathBuf, PersistError> {
    let path = dir.join(file_name(url, content_type, prefix));
    tracing::debug!(
        "Saving {} bytes from [{}] -> [{}]",
        bytes.len(),
        url,
        path.display()
    );

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}
