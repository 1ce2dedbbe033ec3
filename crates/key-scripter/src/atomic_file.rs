use crate::{AppError, AppResult};

use std::{fs, io::Write, panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::debug;

/// Write `contents` to `path` without ever leaving a half-written file.
///
/// Writes a sibling `.tmp` file, syncs it, then renames it over the target.
/// Missing parent directories are created.
#[track_caller]
pub(crate) fn write_atomically(path: &Path, contents: &str) -> AppResult<()> {
    let location = Location::caller();
    let fail = |reason: String| AppError::FileWriteFailed {
        path: path.to_path_buf(),
        reason,
        location: ErrorLocation::from(location),
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| fail(format!("Failed to create directory: {}", e)))?;
            debug!(dir = ?parent, "Created directory");
        }
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let mut temp_file = fs::File::create(temp_path)
        .map_err(|e| fail(format!("Failed to create temp file: {}", e)))?;

    temp_file
        .write_all(contents.as_bytes())
        .map_err(|e| fail(format!("Failed to write temp file: {}", e)))?;

    temp_file
        .sync_all()
        .map_err(|e| fail(format!("Failed to sync temp file: {}", e)))?;

    fs::rename(temp_path, path)
        .map_err(|e| fail(format!("Failed to rename temp file to final: {}", e)))?;

    Ok(())
}
