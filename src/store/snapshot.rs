// Snapshot file module
// Reads and writes the whole dish collection as one JSON document

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::dish::Dish;
use super::error::StoreError;

/// Read the data file and decode it as a JSON array of dishes.
///
/// A file containing `null` decodes as an empty collection.
pub fn load(path: &Path) -> Result<Vec<Dish>, StoreError> {
    let content = fs::read(path).map_err(|e| StoreError::io(path, e))?;

    let dishes: Option<Vec<Dish>> =
        serde_json::from_slice(&content).map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(dishes.unwrap_or_default())
}

/// Overwrite the data file with the pretty-printed collection.
///
/// With `atomic` set the content goes to a sibling temp file first, is
/// fsynced, then renamed over `path`, so readers never see a torn file.
pub fn save(path: &Path, dishes: &[Dish], atomic: bool) -> Result<(), StoreError> {
    let content = serde_json::to_vec_pretty(dishes).map_err(StoreError::Encode)?;

    if !atomic {
        return fs::write(path, content).map_err(|e| StoreError::io(path, e));
    }

    let tmp_path = temp_path(path);
    let written = write_synced(&tmp_path, &content).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        // Best effort, the temp file may not exist at all
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

/// `dishes.json` -> `.dishes.json.tmp` in the same directory
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "dishes".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}
