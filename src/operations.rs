use crate::categories::CategoryManager;
use crate::utils::{compute_file_hash, generate_unique_path};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Holding area for exact duplicates, under the Unsorted folder.
pub const DUPLICATES_DIR: &str = "_duplicates";

/// Safely move a file, creating parent directories and disambiguating
/// the destination with a " (1)"-style suffix when it already exists.
///
/// Falls back to copy-and-remove when a plain rename fails, which
/// covers cross-device moves.
pub fn safe_move(src: &Path, dest: &Path) -> Result<PathBuf> {
    if !src.exists() {
        bail!("Source file not found: {}", src.display());
    }
    if src.is_dir() {
        bail!("Source must be a file, not a directory: {}", src.display());
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let final_dest = generate_unique_path(dest);

    if fs::rename(src, &final_dest).is_err() {
        fs::copy(src, &final_dest)
            .with_context(|| format!("Failed to copy to {}", final_dest.display()))?;
        fs::remove_file(src)
            .with_context(|| format!("Failed to remove source {}", src.display()))?;
    }

    Ok(final_dest)
}

/// Rename a file within its directory, disambiguating on collision.
/// A no-op when the name is unchanged.
pub fn safe_rename(path: &Path, new_name: &str) -> Result<PathBuf> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    if new_name.contains('/') || new_name.contains('\\') {
        bail!("New name must not contain path separators: {}", new_name);
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let new_path = parent.join(new_name);
    if new_path == path {
        return Ok(path.to_path_buf());
    }

    let final_path = generate_unique_path(&new_path);
    fs::rename(path, &final_path)
        .with_context(|| format!("Failed to rename to {}", final_path.display()))?;

    Ok(final_path)
}

/// Create the destination root and one NN_Name folder per category.
pub fn ensure_dest_structure(dest: &Path, manager: &CategoryManager) -> Result<()> {
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create destination: {}", dest.display()))?;

    for category in manager.list_categories() {
        let folder = dest.join(category.folder_name());
        fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create folder: {}", folder.display()))?;
    }

    Ok(())
}

/// Check whether the file's content already exists in the destination
/// folder, comparing streaming hashes. Unreadable files are skipped.
pub fn is_duplicate(file: &Path, dest_folder: &Path) -> Option<PathBuf> {
    if !file.exists() || !dest_folder.exists() {
        return None;
    }

    let source_hash = compute_file_hash(file).ok()?;

    let entries = fs::read_dir(dest_folder).ok()?;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if let Ok(hash) = compute_file_hash(&path) {
            if hash == source_hash {
                return Some(path);
            }
        }
    }

    None
}

/// Move a file into the duplicates holding area under Unsorted.
pub fn move_to_duplicates(file: &Path, dest: &Path, manager: &CategoryManager) -> Result<PathBuf> {
    let duplicates_folder = dest.join(manager.unsorted_folder()).join(DUPLICATES_DIR);
    fs::create_dir_all(&duplicates_folder).with_context(|| {
        format!("Failed to create folder: {}", duplicates_folder.display())
    })?;

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    safe_move(file, &duplicates_folder.join(file_name))
}
