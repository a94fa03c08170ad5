use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

/// Book file extensions to look for inside archives.
pub const BOOK_ENTRY_EXTENSIONS: [&str; 7] =
    [".epub", ".mobi", ".azw", ".azw3", ".pdf", ".fb2", ".djvu"];

/// List the entry names of a ZIP-openable archive.
///
/// Returns None when the file cannot be opened or is not a valid ZIP;
/// archive errors never propagate.
pub fn list_zip_entries(path: &Path) -> Option<Vec<String>> {
    let file = File::open(path).ok()?;
    let mut archive = ZipArchive::new(file).ok()?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        if let Ok(entry) = archive.by_index(i) {
            if !entry.is_dir() {
                names.push(entry.name().to_string());
            }
        }
    }
    Some(names)
}

/// Filter archive entries down to the ones that look like book files.
pub fn book_entries(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            BOOK_ENTRY_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        })
        .cloned()
        .collect()
}

/// Distinct book extensions (without the dot) found among archive entries.
pub fn book_extensions_found(entries: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for name in entries {
        let lower = name.to_lowercase();
        for ext in BOOK_ENTRY_EXTENSIONS {
            if lower.ends_with(ext) {
                let bare = ext.trim_start_matches('.').to_string();
                if !found.contains(&bare) {
                    found.push(bare);
                }
                break;
            }
        }
    }
    found
}
