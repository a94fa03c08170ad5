use anyhow::Result;
use chrono::{DateTime, Local, NaiveDateTime};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Compute Blake3 hash of file contents, streaming to handle large files.
pub fn compute_file_hash(file_path: &Path) -> Result<String> {
    let mut file = File::open(file_path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// Sanitize a string to be safe as a filename on all major operating systems.
///
/// Replaces forbidden characters, collapses whitespace/underscore runs,
/// strips leading dots and caps the length.
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
    if name.is_empty() {
        return "unnamed".to_string();
    }

    // Fold a few common compatibility characters before filtering
    let mut normalized = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => normalized.push(' '),
            '\u{2018}' | '\u{2019}' => normalized.push('\''),
            '\u{201C}' | '\u{201D}' => normalized.push('"'),
            c if c.is_control() => {}
            c => normalized.push(c),
        }
    }

    // Windows: \ / : * ? " < > |  -- macOS/Linux: / and NUL
    let forbidden = Regex::new(r#"[\\/:*?"<>|]"#).unwrap();
    let name = forbidden.replace_all(&normalized, "_");

    // Collapse runs of whitespace/underscores into a single space
    let collapse = Regex::new(r"[\s_]+").unwrap();
    let name = collapse.replace_all(&name, " ");

    let name = name.trim().trim_start_matches('.');

    let mut name = name.to_string();
    if name.chars().count() > max_length {
        name = name.chars().take(max_length).collect::<String>();
        name = name.trim_end().to_string();
    }

    if name.is_empty() {
        return "unnamed".to_string();
    }

    name
}

/// Check whether a filename stem looks auto-generated or uninformative.
///
/// Matches timestamp-like digit runs, UUIDs, UUID-ish hex-dash groups and
/// bare hex strings.
pub fn is_ugly_filename(name: &str) -> bool {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);

    if stem.is_empty() {
        return true;
    }

    let digit_count = stem.chars().filter(|c| c.is_ascii_digit()).count();
    let digit_ratio = digit_count as f32 / stem.chars().count() as f32;
    if digit_ratio > 0.7 {
        return true;
    }

    let stem_lower = stem.to_lowercase();
    let uuid = Regex::new(r"^[a-f0-9]{8}(-[a-f0-9]{4}){3}-[a-f0-9]{12}$").unwrap();
    if uuid.is_match(&stem_lower) {
        return true;
    }

    // UUID-like hex groups separated by dashes, with or without a prefix
    let hex_dash = Regex::new(r"^[a-f0-9]{2,}(-[a-f0-9]{2,}){3,}$").unwrap();
    if hex_dash.is_match(&stem_lower) {
        return true;
    }

    let hex = Regex::new(r"^[a-f0-9]{16,}$").unwrap();
    if hex.is_match(&stem_lower) {
        return true;
    }

    false
}

/// Generate a unique path by appending " (1)", " (2)", ... while the
/// destination exists.
pub fn generate_unique_path(dest: &Path) -> PathBuf {
    if !dest.exists() {
        return dest.to_path_buf();
    }

    let stem = dest
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let ext = dest.extension().and_then(|e| e.to_str());
    let parent = dest.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1;
    loop {
        let new_name = match ext {
            Some(ext) => format!("{} ({}).{}", stem, counter, ext),
            None => format!("{} ({})", stem, counter),
        };
        let new_path = parent.join(new_name);
        if !new_path.exists() {
            return new_path;
        }
        counter += 1;
    }
}

/// Convert bytes to a human-readable size string.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format a timestamp as an ISO date string (YYYY-MM-DD).
pub fn format_date(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Format a timestamp with time, for screenshot naming
/// (YYYY-MM-DD_HH-MM-SS).
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d_%H-%M-%S").to_string()
}
