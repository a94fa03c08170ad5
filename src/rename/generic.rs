use crate::content::ContentCache;
use crate::models::{DetectionResult, FileInfo, RenameResult};
use crate::rename::Renamer;
use crate::utils::{format_date, is_ugly_filename, sanitize_filename};

/// Fallback renamer for files without a specialized one.
///
/// Pattern: `{date}_{sanitized_name}.{ext}`, only applied to filenames
/// that look auto-generated; readable names are left alone.
pub struct GenericRenamer;

impl GenericRenamer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenericRenamer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renamer for GenericRenamer {
    fn name(&self) -> &'static str {
        "GenericRenamer"
    }

    fn rename(
        &self,
        file: &FileInfo,
        _detection: &DetectionResult,
        _content: &ContentCache,
    ) -> Option<RenameResult> {
        if !is_ugly_filename(file.stem()) {
            return None;
        }

        let date_str = format_date(&file.modified);
        let sanitized = sanitize_filename(file.stem(), 200);

        let new_stem = if sanitized.chars().count() < 3 {
            format!("{}_file", date_str)
        } else {
            format!("{}_{}", date_str, sanitized)
        };

        let new_name = if file.extension.is_empty() {
            new_stem
        } else {
            format!("{}.{}", new_stem, file.extension)
        };

        if new_name == file.name {
            return None;
        }

        Some(RenameResult {
            original_name: file.name.clone(),
            new_name,
            renamer_name: self.name().to_string(),
            date_extracted: Some(file.modified.date_naive()),
            title_extracted: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_file(name: &str) -> (tempfile::TempDir, FileInfo) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, "x").unwrap();
        let info = FileInfo::from_path(&path).unwrap();
        (dir, info)
    }

    fn detection() -> DetectionResult {
        DetectionResult {
            category: "Documents".to_string(),
            confidence: 0.7,
            detector_name: "GenericDetector".to_string(),
            reason: None,
        }
    }

    #[test]
    fn test_renames_ugly_timestamp_name() {
        let (_dir, file) = dummy_file("1743151465964.bin");
        let cache = ContentCache::new();

        let result = GenericRenamer::new()
            .rename(&file, &detection(), &cache)
            .unwrap();
        let date_str = format_date(&file.modified);
        assert_eq!(result.new_name, format!("{}_1743151465964.bin", date_str));
        assert_eq!(result.renamer_name, "GenericRenamer");
        assert!(result.date_extracted.is_some());
    }

    #[test]
    fn test_leaves_readable_name_alone() {
        let (_dir, file) = dummy_file("Annual_Report_2024.pdf");
        let cache = ContentCache::new();

        assert!(GenericRenamer::new()
            .rename(&file, &detection(), &cache)
            .is_none());
    }

    #[test]
    fn test_short_sanitized_stem_becomes_file() {
        // All digits, so ugly; sanitized stem stays short only if the
        // original collapses below three chars
        let (_dir, file) = dummy_file("12.tmp2");
        let cache = ContentCache::new();

        let result = GenericRenamer::new()
            .rename(&file, &detection(), &cache)
            .unwrap();
        let date_str = format_date(&file.modified);
        assert_eq!(result.new_name, format!("{}_file.tmp2", date_str));
    }
}
