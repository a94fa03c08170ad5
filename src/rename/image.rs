use crate::content::exif::extract_exif_date;
use crate::content::ContentCache;
use crate::models::{DetectionResult, FileInfo, RenameResult};
use crate::rename::Renamer;
use crate::utils::{format_date, is_ugly_filename, sanitize_filename};

/// Image formats that may carry EXIF metadata.
const EXIF_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "tiff", "tif", "heic", "heif"];

/// Renamer for images: `{date}_{sanitized_name}.{ext}`.
///
/// The date prefix comes from the EXIF capture time when the format
/// supports it, else the file modified time. Only ugly names are
/// touched; screenshots never reach this renamer.
pub struct ImageRenamer;

impl ImageRenamer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageRenamer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renamer for ImageRenamer {
    fn name(&self) -> &'static str {
        "ImageRenamer"
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

        let exif_date = if EXIF_EXTENSIONS.contains(&file.extension.as_str()) {
            extract_exif_date(&file.path)
        } else {
            None
        };

        let (date_str, date_extracted) = match exif_date {
            Some(dt) => (dt.format("%Y-%m-%d").to_string(), dt.date()),
            None => (format_date(&file.modified), file.modified.date_naive()),
        };

        let sanitized = sanitize_filename(file.stem(), 200);
        let new_stem = if sanitized.chars().count() < 3 {
            format!("{}_image", date_str)
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
            date_extracted: Some(date_extracted),
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
            category: "Images".to_string(),
            confidence: 0.7,
            detector_name: "GenericDetector".to_string(),
            reason: None,
        }
    }

    #[test]
    fn test_ugly_image_without_exif_uses_modified_date() {
        let (_dir, file) = dummy_file("a1b2c3d4e5f6a7b8c9d0.jpg");
        let cache = ContentCache::new();

        let result = ImageRenamer::new()
            .rename(&file, &detection(), &cache)
            .unwrap();
        let date_str = format_date(&file.modified);
        assert_eq!(
            result.new_name,
            format!("{}_a1b2c3d4e5f6a7b8c9d0.jpg", date_str)
        );
    }

    #[test]
    fn test_readable_name_left_alone() {
        let (_dir, file) = dummy_file("wedding_photos.jpg");
        let cache = ContentCache::new();

        assert!(ImageRenamer::new()
            .rename(&file, &detection(), &cache)
            .is_none());
    }
}
