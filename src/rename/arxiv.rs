use crate::content::ContentCache;
use crate::models::{DetectionResult, FileInfo, RenameResult};
use crate::rename::Renamer;
use crate::utils::format_date;
use regex::Regex;

/// Renamer for arXiv papers.
///
/// Pattern: `{date}_{arxiv_id}.pdf`. The arXiv ID (version suffix
/// included) is kept verbatim; only a date prefix is added.
pub struct ArxivRenamer {
    id_pattern: Regex,
}

impl ArxivRenamer {
    pub fn new() -> Self {
        Self {
            // YYMM.NNNNN with optional version: "2501.12948v1"
            id_pattern: Regex::new(r"(\d{4}\.\d{4,5})(v\d+)?").unwrap(),
        }
    }
}

impl Default for ArxivRenamer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renamer for ArxivRenamer {
    fn name(&self) -> &'static str {
        "ArxivRenamer"
    }

    fn rename(
        &self,
        file: &FileInfo,
        detection: &DetectionResult,
        _content: &ContentCache,
    ) -> Option<RenameResult> {
        if detection.detector_name != "ArxivDetector" {
            return None;
        }

        let arxiv_id = self.id_pattern.find(file.stem())?.as_str();

        let date_str = format_date(&file.modified);
        let new_name = format!("{}_{}.pdf", date_str, arxiv_id);
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
            category: "Papers".to_string(),
            confidence: 0.9,
            detector_name: "ArxivDetector".to_string(),
            reason: None,
        }
    }

    #[test]
    fn test_keeps_id_with_version_suffix() {
        let (_dir, file) = dummy_file("2501.12948v1.pdf");
        let cache = ContentCache::new();

        let result = ArxivRenamer::new()
            .rename(&file, &detection(), &cache)
            .unwrap();
        let date_str = format_date(&file.modified);
        assert_eq!(result.new_name, format!("{}_2501.12948v1.pdf", date_str));
    }

    #[test]
    fn test_id_without_version() {
        let (_dir, file) = dummy_file("2401.00001.pdf");
        let cache = ContentCache::new();

        let result = ArxivRenamer::new()
            .rename(&file, &detection(), &cache)
            .unwrap();
        assert!(result.new_name.ends_with("_2401.00001.pdf"));
    }

    #[test]
    fn test_ignores_other_detectors() {
        let (_dir, file) = dummy_file("2501.12948v1.pdf");
        let cache = ContentCache::new();
        let other = DetectionResult {
            detector_name: "GenericDetector".to_string(),
            ..detection()
        };

        assert!(ArxivRenamer::new().rename(&file, &other, &cache).is_none());
    }

    #[test]
    fn test_no_id_in_stem_declines() {
        let (_dir, file) = dummy_file("some_paper.pdf");
        let cache = ContentCache::new();

        assert!(ArxivRenamer::new()
            .rename(&file, &detection(), &cache)
            .is_none());
    }
}
