use crate::content::ContentCache;
use crate::detect::{Detector, CONFIDENCE_HIGH};
use crate::models::{DetectionResult, FileInfo};
use regex::Regex;

/// Detector for arXiv preprints.
///
/// arXiv downloads keep their identifier as the filename: YYMM.NNNNN or
/// YYMM.NNNNNvN (e.g. 2501.12948v1.pdf).
pub struct ArxivDetector {
    pattern: Regex,
}

impl ArxivDetector {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^\d{4}\.\d{4,5}(v\d+)?$").unwrap(),
        }
    }
}

impl Default for ArxivDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ArxivDetector {
    fn name(&self) -> &'static str {
        "ArxivDetector"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn detect(&self, file: &FileInfo, _content: &ContentCache) -> Option<DetectionResult> {
        if file.extension != "pdf" {
            return None;
        }

        if self.pattern.is_match(file.stem()) {
            return Some(DetectionResult {
                category: "Papers".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: None,
            });
        }

        None
    }
}
