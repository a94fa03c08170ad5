use crate::content::ContentCache;
use crate::detect::{Detector, CONFIDENCE_HIGH};
use crate::models::{DetectionResult, FileInfo};
use regex::{Regex, RegexBuilder};

/// Screenshot filename patterns across operating systems, tools and
/// locales. Anchored at the start of the stem.
const SCREENSHOT_PATTERNS: [&str; 16] = [
    // macOS: "Screen Shot 2024-01-15 at 10.30.45 AM.png"
    r"^Screen Shot \d{4}-\d{2}-\d{2} at \d{1,2}\.\d{2}\.\d{2}( [AP]M)?",
    // macOS newer: "Screenshot 2024-01-15 at 10.30.45.png"
    r"^Screenshot \d{4}-\d{2}-\d{2} at \d{1,2}\.\d{2}\.\d{2}",
    // Windows Snipping Tool: "Screenshot 2024-01-15 103045.png"
    r"^Screenshot \d{4}-\d{2}-\d{2} \d{6}",
    // Windows: "Screenshot (123).png"
    r"^Screenshot \(\d+\)",
    r"^Screenshot[_\s-]",
    r"^Screen Shot[_\s-]",
    // Spanish
    r"^Captura de pantalla",
    r"^Captura[_\s-]",
    // German
    r"^Bildschirmfoto",
    // French
    r"^Capture d['\u{2019}]écran",
    r"^CleanShot \d{4}-\d{2}-\d{2}",
    r"^Skitch",
    r"^Lightshot",
    r"^ShareX",
    r"^Greenshot",
    r"^Snagit",
];

/// Image extensions screenshots typically use.
const SCREENSHOT_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "tiff", "bmp"];

/// Detector for screenshot files, matching filename patterns used by
/// the usual OS and tool suspects.
pub struct ScreenshotDetector {
    patterns: Vec<Regex>,
}

impl ScreenshotDetector {
    pub fn new() -> Self {
        let patterns = SCREENSHOT_PATTERNS
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .unwrap()
            })
            .collect();
        Self { patterns }
    }
}

impl Default for ScreenshotDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ScreenshotDetector {
    fn name(&self) -> &'static str {
        "ScreenshotDetector"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn detect(&self, file: &FileInfo, _content: &ContentCache) -> Option<DetectionResult> {
        if !SCREENSHOT_EXTENSIONS.contains(&file.extension.as_str()) {
            return None;
        }

        let stem = file.stem();
        for pattern in &self.patterns {
            if pattern.is_match(stem) {
                return Some(DetectionResult {
                    category: "Screenshots".to_string(),
                    confidence: CONFIDENCE_HIGH,
                    detector_name: self.name().to_string(),
                    reason: None,
                });
            }
        }

        None
    }
}
