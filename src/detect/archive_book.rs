use crate::content::archive::{book_entries, book_extensions_found, list_zip_entries};
use crate::content::ContentCache;
use crate::detect::{Detector, CONFIDENCE_HIGH, CONFIDENCE_MEDIUM};
use crate::models::{DetectionResult, FileInfo};
use regex::{Regex, RegexBuilder};

/// Archive extensions whose contents can be listed.
const ZIP_COMPATIBLE: [&str; 4] = ["zip", "cbz", "cbr", "epub"];

/// Archive extensions we can only judge by filename.
const OPAQUE_ARCHIVES: [&str; 5] = ["rar", "7z", "tar", "gz", "bz2"];

/// A single one of these in the filename is enough.
const STRONG_BOOK_KEYWORDS: [&str; 6] = [
    r"\bedition\b",
    r"\bhandbook\b",
    r"\btextbook\b",
    r"\bfor\s+dummies\b",
    r"\bcookbook\b",
    r"\bdefinitive\b",
];

/// Weaker signals; two or more are needed.
const MODERATE_BOOK_KEYWORDS: [&str; 22] = [
    r"\bprogramming\b",
    r"\btutorial\b",
    r"\bguide\b",
    r"\bmanual\b",
    r"\blearning\b",
    r"\bmastering\b",
    r"\bbeginning\b",
    r"\badvanced\b",
    r"\bintroducing\b",
    r"\bintroduction\b",
    r"\breference\b",
    r"\bessentials?\b",
    r"\bpractical\b",
    r"\bcomplete\b",
    r"\bcomprehensive\b",
    r"\bstudy\b",
    r"\bcertified\b",
    r"\banalyst\b",
    r"\bdeveloper\b",
    r"\bin\s+action\b",
    r"\bpro\s+\w+",
    r"\bhead\s+first\b",
];

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .unwrap()
        })
        .collect()
}

/// Detector for archives that contain books.
///
/// ZIP-openable archives are inspected for book file entries; opaque
/// formats fall back to filename keyword scoring.
pub struct ArchiveBookDetector {
    strong: Vec<Regex>,
    moderate: Vec<Regex>,
}

impl ArchiveBookDetector {
    pub fn new() -> Self {
        Self {
            strong: compile_all(&STRONG_BOOK_KEYWORDS),
            moderate: compile_all(&MODERATE_BOOK_KEYWORDS),
        }
    }

    fn inspect_zip(&self, file: &FileInfo) -> Option<DetectionResult> {
        let entries = list_zip_entries(&file.path)?;
        let books = book_entries(&entries);
        if books.is_empty() {
            return None;
        }

        let extensions = book_extensions_found(&books);
        Some(DetectionResult {
            category: "Books".to_string(),
            confidence: CONFIDENCE_HIGH,
            detector_name: self.name().to_string(),
            reason: Some(format!(
                "Contains {} book file(s) ({})",
                books.len(),
                extensions.join(", ")
            )),
        })
    }

    fn analyze_filename(&self, file: &FileInfo) -> Option<DetectionResult> {
        let stem = file.stem().to_lowercase();

        if self.strong.iter().any(|p| p.is_match(&stem)) {
            return Some(DetectionResult {
                category: "Books".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: Some("Filename contains strong book indicator".to_string()),
            });
        }

        let moderate_matches = self.moderate.iter().filter(|p| p.is_match(&stem)).count();
        if moderate_matches >= 2 {
            return Some(DetectionResult {
                category: "Books".to_string(),
                confidence: CONFIDENCE_MEDIUM,
                detector_name: self.name().to_string(),
                reason: Some(format!("Filename suggests book ({} keywords)", moderate_matches)),
            });
        }

        None
    }
}

impl Default for ArchiveBookDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ArchiveBookDetector {
    fn name(&self) -> &'static str {
        "ArchiveBookDetector"
    }

    fn priority(&self) -> u32 {
        18
    }

    fn detect(&self, file: &FileInfo, _content: &ContentCache) -> Option<DetectionResult> {
        let ext = file.extension.as_str();
        let zip_compatible = ZIP_COMPATIBLE.contains(&ext);

        if zip_compatible {
            if let Some(result) = self.inspect_zip(file) {
                return Some(result);
            }
        }

        if zip_compatible || OPAQUE_ARCHIVES.contains(&ext) {
            return self.analyze_filename(file);
        }

        None
    }
}
