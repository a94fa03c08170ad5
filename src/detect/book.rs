use crate::content::ContentCache;
use crate::detect::{Detector, CONFIDENCE_HIGH, CONFIDENCE_MEDIUM};
use crate::models::{DetectionResult, FileInfo};
use regex::{Regex, RegexBuilder};

/// Dedicated ebook formats.
const EBOOK_EXTENSIONS: [&str; 5] = ["epub", "mobi", "azw", "azw3", "fb2"];

/// Structural keywords that book front/back matter contains.
const BOOK_KEYWORDS: [&str; 15] = [
    r"\bedition\b",
    r"\bchapter\s+\d+\b",
    r"\bpreface\b",
    r"\bforeword\b",
    r"\bepilogue\b",
    r"\bprologue\b",
    r"\btable\s+of\s+contents\b",
    r"\backnowledgments?\b",
    r"\bbibliography\b",
    r"\bappendix\b",
    r"\bindex\b",
    r"\bcopyright\s+©?\s*\d{4}\b",
    r"\ball\s+rights\s+reserved\b",
    r"\bpublished\s+by\b",
    r"\bprinted\s+in\b",
];

/// Detector for books: dedicated ebook formats by extension, PDFs by
/// ISBN and structural keyword analysis.
pub struct BookDetector {
    isbn: Regex,
    keywords: Vec<Regex>,
}

impl BookDetector {
    pub fn new() -> Self {
        let keywords = BOOK_KEYWORDS
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .unwrap()
            })
            .collect();
        Self {
            isbn: RegexBuilder::new(r"\bISBN[-:\s]*[\d\-\sXx]{10,17}\b")
                .case_insensitive(true)
                .build()
                .unwrap(),
            keywords,
        }
    }
}

impl Default for BookDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for BookDetector {
    fn name(&self) -> &'static str {
        "BookDetector"
    }

    fn priority(&self) -> u32 {
        20
    }

    fn detect(&self, file: &FileInfo, content: &ContentCache) -> Option<DetectionResult> {
        let ext = file.extension.as_str();

        if EBOOK_EXTENSIONS.contains(&ext) {
            return Some(DetectionResult {
                category: "Books".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: Some(format!("Ebook format (.{})", ext)),
            });
        }

        if ext != "pdf" {
            return None;
        }

        let text = content.pdf_text(&file.path)?;

        if self.isbn.is_match(&text) {
            return Some(DetectionResult {
                category: "Books".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: Some("Contains ISBN".to_string()),
            });
        }

        let match_count = self.keywords.iter().filter(|p| p.is_match(&text)).count();

        if match_count >= 4 {
            return Some(DetectionResult {
                category: "Books".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: Some(format!("Contains {} book keywords", match_count)),
            });
        }
        if match_count >= 2 {
            return Some(DetectionResult {
                category: "Books".to_string(),
                confidence: CONFIDENCE_MEDIUM,
                detector_name: self.name().to_string(),
                reason: Some("Contains book-related keywords".to_string()),
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> (tempfile::TempDir, FileInfo) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, "x").unwrap();
        let info = FileInfo::from_path(&path).unwrap();
        (dir, info)
    }

    #[test]
    fn test_ebook_extensions_are_books() {
        let detector = BookDetector::new();
        let cache = ContentCache::new();

        for name in ["novel.epub", "novel.mobi", "novel.azw3", "novel.fb2"] {
            let (_dir, info) = file(name);
            let result = detector.detect(&info, &cache).unwrap();
            assert_eq!(result.category, "Books");
            assert_eq!(result.confidence, CONFIDENCE_HIGH);
        }
    }

    #[test]
    fn test_isbn_pattern() {
        let detector = BookDetector::new();
        assert!(detector.isbn.is_match("ISBN 978-1-59327-828-1"));
        assert!(detector.isbn.is_match("ISBN: 0-596-52068-9"));
        assert!(!detector.isbn.is_match("no identifiers here"));
    }

    #[test]
    fn test_keyword_thresholds() {
        let detector = BookDetector::new();
        let four = "Preface\nForeword\nBibliography\nAppendix A";
        let count = detector.keywords.iter().filter(|p| p.is_match(four)).count();
        assert_eq!(count, 4);

        let two = "Chapter 1\nTable of Contents";
        let count = detector.keywords.iter().filter(|p| p.is_match(two)).count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_non_book_extension_is_none() {
        let detector = BookDetector::new();
        let cache = ContentCache::new();
        let (_dir, info) = file("track.mp3");

        assert!(detector.detect(&info, &cache).is_none());
    }

    #[test]
    fn test_unreadable_pdf_is_none() {
        let detector = BookDetector::new();
        let cache = ContentCache::new();
        let (_dir, info) = file("scan.pdf");

        assert!(detector.detect(&info, &cache).is_none());
    }
}
