use crate::content::ContentCache;
use crate::detect::{Detector, CONFIDENCE_HIGH, CONFIDENCE_MEDIUM};
use crate::models::{DetectionResult, FileInfo};

/// Extension to (category, confidence) table. Categories are plain
/// names, never folder names.
const EXTENSION_MAP: [(&str, &str, f32); 85] = [
    // Documents (medium - content detectors may know better)
    ("pdf", "Documents", CONFIDENCE_MEDIUM),
    ("doc", "Documents", CONFIDENCE_MEDIUM),
    ("docx", "Documents", CONFIDENCE_MEDIUM),
    ("txt", "Documents", CONFIDENCE_MEDIUM),
    ("rtf", "Documents", CONFIDENCE_MEDIUM),
    ("odt", "Documents", CONFIDENCE_MEDIUM),
    ("md", "Documents", CONFIDENCE_MEDIUM),
    ("pages", "Documents", CONFIDENCE_MEDIUM),
    ("xls", "Documents", CONFIDENCE_MEDIUM),
    ("xlsx", "Documents", CONFIDENCE_MEDIUM),
    ("ppt", "Documents", CONFIDENCE_MEDIUM),
    ("pptx", "Documents", CONFIDENCE_MEDIUM),
    ("key", "Documents", CONFIDENCE_MEDIUM),
    ("numbers", "Documents", CONFIDENCE_MEDIUM),
    // Images
    ("jpg", "Images", CONFIDENCE_HIGH),
    ("jpeg", "Images", CONFIDENCE_HIGH),
    ("png", "Images", CONFIDENCE_HIGH),
    ("gif", "Images", CONFIDENCE_HIGH),
    ("bmp", "Images", CONFIDENCE_HIGH),
    ("webp", "Images", CONFIDENCE_HIGH),
    ("svg", "Images", CONFIDENCE_MEDIUM),
    ("heic", "Images", CONFIDENCE_HIGH),
    ("heif", "Images", CONFIDENCE_HIGH),
    ("tiff", "Images", CONFIDENCE_HIGH),
    ("tif", "Images", CONFIDENCE_HIGH),
    ("ico", "Images", CONFIDENCE_HIGH),
    ("raw", "Images", CONFIDENCE_HIGH),
    ("cr2", "Images", CONFIDENCE_HIGH),
    ("nef", "Images", CONFIDENCE_HIGH),
    // Videos
    ("mp4", "Videos", CONFIDENCE_HIGH),
    ("mov", "Videos", CONFIDENCE_HIGH),
    ("avi", "Videos", CONFIDENCE_HIGH),
    ("mkv", "Videos", CONFIDENCE_HIGH),
    ("wmv", "Videos", CONFIDENCE_HIGH),
    ("webm", "Videos", CONFIDENCE_HIGH),
    ("m4v", "Videos", CONFIDENCE_HIGH),
    ("flv", "Videos", CONFIDENCE_HIGH),
    // Audio
    ("mp3", "Audio", CONFIDENCE_HIGH),
    ("wav", "Audio", CONFIDENCE_HIGH),
    ("flac", "Audio", CONFIDENCE_HIGH),
    ("aac", "Audio", CONFIDENCE_HIGH),
    ("ogg", "Audio", CONFIDENCE_HIGH),
    ("m4a", "Audio", CONFIDENCE_HIGH),
    ("wma", "Audio", CONFIDENCE_HIGH),
    ("aiff", "Audio", CONFIDENCE_HIGH),
    // Archives (zip/rar/7z could contain books)
    ("zip", "Archives", CONFIDENCE_MEDIUM),
    ("rar", "Archives", CONFIDENCE_MEDIUM),
    ("7z", "Archives", CONFIDENCE_MEDIUM),
    ("tar", "Archives", CONFIDENCE_HIGH),
    ("gz", "Archives", CONFIDENCE_HIGH),
    ("bz2", "Archives", CONFIDENCE_HIGH),
    ("xz", "Archives", CONFIDENCE_HIGH),
    ("tgz", "Archives", CONFIDENCE_HIGH),
    // Code
    ("py", "Code", CONFIDENCE_HIGH),
    ("js", "Code", CONFIDENCE_HIGH),
    ("ts", "Code", CONFIDENCE_HIGH),
    ("java", "Code", CONFIDENCE_HIGH),
    ("c", "Code", CONFIDENCE_HIGH),
    ("cpp", "Code", CONFIDENCE_HIGH),
    ("h", "Code", CONFIDENCE_HIGH),
    ("go", "Code", CONFIDENCE_HIGH),
    ("rs", "Code", CONFIDENCE_HIGH),
    ("rb", "Code", CONFIDENCE_HIGH),
    ("php", "Code", CONFIDENCE_HIGH),
    ("swift", "Code", CONFIDENCE_HIGH),
    ("kt", "Code", CONFIDENCE_HIGH),
    ("html", "Code", CONFIDENCE_MEDIUM),
    ("css", "Code", CONFIDENCE_MEDIUM),
    ("scss", "Code", CONFIDENCE_MEDIUM),
    ("sh", "Code", CONFIDENCE_HIGH),
    ("bash", "Code", CONFIDENCE_HIGH),
    // Books
    ("epub", "Books", CONFIDENCE_HIGH),
    ("mobi", "Books", CONFIDENCE_HIGH),
    ("azw", "Books", CONFIDENCE_HIGH),
    ("azw3", "Books", CONFIDENCE_HIGH),
    ("fb2", "Books", CONFIDENCE_HIGH),
    // Data
    ("csv", "Data", CONFIDENCE_HIGH),
    ("json", "Data", CONFIDENCE_MEDIUM),
    ("xml", "Data", CONFIDENCE_MEDIUM),
    ("yaml", "Data", CONFIDENCE_MEDIUM),
    ("yml", "Data", CONFIDENCE_MEDIUM),
    ("sql", "Data", CONFIDENCE_HIGH),
    ("db", "Data", CONFIDENCE_HIGH),
    ("sqlite", "Data", CONFIDENCE_HIGH),
    ("sqlite3", "Data", CONFIDENCE_HIGH),
];

/// Extension-based catch-all detector.
///
/// Always returns a result: recognized extensions map through the
/// static table, everything else lands in Unsorted at low confidence.
pub struct GenericDetector;

impl GenericDetector {
    pub fn new() -> Self {
        Self
    }

    fn lookup(ext: &str) -> Option<(&'static str, f32)> {
        EXTENSION_MAP
            .iter()
            .find(|(e, _, _)| *e == ext)
            .map(|(_, category, confidence)| (*category, *confidence))
    }
}

impl Default for GenericDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for GenericDetector {
    fn name(&self) -> &'static str {
        "GenericDetector"
    }

    fn priority(&self) -> u32 {
        50
    }

    fn detect(&self, file: &FileInfo, _content: &ContentCache) -> Option<DetectionResult> {
        if let Some((category, confidence)) = Self::lookup(&file.extension) {
            return Some(DetectionResult {
                category: category.to_string(),
                confidence,
                detector_name: self.name().to_string(),
                reason: None,
            });
        }

        let reason = if file.extension.is_empty() {
            "No file extension".to_string()
        } else {
            format!("Unknown extension: .{}", file.extension)
        };

        Some(DetectionResult {
            category: "Unsorted".to_string(),
            confidence: 0.3,
            detector_name: self.name().to_string(),
            reason: Some(reason),
        })
    }
}
