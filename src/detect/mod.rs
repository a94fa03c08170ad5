pub mod archive_book;
pub mod arxiv;
pub mod book;
pub mod generic;
pub mod installer;
pub mod invoice;
pub mod paper;
pub mod screenshot;

pub use archive_book::ArchiveBookDetector;
pub use arxiv::ArxivDetector;
pub use book::BookDetector;
pub use generic::GenericDetector;
pub use installer::InstallerDetector;
pub use invoice::InvoiceDetector;
pub use paper::PaperDetector;
pub use screenshot::ScreenshotDetector;

use crate::content::ContentCache;
use crate::models::{DetectionResult, FileInfo};
use std::cmp::Ordering;

/// Confidence level constants. HIGH > MEDIUM > LOW is an invariant the
/// registry tie-breaking relies on.
pub const CONFIDENCE_HIGH: f32 = 0.9;
pub const CONFIDENCE_MEDIUM: f32 = 0.7;
pub const CONFIDENCE_LOW: f32 = 0.5;

/// A stateless rule that inspects a file and optionally proposes a
/// category with a confidence score.
pub trait Detector {
    /// Human-readable detector name, used for renamer lookup and routing.
    fn name(&self) -> &'static str;

    /// Tie-breaking priority. Lower numbers are more specific detectors.
    fn priority(&self) -> u32;

    /// Attempt to classify the file. None means "doesn't apply".
    fn detect(&self, file: &FileInfo, content: &ContentCache) -> Option<DetectionResult>;
}

/// Registry holding the ordered detector collection.
///
/// Every registered detector runs against each file; the best result is
/// chosen by confidence, with the lower priority number winning ties so
/// specific detectors beat generic ones.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Create a registry with the full built-in detector set.
    pub fn with_default_detectors() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ScreenshotDetector::new()));
        registry.register(Box::new(ArxivDetector::new()));
        registry.register(Box::new(PaperDetector::new()));
        registry.register(Box::new(InvoiceDetector::new()));
        registry.register(Box::new(InstallerDetector::new()));
        registry.register(Box::new(ArchiveBookDetector::new()));
        registry.register(Box::new(BookDetector::new()));
        registry.register(Box::new(GenericDetector::new()));
        registry
    }

    /// Register a detector, keeping the collection sorted by priority.
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
        self.detectors.sort_by_key(|d| d.priority());
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run every detector and return the best result.
    ///
    /// No short-circuiting: all detectors run so the highest-confidence
    /// result can be picked. Among equal confidences the detector with
    /// the lower priority number wins.
    pub fn detect(&self, file: &FileInfo, content: &ContentCache) -> DetectionResult {
        let mut candidates: Vec<(u32, DetectionResult)> = Vec::new();

        for detector in &self.detectors {
            if let Some(result) = detector.detect(file, content) {
                candidates.push((detector.priority(), result));
            }
        }

        if candidates.is_empty() {
            return DetectionResult {
                category: "Unsorted".to_string(),
                confidence: 0.0,
                detector_name: "None".to_string(),
                reason: Some("No detector matched this file".to_string()),
            };
        }

        candidates.sort_by(|a, b| {
            b.1.confidence
                .partial_cmp(&a.1.confidence)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        candidates.remove(0).1
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::with_default_detectors()
    }
}
