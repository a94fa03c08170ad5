pub mod arxiv;
pub mod book;
pub mod generic;
pub mod image;
pub mod invoice;
pub mod pdf;
pub mod screenshot;

pub use arxiv::ArxivRenamer;
pub use book::BookRenamer;
pub use generic::GenericRenamer;
pub use image::ImageRenamer;
pub use invoice::InvoiceRenamer;
pub use pdf::PdfRenamer;
pub use screenshot::ScreenshotRenamer;

use crate::content::ContentCache;
use crate::models::{DetectionResult, FileInfo, RenameResult};
use std::collections::HashMap;

/// A stateless rule that inspects a file and its detection result and
/// optionally proposes a better filename.
pub trait Renamer {
    /// Human-readable renamer name, recorded in the RenameResult.
    fn name(&self) -> &'static str;

    /// Propose a new filename. None means "keep the current name".
    fn rename(
        &self,
        file: &FileInfo,
        detection: &DetectionResult,
        content: &ContentCache,
    ) -> Option<RenameResult>;
}

/// Registry mapping detector names to specialized renamers, with a
/// generic fallback.
///
/// Resolution tries the renamer keyed by the detection's detector name
/// first; when none is registered, or the specialized renamer declines,
/// the default renamer gets its turn.
pub struct RenamerRegistry {
    renamers: HashMap<String, Box<dyn Renamer>>,
    default_renamer: Box<dyn Renamer>,
}

impl RenamerRegistry {
    pub fn new(default_renamer: Box<dyn Renamer>) -> Self {
        Self {
            renamers: HashMap::new(),
            default_renamer,
        }
    }

    /// Create a registry with the full built-in renamer wiring.
    pub fn with_default_renamers() -> Self {
        let mut registry = Self::new(Box::new(GenericRenamer::new()));
        registry.register("ScreenshotDetector", Box::new(ScreenshotRenamer::new()));
        registry.register("ArxivDetector", Box::new(ArxivRenamer::new()));
        registry.register("InvoiceDetector", Box::new(InvoiceRenamer::new()));
        registry.register("BookDetector", Box::new(BookRenamer::new()));
        registry.register("ArchiveBookDetector", Box::new(BookRenamer::new()));
        // PDFs picked up by the extension table get metadata-based names
        registry.register("GenericDetector", Box::new(PdfRenamer::new()));
        registry
    }

    /// Register a renamer for the given detector name.
    pub fn register(&mut self, detector_name: &str, renamer: Box<dyn Renamer>) {
        self.renamers.insert(detector_name.to_string(), renamer);
    }

    /// Resolve and run the appropriate renamer for a detection.
    pub fn rename(
        &self,
        file: &FileInfo,
        detection: &DetectionResult,
        content: &ContentCache,
    ) -> Option<RenameResult> {
        if let Some(renamer) = self.renamers.get(&detection.detector_name) {
            if let Some(result) = renamer.rename(file, detection, content) {
                return Some(result);
            }
        }

        self.default_renamer.rename(file, detection, content)
    }
}

impl Default for RenamerRegistry {
    fn default() -> Self {
        Self::with_default_renamers()
    }
}
