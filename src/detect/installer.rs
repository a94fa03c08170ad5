use crate::content::ContentCache;
use crate::detect::{Detector, CONFIDENCE_HIGH};
use crate::models::{DetectionResult, FileInfo};

/// Installer extensions by platform.
const INSTALLER_EXTENSIONS: [&str; 11] = [
    // macOS
    "dmg", "pkg", "app",
    // Windows
    "exe", "msi", "msix",
    // Linux
    "deb", "rpm", "appimage", "flatpak", "snap",
];

/// Detector for installer and application packages across macOS,
/// Windows and Linux.
pub struct InstallerDetector;

impl InstallerDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InstallerDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for InstallerDetector {
    fn name(&self) -> &'static str {
        "InstallerDetector"
    }

    fn priority(&self) -> u32 {
        15
    }

    fn detect(&self, file: &FileInfo, _content: &ContentCache) -> Option<DetectionResult> {
        if INSTALLER_EXTENSIONS.contains(&file.extension.as_str()) {
            return Some(DetectionResult {
                category: "Installers".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: Some(format!("Installer format (.{})", file.extension)),
            });
        }

        None
    }
}
