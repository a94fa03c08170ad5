use crate::content::ContentCache;
use crate::models::{DetectionResult, FileInfo, RenameResult};
use crate::rename::Renamer;
use crate::utils::{format_date, sanitize_filename};
use regex::{Regex, RegexBuilder};

/// Maximum vendor length in the generated filename.
const MAX_VENDOR_LENGTH: usize = 30;

/// Renamer for invoices: `{date}_Invoice[_{vendor}].pdf`.
///
/// The vendor name is pulled out of the extracted PDF text; when no
/// vendor can be found the plain `{date}_Invoice.pdf` form is used.
pub struct InvoiceRenamer {
    vendor_patterns: Vec<Regex>,
}

impl InvoiceRenamer {
    pub fn new() -> Self {
        let patterns = [
            // "From: Company Name" or "issued by Company"
            r"(?:from|by|issued by)[:\s]+([A-Z][A-Za-z0-9\s&.,'-]+)",
            // Legal suffix: "Company Name Inc." / "Company LLC" / "X GmbH"
            r"([A-Z][A-Za-z0-9\s&]+(?:Inc\.?|LLC|Ltd\.?|Corp\.?|GmbH|S\.A\.))",
            // Email domain fallback: "billing@company.com"
            r"@([a-z0-9-]+)\.[a-z]{2,}",
        ];
        Self {
            vendor_patterns: patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .unwrap()
                })
                .collect(),
        }
    }

    /// Extract a vendor/company name from invoice text.
    pub fn extract_vendor(&self, text: &str) -> Option<String> {
        for pattern in &self.vendor_patterns {
            if let Some(caps) = pattern.captures(text) {
                let vendor = caps.get(1)?.as_str().trim();
                let vendor = vendor.split_whitespace().collect::<Vec<_>>().join(" ");
                let len = vendor.chars().count();
                if (2..=50).contains(&len) {
                    return Some(vendor);
                }
            }
        }
        None
    }
}

impl Default for InvoiceRenamer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renamer for InvoiceRenamer {
    fn name(&self) -> &'static str {
        "InvoiceRenamer"
    }

    fn rename(
        &self,
        file: &FileInfo,
        detection: &DetectionResult,
        content: &ContentCache,
    ) -> Option<RenameResult> {
        if detection.detector_name != "InvoiceDetector" {
            return None;
        }
        if file.extension != "pdf" {
            return None;
        }

        let vendor = content
            .pdf_text(&file.path)
            .and_then(|text| self.extract_vendor(&text));

        let date_str = format_date(&file.modified);
        let new_stem = match &vendor {
            Some(vendor) => {
                let mut sanitized = sanitize_filename(vendor, 200);
                if sanitized.chars().count() > MAX_VENDOR_LENGTH {
                    sanitized = truncate_on_word(&sanitized, MAX_VENDOR_LENGTH);
                }
                format!("{}_Invoice_{}", date_str, sanitized)
            }
            None => format!("{}_Invoice", date_str),
        };

        let new_name = format!("{}.pdf", new_stem);
        if new_name == file.name {
            return None;
        }

        Some(RenameResult {
            original_name: file.name.clone(),
            new_name,
            renamer_name: self.name().to_string(),
            date_extracted: Some(file.modified.date_naive()),
            title_extracted: vendor,
        })
    }
}

/// Cut a string down to `max` chars, dropping the trailing partial word.
pub(crate) fn truncate_on_word(text: &str, max: usize) -> String {
    let cut: String = text.chars().take(max).collect();
    match cut.rfind(' ') {
        Some(pos) => cut[..pos].to_string(),
        None => cut,
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
            category: "Documents".to_string(),
            confidence: 0.9,
            detector_name: "InvoiceDetector".to_string(),
            reason: None,
        }
    }

    #[test]
    fn test_extract_vendor_from_issuer_line() {
        let renamer = InvoiceRenamer::new();
        let vendor = renamer
            .extract_vendor("Invoice issued by Acme Corporation\nTotal: $100")
            .unwrap();
        assert!(vendor.starts_with("Acme"));
    }

    #[test]
    fn test_extract_vendor_legal_suffix() {
        let renamer = InvoiceRenamer::new();
        let vendor = renamer
            .extract_vendor("Globex Industries LLC\nInvoice Number: 42")
            .unwrap();
        assert!(vendor.contains("Globex"));
        assert!(vendor.contains("LLC"));
    }

    #[test]
    fn test_extract_vendor_email_domain_fallback() {
        let renamer = InvoiceRenamer::new();
        let vendor = renamer
            .extract_vendor("questions? contact billing@initech.com")
            .unwrap();
        assert_eq!(vendor, "initech");
    }

    #[test]
    fn test_extract_vendor_rejects_overlong() {
        let renamer = InvoiceRenamer::new();
        let long = format!("From: {}", "A".repeat(80));
        assert!(renamer.extract_vendor(&long).is_none());
    }

    #[test]
    fn test_rename_without_text_uses_plain_invoice() {
        // Not a parsable PDF, so no vendor is available
        let (_dir, file) = dummy_file("scan0001.pdf");
        let cache = ContentCache::new();

        let result = InvoiceRenamer::new()
            .rename(&file, &detection(), &cache)
            .unwrap();
        let date_str = format_date(&file.modified);
        assert_eq!(result.new_name, format!("{}_Invoice.pdf", date_str));
        assert!(result.title_extracted.is_none());
    }

    #[test]
    fn test_non_pdf_declines() {
        let (_dir, file) = dummy_file("invoice.png");
        let cache = ContentCache::new();

        assert!(InvoiceRenamer::new()
            .rename(&file, &detection(), &cache)
            .is_none());
    }

    #[test]
    fn test_ignores_other_detectors() {
        let (_dir, file) = dummy_file("invoice.pdf");
        let cache = ContentCache::new();
        let other = DetectionResult {
            detector_name: "GenericDetector".to_string(),
            ..detection()
        };

        assert!(InvoiceRenamer::new()
            .rename(&file, &other, &cache)
            .is_none());
    }

    #[test]
    fn test_truncate_on_word() {
        assert_eq!(truncate_on_word("Acme Corporation Worldwide", 20), "Acme Corporation");
        assert_eq!(truncate_on_word("Single", 3), "Sin");
    }
}
