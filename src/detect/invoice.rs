use crate::content::ContentCache;
use crate::detect::{Detector, CONFIDENCE_HIGH, CONFIDENCE_MEDIUM};
use crate::models::{DetectionResult, FileInfo};
use regex::{Regex, RegexBuilder};

/// Invoice keywords across the languages invoices commonly arrive in.
const INVOICE_KEYWORDS: [&str; 20] = [
    // English
    r"\binvoice\b",
    r"\breceipt\b",
    r"\bbill\s+to\b",
    r"\bpayment\s+due\b",
    r"\bsubtotal\b",
    r"\btotal\s+due\b",
    r"\bamount\s+due\b",
    r"\border\s+confirmation\b",
    // Spanish
    r"\bfactura\b",
    r"\brecibo\b",
    r"\bcomprobante\b",
    // German
    r"\brechnung\b",
    r"\bquittung\b",
    r"\bbeleg\b",
    // French
    r"\bfacture\b",
    r"\bre[cç]u\b",
    // Portuguese
    r"\bnota\s+fiscal\b",
    r"\brecebimento\b",
    // Italian
    r"\bfattura\b",
    r"\bricevuta\b",
];

/// Field patterns that almost certainly mean invoice.
const STRONG_INDICATORS: [&str; 6] = [
    r"\binvoice\s*(number|no\.?|#)\s*:?\s*\w+",
    r"\binvoice\s+date\b",
    r"\bbill\s+to\s*:",
    r"\bpayment\s+terms\b",
    r"\btax\s+id\b",
    r"\bvat\s*(number|no\.?|#)?\s*:?",
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

/// Detector for invoices and receipts, analyzing PDF content for
/// invoice-specific fields and multilingual keywords.
pub struct InvoiceDetector {
    keywords: Vec<Regex>,
    strong: Vec<Regex>,
}

impl InvoiceDetector {
    pub fn new() -> Self {
        Self {
            keywords: compile_all(&INVOICE_KEYWORDS),
            strong: compile_all(&STRONG_INDICATORS),
        }
    }
}

impl Default for InvoiceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for InvoiceDetector {
    fn name(&self) -> &'static str {
        "InvoiceDetector"
    }

    fn priority(&self) -> u32 {
        15
    }

    fn detect(&self, file: &FileInfo, content: &ContentCache) -> Option<DetectionResult> {
        if file.extension != "pdf" {
            return None;
        }

        let text = content.pdf_text(&file.path)?;

        if self.strong.iter().any(|p| p.is_match(&text)) {
            return Some(DetectionResult {
                category: "Documents".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: Some("Contains invoice-specific fields".to_string()),
            });
        }

        let match_count = self.keywords.iter().filter(|p| p.is_match(&text)).count();

        if match_count >= 3 {
            return Some(DetectionResult {
                category: "Documents".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: Some(format!("Contains {} invoice keywords", match_count)),
            });
        }
        if match_count >= 1 {
            return Some(DetectionResult {
                category: "Documents".to_string(),
                confidence: CONFIDENCE_MEDIUM,
                detector_name: self.name().to_string(),
                reason: Some("Contains invoice-related keywords".to_string()),
            });
        }

        None
    }
}
