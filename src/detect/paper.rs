use crate::content::ContentCache;
use crate::detect::{Detector, CONFIDENCE_HIGH, CONFIDENCE_MEDIUM};
use crate::models::{DetectionResult, FileInfo};
use regex::{Regex, RegexBuilder};

/// Keywords that show up in academic papers.
const PAPER_KEYWORDS: [&str; 27] = [
    r"\babstract\b",
    r"\breferences\b",
    r"\bcitations?\b",
    r"\bet\s+al\.?\b",
    r"\bconclusions?\b",
    r"\bmethodology\b",
    r"\bintroduction\b",
    r"\brelated\s+work\b",
    r"\bexperiments?\b",
    r"\bresults?\b",
    r"\bdiscussion\b",
    r"\bfigure\s+\d+\b",
    r"\btable\s+\d+\b",
    r"\bequation\s+\d+\b",
    r"\btheorem\s+\d+\b",
    r"\blemma\s+\d+\b",
    r"\bproof\b",
    r"\backnowledg[e]?ments?\b",
    r"\bfunding\b",
    r"\bconflict\s+of\s+interest\b",
    r"\bpeer[\s-]?review\b",
    r"\bjournal\b",
    r"\bproceedings?\b",
    r"\bconference\b",
    r"\buniversity\b",
    r"\bresearch\s+(institute|center|centre|lab)\b",
    r"\bdepartment\s+of\b",
];

/// One or two of these alone already signal an academic paper.
const STRONG_INDICATORS: [&str; 3] = [r"\babstract\b", r"\breferences\b", r"\bet\s+al\.?\b"];

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

/// Detector for research papers and academic documents, based on
/// DOI patterns and academic structure keywords in the PDF text.
pub struct PaperDetector {
    doi: Regex,
    keywords: Vec<Regex>,
    strong: Vec<Regex>,
}

impl PaperDetector {
    pub fn new() -> Self {
        Self {
            doi: Regex::new(r"\b10\.\d{4,}/\S+").unwrap(),
            keywords: compile_all(&PAPER_KEYWORDS),
            strong: compile_all(&STRONG_INDICATORS),
        }
    }
}

impl Default for PaperDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PaperDetector {
    fn name(&self) -> &'static str {
        "PaperDetector"
    }

    fn priority(&self) -> u32 {
        12
    }

    fn detect(&self, file: &FileInfo, content: &ContentCache) -> Option<DetectionResult> {
        if file.extension != "pdf" {
            return None;
        }

        let text = content.pdf_text(&file.path)?;

        if self.doi.is_match(&text) {
            return Some(DetectionResult {
                category: "Papers".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: Some("Contains DOI".to_string()),
            });
        }

        let strong_matches = self.strong.iter().filter(|p| p.is_match(&text)).count();
        let match_count = self.keywords.iter().filter(|p| p.is_match(&text)).count();

        if strong_matches >= 2 && match_count >= 5 {
            return Some(DetectionResult {
                category: "Papers".to_string(),
                confidence: CONFIDENCE_HIGH,
                detector_name: self.name().to_string(),
                reason: Some(format!("Academic paper ({} indicators)", match_count)),
            });
        }

        if match_count >= 5 {
            return Some(DetectionResult {
                category: "Papers".to_string(),
                confidence: CONFIDENCE_MEDIUM,
                detector_name: self.name().to_string(),
                reason: Some(format!("Contains {} academic keywords", match_count)),
            });
        }

        if strong_matches >= 2 && match_count >= 3 {
            return Some(DetectionResult {
                category: "Papers".to_string(),
                confidence: CONFIDENCE_MEDIUM,
                detector_name: self.name().to_string(),
                reason: Some("Contains academic structure".to_string()),
            });
        }

        None
    }
}
