use crate::content::ContentCache;
use crate::models::{DetectionResult, FileInfo, RenameResult};
use crate::rename::invoice::truncate_on_word;
use crate::rename::Renamer;
use crate::utils::{format_date, is_ugly_filename, sanitize_filename};
use chrono::NaiveDate;
use lopdf::{Document, Object};
use regex::Regex;
use std::path::Path;

/// Maximum title length in a generated PDF filename.
const MAX_TITLE_LENGTH: usize = 80;

/// Metadata pulled from a PDF's Info dictionary.
#[derive(Debug, Default, Clone)]
pub(crate) struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub created: Option<NaiveDate>,
}

/// Read the Info dictionary of a PDF. Any parse failure yields an
/// empty result, never an error.
pub(crate) fn read_pdf_info(path: &Path) -> PdfInfo {
    let doc = match Document::load(path) {
        Ok(doc) => doc,
        Err(_) => return PdfInfo::default(),
    };

    let info = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => match doc.get_object(*id).and_then(|obj| obj.as_dict()) {
            Ok(dict) => dict,
            Err(_) => return PdfInfo::default(),
        },
        Ok(Object::Dictionary(dict)) => dict,
        _ => return PdfInfo::default(),
    };

    let get_string = |key: &[u8]| -> Option<String> {
        match info.get(key) {
            Ok(Object::String(bytes, _)) => {
                let text = decode_pdf_string(bytes);
                let text = text.trim().to_string();
                (!text.is_empty()).then_some(text)
            }
            _ => None,
        }
    };

    let created = get_string(b"CreationDate").and_then(|raw| parse_pdf_date(&raw));

    PdfInfo {
        title: get_string(b"Title"),
        author: get_string(b"Author"),
        created,
    }
}

/// Decode a PDF string, handling the UTF-16BE byte-order-mark variant.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

/// Parse the PDF date format "D:YYYYMMDDHHmmSS...".
pub(crate) fn parse_pdf_date(raw: &str) -> Option<NaiveDate> {
    let caps = Regex::new(r"D:(\d{4})(\d{2})(\d{2})")
        .unwrap()
        .captures(raw)?;
    NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )
}

/// Renamer for PDF documents: `{date}_{title}.pdf`.
///
/// The title comes from the Info dictionary when present, else from the
/// first title-shaped line of the extracted first-page text, else the
/// sanitized original stem. Only ugly filenames are touched.
pub struct PdfRenamer {
    skip_line: Regex,
}

impl PdfRenamer {
    pub fn new() -> Self {
        Self {
            // Page numbers, copyright lines and bare numbers are not titles
            skip_line: Regex::new(r"(?i)^(page|copyright|©|\d+$)").unwrap(),
        }
    }

    /// Scan the first lines of extracted text for a title-shaped line.
    fn title_from_text(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(5)
            .find(|line| {
                let len = line.chars().count();
                (5..=100).contains(&len) && !self.skip_line.is_match(line)
            })
            .map(str::to_string)
    }
}

impl Default for PdfRenamer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renamer for PdfRenamer {
    fn name(&self) -> &'static str {
        "PdfRenamer"
    }

    fn rename(
        &self,
        file: &FileInfo,
        _detection: &DetectionResult,
        content: &ContentCache,
    ) -> Option<RenameResult> {
        if file.extension != "pdf" {
            return None;
        }
        if !is_ugly_filename(file.stem()) {
            return None;
        }

        let info = read_pdf_info(&file.path);

        // Metadata titles equal to the filename stem carry no information
        let title = info
            .title
            .filter(|t| t.chars().count() >= 3 && t.to_lowercase() != file.stem().to_lowercase())
            .or_else(|| {
                content
                    .pdf_text(&file.path)
                    .and_then(|text| self.title_from_text(&text))
            });

        let (date_str, date_extracted) = match info.created {
            Some(date) => (date.format("%Y-%m-%d").to_string(), date),
            None => (format_date(&file.modified), file.modified.date_naive()),
        };

        let (new_stem, title_extracted) = match &title {
            Some(title) => {
                let mut sanitized = sanitize_filename(title, 200);
                if sanitized.chars().count() > MAX_TITLE_LENGTH {
                    sanitized = truncate_on_word(&sanitized, MAX_TITLE_LENGTH);
                }
                (format!("{}_{}", date_str, sanitized), title.clone())
            }
            None => {
                let sanitized = sanitize_filename(file.stem(), 200);
                let stem = if sanitized.chars().count() < 3 {
                    format!("{}_document", date_str)
                } else {
                    format!("{}_{}", date_str, sanitized)
                };
                return finish(file, stem, date_extracted, None, self.name());
            }
        };

        finish(file, new_stem, date_extracted, Some(title_extracted), self.name())
    }
}

fn finish(
    file: &FileInfo,
    new_stem: String,
    date_extracted: NaiveDate,
    title_extracted: Option<String>,
    renamer_name: &str,
) -> Option<RenameResult> {
    let new_name = format!("{}.pdf", new_stem);
    if new_name == file.name {
        return None;
    }
    Some(RenameResult {
        original_name: file.name.clone(),
        new_name,
        renamer_name: renamer_name.to_string(),
        date_extracted: Some(date_extracted),
        title_extracted,
    })
}
