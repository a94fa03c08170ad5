use crate::content::ContentCache;
use crate::models::{DetectionResult, FileInfo, RenameResult};
use crate::rename::invoice::truncate_on_word;
use crate::rename::pdf::read_pdf_info;
use crate::rename::Renamer;
use crate::utils::sanitize_filename;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Maximum title and author lengths in a generated book filename.
const MAX_TITLE_LENGTH: usize = 60;
const MAX_AUTHOR_LENGTH: usize = 30;

/// Book metadata assembled from EPUB OPF, PDF Info or the filename.
#[derive(Debug, Clone, Default)]
struct BookMetadata {
    title: String,
    author: Option<String>,
    year: Option<String>,
}

/// Renamer for book files: `[{year}_]{title}[_{author}].{ext}`.
///
/// EPUBs are read through `META-INF/container.xml` to the OPF package
/// document for Dublin Core title/creator/date; PDFs use the Info
/// dictionary; everything else falls back to cleaning up the filename.
pub struct BookRenamer {
    year_pattern: Regex,
    separators: Regex,
}

impl BookRenamer {
    pub fn new() -> Self {
        Self {
            year_pattern: Regex::new(r"\b(19|20)\d{2}\b").unwrap(),
            separators: Regex::new(r"[_\-]+").unwrap(),
        }
    }

    fn extract_pdf_metadata(&self, file: &FileInfo) -> Option<BookMetadata> {
        let info = read_pdf_info(&file.path);
        let title = info.title.filter(|t| t.chars().count() >= 3)?;
        Some(BookMetadata {
            title,
            author: info.author,
            year: info.created.map(|d| d.format("%Y").to_string()),
        })
    }

    fn extract_epub_metadata(&self, path: &Path) -> Option<BookMetadata> {
        let file = File::open(path).ok()?;
        let mut archive = ZipArchive::new(file).ok()?;

        let opf_path = find_opf_path(&mut archive)?;
        let mut opf_xml = String::new();
        archive
            .by_name(&opf_path)
            .ok()?
            .read_to_string(&mut opf_xml)
            .ok()?;

        let (title, author, date) = parse_opf_metadata(&opf_xml);
        let title = title.filter(|t| t.chars().count() >= 3)?;

        let year = date.and_then(|d| {
            self.year_pattern
                .find(&d)
                .map(|m| m.as_str().to_string())
                .or_else(|| Regex::new(r"\d{4}").unwrap().find(&d).map(|m| m.as_str().to_string()))
        });

        Some(BookMetadata {
            title,
            author,
            year,
        })
    }

    /// Last resort: strip the year out of the stem and normalize
    /// separators into a readable title.
    fn extract_from_filename(&self, file: &FileInfo) -> Option<BookMetadata> {
        let stem = file.stem();

        let year = self
            .year_pattern
            .find(stem)
            .map(|m| m.as_str().to_string());

        let title = self.year_pattern.replace_all(stem, "");
        let title = self.separators.replace_all(&title, " ");
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

        if title.chars().count() < 3 {
            return None;
        }

        Some(BookMetadata {
            title,
            author: None,
            year: Some(year.unwrap_or_else(|| file.modified.format("%Y").to_string())),
        })
    }

    fn build_filename(&self, metadata: &BookMetadata, ext: &str) -> String {
        let mut title = sanitize_filename(&metadata.title, 200);
        if title.chars().count() > MAX_TITLE_LENGTH {
            title = truncate_on_word(&title, MAX_TITLE_LENGTH);
        }

        let mut parts: Vec<String> = Vec::new();
        if let Some(year) = &metadata.year {
            parts.push(year.clone());
        }
        parts.push(title);
        if let Some(author) = &metadata.author {
            let mut author = sanitize_filename(author, 200);
            if author.chars().count() > MAX_AUTHOR_LENGTH {
                author = truncate_on_word(&author, MAX_AUTHOR_LENGTH);
            }
            parts.push(author);
        }

        format!("{}.{}", parts.join("_"), ext)
    }
}

/// Locate the OPF package document inside an EPUB, preferring the
/// rootfile declared in META-INF/container.xml.
fn find_opf_path(archive: &mut ZipArchive<File>) -> Option<String> {
    let mut container_xml = String::new();
    if let Ok(mut entry) = archive.by_name("META-INF/container.xml") {
        if entry.read_to_string(&mut container_xml).is_err() {
            container_xml.clear();
        }
    }

    if !container_xml.is_empty() {
        let mut reader = Reader::from_str(&container_xml);
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"rootfile" {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"full-path" {
                                if let Ok(value) = attr.unescape_value() {
                                    return Some(value.to_string());
                                }
                            }
                        }
                    }
                }
                Ok(Event::Eof) | Err(_) => break,
                _ => {}
            }
        }
    }

    // Fallback: first .opf entry anywhere in the archive
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.into_iter().find(|n| n.ends_with(".opf"))
}

/// Pull dc:title, dc:creator and dc:date out of an OPF document.
fn parse_opf_metadata(xml: &str) -> (Option<String>, Option<String>, Option<String>) {
    let mut title: Option<String> = None;
    let mut author: Option<String> = None;
    let mut date: Option<String> = None;

    let mut reader = Reader::from_str(xml);
    let mut current: Option<&str> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current = match e.local_name().as_ref() {
                    b"title" if title.is_none() => Some("title"),
                    b"creator" if author.is_none() => Some("creator"),
                    b"date" if date.is_none() => Some("date"),
                    _ => None,
                };
            }
            Ok(Event::Text(t)) => {
                if let Some(field) = current {
                    if let Ok(text) = t.unescape() {
                        let text = text.trim().to_string();
                        if !text.is_empty() {
                            match field {
                                "title" => title = Some(text),
                                "creator" => author = Some(text),
                                "date" => date = Some(text),
                                _ => {}
                            }
                        }
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    (title, author, date)
}

impl Default for BookRenamer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renamer for BookRenamer {
    fn name(&self) -> &'static str {
        "BookRenamer"
    }

    fn rename(
        &self,
        file: &FileInfo,
        _detection: &DetectionResult,
        _content: &ContentCache,
    ) -> Option<RenameResult> {
        let metadata = match file.extension.as_str() {
            "pdf" => self.extract_pdf_metadata(file),
            "epub" => self.extract_epub_metadata(&file.path),
            _ => None,
        };

        let metadata = metadata.or_else(|| self.extract_from_filename(file))?;

        let new_name = self.build_filename(&metadata, &file.extension);
        if new_name == file.name {
            return None;
        }

        Some(RenameResult {
            original_name: file.name.clone(),
            new_name,
            renamer_name: self.name().to_string(),
            date_extracted: None,
            title_extracted: Some(metadata.title),
        })
    }
}
