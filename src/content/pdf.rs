use lopdf::Document;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// Default number of pages to read for content detection.
pub const DEFAULT_MAX_PAGES: usize = 2;
/// Default cap on extracted characters.
pub const DEFAULT_MAX_CHARS: usize = 5000;
/// Default cache capacity.
const CACHE_CAPACITY: usize = 128;

/// Extract text from the first pages of a PDF.
///
/// Reads up to `max_pages` pages, stopping early once `max_chars`
/// characters have been collected, and truncates the result to
/// `max_chars`. Returns None for unreadable, encrypted or empty
/// documents; extraction failures never propagate.
pub fn extract_pdf_text(path: &Path, max_pages: usize, max_chars: usize) -> Option<String> {
    let text = match Document::load(path) {
        Ok(doc) => {
            if doc.is_encrypted() {
                return None;
            }

            let mut collected = String::new();
            for page_num in doc.get_pages().keys().take(max_pages) {
                if let Ok(page_text) = doc.extract_text(&[*page_num]) {
                    collected.push_str(&page_text);
                    collected.push('\n');
                }
                if collected.len() >= max_chars {
                    break;
                }
            }
            collected
        }
        Err(_) => String::new(),
    };

    let text = if text.trim().is_empty() {
        // lopdf could not read it, try pdf-extract before giving up
        match pdf_extract::extract_text(path) {
            Ok(text) => text,
            Err(_) => return None,
        }
    } else {
        text
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() > max_chars {
        // Truncate on a char boundary
        let mut end = max_chars;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        Some(trimmed[..end].to_string())
    } else {
        Some(trimmed.to_string())
    }
}

struct CacheInner {
    entries: HashMap<String, Option<String>>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

/// Bounded memo cache over PDF text extraction.
///
/// Keyed by the path string so the same PDF is parsed once per run even
/// when several detectors and renamers inspect it. Single-threaded by
/// design; owned by the engine and shared by reference.
pub struct ContentCache {
    capacity: usize,
    inner: RefCell<CacheInner>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RefCell::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Extracted text for the given PDF, memoized per path.
    pub fn pdf_text(&self, path: &Path) -> Option<String> {
        let key = path.to_string_lossy().to_string();

        {
            let mut inner = self.inner.borrow_mut();
            if let Some(cached) = inner.entries.get(&key) {
                let cached = cached.clone();
                inner.hits += 1;
                return cached;
            }
        }

        let text = extract_pdf_text(path, DEFAULT_MAX_PAGES, DEFAULT_MAX_CHARS);

        let mut inner = self.inner.borrow_mut();
        inner.misses += 1;
        if inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
        inner.entries.insert(key.clone(), text.clone());
        inner.order.push_back(key);

        text
    }

    pub fn hits(&self) -> u64 {
        self.inner.borrow().hits
    }

    pub fn misses(&self) -> u64 {
        self.inner.borrow().misses
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Drop every cached entry and reset the counters.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.clear();
        inner.order.clear();
        inner.hits = 0;
        inner.misses = 0;
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}
