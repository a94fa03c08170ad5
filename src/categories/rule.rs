use glob::Pattern;
use serde::{Deserialize, Serialize};

fn default_min_matches() -> usize {
    1
}

fn is_default_min(n: &usize) -> bool {
    *n == 1
}

/// Match rule attached to a subcategory.
///
/// A rule matches when the file's extension is in `extensions`, or any
/// glob pattern matches the filename, or at least `min_keyword_matches`
/// keywords occur in the filename/content. Extension membership
/// short-circuits the other checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    #[serde(default = "default_min_matches", skip_serializing_if = "is_default_min")]
    pub min_keyword_matches: usize,
}

impl Default for CategoryRule {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            patterns: Vec::new(),
            extensions: Vec::new(),
            min_keyword_matches: 1,
        }
    }
}

impl CategoryRule {
    /// Convenience constructor for a keyword-only rule.
    pub fn with_keywords(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            ..Default::default()
        }
    }

    /// Check whether this rule matches the given file.
    ///
    /// All comparisons are case-insensitive. A rule with nothing
    /// configured never matches.
    pub fn matches(&self, filename: &str, extension: &str, content: Option<&str>) -> bool {
        let ext_lower = extension.to_lowercase();
        if self
            .extensions
            .iter()
            .any(|e| e.to_lowercase() == ext_lower)
        {
            return true;
        }

        let filename_lower = filename.to_lowercase();
        for pattern in &self.patterns {
            if let Ok(compiled) = Pattern::new(&pattern.to_lowercase()) {
                if compiled.matches(&filename_lower) {
                    return true;
                }
            }
        }

        if !self.keywords.is_empty() {
            let mut text = filename_lower;
            if let Some(content) = content {
                text.push(' ');
                text.push_str(&content.to_lowercase());
            }

            let matches = self
                .keywords
                .iter()
                .filter(|kw| text.contains(&kw.to_lowercase()))
                .count();
            if matches >= self.min_keyword_matches {
                return true;
            }
        }

        false
    }
}
