pub mod routing;
pub mod rule;
pub mod suggest;

pub use routing::{RemapRule, RemapTarget, RoutingConfig};
pub use rule::CategoryRule;
pub use suggest::{suggest_rules, SuggestionResult};

use anyhow::{bail, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Default categories in order; position determines the number.
pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "Documents",
    "Screenshots",
    "Images",
    "Videos",
    "Audio",
    "Archives",
    "Code",
    "Books",
    "Papers",
    "Data",
    "Installers",
];

/// The sentinel category, always pinned at number 99.
pub const UNSORTED_CATEGORY: &str = "Unsorted";
pub const UNSORTED_NUMBER: u32 = 99;

/// A file category with its ordinal number and optional subcategory
/// attachment (parent plus match rule).
#[derive(Debug, Clone)]
pub struct Category {
    /// Category number (1-98, or 99 for Unsorted)
    pub number: u32,
    pub name: String,
    /// Parent category name for one-level subcategorization
    pub parent: Option<String>,
    pub rule: Option<CategoryRule>,
}

impl Category {
    fn plain(number: u32, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            parent: None,
            rule: None,
        }
    }

    /// On-disk folder name in NN_Name format.
    pub fn folder_name(&self) -> String {
        format!("{:02}_{}", self.number, self.name)
    }
}

// Identity is the name alone; numbers change on every renumbering.
impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Title-case a category name the way `add` normalizes user input
/// ("invoices" -> "Invoices", "PDF" -> "Pdf").
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Owner of the category list and routing config; the only place
/// folder names are computed.
///
/// Categories live in the YAML config file under the `categories` key,
/// routing under `routing.remap`. Unrelated top-level keys survive
/// load/save cycles untouched.
#[derive(Debug, Clone)]
pub struct CategoryManager {
    categories: Vec<Category>,
    pub routing: RoutingConfig,
    config_path: PathBuf,
}

impl CategoryManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            categories: Vec::new(),
            routing: RoutingConfig::default(),
            config_path,
        }
    }

    /// Load categories and routing from the config file.
    ///
    /// A missing or malformed file falls back to the default category
    /// list and empty routing; a bad config never aborts a run.
    pub fn load(&mut self) {
        let mut loaded: Vec<Category> = Vec::new();
        self.routing = RoutingConfig::default();

        if let Ok(text) = fs::read_to_string(&self.config_path) {
            if let Ok(Value::Mapping(doc)) = serde_yaml::from_str::<Value>(&text) {
                if let Some(Value::Sequence(items)) = doc.get("categories") {
                    for item in items {
                        if let Some(cat) = parse_category_item(item) {
                            // The sentinel is implicit, never a regular entry
                            if !cat.name.eq_ignore_ascii_case(UNSORTED_CATEGORY) {
                                loaded.push(cat);
                            }
                        }
                    }
                }
                if let Some(routing_val) = doc.get("routing") {
                    if let Ok(routing) = serde_yaml::from_value::<RoutingConfig>(routing_val.clone())
                    {
                        self.routing = routing;
                    }
                }
            }
        }

        if loaded.is_empty() {
            loaded = DEFAULT_CATEGORIES
                .iter()
                .map(|name| Category::plain(0, name))
                .collect();
        }

        self.renumber(loaded);
    }

    /// Persist categories and routing back to the config file,
    /// preserving every unrelated top-level key.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Re-read the file so sections we don't own survive verbatim
        let mut doc = match fs::read_to_string(&self.config_path) {
            Ok(text) => match serde_yaml::from_str::<Value>(&text) {
                Ok(Value::Mapping(doc)) => doc,
                _ => Mapping::new(),
            },
            Err(_) => Mapping::new(),
        };

        let items: Vec<Value> = self
            .categories
            .iter()
            .filter(|c| c.name != UNSORTED_CATEGORY)
            .map(category_to_item)
            .collect();
        doc.insert(Value::from("categories"), Value::Sequence(items));

        if self.routing.is_empty() {
            doc.remove(Value::from("routing"));
        } else {
            doc.insert(Value::from("routing"), serde_yaml::to_value(&self.routing)?);
        }

        fs::write(&self.config_path, serde_yaml::to_string(&Value::Mapping(doc))?)?;
        Ok(())
    }

    /// Look up a category by name, case-insensitively.
    pub fn get_by_name(&self, name: &str) -> Option<&Category> {
        let name_lower = name.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.name.to_lowercase() == name_lower)
    }

    /// Folder name for a category, erroring on unknown names.
    pub fn get_folder_name(&self, name: &str) -> Result<String> {
        match self.get_by_name(name) {
            Some(cat) => Ok(cat.folder_name()),
            None => bail!("Unknown category: {}", name),
        }
    }

    /// Folder name of the Unsorted sentinel.
    pub fn unsorted_folder(&self) -> String {
        format!("{:02}_{}", UNSORTED_NUMBER, UNSORTED_CATEGORY)
    }

    /// All categories in order, Unsorted last.
    pub fn list_categories(&self) -> &[Category] {
        &self.categories
    }

    /// Direct subcategories of the given parent, in insertion order.
    pub fn subcategories(&self, parent: &str) -> Vec<&Category> {
        let parent_lower = parent.to_lowercase();
        self.categories
            .iter()
            .filter(|c| {
                c.parent
                    .as_ref()
                    .is_some_and(|p| p.to_lowercase() == parent_lower)
            })
            .collect()
    }

    /// Add a category, optionally at a 1-based position and attached to
    /// a parent with a match rule. Renumbers everything.
    pub fn add(
        &mut self,
        name: &str,
        position: Option<usize>,
        parent: Option<&str>,
        rule: Option<CategoryRule>,
    ) -> Result<Category> {
        let name = title_case(name.trim());
        if self.get_by_name(&name).is_some() {
            bail!("Category already exists: {}", name);
        }

        let parent = match parent {
            Some(p) => match self.get_by_name(p) {
                Some(cat) => Some(cat.name.clone()),
                None => bail!("Parent category not found: {}", p),
            },
            None => None,
        };

        let mut regular = self.regular_categories();
        let position = position.unwrap_or(regular.len() + 1);
        if position < 1 || position > regular.len() + 1 {
            bail!("Position must be between 1 and {}", regular.len() + 1);
        }

        let new_cat = Category {
            number: position as u32,
            name,
            parent,
            rule,
        };
        regular.insert(position - 1, new_cat.clone());
        self.renumber(regular);

        Ok(new_cat)
    }

    /// Remove a category by name. The Unsorted sentinel is protected.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if name.eq_ignore_ascii_case(UNSORTED_CATEGORY) {
            bail!("Cannot remove Unsorted category");
        }

        let target = match self.get_by_name(name) {
            Some(cat) => cat.name.clone(),
            None => bail!("Category not found: {}", name),
        };

        let regular = self
            .regular_categories()
            .into_iter()
            .filter(|c| c.name != target)
            .collect();
        self.renumber(regular);
        Ok(())
    }

    /// Reorder categories; the name set must exactly match the existing
    /// non-Unsorted categories (case-insensitive).
    pub fn reorder(&mut self, new_order: &[String]) -> Result<()> {
        let regular = self.regular_categories();

        let order_lower: Vec<String> = new_order.iter().map(|n| n.to_lowercase()).collect();

        let missing: Vec<&str> = regular
            .iter()
            .filter(|c| !order_lower.contains(&c.name.to_lowercase()))
            .map(|c| c.name.as_str())
            .collect();
        let unknown: Vec<&str> = new_order
            .iter()
            .filter(|n| {
                let lower = n.to_lowercase();
                !regular.iter().any(|c| c.name.to_lowercase() == lower)
            })
            .map(|n| n.as_str())
            .collect();

        if !missing.is_empty() || !unknown.is_empty() {
            let mut msg = Vec::new();
            if !missing.is_empty() {
                msg.push(format!("Missing: {}", missing.join(", ")));
            }
            if !unknown.is_empty() {
                msg.push(format!("Unknown: {}", unknown.join(", ")));
            }
            bail!("{}", msg.join("; "));
        }

        let mut reordered = Vec::with_capacity(regular.len());
        for name_lower in &order_lower {
            if let Some(cat) = regular
                .iter()
                .find(|c| c.name.to_lowercase() == *name_lower)
            {
                // Guard against duplicate names in the request
                if !reordered.iter().any(|c: &Category| c.name == cat.name) {
                    reordered.push(cat.clone());
                }
            }
        }
        if reordered.len() != regular.len() {
            bail!("Reorder list must name every category exactly once");
        }

        self.renumber(reordered);
        Ok(())
    }

    /// Apply routing remaps; unmatched categories pass through.
    pub fn resolve_category(&self, category: &str, detector_name: &str) -> String {
        self.routing.apply_remap(detector_name, category)
    }

    /// Resolve a detected category to its destination folder name.
    ///
    /// Routing is applied first, then the category is looked up
    /// case-insensitively. An unknown name after remapping falls back to
    /// the Unsorted folder rather than failing the run.
    pub fn get_folder_for_detection(&self, category: &str, detector_name: &str) -> String {
        let resolved = self.resolve_category(category, detector_name);
        match self.get_by_name(&resolved) {
            Some(cat) => cat.folder_name(),
            None => self.unsorted_folder(),
        }
    }

    /// Evaluate subcategory rules for a file detected as
    /// `parent_category`; the first matching child wins.
    pub fn evaluate_rules(
        &self,
        filename: &str,
        extension: &str,
        parent_category: &str,
        content: Option<&str>,
    ) -> Option<String> {
        let parent_lower = parent_category.to_lowercase();
        for cat in &self.categories {
            let is_child = cat
                .parent
                .as_ref()
                .is_some_and(|p| p.to_lowercase() == parent_lower);
            if !is_child {
                continue;
            }
            if let Some(rule) = &cat.rule {
                if rule.matches(filename, extension, content) {
                    return Some(cat.name.clone());
                }
            }
        }
        None
    }

    /// Rename existing `NN_Name` folders under `dest` to match the
    /// current numbering. Returns the planned renames; when `dry_run`
    /// is false they are executed, routing through a temporary name
    /// whenever the target still exists mid-swap.
    pub fn apply_to_filesystem(&self, dest: &Path, dry_run: bool) -> Result<Vec<(PathBuf, PathBuf)>> {
        if !dest.exists() {
            return Ok(Vec::new());
        }

        let expected: Vec<(String, String)> = self
            .categories
            .iter()
            .map(|c| (c.name.to_lowercase(), c.folder_name()))
            .collect();

        let mut renames: Vec<(PathBuf, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dest)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let folder = entry.file_name().to_string_lossy().to_string();
            let Some((prefix, name)) = folder.split_once('_') else {
                continue;
            };
            if prefix.parse::<u32>().is_err() {
                continue;
            }

            let name_lower = name.to_lowercase();
            if let Some((_, expected_name)) = expected.iter().find(|(n, _)| *n == name_lower) {
                if folder != *expected_name {
                    renames.push((path, dest.join(expected_name)));
                }
            }
        }

        renames.sort_by(|a, b| b.0.cmp(&a.0));

        if !dry_run {
            // First pass: rename directly, or park at a temp name when
            // the target is still occupied by a folder yet to move
            let mut parked: Vec<(PathBuf, PathBuf)> = Vec::new();
            for (old_path, new_path) in &renames {
                if new_path.exists() {
                    let temp = dest.join(format!(
                        "_temp_{}",
                        old_path.file_name().unwrap_or_default().to_string_lossy()
                    ));
                    fs::rename(old_path, &temp)?;
                    parked.push((temp, new_path.clone()));
                } else {
                    fs::rename(old_path, new_path)?;
                }
            }
            // Second pass: move parked folders into their freed slots
            for (temp, new_path) in parked {
                fs::rename(&temp, &new_path)?;
            }
        }

        Ok(renames)
    }

    fn regular_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|c| c.name != UNSORTED_CATEGORY)
            .cloned()
            .collect()
    }

    /// Renumber 1..N in order and re-pin Unsorted at 99.
    fn renumber(&mut self, mut regular: Vec<Category>) {
        for (i, cat) in regular.iter_mut().enumerate() {
            cat.number = (i + 1) as u32;
        }
        regular.push(Category::plain(UNSORTED_NUMBER, UNSORTED_CATEGORY));
        self.categories = regular;
    }
}

fn parse_category_item(item: &Value) -> Option<Category> {
    match item {
        Value::String(name) => Some(Category::plain(0, name)),
        Value::Mapping(map) => {
            let name = map.get("name")?.as_str()?.to_string();
            let parent = map
                .get("parent")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            let rule = map
                .get("rules")
                .and_then(|v| serde_yaml::from_value::<CategoryRule>(v.clone()).ok());
            Some(Category {
                number: 0,
                name,
                parent,
                rule,
            })
        }
        _ => None,
    }
}

fn category_to_item(cat: &Category) -> Value {
    if cat.parent.is_none() && cat.rule.is_none() {
        return Value::from(cat.name.clone());
    }

    let mut map = Mapping::new();
    map.insert(Value::from("name"), Value::from(cat.name.clone()));
    if let Some(parent) = &cat.parent {
        map.insert(Value::from("parent"), Value::from(parent.clone()));
    }
    if let Some(rule) = &cat.rule {
        if let Ok(value) = serde_yaml::to_value(rule) {
            map.insert(Value::from("rules"), value);
        }
    }
    Value::Mapping(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_in(dir: &Path) -> CategoryManager {
        let mut manager = CategoryManager::new(dir.join("config.yaml"));
        manager.load();
        manager
    }

    fn manager_with(dir: &Path, config: &str) -> CategoryManager {
        let path = dir.join("config.yaml");
        fs::write(&path, config).unwrap();
        let mut manager = CategoryManager::new(path);
        manager.load();
        manager
    }

    fn regular_names(manager: &CategoryManager) -> Vec<String> {
        manager
            .list_categories()
            .iter()
            .filter(|c| c.name != UNSORTED_CATEGORY)
            .map(|c| c.name.clone())
            .collect()
    }

    #[test]
    fn test_folder_name_formats() {
        assert_eq!(Category::plain(1, "Documents").folder_name(), "01_Documents");
        assert_eq!(Category::plain(11, "Installers").folder_name(), "11_Installers");
        assert_eq!(Category::plain(99, "Unsorted").folder_name(), "99_Unsorted");
    }

    #[test]
    fn test_category_equality_by_name_only() {
        let a = Category::plain(1, "Documents");
        let b = Category::plain(5, "Documents");
        assert_eq!(a, b);
        assert_ne!(a, Category::plain(1, "Images"));
    }

    #[test]
    fn test_load_defaults_when_no_config() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(dir.path());

        assert_eq!(regular_names(&manager), DEFAULT_CATEGORIES);
        let last = manager.list_categories().last().unwrap();
        assert_eq!(last.name, UNSORTED_CATEGORY);
        assert_eq!(last.number, UNSORTED_NUMBER);
    }

    #[test]
    fn test_load_numbers_are_contiguous() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(dir.path());

        for (i, cat) in manager
            .list_categories()
            .iter()
            .filter(|c| c.name != UNSORTED_CATEGORY)
            .enumerate()
        {
            assert_eq!(cat.number, (i + 1) as u32);
        }
    }

    #[test]
    fn test_load_from_config_strings() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with(dir.path(), "categories:\n  - Foo\n  - Bar\n  - Baz\n");
        assert_eq!(regular_names(&manager), ["Foo", "Bar", "Baz"]);
    }

    #[test]
    fn test_load_from_config_mappings() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with(dir.path(), "categories:\n  - name: Foo\n  - name: Bar\n");
        assert_eq!(regular_names(&manager), ["Foo", "Bar"]);
    }

    #[test]
    fn test_load_pins_unsorted_even_when_listed() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with(dir.path(), "categories:\n  - Foo\n  - Unsorted\n  - Bar\n");

        let unsorted: Vec<_> = manager
            .list_categories()
            .iter()
            .filter(|c| c.name == UNSORTED_CATEGORY)
            .collect();
        assert_eq!(unsorted.len(), 1);
        assert_eq!(unsorted[0].number, UNSORTED_NUMBER);
    }

    #[test]
    fn test_load_malformed_yaml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with(dir.path(), ": not : valid : yaml : [\n");
        assert_eq!(regular_names(&manager), DEFAULT_CATEGORIES);
    }

    #[test]
    fn test_save_creates_directory_and_excludes_unsorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subdir").join("config.yaml");
        let mut manager = CategoryManager::new(path.clone());
        manager.load();
        manager.save().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Documents"));
        assert!(!content.contains("Unsorted"));
    }

    #[test]
    fn test_save_preserves_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with(dir.path(), "other_setting: value\ncategories:\n  - Old\n");
        manager.save().unwrap();

        let content = fs::read_to_string(dir.path().join("config.yaml")).unwrap();
        assert!(content.contains("other_setting: value"));
        assert!(content.contains("Old"));
    }

    #[test]
    fn test_round_trip_preserves_parents_and_rules() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        let rule = CategoryRule {
            keywords: vec!["programming".to_string(), "software".to_string()],
            patterns: vec!["tech_*".to_string()],
            ..Default::default()
        };
        manager
            .add("Technical", None, Some("Books"), Some(rule))
            .unwrap();
        manager.save().unwrap();

        let reloaded = manager_in(dir.path());
        assert_eq!(regular_names(&reloaded), regular_names(&manager));

        let tech = reloaded.get_by_name("Technical").unwrap();
        assert_eq!(tech.parent.as_deref(), Some("Books"));
        let rule = tech.rule.as_ref().unwrap();
        assert_eq!(rule.keywords, ["programming", "software"]);
        assert_eq!(rule.patterns, ["tech_*"]);
    }

    #[test]
    fn test_get_by_name_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(dir.path());

        assert_eq!(manager.get_by_name("DOCUMENTS").unwrap().name, "Documents");
        assert!(manager.get_by_name("NonExistent").is_none());
    }

    #[test]
    fn test_get_folder_name() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(dir.path());

        assert_eq!(manager.get_folder_name("Documents").unwrap(), "01_Documents");
        assert!(manager.get_folder_name("NonExistent").is_err());
    }

    #[test]
    fn test_add_at_end_and_position() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_with(dir.path(), "categories:\n  - Foo\n  - Bar\n");

        manager.add("Baz", None, None, None).unwrap();
        assert_eq!(regular_names(&manager), ["Foo", "Bar", "Baz"]);

        manager.add("Qux", Some(2), None, None).unwrap();
        assert_eq!(regular_names(&manager), ["Foo", "Qux", "Bar", "Baz"]);

        let numbers: Vec<u32> = manager
            .list_categories()
            .iter()
            .filter(|c| c.name != UNSORTED_CATEGORY)
            .map(|c| c.number)
            .collect();
        assert_eq!(numbers, [1, 2, 3, 4]);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        let err = manager.add("documents", None, None, None).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_add_invalid_position_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_with(dir.path(), "categories:\n  - Foo\n");

        let err = manager.add("Bar", Some(10), None, None).unwrap_err();
        assert!(err.to_string().contains("Position must be"));
    }

    #[test]
    fn test_add_normalizes_to_title_case() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_with(dir.path(), "categories:\n  - Foo\n");

        assert_eq!(manager.add("invoices", None, None, None).unwrap().name, "Invoices");
        assert_eq!(manager.add("PDF", None, None, None).unwrap().name, "Pdf");
        assert_eq!(
            manager.add("myCategory", None, None, None).unwrap().name,
            "Mycategory"
        );
    }

    #[test]
    fn test_add_unknown_parent_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        let err = manager
            .add("SubCategory", None, Some("NonExistent"), None)
            .unwrap_err();
        assert!(err.to_string().contains("Parent category not found"));
    }

    #[test]
    fn test_remove_renumbers() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_with(dir.path(), "categories:\n  - Foo\n  - Bar\n  - Baz\n");

        manager.remove("Foo").unwrap();
        assert_eq!(regular_names(&manager), ["Bar", "Baz"]);

        let numbers: Vec<u32> = manager
            .list_categories()
            .iter()
            .filter(|c| c.name != UNSORTED_CATEGORY)
            .map(|c| c.number)
            .collect();
        assert_eq!(numbers, [1, 2]);
    }

    #[test]
    fn test_remove_unsorted_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        let err = manager.remove("Unsorted").unwrap_err();
        assert!(err.to_string().contains("Cannot remove Unsorted"));
    }

    #[test]
    fn test_remove_unknown_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        let err = manager.remove("NonExistent").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_remove_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_with(dir.path(), "categories:\n  - Invoices\n  - Documents\n");

        manager.remove("INVOICES").unwrap();
        assert_eq!(regular_names(&manager), ["Documents"]);
    }

    #[test]
    fn test_remove_preserves_other_rules() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        manager
            .add(
                "Technical",
                None,
                Some("Books"),
                Some(CategoryRule::with_keywords(vec!["code".to_string()])),
            )
            .unwrap();
        manager
            .add(
                "Fiction",
                None,
                Some("Books"),
                Some(CategoryRule::with_keywords(vec!["novel".to_string()])),
            )
            .unwrap();

        manager.remove("Technical").unwrap();

        let fiction = manager.get_by_name("Fiction").unwrap();
        assert_eq!(fiction.rule.as_ref().unwrap().keywords, ["novel"]);
    }

    #[test]
    fn test_reorder_renumbers_and_preserves_rules() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_with(dir.path(), "categories:\n  - Foo\n");
        manager
            .add(
                "Bar",
                None,
                None,
                Some(CategoryRule::with_keywords(vec!["test".to_string()])),
            )
            .unwrap();

        manager
            .reorder(&["BAR".to_string(), "FOO".to_string()])
            .unwrap();

        assert_eq!(regular_names(&manager), ["Bar", "Foo"]);
        let bar = manager.get_by_name("Bar").unwrap();
        assert_eq!(bar.number, 1);
        assert_eq!(bar.rule.as_ref().unwrap().keywords, ["test"]);
    }

    #[test]
    fn test_reorder_mismatched_sets_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_with(dir.path(), "categories:\n  - Foo\n  - Bar\n");

        let err = manager.reorder(&["Foo".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Missing"));
        assert!(err.to_string().contains("Bar"));

        let err = manager
            .reorder(&["Foo".to_string(), "Baz".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("Unknown"));
        assert!(err.to_string().contains("Baz"));
    }

    #[test]
    fn test_exactly_one_unsorted_after_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_with(dir.path(), "categories:\n  - Foo\n  - Bar\n");

        manager.add("Baz", Some(1), None, None).unwrap();
        manager.remove("Foo").unwrap();
        manager
            .reorder(&["Bar".to_string(), "Baz".to_string()])
            .unwrap();

        let unsorted: Vec<_> = manager
            .list_categories()
            .iter()
            .filter(|c| c.name == UNSORTED_CATEGORY)
            .collect();
        assert_eq!(unsorted.len(), 1);
        assert_eq!(unsorted[0].number, UNSORTED_NUMBER);

        let numbers: Vec<u32> = manager
            .list_categories()
            .iter()
            .filter(|c| c.name != UNSORTED_CATEGORY)
            .map(|c| c.number)
            .collect();
        assert_eq!(numbers, [1, 2]);
    }

    #[test]
    fn test_subcategories_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        manager.add("Technical", None, Some("Books"), None).unwrap();
        manager.add("Fiction", None, Some("Books"), None).unwrap();
        manager.add("Invoices", None, Some("Documents"), None).unwrap();

        assert_eq!(manager.subcategories("books").len(), 2);
        assert_eq!(manager.subcategories("BOOKS").len(), 2);
        assert_eq!(manager.subcategories("Documents").len(), 1);
    }

    #[test]
    fn test_evaluate_rules_matching() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        manager
            .add(
                "Technical",
                None,
                Some("Books"),
                Some(CategoryRule::with_keywords(vec![
                    "programming".to_string(),
                    "software".to_string(),
                ])),
            )
            .unwrap();

        assert_eq!(
            manager.evaluate_rules("clean_code_programming.epub", "epub", "Books", None),
            Some("Technical".to_string())
        );
        assert_eq!(
            manager.evaluate_rules("fiction_novel.epub", "epub", "Books", None),
            None
        );
        // Content counts towards keyword matching
        assert_eq!(
            manager.evaluate_rules(
                "book.epub",
                "epub",
                "Books",
                Some("a book about software development"),
            ),
            Some("Technical".to_string())
        );
    }

    #[test]
    fn test_evaluate_rules_first_match_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        manager
            .add(
                "Technical",
                None,
                Some("Books"),
                Some(CategoryRule::with_keywords(vec!["code".to_string()])),
            )
            .unwrap();
        manager
            .add(
                "Programming",
                None,
                Some("Books"),
                Some(CategoryRule::with_keywords(vec!["code".to_string()])),
            )
            .unwrap();

        assert_eq!(
            manager.evaluate_rules("learn_code.epub", "epub", "Books", None),
            Some("Technical".to_string())
        );
    }

    #[test]
    fn test_evaluate_rules_wrong_parent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());

        manager
            .add(
                "Invoices",
                None,
                Some("Documents"),
                Some(CategoryRule::with_keywords(vec!["invoice".to_string()])),
            )
            .unwrap();

        assert_eq!(
            manager.evaluate_rules("invoice_tracker.epub", "epub", "Books", None),
            None
        );
    }

    #[test]
    fn test_routing_precedence_through_manager() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());
        manager.add("Invoices", None, None, None).unwrap();
        manager.add("Pdf", None, None, None).unwrap();

        manager.routing.set_remap("Documents", "Pdf", None);
        manager
            .routing
            .set_remap("Documents", "Invoices", Some("InvoiceDetector"));

        assert_eq!(
            manager.get_folder_for_detection("Documents", "InvoiceDetector"),
            "12_Invoices"
        );
        assert_eq!(
            manager.get_folder_for_detection("Documents", "GenericDetector"),
            "13_Pdf"
        );
    }

    #[test]
    fn test_folder_for_unknown_category_falls_back_to_unsorted() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());
        manager.routing.set_remap("Documents", "NonExistent", None);

        assert_eq!(
            manager.get_folder_for_detection("Documents", "TestDetector"),
            "99_Unsorted"
        );
        assert_eq!(
            manager.get_folder_for_detection("NoSuchCategory", "TestDetector"),
            "99_Unsorted"
        );
    }

    #[test]
    fn test_routing_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(dir.path());
        manager
            .routing
            .set_remap("Documents", "Invoices", Some("InvoiceDetector"));
        manager.save().unwrap();

        let reloaded = manager_in(dir.path());
        assert_eq!(
            reloaded.resolve_category("Documents", "InvoiceDetector"),
            "Invoices"
        );

        let content = fs::read_to_string(dir.path().join("config.yaml")).unwrap();
        assert!(content.contains("routing:"));
        assert!(content.contains("InvoiceDetector"));
    }

    #[test]
    fn test_save_drops_empty_routing_section() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_with(
            dir.path(),
            "categories:\n  - Documents\nrouting:\n  remap:\n    Documents: PDF\n",
        );
        manager.routing.remove_remap("Documents", None);
        manager.save().unwrap();

        let content = fs::read_to_string(dir.path().join("config.yaml")).unwrap();
        assert!(!content.contains("routing:"));
    }

    #[test]
    fn test_apply_to_filesystem_renames_swapped_folders() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("01_Foo")).unwrap();
        fs::create_dir(dir.path().join("02_Bar")).unwrap();

        let manager = manager_with(dir.path(), "categories:\n  - Bar\n  - Foo\n");
        let renames = manager.apply_to_filesystem(dir.path(), false).unwrap();

        assert_eq!(renames.len(), 2);
        assert!(dir.path().join("01_Bar").is_dir());
        assert!(dir.path().join("02_Foo").is_dir());
    }

    #[test]
    fn test_apply_to_filesystem_dry_run_plans_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("01_Foo")).unwrap();
        fs::create_dir(dir.path().join("02_Bar")).unwrap();

        let manager = manager_with(dir.path(), "categories:\n  - Bar\n  - Foo\n");
        let renames = manager.apply_to_filesystem(dir.path(), true).unwrap();

        assert_eq!(renames.len(), 2);
        assert!(dir.path().join("01_Foo").is_dir());
        assert!(dir.path().join("02_Bar").is_dir());
    }

    #[test]
    fn test_apply_to_filesystem_ignores_unrelated_folders() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("random_folder")).unwrap();
        fs::create_dir(dir.path().join("01_Documents")).unwrap();

        let manager = manager_in(dir.path());
        manager.apply_to_filesystem(dir.path(), false).unwrap();

        assert!(dir.path().join("random_folder").is_dir());
        assert!(dir.path().join("01_Documents").is_dir());
    }

    #[test]
    fn test_apply_to_filesystem_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("01_Foo")).unwrap();
        fs::create_dir(dir.path().join("02_Bar")).unwrap();

        let manager = manager_with(dir.path(), "categories:\n  - Bar\n  - Foo\n");
        manager.apply_to_filesystem(dir.path(), false).unwrap();

        let second = manager.apply_to_filesystem(dir.path(), false).unwrap();
        assert!(second.is_empty());
    }
}
