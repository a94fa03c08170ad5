use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Target of a remap entry.
///
/// A plain string is a global remap (category to category); a nested
/// mapping is scoped to the detector the entry is keyed by.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RemapTarget {
    Category(String),
    ByDetector(BTreeMap<String, String>),
}

/// Flattened view of one remap rule, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapRule {
    /// Detector the rule applies to, "*" for global rules
    pub detector: String,
    pub from: String,
    pub to: String,
}

/// Detector-aware category remapping.
///
/// Keys are either category names (global remap) or detector names
/// (nested category-to-category mapping). Detector-specific entries
/// take precedence over global ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutingConfig {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub remap: BTreeMap<String, RemapTarget>,
}

impl RoutingConfig {
    /// Resolve the effective category for a detection.
    ///
    /// Checks the detector-specific mapping first, then the global one;
    /// an unmatched category passes through unchanged.
    pub fn apply_remap(&self, detector_name: &str, category: &str) -> String {
        if let Some(RemapTarget::ByDetector(map)) = self.remap.get(detector_name) {
            if let Some(target) = map.get(category) {
                return target.clone();
            }
        }

        if let Some(RemapTarget::Category(target)) = self.remap.get(category) {
            return target.clone();
        }

        category.to_string()
    }

    /// Add or replace a remap rule.
    pub fn set_remap(&mut self, from: &str, to: &str, detector_name: Option<&str>) {
        match detector_name {
            Some(detector) => {
                let entry = self
                    .remap
                    .entry(detector.to_string())
                    .or_insert_with(|| RemapTarget::ByDetector(BTreeMap::new()));
                if !matches!(entry, RemapTarget::ByDetector(_)) {
                    *entry = RemapTarget::ByDetector(BTreeMap::new());
                }
                if let RemapTarget::ByDetector(map) = entry {
                    map.insert(from.to_string(), to.to_string());
                }
            }
            None => {
                self.remap
                    .insert(from.to_string(), RemapTarget::Category(to.to_string()));
            }
        }
    }

    /// Remove a remap rule. Returns false when no matching rule exists.
    ///
    /// Dropping the last rule of a detector removes the detector entry.
    pub fn remove_remap(&mut self, from: &str, detector_name: Option<&str>) -> bool {
        match detector_name {
            Some(detector) => {
                let removed = match self.remap.get_mut(detector) {
                    Some(RemapTarget::ByDetector(map)) => map.remove(from).is_some(),
                    _ => false,
                };
                if removed {
                    if let Some(RemapTarget::ByDetector(map)) = self.remap.get(detector) {
                        if map.is_empty() {
                            self.remap.remove(detector);
                        }
                    }
                }
                removed
            }
            None => match self.remap.get(from) {
                Some(RemapTarget::Category(_)) => {
                    self.remap.remove(from);
                    true
                }
                _ => false,
            },
        }
    }

    /// Flatten every remap rule for display.
    pub fn list_remaps(&self) -> Vec<RemapRule> {
        let mut rules = Vec::new();
        for (key, target) in &self.remap {
            match target {
                RemapTarget::Category(to) => rules.push(RemapRule {
                    detector: "*".to_string(),
                    from: key.clone(),
                    to: to.clone(),
                }),
                RemapTarget::ByDetector(map) => {
                    for (from, to) in map {
                        rules.push(RemapRule {
                            detector: key.clone(),
                            from: from.clone(),
                            to: to.clone(),
                        });
                    }
                }
            }
        }
        rules
    }

    pub fn is_empty(&self) -> bool {
        self.remap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_remap_no_rules() {
        let routing = RoutingConfig::default();
        assert_eq!(routing.apply_remap("TestDetector", "Documents"), "Documents");
    }

    #[test]
    fn test_apply_remap_global() {
        let mut routing = RoutingConfig::default();
        routing.set_remap("Documents", "PDF", None);
        assert_eq!(routing.apply_remap("TestDetector", "Documents"), "PDF");
    }

    #[test]
    fn test_apply_remap_detector_specific() {
        let mut routing = RoutingConfig::default();
        routing.set_remap("Documents", "Invoices", Some("InvoiceDetector"));
        assert_eq!(
            routing.apply_remap("InvoiceDetector", "Documents"),
            "Invoices"
        );
    }

    #[test]
    fn test_detector_specific_takes_precedence() {
        let mut routing = RoutingConfig::default();
        routing.set_remap("Documents", "PDF", None);
        routing.set_remap("Documents", "Invoices", Some("InvoiceDetector"));

        assert_eq!(
            routing.apply_remap("InvoiceDetector", "Documents"),
            "Invoices"
        );
        // Other detectors fall back to the global rule
        assert_eq!(routing.apply_remap("GenericDetector", "Documents"), "PDF");
    }

    #[test]
    fn test_apply_remap_unmatched_passes_through() {
        let mut routing = RoutingConfig::default();
        routing.set_remap("Books", "Library", None);
        assert_eq!(routing.apply_remap("TestDetector", "Documents"), "Documents");
    }

    #[test]
    fn test_remove_remap_global() {
        let mut routing = RoutingConfig::default();
        routing.set_remap("Documents", "PDF", None);
        routing.set_remap("Books", "Library", None);

        assert!(routing.remove_remap("Documents", None));
        assert_eq!(routing.apply_remap("X", "Documents"), "Documents");
        assert_eq!(routing.apply_remap("X", "Books"), "Library");
    }

    #[test]
    fn test_remove_remap_detector_specific() {
        let mut routing = RoutingConfig::default();
        routing.set_remap("Documents", "Invoices", Some("InvoiceDetector"));
        routing.set_remap("Books", "Archive", Some("InvoiceDetector"));

        assert!(routing.remove_remap("Documents", Some("InvoiceDetector")));
        assert_eq!(
            routing.apply_remap("InvoiceDetector", "Books"),
            "Archive"
        );
    }

    #[test]
    fn test_remove_remap_cleans_empty_detector() {
        let mut routing = RoutingConfig::default();
        routing.set_remap("Documents", "Invoices", Some("InvoiceDetector"));

        assert!(routing.remove_remap("Documents", Some("InvoiceDetector")));
        assert!(routing.is_empty());
    }

    #[test]
    fn test_remove_remap_not_found() {
        let mut routing = RoutingConfig::default();
        routing.set_remap("Books", "Library", None);

        assert!(!routing.remove_remap("Documents", None));
        assert!(!routing.remove_remap("Documents", Some("InvoiceDetector")));
        assert_eq!(routing.list_remaps().len(), 1);
    }

    #[test]
    fn test_list_remaps_mixed() {
        let mut routing = RoutingConfig::default();
        routing.set_remap("Books", "Library", None);
        routing.set_remap("Documents", "Invoices", Some("InvoiceDetector"));

        let rules = routing.list_remaps();
        assert_eq!(rules.len(), 2);
        assert!(rules.contains(&RemapRule {
            detector: "*".to_string(),
            from: "Books".to_string(),
            to: "Library".to_string(),
        }));
        assert!(rules.contains(&RemapRule {
            detector: "InvoiceDetector".to_string(),
            from: "Documents".to_string(),
            to: "Invoices".to_string(),
        }));
    }

    #[test]
    fn test_yaml_shape() {
        let yaml = "remap:\n  InvoiceDetector:\n    Documents: Invoices\n  Books: Library\n";
        let routing: RoutingConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            routing.apply_remap("InvoiceDetector", "Documents"),
            "Invoices"
        );
        assert_eq!(routing.apply_remap("AnyDetector", "Books"), "Library");

        let back = serde_yaml::to_string(&routing).unwrap();
        let reparsed: RoutingConfig = serde_yaml::from_str(&back).unwrap();
        assert_eq!(reparsed, routing);
    }
}
