// src/catalog.rs

use std::collections::HashSet;
use tracing::debug;

/// Ordered, duplicate-free list of service-code columns shared by both
/// directories in the unified table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    codes: Vec<String>,
}

impl ServiceCatalog {
    /// Concatenate the mental-health and substance-abuse lists, keeping the
    /// first occurrence of each code.
    pub fn build<S: AsRef<str>>(mental_health: &[S], substance_abuse: &[S]) -> Self {
        let mut seen = HashSet::new();
        let mut codes = Vec::with_capacity(mental_health.len() + substance_abuse.len());
        for code in mental_health.iter().chain(substance_abuse) {
            let code = code.as_ref();
            if seen.insert(code.to_string()) {
                codes.push(code.to_string());
            }
        }
        debug!(
            input = mental_health.len() + substance_abuse.len(),
            unique = codes.len(),
            "built service catalog"
        );
        Self { codes }
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in catalog order that none of `names` provides.
    pub fn missing_from<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let present: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
        self.codes
            .iter()
            .filter(|c| !present.contains(c.as_str()))
            .cloned()
            .collect()
    }

    /// The subset of `list` that is in the catalog, in catalog order.
    pub fn restricted_to<S: AsRef<str>>(&self, list: &[S]) -> Vec<String> {
        let wanted: HashSet<&str> = list.iter().map(|n| n.as_ref()).collect();
        self.codes
            .iter()
            .filter(|c| wanted.contains(c.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::codes::{MENTAL_HEALTH_CODES, SUBSTANCE_ABUSE_CODES};

    #[test]
    fn dedup_keeps_first_position() {
        let cat = ServiceCatalog::build(&["SA", "MH", "DT"], &["DT", "HH", "SA", "OD"]);
        assert_eq!(cat.codes(), &["SA", "MH", "DT", "HH", "OD"]);
        assert_eq!(cat.codes()[2], "DT");
        assert_eq!(cat.codes().iter().filter(|c| *c == "SA").count(), 1);
    }

    #[test]
    fn builtin_lists_have_no_duplicate_columns() {
        let cat = ServiceCatalog::build(MENTAL_HEALTH_CODES, SUBSTANCE_ABUSE_CODES);
        let unique: HashSet<&String> = cat.codes().iter().collect();
        assert_eq!(unique.len(), cat.len());
        assert!(cat.len() <= MENTAL_HEALTH_CODES.len() + SUBSTANCE_ABUSE_CODES.len());
        // mental-health codes lead the catalog
        assert_eq!(cat.codes()[0], "SA");
        assert_eq!(cat.codes()[MENTAL_HEALTH_CODES.len()], "DT");
    }

    #[test]
    fn missing_and_restricted() {
        let cat = ServiceCatalog::build(&["SA", "MH"], &["DT", "HH"]);
        assert_eq!(cat.missing_from(&["name1", "DT", "SA"]), vec!["MH", "HH"]);
        assert_eq!(cat.restricted_to(&["HH", "MH", "XYZ"]), vec!["MH", "HH"]);
    }
}
