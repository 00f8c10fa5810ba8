//! Ordered set of fixed variable values
//!
//! The first definer of an ID wins. Overrides are pushed down the template
//! chain from the most specific call site toward the root template, so an
//! ancestor can only fix IDs nobody closer to the leaf has already fixed.

use crate::descriptor::TemplateOverride;

use super::placeholder;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    entries: Vec<TemplateOverride>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|o| o.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateOverride> {
        self.entries.iter()
    }

    /// Add `entry` unless its ID is already fixed. Returns whether it was added.
    pub fn insert_if_absent(&mut self, entry: TemplateOverride) -> bool {
        if self.contains(&entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Copy of this set extended by the values a template level fixes itself.
    pub fn merged_with(&self, fixed: &[TemplateOverride]) -> Self {
        let mut merged = self.clone();
        for entry in fixed {
            merged.insert_if_absent(entry.clone());
        }
        merged
    }

    /// Substitute `${id}` placeholders for every fixed ID in `text`.
    pub fn apply(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }
        placeholder::substitute(text, |id| self.get(id).map(str::to_string))
    }
}

impl FromIterator<TemplateOverride> for OverrideSet {
    fn from_iter<I: IntoIterator<Item = TemplateOverride>>(iter: I) -> Self {
        let mut set = OverrideSet::new();
        for entry in iter {
            set.insert_if_absent(entry);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_definer_wins() {
        let inherited: OverrideSet = [TemplateOverride::new("x", "1")].into_iter().collect();
        let merged = inherited.merged_with(&[
            TemplateOverride::new("x", "2"),
            TemplateOverride::new("y", "3"),
        ]);

        assert_eq!(merged.get("x"), Some("1"));
        assert_eq!(merged.get("y"), Some("3"));
        assert_eq!(merged.len(), 2);
        // the inherited set itself is untouched
        assert_eq!(inherited.len(), 1);
    }

    #[test]
    fn test_duplicates_in_one_level() {
        let set: OverrideSet = [
            TemplateOverride::new("x", "first"),
            TemplateOverride::new("x", "second"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.get("x"), Some("first"));
    }

    #[test]
    fn test_apply() {
        let set: OverrideSet = [TemplateOverride::new("port", "8080")].into_iter().collect();
        assert_eq!(set.apply("--port=${port} ${other}"), "--port=8080 ${other}");
        assert_eq!(OverrideSet::new().apply("${port}"), "${port}");
    }
}
