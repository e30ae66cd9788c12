//! The ordered class label set.

use crate::core::constants::DEFAULT_LABELS;
use std::sync::Arc;

/// Capitalizes a label the way it is reported to callers: first character upper-case,
/// the rest lower-case.
///
/// ```rust
/// use animal_classifier::domain::capitalize;
///
/// assert_eq!(capitalize("dog"), "Dog");
/// assert_eq!(capitalize("CAT"), "Cat");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Ordered class labels; position `i` names output `i` of the network.
///
/// Cheap to clone and immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalLabels {
    labels: Arc<[String]>,
}

impl AnimalLabels {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Raw label at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Capitalized display name for `index`, or `None` if out of range.
    pub fn species(&self, index: usize) -> Option<String> {
        self.get(index).map(capitalize)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

impl Default for AnimalLabels {
    fn default() -> Self {
        Self::new(DEFAULT_LABELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_order() {
        let labels = AnimalLabels::default();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels.get(0), Some("cat"));
        assert_eq!(labels.get(3), Some("dog"));
        assert_eq!(labels.get(6), None);
    }

    #[test]
    fn test_species_is_capitalized() {
        let labels = AnimalLabels::new(["chicken", "GUINEA PIG"]);
        assert_eq!(labels.species(0).as_deref(), Some("Chicken"));
        assert_eq!(labels.species(1).as_deref(), Some("Guinea pig"));
        assert_eq!(labels.species(2), None);
    }
}
