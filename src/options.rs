// src/options.rs
//
// Attribute extraction options.
//
// By default only element text is extracted. `TagParseOptions` lists the
// attributes whose values are visible text as well (`title`, `alt`,
// `placeholder`, ...), either for every tag or for specific tags.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::tags;

/// Which attribute values are extracted as text.
///
/// Names are stored lowercase and matched ASCII case-insensitively. Default
/// attributes must be configured before per-tag attributes: per-tag sets are
/// stored without the attributes already covered by the defaults.
///
/// ```rust
/// use htmlfrag::TagParseOptions;
///
/// let options = TagParseOptions::new()
///     .with_default_attributes(["tooltip"])?
///     .with_tag_attributes([("button", ["value"])]);
///
/// assert!(options.is_extractable("div", "tooltip"));
/// assert!(options.is_extractable("button", "value"));
/// assert!(!options.is_extractable("div", "value"));
/// # Ok::<(), htmlfrag::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagParseOptions {
    per_tag: BTreeMap<String, BTreeSet<String>>,
    defaults: BTreeSet<String>,
}

impl TagParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from both parts, defaults first.
    pub fn from_parts<T, A, D>(per_tag: T, defaults: D) -> Self
    where
        T: IntoIterator<Item = (String, A)>,
        A: IntoIterator<Item = String>,
        D: IntoIterator<Item = String>,
    {
        let mut options = Self::new();
        options.extend_defaults(defaults);
        options.with_tag_attributes(per_tag)
    }

    /// Adds attributes extracted for any tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigOrder`] once per-tag options have been set.
    pub fn with_default_attributes<D>(mut self, attributes: D) -> Result<Self>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        if !self.per_tag.is_empty() {
            return Err(Error::ConfigOrder);
        }
        self.extend_defaults(attributes);
        Ok(self)
    }

    /// Adds attributes extracted for specific tags.
    ///
    /// Raw-text and void tags are skipped, as are attributes already in the
    /// default set.
    #[must_use]
    pub fn with_tag_attributes<T, K, A>(mut self, tags: T) -> Self
    where
        T: IntoIterator<Item = (K, A)>,
        K: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        for (tag, attributes) in tags {
            let tag = tag.as_ref();
            if !tags::accepts_attribute_options(tag) {
                tracing::debug!(tag, "attribute options ignored for raw-text or void tag");
                continue;
            }
            let attributes: BTreeSet<String> = attributes
                .into_iter()
                .map(|a| a.as_ref().to_ascii_lowercase())
                .filter(|a| !self.defaults.contains(a))
                .collect();
            if attributes.is_empty() {
                continue;
            }
            self.per_tag
                .entry(tag.to_ascii_lowercase())
                .or_default()
                .extend(attributes);
        }
        self
    }

    fn extend_defaults<D>(&mut self, attributes: D)
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        self.defaults
            .extend(attributes.into_iter().map(|a| a.as_ref().to_ascii_lowercase()));
    }

    pub fn tag_attributes(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.per_tag.get(&tag.to_ascii_lowercase())
    }

    /// Whether the value of `attribute` on `tag` is extracted as text.
    pub fn is_extractable(&self, tag: &str, attribute: &str) -> bool {
        let attribute = attribute.to_ascii_lowercase();
        self.defaults.contains(&attribute)
            || self
                .tag_attributes(tag)
                .is_some_and(|set| set.contains(&attribute))
    }
}
