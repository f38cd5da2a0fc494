// src/fragment.rs
//
// Extracted fragments and the result of one parse.

use serde::Serialize;

use crate::error::{Error, Result};

/// `dom` value of the terminal fragment.
pub const EOF_DOM: &str = "EOF";

pub(crate) const ATTRIBUTE_MARKER: &str = ":+";

/// One extracted text together with the markup that preceded it.
///
/// `prefix` followed by `text` is the exact slice of the source document this
/// fragment covers. Only `text` may be changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    dom: String,
    text: String,
    prefix: String,
    warning: String,
}

impl Fragment {
    pub(crate) fn new(dom: String, text: String, prefix: String, warning: String) -> Self {
        Self {
            dom,
            text,
            prefix,
            warning,
        }
    }

    pub(crate) fn eof(prefix: String, warning: &str) -> Self {
        Self::new(EOF_DOM.to_owned(), String::new(), prefix, warning.to_owned())
    }

    /// DOM path at emission, e.g. `1:div:2:p:1` or `1:button:1:+value`.
    pub fn dom(&self) -> &str {
        &self.dom
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Structural problem noticed while scanning up to this fragment, or empty.
    pub fn warning(&self) -> &str {
        &self.warning
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_eof(&self) -> bool {
        self.dom == EOF_DOM
    }

    /// Name of the attribute this text came from, if any.
    pub fn attribute(&self) -> Option<&str> {
        self.dom
            .rsplit_once(ATTRIBUTE_MARKER)
            .map(|(_, attribute)| attribute)
    }

    pub fn is_attribute(&self) -> bool {
        self.attribute().is_some()
    }
}

/// Everything produced by parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub(crate) fragments: Vec<Fragment>,
    pub(crate) dom_trace: Vec<String>,
    pub(crate) warnings: Vec<String>,
}

impl Extraction {
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Mutable access for editing texts in place. Order and count are fixed.
    pub fn fragments_mut(&mut self) -> &mut [Fragment] {
        &mut self.fragments
    }

    /// Fragments carrying extracted text, without the terminal marker.
    pub fn text_fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(|f| !f.is_eof())
    }

    /// DOM path of every element opened, in document order.
    pub fn dom_trace(&self) -> &[String] {
        &self.dom_trace
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Replaces the text of fragment `index`.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range or points at the end-of-file marker.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        let len = self.fragments.len();
        let fragment = self
            .fragments
            .get_mut(index)
            .ok_or(Error::FragmentIndex { index, len })?;
        if fragment.is_eof() {
            return Err(Error::EofFragment(index));
        }
        fragment.set_text(text);
        Ok(())
    }

    /// Rebuilds the document from prefixes and (possibly edited) texts.
    pub fn render(&self) -> String {
        let len = self
            .fragments
            .iter()
            .map(|f| f.prefix.len() + f.text.len())
            .sum();
        let mut out = String::with_capacity(len);
        for fragment in &self.fragments {
            out.push_str(&fragment.prefix);
            out.push_str(&fragment.text);
        }
        out
    }
}
