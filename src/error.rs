// src/error.rs
//
// Error types for htmlfrag.
//
// Parsing itself never fails: malformed markup is reported through the
// warnings log of an `Extraction`. These errors cover misuse of the
// configuration and editing APIs.

/// Error type for configuration and fragment editing.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Default attributes were set after per-tag attribute options.
    #[error("call order error: default attribute options must be set before tag options")]
    ConfigOrder,

    /// A fragment index was outside the extraction.
    #[error("fragment index {index} out of range (extraction has {len} fragments)")]
    FragmentIndex { index: usize, len: usize },

    /// The terminal `EOF` fragment carries no text and cannot be edited.
    #[error("fragment {0} is the end-of-file marker and has no editable text")]
    EofFragment(usize),
}

/// Result type alias for htmlfrag operations.
pub type Result<T> = std::result::Result<T, Error>;
