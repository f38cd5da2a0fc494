//! # htmlfrag
//!
//! Extracts the visible text of an HTML document as a flat list of fragments,
//! each carrying the exact markup that precedes it. Edit the texts, join
//! prefixes and texts back together, and the rest of the document comes out
//! byte-for-byte unchanged.
//!
//! ```rust
//! let mut extraction = htmlfrag::extract("<div>Hello world</div>\n<p>Second line</p>");
//!
//! assert_eq!(extraction.fragments()[0].dom(), "1:div:1");
//! assert_eq!(extraction.fragments()[1].dom(), "2:p:1");
//!
//! extraction.set_text(1, "Zweite Zeile")?;
//! assert_eq!(extraction.render(), "<div>Hello world</div>\n<p>Zweite Zeile</p>");
//! # Ok::<(), htmlfrag::Error>(())
//! ```
//!
//! This is a scanner, not an HTML parser: there is no tree, no entity
//! decoding, and comments are plain markup. Malformed input never fails; it
//! shows up in [`Extraction::warnings`].

mod dom_path;
mod error;
mod fragment;
mod options;
mod scanner;
mod validate;

/// Fixed tag vocabulary (raw-text, void and inline tags).
pub mod tags;

pub use error::{Error, Result};
pub use fragment::{Extraction, Fragment, EOF_DOM};
pub use options::TagParseOptions;
pub use scanner::Scanner;
pub use validate::is_text_valid;

/// Extracts element text from `html` with no attribute extraction.
pub fn extract(html: &str) -> Extraction {
    Scanner::default().parse(html)
}

/// Extracts text from `html` using `options`.
pub fn extract_with_options(html: &str, options: &TagParseOptions) -> Extraction {
    Scanner::new(options.clone()).parse(html)
}
