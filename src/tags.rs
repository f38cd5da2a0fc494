// src/tags.rs
//
// Fixed tag vocabulary and byte-class predicates shared by the scanner.
//
// - RAW-TEXT tags (content never scanned for text): script, style.
// - VOID tags (never have children or an end tag): meta, link, hr, img, input, br.
// - INLINE tags: b, u, i, strong. Reserved; the scanner does not treat them specially.
//
// Tag names are an ASCII letter followed by ASCII letters or digits, so `h1`..`h6`
// scan as tags rather than as a letters-only name plus a malformed attribute.
//
// All comparisons are ASCII case-insensitive.

/* =============================== Core sets =============================== */

pub(crate) const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

pub(crate) const VOID_TAGS: &[&str] = &["meta", "link", "hr", "img", "input", "br"];

pub(crate) const INLINE_TAGS: &[&str] = &["b", "u", "i", "strong"];

/// Tags whose text content is opaque (`<script>`, `<style>`).
pub fn is_raw_text(name: &str) -> bool {
    matches_ignore_ascii_case(name, RAW_TEXT_TAGS)
}

/// Tags that close themselves (`<br>`, `<img>`, ...).
pub fn is_void(name: &str) -> bool {
    matches_ignore_ascii_case(name, VOID_TAGS)
}

pub fn is_inline(name: &str) -> bool {
    matches_ignore_ascii_case(name, INLINE_TAGS)
}

/// Raw-text and void tags cannot carry per-tag attribute options.
pub(crate) fn accepts_attribute_options(name: &str) -> bool {
    !is_raw_text(name) && !is_void(name)
}

/* ============================ Utility predicates ========================= */

#[inline]
pub(crate) fn is_tag_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

#[inline]
pub(crate) fn is_tag_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

#[inline]
pub(crate) fn is_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'-' || b == b'_'
}

#[inline]
pub(crate) fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' || b == b'\x0c' || b == b'\x0b'
}

fn matches_ignore_ascii_case(name: &str, set: &[&str]) -> bool {
    set.iter().any(|s| name.eq_ignore_ascii_case(s))
}
