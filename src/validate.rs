// src/validate.rs
//
// Heuristic text classifier.
//
// A run of visible characters is worth extracting when it reads like prose or a
// word, and not when it is a number, a punctuation/digit run, or a single
// technical token such as a URL or a path.

/// Characters that on their own never make extractable text.
const NOISE_CHARS: &[u8] = b"0123456789 ,./<>?;'\"\\:|[]{}!@#$%^&*()+=_-";

/// Returns true if `text` is meaningful enough to emit as a fragment.
pub fn is_text_valid(text: &str) -> bool {
    let text = text.trim();
    if text.parse::<f64>().is_ok() {
        return false;
    }
    if !text.is_empty() && text.bytes().all(|b| NOISE_CHARS.contains(&b)) {
        return false;
    }
    if text.contains(' ') {
        return true;
    }
    is_plain_token(text)
}

/// A single token passes when nothing but its last character is a separator
/// (`.`, `:`, `/`) or whitespace, so `hello.` passes and `a.b/c` does not.
fn is_plain_token(text: &str) -> bool {
    let mut chars = text.chars();
    if chars.next_back().is_none() {
        return false;
    }
    let head = chars.as_str();
    !head.is_empty() && head.chars().all(|c| !matches!(c, '.' | ':' | '/') && !c.is_whitespace())
}

/// Splits trailing whitespace off emitted text. The tail belongs to the next
/// fragment's prefix.
pub(crate) fn split_trailing_ws(text: &str) -> (&str, &str) {
    let body = text.trim_end();
    (body, &text[body.len()..])
}
