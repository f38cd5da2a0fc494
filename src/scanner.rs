// src/scanner.rs
//
// Single-pass HTML text scanner.
//
// - Walks the document once, front to back. Everything that is not emitted as
//   text (tags, attributes, whitespace, rejected text) is folded into the
//   pending prefix, so prefixes + texts always rebuild the input.
// - Text runs (`[^<]+`) go through the validator; valid runs become fragments.
// - Open tags push onto the DOM path, close tags pop it (with recovery for
//   unclosed children). RAW-TEXT tags (script, style) are skipped to their
//   end tag. VOID tags close themselves.
// - Attribute values are emitted as fragments when the options say so; the
//   fragment's DOM path then ends in `:+<attribute>`.
// - A missing `>` (or `</script`) means the rest of the input cannot be
//   scanned: it all goes into one final `EOF` fragment flagged "data broken".

use memchr::memchr;

use crate::dom_path::{Close, DomPath};
use crate::fragment::{Extraction, Fragment, ATTRIBUTE_MARKER};
use crate::options::TagParseOptions;
use crate::tags::{self, is_ws};
use crate::validate::{is_text_valid, split_trailing_ws};

/// Extracts text fragments from HTML documents.
///
/// A scanner only holds configuration; every [`parse`](Scanner::parse) call
/// starts from a clean state, so one scanner can serve many documents.
///
/// ```rust
/// use htmlfrag::{Scanner, TagParseOptions};
///
/// let options = TagParseOptions::new().with_tag_attributes([("button", ["value"])]);
/// let scanner = Scanner::new(options);
/// let mut extraction = scanner.parse(r#"<p>Hello there</p><button value="Click me">"#);
///
/// let texts: Vec<_> = extraction.text_fragments().map(|f| f.text()).collect();
/// assert_eq!(texts, ["Hello there", "Click me"]);
///
/// extraction.set_text(0, "Bonjour")?;
/// assert_eq!(extraction.render(), r#"<p>Bonjour</p><button value="Click me">"#);
/// # Ok::<(), htmlfrag::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: TagParseOptions,
}

impl Scanner {
    pub fn new(options: TagParseOptions) -> Self {
        Self { options }
    }

    /// Scans `document` to the end. Never fails; problems are reported in
    /// [`Extraction::warnings`] and on the affected fragments.
    pub fn parse(&self, document: &str) -> Extraction {
        let mut parse = Parse::new(&self.options, document);
        while parse.step() {}
        tracing::debug!(
            bytes = document.len(),
            fragments = parse.out.fragments.len(),
            warnings = parse.out.warnings.len(),
            "document scanned"
        );
        parse.out
    }
}

/* ================================ Cursor ================================= */

/// Unscanned input plus what has been skipped since the last fragment.
#[derive(Debug)]
struct Cursor<'a> {
    rest: &'a str,
    prefix: String,
    warning: String,
}

impl<'a> Cursor<'a> {
    fn new(document: &'a str) -> Self {
        Self {
            rest: document,
            prefix: String::new(),
            warning: String::new(),
        }
    }

    /// Moves `n` bytes of input into the pending prefix.
    fn fold(&mut self, n: usize) {
        let (head, tail) = self.rest.split_at(n);
        self.prefix.push_str(head);
        self.rest = tail;
    }

    fn advance(&mut self, n: usize) {
        self.rest = &self.rest[n..];
    }

    fn take_prefix(&mut self) -> String {
        std::mem::take(&mut self.prefix)
    }

    fn take_warning(&mut self) -> String {
        std::mem::take(&mut self.warning)
    }

    fn strip_leading_ws(&mut self) -> bool {
        let n = self.rest.len() - self.rest.trim_start().len();
        if n == 0 {
            return false;
        }
        self.fold(n);
        true
    }
}

/* ============================== Tag syntax =============================== */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TagEnd {
    /// `<name>`
    Closed,
    /// `<name/>`
    SelfClosed,
    /// `<name` followed by optional whitespace; attributes may follow.
    Open,
}

#[derive(Clone, Copy, Debug)]
struct OpenTag<'a> {
    name: &'a str,
    end: TagEnd,
    len: usize,
}

/// Matches `<name>`, `<name/>` or `<name` + whitespace at the start of `s`.
fn scan_open_tag(s: &str) -> Option<OpenTag<'_>> {
    let b = s.as_bytes();
    if b.len() < 2 || b[0] != b'<' || !tags::is_tag_name_start(b[1]) {
        return None;
    }
    let mut i = 2;
    while i < b.len() && tags::is_tag_name_char(b[i]) {
        i += 1;
    }
    let name = &s[1..i];
    let (end, len) = if b[i..].starts_with(b">") {
        (TagEnd::Closed, i + 1)
    } else if b[i..].starts_with(b"/>") {
        (TagEnd::SelfClosed, i + 2)
    } else {
        let mut j = i;
        while j < b.len() && is_ws(b[j]) {
            j += 1;
        }
        (TagEnd::Open, j)
    };
    Some(OpenTag { name, end, len })
}

#[derive(Clone, Copy, Debug)]
struct AttrName<'a> {
    name: &'a str,
    /// Bytes up to the value: name, `=`, and surrounding whitespace.
    len: usize,
}

/// Matches `name\s*=\s*` at the start of `s`.
fn scan_attribute_name(s: &str) -> Option<AttrName<'_>> {
    let b = s.as_bytes();
    let mut i = 0;
    while i < b.len() && tags::is_attr_name_char(b[i]) {
        i += 1;
    }
    if i == 0 {
        return None;
    }
    let name = &s[..i];
    while i < b.len() && is_ws(b[i]) {
        i += 1;
    }
    if b.get(i) != Some(&b'=') {
        return None;
    }
    i += 1;
    while i < b.len() && is_ws(b[i]) {
        i += 1;
    }
    Some(AttrName { name, len: i })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AttrValue {
    quote: Option<u8>,
    /// Value text is `start..end`; leading whitespace inside quotes is markup.
    start: usize,
    end: usize,
    /// Bytes covered including quotes.
    len: usize,
}

/// Finds the value span at the start of `s`: `"..."`, `'...'`, or a bare token
/// ended by whitespace or `>`. An unterminated value is no value.
fn scan_attribute_value(s: &str) -> Option<AttrValue> {
    let b = s.as_bytes();
    match *b.first()? {
        q @ (b'"' | b'\'') => {
            let close = 1 + memchr(q, &b[1..])?;
            let inner = &s[1..close];
            let start = 1 + inner.len() - inner.trim_start().len();
            Some(AttrValue {
                quote: Some(q),
                start,
                end: close,
                len: close + 1,
            })
        }
        _ => {
            let mut i = 0;
            while i < b.len() && !is_ws(b[i]) && b[i] != b'>' {
                i += 1;
            }
            if i == 0 || i == b.len() {
                return None;
            }
            Some(AttrValue {
                quote: None,
                start: 0,
                end: i,
                len: i,
            })
        }
    }
}

/// Position of `</name` (ASCII case-insensitive) in `s`.
fn find_close_tag(s: &str, name: &str) -> Option<usize> {
    let hay = s.as_bytes();
    let name = name.as_bytes();
    let mut i = 0;
    while let Some(rel) = memchr(b'<', &hay[i..]) {
        let at = i + rel;
        let tail = &hay[at + 1..];
        if tail.len() > name.len()
            && tail[0] == b'/'
            && tail[1..=name.len()].eq_ignore_ascii_case(name)
        {
            return Some(at);
        }
        i = at + 1;
    }
    None
}

/* ================================ Parse ================================== */

enum AttrStep {
    /// An attribute was consumed; more may follow.
    Next,
    /// The tag ended, cleanly or after skipping malformed content.
    End,
}

struct Parse<'o, 'a> {
    options: &'o TagParseOptions,
    cur: Cursor<'a>,
    dom: DomPath,
    out: Extraction,
}

impl<'o, 'a> Parse<'o, 'a> {
    fn new(options: &'o TagParseOptions, document: &'a str) -> Self {
        Self {
            options,
            cur: Cursor::new(document),
            dom: DomPath::new(),
            out: Extraction::default(),
        }
    }

    /// One driver iteration. Returns false once the input is exhausted.
    fn step(&mut self) -> bool {
        if self.cur.rest.is_empty() {
            self.end_of_file();
            return false;
        }
        if self.cur.strip_leading_ws() {
            return true;
        }
        match memchr(b'<', self.cur.rest.as_bytes()) {
            Some(0) => self.tag_open_or_close(),
            Some(len) => self.emit_or_fold(len, None),
            None => self.emit_or_fold(self.cur.rest.len(), None),
        }
        true
    }

    fn warn(&mut self, message: String) {
        tracing::debug!("{message}");
        self.out.warnings.push(message);
    }

    /* ----------------------------- Emission ------------------------------ */

    /// Emits the next `len` bytes as a fragment if they read as text,
    /// otherwise folds them into the prefix.
    fn emit_or_fold(&mut self, len: usize, attribute: Option<&str>) {
        let rest = self.cur.rest;
        let text = &rest[..len];
        if !is_text_valid(text) {
            self.cur.fold(len);
            return;
        }
        let prefix = self.cur.take_prefix();
        let warning = self.cur.take_warning();
        self.cur.advance(len);

        let (body, tail) = split_trailing_ws(text);
        self.cur.prefix.push_str(tail);

        let mut dom = self.dom.to_string();
        if let Some(attribute) = attribute {
            dom.push_str(ATTRIBUTE_MARKER);
            dom.push_str(attribute);
        }
        tracing::trace!(%dom, text = body, "fragment");
        self.out
            .fragments
            .push(Fragment::new(dom, body.to_owned(), prefix, warning));
    }

    fn end_of_file(&mut self) {
        if self.out.fragments.last().is_some_and(Fragment::is_eof) {
            return;
        }
        let prefix = self.cur.take_prefix();
        self.out.fragments.push(Fragment::eof(prefix, "end of file"));
    }

    /// Folds all remaining input into a final `EOF` fragment.
    fn data_broken(&mut self) {
        let left = self.cur.rest.len();
        self.cur.fold(left);
        let prefix = self.cur.take_prefix();
        self.cur.take_warning();
        self.out.fragments.push(Fragment::eof(prefix, "data broken"));
        let message = format!("data broken - {left} bytes left not parsed");
        tracing::warn!("{message}");
        self.out.warnings.push(message);
    }

    /// Folds input through the next `>`. Returns false if there is none.
    fn skip_through_gt(&mut self) -> bool {
        match memchr(b'>', self.cur.rest.as_bytes()) {
            Some(at) => {
                self.cur.fold(at + 1);
                true
            }
            None => {
                self.data_broken();
                false
            }
        }
    }

    /* ------------------------------- Tags -------------------------------- */

    fn tag_open_or_close(&mut self) {
        let rest = self.cur.rest;

        if rest.starts_with("</") {
            let Some(end) = memchr(b'>', rest.as_bytes()) else {
                self.data_broken();
                return;
            };
            let name = &rest[2..end];
            self.cur.fold(end + 1);
            if name.bytes().next().is_some_and(tags::is_tag_name_start) {
                self.close_tag(name);
            } else {
                self.warn(format!("close tag not html format - {name}"));
            }
            return;
        }

        let Some(tag) = scan_open_tag(rest) else {
            // <!doctype>, <!-- -->, <?xml ?>, stray '<'
            self.skip_through_gt();
            return;
        };
        let name = tag.name;
        self.cur.fold(tag.len);
        self.dom.push(name);
        self.out.dom_trace.push(self.dom.to_string());

        match tag.end {
            TagEnd::SelfClosed => {
                self.close_tag(name);
                if !tags::is_void(name) {
                    self.warn(format!("tag {name} not in known self-close tags but ends with /"));
                }
            }
            _ if tags::is_raw_text(name) => self.skip_raw_text(name),
            end if tags::is_void(name) => {
                self.close_tag(name);
                if end == TagEnd::Open {
                    self.parse_attributes(name, true);
                    self.warn(format!("self-close tag {name} had parameters"));
                }
            }
            TagEnd::Open => {
                self.parse_attributes(name, false);
            }
            TagEnd::Closed => {}
        }
    }

    /// Folds script/style content up to (not including) its end tag.
    fn skip_raw_text(&mut self, name: &str) {
        match find_close_tag(self.cur.rest, name) {
            Some(at) => self.cur.fold(at),
            None => self.data_broken(),
        }
    }

    fn close_tag(&mut self, name: &str) {
        match self.dom.close(name) {
            Close::Matched => {}
            Close::Recovered => {
                self.cur.warning = "previous tag was not closed".to_owned();
                self.warn(format!("dom tree error - tag before {name} was not closed"));
            }
            Close::Orphan => {
                self.warn(format!("dom tree error - close tag {name} has no matching open tag"));
            }
        }
    }

    /* ---------------------------- Attributes ----------------------------- */

    /// Scans attributes up to the end of the tag. With `ignore`, no value is
    /// extracted.
    fn parse_attributes(&mut self, tag: &str, ignore: bool) {
        while let AttrStep::Next = self.next_attribute(tag, ignore) {}
    }

    fn next_attribute(&mut self, tag: &str, ignore: bool) -> AttrStep {
        let rest = self.cur.rest;
        let Some(attr) = scan_attribute_name(rest) else {
            if rest.starts_with('>') || rest.starts_with("/>") {
                self.skip_through_gt();
                self.cur.strip_leading_ws();
                return AttrStep::End;
            }
            self.warn(format!("wrong html parameter in {tag}"));
            self.cur.warning = "unknown tag parameters structure".to_owned();
            self.skip_through_gt();
            return AttrStep::End;
        };
        self.cur.fold(attr.len);

        let rest = self.cur.rest;
        let Some(value) = scan_attribute_value(rest) else {
            self.warn(format!("tag {tag} parameters quote error"));
            self.cur.warning = "tag parameters quote error".to_owned();
            self.skip_through_gt();
            return AttrStep::End;
        };
        if rest.starts_with('<') {
            self.warn(format!("wrong parameter value in tag {tag}"));
            self.skip_through_gt();
            return AttrStep::End;
        }

        if !ignore && self.options.is_extractable(tag, attr.name) {
            self.cur.fold(value.start);
            self.emit_or_fold(value.end - value.start, Some(attr.name));
            if value.quote.is_some() {
                self.cur.fold(1);
            }
        } else {
            self.cur.fold(value.len);
        }
        self.cur.strip_leading_ws();
        AttrStep::Next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Extraction {
        Scanner::default().parse(html)
    }

    fn doms(extraction: &Extraction) -> Vec<&str> {
        extraction.fragments().iter().map(Fragment::dom).collect()
    }

    #[test]
    fn open_tag_forms() {
        let t = scan_open_tag("<div>x").unwrap();
        assert_eq!((t.name, t.end, t.len), ("div", TagEnd::Closed, 5));
        let t = scan_open_tag("<br/>").unwrap();
        assert_eq!((t.name, t.end, t.len), ("br", TagEnd::SelfClosed, 5));
        let t = scan_open_tag("<H1 \n class=x>").unwrap();
        assert_eq!((t.name, t.end, t.len), ("H1", TagEnd::Open, 6));
        let t = scan_open_tag("<div").unwrap();
        assert_eq!((t.end, t.len), (TagEnd::Open, 4));
        assert!(scan_open_tag("<!doctype html>").is_none());
        assert!(scan_open_tag("< div>").is_none());
        assert!(scan_open_tag("<").is_none());
    }

    #[test]
    fn attribute_name_and_value_spans() {
        let a = scan_attribute_name("data-x = 'v'>").unwrap();
        assert_eq!((a.name, a.len), ("data-x", 9));
        assert!(scan_attribute_name("disabled>").is_none());
        assert!(scan_attribute_name("=x").is_none());

        let v = scan_attribute_value("\"  Click me\">").unwrap();
        assert_eq!((v.quote, v.start, v.end, v.len), (Some(b'"'), 3, 11, 12));
        let v = scan_attribute_value("'a\"b' x").unwrap();
        assert_eq!((v.start, v.end, v.len), (1, 4, 5));
        let v = scan_attribute_value("bare>").unwrap();
        assert_eq!((v.quote, v.start, v.end, v.len), (None, 0, 4, 4));
        assert!(scan_attribute_value("\"unterminated").is_none());
        assert!(scan_attribute_value("bare").is_none());
        assert!(scan_attribute_value(">").is_none());
    }

    #[test]
    fn close_tag_search_ignores_case_and_other_tags() {
        assert_eq!(find_close_tag("a < b </b></SCRIPT>", "script"), Some(10));
        assert_eq!(find_close_tag("x</scrip", "script"), None);
        assert_eq!(find_close_tag("", "style"), None);
    }

    #[test]
    fn script_and_style_content_is_skipped() {
        let html = "<script>var s = '<p>not text</p>';</script><style>p { x: y }</style><p>Shown text</p>";
        let extraction = parse(html);
        let texts: Vec<_> = extraction.text_fragments().map(Fragment::text).collect();
        assert_eq!(texts, ["Shown text"]);
        assert_eq!(extraction.fragments()[0].dom(), "3:p:1");
        assert!(extraction.warnings().is_empty());
        assert_eq!(extraction.render(), html);
    }

    #[test]
    fn unterminated_script_is_data_broken() {
        let extraction = parse("<p>Before it</p><script>alert(1)");
        assert_eq!(doms(&extraction), ["1:p:1", "EOF"]);
        let eof = &extraction.fragments()[1];
        assert_eq!(eof.warning(), "data broken");
        assert_eq!(eof.prefix(), "</p><script>alert(1)");
        assert_eq!(extraction.warnings(), ["data broken - 8 bytes left not parsed"]);
    }

    #[test]
    fn void_tags_close_themselves() {
        let extraction = parse("<p>Line one<br>Line two<img src=\"a.png\"/>Line three</p>");
        assert_eq!(doms(&extraction), ["1:p:1", "1:p:2", "1:p:3", "EOF"]);
        assert_eq!(extraction.warnings(), ["self-close tag img had parameters"]);
    }

    #[test]
    fn void_tag_with_attributes_is_reported_and_never_extracted() {
        let options = TagParseOptions::new().with_default_attributes(["alt"]).unwrap();
        let extraction = Scanner::new(options).parse("<img alt=\"A cat\" src=x.png >Caption here");
        let texts: Vec<_> = extraction.text_fragments().map(Fragment::text).collect();
        assert_eq!(texts, ["Caption here"]);
        assert_eq!(extraction.warnings(), ["self-close tag img had parameters"]);
        assert_eq!(extraction.fragments()[0].dom(), "2");
    }

    #[test]
    fn void_tag_not_ended_by_bare_gt_is_reported() {
        let extraction = parse("<br /><hr >Rule text<br/><hr>");
        assert_eq!(
            extraction.warnings(),
            [
                "self-close tag br had parameters",
                "self-close tag hr had parameters",
            ]
        );
        assert_eq!(doms(&extraction), ["3", "EOF"]);
        assert_eq!(extraction.fragments()[0].warning(), "");
    }

    #[test]
    fn self_closed_unknown_tag_is_reported() {
        let extraction = parse("<div/>After text");
        assert_eq!(
            extraction.warnings(),
            ["tag div not in known self-close tags but ends with /"]
        );
        assert_eq!(extraction.fragments()[0].dom(), "2");
    }

    #[test]
    fn mismatched_close_recovers_and_taints_next_fragment() {
        let extraction = parse("<div><p>Para text</div>Next text");
        assert_eq!(doms(&extraction), ["1:div:1:p:1", "2", "EOF"]);
        assert_eq!(extraction.fragments()[0].warning(), "");
        assert_eq!(extraction.fragments()[1].warning(), "previous tag was not closed");
        assert_eq!(
            extraction.warnings(),
            ["dom tree error - tag before div was not closed"]
        );
    }

    #[test]
    fn orphan_and_malformed_close_tags_only_warn() {
        let extraction = parse("</span><p>Text here</p></ 1>");
        assert_eq!(doms(&extraction), ["1:p:1", "EOF"]);
        assert_eq!(
            extraction.warnings(),
            [
                "dom tree error - close tag span has no matching open tag",
                "close tag not html format -  1",
            ]
        );
    }

    #[test]
    fn doctype_and_comments_are_markup() {
        let html = "<!DOCTYPE html>\n<!-- note -->\n<html><body>Body text</body></html>\n";
        let extraction = parse(html);
        assert_eq!(doms(&extraction), ["1:html:1:body:1", "EOF"]);
        assert_eq!(extraction.fragments()[0].prefix(), "<!DOCTYPE html>\n<!-- note -->\n<html><body>");
        assert_eq!(extraction.fragments()[1].prefix(), "</body></html>\n");
        assert_eq!(extraction.dom_trace(), ["1:html:1", "1:html:1:body:1"]);
    }

    #[test]
    fn junk_inside_tag_skips_to_end_and_warns() {
        let extraction = parse("<div class=\"a\" @click=go>Inside text</div>");
        assert_eq!(extraction.warnings(), ["wrong html parameter in div"]);
        let fragment = &extraction.fragments()[0];
        assert_eq!(fragment.text(), "Inside text");
        assert_eq!(fragment.warning(), "unknown tag parameters structure");
    }

    #[test]
    fn unterminated_quote_skips_to_end_of_tag() {
        let extraction = parse("<div title=\"oops>Text after</div>");
        assert_eq!(extraction.warnings(), ["tag div parameters quote error"]);
        assert_eq!(extraction.fragments()[0].text(), "Text after");
        assert_eq!(extraction.fragments()[0].warning(), "tag parameters quote error");
    }

    #[test]
    fn stray_angle_bracket_in_value_is_skipped() {
        let extraction = parse("<a href=<b>Link text</a>");
        assert_eq!(extraction.warnings(), ["wrong parameter value in tag a"]);
        assert_eq!(extraction.fragments()[0].text(), "Link text");
        assert_eq!(extraction.fragments()[0].dom(), "1:a:1");
    }

    #[test]
    fn rejected_text_becomes_prefix() {
        let extraction = parse("<td>42</td><td>Total sum</td>");
        assert_eq!(extraction.fragments()[0].prefix(), "<td>42</td><td>");
        assert_eq!(extraction.fragments()[0].dom(), "2:td:1");
    }

    #[test]
    fn empty_document_yields_lone_eof() {
        let extraction = parse("");
        assert_eq!(doms(&extraction), ["EOF"]);
        assert_eq!(extraction.render(), "");
    }

    #[test]
    fn markup_only_document_keeps_its_bytes() {
        let html = "<div>\n  <span></span>\n</div>\n";
        let extraction = parse(html);
        assert_eq!(doms(&extraction), ["EOF"]);
        assert_eq!(extraction.render(), html);
    }
}
