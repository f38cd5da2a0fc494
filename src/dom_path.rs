// src/dom_path.rs
//
// Open-element stack with sibling counters.
//
// The path renders as `root:tag:counter:tag:counter...`. Each counter is the
// position the next child will take inside the element before it (or inside
// the document for the root counter), so the rendered path always ends with
// a counter.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    tag: String,
    next_child: usize,
}

/// Outcome of closing a tag against the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Close {
    /// The innermost element matched and was popped.
    Matched,
    /// A deeper element matched; everything opened after it was discarded.
    Recovered,
    /// No open element has this name; the stack is untouched.
    Orphan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DomPath {
    root: usize,
    frames: Vec<Frame>,
}

impl Default for DomPath {
    fn default() -> Self {
        Self {
            root: 1,
            frames: Vec::new(),
        }
    }
}

impl DomPath {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, tag: &str) {
        self.frames.push(Frame {
            tag: tag.to_owned(),
            next_child: 1,
        });
    }

    /// Closes `tag`, searching from the innermost element outwards.
    ///
    /// On a match the counter of the new innermost element is incremented.
    pub(crate) fn close(&mut self, tag: &str) -> Close {
        let Some(pos) = self
            .frames
            .iter()
            .rposition(|f| f.tag.eq_ignore_ascii_case(tag))
        else {
            return Close::Orphan;
        };
        let innermost = pos + 1 == self.frames.len();
        self.frames.truncate(pos);
        *self.top_counter() += 1;
        if innermost {
            Close::Matched
        } else {
            Close::Recovered
        }
    }

    fn top_counter(&mut self) -> &mut usize {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.next_child,
            None => &mut self.root,
        }
    }
}

impl fmt::Display for DomPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for frame in &self.frames {
            write!(f, ":{}:{}", frame.tag, frame.next_child)?;
        }
        Ok(())
    }
}
