//! Line classifier — decides what a source line is, given where the parser is.
//!
//! Never mutates anything; the block parser acts on the returned [`LineKind`].

use super::patterns::{self, Signature, TagMatch};

/// Where the parser currently is, as far as classification cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scanning,
    InComment,
    /// Inside a block while a multiline tag is accumulating
    InMultiline,
}

impl Phase {
    fn in_block(self) -> bool {
        !matches!(self, Phase::Scanning)
    }
}

/// Content of a doc comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<'a> {
    Tag(TagMatch<'a>),
    /// Anything that isn't a tag: description or multiline text
    Text(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Opens a block. The line still carries content of its own.
    BlockStart(Content<'a>),
    CommentContent(Content<'a>),
    /// Closes a block; `Some` when the line is also a function signature.
    BlockEnd(Option<Signature<'a>>),
    Ignored,
}

/// Classify one raw source line.
pub fn classify(phase: Phase, line: &str) -> LineKind<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        // Blank lines only matter as spacing inside multiline tags
        return match phase {
            Phase::InMultiline => LineKind::CommentContent(Content::Text("")),
            _ => LineKind::Ignored,
        };
    }

    // Comment text is appended verbatim, so only the indentation goes
    let unindented = line.trim_start();

    if !phase.in_block() {
        if patterns::is_comment_start(unindented) {
            return LineKind::BlockStart(content(unindented));
        }
        return LineKind::Ignored;
    }

    if patterns::comment_payload(unindented).is_some() {
        return LineKind::CommentContent(content(unindented));
    }

    LineKind::BlockEnd(patterns::match_signature(trimmed))
}

/// Sub-classify a doc comment line by the tag recognizers.
fn content(line: &str) -> Content<'_> {
    let payload = patterns::comment_payload(line).unwrap_or_default();
    match patterns::match_tag(payload) {
        Some(tag) => Content::Tag(tag),
        None => Content::Text(payload),
    }
}
