//! Pattern table — every line-shape recognizer used by the parser.
//!
//! Recognizers are pure: they never look at parser state and never fail, they
//! either return `None` or the captured pieces. Tag recognizers run against the
//! comment payload (the text after `---` and one optional space), which keeps
//! trailing whitespace; the signature recognizer runs against the trimmed line.

use regex::Regex;
use std::sync::LazyLock;

// -- Block recognizers --------------------------------------------------------

static RE_COMMENT_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^---").unwrap());

static RE_COMMENT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*---\s?(.*)$").unwrap());

// `[local] function [ctx(.|:)]name(params) end` — ctx may itself be dotted
static RE_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:local\s+)?function\s+",
        r"(?:([A-Za-z_][\w.]*?)([.:]))?",
        r"([A-Za-z_]\w*)?",
        r"\s*\((.*?)\)\s*end$"
    ))
    .unwrap()
});

// -- Tag recognizers ----------------------------------------------------------

static RE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@class\s+(.+?)\s*$").unwrap());

static RE_META: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@meta(?:\s+(.*?))?\s*$").unwrap());

static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@name\s+(.+?)\s*$").unwrap());

static RE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@param\s+([\w.]+\??)\s+(.+?)(?:\s+-\s+(.*?))?\s*$").unwrap()
});

static RE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@return\s+(.+?)(?:\s+-\s+(.*?))?\s*$").unwrap());

static RE_EXAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@example(?:\s+(.*?))?\s*$").unwrap());

/// Marker a documentation file must start with.
pub const META_MARKER: &str = "---@meta";

/// Structured annotations recognized inside a doc block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Class,
    Meta,
    Name,
    Param,
    Return,
    Example,
}

/// Order in which tag recognizers are consulted. The first match consumes the line.
pub const TAG_PRIORITY: [Tag; 6] = [
    Tag::Class,
    Tag::Meta,
    Tag::Name,
    Tag::Param,
    Tag::Return,
    Tag::Example,
];

/// Captured pieces of a recognized tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch<'a> {
    Class(&'a str),
    /// `@meta` with an empty name still matches, so the caller can reject it
    Meta(&'a str),
    Name(&'a str),
    Param {
        name: &'a str,
        ty: &'a str,
        description: &'a str,
    },
    Return {
        types: Vec<&'a str>,
        description: &'a str,
    },
    /// Text following `@example` on the tag line, if any
    Example(Option<&'a str>),
}

impl Tag {
    fn pattern(self) -> &'static Regex {
        match self {
            Tag::Class => &RE_CLASS,
            Tag::Meta => &RE_META,
            Tag::Name => &RE_NAME,
            Tag::Param => &RE_PARAM,
            Tag::Return => &RE_RETURN,
            Tag::Example => &RE_EXAMPLE,
        }
    }

    /// Run this tag's recognizer over a comment payload.
    pub fn extract(self, payload: &str) -> Option<TagMatch<'_>> {
        let caps = self.pattern().captures(payload)?;
        let group = |i: usize| caps.get(i).map(|m| m.as_str());

        let matched = match self {
            Tag::Class => TagMatch::Class(group(1)?),
            Tag::Meta => TagMatch::Meta(group(1).unwrap_or_default()),
            Tag::Name => TagMatch::Name(group(1)?),
            Tag::Param => TagMatch::Param {
                name: group(1)?,
                ty: group(2)?,
                description: group(3).unwrap_or_default(),
            },
            Tag::Return => TagMatch::Return {
                types: split_types(group(1)?),
                description: group(2).unwrap_or_default(),
            },
            Tag::Example => TagMatch::Example(group(1).filter(|s| !s.is_empty())),
        };
        Some(matched)
    }
}

/// Find the first tag in [`TAG_PRIORITY`] order that recognizes `payload`.
pub fn match_tag(payload: &str) -> Option<TagMatch<'_>> {
    TAG_PRIORITY.iter().find_map(|tag| tag.extract(payload))
}

/// Split a `@return` type list on commas, dropping blanks and repeats.
fn split_types(raw: &str) -> Vec<&str> {
    let mut types: Vec<&str> = Vec::new();
    for ty in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !types.contains(&ty) {
            types.push(ty);
        }
    }
    types
}

// -- Line recognizers ---------------------------------------------------------

/// Does this line (leading whitespace removed) open a doc block?
pub fn is_comment_start(line: &str) -> bool {
    RE_COMMENT_START.is_match(line)
}

/// Text of a doc comment line after the `---` prefix and one optional space.
pub fn comment_payload(line: &str) -> Option<&str> {
    RE_COMMENT_LINE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Module name from a `---@meta <name>` line. An empty name yields `Some("")`.
pub fn match_meta_line(line: &str) -> Option<&str> {
    match Tag::Meta.extract(comment_payload(line.trim())?)? {
        TagMatch::Meta(name) => Some(name),
        _ => None,
    }
}

/// Captures of a function signature line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature<'a> {
    pub context: Option<&'a str>,
    pub separator: Option<&'a str>,
    pub name: Option<&'a str>,
}

/// Recognize a (trimmed) function definition line.
pub fn match_signature(line: &str) -> Option<Signature<'_>> {
    let caps = RE_SIGNATURE.captures(line)?;
    Some(Signature {
        context: caps.get(1).map(|m| m.as_str()),
        separator: caps.get(2).map(|m| m.as_str()),
        name: caps.get(3).map(|m| m.as_str()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_fixed() {
        assert_eq!(
            TAG_PRIORITY,
            [
                Tag::Class,
                Tag::Meta,
                Tag::Name,
                Tag::Param,
                Tag::Return,
                Tag::Example
            ]
        );
    }

    #[test]
    fn payload_strips_one_space() {
        assert_eq!(comment_payload("--- Adds two numbers."), Some("Adds two numbers."));
        assert_eq!(comment_payload("---@meta x"), Some("@meta x"));
        assert_eq!(comment_payload("---     local x = 1"), Some("    local x = 1"));
        assert_eq!(comment_payload("---"), Some(""));
        assert_eq!(comment_payload("-- plain comment"), None);
    }

    #[test]
    fn comment_start() {
        assert!(is_comment_start("--- hello"));
        assert!(is_comment_start("---@meta m"));
        assert!(!is_comment_start("-- hello"));
        assert!(!is_comment_start("local x = 1"));
    }

    #[test]
    fn param_with_description() {
        assert_eq!(
            match_tag("@param a number - first operand"),
            Some(TagMatch::Param {
                name: "a",
                ty: "number",
                description: "first operand"
            })
        );
    }

    #[test]
    fn param_optional_and_union_type() {
        assert_eq!(
            match_tag("@param opts? table|nil - options - may be nil"),
            Some(TagMatch::Param {
                name: "opts?",
                ty: "table|nil",
                description: "options - may be nil"
            })
        );
    }

    #[test]
    fn param_without_description() {
        assert_eq!(
            match_tag("@param ... any"),
            Some(TagMatch::Param {
                name: "...",
                ty: "any",
                description: ""
            })
        );
    }

    #[test]
    fn return_splits_types() {
        assert_eq!(
            match_tag("@return string, nil , string - value or error"),
            Some(TagMatch::Return {
                types: vec!["string", "nil"],
                description: "value or error"
            })
        );
    }

    #[test]
    fn example_with_and_without_inline_text() {
        assert_eq!(match_tag("@example"), Some(TagMatch::Example(None)));
        assert_eq!(
            match_tag("@example local x = f()"),
            Some(TagMatch::Example(Some("local x = f()")))
        );
        assert_eq!(match_tag("@examples"), None);
    }

    #[test]
    fn class_wins_over_later_tags() {
        assert_eq!(match_tag("@class Vector"), Some(TagMatch::Class("Vector")));
        assert_eq!(match_tag("@name vector.new"), Some(TagMatch::Name("vector.new")));
    }

    #[test]
    fn plain_text_is_not_a_tag() {
        assert_eq!(match_tag("Adds two numbers."), None);
        assert_eq!(match_tag(""), None);
    }

    #[test]
    fn meta_line() {
        assert_eq!(match_meta_line("---@meta mymod"), Some("mymod"));
        assert_eq!(match_meta_line("  --- @meta  mymod  "), Some("mymod"));
        assert_eq!(match_meta_line("---@meta"), Some(""));
        assert_eq!(match_meta_line("--- mymod"), None);
    }

    #[test]
    fn signature_qualified_dot() {
        let sig = match_signature("function mymod.add(a, b) end").unwrap();
        assert_eq!(sig.context, Some("mymod"));
        assert_eq!(sig.separator, Some("."));
        assert_eq!(sig.name, Some("add"));
    }

    #[test]
    fn signature_method_colon() {
        let sig = match_signature("function Vector:len() end").unwrap();
        assert_eq!(sig.context, Some("Vector"));
        assert_eq!(sig.separator, Some(":"));
        assert_eq!(sig.name, Some("len"));
    }

    #[test]
    fn signature_bare_keeps_whole_name() {
        let sig = match_signature("function add(a, b) end").unwrap();
        assert_eq!(sig.context, None);
        assert_eq!(sig.separator, None);
        assert_eq!(sig.name, Some("add"));
    }

    #[test]
    fn signature_nested_context() {
        let sig = match_signature("function a.b.c(x) end").unwrap();
        assert_eq!(sig.context, Some("a.b"));
        assert_eq!(sig.name, Some("c"));
    }

    #[test]
    fn signature_local() {
        let sig = match_signature("local function helper() end").unwrap();
        assert_eq!(sig.name, Some("helper"));
    }

    #[test]
    fn signature_requires_end_terminator() {
        assert!(match_signature("function mymod.add(a, b)").is_none());
        assert!(match_signature("function mymod.add(a, b) return a + b end").is_none());
        assert!(match_signature("mymod.add = function(a, b) end").is_none());
    }
}
