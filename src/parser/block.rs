//! Block parser — the doc-block state machine.
//!
//! A fresh [`State`] is created per file and threaded through [`State::step`]
//! one line at a time. Nothing survives between files.

use super::classify::{classify, Content, LineKind, Phase};
use super::patterns::{Signature, TagMatch};
use super::{Diagnostic, DiagnosticKind};
use crate::model::*;

/// Everything the state machine produces for one file.
#[derive(Debug)]
pub(super) struct Output {
    pub doc: ModuleDoc,
    pub diagnostics: Vec<Diagnostic>,
}

impl Output {
    pub fn new(module_name: &str) -> Self {
        Self {
            doc: ModuleDoc::new(module_name),
            diagnostics: Vec::new(),
        }
    }

    fn diagnose(&mut self, line: usize, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic { line, kind });
    }
}

#[derive(Debug, Default)]
pub(super) enum State {
    #[default]
    Scanning,
    InComment(Pending),
}

/// A doc block that is still open.
#[derive(Debug)]
pub(super) struct Pending {
    func: FunctionDoc,
    start_line: usize,
    /// Multiline tag currently accumulating, if any
    multiline: Option<Multiline>,
}

/// Fields that keep collecting lines after their tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Multiline {
    Example,
}

impl State {
    pub fn phase(&self) -> Phase {
        match self {
            State::Scanning => Phase::Scanning,
            State::InComment(Pending {
                multiline: Some(_), ..
            }) => Phase::InMultiline,
            State::InComment(_) => Phase::InComment,
        }
    }

    /// Feed one source line (1-based `line_no`) and return the next state.
    pub fn step(self, line_no: usize, line: &str, out: &mut Output) -> State {
        let kind = classify(self.phase(), line);
        match (self, kind) {
            (State::Scanning, LineKind::BlockStart(content)) => {
                let mut pending = Pending::new(line_no);
                pending.absorb(content);
                State::InComment(pending)
            }
            (State::InComment(mut pending), LineKind::CommentContent(content)) => {
                pending.absorb(content);
                State::InComment(pending)
            }
            (State::InComment(pending), LineKind::BlockEnd(signature)) => {
                pending.close(line_no, signature, out);
                State::Scanning
            }
            (state, _) => state,
        }
    }

    /// End of input. An open block has no signature left to find.
    pub fn finish(self, last_line: usize, out: &mut Output) {
        if let State::InComment(pending) = self {
            out.diagnose(
                last_line,
                DiagnosticKind::UnterminatedBlock {
                    block_start: pending.start_line,
                },
            );
        }
    }
}

impl Pending {
    fn new(start_line: usize) -> Self {
        Self {
            func: FunctionDoc::default(),
            start_line,
            multiline: None,
        }
    }

    /// Apply one comment line to the function being documented.
    fn absorb(&mut self, content: Content<'_>) {
        let func = &mut self.func;
        match content {
            Content::Tag(TagMatch::Class(name)) => func.class_name = Some(name.to_string()),
            Content::Tag(TagMatch::Meta(name)) => {
                if !name.is_empty() {
                    func.meta_tag = Some(name.to_string());
                }
            }
            Content::Tag(TagMatch::Name(name)) => func.declared_name = Some(name.to_string()),
            Content::Tag(TagMatch::Param {
                name,
                ty,
                description,
            }) => func.parameters.push(Param {
                name: name.to_string(),
                ty: ty.to_string(),
                description: description.to_string(),
            }),
            Content::Tag(TagMatch::Return { types, description }) => {
                func.returns = vec![ReturnDoc {
                    types: types.into_iter().map(String::from).collect(),
                    description: description.to_string(),
                }];
            }
            Content::Tag(TagMatch::Example(first)) => {
                // Successive examples in one block are kept apart by a blank line
                if !func.examples.is_empty() {
                    func.examples.push(String::new());
                }
                if let Some(text) = first {
                    func.examples.push(text.to_string());
                }
                self.multiline = Some(Multiline::Example);
            }
            Content::Text(text) => {
                let field = match self.multiline {
                    Some(Multiline::Example) => &mut self.func.examples,
                    None => &mut self.func.description,
                };
                field.push(text.to_string());
            }
        }
    }

    /// Finalize against the line that closed the block, or discard.
    fn close(self, line_no: usize, signature: Option<Signature<'_>>, out: &mut Output) {
        let block_start = self.start_line;
        let Some(signature) = signature else {
            out.diagnose(line_no, DiagnosticKind::MissingSignature { block_start });
            return;
        };
        let Some(name) = signature.name else {
            out.diagnose(line_no, DiagnosticKind::UnnamedSignature { block_start });
            return;
        };

        let mut func = self.func;
        func.name = name.to_string();
        func.separator = Separator::from_capture(signature.separator);
        func.context_name = signature.context.map(String::from);

        if let Some(ref declared) = func.declared_name {
            let qualified = func.qualified_name();
            if *declared != func.name && *declared != qualified {
                out.diagnose(
                    line_no,
                    DiagnosticKind::DeclaredNameMismatch {
                        declared: declared.clone(),
                        actual: qualified,
                    },
                );
            }
        }

        if out.doc.insert(func).is_some() {
            out.diagnose(
                line_no,
                DiagnosticKind::DuplicateFunction {
                    name: name.to_string(),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> Output {
        let mut out = Output::new("m");
        let mut state = State::default();
        for (i, line) in lines.iter().enumerate() {
            state = state.step(i + 1, line, &mut out);
        }
        state.finish(lines.len(), &mut out);
        out
    }

    #[test]
    fn phases_follow_block() {
        let mut out = Output::new("m");
        let state = State::default();
        assert_eq!(state.phase(), Phase::Scanning);
        let state = state.step(1, "--- doc", &mut out);
        assert_eq!(state.phase(), Phase::InComment);
        let state = state.step(2, "--- @example", &mut out);
        assert_eq!(state.phase(), Phase::InMultiline);
        let state = state.step(3, "function f() end", &mut out);
        assert_eq!(state.phase(), Phase::Scanning);
        assert!(out.doc.functions.contains_key("f"));
    }

    #[test]
    fn first_line_content_is_kept() {
        let out = run(&["--- First line.", "--- Second line.", "function f() end"]);
        assert_eq!(
            out.doc.functions["f"].description,
            vec!["First line.", "Second line."]
        );
    }

    #[test]
    fn bare_comment_is_description_placeholder() {
        let out = run(&["--- a", "---", "--- b", "function f() end"]);
        assert_eq!(out.doc.functions["f"].description, vec!["a", "", "b"]);
    }

    #[test]
    fn blank_line_outside_multiline_adds_nothing() {
        let out = run(&["--- a", "", "--- b", "", "function f() end"]);
        assert_eq!(out.doc.functions["f"].description, vec!["a", "b"]);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn example_blank_then_text() {
        let out = run(&["--- @example", "", "--- text", "function f() end"]);
        assert_eq!(out.doc.functions["f"].examples, vec!["", "text"]);
        assert!(out.doc.functions["f"].description.is_empty());
    }

    #[test]
    fn example_inline_then_blank_comment() {
        let out = run(&["--- @example firstlinecontent", "---", "function f() end"]);
        assert_eq!(out.doc.functions["f"].examples, vec!["firstlinecontent", ""]);
    }

    #[test]
    fn example_keeps_trailing_spaces() {
        let out = run(&[
            "--- @example",
            "--- line one  ",
            "--- line two",
            "function f() end",
        ]);
        assert_eq!(out.doc.functions["f"].examples, vec!["line one  ", "line two"]);
    }

    #[test]
    fn second_example_is_separated() {
        let out = run(&[
            "--- @example f(1)",
            "--- @example f(2)",
            "function f() end",
        ]);
        assert_eq!(out.doc.functions["f"].examples, vec!["f(1)", "", "f(2)"]);
    }

    #[test]
    fn tags_still_win_inside_multiline() {
        let out = run(&[
            "--- @example",
            "--- f(1)",
            "--- @param x number - value",
            "--- more example",
            "function f(x) end",
        ]);
        let func = &out.doc.functions["f"];
        assert_eq!(func.examples, vec!["f(1)", "more example"]);
        assert_eq!(func.parameters.len(), 1);
    }

    #[test]
    fn later_return_replaces_earlier() {
        let out = run(&[
            "--- @return number - first",
            "--- @return string, nil - second",
            "function f() end",
        ]);
        let returns = &out.doc.functions["f"].returns;
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].types, vec!["string", "nil"]);
        assert_eq!(returns[0].description, "second");
    }

    #[test]
    fn class_meta_and_name_tags() {
        let out = run(&[
            "---@class Vector",
            "---@meta vector",
            "---@name Vector.new",
            "function Vector.new() end",
        ]);
        let func = &out.doc.functions["new"];
        assert_eq!(func.class_name.as_deref(), Some("Vector"));
        assert_eq!(func.meta_tag.as_deref(), Some("vector"));
        assert_eq!(func.declared_name.as_deref(), Some("Vector.new"));
        assert!(func.description.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn declared_name_mismatch_is_reported() {
        let out = run(&["---@name other", "function M.f() end"]);
        assert!(out.doc.functions.contains_key("f"));
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::DeclaredNameMismatch {
                declared: "other".to_string(),
                actual: "M.f".to_string()
            }
        );
    }

    #[test]
    fn block_without_signature_is_discarded() {
        let out = run(&[
            "--- Orphan docs.",
            "--- @param x number - value",
            "local x = 1",
            "function later() end",
        ]);
        assert!(out.doc.functions.is_empty());
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].line, 3);
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::MissingSignature { block_start: 1 }
        );
    }

    #[test]
    fn unnamed_signature_is_discarded() {
        let out = run(&["--- Anonymous.", "function (x) end"]);
        assert!(out.doc.functions.is_empty());
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::UnnamedSignature { block_start: 1 }
        );
    }

    #[test]
    fn discarded_block_does_not_leak_into_next() {
        let out = run(&[
            "--- Orphan.",
            "local x = 1",
            "--- Real.",
            "function f() end",
        ]);
        assert_eq!(out.doc.functions["f"].description, vec!["Real."]);
    }

    #[test]
    fn unterminated_block_is_reported() {
        let out = run(&["--- Dangling.", "--- @example", "--- x()"]);
        assert!(out.doc.functions.is_empty());
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::UnterminatedBlock { block_start: 1 }
        );
    }

    #[test]
    fn duplicate_name_last_write_wins() {
        let out = run(&[
            "--- First.",
            "function a.f() end",
            "--- Second.",
            "function b:f() end",
        ]);
        let func = &out.doc.functions["f"];
        assert_eq!(func.description, vec!["Second."]);
        assert_eq!(func.context_name.as_deref(), Some("b"));
        assert_eq!(func.separator, Separator::Colon);
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::DuplicateFunction {
                name: "f".to_string()
            }
        );
    }

    #[test]
    fn bare_function_has_empty_separator() {
        let out = run(&["--- Doc.", "function f() end"]);
        let func = &out.doc.functions["f"];
        assert_eq!(func.separator, Separator::Bare);
        assert_eq!(func.context_name, None);
    }
}
