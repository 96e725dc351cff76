//! Parser module — turns the text of one `---@meta` file into a [`ModuleDoc`].
//!
//! - [`patterns`]: the recognizer table
//! - [`classify`]: per-line classification
//! - [`block`]: the doc-block state machine

mod block;
pub mod classify;
pub mod patterns;

use crate::model::ModuleDoc;
use block::{Output, State};
use log::Level;
use std::fmt;

/// Failure to read the module header. The file can't be documented at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("first line is not a `---@meta <module>` header")]
    MissingMeta,
    #[error("`---@meta` header does not name a module")]
    EmptyModuleName,
}

/// Something worth reporting that did not stop the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based source line the diagnostic refers to
    pub line: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Block closed by a line that isn't a function signature
    MissingSignature { block_start: usize },
    /// Signature matched but no function name could be extracted
    UnnamedSignature { block_start: usize },
    /// Input ended while a block was still open
    UnterminatedBlock { block_start: usize },
    /// A function of the same name was already documented and got replaced
    DuplicateFunction { name: String },
    /// `@name` disagrees with the signature
    DeclaredNameMismatch { declared: String, actual: String },
}

impl DiagnosticKind {
    /// Severity used when the diagnostic is forwarded to the logger.
    pub fn level(&self) -> Level {
        match self {
            DiagnosticKind::UnnamedSignature { .. } => Level::Error,
            DiagnosticKind::MissingSignature { .. } | DiagnosticKind::UnterminatedBlock { .. } => {
                Level::Warn
            }
            DiagnosticKind::DuplicateFunction { .. } => Level::Info,
            DiagnosticKind::DeclaredNameMismatch { .. } => Level::Debug,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match self.kind {
            DiagnosticKind::MissingSignature { block_start } => write!(
                f,
                "doc block starting at line {} is not followed by a function definition; discarded",
                block_start
            ),
            DiagnosticKind::UnnamedSignature { block_start } => write!(
                f,
                "failed to extract function name for doc block starting at line {}; discarded",
                block_start
            ),
            DiagnosticKind::UnterminatedBlock { block_start } => write!(
                f,
                "doc block starting at line {} runs to end of file; discarded",
                block_start
            ),
            DiagnosticKind::DuplicateFunction { ref name } => {
                write!(f, "function `{}` documented again; earlier entry replaced", name)
            }
            DiagnosticKind::DeclaredNameMismatch {
                ref declared,
                ref actual,
            } => write!(
                f,
                "@name `{}` differs from definition `{}`; using the definition",
                declared, actual
            ),
        }
    }
}

/// Parse a documentation file, forwarding diagnostics to the logger.
pub fn parse(content: &str) -> Result<ModuleDoc, ParseError> {
    let (doc, diagnostics) = parse_with_diagnostics(content)?;
    for diagnostic in &diagnostics {
        log::log!(
            diagnostic.kind.level(),
            "{}: {}",
            doc.module_name,
            diagnostic
        );
    }
    Ok(doc)
}

/// Parse a documentation file and hand back the diagnostics instead of logging them.
///
/// The first non-blank line must be the `---@meta <module>` header; it is
/// consumed before the block scan starts.
pub fn parse_with_diagnostics(content: &str) -> Result<(ModuleDoc, Vec<Diagnostic>), ParseError> {
    let lines: Vec<&str> = content.lines().collect();

    let header = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .ok_or(ParseError::MissingMeta)?;
    let module_name = patterns::match_meta_line(lines[header]).ok_or(ParseError::MissingMeta)?;
    if module_name.is_empty() {
        return Err(ParseError::EmptyModuleName);
    }

    let mut out = Output::new(module_name);
    let mut state = State::default();
    for (idx, line) in lines.iter().enumerate().skip(header + 1) {
        state = state.step(idx + 1, line, &mut out);
    }
    state.finish(lines.len(), &mut out);

    Ok((out.doc, out.diagnostics))
}
