//! Driver — file discovery and the per-file parse, render, write pipeline.
//!
//! Files are independent, so [`run`] processes them in parallel. A failure in
//! one file never stops the others; every outcome lands in the [`Summary`].

use crate::parser::{self, patterns::META_MARKER, ParseError};
use crate::render;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Extension of the source files the driver picks up.
pub const SOURCE_EXTENSION: &str = "lua";

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("source path does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("invalid search pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },
    #[error(
        "module name `{module_name}` in {} is not a plain file name",
        path.display()
    )]
    InvalidModuleName { path: PathBuf, module_name: String },
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the recursive walk, or a single source file
    pub source: PathBuf,
    /// Directory the `<module>.md` files are written to
    pub destination: PathBuf,
}

/// What happened to one eligible-or-not source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written { module_name: String, output: PathBuf },
    /// Not a documentation file (no leading `---@meta`)
    Skipped,
}

/// Aggregated results of a [`run`].
#[derive(Debug, Default)]
pub struct Summary {
    pub discovered: usize,
    /// (source, output) pairs
    pub written: Vec<(PathBuf, PathBuf)>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, DriverError)>,
}

/// How a run went, for the user-facing report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Complete { succeeded: usize },
    Partial { succeeded: usize, failed: usize },
    NothingGenerated { failed: usize },
    NothingFound,
}

impl Summary {
    pub fn verdict(&self) -> Verdict {
        let succeeded = self.written.len();
        let failed = self.failures.len();
        match (succeeded, failed) {
            (0, 0) => Verdict::NothingFound,
            (0, failed) => Verdict::NothingGenerated { failed },
            (succeeded, 0) => Verdict::Complete { succeeded },
            (succeeded, failed) => Verdict::Partial { succeeded, failed },
        }
    }
}

/// Drop a leading UTF-8 byte order mark, if any.
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Does this content look like a documentation file?
pub fn is_doc_file(content: &str) -> bool {
    strip_bom(content).trim().starts_with(META_MARKER)
}

/// The module name becomes `<name>.md` inside the destination, so it must be
/// a single normal path component.
fn is_safe_module_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn has_source_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}

/// Find all `.lua` files below `source`, recursively, in sorted order.
/// A single file is accepted as-is when it has the right extension.
pub fn discover(source: &Path) -> Result<Vec<PathBuf>, DriverError> {
    if source.is_file() {
        if has_source_extension(source) {
            return Ok(vec![source.to_path_buf()]);
        }
        log::warn!(
            "{} is not a .{} file; nothing to do",
            source.display(),
            SOURCE_EXTENSION
        );
        return Ok(Vec::new());
    }
    if !source.is_dir() {
        return Err(DriverError::SourceNotFound(source.to_path_buf()));
    }

    let pattern = format!(
        "{}/**/*.{}",
        glob::Pattern::escape(&source.to_string_lossy()),
        SOURCE_EXTENSION
    );
    let entries = glob::glob(&pattern).map_err(|source| DriverError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("skipping {}: {}", e.path().display(), e.error()),
        }
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Read, parse, render and write one file.
pub fn process_file(path: &Path, destination: &Path) -> Result<FileOutcome, DriverError> {
    let content = fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = strip_bom(&content);

    if !is_doc_file(content) {
        log::debug!("skipping {}: no {} header", path.display(), META_MARKER);
        return Ok(FileOutcome::Skipped);
    }

    let doc = parser::parse(content).map_err(|source| DriverError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !is_safe_module_name(&doc.module_name) {
        return Err(DriverError::InvalidModuleName {
            path: path.to_path_buf(),
            module_name: doc.module_name,
        });
    }
    let markdown = render::render(&doc);

    // Idempotent, so concurrent tasks may all call it
    fs::create_dir_all(destination).map_err(|source| DriverError::CreateDir {
        path: destination.to_path_buf(),
        source,
    })?;

    let output = destination.join(format!("{}.md", doc.module_name));
    fs::write(&output, markdown).map_err(|source| DriverError::Write {
        path: output.clone(),
        source,
    })?;

    log::debug!(
        "{} -> {} ({} functions)",
        path.display(),
        output.display(),
        doc.functions.len()
    );
    Ok(FileOutcome::Written {
        module_name: doc.module_name,
        output,
    })
}

/// Discover and process every file under `config.source`.
///
/// Only discovery errors are returned as `Err`; per-file failures are
/// collected in [`Summary::failures`] once all files have settled.
pub fn run(config: &Config) -> Result<Summary, DriverError> {
    let files = discover(&config.source)?;
    log::debug!(
        "found {} .{} files under {}",
        files.len(),
        SOURCE_EXTENSION,
        config.source.display()
    );

    let results: Vec<(PathBuf, Result<FileOutcome, DriverError>)> = files
        .into_par_iter()
        .map(|path| {
            let result = process_file(&path, &config.destination);
            (path, result)
        })
        .collect();

    let mut summary = Summary {
        discovered: results.len(),
        ..Default::default()
    };
    let mut writers: HashMap<PathBuf, PathBuf> = HashMap::new();

    for (path, result) in results {
        match result {
            Ok(FileOutcome::Written { output, .. }) => {
                if let Some(previous) = writers.insert(output.clone(), path.clone()) {
                    log::warn!(
                        "{} and {} declare the same module; {} holds only one of them",
                        previous.display(),
                        path.display(),
                        output.display()
                    );
                }
                summary.written.push((path, output));
            }
            Ok(FileOutcome::Skipped) => summary.skipped.push(path),
            Err(e) => summary.failures.push((path, e)),
        }
    }

    Ok(summary)
}
