//! gludoc — generate Markdown API documentation from annotated Lua definition files.
//!
//! Two modes:
//!
//! - **directory mode**: `gludoc -s src -d docs/api` walks `src` for `.lua`
//!   files and writes one `<module>.md` per `---@meta` file
//! - **stdin mode**: `gludoc --stdin < mymod.lua` prints the Markdown to stdout

use anyhow::{Context, Result};
use clap::Parser;
use gludoc::driver::{self, Config, Verdict};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "gludoc",
    version,
    about = "Generate Markdown API documentation from annotated Lua definition files"
)]
struct Cli {
    /// Source directory root to process recursively (or a single .lua file)
    #[arg(short = 's', long, default_value = ".")]
    source: PathBuf,

    /// Directory for the output markdown (required unless --stdin)
    #[arg(short = 'd', long)]
    destination: Option<PathBuf>,

    /// Read one file from stdin and print its markdown to stdout
    #[arg(long)]
    stdin: bool,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if cli.stdin {
        stdin_mode()?;
        return Ok(ExitCode::SUCCESS);
    }

    file_mode(&cli)
}

fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// stdin mode: one file in, markdown on stdout.
fn stdin_mode() -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let input = driver::strip_bom(&input);
    if !driver::is_doc_file(input) {
        log::info!("input has no ---@meta header; nothing to document");
        return Ok(());
    }

    let doc = gludoc::parse(input).context("failed to parse stdin")?;
    print!("{}", gludoc::render(&doc));
    Ok(())
}

/// directory mode: walk, process every file, report the summary.
fn file_mode(cli: &Cli) -> Result<ExitCode> {
    let destination = cli
        .destination
        .clone()
        .context("--destination is required unless --stdin is given")?;
    let config = Config {
        source: cli.source.clone(),
        destination,
    };

    let summary = driver::run(&config).context("failed to collect source files")?;

    for (path, error) in &summary.failures {
        log::error!("Error processing {}: {}", path.display(), error);
    }

    match summary.verdict() {
        Verdict::NothingGenerated { .. } => log::warn!("No documentation generated."),
        Verdict::Partial { failed, .. } => {
            log::warn!("{} files failed to generate documentation.", failed)
        }
        Verdict::Complete { succeeded } => log::info!(
            "Documentation generation complete for {} files.",
            succeeded
        ),
        Verdict::NothingFound => log::info!("No files found to generate documentation."),
    }

    Ok(if summary.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
