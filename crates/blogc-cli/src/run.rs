/// Orchestration for the single `blogc` compile pass: read sources, parse
/// them, build the global config, paginate, parse and render the template,
/// and write the output. Grounded on `bcp-cli/src/cmd_decode.rs`'s
/// read-parse-render-write shape.
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use anyhow::{Result, bail};
use blogc_source::TocOptions;
use blogc_utils::{SourceEntry, SourceList};

use crate::cli::Cli;
use crate::error::LoaderError;
use crate::pagination;

/// Depth limit passed to the supplemented table-of-contents renderer.
/// Header levels only ever go to 6, so this keeps every level.
const TOC_MAX_DEPTH: u8 = 6;

/// Usage-error exit code.
pub const EXIT_USAGE: i32 = 2;
/// Runtime-failure exit code.
pub const EXIT_RUNTIME: i32 = 1;

/// A command that failed to even begin — a usage problem rather than a
/// runtime one, distinguished so `main` can choose the right exit code.
#[derive(Debug)]
pub struct UsageError(pub String);

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for UsageError {}

/// Run one compile pass per `cli`'s flags. Returns the process exit code to
/// use; errors are already printed to stderr by the time this returns.
pub fn run(cli: &Cli) -> i32 {
    match run_inner(cli) {
        Ok(()) => 0,
        Err(e) => {
            if e.downcast_ref::<UsageError>().is_some() {
                eprintln!("error: {e}");
                EXIT_USAGE
            } else {
                eprintln!("error: {e:#}");
                EXIT_RUNTIME
            }
        }
    }
}

fn run_inner(cli: &Cli) -> Result<()> {
    let mut global = SourceEntry::new();
    for define in &cli.define {
        global.insert(&define.key, define.value.clone());
    }

    let mut sources = SourceList::new();
    for path in &cli.sources {
        sources.push(parse_source_file(path)?);
    }
    log::info!("parsed {} source file(s)", sources.len());

    let paged = pagination::paginate(&sources, &mut global)
        .ok_or_else(|| UsageError("FILTER_PAGE is out of range for the given source list".to_string()))?;
    pagination::set_first_last_globals(paged.page, &mut global);

    if let Some(key) = &cli.print_var {
        return print_var(key, &global);
    }

    let Some(template_path) = &cli.template else {
        bail!(UsageError("a template file is required (-t FILE)".to_string()));
    };
    let Some(output) = &cli.output else {
        bail!(UsageError("an output destination is required (-o FILE|-)".to_string()));
    };

    let template_src =
        fs::read_to_string(template_path).map_err(|source| LoaderError::ReadTemplate {
            path: template_path.clone(),
            source,
        })?;
    let program = blogc_template::parse(&template_src).map_err(|source| LoaderError::ParseTemplate {
        path: template_path.clone(),
        source,
    })?;

    let rendered = blogc_render::render(&program, paged.page, &global, cli.listing);
    write_output(output, &rendered)
}

fn parse_source_file(path: &Path) -> Result<SourceEntry> {
    let content = fs::read_to_string(path).map_err(|source| LoaderError::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path.to_string_lossy();
    let entry =
        blogc_source::parse(&content, &filename, Some(TocOptions { max_depth: TOC_MAX_DEPTH }))
            .map_err(|source| LoaderError::ParseSource {
                path: path.to_path_buf(),
                source,
            })?;
    Ok(entry)
}

fn print_var(key: &str, global: &SourceEntry) -> Result<()> {
    match global.get(key) {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => bail!(UsageError(format!("variable {key:?} is not set"))),
    }
}

fn write_output(destination: &str, rendered: &str) -> Result<()> {
    if destination == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .map_err(|source| LoaderError::WriteOutput {
                path: destination.to_string(),
                source,
            })?;
    } else {
        fs::write(destination, rendered).map_err(|source| LoaderError::WriteOutput {
            path: destination.to_string(),
            source,
        })?;
    }
    Ok(())
}
