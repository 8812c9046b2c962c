/// Command-line surface for `blogc`.
///
/// `blogc` has no subcommands — unlike a multi-verb tool, compiling one
/// source set against one template is the only thing this binary does, so
/// every flag lives on the single top-level `Cli` struct.
///
/// ```text
/// blogc [SOURCE...] -t TEMPLATE -o OUTPUT [-D KEY=VALUE]... [-l] [-p KEY]
/// ```
use std::path::PathBuf;

use clap::Parser;

/// A single `-D KEY=VALUE` override, parsed eagerly by clap so a malformed
/// flag is reported before any file I/O happens.
#[derive(Clone, Debug)]
pub struct Define {
    pub key: String,
    pub value: String,
}

pub fn parse_define(s: &str) -> Result<Define, String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_uppercase() || b == b'_') {
        return Err(format!("invalid -D key {key:?}, expected [A-Z_]+"));
    }
    Ok(Define {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// blogc — a static blog compiler.
///
/// Compiles a set of source files against a template, optionally iterating
/// them as a listing page, and writes the rendered result to an output
/// destination.
#[derive(Parser, Debug)]
#[command(name = "blogc", version, about = "A blazing fast static site generator engine (core)")]
pub struct Cli {
    /// Source files to compile, in the order they should be rendered.
    pub sources: Vec<PathBuf>,

    /// Template file.
    #[arg(short = 't', value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Output destination, or `-` for stdout.
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<String>,

    /// Define/override a global configuration variable; may be repeated.
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_define)]
    pub define: Vec<Define>,

    /// After parsing, print the value of KEY from the post-parse global
    /// config and exit, instead of rendering.
    #[arg(short = 'p', value_name = "KEY")]
    pub print_var: Option<String>,

    /// Listing mode: iterate the source list for `listing`/`listing_once`
    /// blocks instead of rendering a single `entry` block.
    #[arg(short = 'l')]
    pub listing: bool,
}
