//! `blogc` — the command-line driver for the compilation core: reads
//! source files and a template, resolves `-D` overrides and pagination,
//! renders, and writes the result. Everything below this binary (parsing,
//! rendering) is pure; all I/O and process exit-code policy lives in this
//! crate's `run` module.
use std::process;

use clap::Parser;

use blogc_cli::{cli::Cli, run};

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let code = run::run(&cli);
    process::exit(code);
}
