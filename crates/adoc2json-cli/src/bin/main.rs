//! adoc2json CLI binary entry point
//!
//! This is a thin wrapper that calls the library's `run_cli()` function.

use adoc2json_cli::run_cli;
use anyhow::Result;

fn main() -> Result<()> {
    run_cli()
}
