//! adoc2json CLI - Command-line interface library
//!
//! Loads an AsciiDoc file, serializes its document graph and prints the
//! result as JSON.
//!
//! # Library Usage
//!
//! ```no_run
//! use std::path::Path;
//! use adoc2json_cli::{convert_file, Settings};
//!
//! let tree = convert_file(Path::new("guide.adoc"), &Settings::default())?;
//! println!("{}", tree["blocks"]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Pretty-printed envelope
//! adoc2json guide.adoc
//!
//! # Analyzed DocBook trees, single-line output
//! adoc2json guide.adoc --analyze --compact
//!
//! # Override attributes and read settings from a file
//! adoc2json guide.adoc -a lang=de -c adoc2json.toml
//! ```

pub mod app;
pub mod settings;

// Re-export main entry point and types
pub use app::{convert_file, run_cli};
pub use settings::{OutputSettings, RenderSettings, Settings};
