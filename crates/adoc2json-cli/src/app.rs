//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use adoc2json_core::{
    load_file, DocBookRenderer, LoadOptions, RenderOptions, SerializeOptions, SourceNode,
    TreeSerializer,
};

use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "adoc2json")]
#[command(author, version, about = "AsciiDoc documents as JSON", long_about = None)]
struct Cli {
    /// Input AsciiDoc file
    input: PathBuf,

    /// Add the rendered DocBook of each node as a generic XML tree
    #[arg(long, conflicts_with = "body_only")]
    analyze: bool,

    /// Expand nested nodes instead of writing `$ref` markers
    #[arg(long)]
    deep: bool,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,

    /// Render the document without the `<article>` wrapper
    #[arg(long)]
    body_only: bool,

    /// Document attribute (KEY=VALUE, KEY, or KEY! to unset)
    #[arg(short, long = "attribute", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    attributes: Vec<(String, String)>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Layer command-line flags over the file settings
    fn settings(&self) -> Result<Settings> {
        let mut settings = match self.config {
            Some(ref path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if self.analyze {
            settings.output.analyze = true;
        }
        if self.deep {
            settings.output.deep = true;
        }
        if self.compact {
            settings.output.pretty = false;
        }
        if self.body_only {
            settings.render.standalone = false;
        }
        settings.attributes.extend(self.attributes.iter().cloned());

        settings.validate()?;
        Ok(settings)
    }
}

/// Parse `KEY=VALUE`; a bare `KEY` sets an empty value
fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
    let key = key.trim();
    if key.is_empty() || key == "!" {
        return Err(format!("invalid attribute `{}`: missing name", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Install the stderr log subscriber
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI application
///
/// Parses arguments, converts the input file and prints the JSON to
/// stdout. Nothing is printed unless the whole conversion succeeds.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let settings = cli.settings()?;
    let tree = convert_file(&cli.input, &settings)?;

    let json = if settings.output.pretty {
        serde_json::to_string_pretty(&tree)
    } else {
        serde_json::to_string(&tree)
    }
    .context("Failed to encode JSON output")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write output")?;
    Ok(())
}

/// Load an AsciiDoc file and serialize it into a JSON envelope
pub fn convert_file(input: &Path, settings: &Settings) -> Result<Value> {
    info!(input = %input.display(), "converting");

    let mut options = LoadOptions::default();
    options.attributes.extend(settings.attributes.clone());

    let doc = load_file(input, &options)
        .with_context(|| format!("Failed to load AsciiDoc file: {}", input.display()))?;
    info!(blocks = doc.len(), "loaded document");

    let renderer = DocBookRenderer::with_options(RenderOptions {
        standalone: settings.render.standalone,
    });
    let serializer = TreeSerializer::with_renderer(renderer).with_options(SerializeOptions {
        analyze: settings.output.analyze,
        deep: settings.output.deep,
    });

    let envelope = serializer
        .serialize_document_root(&SourceNode::Document(&doc))
        .with_context(|| format!("Failed to serialize document: {}", input.display()))?;
    info!(keys = envelope.len(), "serialized document");

    Ok(Value::Object(envelope))
}
