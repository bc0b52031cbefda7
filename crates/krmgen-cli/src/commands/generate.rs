//! Generate command - turn manifests into a Rust module

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use krmgen_core::GenerateConfig;

use crate::discover;
use crate::display;
use crate::error::{CliError, Result};
use crate::helm::{self, TemplateOptions};

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "krmgen.yaml";

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Manifest directory, manifest file or Helm chart
    pub input: PathBuf,

    /// Directory receiving the generated module
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: ./krmgen.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Namespace forced onto generated resources
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Kinds decoded into typed schemas (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub typed_kinds: Vec<String>,

    /// Skip typed documents carrying fields unknown to their schema
    #[arg(long)]
    pub strict: bool,

    /// Build the module without writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat INPUT as a Helm chart (implied when it holds a Chart.yaml)
    #[arg(long)]
    pub chart: bool,

    /// Values file(s) for the chart
    #[arg(short = 'f', long = "values")]
    pub values: Vec<PathBuf>,

    /// Release name for the chart
    #[arg(long, default_value = "krmgen")]
    pub release: String,
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    let config = resolve_config(args, Path::new(DEFAULT_CONFIG_FILE))?;

    let rendered = if args.chart || helm::is_chart(&args.input) {
        let options = TemplateOptions {
            release: &args.release,
            namespace: config.namespace.as_deref(),
            values: &args.values,
        };
        Some(helm::template(&args.input, &options)?)
    } else {
        None
    };
    let root = rendered.as_ref().map_or(args.input.as_path(), |dir| dir.path());

    let files = discover::manifest_files(root)?;
    if files.is_empty() {
        return Err(CliError::input_with_help(
            format!("no manifests found under {}", args.input.display()),
            "krmgen reads *.yaml and *.yml files",
        ));
    }
    if !args.json {
        println!(
            "{} Generating from {} manifest file(s)",
            style("→").blue(),
            files.len()
        );
    }

    let output = krmgen_codegen::run(&files, &config)?;

    if args.json {
        display::print_json(&output.summary)?;
    } else {
        display::print_summary(&output.summary);
    }
    Ok(())
}

/// Config file values with command line flags applied on top
fn resolve_config(args: &GenerateArgs, default_file: &Path) -> Result<GenerateConfig> {
    let mut config = match &args.config {
        Some(path) => GenerateConfig::from_file(path)?,
        None if default_file.is_file() => {
            tracing::debug!(path = %default_file.display(), "Using config file");
            GenerateConfig::from_file(default_file)?
        }
        None => GenerateConfig::default(),
    };

    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(namespace) = &args.namespace {
        config.namespace = Some(namespace.clone());
    }
    if !args.typed_kinds.is_empty() {
        config.typed_kinds = args.typed_kinds.clone();
    }
    config.strict |= args.strict;
    config.dry_run |= args.dry_run;

    config.validate()?;
    Ok(config)
}
