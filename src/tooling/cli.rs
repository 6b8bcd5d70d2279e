//! CLI Tooling
//!
//! Command-line interface for metapush: load a template and content sources,
//! merge them, optionally check the result against a data directory, and write
//! the merged document.

use crate::config::{ConfigLoader, MetapushConfig};
use crate::content::{load_content_sources, load_template};
use crate::error::MetapushError;
use crate::logging::LogOverrides;
use crate::merge::{merge, MergeOptions};
use crate::output::{self, WriteOptions};
use crate::tooling::report::{DataCheck, RunReport};
use crate::validate::validate_against_data;
use clap::{Args, Parser};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Metapush - push field and table descriptions into metadata templates
#[derive(Parser, Debug)]
#[command(name = "metapush", version)]
#[command(about = "Push content into metadata files efficiently")]
pub struct Cli {
    #[command(flatten)]
    pub merge: MergeArgs,

    /// Configuration file path (merged over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Summary format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn log_overrides(&self) -> LogOverrides {
        LogOverrides {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            output: self.log_output.clone(),
            file: self.log_file.clone(),
        }
    }
}

/// Inputs and switches for a single merge run.
#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Metadata template (.json, .yaml, .toml)
    #[arg(long)]
    pub template: PathBuf,

    /// Content to push into the template (.csv, .json, .yaml, .toml); later sources win
    #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
    pub content: Vec<PathBuf>,

    /// Output file
    #[arg(long)]
    pub output: PathBuf,

    /// Overwrite output if it exists
    #[arg(long)]
    pub overwrite: bool,

    /// Only process these tables
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub tables: Option<Vec<String>>,

    /// Data directory to check table and field names against
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Drop template attributes so only content attributes remain
    #[arg(long)]
    pub no_template_attributes: bool,
}

impl MergeArgs {
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            tables_filter: self
                .tables
                .as_ref()
                .map(|names| names.iter().map(|n| n.trim().to_string()).collect()),
            drop_template_attributes: self.no_template_attributes,
        }
    }
}

/// Runs merges with a loaded configuration.
pub struct CliContext {
    config: MetapushConfig,
    config_path: Option<PathBuf>,
}

impl CliContext {
    /// Create a new CLI context, loading layered configuration.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, MetapushError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self::with_config(config, config_path))
    }

    pub fn with_config(config: MetapushConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    pub fn config(&self) -> &MetapushConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    /// Execute one merge run: load, merge, optionally validate, write.
    ///
    /// Fatal errors (unreadable input, existing output) are returned as `Err`.
    /// Mismatches and a failed data check are recorded in the report; the
    /// output is still written.
    pub fn execute(&self, args: &MergeArgs) -> Result<RunReport, MetapushError> {
        let started = Instant::now();
        // Fail fast before reading anything.
        output::check_output(&args.output, args.overwrite)?;

        let template = load_template(&args.template)?;
        let content = load_content_sources(&args.content, &self.config.merge.scalar_attribute)?;
        let options = args.merge_options();

        let outcome = merge(&template, &content, &options);
        let mut mismatches = outcome.mismatches;

        let data_check = match &args.data {
            None => DataCheck::Skipped,
            Some(data_path) => match validate_against_data(&outcome.document, data_path, &options)
            {
                Ok(found) => {
                    mismatches.extend(found);
                    DataCheck::Checked {
                        path: data_path.clone(),
                    }
                }
                Err(e) => {
                    error!("{}", e);
                    DataCheck::Failed {
                        path: data_path.clone(),
                        reason: e.to_string(),
                    }
                }
            },
        };

        let write_options = WriteOptions {
            overwrite: args.overwrite,
            default_format: self.config.output.default_format,
            pretty: self.config.output.pretty,
        };
        output::write(&outcome.document, &args.output, &write_options)?;

        let report = RunReport {
            template: args.template.clone(),
            output: args.output.clone(),
            content_sources: args.content.len(),
            content_entries: content.len(),
            tables: outcome.document.tables.len(),
            fields: outcome.document.tables.iter().map(|t| t.fields.len()).sum(),
            fields_updated: outcome.fields_updated,
            mismatches,
            data_check,
        };
        info!(
            fields_updated = report.fields_updated,
            mismatches = report.mismatches.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Merge run complete"
        );
        Ok(report)
    }
}
