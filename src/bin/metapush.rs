//! Metapush CLI Binary
//!
//! Read args, load template and content, merge, (over)write output.

use anyhow::Context;
use clap::Parser;
use metapush::logging::init_logging;
use metapush::tooling::{format_report, Cli, CliContext};
use std::io::IsTerminal;
use std::process;

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let context = CliContext::new(cli.config.clone()).context("loading configuration")?;

    let logging = context.config().logging.clone().with_overrides(&cli.log_overrides());
    init_logging(Some(&logging)).context("initializing logging")?;

    let report = context
        .execute(&cli.merge)
        .with_context(|| format!("metapush: merging into {}", cli.merge.output.display()))?;

    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    println!("{}", format_report(&report, &cli.format, color));
    Ok(report.exit_code())
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
