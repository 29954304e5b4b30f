use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use mfe_probe::{AppConfig, logging, probe};
use mfe_shell::Environment;

#[derive(Debug, Parser)]
#[command(name = "mfe-probe", version)]
#[command(about = "Load every configured micro-frontend remote and report which ones work")]
struct Cli {
    /// YAML configuration layered over the environment preset.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment preset: dev, sit, uat or prod.
    #[arg(short, long, default_value_t = Environment::Dev)]
    env: Environment,

    /// Print the effective configuration as YAML and exit.
    #[arg(long)]
    print_config: bool,

    /// Raise console verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref(), cli.env)?;
    config.apply_cli_overrides(cli.verbose);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let _logging = logging::init_logging(&config.logging, &AppConfig::log_base_dir()?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build the tokio runtime")?;
    let report = runtime.block_on(probe::run(&config))?;

    if cli.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        println!("{report}");
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
