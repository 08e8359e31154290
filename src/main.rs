//! Payment Gateway Harness - end-to-end checks for the payment gateway
//!
//! A CLI tool that drives the gateway's gRPC API through grpcurl and its
//! HTTP API through curl, then reports every check it made.
//!
//! ## Features
//!
//! - Gateway config catalog lookups, listings, ordering and pagination
//! - Order creation and amount/company validation
//! - Offer publication and the full offer lifecycle state machine
//! - Trader lookup, listing, HTTP creation and registration
//! - Table or JSON run summaries, exit code 1 on any failed check
//!
//! ## Usage
//!
//! ```bash
//! # Run every scenario against a local gateway
//! paygate-harness run --host localhost --port 50051 --plaintext
//!
//! # Run one scenario
//! paygate-harness run --test create_order_basic
//!
//! # List scenarios
//! paygate-harness list
//! ```

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

mod choreographer;
mod cli;
mod config;
mod executor;
mod models;
mod navigator;
mod output;
mod poller;
mod reconciler;
mod recorder;
mod suites;
mod transport;
mod utils;

use cli::{Args, Command, RunArgs};
use config::{find_config_file, print_env_help, EnvConfig, HarnessConfig};
use executor::ScenarioRunner;
use models::{RunSummary, Scenario};
use output::{OutputFormat, ResultFormatter};
use transport::{ensure_installed, grpcurl_install_hint, CliTransport, GatewayClient};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(LogLevel::from_verbose(args.verbose));

    match args.command {
        Command::Run(run_args) => {
            let code = run(run_args).await?;
            std::process::exit(code);
        }
        Command::List => list_scenarios(),
        Command::Env => print_env_help(),
    }

    Ok(())
}

/// Resolve configuration: defaults, then file, then environment, then flags
fn load_config(args: &RunArgs) -> Result<HarnessConfig> {
    let env = EnvConfig::load();
    let path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(PathBuf::from))
        .or_else(find_config_file);

    let config = match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            HarnessConfig::load(path)?
        }
        None => HarnessConfig::default(),
    };

    if env.has_any() {
        info!("Applying PAYGATE_HARNESS_* environment overrides");
    }
    let config = args.apply(config.with_env(&env));
    config.validate()?;
    Ok(config)
}

/// Make sure the external tools the selected scenarios need are on PATH
async fn preflight(scenarios: &[Scenario]) -> bool {
    match ensure_installed("grpcurl").await {
        Ok(version) => info!("Using {}", version),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{}", grpcurl_install_hint());
            return false;
        }
    }

    if scenarios.iter().any(Scenario::uses_http) {
        match ensure_installed("curl").await {
            Ok(version) => info!("Using {}", version),
            Err(e) => {
                error!("{:#}", e);
                eprintln!("curl not found. Install curl to run the HTTP scenarios.");
                return false;
            }
        }
    }
    true
}

async fn run(args: RunArgs) -> Result<i32> {
    let format = OutputFormat::from_str(&args.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", args.format))?;
    let config = load_config(&args)?;
    let scenarios = args.test.scenarios();

    if !preflight(&scenarios).await {
        return Ok(1);
    }

    info!(
        "Testing gateway at {} (HTTP {})",
        config.grpc.address(),
        config.http.base_url()
    );

    let transport = CliTransport::new(&config).quiet(args.quiet);
    let client = GatewayClient::new(Arc::new(transport), config);
    let mut runner = ScenarioRunner::new(client).with_progress(format == OutputFormat::Table);

    let summary = runner.run(&scenarios).await;

    if let Some(report) = render_summary(&summary, format, args.test.is_all()) {
        println!("{report}");
    }

    Ok(summary.exit_code())
}

/// Summary text for stdout, when it adds to the progress lines
fn render_summary(summary: &RunSummary, format: OutputFormat, all: bool) -> Option<String> {
    if summary.total > 1 || all || format != OutputFormat::Table {
        let formatter = ResultFormatter::new(format).colorize(std::io::stdout().is_terminal());
        Some(formatter.format_summary(summary))
    } else {
        None
    }
}

fn list_scenarios() {
    let scenarios = Scenario::all();
    println!("\nPayment Gateway Scenarios ({} total)\n", scenarios.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut current_category = "";
    for scenario in &scenarios {
        let category = scenario.category();
        if category != current_category {
            println!("\n{category}:");
            println!("──────────────────────────────────────────────────────────────────────");
            current_category = category;
        }

        let marker = if scenario.uses_http() { " [HTTP]" } else { "" };
        println!("  {}{}", scenario.name(), marker);
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}
