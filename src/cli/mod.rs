//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::HarnessConfig;
use crate::models::Selection;

/// Payment gateway integration test harness
#[derive(Parser, Debug)]
#[command(name = "paygate-harness")]
#[command(version = "0.1.0")]
#[command(about = "Run end-to-end scenarios against the payment gateway gRPC and HTTP APIs")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one scenario or all of them
    Run(RunArgs),

    /// List every scenario by category
    List,

    /// Show supported environment variables
    Env,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scenario to run, or `all`
    #[arg(short, long, default_value = "all")]
    pub test: Selection,

    /// gRPC host
    #[arg(long)]
    pub host: Option<String>,

    /// gRPC port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Talk to the gRPC endpoint without TLS
    #[arg(long)]
    pub plaintext: bool,

    /// Prefix prepended to every gRPC method name (e.g. `gateway.v1.Service/`)
    #[arg(long)]
    pub service_prefix: Option<String>,

    /// HTTP API host
    #[arg(long)]
    pub http_host: Option<String>,

    /// HTTP API port
    #[arg(long)]
    pub http_port: Option<u16>,

    /// Currency looked up by the get-one scenario
    #[arg(long)]
    pub currency_id: Option<i64>,

    /// Region looked up by the get-one scenario
    #[arg(long)]
    pub region_id: Option<i64>,

    /// Issuer looked up by the get-one scenario
    #[arg(long)]
    pub issuer_id: Option<i64>,

    /// Payment method type looked up by the get-one scenario
    #[arg(long)]
    pub payment_method_type_id: Option<i64>,

    /// Payment method looked up by the get-one scenario
    #[arg(long)]
    pub payment_method_id: Option<i64>,

    /// Trader looked up by the get-one scenario
    #[arg(long)]
    pub trader_id: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Summary format (table, json, json-pretty)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Do not echo transport commands
    #[arg(short, long)]
    pub quiet: bool,
}

impl RunArgs {
    /// Layer command-line overrides on top of `config`
    pub fn apply(&self, mut config: HarnessConfig) -> HarnessConfig {
        if let Some(host) = &self.host {
            config.grpc.host = host.clone();
        }
        if let Some(port) = self.port {
            config.grpc.port = port;
        }
        if self.plaintext {
            config.grpc.plaintext = true;
        }
        if let Some(prefix) = &self.service_prefix {
            config.grpc.service_prefix = prefix.clone();
        }
        if let Some(host) = &self.http_host {
            config.http.host = host.clone();
        }
        if let Some(port) = self.http_port {
            config.http.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.call_timeout_secs = timeout;
        }

        let fixtures = &mut config.fixtures;
        if let Some(id) = self.currency_id {
            fixtures.currency_id = id;
        }
        if let Some(id) = self.region_id {
            fixtures.region_id = id;
        }
        if let Some(id) = self.issuer_id {
            fixtures.issuer_id = id;
        }
        if let Some(id) = self.payment_method_type_id {
            fixtures.payment_method_type_id = id;
        }
        if let Some(id) = self.payment_method_id {
            fixtures.payment_method_id = id;
        }
        if let Some(id) = &self.trader_id {
            fixtures.trader_id = id.clone();
        }
        config
    }
}
