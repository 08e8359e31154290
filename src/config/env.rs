//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "PAYGATE_HARNESS";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// gRPC host from PAYGATE_HARNESS_GRPC_HOST
    pub grpc_host: Option<String>,
    /// gRPC port from PAYGATE_HARNESS_GRPC_PORT
    pub grpc_port: Option<u16>,
    /// Plaintext flag from PAYGATE_HARNESS_PLAINTEXT
    pub plaintext: Option<bool>,
    /// HTTP host from PAYGATE_HARNESS_HTTP_HOST
    pub http_host: Option<String>,
    /// HTTP port from PAYGATE_HARNESS_HTTP_PORT
    pub http_port: Option<u16>,
    /// Call timeout from PAYGATE_HARNESS_TIMEOUT
    pub timeout: Option<u64>,
    /// Config file from PAYGATE_HARNESS_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            grpc_host: get_env("GRPC_HOST"),
            grpc_port: get_env_parse("GRPC_PORT"),
            plaintext: get_env_bool("PLAINTEXT"),
            http_host: get_env("HTTP_HOST"),
            http_port: get_env_parse("HTTP_PORT"),
            timeout: get_env_parse("TIMEOUT"),
            config_file: get_env("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.grpc_host.is_some()
            || self.grpc_port.is_some()
            || self.plaintext.is_some()
            || self.http_host.is_some()
            || self.http_port.is_some()
            || self.timeout.is_some()
            || self.config_file.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Print all PAYGATE_HARNESS environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_GRPC_HOST   gRPC host");
    println!("  {ENV_PREFIX}_GRPC_PORT   gRPC port");
    println!("  {ENV_PREFIX}_PLAINTEXT   Use plaintext gRPC (true/false)");
    println!("  {ENV_PREFIX}_HTTP_HOST   HTTP API host");
    println!("  {ENV_PREFIX}_HTTP_PORT   HTTP API port");
    println!("  {ENV_PREFIX}_TIMEOUT     Per-call timeout in seconds");
    println!("  {ENV_PREFIX}_CONFIG      Path to configuration file");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_GRPC_HOST=localhost");
    println!("  export {ENV_PREFIX}_PLAINTEXT=true");
    println!("  paygate-harness run --test all");
}
