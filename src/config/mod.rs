//! Configuration module
//!
//! Handles loading and resolving the harness configuration. The resolved
//! value is built once at startup and handed to every component.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::find_config_file;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Harness configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// gRPC endpoint reached through grpcurl
    pub grpc: GrpcConfig,

    /// HTTP endpoint reached through curl
    pub http: HttpConfig,

    /// State poller and reconciler settings
    pub polling: PollingConfig,

    /// Entity ids used by the smoke scenarios
    pub fixtures: Fixtures,

    /// Per-call transport timeout in seconds
    pub call_timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            grpc: GrpcConfig::default(),
            http: HttpConfig::default(),
            polling: PollingConfig::default(),
            fixtures: Fixtures::default(),
            call_timeout_secs: 30,
        }
    }
}

impl HarnessConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Layer environment overrides on top of this configuration
    pub fn with_env(mut self, env: &EnvConfig) -> Self {
        if let Some(host) = &env.grpc_host {
            self.grpc.host = host.clone();
        }
        if let Some(port) = env.grpc_port {
            self.grpc.port = port;
        }
        if let Some(plaintext) = env.plaintext {
            self.grpc.plaintext = plaintext;
        }
        if let Some(host) = &env.http_host {
            self.http.host = host.clone();
        }
        if let Some(port) = env.http_port {
            self.http.port = port;
        }
        if let Some(timeout) = env.timeout {
            self.call_timeout_secs = timeout;
        }
        self
    }

    /// Reject values no run can work with
    pub fn validate(&self) -> Result<()> {
        if self.grpc.host.trim().is_empty() {
            bail!("gRPC host must not be empty");
        }
        if self.grpc.port == 0 || self.http.port == 0 {
            bail!("ports must be non-zero");
        }
        if self.call_timeout_secs == 0 {
            bail!("call timeout must be at least one second");
        }
        if self.polling.interval_ms == 0 {
            bail!("poll interval must be positive");
        }
        if self.polling.deadline_ms < self.polling.interval_ms {
            bail!(
                "poll deadline ({}ms) is shorter than the poll interval ({}ms)",
                self.polling.deadline_ms,
                self.polling.interval_ms
            );
        }
        if self.polling.page_size == 0 {
            bail!("page size must be positive");
        }
        Ok(())
    }
}

/// gRPC endpoint settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcConfig {
    pub host: String,
    pub port: u16,

    /// Pass `-plaintext` to grpcurl
    pub plaintext: bool,

    /// Prepended to every method name, e.g. `pkg.Service/`
    pub service_prefix: String,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            host: "testHost".to_string(),
            port: 443,
            plaintext: false,
            service_prefix: String::new(),
        }
    }
}

impl GrpcConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn method_path(&self, method: &str) -> String {
        format!("{}{}", self.service_prefix, method)
    }
}

/// HTTP endpoint settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub base_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 10090,
            base_path: "/api/".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn base_url(&self) -> String {
        let path = self.base_path.trim_matches('/');
        if path.is_empty() {
            format!("http://{}:{}/", self.host, self.port)
        } else {
            format!("http://{}:{}/{}/", self.host, self.port, path)
        }
    }

    /// Join a relative endpoint path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path.trim_start_matches('/'))
    }
}

/// Poller and reconciler settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub deadline_ms: u64,
    pub page_size: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            deadline_ms: 10_000,
            page_size: 50,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

/// Entity ids the smoke scenarios look up
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub currency_id: i64,
    pub region_id: i64,
    pub issuer_id: i64,
    pub payment_method_type_id: i64,
    pub payment_method_id: i64,
    pub trader_id: String,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            currency_id: 1,
            region_id: 1,
            issuer_id: 1,
            payment_method_type_id: 1,
            payment_method_id: 1,
            trader_id: "550e8400-e29b-41d4-a716-446655440001".to_string(),
        }
    }
}
