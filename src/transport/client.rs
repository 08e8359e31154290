//! Transport seam and the command-line implementation
//!
//! Suites talk to a [`GatewayClient`], which forwards every call through a
//! [`Transport`]. Production uses [`CliTransport`] (grpcurl and curl
//! subprocesses); tests plug in an in-memory gateway.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use super::{CommandInvoker, CurlOptions, GrpcurlOptions, TestOutcome};
use crate::config::{GrpcConfig, HarnessConfig};

/// Where a request goes
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    /// gRPC method, without the service prefix
    Rpc { method: String },
    /// HTTP call against an absolute URL
    Http { method: String, url: String },
}

/// One transport call
#[derive(Clone, Debug, PartialEq)]
pub struct TransportRequest {
    pub target: Target,
    pub payload: Option<Value>,
    pub headers: Vec<(String, String)>,
    /// Echo the command line at info level
    pub echo: bool,
}

impl TransportRequest {
    pub fn rpc(method: impl Into<String>, payload: Value) -> Self {
        Self {
            target: Target::Rpc {
                method: method.into(),
            },
            payload: Some(payload),
            headers: Vec::new(),
            echo: true,
        }
    }

    pub fn http(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            target: Target::Http {
                method: method.into(),
                url: url.into(),
            },
            payload: None,
            headers: Vec::new(),
            echo: true,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    #[cfg(test)]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Log the command at debug level only
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Short human name, e.g. `GetOffer` or `POST http://...`
    pub fn describe(&self) -> String {
        match &self.target {
            Target::Rpc { method } => method.clone(),
            Target::Http { method, url } => format!("{method} {url}"),
        }
    }
}

/// Executes transport requests
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, request: &TransportRequest) -> TestOutcome;
}

/// grpcurl/curl subprocess transport
#[derive(Clone, Debug)]
pub struct CliTransport {
    grpc: GrpcConfig,
    invoker: CommandInvoker,
    grpcurl_bin: String,
    curl_bin: String,
    echo: bool,
}

impl CliTransport {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            grpc: config.grpc.clone(),
            invoker: CommandInvoker::new(config.call_timeout()),
            grpcurl_bin: "grpcurl".to_string(),
            curl_bin: "curl".to_string(),
            echo: true,
        }
    }

    /// Suppress info-level command echo for every call
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.echo = !quiet;
        self
    }

    #[cfg(test)]
    pub fn with_programs(mut self, grpcurl: impl Into<String>, curl: impl Into<String>) -> Self {
        self.grpcurl_bin = grpcurl.into();
        self.curl_bin = curl.into();
        self
    }

    /// Program and arguments for `request`
    pub fn command(&self, request: &TransportRequest) -> (String, Vec<String>) {
        match &request.target {
            Target::Rpc { method } => {
                let options = request.headers.iter().fold(
                    GrpcurlOptions::new().plaintext(self.grpc.plaintext),
                    |options, (k, v)| options.header(k.clone(), v.clone()),
                );
                let body = request.payload.clone().unwrap_or_else(|| json!({}));
                let args = options.build_args(&self.grpc.address(), &self.grpc.method_path(method), &body);
                (self.grpcurl_bin.clone(), args)
            }
            Target::Http { method, url } => {
                let base = CurlOptions::new()
                    .method(method.clone())
                    .timeout(self.invoker.timeout().as_secs());
                let mut options = request
                    .headers
                    .iter()
                    .fold(base, |options, (k, v)| options.header(k.clone(), v.clone()));
                if let Some(payload) = &request.payload {
                    options = options.body(payload.to_string());
                }
                (self.curl_bin.clone(), options.build_args(url))
            }
        }
    }
}

#[async_trait]
impl Transport for CliTransport {
    async fn invoke(&self, request: &TransportRequest) -> TestOutcome {
        let (program, args) = self.command(request);
        let line = shell_line(&program, &args);
        if self.echo && request.echo {
            info!("$ {}", line);
        } else {
            debug!("$ {}", line);
        }

        let outcome = self.invoker.run(&program, &args).await;
        if outcome.is_success() {
            debug!("{} ok ({} bytes)", request.describe(), outcome.raw_text().len());
        } else {
            debug!("{} failed: {}", request.describe(), outcome.error_message());
        }
        outcome
    }
}

/// Render a command line for logs, single-quoting arguments that need it
pub fn shell_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        let plain = !arg.is_empty()
            && arg
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_./:=@".contains(c));
        if plain {
            line.push_str(arg);
        } else {
            line.push('\'');
            line.push_str(&arg.replace('\'', r"'\''"));
            line.push('\'');
        }
    }
    line
}

/// Gateway facade shared by every suite
#[derive(Clone)]
pub struct GatewayClient {
    transport: Arc<dyn Transport>,
    config: Arc<HarnessConfig>,
}

impl GatewayClient {
    pub fn new(transport: Arc<dyn Transport>, config: HarnessConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub async fn send(&self, request: TransportRequest) -> TestOutcome {
        self.transport.invoke(&request).await
    }

    pub async fn rpc(&self, method: &str, payload: Value) -> TestOutcome {
        self.send(TransportRequest::rpc(method, payload)).await
    }

    /// RPC whose command line is logged at debug level only
    pub async fn rpc_quiet(&self, method: &str, payload: Value) -> TestOutcome {
        self.send(TransportRequest::rpc(method, payload).quiet()).await
    }

    /// POST a JSON body to a path under the HTTP base URL
    pub async fn post(&self, path: &str, payload: Value) -> TestOutcome {
        let url = self.config.http.url(path);
        self.send(TransportRequest::http("POST", url).with_payload(payload))
            .await
    }
}

/// Verify `program` runs; returns its version line
pub async fn ensure_installed(program: &str) -> Result<String> {
    let run = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .with_context(|| format!("{program} --version timed out"))?
        .with_context(|| format!("{program} not found"))?;

    if !output.status.success() {
        bail!("{program} --version exited with {}", output.status);
    }

    // grpcurl prints its version on stderr
    let text = [output.stdout, output.stderr]
        .iter()
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_default();
    Ok(text.lines().next().unwrap_or_default().to_string())
}

/// Operator instructions printed when grpcurl is missing
pub fn grpcurl_install_hint() -> &'static str {
    "grpcurl not found. Install it:\n   macOS: brew install grpcurl\n   Linux: apt-get install grpcurl or download a release from https://github.com/fullstorydev/grpcurl/releases"
}
