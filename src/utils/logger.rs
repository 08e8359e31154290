//! Logging setup
//!
//! Operator log lines (echoed commands, poll progress, reconcile tallies) go
//! through `tracing` to stderr, leaving stdout to the run summary.
//! `RUST_LOG` overrides the level chosen on the command line.

use std::io::IsTerminal;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
        }
    }

    /// `--verbose` raises the default level to debug
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

/// Filter directive for the harness target at `level`
pub fn directive(level: LogLevel) -> String {
    format!("paygate_harness={}", level.to_tracing_level())
}

/// Compact formatter writing to `writer`
pub(crate) fn subscriber<W>(
    filter: EnvFilter,
    writer: W,
    ansi: bool,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .with_ansi(ansi)
        .compact()
        .finish()
}

/// Initialize the logger with specified level
pub fn init_logger(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(level)));
    let ansi = std::io::stderr().is_terminal();

    subscriber(filter, std::io::stderr, ansi).init();
}

/// In-memory log sink
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct LogCapture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl LogCapture {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// A subscriber at `level` that writes plain text into this capture
    pub(crate) fn subscriber(&self, level: LogLevel) -> impl Subscriber + Send + Sync + 'static {
        let sink = self.clone();
        subscriber(EnvFilter::new(directive(level)), move || sink.clone(), false)
    }
}

#[cfg(test)]
impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_directive() {
        assert_eq!(directive(LogLevel::from_verbose(true)), "paygate_harness=DEBUG");
        assert_eq!(directive(LogLevel::from_verbose(false)), "paygate_harness=INFO");
    }

    #[test]
    fn test_lines_go_to_the_given_writer() {
        let capture = LogCapture::default();
        tracing::subscriber::with_default(capture.subscriber(LogLevel::Info), || {
            tracing::debug!("hidden");
            tracing::warn!("✗ get_trader_default: request succeeded: timeout");
        });

        let logged = capture.contents();
        assert!(logged.contains("WARN"));
        assert!(logged.contains("get_trader_default: request succeeded"));
        assert!(!logged.contains("hidden"));
        assert!(!logged.contains('\x1b'));
    }
}
