//! State poller
//!
//! Queries one entity repeatedly until its state satisfies a predicate or the
//! deadline elapses. Queries are strictly sequential: the next query starts
//! only after the previous one returned.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::PollingConfig;

/// How a poll ended
#[derive(Clone, Debug, PartialEq)]
pub enum PollOutcome {
    /// Target state observed
    Reached {
        state: String,
        elapsed: Duration,
        polls: u32,
    },
    /// Deadline elapsed first
    TimedOut {
        last_state: Option<String>,
        elapsed: Duration,
        polls: u32,
    },
    /// A query failed at the transport level
    Aborted {
        error: String,
        elapsed: Duration,
        polls: u32,
    },
}

impl PollOutcome {
    #[cfg(test)]
    pub fn is_reached(&self) -> bool {
        matches!(self, PollOutcome::Reached { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            PollOutcome::Reached { elapsed, .. }
            | PollOutcome::TimedOut { elapsed, .. }
            | PollOutcome::Aborted { elapsed, .. } => *elapsed,
        }
    }

    pub fn polls(&self) -> u32 {
        match self {
            PollOutcome::Reached { polls, .. }
            | PollOutcome::TimedOut { polls, .. }
            | PollOutcome::Aborted { polls, .. } => *polls,
        }
    }
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollOutcome::Reached { state, elapsed, polls } => write!(
                f,
                "reached {} after {}ms ({} polls)",
                state,
                elapsed.as_millis(),
                polls
            ),
            PollOutcome::TimedOut {
                last_state,
                elapsed,
                polls,
            } => write!(
                f,
                "timed out after {}ms ({} polls, last state {})",
                elapsed.as_millis(),
                polls,
                last_state.as_deref().unwrap_or("unknown")
            ),
            PollOutcome::Aborted { error, elapsed, .. } => {
                write!(f, "aborted after {}ms: {}", elapsed.as_millis(), error)
            }
        }
    }
}

/// Bounded, sequential state poller
#[derive(Clone, Copy, Debug)]
pub struct StatePoller {
    interval: Duration,
    deadline: Duration,
}

impl StatePoller {
    pub fn new(interval: Duration, deadline: Duration) -> Self {
        Self { interval, deadline }
    }

    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(config.interval(), config.deadline())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Query until `predicate` accepts the returned state.
    ///
    /// `query` yields the current state or a transport error message. A
    /// query error aborts immediately. The first query is issued without
    /// waiting, so an entity already in the target state returns after
    /// zero sleeps.
    pub async fn await_state<F, Fut, P>(&self, label: &str, mut query: F, predicate: P) -> PollOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, String>>,
        P: Fn(&str) -> bool,
    {
        let started = Instant::now();
        let mut polls = 0;
        let mut last_state = None;

        loop {
            polls += 1;
            match query().await {
                Ok(state) if predicate(&state) => {
                    let elapsed = started.elapsed();
                    debug!("{}: {} after {} polls", label, state, polls);
                    return PollOutcome::Reached {
                        state,
                        elapsed,
                        polls,
                    };
                }
                Ok(state) => {
                    debug!("{}: still {}", label, state);
                    last_state = Some(state);
                }
                Err(error) => {
                    return PollOutcome::Aborted {
                        error,
                        elapsed: started.elapsed(),
                        polls,
                    };
                }
            }

            let elapsed = started.elapsed();
            if elapsed >= self.deadline {
                return PollOutcome::TimedOut {
                    last_state,
                    elapsed,
                    polls,
                };
            }
            sleep(self.interval.min(self.deadline - elapsed)).await;
        }
    }
}
