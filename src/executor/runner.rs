//! Scenario runner
//!
//! Runs scenarios one after another against a single gateway and turns the
//! checks each one recorded into a verdict.

use chrono::Utc;
use tracing::{error, info};

use crate::models::{RunSummary, Scenario, ScenarioResult};
use crate::recorder::Recorder;
use crate::suites;
use crate::transport::GatewayClient;
use crate::utils::Timer;

/// Sequential scenario runner
pub struct ScenarioRunner {
    client: GatewayClient,
    recorder: Recorder,
    progress: bool,
}

impl ScenarioRunner {
    pub fn new(client: GatewayClient) -> Self {
        Self {
            client,
            recorder: Recorder::new(),
            progress: true,
        }
    }

    /// Print per-scenario progress lines to stdout
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    #[cfg(test)]
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Run a single scenario.
    ///
    /// The verdict is derived from the checks recorded while it ran. A
    /// scenario that could not run to completion is recorded as a failed
    /// check and reported as an error.
    pub async fn run_scenario(&mut self, scenario: Scenario) -> ScenarioResult {
        info!("Running {}", scenario);
        if self.progress {
            println!("\n━━ {} › {}", scenario.category(), scenario);
        }

        let timer = Timer::start(scenario.name());
        let mark = self.recorder.mark();
        let outcome = suites::run_scenario(&self.client, &mut self.recorder, scenario).await;
        let duration_ms = timer.elapsed_ms();

        let result = match outcome {
            Ok(()) => {
                let failures = self.recorder.failures_since(mark);
                match failures.first() {
                    None => ScenarioResult::pass(scenario, duration_ms),
                    Some(first) => ScenarioResult::fail(
                        scenario,
                        duration_ms,
                        format!("{} check(s) failed, first: {}", failures.len(), first.name),
                    ),
                }
            }
            Err(e) => {
                error!("Scenario {} failed with error: {:#}", scenario, e);
                self.recorder
                    .fail(format!("{scenario}: completed"), format!("{e:#}"));
                ScenarioResult::error(scenario, duration_ms, format!("{e:#}"))
            }
        };

        if self.progress {
            for record in self.recorder.records_since(mark) {
                println!("    {record}");
            }
            println!("  {result}");
        }
        info!("  {}", result);
        result
    }

    /// Run `scenarios` in order
    pub async fn run(&mut self, scenarios: &[Scenario]) -> RunSummary {
        info!("Running {} scenario(s)", scenarios.len());
        let started_at = Utc::now();
        let timer = Timer::start("run");

        let mut results = Vec::with_capacity(scenarios.len());
        for &scenario in scenarios {
            results.push(self.run_scenario(scenario).await);
        }

        let summary = RunSummary::new(started_at, results, self.recorder.summary());
        info!(
            "Run completed in {}ms - Pass: {}/{} ({:.1}%)",
            timer.stop().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );
        summary
    }
}
