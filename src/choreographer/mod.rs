//! Lifecycle choreographer
//!
//! Drives a freshly published offer through the gateway's state machine and
//! checks the answer to one targeted transition. Setup steps are
//! preconditions: the first one that misbehaves aborts the scenario with a
//! single FAIL.

mod plan;

pub use plan::{Expectation, LifecyclePlan, Step, TRANSITION_REJECTED};

use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::models::payload::{offer_request, random_offer_name, Direction, OrderRequest};
use crate::models::{order_status, Offer, OfferStatus};
use crate::navigator;
use crate::poller::{PollOutcome, StatePoller};
use crate::reconciler::BulkReconciler;
use crate::recorder::Recorder;
use crate::transport::{GatewayClient, TestOutcome};

/// A setup step did not leave the gateway in the expected state
#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("{step} failed: {message}")]
    Transport { step: String, message: String },

    #[error("{step} response has no {field}")]
    MissingField { step: String, field: String },

    #[error("{step} left the offer {actual}, expected {expected}")]
    UnexpectedStatus {
        step: String,
        expected: String,
        actual: String,
    },

    #[error("order {order_id} not PROCESSING after {elapsed_ms}ms (last state {last_state})")]
    NotProcessing {
        order_id: String,
        elapsed_ms: u128,
        last_state: String,
    },

    #[error("polling order {order_id} aborted: {error}")]
    PollAborted { order_id: String, error: String },

    #[error("could not clear active offers: {0}")]
    Reconcile(String),
}

/// Offer returned under `getOfferResponse.offer`
fn offer_from(outcome: &TestOutcome, step: &str) -> Result<Offer, SetupError> {
    let payload = outcome.payload().ok_or_else(|| SetupError::Transport {
        step: step.to_string(),
        message: outcome.error_message(),
    })?;
    let offer = payload
        .get("getOfferResponse")
        .and_then(|inner| inner.get("offer"))
        .ok_or_else(|| SetupError::MissingField {
            step: step.to_string(),
            field: "getOfferResponse.offer".to_string(),
        })?;
    serde_json::from_value(offer.clone()).map_err(|e| SetupError::MissingField {
        step: step.to_string(),
        field: format!("a decodable offer ({e})"),
    })
}

/// Current order status from a GetOrderById answer
fn order_status_of(outcome: &TestOutcome) -> Result<String, String> {
    let payload = outcome.payload().ok_or_else(|| outcome.error_message())?;
    payload
        .pointer("/getOrderByIdResponse/order/status")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| "getOrderByIdResponse.order.status missing".to_string())
}

/// Runs lifecycle plans against one gateway
#[derive(Clone)]
pub struct OfferLifecycle {
    client: GatewayClient,
    poller: StatePoller,
    reconciler: BulkReconciler,
}

impl OfferLifecycle {
    pub fn new(client: GatewayClient) -> Self {
        let poller = StatePoller::from_config(&client.config().polling);
        Self {
            reconciler: BulkReconciler::new(client.clone()),
            poller,
            client,
        }
    }

    /// Publish a new offer; it starts ACTIVE
    pub async fn publish(&self, direction: Direction) -> Result<Offer, SetupError> {
        let name = random_offer_name();
        let outcome = self
            .client
            .rpc("PublishNewOffer", offer_request(direction, &name))
            .await;
        let offer = offer_from(&outcome, "PublishNewOffer")?;
        info!("Published offer {} ({})", offer.name, offer.id);
        Ok(offer)
    }

    /// Send one transition call; the raw outcome is returned unchecked
    pub async fn transition(&self, step: Step, offer_id: &str) -> TestOutcome {
        self.client
            .rpc(step.method(), json!({ "offer_id": offer_id }))
            .await
    }

    /// Create a pay-in order and return its id
    pub async fn create_order(&self) -> Result<String, SetupError> {
        let outcome = self
            .client
            .rpc("CreateOrder", OrderRequest::new(Direction::PayIn).to_json())
            .await;
        let payload = outcome.payload().ok_or_else(|| SetupError::Transport {
            step: "CreateOrder".to_string(),
            message: outcome.error_message(),
        })?;
        payload
            .pointer("/createOrderResponse/order/orderId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SetupError::MissingField {
                step: "CreateOrder".to_string(),
                field: "createOrderResponse.order.orderId".to_string(),
            })
    }

    /// Wait until the order reports PROCESSING
    pub async fn await_processing(&self, order_id: &str) -> Result<PollOutcome, SetupError> {
        info!(
            "Waiting for order {} to reach {} (every {}ms, deadline {}ms)",
            order_id,
            order_status::PROCESSING,
            self.poller.interval().as_millis(),
            self.poller.deadline().as_millis()
        );
        let client = &self.client;
        let outcome = self
            .poller
            .await_state(
                order_id,
                move || async move {
                    let outcome = client
                        .rpc_quiet("GetOrderById", json!({ "order_id": order_id }))
                        .await;
                    order_status_of(&outcome)
                },
                |state| state == order_status::PROCESSING,
            )
            .await;

        match outcome {
            PollOutcome::Reached { .. } => {
                info!(
                    "Order {} reached {} after {} poll(s) in {}ms",
                    order_id,
                    order_status::PROCESSING,
                    outcome.polls(),
                    outcome.elapsed().as_millis()
                );
                Ok(outcome)
            }
            PollOutcome::TimedOut {
                last_state,
                elapsed,
                ..
            } => Err(SetupError::NotProcessing {
                order_id: order_id.to_string(),
                elapsed_ms: elapsed.as_millis(),
                last_state: last_state.unwrap_or_else(|| "unknown".to_string()),
            }),
            PollOutcome::Aborted { error, .. } => Err(SetupError::PollAborted {
                order_id: order_id.to_string(),
                error,
            }),
        }
    }

    /// Apply one setup step; `current` is the status the offer is in now
    async fn apply(
        &self,
        step: Step,
        offer_id: &str,
        current: OfferStatus,
        has_orders: bool,
    ) -> Result<OfferStatus, SetupError> {
        if step == Step::CreateOrder {
            let order_id = self.create_order().await?;
            self.await_processing(&order_id).await?;
            return Ok(current);
        }

        let expected = step.next_status(current, has_orders);
        let outcome = self.transition(step, offer_id).await;
        let offer = offer_from(&outcome, step.method())?;
        if Some(offer.status) != expected {
            return Err(SetupError::UnexpectedStatus {
                step: step.method().to_string(),
                expected: expected.map(|s| s.wire_name()).unwrap_or("a rejection").to_string(),
                actual: offer.status.to_string(),
            });
        }
        Ok(offer.status)
    }

    /// Bring a new offer into the plan's starting state
    async fn prepare(&self, plan: &LifecyclePlan, recorder: &mut Recorder) -> Result<Offer, SetupError> {
        if plan.clean_slate {
            let report = self.reconciler.cancel_all_active().await;
            if !report.ok {
                return Err(SetupError::Reconcile(report.to_string()));
            }
            let label = plan.case.name();
            if let Some(drift) = report.drift {
                recorder.warn(format!("{label}: offers stable during cleanup"), drift.to_string());
            }
            if report.failed > 0 {
                recorder.warn(format!("{label}: every active offer canceled"), report.to_string());
            }
        }

        let offer = self.publish(Direction::PayIn).await?;
        let mut status = offer.status;
        let mut has_orders = false;
        for step in plan.setup {
            has_orders |= *step == Step::CreateOrder;
            status = self.apply(*step, &offer.id, status, has_orders).await?;
        }
        Ok(Offer { status, ..offer })
    }

    /// Run `plan`; true when the targeted transition behaved as expected
    pub async fn run(&self, plan: &LifecyclePlan, recorder: &mut Recorder) -> bool {
        let label = plan.case.name();

        let offer = match self.prepare(plan, recorder).await {
            Ok(offer) => offer,
            Err(e) => return recorder.fail(format!("{label}: setup"), e.to_string()),
        };
        info!("{}: {} offer {} while {}", label, plan.target, offer.id, offer.status);

        let outcome = self.transition(plan.target, &offer.id).await;
        match plan.expect {
            Expectation::Rejected => {
                navigator::expect_error(recorder, &outcome, TRANSITION_REJECTED, label)
            }
            Expectation::Status(expected) => {
                let Some(inner) = navigator::envelope(recorder, &outcome, "getOfferResponse", label)
                else {
                    return false;
                };
                let Some(updated) = navigator::object(recorder, inner, "offer", label) else {
                    return false;
                };
                let reported = recorder.assert_equal(
                    updated.get("status").and_then(Value::as_str).unwrap_or_default(),
                    expected.wire_name(),
                    format!("{label}: {} reports {expected}", plan.target),
                );
                let stored = self.verify_status(recorder, &offer.id, expected, label).await;
                reported && stored
            }
        }
    }

    /// Re-read the offer and check its persisted status
    async fn verify_status(
        &self,
        recorder: &mut Recorder,
        offer_id: &str,
        expected: OfferStatus,
        label: &str,
    ) -> bool {
        let outcome = self
            .client
            .rpc_quiet("GetOffer", json!({ "offer_id": offer_id }))
            .await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "getOfferResponse", label) else {
            return false;
        };
        let Some(offer) = navigator::object(recorder, inner, "offer", label) else {
            return false;
        };
        recorder.assert_equal(
            offer.get("status").and_then(Value::as_str).unwrap_or_default(),
            expected.wire_name(),
            format!("{label}: GetOffer shows {expected}"),
        )
    }
}
