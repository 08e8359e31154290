//! Bulk reconciler
//!
//! Walks a paginated collection and applies a corrective action to every
//! matching entity, so a scenario starts from a known state.

use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::payload::pagination;
use crate::models::OfferStatus;
use crate::navigator::as_count;
use crate::transport::GatewayClient;

/// Reported total changed between pages of one scan
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountDrift {
    pub first: u64,
    pub latest: u64,
}

impl fmt::Display for CountDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "totalCount changed from {} to {} during the scan",
            self.first, self.latest
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ScanError {
    #[error("{method} failed: {message}")]
    Request { method: String, message: String },

    #[error("{method} response has no {envelope}")]
    MissingEnvelope { method: String, envelope: String },
}

/// Every item of one collection
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    pub items: Vec<Value>,
    /// Total reported by the first page
    pub total_count: u64,
    pub pages: u32,
    pub drift: Option<CountDrift>,
}

/// Offset/limit walker over any list operation
#[derive(Clone)]
pub struct Paginator {
    client: GatewayClient,
    page_size: u32,
}

impl Paginator {
    pub fn new(client: GatewayClient, page_size: u32) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
        }
    }

    /// Collect `envelope.collection` across all pages.
    ///
    /// Stops on a short page, or once the items collected reach the total
    /// reported by the first page.
    pub async fn scan(
        &self,
        method: &str,
        envelope: &str,
        collection: &str,
    ) -> Result<ScanReport, ScanError> {
        let limit = self.page_size as usize;
        let mut report = ScanReport::default();
        let mut first_total = None;
        let mut offset = 0u64;

        loop {
            let outcome = self
                .client
                .rpc_quiet(method, pagination(self.page_size, offset))
                .await;
            let payload = outcome.payload().ok_or_else(|| ScanError::Request {
                method: method.to_string(),
                message: outcome.error_message(),
            })?;
            let inner = payload
                .get(envelope)
                .ok_or_else(|| ScanError::MissingEnvelope {
                    method: method.to_string(),
                    envelope: envelope.to_string(),
                })?;

            let batch = inner
                .get(collection)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let total = inner.get("totalCount").and_then(as_count).unwrap_or(0);
            report.pages += 1;

            match first_total {
                None => {
                    first_total = Some(total);
                    report.total_count = total;
                }
                Some(first) if first != total => {
                    let drift = CountDrift {
                        first,
                        latest: total,
                    };
                    warn!("{}: {}", method, drift);
                    report.drift = Some(drift);
                }
                Some(_) => {}
            }

            let short_page = batch.len() < limit;
            report.items.extend(batch);
            debug!(
                "{} page {} (offset {}): {} items so far",
                method,
                report.pages,
                offset,
                report.items.len()
            );

            if short_page {
                break;
            }
            offset += u64::from(self.page_size);
            if report.items.len() as u64 >= report.total_count {
                break;
            }
        }

        Ok(report)
    }
}

/// Outcome of one bulk cancellation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcileReport {
    /// False only when the collection could not be scanned
    pub ok: bool,
    pub scanned: usize,
    pub matched: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub drift: Option<CountDrift>,
    pub error: Option<String>,
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(f, "scan failed: {}", error),
            None => write!(
                f,
                "canceled {}/{} matching offers ({} scanned, {} failed)",
                self.succeeded, self.matched, self.scanned, self.failed
            ),
        }
    }
}

/// Cancels offers in bulk
#[derive(Clone)]
pub struct BulkReconciler {
    client: GatewayClient,
    paginator: Paginator,
}

impl BulkReconciler {
    pub fn new(client: GatewayClient) -> Self {
        let page_size = client.config().polling.page_size;
        Self {
            paginator: Paginator::new(client.clone(), page_size),
            client,
        }
    }

    /// Cancel every offer matching `predicate`.
    ///
    /// Cancellation failures are tallied and the loop continues; only a
    /// failed scan makes the report not ok.
    pub async fn cancel_all<P>(&self, predicate: P) -> ReconcileReport
    where
        P: Fn(&Value) -> bool,
    {
        let scan = match self
            .paginator
            .scan("GetOffers", "getOffersResponse", "offers")
            .await
        {
            Ok(scan) => scan,
            Err(e) => {
                warn!("Reconcile aborted: {}", e);
                return ReconcileReport {
                    error: Some(e.to_string()),
                    ..Default::default()
                };
            }
        };

        let mut seen = HashSet::new();
        let targets: Vec<String> = scan
            .items
            .iter()
            .filter(|&offer| predicate(offer))
            .filter_map(|offer| offer.get("id").and_then(Value::as_str))
            .filter(|id| seen.insert(id.to_string()))
            .map(str::to_string)
            .collect();

        let mut report = ReconcileReport {
            ok: true,
            scanned: scan.items.len(),
            matched: targets.len(),
            drift: scan.drift,
            ..Default::default()
        };

        for id in &targets {
            let outcome = self
                .client
                .rpc_quiet("CancelOffer", serde_json::json!({ "offer_id": id }))
                .await;
            if outcome.is_success() {
                report.succeeded += 1;
            } else {
                report.failed += 1;
                warn!("Could not cancel offer {}: {}", id, outcome.error_message());
            }
        }

        info!("Reconcile: {}", report);
        report
    }

    /// Cancel every offer currently ACTIVE
    pub async fn cancel_all_active(&self) -> ReconcileReport {
        self.cancel_all(|offer| {
            offer.get("status").and_then(Value::as_str) == Some(OfferStatus::Active.wire_name())
        })
        .await
    }
}
