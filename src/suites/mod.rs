//! Scenario implementations
//!
//! One suite per API surface:
//!
//! - Gateway Config: currencies, regions, issuers, payment method types and
//!   payment methods
//! - Orders: creation and amount/company validation
//! - Offers: publication, listing and lookup
//! - Offer Lifecycle: every legal and illegal status transition
//! - Traders: lookup, listing, HTTP creation and registration
//!
//! Scenario bodies record their checks in the shared [`Recorder`]. An `Err`
//! means the scenario could not run at all.

mod catalog;
mod offers;
mod orders;
mod traders;

pub use catalog::CatalogSuite;
pub use offers::OfferSuite;
pub use orders::OrderSuite;
pub use traders::TraderSuite;

use anyhow::Result;

use crate::choreographer::{LifecyclePlan, OfferLifecycle};
use crate::models::Scenario;
use crate::recorder::Recorder;
use crate::transport::GatewayClient;

/// Run one scenario against the gateway
pub async fn run_scenario(
    client: &GatewayClient,
    recorder: &mut Recorder,
    scenario: Scenario,
) -> Result<()> {
    let label = scenario.name();
    match scenario {
        Scenario::Catalog(entity, case) => {
            CatalogSuite::new(client.clone())
                .run(entity, case, &label, recorder)
                .await
        }
        Scenario::Order(case) => OrderSuite::new(client.clone()).run(case, &label, recorder).await,
        Scenario::Offer(case) => OfferSuite::new(client.clone()).run(case, &label, recorder).await,
        Scenario::Lifecycle(case) => {
            OfferLifecycle::new(client.clone())
                .run(&LifecyclePlan::for_case(case), recorder)
                .await;
            Ok(())
        }
        Scenario::Trader(case) => {
            TraderSuite::new(client.clone())
                .run(case, &label, recorder)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::transport::fake::FakeGateway;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_full_catalogue_against_fake_gateway() {
        let gateway = Arc::new(FakeGateway::new());
        let client = GatewayClient::new(gateway.clone(), HarnessConfig::default());
        let mut recorder = Recorder::new();

        for scenario in Scenario::all() {
            let mark = recorder.mark();
            run_scenario(&client, &mut recorder, scenario).await.unwrap();
            let failures = recorder.failures_since(mark);
            assert!(failures.is_empty(), "{}: {:?}", scenario, failures);
        }
        assert!(recorder.summary().passed > Scenario::all().len());
    }
}
