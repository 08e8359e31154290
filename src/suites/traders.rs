//! Trader scenarios
//!
//! Lookup and listing go through gRPC. Creation goes through the HTTP
//! endpoint, and registration needs a trader created over HTTP first.

use anyhow::{bail, Result};
use serde_json::{json, Value};
use uuid::Uuid;

use super::catalog::first_unsorted;
use crate::models::payload::{pagination, random_email};
use crate::models::{Trader, TraderCase};
use crate::navigator::{self, as_count, Schema};
use crate::reconciler::Paginator;
use crate::recorder::Recorder;
use crate::transport::{GatewayClient, TestOutcome};

const CREATE_TRADER_PATH: &str = "traders/createTrader";

/// Well-formed id nobody is registered under
const UNKNOWN_TRADER_ID: &str = "550e8400-e29b-41d4-a716-446655440999";
const TRUNCATED_TRADER_ID: &str = "550e8400-e29b-41d4-a716";
const TRUNCATED_USER_ID: &str = "7d9c2e4d-2a6f";

const STATUS_ENABLED: &str = "TRADER_STATUS_ENABLED";
const STATUS_DISABLED: &str = "TRADER_STATUS_DISABLED";

/// Statuses registration must refuse
const UNREGISTRABLE_STATUSES: [&str; 4] = [
    "TRADER_STATUS_PAYOUT_OFF",
    "TRADER_STATUS_PAYIN_OFF",
    "TRADER_STATUS_ON_HOLD",
    "TRADER_STATUS_UNINITIALIZED",
];

const PAGE_LIMIT: u32 = 50;
const PAGE_OFFSET: u64 = 5;

const TRADER_FIELDS: &[&str] = &[
    "id",
    "email",
    "traderStatus",
    "hasActiveSessions",
    "commissionPayin",
    "commissionPayout",
    "currencyId",
    "regionId",
    "createdAt",
    "updatedAt",
];

pub struct TraderSuite {
    client: GatewayClient,
}

impl TraderSuite {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub async fn run(&self, case: TraderCase, label: &str, recorder: &mut Recorder) -> Result<()> {
        match case {
            TraderCase::Get => self.get(label, recorder).await,
            TraderCase::NotFound => {
                let outcome = self.get_trader(UNKNOWN_TRADER_ID).await;
                navigator::expect_error(recorder, &outcome, "trader not found", label);
            }
            TraderCase::InvalidId => {
                let outcome = self.get_trader(TRUNCATED_TRADER_ID).await;
                navigator::expect_error(recorder, &outcome, "trader id is not valid", label);
            }
            TraderCase::List => self.list(label, recorder).await,
            TraderCase::ListOrderedAsc => self.ordered("id", false, label, recorder).await,
            TraderCase::ListOrderedDesc => self.ordered("email", true, label, recorder).await,
            TraderCase::ListPaginated => self.paginated(label, recorder).await,
            TraderCase::Create => self.create(label, recorder).await,
            TraderCase::DuplicateUserId => {
                let user_id = Uuid::new_v4().to_string();
                self.create_or_bail(&user_id, &random_email()).await?;
                let outcome = self.create_trader(&user_id, &random_email()).await;
                let expected = format!("trader already exists: user_id {user_id}");
                navigator::expect_error(recorder, &outcome, &expected, label);
            }
            TraderCase::DuplicateEmail => {
                let email = random_email();
                self.create_or_bail(&Uuid::new_v4().to_string(), &email).await?;
                let outcome = self
                    .create_trader(&Uuid::new_v4().to_string(), &email)
                    .await;
                let expected = format!("email already exists: email {email}");
                navigator::expect_error(recorder, &outcome, &expected, label);
            }
            TraderCase::InvalidUserId => {
                let outcome = self.create_trader(TRUNCATED_USER_ID, &random_email()).await;
                navigator::expect_error(recorder, &outcome, "user_id must be a valid UUID", label);
            }
            TraderCase::EmptyEmail => {
                let outcome = self.create_trader(&Uuid::new_v4().to_string(), "").await;
                navigator::expect_error(
                    recorder,
                    &outcome,
                    "email must be at least 1 character long",
                    label,
                );
            }
            TraderCase::LongEmail => {
                let email = format!("{}@test.com", "a".repeat(247));
                let outcome = self.create_trader(&Uuid::new_v4().to_string(), &email).await;
                navigator::expect_error(
                    recorder,
                    &outcome,
                    "email must be at most 255 characters long",
                    label,
                );
            }
            TraderCase::RegisterEnabled => self.register(STATUS_ENABLED, label, recorder).await?,
            TraderCase::RegisterDisabled => self.register(STATUS_DISABLED, label, recorder).await?,
            TraderCase::RegisterInvalidStatus => {
                let user_id = Uuid::new_v4().to_string();
                self.create_or_bail(&user_id, &random_email()).await?;
                for status in UNREGISTRABLE_STATUSES {
                    let outcome = self
                        .client
                        .rpc("RegisterTrader", register_request(&user_id, status))
                        .await;
                    navigator::expect_error(
                        recorder,
                        &outcome,
                        "register trader can only set status to ENABLED or DISABLED",
                        &format!("{label} ({status})"),
                    );
                }
            }
        }
        Ok(())
    }

    async fn get_trader(&self, trader_id: &str) -> TestOutcome {
        self.client
            .rpc("GetTrader", json!({ "trader_id": trader_id }))
            .await
    }

    async fn create_trader(&self, user_id: &str, email: &str) -> TestOutcome {
        self.client
            .post(CREATE_TRADER_PATH, json!({ "user_id": user_id, "email": email }))
            .await
    }

    /// Create a trader a scenario depends on
    async fn create_or_bail(&self, user_id: &str, email: &str) -> Result<()> {
        let outcome = self.create_trader(user_id, email).await;
        if !outcome.is_success() {
            bail!("createTrader for {} failed: {}", user_id, outcome.error_message());
        }
        Ok(())
    }

    async fn get(&self, label: &str, recorder: &mut Recorder) {
        let trader_id = self.client.config().fixtures.trader_id.clone();
        let outcome = self.get_trader(&trader_id).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "getTraderResponse", label) else {
            return;
        };
        let Some(trader) = navigator::object(recorder, inner, "trader", label) else {
            return;
        };
        Schema::new()
            .present(TRADER_FIELDS)
            .equals("id", trader_id.as_str())
            .not_empty("email")
            .equals("traderStatus", STATUS_ENABLED)
            .not_empty("createdAt")
            .not_empty("updatedAt")
            .check(recorder, trader, label);
        if let Some(typed) = navigator::decode::<Trader>(recorder, trader, label) {
            recorder.check(
                !typed.has_active_sessions,
                format!("{label}: no active sessions"),
                format!("trader {} has active sessions", typed.id),
            );
        }
    }

    async fn list(&self, label: &str, recorder: &mut Recorder) {
        let outcome = self.client.rpc("GetTraders", json!({})).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "getTradersResponse", label)
        else {
            return;
        };
        let Some(traders) = navigator::collection(recorder, inner, "traders", label) else {
            return;
        };
        Schema::new()
            .present(TRADER_FIELDS)
            .uuid("id")
            .not_empty("email")
            .check(recorder, &traders[0], &format!("{label}[0]"));

        let total = inner.get("totalCount").and_then(as_count);
        recorder.check(
            total.map(|t| t >= traders.len() as u64).unwrap_or(false),
            format!("{label}: totalCount covers {} traders", traders.len()),
            format!("totalCount is {:?}", inner.get("totalCount")),
        );
    }

    /// Every trader, or `None` after recording why the listing failed
    async fn all_traders(&self, label: &str, recorder: &mut Recorder) -> Option<(Vec<Value>, u64)> {
        let paginator = Paginator::new(
            self.client.clone(),
            self.client.config().polling.page_size,
        );
        match paginator
            .scan("GetTraders", "getTradersResponse", "traders")
            .await
        {
            Ok(scan) => {
                if let Some(drift) = scan.drift {
                    recorder.warn(format!("{label}: full listing"), drift.to_string());
                }
                Some((scan.items, scan.total_count))
            }
            Err(e) => {
                recorder.fail(format!("{label}: full listing"), e.to_string());
                None
            }
        }
    }

    async fn ordered(&self, field: &str, descending: bool, label: &str, recorder: &mut Recorder) {
        let Some((mut expected, total)) = self.all_traders(label, recorder).await else {
            return;
        };
        expected.sort_by(|a, b| {
            let a = a[field].as_str().unwrap_or_default();
            let b = b[field].as_str().unwrap_or_default();
            if descending {
                b.cmp(a)
            } else {
                a.cmp(b)
            }
        });

        let request = json!({ "order": { "order_by": field, "order_desc": descending } });
        let outcome = self.client.rpc("GetTraders", request).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "getTradersResponse", label)
        else {
            return;
        };
        let Some(traders) = navigator::collection(recorder, inner, "traders", label) else {
            return;
        };

        recorder.assert_equal(
            traders[0]["id"].clone(),
            expected.first().map(|t| t["id"].clone()).unwrap_or(Value::Null),
            format!("{label}: first trader"),
        );
        recorder.assert_equal(
            inner.get("totalCount").and_then(as_count),
            Some(total),
            format!("{label}: totalCount"),
        );
        let direction = if descending { "desc" } else { "asc" };
        let unsorted = first_unsorted(traders, field, descending);
        recorder.check(
            unsorted.is_none(),
            format!("{label}: sorted by {field} {direction}"),
            format!("out of order at index {}", unsorted.unwrap_or_default()),
        );
    }

    async fn paginated(&self, label: &str, recorder: &mut Recorder) {
        let Some((all, total)) = self.all_traders(label, recorder).await else {
            return;
        };
        let offset = PAGE_OFFSET as usize;
        if all.len() <= offset {
            recorder.warn(
                format!("{label}: page comparison"),
                format!("only {} traders, nothing to page past", all.len()),
            );
            return;
        }

        let outcome = self
            .client
            .rpc("GetTraders", pagination(PAGE_LIMIT, PAGE_OFFSET))
            .await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "getTradersResponse", label)
        else {
            return;
        };
        let Some(page) = navigator::collection(recorder, inner, "traders", label) else {
            return;
        };

        recorder.assert_equal(
            page[0]["id"].clone(),
            all[offset]["id"].clone(),
            format!("{label}: page starts at trader {offset}"),
        );
        recorder.assert_equal(
            inner.get("totalCount").and_then(as_count),
            Some(total),
            format!("{label}: totalCount unaffected by pagination"),
        );
        let expected_len = (PAGE_LIMIT as usize).min(all.len() - offset);
        recorder.assert_equal(
            page.len(),
            expected_len,
            format!("{label}: page holds {expected_len} traders"),
        );
    }

    async fn create(&self, label: &str, recorder: &mut Recorder) {
        let user_id = Uuid::new_v4().to_string();
        let outcome = self.create_trader(&user_id, &random_email()).await;
        let Some(response) = outcome.payload() else {
            recorder.fail(format!("{label}: request succeeded"), outcome.error_message());
            return;
        };
        Schema::new()
            .present(&["status", "trader_id"])
            .equals("status", "created")
            .uuid("trader_id")
            .equals("trader_id", user_id.as_str())
            .check(recorder, response, label);
    }

    async fn register(&self, status: &str, label: &str, recorder: &mut Recorder) -> Result<()> {
        let user_id = Uuid::new_v4().to_string();
        let email = random_email();
        self.create_or_bail(&user_id, &email).await?;

        let outcome = self
            .client
            .rpc("RegisterTrader", register_request(&user_id, status))
            .await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "registerTraderResponse", label)
        else {
            return Ok(());
        };
        let Some(trader) = navigator::object(recorder, inner, "trader", label) else {
            return Ok(());
        };
        Schema::new()
            .present(TRADER_FIELDS)
            .equals("id", user_id.as_str())
            .equals("email", email.as_str())
            .equals("traderStatus", status)
            .equals("hasActiveSessions", false)
            .equals("commissionPayin", 4.53)
            .equals("commissionPayout", 2.21)
            .equals("currencyId", 3)
            .equals("regionId", 8)
            .check(recorder, trader, label);
        Ok(())
    }
}

fn register_request(trader_id: &str, status: &str) -> Value {
    json!({
        "commission_payin": 4.53,
        "commission_payout": 2.21,
        "currency_id": 3,
        "region_id": 8,
        "trader_id": trader_id,
        "trader_status": status
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::models::Scenario;
    use crate::transport::fake::FakeGateway;
    use crate::transport::TransportError;
    use std::sync::Arc;

    fn setup() -> (Arc<FakeGateway>, GatewayClient) {
        let gateway = Arc::new(FakeGateway::new());
        let mut config = HarnessConfig::default();
        config.polling.page_size = 3;
        let client = GatewayClient::new(gateway.clone(), config);
        (gateway, client)
    }

    async fn run(client: &GatewayClient, case: TraderCase) -> Result<Recorder> {
        let mut recorder = Recorder::new();
        let label = Scenario::Trader(case).name();
        TraderSuite::new(client.clone())
            .run(case, &label, &mut recorder)
            .await?;
        Ok(recorder)
    }

    #[tokio::test]
    async fn test_every_trader_scenario_passes() {
        let (_, client) = setup();
        for case in TraderCase::all() {
            let recorder = run(&client, case).await.unwrap();
            assert!(recorder.is_clean(), "{:?}: {:?}", case, recorder.summary().failures);
        }
    }

    #[tokio::test]
    async fn test_invalid_statuses_each_get_a_check() {
        let (gateway, client) = setup();
        let recorder = run(&client, TraderCase::RegisterInvalidStatus).await.unwrap();
        assert_eq!(recorder.summary().passed, UNREGISTRABLE_STATUSES.len());
        assert_eq!(gateway.calls_to("RegisterTrader"), 4);
    }

    #[tokio::test]
    async fn test_register_setup_failure_is_an_error() {
        let client = GatewayClient::new(Arc::new(Unreachable), HarnessConfig::default());
        let err = run(&client, TraderCase::RegisterEnabled).await.unwrap_err();
        assert!(err.to_string().contains("createTrader"));
        assert!(err.to_string().contains("empty response"));
    }

    #[tokio::test]
    async fn test_paginated_compares_against_full_listing() {
        let (gateway, client) = setup();
        let recorder = run(&client, TraderCase::ListPaginated).await.unwrap();
        assert!(recorder.is_clean());
        // 8 seeded traders in pages of 3, then the offset page
        assert_eq!(gateway.calls_to("GetTraders"), 4);
    }

    struct Unreachable;

    #[async_trait::async_trait]
    impl crate::transport::Transport for Unreachable {
        async fn invoke(&self, _: &crate::transport::TransportRequest) -> TestOutcome {
            TestOutcome::failure(TransportError::EmptyResponse, "")
        }
    }
}
