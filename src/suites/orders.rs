//! Order creation scenarios

use anyhow::Result;
use serde_json::Value;
use tracing::info;

use crate::models::payload::{Direction, OrderRequest, PAYOUT_DETAILS_VALUE, PAYOUT_ISSUER_ID};
use crate::models::{order_status, Order, OrderCase};
use crate::navigator::{self, Schema};
use crate::recorder::Recorder;
use crate::transport::GatewayClient;

/// Amounts just outside the accepted order range
pub const BELOW_MIN_AMOUNT: i64 = 10;
pub const ABOVE_MAX_AMOUNT: i64 = 50001;

/// Company id no merchant is registered under
const UNKNOWN_COMPANY_ID: i64 = 100;

const INVALID_AMOUNT: &str = "INVALID_AMOUNT";

pub struct OrderSuite {
    client: GatewayClient,
}

impl OrderSuite {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub async fn run(&self, case: OrderCase, label: &str, recorder: &mut Recorder) -> Result<()> {
        match case {
            OrderCase::PayIn => self.create(Direction::PayIn, label, recorder).await,
            OrderCase::PayOut => self.create(Direction::PayOut, label, recorder).await,
            OrderCase::MinAmount => self.declined(BELOW_MIN_AMOUNT, label, recorder).await,
            OrderCase::MaxAmount => self.declined(ABOVE_MAX_AMOUNT, label, recorder).await,
            OrderCase::UnknownCompany => {
                let request = OrderRequest::new(Direction::PayIn).company(UNKNOWN_COMPANY_ID);
                let outcome = self.client.rpc("CreateOrder", request.to_json()).await;
                navigator::expect_error(recorder, &outcome, "invalid company id", label);
            }
        }
        Ok(())
    }

    async fn create(&self, direction: Direction, label: &str, recorder: &mut Recorder) {
        let request = OrderRequest::new(direction);
        let outcome = self.client.rpc("CreateOrder", request.to_json()).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "createOrderResponse", label)
        else {
            return;
        };
        let Some(order) = navigator::object(recorder, inner, "order", label) else {
            return;
        };

        Schema::new()
            .present(&["orderId", "amount", "status", "externalOrderId", "createdAt"])
            .uuid("orderId")
            .equals("amount", request.amount.to_string())
            .equals("status", order_status::PENDING)
            .equals("externalOrderId", request.external_order_id.as_str())
            .check(recorder, order, label);
        if let Some(created) = navigator::decode::<Order>(recorder, order, label) {
            info!("{}: created order {} ({})", label, created.order_id, created.status);
        }

        let details_label = format!("{label}.paymentDetails");
        let Some(details) = navigator::object(recorder, order, "paymentDetails", label) else {
            return;
        };
        let mut schema = Schema::new()
            .equals("paymentDirection", direction.wire_name())
            .equals("currencyId", 3)
            .equals("paymentMethodId", direction.payment_method_id());
        if direction == Direction::PayOut {
            schema = schema
                .equals("paymentDetailsValue", PAYOUT_DETAILS_VALUE)
                .equals("paymentDetailsOwnerName", PAYOUT_DETAILS_VALUE)
                .equals("issuerId", PAYOUT_ISSUER_ID)
                .equals("issuerType", "bank");
        }
        schema.check(recorder, details, &details_label);
    }

    async fn declined(&self, amount: i64, label: &str, recorder: &mut Recorder) {
        let request = OrderRequest::new(Direction::PayIn).amount(amount);
        let outcome = self.client.rpc("CreateOrder", request.to_json()).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "createOrderResponse", label)
        else {
            return;
        };

        Schema::new()
            .equals("declineReasonCode", INVALID_AMOUNT)
            .equals("declineDescription", "Invalid order amount")
            .check(recorder, inner, label);

        let order = inner.get("order").unwrap_or(&Value::Null);
        Schema::new()
            .equals("status", order_status::DECLINED)
            .equals("declineCancelCode", INVALID_AMOUNT)
            .check(recorder, order, &format!("{label}.order"));
    }
}
