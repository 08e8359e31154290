//! Offer publication and lookup scenarios

use anyhow::Result;
use serde_json::{json, Value};

use crate::models::payload::{
    offer_request, random_offer_name, Direction, TRADER_ID, TRADER_PAYMENT_DETAILS_ID,
};
use crate::models::{OfferCase, OfferStatus};
use crate::navigator::{self, as_count, Schema};
use crate::recorder::Recorder;
use crate::transport::GatewayClient;

/// Fields every rendered offer carries
const OFFER_FIELDS: &[&str] = &[
    "id",
    "name",
    "directionType",
    "currencyId",
    "paymentMethodTypeId",
    "traderId",
    "traderAccountId",
    "maxOrderSize",
    "minOrderSize",
    "offerAmount",
    "ordersOnHold",
    "allowSameAmountOrders",
    "orderLastProcessingTs",
    "offerCommission",
    "offerCommissionScore",
    "regionId",
    "issuerId",
    "status",
];

/// Fields a single-offer lookup must report exactly as the listing did
const STABLE_FIELDS: &[&str] = &[
    "id",
    "name",
    "directionType",
    "status",
    "traderId",
    "currencyId",
    "paymentMethodTypeId",
    "maxOrderSize",
    "minOrderSize",
    "offerAmount",
];

pub struct OfferSuite {
    client: GatewayClient,
}

impl OfferSuite {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub async fn run(&self, case: OfferCase, label: &str, recorder: &mut Recorder) -> Result<()> {
        match case {
            OfferCase::CreatePayIn => self.create(Direction::PayIn, label, recorder).await,
            OfferCase::CreatePayOut => self.create(Direction::PayOut, label, recorder).await,
            OfferCase::List => {
                self.list(label, recorder).await;
            }
            OfferCase::Get => self.get(label, recorder).await,
        }
        Ok(())
    }

    async fn create(&self, direction: Direction, label: &str, recorder: &mut Recorder) {
        let name = random_offer_name();
        let request = offer_request(direction, &name);
        let sent = request
            .get("pay_in_offer")
            .or_else(|| request.get("pay_out_offer"))
            .cloned()
            .unwrap_or(Value::Null);

        let outcome = self.client.rpc("PublishNewOffer", request).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "getOfferResponse", label) else {
            return;
        };
        let Some(offer) = navigator::object(recorder, inner, "offer", label) else {
            return;
        };

        let mut schema = Schema::new()
            .present(OFFER_FIELDS)
            .uuid("id")
            .uuid("traderAccountId")
            .equals("name", name.as_str())
            .equals("directionType", direction.wire_name())
            .equals("currencyId", "3")
            .equals("paymentMethodTypeId", "2")
            .equals("traderId", TRADER_ID)
            .equals("maxOrderSize", sent["max_order_size"].clone())
            .equals("minOrderSize", sent["min_order_size"].clone())
            .equals("offerAmount", sent["amount"].clone())
            .equals("allowSameAmountOrders", true)
            .equals("status", OfferStatus::Active.wire_name());
        if direction == Direction::PayIn {
            schema = schema.equals("traderPaymentDetailsId", TRADER_PAYMENT_DETAILS_ID);
        }
        schema.check(recorder, offer, label);
    }

    /// List offers and return the first one when the listing checks out
    async fn list(&self, label: &str, recorder: &mut Recorder) -> Option<Value> {
        let outcome = self.client.rpc("GetOffers", json!({})).await;
        let inner = navigator::envelope(recorder, &outcome, "getOffersResponse", label)?;
        let offers = navigator::collection(recorder, inner, "offers", label)?;

        let first = &offers[0];
        Schema::new()
            .present(&["id", "name", "directionType", "status", "traderId", "offerAmount"])
            .uuid("id")
            .check(recorder, first, &format!("{label}[0]"));

        let statuses_known = offers.iter().all(|offer| {
            offer["status"]
                .as_str()
                .and_then(OfferStatus::from_wire)
                .is_some()
        });
        recorder.check(
            statuses_known,
            format!("{label}: every offer has a known status"),
            "unrecognised offer status in listing",
        );

        let total = inner.get("totalCount").and_then(as_count);
        recorder.check(
            total.map(|t| t >= offers.len() as u64).unwrap_or(false),
            format!("{label}: totalCount covers {} offers", offers.len()),
            format!("totalCount is {:?}", inner.get("totalCount")),
        );
        Some(first.clone())
    }

    async fn get(&self, label: &str, recorder: &mut Recorder) {
        let Some(listed) = self.list(label, recorder).await else {
            return;
        };
        let Some(id) = listed["id"].as_str() else {
            recorder.fail(format!("{label}: listed offer has an id"), "id is missing");
            return;
        };

        let outcome = self.client.rpc("GetOffer", json!({ "offer_id": id })).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, "getOfferResponse", label) else {
            return;
        };
        let Some(offer) = navigator::object(recorder, inner, "offer", label) else {
            return;
        };

        let schema = STABLE_FIELDS
            .iter()
            .fold(Schema::new(), |schema, field| {
                schema.equals(field, listed[*field].clone())
            });
        schema.check(recorder, offer, &format!("{label}: GetOffer"));
    }
}
