//! Request payload builders
//!
//! Shared by the scenario suites and the lifecycle choreographer so every
//! offer and order is created the same way.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde_json::{json, Value};
use uuid::Uuid;

/// Trader that owns every offer the harness publishes
pub const TRADER_ID: &str = "550e8400-e29b-41d4-a716-446655440001";

/// Payment details the published offers point at
pub const TRADER_PAYMENT_DETAILS_ID: &str = "550e8400-e29b-41d4-a716-446655440021";

pub const CALLBACK_URL: &str = "http://example.com/callback";
pub const SUCCESS_URL: &str = "http://example.com/success";
pub const FAIL_URL: &str = "http://example.com/fail";

/// Money flow direction of an offer or order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    PayIn,
    PayOut,
}

impl Direction {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Direction::PayIn => "PAYIN",
            Direction::PayOut => "PAYOUT",
        }
    }

    /// Payment method orders in this direction are created with
    pub fn payment_method_id(&self) -> i64 {
        match self {
            Direction::PayIn => 2,
            Direction::PayOut => 8,
        }
    }
}

/// First eight hex digits of a fresh v4 UUID
pub fn short_hex() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub fn random_offer_name() -> String {
    format!("offer_{}", short_hex())
}

/// Random `[a-z0-9]{8}@test.com` address
pub fn random_email() -> String {
    let local: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{local}@test.com")
}

/// `{"pagination": {...}}` with limit and offset as decimal strings
pub fn pagination(limit: u32, offset: u64) -> Value {
    json!({
        "pagination": {
            "limit": limit.to_string(),
            "offset": offset.to_string()
        }
    })
}

/// PublishNewOffer request body
pub fn offer_request(direction: Direction, name: &str) -> Value {
    match direction {
        Direction::PayIn => json!({
            "pay_in_offer": {
                "allow_no_issuer_pools": true,
                "allow_same_amount_orders": true,
                "amount": "1000000",
                "max_order_size": "1000000",
                "min_order_size": "20000",
                "name": name,
                "trader_id": TRADER_ID,
                "trader_payment_details_id": TRADER_PAYMENT_DETAILS_ID
            }
        }),
        Direction::PayOut => json!({
            "pay_out_offer": {
                "allow_no_issuer_pools": true,
                "allow_same_amount_orders": true,
                "amount": "1000000",
                "max_order_size": "1000000",
                "min_order_size": "10000",
                "name": name,
                "payment_method_type_id": 2,
                "trader_id": TRADER_ID
            }
        }),
    }
}

/// Payout order payment details
pub const PAYOUT_DETAILS_VALUE: &str = "123";
pub const PAYOUT_ISSUER_ID: i64 = 1;

/// CreateOrder request builder
#[derive(Clone, Debug)]
pub struct OrderRequest {
    pub direction: Direction,
    pub company_id: i64,
    pub amount: i64,
    pub external_order_id: String,
}

impl OrderRequest {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            company_id: 1,
            amount: 12000,
            external_order_id: format!("external_id_{}", short_hex()),
        }
    }

    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    pub fn company(mut self, company_id: i64) -> Self {
        self.company_id = company_id;
        self
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "company_id": self.company_id,
            "external_client_id": Uuid::new_v4().to_string(),
            "external_order_id": self.external_order_id,
            "amount": self.amount,
            "callback_url": CALLBACK_URL,
            "success_url": SUCCESS_URL,
            "fail_url": FAIL_URL,
            "correlation_id": "random",
            "payment_method_id": self.direction.payment_method_id()
        });
        if self.direction == Direction::PayOut {
            body["payment_details"] = json!({
                "payment_details_value": PAYOUT_DETAILS_VALUE,
                "payment_details_auxiliary_data": PAYOUT_DETAILS_VALUE,
                "payment_details_owner_name": PAYOUT_DETAILS_VALUE,
                "issuer_id": PAYOUT_ISSUER_ID,
                "issuer_name": PAYOUT_DETAILS_VALUE
            });
        }
        body
    }
}
