//! In-memory gateway for tests
//!
//! Implements [`Transport`] over a small model of the payment gateway: the
//! offer state machine, order creation and processing, trader onboarding and
//! the read-only configuration catalog.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

use super::{Target, TestOutcome, Transport, TransportError, TransportRequest};
use crate::models::OfferStatus;
use crate::recorder::is_uuid;

pub const SEED_TRADER_ID: &str = "550e8400-e29b-41d4-a716-446655440001";

struct FakeOffer {
    body: Value,
    direction: String,
    status: OfferStatus,
    orders: u32,
}

impl FakeOffer {
    fn id(&self) -> &str {
        self.body["id"].as_str().unwrap_or_default()
    }

    fn render(&self) -> Value {
        let mut body = self.body.clone();
        body["status"] = json!(self.status.wire_name());
        body
    }
}

struct FakeOrder {
    body: Value,
    polls: u32,
    processing_after: u32,
}

#[derive(Default)]
struct FakeState {
    /// Newest first, the way the gateway lists offers
    offers: Vec<FakeOffer>,
    orders: HashMap<String, FakeOrder>,
    users: Vec<(String, String)>,
    traders: Vec<Value>,
    calls: Vec<(String, Value)>,
    failing_methods: HashMap<String, TransportError>,
    failing_cancels: HashSet<String>,
    processing_after: u32,
    drift_after_first_page: bool,
    /// Rows appended to every catalog listing
    catalog_rows_added: usize,
}

/// Test double for the remote gateway
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGateway {
    pub fn new() -> Self {
        let traders = (1..=8)
            .map(|n| {
                json!({
                    "id": format!("550e8400-e29b-41d4-a716-44665544000{n}"),
                    "email": format!("trader{n}@test.com"),
                    "traderStatus": "TRADER_STATUS_ENABLED",
                    "hasActiveSessions": false,
                    "commissionPayin": 3,
                    "commissionPayout": 2.5,
                    "currencyId": 3,
                    "regionId": 8,
                    "createdAt": "2025-01-01T00:00:00Z",
                    "updatedAt": "2025-01-01T00:00:00Z"
                })
            })
            .collect();

        Self {
            state: Mutex::new(FakeState {
                traders,
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed an offer directly in `status`; returns its id
    pub fn seed_offer(&self, status: OfferStatus) -> String {
        let mut state = self.lock();
        let offer = new_offer("PAYIN", &format!("seed_{}", state.offers.len()), status);
        let id = offer.id().to_string();
        state.offers.insert(0, offer);
        id
    }

    /// Make every call to `method` fail with `error`
    pub fn fail_method(&self, method: &str, error: TransportError) {
        self.lock().failing_methods.insert(method.to_string(), error);
    }

    /// Make CancelOffer fail for one offer
    pub fn fail_cancel(&self, offer_id: &str) {
        self.lock().failing_cancels.insert(offer_id.to_string());
    }

    /// Orders report PENDING for the first `polls` status queries
    pub fn processing_after(&self, polls: u32) {
        self.lock().processing_after = polls;
    }

    /// Grow the listed collection right after its first page is served:
    /// GetOffers gains a new active offer, catalog listings gain one row
    pub fn drift_after_first_page(&self) {
        self.lock().drift_after_first_page = true;
    }

    pub fn offer_status(&self, offer_id: &str) -> Option<OfferStatus> {
        self.lock()
            .offers
            .iter()
            .find(|o| o.id() == offer_id)
            .map(|o| o.status)
    }

    pub fn active_offers(&self) -> usize {
        self.lock()
            .offers
            .iter()
            .filter(|o| o.status == OfferStatus::Active)
            .count()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|(m, _)| m == method).count()
    }

    /// Payloads sent to `method`, oldest first
    pub fn payloads(&self, method: &str) -> Vec<Value> {
        self.lock()
            .calls
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn handle_rpc(&self, method: &str, body: &Value) -> TestOutcome {
        let mut state = self.lock();
        state.calls.push((method.to_string(), body.clone()));
        if let Some(error) = state.failing_methods.get(method) {
            return TestOutcome::failure(error.clone(), "");
        }

        match method {
            "PublishNewOffer" => publish_offer(&mut state, body),
            "GetOffer" => with_offer(&state, body, |offer| {
                ok(json!({"getOfferResponse": {"offer": offer.render()}}))
            }),
            "GetOffers" => get_offers(&mut state, body),
            "PauseOffer" | "ReactivateOffer" | "CancelOffer" => transition(&mut state, method, body),
            "CreateOrder" => create_order(&mut state, body),
            "GetOrderById" => get_order(&mut state, body),
            "GetTrader" => get_trader(&state, body),
            "GetTraders" => ok(json!({ "getTradersResponse": list(state.traders.clone(), body, "traders") })),
            "RegisterTrader" => register_trader(&mut state, body),
            _ => match catalog(method) {
                Some(table) => {
                    let outcome = table.serve(method, body, state.catalog_rows_added);
                    if state.drift_after_first_page && method != table.get {
                        state.drift_after_first_page = false;
                        state.catalog_rows_added += 1;
                    }
                    outcome
                }
                None => rpc_error("Unimplemented", &format!("unknown method {method}")),
            },
        }
    }

    fn handle_http(&self, url: &str, body: &Value) -> TestOutcome {
        let mut state = self.lock();
        state.calls.push((url.to_string(), body.clone()));
        if !url.ends_with("/traders/createTrader") {
            return http_error("404 page not found");
        }

        let user_id = body["user_id"].as_str().unwrap_or_default().to_string();
        let email = body["email"].as_str().unwrap_or_default().to_string();

        if !is_uuid(&user_id) {
            return http_error("user_id must be a valid UUID");
        }
        if email.is_empty() {
            return http_error("email must be at least 1 character long");
        }
        if email.len() > 255 {
            return http_error("email must be at most 255 characters long");
        }
        if state.users.iter().any(|(id, _)| *id == user_id) {
            return http_error(&format!("trader already exists: user_id {user_id}"));
        }
        if state.users.iter().any(|(_, e)| *e == email) {
            return http_error(&format!("email already exists: email {email}"));
        }

        state.users.push((user_id.clone(), email));
        ok(json!({"status": "created", "trader_id": user_id}))
    }
}

#[async_trait]
impl Transport for FakeGateway {
    async fn invoke(&self, request: &TransportRequest) -> TestOutcome {
        let body = request.payload.clone().unwrap_or_else(|| json!({}));
        match &request.target {
            Target::Rpc { method } => self.handle_rpc(method, &body),
            Target::Http { url, .. } => self.handle_http(url, &body),
        }
    }
}

fn ok(payload: Value) -> TestOutcome {
    let raw = payload.to_string();
    TestOutcome::success(payload, raw)
}

/// grpcurl-style failure on stderr
fn rpc_error(code: &str, message: &str) -> TestOutcome {
    TestOutcome::failure(
        TransportError::NonZeroExit {
            code: Some(1),
            stderr: format!("ERROR:\n  Code: {code}\n  Message: {message}"),
        },
        "",
    )
}

/// Plain-text HTTP error body on a zero exit status
fn http_error(message: &str) -> TestOutcome {
    TestOutcome::failure(
        TransportError::Parse("expected value at line 1 column 1".to_string()),
        message,
    )
}

fn new_offer(direction: &str, name: &str, status: OfferStatus) -> FakeOffer {
    let min_order_size = if direction == "PAYIN" { "20000" } else { "10000" };
    let mut body = json!({
        "id": Uuid::new_v4().to_string(),
        "name": name,
        "directionType": direction,
        "traderId": SEED_TRADER_ID,
        "traderAccountId": "7a1f0c1e-3b7e-4f43-9d8e-2f1c0b9a8e71",
        "currencyId": "3",
        "regionId": "8",
        "issuerId": "",
        "paymentMethodTypeId": "2",
        "maxOrderSize": "1000000",
        "minOrderSize": min_order_size,
        "offerAmount": "1000000",
        "ordersOnHold": "",
        "allowSameAmountOrders": true,
        "allowAnyBank": true,
        "orderLastProcessingTs": null,
        "offerCommission": 3,
        "offerCommissionScore": 97
    });
    if direction == "PAYIN" {
        body["traderPaymentDetailsId"] = json!("550e8400-e29b-41d4-a716-446655440021");
    }
    FakeOffer {
        body,
        direction: direction.to_string(),
        status,
        orders: 0,
    }
}

fn publish_offer(state: &mut FakeState, body: &Value) -> TestOutcome {
    let (direction, request) = match (body.get("pay_in_offer"), body.get("pay_out_offer")) {
        (Some(offer), None) => ("PAYIN", offer),
        (None, Some(offer)) => ("PAYOUT", offer),
        _ => return rpc_error("InvalidArgument", "exactly one of pay_in_offer or pay_out_offer is required"),
    };
    let name = request["name"].as_str().unwrap_or_default();
    let mut offer = new_offer(direction, name, OfferStatus::Active);
    for (field, key) in [
        ("maxOrderSize", "max_order_size"),
        ("minOrderSize", "min_order_size"),
        ("offerAmount", "amount"),
    ] {
        if let Some(value) = request.get(key) {
            offer.body[field] = value.clone();
        }
    }
    let rendered = offer.render();
    state.offers.insert(0, offer);
    ok(json!({"getOfferResponse": {"offer": rendered}}))
}

fn with_offer(state: &FakeState, body: &Value, f: impl FnOnce(&FakeOffer) -> TestOutcome) -> TestOutcome {
    let id = body["offer_id"].as_str().unwrap_or_default();
    match state.offers.iter().find(|o| o.id() == id) {
        Some(offer) => f(offer),
        None => rpc_error("NotFound", "offer not found"),
    }
}

fn get_offers(state: &mut FakeState, body: &Value) -> TestOutcome {
    let offers = state.offers.iter().map(FakeOffer::render).collect();
    let response = ok(json!({ "getOffersResponse": list(offers, body, "offers") }));
    if state.drift_after_first_page {
        state.drift_after_first_page = false;
        let extra = new_offer("PAYIN", "concurrent", OfferStatus::Active);
        state.offers.insert(0, extra);
    }
    response
}

fn transition(state: &mut FakeState, method: &str, body: &Value) -> TestOutcome {
    let id = body["offer_id"].as_str().unwrap_or_default().to_string();
    if method == "CancelOffer" && state.failing_cancels.contains(&id) {
        return rpc_error("Internal", "cancel failed");
    }
    let Some(offer) = state.offers.iter_mut().find(|o| o.id() == id) else {
        return rpc_error("NotFound", "offer not found");
    };

    let next = match (method, offer.status) {
        ("PauseOffer", OfferStatus::Active) => OfferStatus::OnHold,
        ("ReactivateOffer", OfferStatus::OnHold) => OfferStatus::Active,
        ("CancelOffer", OfferStatus::Active | OfferStatus::OnHold) if offer.orders > 0 => {
            OfferStatus::Inactive
        }
        ("CancelOffer", OfferStatus::Active | OfferStatus::OnHold) => OfferStatus::Canceled,
        _ => return rpc_error("FailedPrecondition", "invalid offer status transition"),
    };
    offer.status = next;
    ok(json!({"getOfferResponse": {"offer": offer.render()}}))
}

fn create_order(state: &mut FakeState, body: &Value) -> TestOutcome {
    if body["company_id"].as_i64() != Some(1) {
        return rpc_error("NotFound", "invalid company id");
    }
    let direction = match body["payment_method_id"].as_i64() {
        Some(8) => "PAYOUT",
        _ => "PAYIN",
    };
    let amount = body["amount"].as_i64().unwrap_or_default();
    let order_id = Uuid::new_v4().to_string();

    let mut details = json!({
        "paymentDirection": direction,
        "currencyId": 3,
        "paymentMethodId": body["payment_method_id"].clone(),
    });
    if let Some(Value::Object(sent)) = body.get("payment_details") {
        for (key, field) in [
            ("payment_details_value", "paymentDetailsValue"),
            ("payment_details_auxiliary_data", "paymentDetailsAuxiliaryData"),
            ("payment_details_owner_name", "paymentDetailsOwnerName"),
            ("issuer_id", "issuerId"),
            ("issuer_name", "issuerName"),
        ] {
            if let Some(value) = sent.get(key) {
                details[field] = value.clone();
            }
        }
        details["issuerType"] = json!("bank");
    }

    let mut order = json!({
        "orderId": order_id,
        "amount": amount.to_string(),
        "externalOrderId": body["external_order_id"].clone(),
        "createdAt": "2025-01-01T00:00:00Z",
        "paymentDetails": details,
    });

    if !(100..=50000).contains(&amount) {
        order["status"] = json!("DECLINED");
        order["declineCancelCode"] = json!("INVALID_AMOUNT");
        return ok(json!({
            "createOrderResponse": {
                "order": order,
                "declineReasonCode": "INVALID_AMOUNT",
                "declineDescription": "Invalid order amount"
            }
        }));
    }

    order["status"] = json!("PENDING");
    if let Some(offer) = state
        .offers
        .iter_mut()
        .find(|o| o.status == OfferStatus::Active && o.direction == direction)
    {
        offer.orders += 1;
    }
    let processing_after = state.processing_after;
    state.orders.insert(
        order_id,
        FakeOrder {
            body: order.clone(),
            polls: 0,
            processing_after,
        },
    );
    ok(json!({"createOrderResponse": {"order": order}}))
}

fn get_order(state: &mut FakeState, body: &Value) -> TestOutcome {
    let id = body["order_id"].as_str().unwrap_or_default();
    let Some(order) = state.orders.get_mut(id) else {
        return rpc_error("NotFound", "order not found");
    };
    order.polls += 1;
    let status = if order.polls > order.processing_after {
        "PROCESSING"
    } else {
        "PENDING"
    };
    let mut rendered = order.body.clone();
    rendered["status"] = json!(status);
    ok(json!({"getOrderByIdResponse": {"order": rendered}}))
}

fn get_trader(state: &FakeState, body: &Value) -> TestOutcome {
    let id = body["trader_id"].as_str().unwrap_or_default();
    if !is_uuid(id) {
        return rpc_error("InvalidArgument", "trader id is not valid");
    }
    match state.traders.iter().find(|t| t["id"] == id) {
        Some(trader) => ok(json!({"getTraderResponse": {"trader": trader}})),
        None => rpc_error("NotFound", "trader not found"),
    }
}

fn register_trader(state: &mut FakeState, body: &Value) -> TestOutcome {
    let status = body["trader_status"].as_str().unwrap_or_default();
    if !matches!(status, "TRADER_STATUS_ENABLED" | "TRADER_STATUS_DISABLED") {
        return rpc_error(
            "InvalidArgument",
            "register trader can only set status to ENABLED or DISABLED",
        );
    }
    let id = body["trader_id"].as_str().unwrap_or_default();
    let Some((_, email)) = state.users.iter().find(|(user, _)| user == id) else {
        return rpc_error("NotFound", "trader not found");
    };
    let trader = json!({
        "id": id,
        "email": email,
        "traderStatus": status,
        "hasActiveSessions": false,
        "commissionPayin": body["commission_payin"].clone(),
        "commissionPayout": body["commission_payout"].clone(),
        "currencyId": body["currency_id"].clone(),
        "regionId": body["region_id"].clone(),
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
    });
    state.traders.push(trader.clone());
    ok(json!({"registerTraderResponse": {"trader": trader}}))
}

fn snake_to_camel(name: &str) -> String {
    let mut out = String::new();
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a
            .as_str()
            .unwrap_or_default()
            .cmp(b.as_str().unwrap_or_default()),
    }
}

/// Apply filter, order and pagination; render `{key: [...], totalCount}`
fn list(mut items: Vec<Value>, body: &Value, key: &str) -> Value {
    if let Some(Value::Object(filter)) = body.get("filter") {
        items.retain(|item| {
            filter
                .iter()
                .all(|(field, expected)| item.get(snake_to_camel(field)) == Some(expected))
        });
    }

    if let Some(order) = body.get("order") {
        let field = snake_to_camel(order["order_by"].as_str().unwrap_or("id"));
        let descending = order["order_desc"].as_bool().unwrap_or(false);
        items.sort_by(|a, b| {
            let ordering = compare(&a[&field], &b[&field]);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    let total = items.len();
    let paged: Vec<Value> = match body.get("pagination") {
        Some(pagination) => {
            let number = |k: &str| {
                pagination[k]
                    .as_str()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(0)
            };
            let limit = match number("limit") {
                0 => usize::MAX,
                n => n,
            };
            items.into_iter().skip(number("offset")).take(limit).collect()
        }
        None => items,
    };

    let mut rendered = Map::new();
    rendered.insert(key.to_string(), Value::Array(paged));
    rendered.insert("totalCount".to_string(), json!(total.to_string()));
    Value::Object(rendered)
}

/// One read-only catalog resource
struct CatalogTable {
    get: &'static str,
    get_envelope: &'static str,
    item_key: &'static str,
    list_envelope: &'static str,
    list_key: &'static str,
    not_found: &'static str,
    rows: fn() -> Vec<Value>,
}

impl CatalogTable {
    /// `added` extra rows are appended to listings, copies of the last row
    fn serve(&self, method: &str, body: &Value, added: usize) -> TestOutcome {
        if method == self.get {
            let id = body["id"].clone();
            return match (self.rows)().into_iter().find(|row| row["id"] == id) {
                Some(row) => ok(json!({ self.get_envelope: { self.item_key: row } })),
                None => rpc_error("NotFound", self.not_found),
            };
        }
        let mut rows = (self.rows)();
        if let Some(last) = rows.last().cloned() {
            rows.extend((1..=added).map(|n| {
                let mut row = last.clone();
                row["id"] = json!(1000 + n);
                row
            }));
        }
        ok(json!({ self.list_envelope: list(rows, body, self.list_key) }))
    }
}

fn catalog(method: &str) -> Option<CatalogTable> {
    let table = match method {
        "GetCurrency" | "GetCurrencies" => CatalogTable {
            get: "GetCurrency",
            get_envelope: "getCurrencyResponse",
            item_key: "currency",
            list_envelope: "getCurrenciesResponse",
            list_key: "currencies",
            not_found: "currency not found",
            rows: currencies,
        },
        "GetRegion" | "GetRegions" => CatalogTable {
            get: "GetRegion",
            get_envelope: "getRegionResponse",
            item_key: "region",
            list_envelope: "getRegionsResponse",
            list_key: "regions",
            not_found: "region not found",
            rows: regions,
        },
        "GetIssuer" | "GetIssuers" => CatalogTable {
            get: "GetIssuer",
            get_envelope: "getIssuerResponse",
            item_key: "issuer",
            list_envelope: "getIssuersResponse",
            list_key: "issuers",
            not_found: "issuer not found",
            rows: issuers,
        },
        "GetPaymentMethodType" | "GetPaymentMethodTypes" => CatalogTable {
            get: "GetPaymentMethodType",
            get_envelope: "getPaymentMethodTypeResponse",
            item_key: "paymentMethodType",
            list_envelope: "getPaymentMethodTypesResponse",
            list_key: "paymentMethodTypes",
            not_found: "payment method type not found",
            rows: payment_method_types,
        },
        "GetPaymentMethod" | "GetPaymentMethods" => CatalogTable {
            get: "GetPaymentMethod",
            get_envelope: "getPaymentMethodResponse",
            item_key: "paymentMethod",
            list_envelope: "getPaymentMethodsResponse",
            list_key: "paymentMethods",
            not_found: "payment method not found",
            rows: payment_methods,
        },
        _ => return None,
    };
    Some(table)
}

fn currencies() -> Vec<Value> {
    [
        (1, "USD", 2, true),
        (2, "EUR", 2, false),
        (3, "RUB", 2, true),
        (4, "KZT", 2, true),
        (13, "UZS", 2, true),
        (14, "INR", 2, true),
        (15, "BTC", 8, false),
    ]
    .into_iter()
    .map(|(id, code, accuracy, account)| {
        json!({"id": id, "code": code, "currencyDecimalAccuracy": accuracy, "isAccountCurrency": account})
    })
    .collect()
}

fn regions() -> Vec<Value> {
    [(1, "Russia"), (3, "Kazakhstan"), (8, "Uzbekistan"), (9, "India")]
        .into_iter()
        .map(|(id, title)| json!({"id": id, "title": title}))
        .collect()
}

fn issuers() -> Vec<Value> {
    [(1, "Sberbank", "SBER"), (2, "Tinkoff", "TCS"), (3, "Alfa", "ALFA")]
        .into_iter()
        .map(|(id, name, code)| {
            json!({"id": id, "issuerName": name, "issuerCode": code, "issuerType": "bank"})
        })
        .collect()
}

fn payment_method_types() -> Vec<Value> {
    [(1, "card"), (2, "sbp"), (3, "account")]
        .into_iter()
        .map(|(id, name)| json!({"id": id, "paymentMethodTypeName": name, "validationRules": "{}"}))
        .collect()
}

fn payment_methods() -> Vec<Value> {
    [(1, 3, "PAYIN"), (2, 3, "PAYIN"), (3, 1, "PAYIN"), (8, 3, "PAYOUT"), (9, 4, "PAYOUT")]
        .into_iter()
        .map(|(id, currency, direction)| {
            json!({
                "id": id,
                "name": format!("method_{id}"),
                "description": "",
                "currencyId": currency,
                "regionId": 8,
                "direction": direction,
                "isActive": true,
                "issuerIds": [1, 2],
                "paymentMethodCode": format!("PM{id}"),
                "paymentMethodLogoId": "",
                "paymentMethodTypeId": 2
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn call(gateway: &FakeGateway, method: &str, body: Value) -> TestOutcome {
        gateway.invoke(&TransportRequest::rpc(method, body)).await
    }

    #[tokio::test]
    async fn test_offer_state_machine() {
        let gateway = FakeGateway::new();
        let id = gateway.seed_offer(OfferStatus::Active);

        assert!(call(&gateway, "PauseOffer", json!({"offer_id": id})).await.is_success());
        assert_eq!(gateway.offer_status(&id), Some(OfferStatus::OnHold));

        let rejected = call(&gateway, "PauseOffer", json!({"offer_id": id})).await;
        assert!(rejected.mentions("invalid offer status transition"));

        assert!(call(&gateway, "CancelOffer", json!({"offer_id": id})).await.is_success());
        assert_eq!(gateway.offer_status(&id), Some(OfferStatus::Canceled));
    }

    #[tokio::test]
    async fn test_order_makes_cancel_inactive() {
        let gateway = FakeGateway::new();
        let id = gateway.seed_offer(OfferStatus::Active);
        let order = call(
            &gateway,
            "CreateOrder",
            json!({"company_id": 1, "amount": 12000, "payment_method_id": 2}),
        )
        .await;
        assert!(order.is_success());
        call(&gateway, "CancelOffer", json!({"offer_id": id})).await;
        assert_eq!(gateway.offer_status(&id), Some(OfferStatus::Inactive));
    }

    #[test]
    fn test_list_orders_and_pages() {
        let body = json!({
            "order": {"order_by": "currency_decimal_accuracy", "order_desc": true},
            "pagination": {"limit": "2", "offset": "0"}
        });
        let rendered = list(currencies(), &body, "currencies");
        assert_eq!(rendered["totalCount"], "7");
        assert_eq!(rendered["currencies"][0]["code"], "BTC");
        assert_eq!(rendered["currencies"].as_array().map(Vec::len), Some(2));
    }
}
