//! Gateway configuration catalog scenarios
//!
//! Currencies, regions, issuers, payment method types and payment methods are
//! read-only resources with the same get/list surface, so one suite covers all
//! five through a shape table.

use anyhow::Result;
use serde_json::{json, Value};
use std::cmp::Ordering;
use tracing::debug;

use crate::config::Fixtures;
use crate::models::payload::pagination;
use crate::models::{CatalogCase, CatalogEntity, SortKey};
use crate::navigator::{self, as_count, scalar_text, Schema};
use crate::reconciler::Paginator;
use crate::recorder::Recorder;
use crate::transport::GatewayClient;

/// Page requested by the pagination scenarios
const PAGE_LIMIT: u32 = 2;
const PAGE_OFFSET: u64 = 1;

/// Currency the payment method filter selects
const FILTER_CURRENCY_ID: i64 = 3;

/// Wire shape of one catalog resource
#[derive(Clone, Copy, Debug)]
pub struct CatalogShape {
    pub get_method: &'static str,
    pub list_method: &'static str,
    pub get_envelope: &'static str,
    pub item_key: &'static str,
    pub list_envelope: &'static str,
    pub list_key: &'static str,
    pub fields: &'static [&'static str],
    pub not_found: &'static str,
    /// Id no deployment is seeded with
    pub missing_id: i64,
}

impl CatalogShape {
    pub fn of(entity: CatalogEntity) -> Self {
        match entity {
            CatalogEntity::Currency => Self {
                get_method: "GetCurrency",
                list_method: "GetCurrencies",
                get_envelope: "getCurrencyResponse",
                item_key: "currency",
                list_envelope: "getCurrenciesResponse",
                list_key: "currencies",
                fields: &["id", "code", "currencyDecimalAccuracy", "isAccountCurrency"],
                not_found: "currency not found",
                missing_id: 100,
            },
            CatalogEntity::Region => Self {
                get_method: "GetRegion",
                list_method: "GetRegions",
                get_envelope: "getRegionResponse",
                item_key: "region",
                list_envelope: "getRegionsResponse",
                list_key: "regions",
                fields: &["id", "title"],
                not_found: "region not found",
                missing_id: 100,
            },
            CatalogEntity::Issuer => Self {
                get_method: "GetIssuer",
                list_method: "GetIssuers",
                get_envelope: "getIssuerResponse",
                item_key: "issuer",
                list_envelope: "getIssuersResponse",
                list_key: "issuers",
                fields: &["id", "issuerName", "issuerCode", "issuerType"],
                not_found: "issuer not found",
                missing_id: 217,
            },
            CatalogEntity::PaymentMethodType => Self {
                get_method: "GetPaymentMethodType",
                list_method: "GetPaymentMethodTypes",
                get_envelope: "getPaymentMethodTypeResponse",
                item_key: "paymentMethodType",
                list_envelope: "getPaymentMethodTypesResponse",
                list_key: "paymentMethodTypes",
                fields: &["id", "paymentMethodTypeName", "validationRules"],
                not_found: "payment method type not found",
                missing_id: 1000,
            },
            CatalogEntity::PaymentMethod => Self {
                get_method: "GetPaymentMethod",
                list_method: "GetPaymentMethods",
                get_envelope: "getPaymentMethodResponse",
                item_key: "paymentMethod",
                list_envelope: "getPaymentMethodsResponse",
                list_key: "paymentMethods",
                fields: &[
                    "id",
                    "name",
                    "description",
                    "currencyId",
                    "regionId",
                    "direction",
                    "isActive",
                    "issuerIds",
                    "paymentMethodCode",
                    "paymentMethodLogoId",
                    "paymentMethodTypeId",
                ],
                not_found: "payment method not found",
                missing_id: 1000,
            },
        }
    }

    fn schema(&self) -> Schema {
        Schema::new().present(self.fields)
    }
}

/// Id of the seeded entity the get-one scenario reads
fn fixture_id(entity: CatalogEntity, fixtures: &Fixtures) -> i64 {
    match entity {
        CatalogEntity::Currency => fixtures.currency_id,
        CatalogEntity::Region => fixtures.region_id,
        CatalogEntity::Issuer => fixtures.issuer_id,
        CatalogEntity::PaymentMethodType => fixtures.payment_method_type_id,
        CatalogEntity::PaymentMethod => fixtures.payment_method_id,
    }
}

/// Compare two field values numerically when both are numbers, otherwise as
/// case-insensitive text
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => {
            let text = |v: &Value| scalar_text(v).unwrap_or_default().to_lowercase();
            text(a).cmp(&text(b))
        }
    }
}

/// Index of the first item out of order, if any
pub fn first_unsorted(items: &[Value], field: &str, descending: bool) -> Option<usize> {
    items.windows(2).position(|pair| {
        let ordering = compare_values(&pair[0][field], &pair[1][field]);
        if descending {
            ordering == Ordering::Less
        } else {
            ordering == Ordering::Greater
        }
    })
}

fn ids(items: &[Value]) -> Vec<Value> {
    items.iter().map(|item| item["id"].clone()).collect()
}

/// Catalog scenarios for every entity
pub struct CatalogSuite {
    client: GatewayClient,
}

impl CatalogSuite {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    pub async fn run(
        &self,
        entity: CatalogEntity,
        case: CatalogCase,
        label: &str,
        recorder: &mut Recorder,
    ) -> Result<()> {
        let shape = CatalogShape::of(entity);
        match case {
            CatalogCase::Get => self.get(entity, &shape, label, recorder).await,
            CatalogCase::NotFound => self.not_found(&shape, label, recorder).await,
            CatalogCase::List => self.list(&shape, label, recorder).await,
            CatalogCase::Ordered(key) => self.ordered(&shape, key, label, recorder).await,
            CatalogCase::Paginated => self.paginated(&shape, label, recorder).await,
            CatalogCase::Filtered => self.filtered(&shape, label, recorder).await,
        }
        Ok(())
    }

    async fn get(
        &self,
        entity: CatalogEntity,
        shape: &CatalogShape,
        label: &str,
        recorder: &mut Recorder,
    ) {
        let id = fixture_id(entity, &self.client.config().fixtures);
        let outcome = self.client.rpc(shape.get_method, json!({ "id": id })).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, shape.get_envelope, label) else {
            return;
        };
        if let Some(item) = navigator::object(recorder, inner, shape.item_key, label) {
            shape.schema().equals("id", id).check(recorder, item, label);
        }
    }

    async fn not_found(&self, shape: &CatalogShape, label: &str, recorder: &mut Recorder) {
        let outcome = self
            .client
            .rpc(shape.get_method, json!({ "id": shape.missing_id }))
            .await;
        navigator::expect_error(recorder, &outcome, shape.not_found, label);
    }

    async fn list(&self, shape: &CatalogShape, label: &str, recorder: &mut Recorder) {
        let outcome = self.client.rpc(shape.list_method, json!({})).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, shape.list_envelope, label)
        else {
            return;
        };
        let Some(items) = navigator::collection(recorder, inner, shape.list_key, label) else {
            return;
        };
        shape.schema().check(recorder, &items[0], &format!("{label}[0]"));

        let total = inner.get("totalCount").and_then(as_count);
        recorder.check(
            total.map(|t| t >= items.len() as u64).unwrap_or(false),
            format!("{label}: totalCount covers {} items", items.len()),
            format!("totalCount is {:?}", inner.get("totalCount")),
        );
    }

    async fn ordered(
        &self,
        shape: &CatalogShape,
        key: SortKey,
        label: &str,
        recorder: &mut Recorder,
    ) {
        let request = json!({
            "order": { "order_by": key.order_by, "order_desc": key.descending }
        });
        let outcome = self.client.rpc(shape.list_method, request).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, shape.list_envelope, label)
        else {
            return;
        };
        let Some(items) = navigator::collection(recorder, inner, shape.list_key, label) else {
            return;
        };

        let direction = if key.descending { "desc" } else { "asc" };
        let unsorted = first_unsorted(items, key.field, key.descending);
        recorder.check(
            unsorted.is_none(),
            format!("{label}: sorted by {} {direction}", key.field),
            match unsorted {
                Some(i) => format!(
                    "items {i} and {} out of order: {} then {}",
                    i + 1,
                    items[i][key.field],
                    items[i + 1][key.field]
                ),
                None => String::new(),
            },
        );
    }

    async fn paginated(&self, shape: &CatalogShape, label: &str, recorder: &mut Recorder) {
        let paginator = Paginator::new(
            self.client.clone(),
            self.client.config().polling.page_size,
        );
        let full = match paginator
            .scan(shape.list_method, shape.list_envelope, shape.list_key)
            .await
        {
            Ok(full) => full,
            Err(e) => {
                recorder.fail(format!("{label}: full listing"), e.to_string());
                return;
            }
        };
        if let Some(drift) = full.drift {
            recorder.warn(format!("{label}: full listing"), drift.to_string());
        }
        debug!("{}: {} items across {} pages", label, full.items.len(), full.pages);

        let offset = PAGE_OFFSET as usize;
        if full.items.len() <= offset {
            recorder.warn(
                format!("{label}: page comparison"),
                format!("only {} items, nothing to page past", full.items.len()),
            );
            return;
        }

        let outcome = self
            .client
            .rpc(shape.list_method, pagination(PAGE_LIMIT, PAGE_OFFSET))
            .await;
        let Some(inner) = navigator::envelope(recorder, &outcome, shape.list_envelope, label)
        else {
            return;
        };
        let Some(page) = navigator::collection(recorder, inner, shape.list_key, label) else {
            return;
        };

        let end = (offset + PAGE_LIMIT as usize).min(full.items.len());
        recorder.assert_equal(
            ids(page),
            ids(&full.items[offset..end]),
            format!("{label}: page matches items {offset}..{end} of the full list"),
        );
        let latest_total = full.drift.map_or(full.total_count, |drift| drift.latest);
        recorder.assert_equal(
            inner.get("totalCount").and_then(as_count),
            Some(latest_total),
            format!("{label}: totalCount unaffected by pagination"),
        );
    }

    async fn filtered(&self, shape: &CatalogShape, label: &str, recorder: &mut Recorder) {
        let request = json!({ "filter": { "currency_id": FILTER_CURRENCY_ID } });
        let outcome = self.client.rpc(shape.list_method, request).await;
        let Some(inner) = navigator::envelope(recorder, &outcome, shape.list_envelope, label)
        else {
            return;
        };
        let Some(items) = navigator::collection(recorder, inner, shape.list_key, label) else {
            return;
        };

        recorder.assert_equal(
            inner.get("totalCount").and_then(as_count),
            Some(items.len() as u64),
            format!("{label}: totalCount equals filtered items"),
        );
        let strays: Vec<Value> = items
            .iter()
            .filter(|item| item["currencyId"].as_i64() != Some(FILTER_CURRENCY_ID))
            .map(|item| item["id"].clone())
            .collect();
        recorder.check(
            strays.is_empty(),
            format!("{label}: every item has currencyId {FILTER_CURRENCY_ID}"),
            format!("items with another currency: {strays:?}"),
        );
    }
}
