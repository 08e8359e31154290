//! Scenario catalogue
//!
//! Every selectable scenario, grouped by the API surface it exercises.
//! Scenario names are the stable identifiers accepted by `--test`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Gateway configuration entity served by the read-only catalog API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatalogEntity {
    Currency,
    Region,
    Issuer,
    PaymentMethodType,
    PaymentMethod,
}

impl CatalogEntity {
    pub fn all() -> [CatalogEntity; 5] {
        [
            CatalogEntity::Currency,
            CatalogEntity::Region,
            CatalogEntity::Issuer,
            CatalogEntity::PaymentMethodType,
            CatalogEntity::PaymentMethod,
        ]
    }

    pub fn singular(&self) -> &'static str {
        match self {
            CatalogEntity::Currency => "currency",
            CatalogEntity::Region => "region",
            CatalogEntity::Issuer => "issuer",
            CatalogEntity::PaymentMethodType => "payment_method_type",
            CatalogEntity::PaymentMethod => "payment_method",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            CatalogEntity::Currency => "currencies",
            CatalogEntity::Region => "regions",
            CatalogEntity::Issuer => "issuers",
            CatalogEntity::PaymentMethodType => "payment_method_types",
            CatalogEntity::PaymentMethod => "payment_methods",
        }
    }

    /// Orderings the list operation is checked against
    pub fn sort_keys(&self) -> &'static [SortKey] {
        const CURRENCY: &[SortKey] = &[
            SortKey::new("code", "code", "code", true),
            SortKey::new("decimal", "currency_decimal_accuracy", "currencyDecimalAccuracy", false),
        ];
        const REGION: &[SortKey] = &[
            SortKey::new("", "id", "id", true),
            SortKey::new("title", "title", "title", false),
        ];
        const ISSUER: &[SortKey] = &[SortKey::new("name", "issuer_name", "issuerName", true)];
        const PAYMENT_METHOD_TYPE: &[SortKey] = &[SortKey::new(
            "name",
            "payment_method_type_name",
            "paymentMethodTypeName",
            false,
        )];
        const PAYMENT_METHOD: &[SortKey] = &[SortKey::new("id", "id", "id", true)];

        match self {
            CatalogEntity::Currency => CURRENCY,
            CatalogEntity::Region => REGION,
            CatalogEntity::Issuer => ISSUER,
            CatalogEntity::PaymentMethodType => PAYMENT_METHOD_TYPE,
            CatalogEntity::PaymentMethod => PAYMENT_METHOD,
        }
    }

    /// Only payment methods accept a list filter
    pub fn supports_filter(&self) -> bool {
        matches!(self, CatalogEntity::PaymentMethod)
    }
}

/// One ordering of a catalog list request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SortKey {
    /// Scenario name suffix; empty for the entity's primary ordering
    pub suffix: &'static str,
    /// Request field name (snake_case)
    pub order_by: &'static str,
    /// Response field name (camelCase)
    pub field: &'static str,
    pub descending: bool,
}

impl SortKey {
    pub const fn new(
        suffix: &'static str,
        order_by: &'static str,
        field: &'static str,
        descending: bool,
    ) -> Self {
        Self {
            suffix,
            order_by,
            field,
            descending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatalogCase {
    Get,
    NotFound,
    List,
    Ordered(SortKey),
    Paginated,
    Filtered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderCase {
    PayIn,
    PayOut,
    MinAmount,
    MaxAmount,
    UnknownCompany,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OfferCase {
    CreatePayIn,
    CreatePayOut,
    List,
    Get,
}

/// Offer state machine transitions, legal and illegal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleCase {
    PauseOffer,
    ActivatePausedOffer,
    CancelOfferWithoutOrders,
    CancelActiveOfferWithOrders,
    OnHoldToInactive,
    OnHoldToCanceled,
    PauseAlreadyPaused,
    ReactivateActive,
    ReactivateInactive,
    CancelInactive,
    CancelCanceled,
    ReactivateCanceled,
    PauseCanceled,
    PauseInactive,
}

impl LifecycleCase {
    pub fn all() -> [LifecycleCase; 14] {
        [
            LifecycleCase::CancelActiveOfferWithOrders,
            LifecycleCase::ActivatePausedOffer,
            LifecycleCase::OnHoldToInactive,
            LifecycleCase::OnHoldToCanceled,
            LifecycleCase::PauseAlreadyPaused,
            LifecycleCase::PauseOffer,
            LifecycleCase::CancelOfferWithoutOrders,
            LifecycleCase::ReactivateActive,
            LifecycleCase::ReactivateInactive,
            LifecycleCase::CancelInactive,
            LifecycleCase::CancelCanceled,
            LifecycleCase::ReactivateCanceled,
            LifecycleCase::PauseCanceled,
            LifecycleCase::PauseInactive,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleCase::PauseOffer => "pause_offer",
            LifecycleCase::ActivatePausedOffer => "activate_paused_offer",
            LifecycleCase::CancelOfferWithoutOrders => "cancel_offer_without_orders",
            LifecycleCase::CancelActiveOfferWithOrders => "cancel_active_offer_with_orders",
            LifecycleCase::OnHoldToInactive => "transition_offer_on_hold_to_inactive",
            LifecycleCase::OnHoldToCanceled => "transition_offer_on_hold_to_canceled",
            LifecycleCase::PauseAlreadyPaused => "error_pause_already_paused_offer",
            LifecycleCase::ReactivateActive => "error_reactivate_active_offer",
            LifecycleCase::ReactivateInactive => "error_reactivate_inactive_offer",
            LifecycleCase::CancelInactive => "error_cancel_inactive_offer",
            LifecycleCase::CancelCanceled => "error_cancel_canceled_offer",
            LifecycleCase::ReactivateCanceled => "error_reactivate_canceled_offer",
            LifecycleCase::PauseCanceled => "error_pause_canceled_offer",
            LifecycleCase::PauseInactive => "error_pause_inactive_offer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraderCase {
    Get,
    NotFound,
    InvalidId,
    List,
    ListOrderedAsc,
    ListOrderedDesc,
    ListPaginated,
    Create,
    DuplicateUserId,
    DuplicateEmail,
    InvalidUserId,
    EmptyEmail,
    LongEmail,
    RegisterEnabled,
    RegisterDisabled,
    RegisterInvalidStatus,
}

impl TraderCase {
    pub fn all() -> [TraderCase; 16] {
        [
            TraderCase::Get,
            TraderCase::NotFound,
            TraderCase::InvalidId,
            TraderCase::List,
            TraderCase::ListOrderedAsc,
            TraderCase::ListOrderedDesc,
            TraderCase::ListPaginated,
            TraderCase::Create,
            TraderCase::DuplicateUserId,
            TraderCase::DuplicateEmail,
            TraderCase::InvalidUserId,
            TraderCase::EmptyEmail,
            TraderCase::LongEmail,
            TraderCase::RegisterEnabled,
            TraderCase::RegisterDisabled,
            TraderCase::RegisterInvalidStatus,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TraderCase::Get => "get_trader_default",
            TraderCase::NotFound => "get_trader_not_found_error",
            TraderCase::InvalidId => "get_trader_id_invalid_error",
            TraderCase::List => "get_traders_default",
            TraderCase::ListOrderedAsc => "get_traders_order_asc",
            TraderCase::ListOrderedDesc => "get_traders_order_desc",
            TraderCase::ListPaginated => "get_traders_pagination",
            TraderCase::Create => "create_trader_default",
            TraderCase::DuplicateUserId => "create_trader_duplicate_uuid",
            TraderCase::DuplicateEmail => "create_trader_duplicate_email",
            TraderCase::InvalidUserId => "create_trader_invalid_uuid",
            TraderCase::EmptyEmail => "create_trader_empty_email",
            TraderCase::LongEmail => "create_trader_long_email",
            TraderCase::RegisterEnabled => "register_trader_enabled",
            TraderCase::RegisterDisabled => "register_trader_disabled",
            TraderCase::RegisterInvalidStatus => "register_trader_invalid_status",
        }
    }

    /// Scenarios served by the HTTP endpoint rather than gRPC
    pub fn uses_http(&self) -> bool {
        matches!(
            self,
            TraderCase::Create
                | TraderCase::DuplicateUserId
                | TraderCase::DuplicateEmail
                | TraderCase::InvalidUserId
                | TraderCase::EmptyEmail
                | TraderCase::LongEmail
                | TraderCase::RegisterEnabled
                | TraderCase::RegisterDisabled
                | TraderCase::RegisterInvalidStatus
        )
    }
}

/// A selectable end-to-end scenario
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scenario {
    Catalog(CatalogEntity, CatalogCase),
    Order(OrderCase),
    Offer(OfferCase),
    Lifecycle(LifecycleCase),
    Trader(TraderCase),
}

impl Scenario {
    /// Stable scenario identifier
    pub fn name(&self) -> String {
        match self {
            Scenario::Catalog(entity, case) => match case {
                CatalogCase::Get => entity.singular().to_string(),
                CatalogCase::NotFound => format!("{}_error", entity.singular()),
                CatalogCase::List => format!("{}_default", entity.plural()),
                CatalogCase::Ordered(key) if key.suffix.is_empty() => {
                    format!("{}_order", entity.plural())
                }
                CatalogCase::Ordered(key) => format!("{}_order_{}", entity.plural(), key.suffix),
                CatalogCase::Paginated => format!("{}_pagination", entity.plural()),
                CatalogCase::Filtered => format!("{}_filter", entity.plural()),
            },
            Scenario::Order(case) => match case {
                OrderCase::PayIn => "create_order_basic",
                OrderCase::PayOut => "create_payout_order_basic",
                OrderCase::MinAmount => "create_order_payin_min_amount_error",
                OrderCase::MaxAmount => "create_order_payin_max_amount_error",
                OrderCase::UnknownCompany => "create_order_non_existing_company_error",
            }
            .to_string(),
            Scenario::Offer(case) => match case {
                OfferCase::CreatePayIn => "create_offer_payin_default",
                OfferCase::CreatePayOut => "create_offer_payout_default",
                OfferCase::List => "get_offers_default",
                OfferCase::Get => "get_offer_default",
            }
            .to_string(),
            Scenario::Lifecycle(case) => case.name().to_string(),
            Scenario::Trader(case) => case.name().to_string(),
        }
    }

    /// Get scenario category
    pub fn category(&self) -> &'static str {
        match self {
            Scenario::Catalog(..) => "Gateway Config",
            Scenario::Order(_) => "Orders",
            Scenario::Offer(_) => "Offers",
            Scenario::Lifecycle(_) => "Offer Lifecycle",
            Scenario::Trader(_) => "Traders",
        }
    }

    /// Whether the scenario calls the HTTP endpoint
    pub fn uses_http(&self) -> bool {
        matches!(self, Scenario::Trader(case) if case.uses_http())
    }

    /// Get all scenarios in execution order
    pub fn all() -> Vec<Scenario> {
        let mut all = Vec::new();

        for entity in CatalogEntity::all() {
            all.push(Scenario::Catalog(entity, CatalogCase::Get));
            all.push(Scenario::Catalog(entity, CatalogCase::NotFound));
            all.push(Scenario::Catalog(entity, CatalogCase::List));
            for key in entity.sort_keys() {
                all.push(Scenario::Catalog(entity, CatalogCase::Ordered(*key)));
            }
            all.push(Scenario::Catalog(entity, CatalogCase::Paginated));
            if entity.supports_filter() {
                all.push(Scenario::Catalog(entity, CatalogCase::Filtered));
            }
        }

        all.extend(
            [
                OrderCase::PayIn,
                OrderCase::PayOut,
                OrderCase::MinAmount,
                OrderCase::MaxAmount,
                OrderCase::UnknownCompany,
            ]
            .map(Scenario::Order),
        );
        all.extend(
            [
                OfferCase::CreatePayIn,
                OfferCase::CreatePayOut,
                OfferCase::List,
                OfferCase::Get,
            ]
            .map(Scenario::Offer),
        );
        all.extend(LifecycleCase::all().map(Scenario::Lifecycle));
        all.extend(TraderCase::all().map(Scenario::Trader));
        all
    }

    /// Look a scenario up by its identifier
    pub fn from_name(name: &str) -> Option<Scenario> {
        Scenario::all().into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Scenario {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

/// What `--test` selected: one scenario or every scenario
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    All,
    One(Scenario),
}

impl Selection {
    pub fn scenarios(&self) -> Vec<Scenario> {
        match self {
            Selection::All => Scenario::all(),
            Selection::One(scenario) => vec![*scenario],
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Selection::All);
        }
        Scenario::from_name(s)
            .map(Selection::One)
            .ok_or_else(|| format!("unknown scenario '{s}' (use `list` to see every scenario)"))
    }
}
