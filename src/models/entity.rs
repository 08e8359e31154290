//! Typed views of remote entities
//!
//! Responses arrive as camelCase JSON; these structs decode the fields the
//! harness reasons about and ignore the rest.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offer state as reported by the gateway
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferStatus {
    #[serde(rename = "OFFER_ACTIVE")]
    Active,
    #[serde(rename = "OFFER_ON_HOLD")]
    OnHold,
    #[serde(rename = "OFFER_INACTIVE")]
    Inactive,
    #[serde(rename = "OFFER_CANCELED")]
    Canceled,
}

impl OfferStatus {
    pub fn wire_name(&self) -> &'static str {
        match self {
            OfferStatus::Active => "OFFER_ACTIVE",
            OfferStatus::OnHold => "OFFER_ON_HOLD",
            OfferStatus::Inactive => "OFFER_INACTIVE",
            OfferStatus::Canceled => "OFFER_CANCELED",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "OFFER_ACTIVE" => Some(OfferStatus::Active),
            "OFFER_ON_HOLD" => Some(OfferStatus::OnHold),
            "OFFER_INACTIVE" => Some(OfferStatus::Inactive),
            "OFFER_CANCELED" => Some(OfferStatus::Canceled),
            _ => None,
        }
    }

    /// CANCELED and INACTIVE accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OfferStatus::Inactive | OfferStatus::Canceled)
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Snapshot of one offer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub status: OfferStatus,
    #[serde(default)]
    pub direction_type: Option<String>,
}

/// Order status markers the harness waits on or asserts
pub mod order_status {
    pub const PENDING: &str = "PENDING";
    pub const PROCESSING: &str = "PROCESSING";
    pub const DECLINED: &str = "DECLINED";
}

/// Snapshot of one order
///
/// The status stays a plain string: the gateway reports more states than
/// the harness distinguishes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub status: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub external_order_id: Option<String>,
    #[serde(default)]
    pub decline_cancel_code: Option<String>,
}

/// Snapshot of one trader
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trader {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub trader_status: Option<String>,
    #[serde(default)]
    pub has_active_sessions: bool,
}
