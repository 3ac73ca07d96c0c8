// ── Orders ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tourdesk_api::{RequestBody, Resource};

use super::{Entity, SearchMode};
use crate::error::CoreError;
use crate::validate;

/// Fulfilment state of an order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Next status in the `PENDING → COMPLETED → CANCELLED` cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Cancelled,
            Self::Cancelled => Self::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Order {
    const RESOURCE: Resource = Resource::Order;
    const SEARCH: SearchMode = SearchMode::Client;
    const PAGE_SIZE: u32 = 7;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.item_name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.item_name.as_str(),
            self.store_name.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub item_name: String,
    pub store_name: String,
    pub quantity: u32,
    pub total_price: f64,
    #[serde(default)]
    pub status: OrderStatus,
}

impl From<&Order> for OrderDraft {
    fn from(order: &Order) -> Self {
        Self {
            item_name: order.item_name.clone(),
            store_name: order.store_name.clone(),
            quantity: order.quantity,
            total_price: order.total_price,
            status: order.status,
        }
    }
}

impl OrderDraft {
    pub fn into_body(self) -> Result<RequestBody, CoreError> {
        validate::require("itemName", &self.item_name)?;
        if self.quantity == 0 {
            return Err(CoreError::validation("quantity", "must be at least 1"));
        }
        Ok(RequestBody::json(&self)?)
    }
}
