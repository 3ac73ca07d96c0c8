// ── Domain model ──
//
// One module per entity family. Each entity implements `Entity`, which ties
// it to its REST resource and declares how its list screen searches.
// Drafts are the pre-create/edit form state: they never carry the entity's
// own server id and turn themselves into a `RequestBody` on submit.

pub mod advertisement;
pub mod lodging;
pub mod order;
pub mod restaurant;
pub mod service;
pub mod sponsor;
pub mod tourist_spot;
pub mod user;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tourdesk_api::Resource;

pub use advertisement::{Advertisement, AdvertisementDraft};
pub use lodging::{Hotel, HotelDraft, Posada, PosadaDraft, Room, RoomDraft};
pub use order::{Order, OrderDraft, OrderStatus};
pub use restaurant::{MenuItem, MenuItemDraft, Restaurant, RestaurantDraft};
pub use service::{Service, ServiceDraft};
pub use sponsor::{Sponsor, SponsorDraft};
pub use tourist_spot::{TouristSpot, TouristSpotDraft};
pub use user::{ProfileUpdate, User};

/// Where a list screen applies its search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Sent as the `search` query parameter after a debounce.
    Server,
    /// Substring filter over the rows of the loaded page.
    Client,
}

/// A record type served by one REST resource.
pub trait Entity:
    DeserializeOwned + Serialize + Clone + fmt::Debug + Send + Sync + 'static
{
    const RESOURCE: Resource;
    const SEARCH: SearchMode;
    const PAGE_SIZE: u32 = 10;

    fn id(&self) -> &str;

    /// Human-readable name for notifications and confirmations.
    fn title(&self) -> &str;

    /// Fields matched by client-side search.
    fn search_fields(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Case-insensitive substring match over `search_fields`.
    fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// `true` for identifiers the server issued (24 hex characters).
///
/// Nested items added locally get placeholder ids; those must not be sent
/// back as if the server knew them.
pub fn is_server_id(id: &str) -> bool {
    id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Keep `id` only when it is server-issued.
pub(crate) fn server_id(id: Option<String>) -> Option<String> {
    id.filter(|id| is_server_id(id))
}

/// Trim every entry and drop the blank ones.
pub(crate) fn non_blank(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
