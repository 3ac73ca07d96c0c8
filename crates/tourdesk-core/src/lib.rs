// tourdesk-core: Query cache, list controller, and view orchestration between tourdesk-api and consumers (CLI/TUI).

pub mod cache;
pub mod client;
pub mod error;
pub mod geo;
pub mod list;
pub mod model;
pub mod upload;
pub mod validate;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{QueryCache, QueryKey, QueryKind};
pub use client::{QueryClient, Saved};
pub use error::CoreError;
pub use list::{DEFAULT_DEBOUNCE, Debouncer, ListController, ListState};
pub use upload::{FieldRule, PreviewRegistry, RejectReason, Rejection, SelectedFile, UploadForm};
pub use view::{EntityView, Notification, NotificationLevel, Notifier, PendingDelete, ViewMode};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Advertisement, AdvertisementDraft, Entity, Hotel, HotelDraft, MenuItem, MenuItemDraft, Order,
    OrderDraft, OrderStatus, Posada, PosadaDraft, ProfileUpdate, Restaurant, RestaurantDraft, Room,
    RoomDraft, SearchMode, Service, ServiceDraft, Sponsor, SponsorDraft, TouristSpot,
    TouristSpotDraft, User,
};

// Transport types consumers need alongside the core ones.
pub use tourdesk_api::{
    ApiClient, Coordinates, Geocode, ListParams, NominatimGeocoder, Operation, OrderStats,
    RequestBody, Resource, SortOrder, Tag, TlsMode, TransportConfig,
};
