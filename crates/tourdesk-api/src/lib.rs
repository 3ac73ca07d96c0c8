// tourdesk-api: Async Rust client for the tourdesk directory REST API

pub mod body;
pub mod client;
pub mod envelope;
pub mod error;
pub mod geocode;
pub mod params;
pub mod routes;
pub mod transport;

pub use body::{DataLayout, FilePart, MultipartBody, RequestBody};
pub use client::ApiClient;
pub use envelope::{Ack, ApiResponse, OrderStats, Page, PageMeta};
pub use error::Error;
pub use geocode::{Coordinates, Geocode, NominatimGeocoder};
pub use params::{ListParams, SortOrder};
pub use routes::{BodyKind, Endpoint, Operation, Resource, Tag, Verb};
pub use transport::{TlsMode, TransportConfig};
