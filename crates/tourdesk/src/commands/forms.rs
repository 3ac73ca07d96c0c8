//! Turning `--data` plus uploads into request bodies.

use std::future::Future;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tourdesk_core::geo;
use tourdesk_core::{
    Advertisement, AdvertisementDraft, Coordinates, CoreError, Entity, Hotel, HotelDraft,
    NominatimGeocoder, Order, OrderDraft, Posada, PosadaDraft, ProfileUpdate, RequestBody,
    Restaurant, RestaurantDraft, Service, ServiceDraft, Sponsor, SponsorDraft, TouristSpot,
    TouristSpotDraft, UploadForm, User,
};

/// What a form submission has besides its draft.
pub struct FormInput<'a> {
    pub uploads: UploadForm,
    pub geocoder: &'a NominatimGeocoder,
    /// Explicit `--lat/--lng`; skips geocoding.
    pub coords: Option<Coordinates>,
}

/// An entity the CLI can create or edit.
pub trait Form: Entity {
    type Draft: Serialize + DeserializeOwned + Default + Send + for<'a> From<&'a Self>;

    /// Upload field `--image` files go to.
    const IMAGE_FIELD: &'static str = "images";

    fn prepare(
        draft: Self::Draft,
        input: FormInput<'_>,
    ) -> impl Future<Output = Result<RequestBody, CoreError>> + Send;
}

impl Form for Hotel {
    type Draft = HotelDraft;

    async fn prepare(mut draft: HotelDraft, input: FormInput<'_>) -> Result<RequestBody, CoreError> {
        if let Some(c) = input.coords {
            draft.lat = Some(c.lat);
            draft.lng = Some(c.lng);
        }
        draft.into_body()
    }
}

impl Form for Posada {
    type Draft = PosadaDraft;

    async fn prepare(draft: PosadaDraft, input: FormInput<'_>) -> Result<RequestBody, CoreError> {
        draft.validate()?;
        let coords = geo::locate(input.geocoder, &draft.address, input.coords).await?;
        draft.into_body(coords, Utc::now())
    }
}

impl Form for Restaurant {
    type Draft = RestaurantDraft;

    async fn prepare(draft: RestaurantDraft, _: FormInput<'_>) -> Result<RequestBody, CoreError> {
        draft.into_body()
    }
}

impl Form for Service {
    type Draft = ServiceDraft;

    async fn prepare(draft: ServiceDraft, input: FormInput<'_>) -> Result<RequestBody, CoreError> {
        draft.validate()?;
        let coords = geo::locate(input.geocoder, &draft.address, input.coords).await?;
        draft.into_body(coords, input.uploads)
    }
}

impl Form for Sponsor {
    type Draft = SponsorDraft;

    async fn prepare(draft: SponsorDraft, input: FormInput<'_>) -> Result<RequestBody, CoreError> {
        draft.into_body(input.uploads)
    }
}

impl Form for Advertisement {
    type Draft = AdvertisementDraft;
    const IMAGE_FIELD: &'static str = "advertisementPictures";

    async fn prepare(
        draft: AdvertisementDraft,
        input: FormInput<'_>,
    ) -> Result<RequestBody, CoreError> {
        draft.into_body(input.uploads)
    }
}

impl Form for TouristSpot {
    type Draft = TouristSpotDraft;

    async fn prepare(
        draft: TouristSpotDraft,
        input: FormInput<'_>,
    ) -> Result<RequestBody, CoreError> {
        draft.validate()?;
        let coords = geo::locate(input.geocoder, &draft.address, input.coords).await?;
        draft.into_body(coords, input.uploads)
    }
}

impl Form for Order {
    type Draft = OrderDraft;

    async fn prepare(draft: OrderDraft, _: FormInput<'_>) -> Result<RequestBody, CoreError> {
        draft.into_body()
    }
}

impl Form for User {
    type Draft = ProfileUpdate;

    async fn prepare(draft: ProfileUpdate, _: FormInput<'_>) -> Result<RequestBody, CoreError> {
        draft.into_body()
    }
}

/// Overlay `patch` onto `base`, key by key. Nested objects merge; any
/// other value replaces.
pub fn merge(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                merge(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}
