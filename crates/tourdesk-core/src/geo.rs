// Coordinates for address-bearing drafts.

use tourdesk_api::{Coordinates, Geocode};
use tracing::debug;

use crate::error::CoreError;
use crate::validate;

/// Resolve `address` unless the caller already has coordinates.
///
/// Any lookup failure blocks the submission; there is no fallback to
/// `0, 0`.
pub async fn locate<G: Geocode>(
    geocoder: &G,
    address: &str,
    explicit: Option<Coordinates>,
) -> Result<Coordinates, CoreError> {
    if let Some(coords) = explicit {
        return Ok(coords);
    }
    validate::require("address", address)?;
    let coords = geocoder.geocode(address.trim()).await.map_err(|e| match e {
        tourdesk_api::Error::Geocoding { message } => CoreError::Geocoding { message },
        other => CoreError::Geocoding {
            message: other.to_string(),
        },
    })?;
    debug!(address, lat = coords.lat, lng = coords.lng, "address located");
    Ok(coords)
}
