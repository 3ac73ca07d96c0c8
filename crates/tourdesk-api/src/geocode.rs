// Address → coordinates lookup.
//
// Posadas, services, and tourist spots store lat/lng resolved from their
// free-text address. The lookup service is an external collaborator; the
// `Geocode` trait is the seam, `NominatimGeocoder` the stock implementation.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Resolves a free-text address to coordinates.
pub trait Geocode: Send + Sync {
    fn geocode(&self, address: &str) -> impl Future<Output = Result<Coordinates, Error>> + Send;
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Nominatim-compatible search endpoint (`/search?q=…&format=json`).
pub struct NominatimGeocoder {
    http: reqwest::Client,
    base_url: Url,
}

impl NominatimGeocoder {
    pub const DEFAULT_URL: &'static str = "https://nominatim.openstreetmap.org";

    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url: Url::parse(base_url)?,
        })
    }

    fn search_url(&self) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("search");
        Ok(url)
    }
}

impl Geocode for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, Error> {
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::Geocoding {
                message: "address is empty".into(),
            });
        }

        let url = self.search_url()?;
        debug!("GET {url} q={address:?}");

        let resp = self
            .http
            .get(url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Geocoding {
                message: format!("lookup service returned HTTP {}", resp.status().as_u16()),
            });
        }

        let places: Vec<Place> = resp.json().await.map_err(|e| Error::Geocoding {
            message: format!("unreadable lookup response: {e}"),
        })?;
        let place = places.into_iter().next().ok_or_else(|| Error::Geocoding {
            message: format!("no coordinates found for \"{address}\""),
        })?;

        let parse = |raw: &str| {
            raw.parse::<f64>().map_err(|e| Error::Geocoding {
                message: format!("invalid coordinate {raw:?}: {e}"),
            })
        };
        Ok(Coordinates {
            lat: parse(&place.lat)?,
            lng: parse(&place.lon)?,
        })
    }
}
