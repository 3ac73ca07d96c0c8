// ── Tourist spots ──

use serde::{Deserialize, Serialize};
use tourdesk_api::{Coordinates, DataLayout, RequestBody, Resource};

use super::{Entity, SearchMode, non_blank};
use crate::error::CoreError;
use crate::upload::UploadForm;
use crate::validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristSpot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub culture: Vec<String>,
    #[serde(default)]
    pub youtube_link: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub entry_fee: f64,
}

impl Entity for TouristSpot {
    const RESOURCE: Resource = Resource::TouristSpot;
    const SEARCH: SearchMode = SearchMode::Server;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouristSpotDraft {
    pub name: String,
    pub address: String,
    pub description: String,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub culture: Vec<String>,
    #[serde(default)]
    pub youtube_link: Vec<String>,
    /// Not editable in the form; carried through edits, 0 on create.
    #[serde(default)]
    pub entry_fee: f64,
}

impl From<&TouristSpot> for TouristSpotDraft {
    fn from(spot: &TouristSpot) -> Self {
        Self {
            name: spot.name.clone(),
            address: spot.address.clone(),
            description: spot.description.clone(),
            facilities: spot.facilities.clone(),
            culture: spot.culture.clone(),
            youtube_link: spot.youtube_link.clone(),
            entry_fee: spot.entry_fee,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TouristSpotPayload {
    name: String,
    address: String,
    description: String,
    facilities: Vec<String>,
    culture: Vec<String>,
    youtube_link: Vec<String>,
    entry_fee: f64,
    lat: String,
    lng: String,
}

impl TouristSpotDraft {
    /// Checks run before geocoding: required fields and the link format.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate::require("name", &self.name)?;
        validate::require("address", &self.address)?;
        validate::require("description", &self.description)?;
        self.youtube_link
            .iter()
            .enumerate()
            .try_for_each(|(i, link)| validate::youtube_link(&format!("youtubeLink[{i}]"), link.trim()))
    }

    /// `data` part plus staged `images` and `video`.
    pub fn into_body(
        self,
        coords: Coordinates,
        uploads: UploadForm,
    ) -> Result<RequestBody, CoreError> {
        self.validate()?;
        let payload = TouristSpotPayload {
            facilities: non_blank(&self.facilities),
            culture: non_blank(&self.culture),
            youtube_link: non_blank(&self.youtube_link),
            entry_fee: self.entry_fee,
            lat: coords.lat.to_string(),
            lng: coords.lng.to_string(),
            name: self.name,
            address: self.address,
            description: self.description,
        };
        uploads.into_body(&payload, DataLayout::JsonPart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::upload::PreviewRegistry;
    use serde_json::json;

    fn draft() -> TouristSpotDraft {
        TouristSpotDraft {
            name: "Salto Ángel".into(),
            address: "Canaima".into(),
            description: "Tallest waterfall".into(),
            facilities: vec!["Guides".into(), String::new()],
            culture: vec!["Pemón".into()],
            youtube_link: vec!["https://youtu.be/dQw4w9WgXcQ".into()],
            entry_fee: 0.0,
        }
    }

    #[test]
    fn payload_shape() {
        let uploads = UploadForm::for_resource(Resource::TouristSpot, PreviewRegistry::new());
        let body = draft()
            .into_body(Coordinates { lat: 5.97, lng: -62.53 }, uploads)
            .unwrap();
        let data = body.data();

        assert_eq!(data["youtubeLink"], json!(["https://youtu.be/dQw4w9WgXcQ"]));
        assert_eq!(data["entryFee"], 0.0);
        assert_eq!(data["lat"], "5.97");
        assert_eq!(data["lng"], "-62.53");
        assert_eq!(data["facilities"], json!(["Guides"]));
    }

    #[test]
    fn bad_youtube_link_blocks_submission() {
        let spot = TouristSpotDraft {
            youtube_link: vec!["https://youtu.be/dQw4w9WgXcQ".into(), "https://vimeo.com/1".into()],
            ..draft()
        };
        let err = spot.validate().unwrap_err();
        assert_eq!(err.to_string(), "youtubeLink[1]: please enter a valid YouTube link");
    }

    #[test]
    fn blank_links_send_empty_list() {
        let spot = TouristSpotDraft {
            youtube_link: vec!["  ".into()],
            ..draft()
        };
        let uploads = UploadForm::for_resource(Resource::TouristSpot, PreviewRegistry::new());
        let body = spot
            .into_body(Coordinates { lat: 0.5, lng: 0.5 }, uploads)
            .unwrap();
        assert_eq!(body.data()["youtubeLink"], json!([]));
    }

    #[test]
    fn resubmitting_unchanged_spot_keeps_fee_and_links() {
        let spot: TouristSpot = serde_json::from_value(json!({
            "id": "65f1a2b3c4d5e6f7a8b9c0d5",
            "name": "Salto Ángel",
            "address": "Canaima",
            "description": "Tallest waterfall",
            "facilities": ["Guides"],
            "culture": ["Pemón"],
            "youtubeLink": ["https://youtu.be/aaaaaaaaaaa", "https://youtu.be/bbbbbbbbbbb"],
            "photos": ["https://cdn/p1.jpg"],
            "entryFee": 25
        }))
        .unwrap();
        let coords = Coordinates { lat: 5.97, lng: -62.53 };
        let body = |spot: &TouristSpot| {
            let uploads = UploadForm::for_resource(Resource::TouristSpot, PreviewRegistry::new());
            TouristSpotDraft::from(spot).into_body(coords, uploads).unwrap()
        };

        let first = body(&spot);
        let second = body(&spot);
        let data = first.data();

        assert_eq!(data, second.data());
        assert_eq!(data["entryFee"], 25.0);
        assert_eq!(
            data["youtubeLink"],
            json!(["https://youtu.be/aaaaaaaaaaa", "https://youtu.be/bbbbbbbbbbb"])
        );
    }
}
