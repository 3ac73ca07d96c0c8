// ── Hotels & posadas ──
//
// Both are lodgings that own a list of rooms. Their media (cover image and
// room pictures) arrive as already-uploaded URLs, so mutations are JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourdesk_api::{Coordinates, RequestBody, Resource};

use super::{Entity, SearchMode, server_id};
use crate::error::CoreError;
use crate::validate;

/// Lodging category the server expects on every posada.
pub const POSADA_TYPE: &str = "POSADAS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub room_name: String,
    #[serde(default)]
    pub beds: u32,
    #[serde(default)]
    pub washrooms: u32,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub gym: bool,
    #[serde(default)]
    pub swimming_pool: bool,
    #[serde(default)]
    pub wifi: bool,
    #[serde(default)]
    pub ac: bool,
    #[serde(default)]
    pub breakfast: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub room_pictures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hotel_image: Option<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Entity for Hotel {
    const RESOURCE: Resource = Resource::Hotel;
    const SEARCH: SearchMode = SearchMode::Server;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posada {
    pub id: String,
    /// Short human-readable code, e.g. `P042`.
    #[serde(default)]
    pub posada_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub posada_image: Option<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Entity for Posada {
    const RESOURCE: Resource = Resource::Posada;
    const SEARCH: SearchMode = SearchMode::Server;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }
}

// ── Drafts ───────────────────────────────────────────────────────────

/// Editable room. `id` survives only when it is server-issued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub room_name: String,
    #[serde(default)]
    pub beds: u32,
    #[serde(default)]
    pub washrooms: u32,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub gym: bool,
    #[serde(default)]
    pub swimming_pool: bool,
    #[serde(default)]
    pub wifi: bool,
    #[serde(default)]
    pub ac: bool,
    #[serde(default)]
    pub breakfast: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub room_pictures: Vec<String>,
}

impl From<&Room> for RoomDraft {
    fn from(room: &Room) -> Self {
        Self {
            id: Some(room.id.clone()),
            room_name: room.room_name.clone(),
            beds: room.beds,
            washrooms: room.washrooms,
            parking: room.parking,
            gym: room.gym,
            swimming_pool: room.swimming_pool,
            wifi: room.wifi,
            ac: room.ac,
            breakfast: room.breakfast,
            price: room.price,
            room_pictures: room.room_pictures.clone(),
        }
    }
}

/// Rooms are resubmitted as a whole list; drop placeholder ids and
/// check every room has a name.
fn normalize_rooms(rooms: Vec<RoomDraft>) -> Result<Vec<RoomDraft>, CoreError> {
    rooms
        .into_iter()
        .enumerate()
        .map(|(i, mut room)| {
            validate::require(&format!("rooms[{i}].roomName"), &room.room_name)?;
            room.id = server_id(room.id.take());
            Ok(room)
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDraft {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hotel_image: String,
    #[serde(default)]
    pub rooms: Vec<RoomDraft>,
}

impl From<&Hotel> for HotelDraft {
    fn from(hotel: &Hotel) -> Self {
        Self {
            name: hotel.name.clone(),
            address: hotel.address.clone(),
            lat: hotel.lat,
            lng: hotel.lng,
            whatsapp: hotel.whatsapp.clone().unwrap_or_default(),
            phone: hotel.phone.clone().unwrap_or_default(),
            instagram: hotel.instagram.clone().unwrap_or_default(),
            description: hotel.description.clone().unwrap_or_default(),
            hotel_image: hotel.hotel_image.clone().unwrap_or_default(),
            rooms: hotel.rooms.iter().map(RoomDraft::from).collect(),
        }
    }
}

impl HotelDraft {
    pub fn into_body(mut self) -> Result<RequestBody, CoreError> {
        validate::require("name", &self.name)?;
        validate::require("address", &self.address)?;
        self.rooms = normalize_rooms(self.rooms)?;
        Ok(RequestBody::json(&self)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosadaDraft {
    /// Set on edit; generated on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posada_id: Option<String>,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub posada_image: String,
    /// Server-computed; carried through edits untouched, 0 on create.
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub rooms: Vec<RoomDraft>,
}

impl From<&Posada> for PosadaDraft {
    fn from(posada: &Posada) -> Self {
        Self {
            posada_id: posada.posada_id.clone(),
            name: posada.name.clone(),
            address: posada.address.clone(),
            whatsapp: posada.whatsapp.clone().unwrap_or_default(),
            phone: posada.phone.clone().unwrap_or_default(),
            instagram: posada.instagram.clone().unwrap_or_default(),
            description: posada.description.clone().unwrap_or_default(),
            posada_image: posada.posada_image.clone().unwrap_or_default(),
            average_rating: posada.average_rating,
            rooms: posada.rooms.iter().map(RoomDraft::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PosadaPayload {
    #[serde(flatten)]
    draft: PosadaDraft,
    lat: f64,
    lng: f64,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// `P` followed by the last three digits of the millisecond timestamp.
pub fn posada_code(now: DateTime<Utc>) -> String {
    format!("P{:03}", now.timestamp_millis().rem_euclid(1000))
}

impl PosadaDraft {
    /// Fields the posada form requires before geocoding is attempted.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate::require("name", &self.name)?;
        validate::require("address", &self.address)
    }

    /// Build the request body. `coords` come from geocoding `address`;
    /// a draft without a code gets one derived from `now`.
    pub fn into_body(
        mut self,
        coords: Coordinates,
        now: DateTime<Utc>,
    ) -> Result<RequestBody, CoreError> {
        self.validate()?;
        self.rooms = normalize_rooms(self.rooms)?;
        if self.posada_id.as_deref().is_none_or(str::is_empty) {
            self.posada_id = Some(posada_code(now));
        }
        let payload = PosadaPayload {
            draft: self,
            lat: coords.lat,
            lng: coords.lng,
            kind: POSADA_TYPE,
        };
        Ok(RequestBody::json(&payload)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn room(id: Option<&str>, name: &str) -> RoomDraft {
        RoomDraft {
            id: id.map(str::to_owned),
            room_name: name.into(),
            beds: 2,
            price: 80.0,
            ..RoomDraft::default()
        }
    }

    #[test]
    fn hotel_deserializes_from_api_shape() {
        let hotel: Hotel = serde_json::from_value(json!({
            "id": "65f1a2b3c4d5e6f7a8b9c0d1",
            "name": "Hotel Mar",
            "address": "Av. del Mar 12",
            "lat": 10.5,
            "lng": -66.9,
            "type": "HOTEL",
            "averageRating": 4.5,
            "hotelImage": "https://cdn/x.jpg",
            "rooms": [{
                "id": "r1", "roomName": "Suite", "beds": 2, "washrooms": 1,
                "parking": true, "gym": false, "swimmingPool": true, "wifi": true,
                "ac": true, "breakfast": false, "price": 120.0,
                "roomPictures": ["a.jpg"], "hotelId": "h1"
            }],
            "distance": 0
        }))
        .unwrap();

        assert_eq!(hotel.kind.as_deref(), Some("HOTEL"));
        assert_eq!(hotel.rooms[0].room_name, "Suite");
        assert!(hotel.rooms[0].swimming_pool);
    }

    #[test]
    fn hotel_draft_never_sends_its_own_id_and_keeps_server_room_ids() {
        let draft = HotelDraft {
            name: "Hotel Mar".into(),
            address: "Av. del Mar 12".into(),
            rooms: vec![room(Some("65f1a2b3c4d5e6f7a8b9c0d1"), "Suite"), room(Some("tmp-2"), "Double")],
            ..HotelDraft::default()
        };
        let body = draft.into_body().unwrap();
        let data = body.data();

        assert!(data.get("id").is_none());
        assert_eq!(data["rooms"][0]["id"], "65f1a2b3c4d5e6f7a8b9c0d1");
        assert!(data["rooms"][1].get("id").is_none());
        assert_eq!(data["rooms"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn resubmitting_unchanged_hotel_is_stable() {
        let hotel = Hotel {
            id: "65f1a2b3c4d5e6f7a8b9c0d1".into(),
            name: "Hotel Mar".into(),
            address: "Av. del Mar 12".into(),
            lat: Some(10.5),
            lng: Some(-66.9),
            whatsapp: None,
            phone: Some("+58 212 555".into()),
            kind: None,
            instagram: None,
            average_rating: 4.0,
            description: None,
            hotel_image: None,
            rooms: vec![Room {
                id: "65f1a2b3c4d5e6f7a8b9c0d2".into(),
                room_name: "Suite".into(),
                beds: 2,
                washrooms: 1,
                parking: false,
                gym: false,
                swimming_pool: false,
                wifi: true,
                ac: true,
                breakfast: true,
                price: 120.0,
                room_pictures: vec!["a.jpg".into()],
            }],
        };

        let first = HotelDraft::from(&hotel).into_body().unwrap();
        let second = HotelDraft::from(&hotel).into_body().unwrap();
        assert_eq!(first.data(), second.data());
        assert_eq!(first.data()["rooms"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn posada_create_fills_code_type_rating_and_coordinates() {
        let now = Utc.timestamp_millis_opt(1_700_000_123_042).unwrap();
        let draft = PosadaDraft {
            name: "Posada del Sol".into(),
            address: "Calle 5, Mérida".into(),
            rooms: vec![room(None, "Matrimonial")],
            ..PosadaDraft::default()
        };

        let body = draft
            .into_body(Coordinates { lat: 8.59, lng: -71.14 }, now)
            .unwrap();
        let data = body.data();

        assert_eq!(data["posadaId"], "P042");
        assert_eq!(data["type"], "POSADAS");
        assert_eq!(data["averageRating"], 0.0);
        assert_eq!(data["lat"], 8.59);
        assert_eq!(data["lng"], -71.14);
        assert_eq!(data["rooms"][0]["roomName"], "Matrimonial");
    }

    #[test]
    fn posada_edit_keeps_existing_code() {
        let draft = PosadaDraft {
            posada_id: Some("P777".into()),
            name: "Posada del Sol".into(),
            address: "Calle 5".into(),
            ..PosadaDraft::default()
        };
        let body = draft
            .into_body(Coordinates { lat: 1.0, lng: 2.0 }, Utc::now())
            .unwrap();
        assert_eq!(body.data()["posadaId"], "P777");
    }

    #[test]
    fn resubmitting_unchanged_posada_keeps_its_rating() {
        let posada: Posada = serde_json::from_value(json!({
            "id": "65f1a2b3c4d5e6f7a8b9c0d3",
            "posadaId": "P123",
            "name": "Posada del Sol",
            "address": "Calle 5, Mérida",
            "lat": 8.59,
            "lng": -71.14,
            "type": "POSADAS",
            "averageRating": 4.5,
            "rooms": [{ "id": "65f1a2b3c4d5e6f7a8b9c0d4", "roomName": "Matrimonial", "beds": 1 }]
        }))
        .unwrap();
        let coords = Coordinates { lat: 8.59, lng: -71.14 };

        let first = PosadaDraft::from(&posada).into_body(coords, Utc::now()).unwrap();
        let second = PosadaDraft::from(&posada).into_body(coords, Utc::now()).unwrap();
        let data = first.data();

        assert_eq!(data, second.data());
        assert_eq!(data["averageRating"], 4.5);
        assert_eq!(data["posadaId"], "P123");
        assert_eq!(data["rooms"][0]["id"], "65f1a2b3c4d5e6f7a8b9c0d4");
    }

    #[test]
    fn unnamed_room_is_a_validation_error() {
        let draft = HotelDraft {
            name: "Hotel Mar".into(),
            address: "Av. del Mar".into(),
            rooms: vec![room(None, " ")],
            ..HotelDraft::default()
        };
        let err = draft.into_body().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "rooms[0].roomName: is required");
    }
}
