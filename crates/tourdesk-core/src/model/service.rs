// ── Services ──

use serde::{Deserialize, Serialize};
use tourdesk_api::{Coordinates, DataLayout, RequestBody, Resource};

use super::{Entity, SearchMode, non_blank};
use crate::error::CoreError;
use crate::upload::UploadForm;
use crate::validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub service_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Entity for Service {
    const RESOURCE: Resource = Resource::Service;
    const SEARCH: SearchMode = SearchMode::Client;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.service_name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.service_name.as_str(),
            self.address.as_str(),
            self.phone.as_str(),
            self.category.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDraft {
    pub service_name: String,
    pub category: String,
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub facilities: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServicePayload {
    #[serde(flatten)]
    draft: ServiceDraft,
    lat: f64,
    lng: f64,
}

impl From<&Service> for ServiceDraft {
    fn from(service: &Service) -> Self {
        Self {
            service_name: service.service_name.clone(),
            category: service.category.clone(),
            address: service.address.clone(),
            phone: service.phone.clone(),
            facilities: service.facilities.clone(),
        }
    }
}

impl ServiceDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate::require("serviceName", &self.service_name)?;
        validate::require("category", &self.category)?;
        validate::require("address", &self.address)
    }

    /// `data` part plus staged `images` and `video`.
    pub fn into_body(
        mut self,
        coords: Coordinates,
        uploads: UploadForm,
    ) -> Result<RequestBody, CoreError> {
        self.validate()?;
        self.facilities = non_blank(&self.facilities);
        let payload = ServicePayload {
            draft: self,
            lat: coords.lat,
            lng: coords.lng,
        };
        uploads.into_body(&payload, DataLayout::JsonPart)
    }
}
