// ── Advertisements ──

use serde::{Deserialize, Serialize};
use tourdesk_api::{DataLayout, RequestBody, Resource};

use super::{Entity, SearchMode};
use crate::error::CoreError;
use crate::upload::UploadForm;
use crate::validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    pub id: String,
    pub advertisement_name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub advertisement_pictures: Vec<String>,
}

impl Entity for Advertisement {
    const RESOURCE: Resource = Resource::Advertisement;
    const SEARCH: SearchMode = SearchMode::Server;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.advertisement_name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementDraft {
    pub advertisement_name: String,
    pub company_name: String,
    #[serde(default)]
    pub website: String,
}

impl From<&Advertisement> for AdvertisementDraft {
    fn from(ad: &Advertisement) -> Self {
        Self {
            advertisement_name: ad.advertisement_name.clone(),
            company_name: ad.company_name.clone(),
            website: ad.website.clone().unwrap_or_default(),
        }
    }
}

impl AdvertisementDraft {
    /// Scalars go out as individual form fields, pictures under
    /// `advertisementPictures`.
    pub fn into_body(self, uploads: UploadForm) -> Result<RequestBody, CoreError> {
        validate::require("advertisementName", &self.advertisement_name)?;
        validate::require("companyName", &self.company_name)?;
        uploads.into_body(&self, DataLayout::Fields)
    }
}
