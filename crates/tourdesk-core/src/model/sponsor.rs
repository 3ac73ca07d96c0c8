// ── Sponsors ──

use serde::{Deserialize, Serialize};
use tourdesk_api::{DataLayout, RequestBody, Resource};

use super::{Entity, SearchMode, non_blank};
use crate::error::CoreError;
use crate::upload::UploadForm;
use crate::validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub id: String,
    pub sponsor_name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Entity for Sponsor {
    const RESOURCE: Resource = Resource::Sponsor;
    const SEARCH: SearchMode = SearchMode::Client;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.sponsor_name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.sponsor_name.as_str(), self.address.as_str()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorDraft {
    pub sponsor_name: String,
    pub price: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub website_link: String,
    #[serde(default)]
    pub facilities: Vec<String>,
}

impl From<&Sponsor> for SponsorDraft {
    fn from(sponsor: &Sponsor) -> Self {
        Self {
            sponsor_name: sponsor.sponsor_name.clone(),
            price: sponsor.price,
            address: sponsor.address.clone(),
            website_link: sponsor.website_link.clone().unwrap_or_default(),
            facilities: sponsor.facilities.clone(),
        }
    }
}

impl SponsorDraft {
    /// `data` part plus staged `logo` and `images`.
    pub fn into_body(mut self, uploads: UploadForm) -> Result<RequestBody, CoreError> {
        validate::require("sponsorName", &self.sponsor_name)?;
        validate::require_positive("price", self.price)?;
        self.facilities = non_blank(&self.facilities);
        uploads.into_body(&self, DataLayout::JsonPart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::upload::{PreviewRegistry, SelectedFile};

    #[test]
    fn name_and_price_are_required() {
        let uploads = || UploadForm::for_resource(Resource::Sponsor, PreviewRegistry::new());
        let draft = SponsorDraft {
            sponsor_name: "Cerveza Sol".into(),
            ..SponsorDraft::default()
        };
        let err = draft.into_body(uploads()).unwrap_err();
        assert_eq!(err.to_string(), "price: must be greater than zero");

        let draft = SponsorDraft {
            price: 250.0,
            ..SponsorDraft::default()
        };
        assert!(draft.into_body(uploads()).unwrap_err().is_validation());
    }

    #[test]
    fn logo_and_images_follow_data() {
        let registry = PreviewRegistry::new();
        let mut uploads = UploadForm::for_resource(Resource::Sponsor, registry);
        uploads.add("images", vec![SelectedFile::new("a.webp", "image/webp", vec![1u8])]);
        uploads.add("logo", vec![SelectedFile::new("logo.png", "image/png", vec![1u8])]);

        let draft = SponsorDraft {
            sponsor_name: "Cerveza Sol".into(),
            price: 250.0,
            ..SponsorDraft::default()
        };
        let RequestBody::Multipart(body) = draft.into_body(uploads).unwrap() else {
            panic!("expected multipart");
        };
        assert_eq!(body.part_names(), ["data", "logo", "images"]);
        assert_eq!(body.data["price"], 250.0);
    }
}
