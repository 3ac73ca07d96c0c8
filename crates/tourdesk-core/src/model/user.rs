// ── Users ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tourdesk_api::{RequestBody, Resource};

use super::{Entity, SearchMode};
use crate::error::CoreError;
use crate::validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for User {
    const RESOURCE: Resource = Resource::User;
    const SEARCH: SearchMode = SearchMode::Server;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        if self.full_name.is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

/// Editable profile fields. Blank fields are left out of the request so
/// the server keeps its current values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_license_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicles_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

impl From<&User> for ProfileUpdate {
    fn from(user: &User) -> Self {
        Self {
            full_name: Some(user.full_name.clone()),
            phone_number: user.phone_number.clone(),
            address: user.address.clone(),
            country: user.country.clone(),
            ..Self::default()
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl ProfileUpdate {
    pub fn into_body(self) -> Result<RequestBody, CoreError> {
        if let Some(name) = &self.full_name {
            validate::require("fullName", name)?;
        }
        let cleaned = Self {
            full_name: blank_to_none(self.full_name),
            phone_number: blank_to_none(self.phone_number),
            address: blank_to_none(self.address),
            country: blank_to_none(self.country),
            driving_license_no: blank_to_none(self.driving_license_no),
            vehicles_number: blank_to_none(self.vehicles_number),
            about: blank_to_none(self.about),
        };
        Ok(RequestBody::json(&cleaned)?)
    }
}
