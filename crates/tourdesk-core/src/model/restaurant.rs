// ── Restaurants ──

use serde::{Deserialize, Serialize};
use tourdesk_api::{RequestBody, Resource};

use super::{Entity, SearchMode, server_id};
use crate::error::CoreError;
use crate::validate;

/// Menu entries carry up to this many item groups.
pub const MENU_GROUPS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub food_name: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub food_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_image: Option<String>,
    #[serde(default)]
    pub menus: Vec<MenuItem>,
}

impl Entity for Restaurant {
    const RESOURCE: Resource = Resource::Restaurant;
    const SEARCH: SearchMode = SearchMode::Server;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }
}

/// Editable menu entry. Only server-issued ids are sent back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub food_name: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub food_picture: String,
}

impl From<&MenuItem> for MenuItemDraft {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            food_name: item.food_name.clone(),
            items: item.items.clone(),
            price: item.price,
            food_picture: item.food_picture.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDraft {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "product_image")]
    pub product_image: String,
    #[serde(default)]
    pub menus: Vec<MenuItemDraft>,
}

impl From<&Restaurant> for RestaurantDraft {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            name: restaurant.name.clone(),
            address: restaurant.address.clone(),
            whatsapp: restaurant.whatsapp.clone().unwrap_or_default(),
            instagram: restaurant.instagram.clone().unwrap_or_default(),
            description: restaurant.description.clone().unwrap_or_default(),
            product_image: restaurant.product_image.clone().unwrap_or_default(),
            menus: restaurant.menus.iter().map(MenuItemDraft::from).collect(),
        }
    }
}

impl RestaurantDraft {
    pub fn into_body(mut self) -> Result<RequestBody, CoreError> {
        validate::require("name", &self.name)?;
        validate::require("address", &self.address)?;
        for (i, menu) in self.menus.iter_mut().enumerate() {
            validate::require(&format!("menus[{i}].foodName"), &menu.food_name)?;
            menu.id = server_id(menu.id.take());
            menu.items = super::non_blank(&menu.items);
            menu.items.truncate(MENU_GROUPS);
        }
        Ok(RequestBody::json(&self)?)
    }
}
