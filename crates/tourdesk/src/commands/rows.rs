//! Table rows and detail blocks for every entity.

use tabled::Tabled;
use tourdesk_core::{
    Advertisement, Entity, Hotel, Order, Posada, Restaurant, Service, Sponsor, TouristSpot, User,
};

/// How an entity is shown by `list` and `get`.
pub trait Listing: Entity {
    type Row: Tabled;

    /// Subcommand that lists this entity, for help text.
    const LIST_COMMAND: &'static str;

    fn row(&self) -> Self::Row;

    fn detail(&self) -> String;
}

fn opt(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

fn joined(items: &[String]) -> String {
    if items.is_empty() {
        "-".into()
    } else {
        items.join(", ")
    }
}

fn rating(value: f64) -> String {
    format!("{value:.1}")
}

// ── Lodging ─────────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct LodgingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Rooms")]
    rooms: usize,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl Listing for Hotel {
    type Row = LodgingRow;
    const LIST_COMMAND: &'static str = "hotels list";

    fn row(&self) -> LodgingRow {
        LodgingRow {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            phone: opt(self.phone.as_deref()),
            rooms: self.rooms.len(),
            rating: rating(self.average_rating),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:          {}", self.id),
            format!("Name:        {}", self.name),
            format!("Address:     {}", self.address),
            format!("Phone:       {}", opt(self.phone.as_deref())),
            format!("WhatsApp:    {}", opt(self.whatsapp.as_deref())),
            format!("Instagram:   {}", opt(self.instagram.as_deref())),
            format!("Rating:      {}", rating(self.average_rating)),
        ];
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            lines.push(format!("Location:    {lat}, {lng}"));
        }
        if let Some(ref d) = self.description {
            lines.push(format!("Description: {d}"));
        }
        push_rooms(&mut lines, &self.rooms);
        lines.join("\n")
    }
}

impl Listing for Posada {
    type Row = LodgingRow;
    const LIST_COMMAND: &'static str = "posadas list";

    fn row(&self) -> LodgingRow {
        LodgingRow {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            phone: opt(self.phone.as_deref()),
            rooms: self.rooms.len(),
            rating: rating(self.average_rating),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:          {}", self.id),
            format!("Code:        {}", opt(self.posada_id.as_deref())),
            format!("Name:        {}", self.name),
            format!("Address:     {}", self.address),
            format!("Phone:       {}", opt(self.phone.as_deref())),
            format!("WhatsApp:    {}", opt(self.whatsapp.as_deref())),
            format!("Rating:      {}", rating(self.average_rating)),
        ];
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            lines.push(format!("Location:    {lat}, {lng}"));
        }
        push_rooms(&mut lines, &self.rooms);
        lines.join("\n")
    }
}

fn push_rooms(lines: &mut Vec<String>, rooms: &[tourdesk_core::Room]) {
    if rooms.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("Rooms:".into());
    for room in rooms {
        lines.push(format!(
            "  - {} ({} beds, {} washrooms, {:.2})",
            room.room_name, room.beds, room.washrooms, room.price
        ));
    }
}

// ── Restaurants ─────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct RestaurantRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Menu Items")]
    menus: usize,
}

impl Listing for Restaurant {
    type Row = RestaurantRow;
    const LIST_COMMAND: &'static str = "restaurants list";

    fn row(&self) -> RestaurantRow {
        RestaurantRow {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            menus: self.menus.len(),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:        {}", self.id),
            format!("Name:      {}", self.name),
            format!("Address:   {}", self.address),
            format!("WhatsApp:  {}", opt(self.whatsapp.as_deref())),
            format!("Instagram: {}", opt(self.instagram.as_deref())),
        ];
        if !self.menus.is_empty() {
            lines.push(String::new());
            lines.push("Menu:".into());
            for menu in &self.menus {
                lines.push(format!(
                    "  - {} {:.2} [{}]",
                    menu.food_name,
                    menu.price,
                    menu.items.join(", ")
                ));
            }
        }
        lines.join("\n")
    }
}

// ── Services ────────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl Listing for Service {
    type Row = ServiceRow;
    const LIST_COMMAND: &'static str = "services list";

    fn row(&self) -> ServiceRow {
        ServiceRow {
            id: self.id.clone(),
            name: self.service_name.clone(),
            category: self.category.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }

    fn detail(&self) -> String {
        [
            format!("ID:         {}", self.id),
            format!("Name:       {}", self.service_name),
            format!("Category:   {}", self.category),
            format!("Phone:      {}", self.phone),
            format!("Address:    {}", self.address),
            format!("Facilities: {}", joined(&self.facilities)),
            format!("Images:     {}", self.images.len()),
        ]
        .join("\n")
    }
}

// ── Sponsors & advertisements ───────────────────────────────────────

#[derive(Tabled)]
pub struct SponsorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Website")]
    website: String,
}

impl Listing for Sponsor {
    type Row = SponsorRow;
    const LIST_COMMAND: &'static str = "sponsors list";

    fn row(&self) -> SponsorRow {
        SponsorRow {
            id: self.id.clone(),
            name: self.sponsor_name.clone(),
            price: format!("{:.2}", self.price),
            address: self.address.clone(),
            website: opt(self.website_link.as_deref()),
        }
    }

    fn detail(&self) -> String {
        [
            format!("ID:         {}", self.id),
            format!("Name:       {}", self.sponsor_name),
            format!("Price:      {:.2}", self.price),
            format!("Address:    {}", self.address),
            format!("Website:    {}", opt(self.website_link.as_deref())),
            format!("Logo:       {}", opt(self.logo.as_deref())),
            format!("Facilities: {}", joined(&self.facilities)),
        ]
        .join("\n")
    }
}

#[derive(Tabled)]
pub struct AdvertisementRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Pictures")]
    pictures: usize,
}

impl Listing for Advertisement {
    type Row = AdvertisementRow;
    const LIST_COMMAND: &'static str = "ads list";

    fn row(&self) -> AdvertisementRow {
        AdvertisementRow {
            id: self.id.clone(),
            name: self.advertisement_name.clone(),
            company: self.company_name.clone(),
            pictures: self.advertisement_pictures.len(),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:       {}", self.id),
            format!("Name:     {}", self.advertisement_name),
            format!("Company:  {}", self.company_name),
            format!("Website:  {}", opt(self.website.as_deref())),
        ];
        for url in &self.advertisement_pictures {
            lines.push(format!("  - {url}"));
        }
        lines.join("\n")
    }
}

// ── Tourist spots ───────────────────────────────────────────────────

#[derive(Tabled)]
pub struct TouristSpotRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Photos")]
    photos: usize,
}

impl Listing for TouristSpot {
    type Row = TouristSpotRow;
    const LIST_COMMAND: &'static str = "spots list";

    fn row(&self) -> TouristSpotRow {
        TouristSpotRow {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            photos: self.photos.len(),
        }
    }

    fn detail(&self) -> String {
        [
            format!("ID:          {}", self.id),
            format!("Name:        {}", self.name),
            format!("Address:     {}", self.address),
            format!("Description: {}", self.description),
            format!("Facilities:  {}", joined(&self.facilities)),
            format!("Culture:     {}", joined(&self.culture)),
            format!("YouTube:     {}", joined(&self.youtube_link)),
            format!("Media:       {} photos, {} videos", self.photos.len(), self.videos.len()),
        ]
        .join("\n")
    }
}

// ── Orders & users ──────────────────────────────────────────────────

#[derive(Tabled)]
pub struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Store")]
    store: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl Listing for Order {
    type Row = OrderRow;
    const LIST_COMMAND: &'static str = "orders list";

    fn row(&self) -> OrderRow {
        OrderRow {
            id: self.id.clone(),
            item: self.item_name.clone(),
            store: self.store_name.clone(),
            quantity: self.quantity,
            total: format!("{:.2}", self.total_price),
            status: self.status.to_string(),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:       {}", self.id),
            format!("Item:     {}", self.item_name),
            format!("Store:    {}", self.store_name),
            format!("Quantity: {}", self.quantity),
            format!("Total:    {:.2}", self.total_price),
            format!("Status:   {}", self.status),
        ];
        if let Some(at) = self.created_at {
            lines.push(format!("Created:  {}", at.format("%Y-%m-%d %H:%M")));
        }
        lines.join("\n")
    }
}

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl Listing for User {
    type Row = UserRow;
    const LIST_COMMAND: &'static str = "users list";

    fn row(&self) -> UserRow {
        UserRow {
            id: self.id.clone(),
            name: self.full_name.clone(),
            email: self.email.clone(),
            role: opt(self.role.as_deref()),
            status: opt(self.status.as_deref()),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:      {}", self.id),
            format!("Name:    {}", self.full_name),
            format!("Email:   {}", self.email),
            format!("Phone:   {}", opt(self.phone_number.as_deref())),
            format!("Role:    {}", opt(self.role.as_deref())),
            format!("Status:  {}", opt(self.status.as_deref())),
            format!("Address: {}", opt(self.address.as_deref())),
            format!("Country: {}", opt(self.country.as_deref())),
        ];
        if let Some(at) = self.created_at {
            lines.push(format!("Joined:  {}", at.format("%Y-%m-%d")));
        }
        lines.join("\n")
    }
}
