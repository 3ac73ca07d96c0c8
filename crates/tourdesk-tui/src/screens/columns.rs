//! How each entity lays out as a table row and a detail panel.

use std::future::Future;

use ratatui::layout::Constraint;
use tourdesk_core::{
    Advertisement, CoreError, Entity, EntityView, Hotel, Notifier, Order, Posada, Restaurant,
    Room, Service, Sponsor, TouristSpot, User,
};

pub trait TableRow: Entity {
    const HEADERS: &'static [&'static str];
    const WIDTHS: &'static [Constraint];

    /// `s` moves the selected record to its next status.
    const CYCLES_STATUS: bool = false;

    fn cells(&self) -> Vec<String>;

    /// `(label, value)` pairs for the detail panel.
    fn detail(&self) -> Vec<(&'static str, String)>;

    fn cycle_status<N: Notifier>(
        _view: &mut EntityView<Self, N>,
        _record: &Self,
    ) -> impl Future<Output = Result<(), CoreError>> + Send {
        async { Ok(()) }
    }
}

fn opt(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("─").to_owned()
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "─".into()
    } else {
        items.join(", ")
    }
}

fn rating(value: f64) -> String {
    format!("★ {value:.1}")
}

fn money(value: f64) -> String {
    format!("${value:.2}")
}

fn location(lat: Option<f64>, lng: Option<f64>) -> String {
    match (lat, lng) {
        (Some(lat), Some(lng)) => format!("{lat:.5}, {lng:.5}"),
        _ => "─".into(),
    }
}

fn rooms(rooms: &[Room]) -> String {
    if rooms.is_empty() {
        return "─".into();
    }
    rooms
        .iter()
        .map(|r| format!("{} ({} beds, {})", r.room_name, r.beds, money(r.price)))
        .collect::<Vec<_>>()
        .join("; ")
}

const LODGING_HEADERS: &[&str] = &["Name", "Address", "Phone", "Rooms", "Rating"];
const LODGING_WIDTHS: &[Constraint] = &[
    Constraint::Min(18),
    Constraint::Min(20),
    Constraint::Length(16),
    Constraint::Length(6),
    Constraint::Length(7),
];

impl TableRow for Hotel {
    const HEADERS: &'static [&'static str] = LODGING_HEADERS;
    const WIDTHS: &'static [Constraint] = LODGING_WIDTHS;

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.address.clone(),
            opt(self.phone.as_deref()),
            self.rooms.len().to_string(),
            rating(self.average_rating),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Address", self.address.clone()),
            ("Location", location(self.lat, self.lng)),
            ("Phone", opt(self.phone.as_deref())),
            ("WhatsApp", opt(self.whatsapp.as_deref())),
            ("Instagram", opt(self.instagram.as_deref())),
            ("Rating", rating(self.average_rating)),
            ("Rooms", rooms(&self.rooms)),
            ("About", opt(self.description.as_deref())),
        ]
    }
}

impl TableRow for Posada {
    const HEADERS: &'static [&'static str] = LODGING_HEADERS;
    const WIDTHS: &'static [Constraint] = LODGING_WIDTHS;

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.address.clone(),
            opt(self.phone.as_deref()),
            self.rooms.len().to_string(),
            rating(self.average_rating),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Code", opt(self.posada_id.as_deref())),
            ("Address", self.address.clone()),
            ("Location", location(self.lat, self.lng)),
            ("Phone", opt(self.phone.as_deref())),
            ("WhatsApp", opt(self.whatsapp.as_deref())),
            ("Rating", rating(self.average_rating)),
            ("Rooms", rooms(&self.rooms)),
        ]
    }
}

impl TableRow for Restaurant {
    const HEADERS: &'static [&'static str] = &["Name", "Address", "WhatsApp", "Menus"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Min(18),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(6),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.address.clone(),
            opt(self.whatsapp.as_deref()),
            self.menus.len().to_string(),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        let menus = self
            .menus
            .iter()
            .map(|m| format!("{} {}", m.food_name, money(m.price)))
            .collect::<Vec<_>>();
        vec![
            ("ID", self.id.clone()),
            ("Address", self.address.clone()),
            ("WhatsApp", opt(self.whatsapp.as_deref())),
            ("Instagram", opt(self.instagram.as_deref())),
            ("Menu", list(&menus)),
            ("About", opt(self.description.as_deref())),
        ]
    }
}

impl TableRow for Service {
    const HEADERS: &'static [&'static str] = &["Name", "Category", "Address", "Phone", "Rating"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Min(18),
        Constraint::Length(14),
        Constraint::Min(18),
        Constraint::Length(16),
        Constraint::Length(7),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.service_name.clone(),
            self.category.clone(),
            self.address.clone(),
            self.phone.clone(),
            rating(self.average_rating),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Category", self.category.clone()),
            ("Address", self.address.clone()),
            ("Location", location(self.lat, self.lng)),
            ("Phone", self.phone.clone()),
            ("Facilities", list(&self.facilities)),
            ("Images", self.images.len().to_string()),
        ]
    }
}

impl TableRow for Sponsor {
    const HEADERS: &'static [&'static str] = &["Name", "Address", "Price", "Website"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Min(18),
        Constraint::Min(18),
        Constraint::Length(10),
        Constraint::Min(16),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.sponsor_name.clone(),
            self.address.clone(),
            money(self.price),
            opt(self.website_link.as_deref()),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Address", self.address.clone()),
            ("Price", money(self.price)),
            ("Website", opt(self.website_link.as_deref())),
            ("Logo", opt(self.logo.as_deref())),
            ("Facilities", list(&self.facilities)),
            ("Images", self.images.len().to_string()),
        ]
    }
}

impl TableRow for Advertisement {
    const HEADERS: &'static [&'static str] = &["Name", "Company", "Website", "Pictures"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Min(18),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Length(8),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.advertisement_name.clone(),
            self.company_name.clone(),
            opt(self.website.as_deref()),
            self.advertisement_pictures.len().to_string(),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Company", self.company_name.clone()),
            ("Website", opt(self.website.as_deref())),
            ("Pictures", list(&self.advertisement_pictures)),
        ]
    }
}

impl TableRow for TouristSpot {
    const HEADERS: &'static [&'static str] = &["Name", "Address", "Entry fee", "Photos"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Min(18),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(6),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.address.clone(),
            money(self.entry_fee),
            self.photos.len().to_string(),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Address", self.address.clone()),
            ("Phone", opt(self.phone.as_deref())),
            ("Entry fee", money(self.entry_fee)),
            ("Facilities", list(&self.facilities)),
            ("Culture", list(&self.culture)),
            ("YouTube", list(&self.youtube_link)),
            ("Media", format!("{} photos, {} videos", self.photos.len(), self.videos.len())),
            ("About", self.description.clone()),
        ]
    }
}

impl TableRow for Order {
    const HEADERS: &'static [&'static str] = &["Item", "Store", "Qty", "Total", "Status"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Min(18),
        Constraint::Min(16),
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    const CYCLES_STATUS: bool = true;

    fn cells(&self) -> Vec<String> {
        vec![
            self.item_name.clone(),
            self.store_name.clone(),
            self.quantity.to_string(),
            money(self.total_price),
            self.status.to_string(),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        let placed = self
            .created_at
            .map_or_else(|| "─".into(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        vec![
            ("ID", self.id.clone()),
            ("Store", self.store_name.clone()),
            ("Quantity", self.quantity.to_string()),
            ("Total", money(self.total_price)),
            ("Status", self.status.to_string()),
            ("Placed", placed),
        ]
    }

    async fn cycle_status<N: Notifier>(
        view: &mut EntityView<Self, N>,
        record: &Self,
    ) -> Result<(), CoreError> {
        view.update_status(&record.id, record.status.next()).await
    }
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["Name", "Email", "Role", "Status"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Min(18),
        Constraint::Min(22),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.email.clone(),
            opt(self.role.as_deref()),
            opt(self.status.as_deref()),
        ]
    }

    fn detail(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Email", self.email.clone()),
            ("Phone", opt(self.phone_number.as_deref())),
            ("Role", opt(self.role.as_deref())),
            ("Status", opt(self.status.as_deref())),
            ("Address", opt(self.address.as_deref())),
            ("Country", opt(self.country.as_deref())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tourdesk_core::OrderStatus;

    fn order() -> Order {
        Order {
            id: "o1".into(),
            item_name: "Arepa".into(),
            store_name: "La Esquina".into(),
            quantity: 2,
            total_price: 7.0,
            status: OrderStatus::Pending,
            created_at: None,
        }
    }

    #[test]
    fn cells_line_up_with_headers() {
        let row = order().cells();
        assert_eq!(row.len(), Order::HEADERS.len());
        assert_eq!(Order::WIDTHS.len(), Order::HEADERS.len());
        assert_eq!(row, ["Arepa", "La Esquina", "2", "$7.00", "PENDING"]);
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(opt(None), "─");
        assert_eq!(opt(Some("")), "─");
        assert_eq!(location(Some(8.5), None), "─");
        assert_eq!(list(&[]), "─");
    }

    #[test]
    fn only_orders_cycle_status() {
        assert!(Order::CYCLES_STATUS);
        assert!(!Hotel::CYCLES_STATUS);
    }
}
