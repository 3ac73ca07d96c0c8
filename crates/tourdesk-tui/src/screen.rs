//! Screen identifiers, one per managed entity.

use std::fmt;

use tourdesk_core::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Hotels,
    Posadas,
    Restaurants,
    Services,
    Sponsors,
    Ads,
    Spots,
    Orders,
    Users,
}

impl ScreenId {
    /// Tab-bar order; number keys 1-9 follow it.
    pub const ALL: [Self; 9] = [
        Self::Hotels,
        Self::Posadas,
        Self::Restaurants,
        Self::Services,
        Self::Sponsors,
        Self::Ads,
        Self::Spots,
        Self::Orders,
        Self::Users,
    ];

    pub fn resource(self) -> Resource {
        match self {
            Self::Hotels => Resource::Hotel,
            Self::Posadas => Resource::Posada,
            Self::Restaurants => Resource::Restaurant,
            Self::Services => Resource::Service,
            Self::Sponsors => Resource::Sponsor,
            Self::Ads => Resource::Advertisement,
            Self::Spots => Resource::TouristSpot,
            Self::Orders => Resource::Order,
            Self::Users => Resource::User,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    pub fn number(self) -> u8 {
        // ALL has nine entries.
        u8::try_from(self.index() + 1).unwrap_or(0)
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ads => "Ads",
            Self::Spots => "Spots",
            other => other.resource().label(),
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
