// Resource endpoint definitions.
//
// Each entity declares its list/get/create/update/delete routes, the body
// encoding its mutations use, and the cache tag its queries provide and its
// mutations invalidate. Path conventions differ between entities on the
// server; this table is the one place that knows about it.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::Error;

// ── Resources & tags ────────────────────────────────────────────────

/// Every entity type the dashboard manages.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Hotel,
    Posada,
    Restaurant,
    Service,
    Sponsor,
    Advertisement,
    TouristSpot,
    Order,
    User,
}

/// Cache tag. Queries provide a tag; mutations invalidate it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, IntoStaticStr,
)]
pub enum Tag {
    Hotel,
    Posadas,
    Restaurants,
    ServiceList,
    Sponsor,
    Advertisement,
    TouristSpots,
    Orders,
    User,
}

/// The five CRUD operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// How a resource's create/update bodies are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Multipart,
}

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Verb> for reqwest::Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Self::GET,
            Verb::Post => Self::POST,
            Verb::Put => Self::PUT,
            Verb::Patch => Self::PATCH,
            Verb::Delete => Self::DELETE,
        }
    }
}

// ── Path shapes ─────────────────────────────────────────────────────

/// Where an operation's path sits relative to the resource base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// `{base}/{verb}` for collections, `{base}/{verb}/{id}` for members.
    Verb(&'static str),
    /// `{base}` for collections, `{base}/{id}` for members.
    Bare,
}

impl PathStyle {
    fn collection(self, base: &'static str) -> Vec<String> {
        let mut segments = vec![base.to_owned()];
        if let Self::Verb(verb) = self {
            segments.push(verb.to_owned());
        }
        segments
    }

    fn member(self, base: &'static str, id: &str) -> Vec<String> {
        let mut segments = self.collection(base);
        segments.push(id.to_owned());
        segments
    }
}

/// Declarative route table for one resource.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    pub base: &'static str,
    pub list: PathStyle,
    pub get: PathStyle,
    pub create: Option<PathStyle>,
    pub update: Option<(Verb, PathStyle)>,
    pub delete: Option<PathStyle>,
    pub body: BodyKind,
}

/// A resolved request target: verb plus unencoded path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub verb: Verb,
    pub segments: Vec<String>,
}

impl Endpoint {
    pub fn new(verb: Verb, segments: &[&str]) -> Self {
        Self {
            verb,
            segments: segments.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Slash-joined path, used for logging and cache keys.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.path())
    }
}

// ── Resource routing ────────────────────────────────────────────────

const SINGLE: PathStyle = PathStyle::Verb("single");
const CREATE: PathStyle = PathStyle::Verb("create");
const UPDATE: PathStyle = PathStyle::Verb("update");
const DELETE: PathStyle = PathStyle::Verb("delete");

impl Resource {
    pub const ALL: [Self; 9] = [
        Self::Hotel,
        Self::Posada,
        Self::Restaurant,
        Self::Service,
        Self::Sponsor,
        Self::Advertisement,
        Self::TouristSpot,
        Self::Order,
        Self::User,
    ];

    /// Plural display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hotel => "Hotels",
            Self::Posada => "Posadas",
            Self::Restaurant => "Restaurants",
            Self::Service => "Services",
            Self::Sponsor => "Sponsors",
            Self::Advertisement => "Advertisements",
            Self::TouristSpot => "Tourist Spots",
            Self::Order => "Orders",
            Self::User => "Users",
        }
    }

    pub fn tag(self) -> Tag {
        match self {
            Self::Hotel => Tag::Hotel,
            Self::Posada => Tag::Posadas,
            Self::Restaurant => Tag::Restaurants,
            Self::Service => Tag::ServiceList,
            Self::Sponsor => Tag::Sponsor,
            Self::Advertisement => Tag::Advertisement,
            Self::TouristSpot => Tag::TouristSpots,
            Self::Order => Tag::Orders,
            Self::User => Tag::User,
        }
    }

    pub fn routes(self) -> RouteTable {
        let standard = |base: &'static str| RouteTable {
            base,
            list: PathStyle::Bare,
            get: SINGLE,
            create: Some(CREATE),
            update: Some((Verb::Patch, UPDATE)),
            delete: Some(DELETE),
            body: BodyKind::Multipart,
        };

        match self {
            // Media is uploaded separately; these carry URLs in JSON.
            Self::Hotel => RouteTable {
                body: BodyKind::Json,
                ..standard("hotels")
            },
            Self::Posada => RouteTable {
                body: BodyKind::Json,
                ..standard("posadas")
            },
            Self::Service => standard("services"),
            Self::TouristSpot => standard("tourist-spots"),
            // Create and delete have no confirmed endpoint yet.
            Self::Restaurant => RouteTable {
                create: None,
                delete: None,
                body: BodyKind::Json,
                ..standard("restaurants")
            },
            Self::Sponsor => RouteTable {
                get: PathStyle::Bare,
                delete: Some(PathStyle::Bare),
                ..standard("sponsor")
            },
            Self::Advertisement => RouteTable {
                get: PathStyle::Bare,
                create: Some(PathStyle::Bare),
                update: Some((Verb::Patch, PathStyle::Bare)),
                delete: Some(PathStyle::Bare),
                ..standard("advertisements")
            },
            Self::Order => RouteTable {
                list: PathStyle::Verb("all-orders"),
                update: Some((Verb::Put, UPDATE)),
                body: BodyKind::Json,
                ..standard("orders")
            },
            Self::User => RouteTable {
                list: PathStyle::Verb("all-users"),
                get: PathStyle::Bare,
                create: None,
                update: Some((Verb::Patch, PathStyle::Bare)),
                body: BodyKind::Json,
                ..standard("users")
            },
        }
    }

    pub fn body_kind(self) -> BodyKind {
        self.routes().body
    }

    pub fn supports(self, op: Operation) -> bool {
        let routes = self.routes();
        match op {
            Operation::List | Operation::Get => true,
            Operation::Create => routes.create.is_some(),
            Operation::Update => routes.update.is_some(),
            Operation::Delete => routes.delete.is_some(),
        }
    }

    // ── Endpoint resolution ─────────────────────────────────────────

    pub fn list_endpoint(self) -> Endpoint {
        let routes = self.routes();
        Endpoint {
            verb: Verb::Get,
            segments: routes.list.collection(routes.base),
        }
    }

    pub fn get_endpoint(self, id: &str) -> Endpoint {
        let routes = self.routes();
        Endpoint {
            verb: Verb::Get,
            segments: routes.get.member(routes.base, id),
        }
    }

    pub fn create_endpoint(self) -> Result<Endpoint, Error> {
        let routes = self.routes();
        let style = routes.create.ok_or_else(|| self.unsupported(Operation::Create))?;
        Ok(Endpoint {
            verb: Verb::Post,
            segments: style.collection(routes.base),
        })
    }

    pub fn update_endpoint(self, id: &str) -> Result<Endpoint, Error> {
        let routes = self.routes();
        let (verb, style) = routes.update.ok_or_else(|| self.unsupported(Operation::Update))?;
        Ok(Endpoint {
            verb,
            segments: style.member(routes.base, id),
        })
    }

    pub fn delete_endpoint(self, id: &str) -> Result<Endpoint, Error> {
        let routes = self.routes();
        let style = routes.delete.ok_or_else(|| self.unsupported(Operation::Delete))?;
        Ok(Endpoint {
            verb: Verb::Delete,
            segments: style.member(routes.base, id),
        })
    }

    fn unsupported(self, op: Operation) -> Error {
        Error::Unsupported {
            resource: self.label(),
            operation: op.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paths(resource: Resource) -> [String; 5] {
        [
            resource.list_endpoint().to_string(),
            resource.get_endpoint("x1").to_string(),
            resource
                .create_endpoint()
                .map_or_else(|_| "-".into(), |e| e.to_string()),
            resource
                .update_endpoint("x1")
                .map_or_else(|_| "-".into(), |e| e.to_string()),
            resource
                .delete_endpoint("x1")
                .map_or_else(|_| "-".into(), |e| e.to_string()),
        ]
    }

    #[test]
    fn hotel_routes_follow_verb_convention() {
        assert_eq!(
            paths(Resource::Hotel),
            [
                "GET /hotels",
                "GET /hotels/single/x1",
                "POST /hotels/create",
                "PATCH /hotels/update/x1",
                "DELETE /hotels/delete/x1",
            ]
        );
    }

    #[test]
    fn sponsor_deletes_on_bare_member_path() {
        assert_eq!(
            paths(Resource::Sponsor),
            [
                "GET /sponsor",
                "GET /sponsor/x1",
                "POST /sponsor/create",
                "PATCH /sponsor/update/x1",
                "DELETE /sponsor/x1",
            ]
        );
    }

    #[test]
    fn advertisements_are_fully_restful() {
        assert_eq!(
            paths(Resource::Advertisement),
            [
                "GET /advertisements",
                "GET /advertisements/x1",
                "POST /advertisements",
                "PATCH /advertisements/x1",
                "DELETE /advertisements/x1",
            ]
        );
    }

    #[test]
    fn orders_and_users_list_under_named_collections() {
        assert_eq!(Resource::Order.list_endpoint().path(), "/orders/all-orders");
        assert_eq!(
            Resource::Order.update_endpoint("o1").unwrap().to_string(),
            "PUT /orders/update/o1"
        );
        assert_eq!(Resource::User.list_endpoint().path(), "/users/all-users");
        assert_eq!(Resource::User.get_endpoint("u1").path(), "/users/u1");
    }

    #[test]
    fn restaurant_create_and_delete_are_unsupported() {
        assert!(!Resource::Restaurant.supports(Operation::Create));
        assert!(!Resource::Restaurant.supports(Operation::Delete));
        assert!(Resource::Restaurant.supports(Operation::Update));
        let err = Resource::Restaurant.create_endpoint().unwrap_err();
        assert_eq!(err.to_string(), "Restaurants does not support create");
    }

    #[test]
    fn every_resource_has_a_distinct_tag() {
        let mut tags: Vec<Tag> = Resource::ALL.iter().map(|r| r.tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), Resource::ALL.len());
    }

    #[test]
    fn resource_parses_from_kebab_case() {
        assert_eq!(
            "tourist-spot".parse::<Resource>().unwrap(),
            Resource::TouristSpot
        );
        assert_eq!(Resource::Advertisement.to_string(), "advertisement");
    }
}
