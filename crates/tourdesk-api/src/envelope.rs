// Normalized response envelope.
//
// Every endpoint answers `{ success, message, data }`. List endpoints nest
// a page (`{ data: [...], meta: {...} }`) inside `data`; deletes may omit
// `data` entirely. All three fields are required where they apply, so a
// body of any other shape surfaces as `Error::Deserialization`.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// `{ success, message, data }` around a typed payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, turning a body-level `success: false` into an error.
    pub fn into_data(self) -> Result<T, Error> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Error::Rejected {
                message: self.message,
            })
        }
    }
}

/// `{ success, message }` with no payload (deletes, status changes).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<OrderStats>,
}

/// List envelope that may also carry `stats` beside `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(flatten)]
    pub response: ApiResponse<Page<T>>,
    #[serde(default)]
    pub stats: Option<OrderStats>,
}

impl<T> ListResponse<T> {
    /// The page, with envelope-level `stats` moved onto it when the page
    /// has none of its own.
    pub(crate) fn into_page(self) -> Result<Page<T>, Error> {
        let mut page = self.response.into_data()?;
        if page.stats.is_none() {
            page.stats = self.stats;
        }
        Ok(page)
    }
}

/// Order counts by status. Only the orders listing sends them; they cover
/// every order, not just the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct OrderStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub confirmed: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub canceled: u64,
}

/// Server-reported pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta {
                page,
                limit,
                total: 0,
                total_pages: 0,
            },
            stats: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_meta_uses_camel_case() {
        let page: ApiResponse<Page<serde_json::Value>> = serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "data": {
                "data": [{ "id": "a" }],
                "meta": { "page": 2, "limit": 10, "total": 25, "totalPages": 3 }
            }
        }))
        .unwrap();

        let page = page.into_data().unwrap();
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.page, 2);
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn order_stats_are_read_beside_or_inside_the_page() {
        let counts = json!({ "total": 12, "pending": 5, "confirmed": 3, "completed": 3, "canceled": 1 });
        let beside: ListResponse<serde_json::Value> = serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "data": { "data": [], "meta": { "page": 1, "limit": 10, "total": 12, "totalPages": 2 } },
            "stats": counts
        }))
        .unwrap();
        let inside: ListResponse<serde_json::Value> = serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "data": {
                "data": [],
                "meta": { "page": 1, "limit": 10, "total": 12, "totalPages": 2 },
                "stats": counts
            }
        }))
        .unwrap();

        let expected = OrderStats {
            total: 12,
            pending: 5,
            confirmed: 3,
            completed: 3,
            canceled: 1,
        };
        assert_eq!(beside.into_page().unwrap().stats, Some(expected));
        assert_eq!(inside.into_page().unwrap().stats, Some(expected));
    }

    #[test]
    fn missing_message_is_rejected() {
        let parsed = serde_json::from_value::<ApiResponse<serde_json::Value>>(json!({
            "success": true,
            "data": {}
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn success_false_becomes_rejected() {
        let resp = ApiResponse {
            success: false,
            message: "Hotel not found".to_owned(),
            data: (),
        };
        match resp.into_data() {
            Err(Error::Rejected { message }) => assert_eq!(message, "Hotel not found"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
