use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::body::RequestBody;
use crate::envelope::{Ack, ApiResponse, ListResponse, Page};
use crate::error::Error;
use crate::params::ListParams;
use crate::routes::{Endpoint, Resource, Verb};
use crate::transport::TransportConfig;

// ── Response shapes used only for error detection ────────────────────

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct SuccessFlag {
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(serde::Serialize)]
struct StatusChange<'a> {
    status: &'a str,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the directory REST API.
///
/// Holds the base URL (e.g. `http://host:5002/api/v1`) and a shared token
/// slot. When a token is present every request carries it verbatim in the
/// `Authorization` header; when absent no header is sent and the server
/// decides.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Arc<ArcSwapOption<SecretString>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            http,
            base_url,
            token: Arc::new(ArcSwapOption::empty()),
        })
    }

    pub fn with_token(self, token: Option<SecretString>) -> Self {
        self.set_token(token);
        self
    }

    // ── Token slot ───────────────────────────────────────────────────

    /// Replace the token used by all subsequent requests.
    pub fn set_token(&self, token: Option<SecretString>) {
        self.token.store(token.map(Arc::new));
    }

    pub fn has_token(&self) -> bool {
        self.token.load().is_some()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append the endpoint's segments to the base path, percent-encoding
    /// each one.
    pub fn url(&self, endpoint: &Endpoint) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(&endpoint.segments);
        Ok(url)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        params: &ListParams,
    ) -> Result<Page<T>, Error> {
        let endpoint = resource.list_endpoint();
        let body = self.send(&endpoint, &params.to_query(), None).await?;
        Self::parse::<ListResponse<T>>(&body)?.into_page()
    }

    pub async fn get<T: DeserializeOwned>(&self, resource: Resource, id: &str) -> Result<T, Error> {
        let endpoint = resource.get_endpoint(id);
        let body = self.send(&endpoint, &[], None).await?;
        Self::parse_data(&body)
    }

    /// Create a record. The whole envelope is returned so callers can
    /// surface the server's message.
    pub async fn create<T: DeserializeOwned>(
        &self,
        resource: Resource,
        payload: RequestBody,
    ) -> Result<ApiResponse<T>, Error> {
        let endpoint = resource.create_endpoint()?;
        let body = self.send(&endpoint, &[], Some(payload)).await?;
        Self::parse(&body)
    }

    pub async fn update<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
        payload: RequestBody,
    ) -> Result<ApiResponse<T>, Error> {
        let endpoint = resource.update_endpoint(id)?;
        let body = self.send(&endpoint, &[], Some(payload)).await?;
        Self::parse(&body)
    }

    pub async fn delete(&self, resource: Resource, id: &str) -> Result<Ack, Error> {
        let endpoint = resource.delete_endpoint(id)?;
        let body = self.send(&endpoint, &[], None).await?;
        Self::parse(&body)
    }

    // ── Resource-specific extras ─────────────────────────────────────

    /// The user the current token belongs to.
    pub async fn get_me<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let endpoint = Endpoint::new(Verb::Get, &["users", "get-me"]);
        let body = self.send(&endpoint, &[], None).await?;
        Self::parse_data(&body)
    }

    /// Move an order to `status` (`PENDING`, `COMPLETED`, `CANCELLED`).
    pub async fn update_order_status(&self, id: &str, status: &str) -> Result<Ack, Error> {
        let endpoint = Endpoint::new(Verb::Patch, &["orders", "status", id]);
        let payload = RequestBody::json(&StatusChange { status })?;
        let body = self.send(&endpoint, &[], Some(payload)).await?;
        Self::parse(&body)
    }

    // ── Transport ────────────────────────────────────────────────────

    /// Issue one request and return the raw body of a successful
    /// response whose envelope reports `success: true`.
    async fn send(
        &self,
        endpoint: &Endpoint,
        query: &[(String, String)],
        payload: Option<RequestBody>,
    ) -> Result<String, Error> {
        let url = self.url(endpoint)?;
        if query.is_empty() {
            debug!("{} {url}", endpoint.verb);
        } else {
            debug!("{} {url} params={query:?}", endpoint.verb);
        }

        let mut req = self.http.request(endpoint.verb.into(), url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = self.token.load_full() {
            let mut value = HeaderValue::from_str(token.expose_secret()).map_err(|e| {
                Error::Authentication {
                    message: format!("invalid token header value: {e}"),
                }
            })?;
            value.set_sensitive(true);
            req = req.header(AUTHORIZATION, value);
        }
        req = match payload {
            Some(RequestBody::Json(value)) => req.json(&value),
            Some(RequestBody::Multipart(body)) => req.multipart(body.into_form()?),
            None => req,
        };

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: Self::error_message(&body).unwrap_or_else(|| "token rejected".into()),
            });
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: Self::error_message(&body).unwrap_or_else(|| status.to_string()),
            });
        }

        let flag: SuccessFlag = Self::parse(&body)?;
        if !flag.success {
            return Err(Error::Rejected {
                message: flag.message,
            });
        }
        Ok(body)
    }

    // ── Response handling ────────────────────────────────────────────

    fn error_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
    }

    fn parse<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
        serde_json::from_str(body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            warn!(error = %e, "response does not match the envelope");
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.to_owned(),
            }
        })
    }

    fn parse_data<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
        Self::parse::<ApiResponse<T>>(body)?.into_data()
    }
}
