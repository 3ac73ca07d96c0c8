// ── Query client ──
//
// Cache-aware front for `ApiClient`. Reads go through the injected
// `QueryCache`; every successful mutation invalidates the tag of the
// resource it touched, which is what makes subscribed list controllers
// refetch. Failed mutations leave the cache alone.

use std::sync::Arc;

use secrecy::SecretString;
use tourdesk_api::{Ack, ApiClient, ApiResponse, ListParams, Page, RequestBody, Tag};
use tracing::debug;

use crate::cache::{QueryCache, QueryKey};
use crate::error::CoreError;
use crate::model::{Entity, Order, OrderStatus, User};

/// Outcome of a create/update: the record plus the server's message.
#[derive(Debug, Clone)]
pub struct Saved<T> {
    pub message: String,
    pub data: T,
}

impl<T> From<ApiResponse<T>> for Saved<T> {
    fn from(resp: ApiResponse<T>) -> Self {
        Self {
            message: resp.message,
            data: resp.data,
        }
    }
}

/// Cheaply cloneable; clones share the HTTP client, token slot and cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<QueryClientInner>,
}

struct QueryClientInner {
    api: ApiClient,
    cache: Arc<QueryCache>,
}

impl QueryClient {
    pub fn new(api: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self {
            inner: Arc::new(QueryClientInner { api, cache }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.inner.cache
    }

    /// Swap the token. Cached responses belonged to the old identity and
    /// are dropped.
    pub fn set_token(&self, token: Option<SecretString>) {
        self.inner.api.set_token(token);
        self.inner.cache.clear();
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// One page of `T`, served from the cache when present.
    pub async fn list<T: Entity>(&self, params: &ListParams) -> Result<Arc<Page<T>>, CoreError> {
        let resource = T::RESOURCE;
        let key = QueryKey::list(resource, params);
        if let Some(hit) = self.inner.cache.get::<Page<T>>(&key) {
            debug!(%resource, page = params.page, "list served from cache");
            return Ok(hit);
        }
        self.fetch_list(params).await
    }

    /// One page of `T`, always from the network. The result replaces
    /// whatever the cache held for the same parameters.
    pub async fn fetch_list<T: Entity>(
        &self,
        params: &ListParams,
    ) -> Result<Arc<Page<T>>, CoreError> {
        let page: Page<T> = self.inner.api.list(T::RESOURCE, params).await?;
        Ok(self
            .inner
            .cache
            .insert(QueryKey::list(T::RESOURCE, params), page))
    }

    pub async fn get<T: Entity>(&self, id: &str) -> Result<Arc<T>, CoreError> {
        let key = QueryKey::single(T::RESOURCE, id);
        if let Some(hit) = self.inner.cache.get::<T>(&key) {
            return Ok(hit);
        }
        let record: T = self.inner.api.get(T::RESOURCE, id).await?;
        Ok(self.inner.cache.insert(key, record))
    }

    /// The user the current token belongs to.
    pub async fn me(&self) -> Result<Arc<User>, CoreError> {
        let key = QueryKey::me();
        if let Some(hit) = self.inner.cache.get::<User>(&key) {
            return Ok(hit);
        }
        let user: User = self.inner.api.get_me().await?;
        Ok(self.inner.cache.insert(key, user))
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn create<T: Entity>(&self, body: RequestBody) -> Result<Saved<T>, CoreError> {
        let resp = self.inner.api.create::<T>(T::RESOURCE, body).await?;
        self.invalidate(T::RESOURCE.tag());
        Ok(resp.into())
    }

    pub async fn update<T: Entity>(
        &self,
        id: &str,
        body: RequestBody,
    ) -> Result<Saved<T>, CoreError> {
        let resp = self.inner.api.update::<T>(T::RESOURCE, id, body).await?;
        self.invalidate(T::RESOURCE.tag());
        Ok(resp.into())
    }

    pub async fn delete<T: Entity>(&self, id: &str) -> Result<Ack, CoreError> {
        let ack = self.inner.api.delete(T::RESOURCE, id).await?;
        self.invalidate(T::RESOURCE.tag());
        Ok(ack)
    }

    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Ack, CoreError> {
        let ack = self
            .inner
            .api
            .update_order_status(id, status.as_str())
            .await?;
        self.invalidate(Order::RESOURCE.tag());
        Ok(ack)
    }

    pub fn invalidate(&self, tag: Tag) {
        self.inner.cache.invalidate(tag);
    }
}
