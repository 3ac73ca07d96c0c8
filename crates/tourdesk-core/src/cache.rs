// ── Query cache ──
//
// Responses keyed by resource + query, grouped under the resource's tag.
// Invalidating a tag evicts every entry it groups and bumps the tag's
// version on a `watch` channel; list controllers subscribed to the tag
// observe the bump and refetch. One cache is shared (behind `Arc`) by every
// consumer of a `QueryClient`, so an invalidation from any screen reaches
// all of them.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tourdesk_api::{ListParams, Resource, Tag};
use tracing::{debug, info};

/// What a cached entry answers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKind {
    List(ListParams),
    Single(String),
    /// The current user.
    Me,
}

/// Endpoint identity plus parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: Resource,
    pub kind: QueryKind,
}

impl QueryKey {
    pub fn list(resource: Resource, params: &ListParams) -> Self {
        Self {
            resource,
            kind: QueryKind::List(params.clone()),
        }
    }

    pub fn single(resource: Resource, id: &str) -> Self {
        Self {
            resource,
            kind: QueryKind::Single(id.to_owned()),
        }
    }

    pub fn me() -> Self {
        Self {
            resource: Resource::User,
            kind: QueryKind::Me,
        }
    }

    pub fn tag(&self) -> Tag {
        self.resource.tag()
    }
}

type Cached = Arc<dyn Any + Send + Sync>;

/// Process-wide response cache with per-tag invalidation.
#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, Cached>,
    versions: DashMap<Tag, watch::Sender<u64>>,
}

impl QueryCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ── Entries ──────────────────────────────────────────────────────

    /// Cached value for `key`, if present and of type `T`.
    pub fn get<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let cached = self.entries.get(key)?.value().clone();
        cached.downcast::<T>().ok()
    }

    pub fn insert<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) -> Arc<T> {
        let value = Arc::new(value);
        let cached: Cached = value.clone();
        self.entries.insert(key, cached);
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── Tags ─────────────────────────────────────────────────────────

    /// Evict every entry grouped under `tag` and notify its subscribers.
    /// Returns the number of evicted entries.
    pub fn invalidate(&self, tag: Tag) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.tag() != tag);
        let evicted = before.saturating_sub(self.entries.len());

        self.versions
            .entry(tag)
            .or_insert_with(|| watch::channel(0).0)
            .send_modify(|version| *version += 1);
        info!(%tag, evicted, "cache tag invalidated");
        evicted
    }

    /// Drop everything, e.g. after the token changes.
    pub fn clear(&self) {
        self.entries.clear();
        for entry in &self.versions {
            entry.value().send_modify(|version| *version += 1);
        }
        debug!("query cache cleared");
    }

    /// Receiver that changes whenever `tag` is invalidated.
    pub fn subscribe(&self, tag: Tag) -> watch::Receiver<u64> {
        self.versions
            .entry(tag)
            .or_insert_with(|| watch::channel(0).0)
            .subscribe()
    }

    /// Number of times `tag` has been invalidated.
    pub fn version(&self, tag: Tag) -> u64 {
        self.versions.get(&tag).map_or(0, |tx| *tx.borrow())
    }
}
