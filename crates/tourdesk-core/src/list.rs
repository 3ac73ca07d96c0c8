// ── List/search/pagination controller ──
//
// One generic controller per entity screen. It owns the page number, page
// size, search input and filters, derives the list query from them, and
// publishes a `ListState` snapshot on a `watch` channel after every change.
// Search runs either on the server (debounced query parameter) or on the
// client (substring filter over the loaded page), as declared by the
// entity's `SEARCH` mode.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tourdesk_api::{ListParams, OrderStats, Page, SortOrder};
use tracing::debug;

use crate::client::QueryClient;
use crate::error::CoreError;
use crate::model::{Entity, SearchMode};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(450);

// ── Debouncer ────────────────────────────────────────────────────────

/// Holds the latest input until it has been quiet for `delay`.
///
/// Time is passed in rather than read, so callers decide the clock.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new input. Restarts the quiet period.
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now));
    }

    /// The pending value, once `delay` has elapsed since the last push.
    pub fn ready(&mut self, now: Instant) -> Option<String> {
        let (_, at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*at) < self.delay {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    /// Take the pending value regardless of the delay.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(value, _)| value)
    }

    /// When the pending value becomes ready.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

// ── State snapshot ───────────────────────────────────────────────────

/// What a list screen renders.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    /// Rows of the loaded page, as returned by the server.
    pub rows: Vec<T>,
    /// Rows to show: `rows` narrowed by client-side search, if any.
    pub visible: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    /// Status counts, for entities whose listing reports them (orders).
    pub stats: Option<OrderStats>,
    /// Search box contents as typed.
    pub search: String,
    /// No page has been loaded yet and a request is in flight.
    pub loading: bool,
    /// Any request is in flight.
    pub fetching: bool,
    pub error: Option<String>,
}

impl<T> ListState<T> {
    fn empty(limit: u32) -> Self {
        Self {
            rows: Vec::new(),
            visible: Vec::new(),
            page: 1,
            limit,
            total: 0,
            total_pages: 0,
            stats: None,
            search: String::new(),
            loading: false,
            fetching: false,
            error: None,
        }
    }

    pub fn can_next(&self) -> bool {
        page_in_range(self.page.saturating_add(1), self.total_pages)
    }

    pub fn can_prev(&self) -> bool {
        page_in_range(self.page.saturating_sub(1), self.total_pages)
    }
}

/// `true` when `page` lies in `[1, total_pages]`.
pub fn page_in_range(page: u32, total_pages: u32) -> bool {
    (1..=total_pages).contains(&page)
}

// ── Controller ───────────────────────────────────────────────────────

pub struct ListController<T: Entity> {
    client: QueryClient,
    params: ListParams,
    input: String,
    debouncer: Debouncer,
    loaded: Option<Arc<Page<T>>>,
    tag_rx: watch::Receiver<u64>,
    state: watch::Sender<ListState<T>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> ListController<T> {
    pub fn new(client: QueryClient) -> Self {
        let tag_rx = client.cache().subscribe(T::RESOURCE.tag());
        let (state, _) = watch::channel(ListState::empty(T::PAGE_SIZE));
        Self {
            client,
            params: ListParams::new(1, T::PAGE_SIZE),
            input: String::new(),
            debouncer: Debouncer::default(),
            loaded: None,
            tag_rx,
            state,
            _entity: PhantomData,
        }
    }

    pub fn with_page_size(mut self, limit: u32) -> Self {
        self.params.limit = limit.max(1);
        self.state.send_modify(|s| s.limit = self.params.limit);
        self
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debouncer = Debouncer::new(delay);
        self
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    /// Parameters of the current (or next) list request.
    pub fn params(&self) -> &ListParams {
        &self.params
    }

    pub fn page(&self) -> u32 {
        self.params.page
    }

    pub fn total_pages(&self) -> u32 {
        self.loaded.as_ref().map_or(0, |p| p.meta.total_pages)
    }

    pub fn can_next(&self) -> bool {
        page_in_range(self.params.page.saturating_add(1), self.total_pages())
    }

    pub fn can_prev(&self) -> bool {
        page_in_range(self.params.page.saturating_sub(1), self.total_pages())
    }

    /// When a debounced search term is due, for callers that sleep until it.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Load the current page, from the cache when possible.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        self.load(false).await
    }

    /// Load the current page from the network.
    pub async fn reload(&mut self) -> Result<(), CoreError> {
        self.load(true).await
    }

    /// Refetch if the entity's tag was invalidated since the last look.
    /// Returns whether a request was issued.
    pub async fn sync(&mut self) -> Result<bool, CoreError> {
        if !self.tag_rx.has_changed().unwrap_or(false) {
            return Ok(false);
        }
        self.tag_rx.mark_unchanged();
        debug!(resource = T::RESOURCE.label(), "tag invalidated, refetching");
        self.reload().await.map(|()| true)
    }

    /// Wait until the entity's tag is invalidated. The change is consumed
    /// here, so follow up with `reload` rather than `sync`.
    pub async fn invalidated(&mut self) {
        if self.tag_rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    async fn load(&mut self, bypass_cache: bool) -> Result<(), CoreError> {
        let first_load = self.loaded.is_none();
        self.state.send_modify(|s| {
            s.fetching = true;
            s.loading = first_load;
        });

        let mut result = self.fetch(bypass_cache).await;
        // Deleting the last row of the last page shrinks the page count.
        let last_page = result.as_ref().ok().map(|page| page.meta.total_pages.max(1));
        if let Some(last) = last_page {
            if self.params.page > last {
                debug!(
                    resource = T::RESOURCE.label(),
                    page = self.params.page,
                    last,
                    "page past the end, stepping back"
                );
                self.params.page = last;
                result = self.fetch(bypass_cache).await;
            }
        }

        match result {
            Ok(page) => {
                self.loaded = Some(page);
                self.publish(None);
                Ok(())
            }
            Err(e) => {
                self.publish(Some(e.user_message()));
                Err(e)
            }
        }
    }

    async fn fetch(&self, bypass_cache: bool) -> Result<Arc<Page<T>>, CoreError> {
        if bypass_cache {
            self.client.fetch_list::<T>(&self.params).await
        } else {
            self.client.list::<T>(&self.params).await
        }
    }

    /// Load with `params` in place of the current ones. On failure the
    /// previous params come back, matching the rows still on screen.
    async fn load_with(&mut self, params: ListParams) -> Result<(), CoreError> {
        let previous = std::mem::replace(&mut self.params, params);
        if let Err(e) = self.refresh().await {
            self.params = previous;
            self.publish(Some(e.user_message()));
            return Err(e);
        }
        Ok(())
    }

    fn publish(&self, error: Option<String>) {
        let rows = self
            .loaded
            .as_ref()
            .map(|page| page.data.clone())
            .unwrap_or_default();
        let visible = self.filter_rows(&rows);
        let meta = self.loaded.as_ref().map(|page| page.meta);
        let stats = self.loaded.as_ref().and_then(|page| page.stats);
        let params = &self.params;
        let input = self.input.clone();

        self.state.send_modify(|s| {
            s.rows = rows;
            s.visible = visible;
            s.page = params.page;
            s.limit = params.limit;
            s.total = meta.map_or(0, |m| m.total);
            s.total_pages = meta.map_or(0, |m| m.total_pages);
            s.stats = stats;
            s.search = input;
            s.loading = false;
            s.fetching = false;
            s.error = error;
        });
    }

    fn filter_rows(&self, rows: &[T]) -> Vec<T> {
        match T::SEARCH {
            SearchMode::Client => rows
                .iter()
                .filter(|row| row.matches(&self.input))
                .cloned()
                .collect(),
            SearchMode::Server => rows.to_vec(),
        }
    }

    // ── Pagination ───────────────────────────────────────────────────

    /// Go to `page`. Pages outside `[1, total_pages]` are ignored.
    /// Returns whether the page changed.
    pub async fn go_to(&mut self, page: u32) -> Result<bool, CoreError> {
        if page == self.params.page || !page_in_range(page, self.total_pages()) {
            return Ok(false);
        }
        let mut params = self.params.clone();
        params.page = page;
        self.load_with(params).await.map(|()| true)
    }

    pub async fn next(&mut self) -> Result<bool, CoreError> {
        self.go_to(self.params.page.saturating_add(1)).await
    }

    pub async fn prev(&mut self) -> Result<bool, CoreError> {
        self.go_to(self.params.page.saturating_sub(1)).await
    }

    // ── Search ───────────────────────────────────────────────────────

    /// Record new search box contents.
    ///
    /// Client-search entities re-filter the loaded page right away and
    /// issue no search request; away from page 1 they also arm the
    /// debouncer so the settled term returns the list to page 1.
    /// Server-search entities only arm the debouncer; `poll_search` sends
    /// the request once the input has settled.
    pub fn set_search(&mut self, input: &str, now: Instant) {
        input.clone_into(&mut self.input);
        match T::SEARCH {
            SearchMode::Client => {
                let error = self.state.borrow().error.clone();
                self.publish(error);
                if self.params.page != 1 {
                    self.debouncer.push(input, now);
                }
            }
            SearchMode::Server => {
                self.debouncer.push(input, now);
                let input = self.input.clone();
                self.state.send_modify(|s| s.search = input);
            }
        }
    }

    /// Apply a settled search term: page resets to 1 and, for server
    /// search, the list is fetched with the trimmed term. Returns whether
    /// a request was issued.
    pub async fn poll_search(&mut self, now: Instant) -> Result<bool, CoreError> {
        match self.debouncer.ready(now) {
            Some(term) => self.apply_search(&term).await,
            None => Ok(false),
        }
    }

    /// Apply any pending search term without waiting for the debounce.
    pub async fn flush_search(&mut self) -> Result<bool, CoreError> {
        match self.debouncer.flush() {
            Some(term) => self.apply_search(&term).await,
            None => Ok(false),
        }
    }

    async fn apply_search(&mut self, term: &str) -> Result<bool, CoreError> {
        let mut next = match T::SEARCH {
            SearchMode::Client if self.params.page == 1 => return Ok(false),
            SearchMode::Client => self.params.clone(),
            SearchMode::Server => {
                let next = self.params.clone().with_search(term);
                if next.search == self.params.search {
                    return Ok(false);
                }
                next
            }
        };
        next.page = 1;
        self.load_with(next).await.map(|()| true)
    }

    // ── Filters & sorting ────────────────────────────────────────────

    /// Set (or clear, with `None`) an entity-specific filter. Resets the
    /// page to 1 and refetches.
    pub async fn set_filter(&mut self, key: &str, value: Option<&str>) -> Result<(), CoreError> {
        let mut next = match value {
            Some(value) => self.params.clone().with_filter(key, value),
            None => {
                let mut next = self.params.clone();
                next.filters.remove(key);
                next
            }
        };
        next.page = 1;
        self.load_with(next).await
    }

    pub async fn set_sort(&mut self, field: &str, order: SortOrder) -> Result<(), CoreError> {
        let next = self.params.clone().with_sort(field, order);
        self.load_with(next).await
    }
}
