//! List worker, one background task per entity screen.
//!
//! The task owns the screen's `ListController` and `EntityView`. Screens
//! send it `ScreenCommand`s and read the controller's `ListState` from a
//! `watch` receiver, so rendering never waits on the network. The worker
//! also refetches when the entity's cache tag is invalidated and applies a
//! debounced server search once its deadline passes.

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tourdesk_core::{CoreError, EntityView, ListController, Notifier};
use tracing::{debug, warn};

use crate::screens::columns::TableRow;

#[derive(Debug, Clone)]
pub enum ScreenCommand<T> {
    /// Show the current page, from the cache when possible.
    Load,
    /// Refetch the current page.
    Refresh,
    Next,
    Prev,
    /// Search box contents changed.
    Search(String),
    /// Apply the pending search term without waiting.
    FlushSearch,
    OpenDetails(T),
    CloseDetails,
    Delete(T),
    CycleStatus(T),
}

pub async fn run_list_worker<T: TableRow, N: Notifier>(
    mut list: ListController<T>,
    mut view: EntityView<T, N>,
    mut commands: mpsc::UnboundedReceiver<ScreenCommand<T>>,
    cancel: CancellationToken,
) {
    loop {
        let deadline = list.search_deadline();
        let wake = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

        let result = tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            cmd = commands.recv() => match cmd {
                Some(cmd) => handle(&mut list, &mut view, cmd).await,
                None => break,
            },

            () = list.invalidated() => {
                let reloaded = list.reload().await;
                if let Err(ref e) = reloaded {
                    warn!(resource = T::RESOURCE.label(), error = %e, "refetch after invalidation failed");
                }
                reloaded
            }

            () = sleep_until(wake), if deadline.is_some() => {
                list.poll_search(Instant::now()).await.map(drop)
            }
        };

        // Failures are already on screen through ListState or a notification.
        if let Err(e) = result {
            debug!(resource = T::RESOURCE.label(), error = %e, "worker step failed");
        }
    }

    debug!(resource = T::RESOURCE.label(), "list worker shut down");
}

async fn handle<T: TableRow, N: Notifier>(
    list: &mut ListController<T>,
    view: &mut EntityView<T, N>,
    cmd: ScreenCommand<T>,
) -> Result<(), CoreError> {
    match cmd {
        ScreenCommand::Load => list.refresh().await,
        ScreenCommand::Refresh => list.reload().await,
        ScreenCommand::Next => list.next().await.map(drop),
        ScreenCommand::Prev => list.prev().await.map(drop),
        ScreenCommand::Search(input) => {
            list.set_search(&input, Instant::now());
            Ok(())
        }
        ScreenCommand::FlushSearch => list.flush_search().await.map(drop),
        ScreenCommand::OpenDetails(record) => view.open_details(record),
        ScreenCommand::CloseDetails => view.close_details(),
        ScreenCommand::Delete(record) => {
            view.request_delete(&record)?;
            view.confirm_delete().await.map(drop)
        }
        ScreenCommand::CycleStatus(record) => T::cycle_status(view, &record).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use tourdesk_core::{
        ApiClient, Hotel, ListState, Notification, QueryCache, QueryClient, TransportConfig,
    };
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(ids: &[&str], page: u32, total_pages: u32) -> serde_json::Value {
        let rows: Vec<_> = ids
            .iter()
            .map(|id| json!({ "id": id, "name": format!("Hotel {id}"), "address": "Mérida" }))
            .collect();
        json!({
            "success": true,
            "message": "ok",
            "data": {
                "data": rows,
                "meta": { "page": page, "limit": 10, "total": 20, "totalPages": total_pages }
            }
        })
    }

    async fn wait_for<T: Clone>(
        rx: &mut tokio::sync::watch::Receiver<ListState<T>>,
        done: impl Fn(&ListState<T>) -> bool,
    ) -> ListState<T> {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                {
                    let state = rx.borrow_and_update();
                    if done(&*state) {
                        return state.clone();
                    }
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn loads_pages_and_deletes_through_the_view() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hotels"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&["h1", "h2"], 1, 2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hotels"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&["h3"], 2, 2)))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/hotels/delete/h3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "message": "Hotel removed" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), &TransportConfig::default()).unwrap();
        let client = QueryClient::new(api, QueryCache::new());
        let list = ListController::<Hotel>::new(client.clone());
        let mut state = list.subscribe();
        let (note_tx, mut notes) = mpsc::unbounded_channel::<Notification>();
        let view = EntityView::new(client, note_tx);
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_list_worker(list, view, rx, cancel.clone()));
        tx.send(ScreenCommand::Load).unwrap();

        let first = wait_for(&mut state, |s| s.total_pages == 2).await;
        assert_eq!(first.visible.len(), 2);

        tx.send(ScreenCommand::Next).unwrap();
        let second = wait_for(&mut state, |s| s.page == 2 && !s.fetching).await;
        let record: Hotel = second.visible[0].clone();
        assert_eq!(record.id, "h3");

        tx.send(ScreenCommand::Delete(record)).unwrap();
        let note = tokio::time::timeout(Duration::from_secs(5), notes.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(note.message, "Hotel removed");

        cancel.cancel();
        task.await.unwrap();
    }
}
