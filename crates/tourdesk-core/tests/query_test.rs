#![allow(clippy::unwrap_used)]
// Integration tests for the query client, list controller and view
// orchestrator against a wiremock server.

use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::Instant;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tourdesk_api::{ApiClient, RequestBody, Tag};
use tourdesk_core::{
    CoreError, EntityView, Hotel, HotelDraft, ListController, Notification, NotificationLevel,
    Order, OrderStatus, QueryCache, QueryClient, Sponsor, ViewMode,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, QueryClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api/v1", server.uri());
    let api = ApiClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    (server, QueryClient::new(api, QueryCache::new()))
}

fn hotels(ids: &[&str]) -> serde_json::Value {
    ids.iter()
        .map(|id| json!({ "id": id, "name": format!("Hotel {id}") }))
        .collect()
}

fn page_body(rows: serde_json::Value, page: u32, limit: u32, total_pages: u32) -> serde_json::Value {
    json!({
        "success": true,
        "message": "Retrieved",
        "data": {
            "data": rows,
            "meta": { "page": page, "limit": limit, "total": 25, "totalPages": total_pages }
        }
    })
}

fn ids<T: tourdesk_core::Entity>(rows: &[T]) -> Vec<String> {
    rows.iter().map(|r| r.id().to_owned()).collect()
}

fn drain(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

// ── Pagination ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_next_page_requests_page_two_and_replaces_rows() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h1", "h2"]), 1, 10, 3)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h11"]), 2, 10, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let mut list = ListController::<Hotel>::new(client);
    assert!(!list.can_next());

    list.refresh().await.unwrap();
    let state = list.state();
    assert_eq!(state.total_pages, 3);
    assert!(state.can_next());
    assert!(!state.can_prev());
    assert!(!state.loading && !state.fetching);

    assert!(list.next().await.unwrap());
    let state = list.state();
    assert_eq!(state.page, 2);
    assert_eq!(ids(&state.rows), ["h11"]);
    assert!(state.can_prev());
}

#[tokio::test]
async fn test_out_of_range_pages_are_noops() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h1"]), 1, 10, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let mut list = ListController::<Hotel>::new(client);
    list.refresh().await.unwrap();

    assert!(!list.next().await.unwrap());
    assert!(!list.prev().await.unwrap());
    assert!(!list.go_to(0).await.unwrap());
    assert!(!list.go_to(9).await.unwrap());
    assert_eq!(list.page(), 1);
}

#[tokio::test]
async fn test_same_params_are_served_from_cache() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h1"]), 1, 10, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let mut first = ListController::<Hotel>::new(client.clone());
    let mut second = ListController::<Hotel>::new(client);
    first.refresh().await.unwrap();
    second.refresh().await.unwrap();

    assert_eq!(ids(&second.state().rows), ["h1"]);
}

// ── Search ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_search_is_debounced_trimmed_and_resets_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h1"]), 1, 10, 3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param("search", "mar"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h7"]), 1, 10, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let mut list = ListController::<Hotel>::new(client);
    list.refresh().await.unwrap();
    list.next().await.unwrap();
    assert_eq!(list.page(), 2);

    let t0 = Instant::now();
    list.set_search("  m", t0);
    list.set_search("  mar ", t0 + Duration::from_millis(100));
    assert!(!list.poll_search(t0 + Duration::from_millis(400)).await.unwrap());
    assert!(list.poll_search(t0 + Duration::from_millis(550)).await.unwrap());

    assert_eq!(list.page(), 1);
    assert_eq!(list.params().search.as_deref(), Some("mar"));
    assert_eq!(ids(&list.state().rows), ["h7"]);
}

#[tokio::test]
async fn test_client_search_filters_loaded_page_without_requests() {
    let (server, client) = setup().await;

    let rows = json!([
        { "id": "s1", "sponsorName": "Cerveza Sol", "address": "Caracas" },
        { "id": "s2", "sponsorName": "Banco Norte", "address": "Solano 4" },
        { "id": "s3", "sponsorName": "Farmacia Sur", "address": "Mérida" }
    ]);
    Mock::given(method("GET"))
        .and(path("/api/v1/sponsor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(rows, 1, 10, 4)))
        .expect(1)
        .mount(&server)
        .await;

    let mut list = ListController::<Sponsor>::new(client);
    list.refresh().await.unwrap();

    list.set_search("SOL", Instant::now());
    let state = list.state();
    assert_eq!(ids(&state.visible), ["s1", "s2"]);
    assert_eq!(state.rows.len(), 3);
    assert!(list.params().search.is_none());

    list.set_search("", Instant::now());
    assert_eq!(list.state().visible.len(), 3);
}

#[tokio::test]
async fn test_client_search_returns_to_first_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/sponsor"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{ "id": "s1", "sponsorName": "Cerveza Sol" }]),
            1,
            10,
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sponsor"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            json!([{ "id": "s11", "sponsorName": "Banco Norte" }]),
            2,
            10,
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;

    // Page 1 comes back from the cache.
    let mut list = ListController::<Sponsor>::new(client);
    list.refresh().await.unwrap();
    assert!(list.next().await.unwrap());

    list.set_search("sol", Instant::now());
    assert!(list.state().visible.is_empty());
    assert!(list.flush_search().await.unwrap());

    let state = list.state();
    assert_eq!(state.page, 1);
    assert_eq!(ids(&state.visible), ["s1"]);
    assert!(list.params().search.is_none());
}

#[tokio::test]
async fn test_failed_search_can_be_retried() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h1"]), 1, 10, 3)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param("search", "mar"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "Search backend unavailable"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param("search", "mar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h7"]), 1, 10, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let mut list = ListController::<Hotel>::new(client);
    list.refresh().await.unwrap();

    list.set_search("mar", Instant::now());
    assert!(list.flush_search().await.is_err());
    let state = list.state();
    assert!(list.params().search.is_none());
    assert_eq!(ids(&state.rows), ["h1"]);
    assert!(state.error.is_some());

    list.set_search("mar", Instant::now());
    assert!(list.flush_search().await.unwrap());
    let state = list.state();
    assert_eq!(list.params().search.as_deref(), Some("mar"));
    assert_eq!(ids(&state.rows), ["h7"]);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_failed_filter_keeps_previous_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/orders/all-orders"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(json!([]), 1, 10, 1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders/all-orders"))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut list = ListController::<Order>::new(client);
    list.refresh().await.unwrap();

    assert!(list.set_filter("status", Some("PENDING")).await.is_err());
    assert!(list.params().filters.is_empty());
}

#[tokio::test]
async fn test_reload_past_last_page_steps_back() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h1"]), 1, 10, 2)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h11"]), 2, 10, 2)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // h11 was deleted elsewhere: page 2 is now past the end.
    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(json!([]), 2, 10, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let mut list = ListController::<Hotel>::new(client);
    list.refresh().await.unwrap();
    assert!(list.next().await.unwrap());

    list.reload().await.unwrap();
    let state = list.state();
    assert_eq!(state.page, 1);
    assert_eq!(state.total_pages, 1);
    assert_eq!(ids(&state.rows), ["h1"]);
    assert!(!state.can_prev());
}

#[tokio::test]
async fn test_order_stats_reach_the_list_state() {
    let (server, client) = setup().await;

    let mut body = page_body(json!([]), 1, 10, 3);
    body["stats"] = json!({ "total": 25, "pending": 10, "confirmed": 5, "completed": 8, "canceled": 2 });
    Mock::given(method("GET"))
        .and(path("/api/v1/orders/all-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let mut list = ListController::<Order>::new(client);
    list.refresh().await.unwrap();

    let stats = list.state().stats.unwrap();
    assert_eq!(stats.total, 25);
    assert_eq!(stats.pending, 10);
    assert_eq!(stats.canceled, 2);
}

// ── Mutations & invalidation ────────────────────────────────────────

#[tokio::test]
async fn test_confirmed_delete_invalidates_and_refetch_omits_row() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["abc123", "h2"]), 1, 10, 1)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/hotels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(hotels(&["h2"]), 1, 10, 1)))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/hotels/delete/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Hotel deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let mut list = ListController::<Hotel>::new(client.clone());
    let mut view = EntityView::<Hotel, _>::new(client.clone(), tx);

    list.refresh().await.unwrap();
    let target = list.state().rows[0].clone();

    view.request_delete(&target).unwrap();
    assert_eq!(view.pending_delete().unwrap().id, "abc123");
    assert!(view.confirm_delete().await.unwrap());
    assert_eq!(client.cache().version(Tag::Hotel), 1);

    assert!(list.sync().await.unwrap());
    assert_eq!(ids(&list.state().rows), ["h2"]);
    assert!(!list.sync().await.unwrap());

    let notes = drain(&mut rx);
    assert_eq!(notes, [Notification::success("Hotel deleted")]);
}

#[tokio::test]
async fn test_cancelled_or_unrequested_delete_issues_nothing() {
    let (server, client) = setup().await;
    let (tx, _rx) = mpsc::unbounded_channel::<Notification>();
    let mut view = EntityView::<Hotel, _>::new(client, tx);

    assert!(!view.confirm_delete().await.unwrap());

    let hotel: Hotel = serde_json::from_value(json!({ "id": "h1", "name": "Mar" })).unwrap();
    view.request_delete(&hotel).unwrap();
    view.cancel_delete();
    assert!(!view.confirm_delete().await.unwrap());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_delete_reports_server_message_and_keeps_cache() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/sponsor/s1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "message": "Sponsor has active campaigns"
        })))
        .mount(&server)
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let mut view = EntityView::<Sponsor, _>::new(client.clone(), tx);
    let sponsor: Sponsor =
        serde_json::from_value(json!({ "id": "s1", "sponsorName": "Sol" })).unwrap();

    view.request_delete(&sponsor).unwrap();
    assert!(view.confirm_delete().await.is_err());
    assert_eq!(client.cache().version(Tag::Sponsor), 0);

    let notes = drain(&mut rx);
    assert_eq!(notes, [Notification::error("Sponsor has active campaigns")]);
}

#[tokio::test]
async fn test_rejected_create_keeps_the_form_open() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/hotels/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Name already taken",
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let mut view = EntityView::<Hotel, _>::new(client.clone(), tx);
    view.open_add().unwrap();

    let draft = HotelDraft {
        name: "Hotel Mar".into(),
        address: "Av. del Mar".into(),
        ..HotelDraft::default()
    };
    let err = view.submit(draft.into_body()).await.unwrap_err();

    assert!(matches!(err, CoreError::Rejected { .. }));
    assert_eq!(view.mode(), ViewMode::Add);
    assert_eq!(client.cache().version(Tag::Hotel), 0);
    assert_eq!(drain(&mut rx)[0].message, "Name already taken");
}

#[tokio::test]
async fn test_invalid_form_never_reaches_the_server() {
    let (server, client) = setup().await;
    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let mut view = EntityView::<Hotel, _>::new(client, tx);
    view.open_add().unwrap();

    let draft = HotelDraft::default();
    let err = view.submit(draft.into_body()).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(view.mode(), ViewMode::Add);
    assert_eq!(drain(&mut rx)[0].level, NotificationLevel::Error);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_successful_update_returns_to_list() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/hotels/update/h1"))
        .and(body_json(json!({
            "name": "Hotel Mar", "address": "Av. del Mar",
            "whatsapp": "", "phone": "", "instagram": "", "description": "",
            "hotelImage": "", "rooms": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "",
            "data": { "id": "h1", "name": "Hotel Mar" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let mut view = EntityView::<Hotel, _>::new(client.clone(), tx);
    let hotel: Hotel =
        serde_json::from_value(json!({ "id": "h1", "name": "Hotel Mar", "address": "Av. del Mar" }))
            .unwrap();

    view.open_edit(hotel.clone()).unwrap();
    assert!(view.open_add().is_err());

    let saved = view.submit(HotelDraft::from(&hotel).into_body()).await.unwrap();
    assert_eq!(saved.data.id, "h1");
    assert_eq!(view.mode(), ViewMode::List);
    assert!(view.selected().is_none());
    assert_eq!(client.cache().version(Tag::Hotel), 1);
    assert_eq!(drain(&mut rx), [Notification::success("Updated successfully")]);
}

#[tokio::test]
async fn test_order_status_change_invalidates_orders() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/orders/status/o1"))
        .and(body_json(json!({ "status": "CANCELLED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Order status updated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, _rx) = mpsc::unbounded_channel::<Notification>();
    let mut view = EntityView::<Order, _>::new(client.clone(), tx);
    let mut orders = client.cache().subscribe(Tag::Orders);

    view.update_status("o1", OrderStatus::Cancelled).await.unwrap();
    assert!(orders.has_changed().unwrap());
}

#[tokio::test]
async fn test_unsupported_create_is_reported_without_request() {
    let (server, client) = setup().await;
    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let mut view = EntityView::<tourdesk_core::Restaurant, _>::new(client, tx);
    view.open_add().unwrap();

    let body = RequestBody::json(&json!({ "name": "La Arepera" })).unwrap();
    let err = view.submit(Ok(body)).await.unwrap_err();

    assert!(matches!(err, CoreError::Unsupported { .. }));
    assert_eq!(drain(&mut rx).len(), 1);
    assert!(server.received_requests().await.unwrap().is_empty());
}
