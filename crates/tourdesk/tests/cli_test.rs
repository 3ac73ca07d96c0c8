//! Integration tests for the `tourdesk` CLI binary.
//!
//! Argument parsing, help output, and completions run without a server;
//! the rest point `--api-url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tourdesk` binary with env isolation.
///
/// Clears all `TOURDESK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn tourdesk_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tourdesk");
    cmd.env("HOME", "/tmp/tourdesk-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tourdesk-cli-test-nonexistent")
        .env_remove("TOURDESK_PROFILE")
        .env_remove("TOURDESK_API_URL")
        .env_remove("TOURDESK_TOKEN")
        .env_remove("TOURDESK_OUTPUT")
        .env_remove("TOURDESK_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Run `args` against `server` on a blocking thread.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let uri = server.uri();
    let args: Vec<String> = args.iter().map(|s| (*s).to_owned()).collect();
    tokio::task::spawn_blocking(move || {
        tourdesk_cmd()
            .arg("--api-url")
            .arg(uri)
            .args(&args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{}{stderr}", stdout(output))
}

fn page(rows: serde_json::Value, page: u32, total: u64, total_pages: u32) -> serde_json::Value {
    json!({
        "success": true,
        "message": "Retrieved",
        "data": {
            "data": rows,
            "meta": { "page": page, "limit": 10, "total": total, "totalPages": total_pages }
        }
    })
}

fn hotel(id: &str, name: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "address": "Mérida", "averageRating": 4.5, "rooms": [] })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tourdesk_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_entities() {
    tourdesk_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("hotels")
            .and(predicate::str::contains("posadas"))
            .and(predicate::str::contains("orders"))
            .and(predicate::str::contains("spots")),
    );
}

#[test]
fn test_version_flag() {
    tourdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tourdesk"));
}

#[test]
fn test_completions_zsh() {
    tourdesk_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    tourdesk_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_output_format() {
    let output = tourdesk_cmd()
        .args(["--output", "xml", "hotels", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("xml"));
}

#[test]
fn test_lat_requires_lng() {
    let output = tourdesk_cmd()
        .args(["spots", "create", "--lat", "8.5"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_show_no_config() {
    tourdesk_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("page_size = 10"));
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let output = tourdesk_cmd()
        .args(["--profile", "nowhere", "hotels", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("nowhere"));
}

#[test]
fn test_unreachable_api_is_network_error() {
    let output = tourdesk_cmd()
        .args(["--api-url", "http://127.0.0.1:9/api/v1", "--timeout", "2"])
        .args(["hotels", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6), "{}", combined_output(&output));
}

// ── Listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_hotels_list_renders_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotels"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([hotel("h1", "Posada Mucuchíes"), hotel("h2", "Hotel Tisure")]),
            1,
            2,
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["hotels", "list"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let out = stdout(&output);
    assert!(out.contains("Hotel Tisure"));
    assert!(out.contains("Rating"));
}

#[tokio::test]
async fn test_server_search_is_sent_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotels"))
        .and(query_param("search", "tisure"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(json!([hotel("h2", "Hotel Tisure")]), 1, 1, 1)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "plain", "hotels", "list", "--search", "  tisure "]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(stdout(&output).trim(), "h2");
}

#[tokio::test]
async fn test_client_search_filters_without_search_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sponsor"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([
                { "id": "s1", "sponsorName": "Café Venezuela", "address": "Caracas" },
                { "id": "s2", "sponsorName": "Cacao Real", "address": "Chuao" },
            ]),
            1,
            2,
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "plain", "sponsors", "list", "--search", "chuao"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(stdout(&output).trim(), "s2");
}

#[tokio::test]
async fn test_list_all_walks_every_page() {
    let server = MockServer::start().await;
    for (n, id) in [(1, "h1"), (2, "h2"), (3, "h3")] {
        Mock::given(method("GET"))
            .and(path("/hotels"))
            .and(query_param("page", n.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page(json!([hotel(id, id)]), n, 3, 3)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let output = run_against(&server, &["-q", "-o", "plain", "hotels", "list", "--all"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(stdout(&output).lines().collect::<Vec<_>>(), ["h1", "h2", "h3"]);
}

#[tokio::test]
async fn test_order_status_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/all-orders"))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), 1, 0, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["orders", "list", "--status", "pending"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test]
async fn test_order_list_prints_status_counts() {
    let server = MockServer::start().await;
    let mut body = page(json!([]), 1, 12, 2);
    body["stats"] = json!({ "total": 12, "pending": 5, "confirmed": 3, "completed": 3, "canceled": 1 });
    Mock::given(method("GET"))
        .and(path("/orders/all-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["orders", "list"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("orders: 12 total, 5 pending, 3 confirmed, 3 completed, 1 canceled"),
        "{stderr}"
    );
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_needs_yes_when_not_interactive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotels/single/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "message": "ok", "data": hotel("abc123", "Hotel Tisure")
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_against(&server, &["hotels", "delete", "abc123"]).await;
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}

#[tokio::test]
async fn test_confirmed_delete_reports_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotels/single/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "message": "ok", "data": hotel("abc123", "Hotel Tisure")
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/hotels/delete/abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Hotel deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["--yes", "hotels", "delete", "abc123"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Hotel deleted"));
}

#[tokio::test]
async fn test_order_status_change() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/orders/status/o1"))
        .and(body_json(json!({ "status": "COMPLETED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "message": "" })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["orders", "status", "o1", "completed"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Order marked COMPLETED"));
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("hotel.json");
    std::fs::write(&data, r#"{ "address": "Mérida" }"#).unwrap();

    let output = run_against(
        &server,
        &["hotels", "create", "--data", data.to_str().unwrap()],
    )
    .await;
    assert_eq!(output.status.code(), Some(5), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("name"));
}

#[tokio::test]
async fn test_rejected_upload_blocks_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("sponsor.json");
    std::fs::write(&data, r#"{ "sponsorName": "Cacao Real", "price": 10 }"#).unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "not an image").unwrap();

    let output = run_against(
        &server,
        &[
            "sponsors",
            "create",
            "--data",
            data.to_str().unwrap(),
            "--image",
            notes.to_str().unwrap(),
        ],
    )
    .await;
    assert_eq!(output.status.code(), Some(5), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("notes.txt"));
}

#[tokio::test]
async fn test_restaurant_create_is_unsupported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_against(&server, &["restaurants", "create"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("does not support create"));
}

#[tokio::test]
async fn test_update_merges_partial_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/single/o1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": { "id": "o1", "itemName": "Arepa", "storeName": "La Esquina", "quantity": 1, "totalPrice": 3.5 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/orders/update/o1"))
        .and(body_json(json!({
            "itemName": "Arepa",
            "storeName": "La Esquina",
            "quantity": 4,
            "totalPrice": 3.5,
            "status": "PENDING"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Order updated",
            "data": { "id": "o1", "itemName": "Arepa", "storeName": "La Esquina", "quantity": 4, "totalPrice": 14.0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("order.json");
    std::fs::write(&data, r#"{ "quantity": 4 }"#).unwrap();

    let output = run_against(
        &server,
        &["-o", "json-compact", "orders", "update", "o1", "--data", data.to_str().unwrap()],
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(stdout(&output).contains(r#""quantity":4"#));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Order updated"));
}
