#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Debounce, cancellation and stale-cycle behavior of the suggestion stream.

use std::sync::Arc;
use std::time::Duration;

use pulse_api::{ApiClient, GeoClient};
use pulse_dashboard::{CacheStore, DashboardService, DashboardState};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEBOUNCE: Duration = Duration::from_millis(30);

fn search_body(name: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "results": [
            {"name": name, "country": "Canada", "latitude": lat, "longitude": lon}
        ]
    })
}

fn conditions_body(temp: f64) -> serde_json::Value {
    serde_json::json!({
        "current": {"temperature_2m": temp, "apparent_temperature": temp - 1.0}
    })
}

async fn service_for(server: &MockServer) -> Arc<DashboardService> {
    let api = ApiClient::new(&server.uri()).unwrap();
    let geo = GeoClient::new(&server.uri(), &server.uri()).unwrap();
    Arc::new(
        DashboardService::new(api, geo, CacheStore::in_memory().unwrap())
            .with_suggest_debounce(DEBOUNCE),
    )
}

/// Poll until the suggestion slice satisfies `done`, or give up.
async fn wait_for<F>(service: &DashboardService, done: F) -> DashboardState
where
    F: Fn(&DashboardState) -> bool,
{
    for _ in 0..200 {
        let state = service.state();
        if done(&state) {
            return state;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("suggestion state never settled");
}

#[tokio::test]
async fn test_rapid_keystrokes_issue_one_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Toronto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(
            "Toronto", 43.7, -79.4,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(conditions_body(18.2)))
        .mount(&server)
        .await;
    let service = service_for(&server).await;

    // Each keystroke lands inside the previous one's debounce window, so
    // only the final query reaches the network.
    service.update_query("To");
    service.update_query("Tor");
    service.update_query("Toron");
    service.update_query("Toronto");

    let state = wait_for(&service, |s| !s.suggest.items.is_empty()).await;
    assert_eq!(state.suggest.items.len(), 1);
    assert_eq!(state.suggest.items[0].name, "Toronto");
    assert_eq!(state.suggest.items[0].temp, Some(18.2));
    assert_eq!(state.suggest.items[0].id, "43.7:-79.4");

    // The expect(1) on the search mock is verified on drop.
}

#[tokio::test]
async fn test_short_query_clears_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(
            "Toronto", 43.7, -79.4,
        )))
        .expect(0)
        .mount(&server)
        .await;
    let service = service_for(&server).await;

    service.update_query("T");
    service.update_query("  a  "); // one char after trimming
    tokio::time::sleep(DEBOUNCE * 3).await;

    let state = service.state();
    assert!(state.suggest.items.is_empty());
    assert!(!state.suggest.loading);
    assert!(state.suggest.error.is_none());
}

#[tokio::test]
async fn test_stale_cycle_never_commits() {
    let server = MockServer::start().await;
    // The first query's search is slow; the second supersedes it while the
    // response is still in flight.
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_body("Paris", 48.85, 2.35))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(
            "London", 51.51, -0.13,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(conditions_body(12.0)))
        .mount(&server)
        .await;
    let service = service_for(&server).await;

    service.update_query("Paris");
    tokio::time::sleep(DEBOUNCE * 2).await;
    service.update_query("London");

    let state = wait_for(&service, |s| !s.suggest.items.is_empty()).await;
    assert_eq!(state.suggest.items[0].name, "London");

    // Wait out the slow Paris response; it must not replace London.
    tokio::time::sleep(Duration::from_millis(400)).await;
    let state = service.state();
    assert_eq!(state.suggest.items[0].name, "London");
}

#[tokio::test]
async fn test_clearing_keystroke_beats_inflight_cycle() {
    let server = MockServer::start().await;
    // The cycle resolves slowly; a short query clears the list while the
    // response is still in flight.
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_body("Paris", 48.85, 2.35))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(conditions_body(12.0)))
        .mount(&server)
        .await;
    let service = service_for(&server).await;

    service.update_query("Paris");
    tokio::time::sleep(DEBOUNCE * 2).await;
    service.update_query("P");

    // The cleared state must survive the slow cycle resolving.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let state = service.state();
    assert!(state.suggest.items.is_empty());
    assert!(!state.suggest.loading);
    assert!(state.suggest.error.is_none());
}

#[tokio::test]
async fn test_search_failure_surfaces_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let service = service_for(&server).await;

    service.update_query("Toronto");

    let state = wait_for(&service, |s| s.suggest.error.is_some()).await;
    assert_eq!(
        state.suggest.error.as_deref(),
        Some("Unable to load suggestions.")
    );
    assert!(state.suggest.items.is_empty());
    assert!(!state.suggest.loading);
}

#[tokio::test]
async fn test_failed_lookup_drops_only_its_candidate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"name": "Toronto", "latitude": 43.7, "longitude": -79.4},
                {"name": "Torino", "latitude": 45.07, "longitude": 7.69}
            ]
        })))
        .mount(&server)
        .await;
    // Toronto's lookup succeeds, Torino's fails.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "43.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(conditions_body(18.2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "45.07"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let service = service_for(&server).await;

    service.update_query("Tor");

    let state = wait_for(&service, |s| !s.suggest.items.is_empty()).await;
    assert_eq!(state.suggest.items.len(), 1);
    assert_eq!(state.suggest.items[0].name, "Toronto");
    assert!(state.suggest.error.is_none());
}

#[tokio::test]
async fn test_cancel_clears_pending_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(
            "Toronto", 43.7, -79.4,
        )))
        .expect(0)
        .mount(&server)
        .await;
    let service = service_for(&server).await;

    // Cancel lands inside the debounce window; no request is ever issued.
    service.update_query("Toronto");
    service.cancel_suggestions();
    tokio::time::sleep(DEBOUNCE * 3).await;

    let state = service.state();
    assert!(state.suggest.items.is_empty());
    assert!(!state.suggest.loading);
}
