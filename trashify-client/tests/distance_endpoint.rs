//! Drives the HTTP search client against a local fake backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use tokio::net::TcpListener;

use trashify_client::{ClientConfig, ProximitySearchClient, StaticToken, http_client};
use trashify_core::{
    ControllerConfig, Coordinate, NearbyItemsController, ProximitySearch, QueryState,
    SearchErrorKind, SearchQuery, SearchRadius,
};

#[derive(Debug, Clone, Default)]
struct Seen {
    params: HashMap<String, String>,
    authorization: Option<String>,
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

/// Fake backend answering every distance query with `status` and `body`, recording requests.
async fn backend(status: StatusCode, body: &'static str) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let router = Router::new().route(
        "/trash/distance",
        get(
            move |Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                let authorization = headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned);
                recorder.lock().expect("seen lock").push(Seen {
                    params,
                    authorization,
                });
                (status, body)
            },
        ),
    );
    (serve(router).await, seen)
}

fn search_client(config: &ClientConfig) -> ProximitySearchClient {
    ProximitySearchClient::new(http_client(config).expect("http client"), config)
}

fn query() -> SearchQuery {
    let origin = Coordinate::new(52.520_008, 13.404_954).expect("valid coordinate");
    SearchQuery::within(origin, SearchRadius::DEFAULT).expect("valid query")
}

#[tokio::test]
async fn sends_query_and_bearer_and_ignores_status() {
    let (base_url, seen) = backend(
        StatusCode::NOT_FOUND,
        r#"{"status":404,"trash":[{"uuid":"x","geolocation":[10.0,20.0],"tag":"paper"}]}"#,
    )
    .await;
    let client = search_client(&ClientConfig::new(base_url));

    let points = client.fetch(&query(), "tok").await.expect("trash present");

    assert_eq!(points.len(), 1);
    let point = points.first().expect("one point");
    assert_eq!(point.id.0, "x");
    assert_eq!(point.location.latitude(), 20.0);
    assert_eq!(point.location.longitude(), 10.0);
    assert_eq!(point.category, "paper");

    let seen = seen.lock().expect("seen lock").clone();
    assert_eq!(seen.len(), 1, "exactly one request");
    let request = seen.first().expect("one request");
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(request.params.get("latitude").map(String::as_str), Some("52.520008"));
    assert_eq!(request.params.get("longitude").map(String::as_str), Some("13.404954"));
    assert_eq!(request.params.get("minDistance").map(String::as_str), Some("0"));
    assert_eq!(request.params.get("maxDistance").map(String::as_str), Some("1500"));
}

#[tokio::test]
async fn error_payload_becomes_remote_failure() {
    let (base_url, _seen) =
        backend(StatusCode::OK, r#"{"status":404,"error":["no results"]}"#).await;
    let client = search_client(&ClientConfig::new(base_url));

    let err = client.fetch(&query(), "tok").await.expect_err("no trash");
    assert_eq!(err.kind(), SearchErrorKind::Remote);
    assert_eq!(err.to_string(), "no results");
}

#[tokio::test]
async fn malformed_body_becomes_decode_failure() {
    let (base_url, _seen) = backend(StatusCode::BAD_GATEWAY, "upstream went away").await;
    let client = search_client(&ClientConfig::new(base_url));

    let err = client.fetch(&query(), "tok").await.expect_err("not json");
    assert_eq!(err.kind(), SearchErrorKind::Decode);
}

#[tokio::test]
async fn refused_connection_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let client = search_client(&ClientConfig::new(format!("http://{addr}")));

    let err = client.fetch(&query(), "tok").await.expect_err("nothing listening");
    assert_eq!(err.kind(), SearchErrorKind::Transport);
}

#[tokio::test]
async fn empty_base_url_fails_fast_as_transport() {
    let client = search_client(&ClientConfig::default());

    let err = client.fetch(&query(), "").await.expect_err("relative url");
    assert_eq!(err.kind(), SearchErrorKind::Transport);
}

#[tokio::test]
async fn slow_backend_times_out_as_transport() {
    let router = Router::new().route(
        "/trash/distance",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            r#"{"status":200,"trash":[]}"#
        }),
    );
    let base_url = serve(router).await;
    let config = ClientConfig::new(base_url).with_timeout(Duration::from_millis(200));
    let client = search_client(&config);

    let err = client.fetch(&query(), "tok").await.expect_err("timed out");
    assert_eq!(err.kind(), SearchErrorKind::Transport);
}

#[tokio::test]
async fn controller_publishes_points_from_backend() {
    let (base_url, seen) = backend(
        StatusCode::OK,
        r#"{"status":200,"trash":[{"uuid":"b1","geolocation":[13.4,52.5],"tag":"batteries"}]}"#,
    )
    .await;
    let search = Arc::new(search_client(&ClientConfig::new(base_url)));
    let nearby = NearbyItemsController::new(
        search,
        Arc::new(StaticToken("session".to_owned())),
        ControllerConfig::default(),
    );

    let in_flight = nearby
        .on_location_selected(Coordinate::new(52.5, 13.4).expect("valid coordinate"))
        .expect("valid query");
    in_flight.settled().await;

    let snapshot = nearby.snapshot();
    assert!(matches!(&snapshot.state, QueryState::Loaded(points) if points.len() == 1));
    assert_eq!(
        snapshot.annotations.first().map(|annotation| annotation.style.icon),
        Some("battery")
    );
    let seen = seen.lock().expect("seen lock").clone();
    assert_eq!(
        seen.first().and_then(|request| request.authorization.clone()),
        Some("Bearer session".to_owned())
    );
}

#[tokio::test]
async fn controller_tags_decode_and_remote_failures_and_keeps_pins() {
    let router = Router::new().route(
        "/trash/distance",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            match params.get("latitude").map(String::as_str) {
                Some("1.000000") => {
                    r#"{"status":200,"trash":[{"uuid":"p1","geolocation":[1.0,1.0],"tag":"paper"}]}"#
                }
                Some("2.000000") => "<html>502 Bad Gateway</html>",
                _ => r#"{"status":404,"error":["no results"]}"#,
            }
        }),
    );
    let search = Arc::new(search_client(&ClientConfig::new(serve(router).await)));
    let nearby = NearbyItemsController::new(
        search,
        Arc::new(StaticToken("session".to_owned())),
        ControllerConfig::default(),
    );
    let select = |latitude: f64| {
        nearby
            .on_location_selected(Coordinate::new(latitude, 1.0).expect("valid coordinate"))
            .expect("valid query")
    };

    select(1.0).settled().await;
    assert!(matches!(&nearby.current_state(), QueryState::Loaded(points) if points.len() == 1));
    assert_eq!(nearby.snapshot().annotations.len(), 1);

    select(2.0).settled().await;
    assert!(matches!(
        nearby.current_state(),
        QueryState::Failed { kind: SearchErrorKind::Decode, .. }
    ));
    assert_eq!(nearby.snapshot().annotations.len(), 1, "pins survive a decode failure");

    select(3.0).settled().await;
    assert_eq!(
        nearby.current_state(),
        QueryState::Failed {
            kind: SearchErrorKind::Remote,
            reason: "no results".to_owned(),
        }
    );
    let snapshot = nearby.snapshot();
    assert_eq!(
        snapshot.annotations.first().map(|annotation| annotation.point.id.0.as_str()),
        Some("p1")
    );
}
