use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use steamcheck_identity::CanonicalIdentity;
use steamcheck_sdk::{OwnedGamesQuery, SdkError, SteamApiClient};
use tokio::sync::oneshot;

type Routes = HashMap<String, (StatusCode, Value)>;

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
}

struct MockUpstream {
    address: String,
    state: MockState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    async fn start() -> Self {
        let state = MockState::default();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream listener");
        let addr = listener.local_addr().expect("listener addr lookup");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let app = Router::new().fallback(respond).with_state(state.clone());

        tokio::spawn(async move {
            let server = axum::serve(listener, app);
            let graceful = server.with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            let _ = graceful.await;
        });

        Self {
            address: format!("http://{}/", addr),
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    fn route(&self, path: &str, status: StatusCode, body: Value) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }

    fn requests(&self) -> Vec<(String, HashMap<String, String>)> {
        self.state.requests.lock().unwrap().clone()
    }

    fn client(&self) -> SteamApiClient {
        SteamApiClient::new(&self.address, "test-key").expect("client")
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn respond(
    State(state): State<MockState>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push((path.clone(), params));
    let routes = state.routes.lock().unwrap();
    match routes.get(&path) {
        Some((status, body)) => (*status, Json(body.clone())),
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

fn sample_id() -> CanonicalIdentity {
    "76561197960290419".parse().unwrap()
}

#[tokio::test]
async fn vanity_lookup_sends_key_and_escaped_handle() {
    let upstream = MockUpstream::start().await;
    upstream.route(
        "/ISteamUser/ResolveVanityURL/v1/",
        StatusCode::OK,
        json!({"response": {"steamid": "76561197960290419", "success": 1}}),
    );

    let lookup = upstream
        .client()
        .resolve_vanity_url("gabe & co")
        .await
        .unwrap();
    assert_eq!(lookup.matched_steamid(), Some("76561197960290419"));

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    let (path, params) = &requests[0];
    assert_eq!(path, "/ISteamUser/ResolveVanityURL/v1/");
    assert_eq!(params.get("key").map(String::as_str), Some("test-key"));
    assert_eq!(params.get("vanityurl").map(String::as_str), Some("gabe & co"));
}

#[tokio::test]
async fn vanity_no_match_is_not_an_error() {
    let upstream = MockUpstream::start().await;
    upstream.route(
        "/ISteamUser/ResolveVanityURL/v1/",
        StatusCode::OK,
        json!({"response": {"success": 42, "message": "No match"}}),
    );

    let lookup = upstream.client().resolve_vanity_url("nobody").await.unwrap();
    assert_eq!(lookup.success, Some(42));
    assert_eq!(lookup.matched_steamid(), None);
}

#[tokio::test]
async fn non_success_status_is_server_error() {
    let upstream = MockUpstream::start().await;
    upstream.route(
        "/ISteamUser/ResolveVanityURL/v1/",
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"error": "maintenance"}),
    );

    let err = upstream
        .client()
        .resolve_vanity_url("anyone")
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::ServerError { status: 503, .. }));
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn player_summary_and_bans_are_mapped() {
    let upstream = MockUpstream::start().await;
    upstream.route(
        "/ISteamUser/GetPlayerSummaries/v2/",
        StatusCode::OK,
        json!({"response": {"players": [{
            "steamid": "76561197960290419",
            "personaname": "tester",
            "profileurl": "https://steamcommunity.com/id/tester/",
            "communityvisibilitystate": 3,
            "personastate": 1,
            "timecreated": 1063407589,
            "loccountrycode": "US"
        }]}}),
    );
    upstream.route(
        "/ISteamUser/GetPlayerBans/v1/",
        StatusCode::OK,
        json!({"players": [{
            "SteamId": "76561197960290419",
            "CommunityBanned": false,
            "VACBanned": true,
            "NumberOfVACBans": 1,
            "DaysSinceLastBan": 100,
            "NumberOfGameBans": 0,
            "EconomyBan": "probation"
        }]}),
    );

    let client = upstream.client();
    let summary = client.get_player_summary(sample_id()).await.unwrap().unwrap();
    assert_eq!(summary.persona_name.as_deref(), Some("tester"));
    assert_eq!(summary.community_visibility_state, Some(3));
    assert_eq!(summary.time_created, Some(1_063_407_589));
    assert_eq!(summary.real_name, None);

    let bans = client.get_player_bans(sample_id()).await.unwrap().unwrap();
    assert!(bans.vac_banned);
    assert_eq!(bans.economy_ban, "probation");

    let requests = upstream.requests();
    assert_eq!(
        requests[0].1.get("steamids").map(String::as_str),
        Some("76561197960290419")
    );
}

#[tokio::test]
async fn empty_player_list_is_none() {
    let upstream = MockUpstream::start().await;
    upstream.route(
        "/ISteamUser/GetPlayerSummaries/v2/",
        StatusCode::OK,
        json!({"response": {"players": []}}),
    );

    let summary = upstream.client().get_player_summary(sample_id()).await.unwrap();
    assert!(summary.is_none());
}

#[tokio::test]
async fn owned_games_query_flags() {
    let upstream = MockUpstream::start().await;
    upstream.route(
        "/IPlayerService/GetOwnedGames/v1/",
        StatusCode::OK,
        json!({"response": {"game_count": 1, "games": [{"appid": 730, "playtime_forever": 600}]}}),
    );

    let client = upstream.client();
    let games = client
        .get_owned_games(sample_id(), OwnedGamesQuery::detailed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(games.game_count, Some(1));
    client
        .get_owned_games(sample_id(), OwnedGamesQuery::default())
        .await
        .unwrap();

    let requests = upstream.requests();
    assert_eq!(
        requests[0].1.get("include_appinfo").map(String::as_str),
        Some("1")
    );
    assert_eq!(
        requests[0].1.get("include_played_free_games").map(String::as_str),
        Some("1")
    );
    assert!(!requests[1].1.contains_key("include_appinfo"));
}

#[tokio::test]
async fn private_friend_list_is_an_upstream_status() {
    let upstream = MockUpstream::start().await;
    upstream.route(
        "/ISteamUser/GetFriendList/v1/",
        StatusCode::UNAUTHORIZED,
        json!({}),
    );

    let err = upstream.client().get_friend_list(sample_id()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

/// Address of a local port with nothing listening on it.
fn closed_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind scratch port");
    let addr = listener.local_addr().expect("scratch addr lookup");
    drop(listener);
    format!("http://{}/", addr)
}

#[tokio::test]
async fn connection_refused_is_http_error_without_key() {
    let client = SteamApiClient::new(closed_address(), "SECRET-API-KEY").expect("client");

    let err = client.resolve_vanity_url("tester").await.unwrap_err();
    assert!(matches!(err, SdkError::Http(_)));
    assert_eq!(err.status(), None);
    assert!(!err.to_string().contains("SECRET-API-KEY"));
    assert!(!format!("{err:?}").contains("SECRET-API-KEY"));
}

#[tokio::test]
async fn undecodable_body_does_not_expose_key() {
    let upstream = MockUpstream::start().await;
    upstream.route(
        "/ISteamUser/GetPlayerBans/v1/",
        StatusCode::OK,
        json!({"players": "not-a-list"}),
    );
    let client = SteamApiClient::new(&upstream.address, "SECRET-API-KEY").expect("client");

    let err = client.get_player_bans(sample_id()).await.unwrap_err();
    assert!(matches!(err, SdkError::Http(_)));
    assert!(!err.to_string().contains("SECRET-API-KEY"));
}
