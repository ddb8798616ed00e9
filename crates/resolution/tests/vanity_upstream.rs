use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use steamcheck_identity::IdentityError;
use steamcheck_resolution::{
    IdentityResolver, ResolutionError, ResolutionMethod, SteamVanityResolver, VanityResolver,
};
use steamcheck_sdk::SteamApiClient;
use tokio::sync::oneshot;

#[derive(Clone)]
struct MockVanityState {
    status: StatusCode,
    body: Arc<Value>,
}

struct MockVanityServer {
    address: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockVanityServer {
    async fn start(status: StatusCode, body: Value) -> Self {
        let state = MockVanityState {
            status,
            body: Arc::new(body),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock vanity listener");
        let addr = listener.local_addr().expect("listener addr lookup");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let app = Router::new()
            .route("/ISteamUser/ResolveVanityURL/v1/", get(resolve_vanity))
            .with_state(state);

        tokio::spawn(async move {
            let server = axum::serve(listener, app);
            let graceful = server.with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            let _ = graceful.await;
        });

        Self {
            address: format!("http://{}/", addr),
            shutdown: Some(shutdown_tx),
        }
    }

    fn resolver(&self) -> SteamVanityResolver {
        SteamVanityResolver::new(SteamApiClient::new(&self.address, "test-key").expect("client"))
    }
}

impl Drop for MockVanityServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn resolve_vanity(
    State(state): State<MockVanityState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if params.get("key").map(String::as_str) != Some("test-key") {
        return (StatusCode::FORBIDDEN, Json(json!({})));
    }
    (state.status, Json((*state.body).clone()))
}

#[tokio::test]
async fn resolves_matching_handle() {
    let server = MockVanityServer::start(
        StatusCode::OK,
        json!({"response": {"steamid": "76561197960290419", "success": 1}}),
    )
    .await;

    let identity = server.resolver().resolve_vanity("tester").await.unwrap();
    assert_eq!(identity.to_string(), "76561197960290419");
}

#[tokio::test]
async fn no_match_is_handle_not_found() {
    let server = MockVanityServer::start(
        StatusCode::OK,
        json!({"response": {"success": 42, "message": "No match"}}),
    )
    .await;

    let err = server.resolver().resolve_vanity("nobody").await.unwrap_err();
    match err {
        ResolutionError::HandleNotFound { handle } => assert_eq!(handle, "nobody"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn success_without_steamid_is_handle_not_found() {
    let server = MockVanityServer::start(StatusCode::OK, json!({"response": {"success": 1}})).await;

    let err = server.resolver().resolve_vanity("ghost").await.unwrap_err();
    assert!(matches!(err, ResolutionError::HandleNotFound { .. }));
}

#[tokio::test]
async fn non_success_status_is_upstream_unavailable() {
    let server = MockVanityServer::start(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"response": {"steamid": "76561197960290419", "success": 1}}),
    )
    .await;

    let err = server.resolver().resolve_vanity("tester").await.unwrap_err();
    assert!(matches!(err, ResolutionError::UpstreamUnavailable { .. }));
}

#[tokio::test]
async fn unparseable_steamid_is_malformed() {
    let server = MockVanityServer::start(
        StatusCode::OK,
        json!({"response": {"steamid": "not-a-number", "success": 1}}),
    )
    .await;

    let err = server.resolver().resolve_vanity("odd").await.unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::Identity(IdentityError::MalformedIdentity { .. })
    ));
}

#[tokio::test]
async fn pipeline_falls_through_to_upstream_for_handles() {
    let server = MockVanityServer::start(
        StatusCode::OK,
        json!({"response": {"steamid": "76561197960290419", "success": 1}}),
    )
    .await;
    let resolver = IdentityResolver::new(Arc::new(server.resolver()));

    let resolved = resolver.resolve(" tester ").await.unwrap();
    assert_eq!(resolved.input, "tester");
    assert_eq!(resolved.method, ResolutionMethod::VanityHandle);
    assert_eq!(resolved.identity.to_string(), "76561197960290419");
}

#[tokio::test]
async fn pipeline_surfaces_upstream_outage() {
    let server = MockVanityServer::start(StatusCode::BAD_GATEWAY, json!({})).await;
    let resolver = IdentityResolver::new(Arc::new(server.resolver()));

    let err = resolver
        .resolve("https://steamcommunity.com/id/tester/")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolutionError::UpstreamUnavailable { .. }));
}

#[tokio::test]
async fn pipeline_reports_unrecognised_input_as_parse_failure() {
    let server = MockVanityServer::start(
        StatusCode::OK,
        json!({"response": {"success": 42, "message": "No match"}}),
    )
    .await;
    let resolver = IdentityResolver::new(Arc::new(server.resolver()));

    let err = resolver.resolve("not a player").await.unwrap_err();
    assert!(matches!(err, ResolutionError::ParseFailure { ref input } if input == "not a player"));

    let err = resolver
        .resolve("https://steamcommunity.com/id/nobody")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolutionError::HandleNotFound { ref handle } if handle == "nobody"));
}

#[tokio::test]
async fn unreachable_upstream_is_unavailable_and_hides_key() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind scratch port");
    let addr = listener.local_addr().expect("scratch addr lookup");
    drop(listener);

    let client =
        SteamApiClient::new(format!("http://{}/", addr), "SECRET-API-KEY").expect("client");
    let resolver = IdentityResolver::with_client(client);

    let err = resolver.resolve("somehandle").await.unwrap_err();
    assert!(matches!(err, ResolutionError::UpstreamUnavailable { .. }));
    assert!(!err.to_string().contains("SECRET-API-KEY"));
}
