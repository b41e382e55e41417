//! Shared helpers: in-process agency stubs and fixture configuration.

use std::time::Duration;

use axum::routing::post;
use axum::{Json, Router};
use govsync_core::config::{AgencyConfig, Environment, RateLimit};
use govsync_core::crypto::TokenCipher;
use serde_json::json;

/// Serve a router on an ephemeral local port, returning its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    format!("http://{addr}")
}

/// A token endpoint that always grants `test-token` for an hour.
pub fn oauth_token_route(router: Router) -> Router {
    router.route(
        "/oauth/token",
        post(|| async { Json(json!({"access_token": "test-token", "expires_in": 3600})) }),
    )
}

/// Config pointing at a stub, with generous budgets and a short deadline.
pub fn test_config(base_url: &str) -> AgencyConfig {
    AgencyConfig {
        base_url: base_url.to_string(),
        api_key: "test-api-key".to_string(),
        client_id: Some("test-client".to_string()),
        client_secret: Some("test-secret".to_string()),
        environment: Environment::Sandbox,
        rate_limit: RateLimit {
            requests_per_minute: 1000,
            requests_per_day: 10000,
        },
        timeout: Duration::from_secs(5),
    }
}

/// Fixed-key cipher so tests can decrypt what the clients persist.
pub fn test_cipher() -> TokenCipher {
    TokenCipher::new(&[9u8; 32])
}
