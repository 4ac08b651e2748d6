//! # Control-Plane HTTP API
//!
//! Signed operator surface for the whitelist, the reject-message policy,
//! and the persisted log. Every route sits behind the signature
//! middleware; an unauthenticated request never reaches a handler.
//!
//! Routes:
//! - `GET /whitelist?limit=N`, `POST|DELETE /whitelist/:pub_key`
//! - `GET|POST|DELETE /rejectMessage`
//! - `GET /log?limit&startDate&endDate`, `DELETE /log?before&after&limit&desc`

pub mod auth;
pub mod dates;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::middleware;
use axum::routing::get;
use axum::Router;

/// Build the control-plane router with the signature check applied to
/// every route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/whitelist", get(routes::whitelist::list))
        .route(
            "/whitelist/:pub_key",
            axum::routing::post(routes::whitelist::add).delete(routes::whitelist::remove),
        )
        .route(
            "/rejectMessage",
            get(routes::policy::current)
                .post(routes::policy::set)
                .delete(routes::policy::clear),
        )
        .route(
            "/log",
            get(routes::log::list).delete(routes::log::purge),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_signature,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;
    use warden_auth::{AuthKeyPair, RequestAuthenticator, AUTH_HEADER};
    use warden_store::test_utils::FailingEngine;
    use warden_store::{MemoryEngine, Store};
    use warden_types::{LogRecord, Severity, DEFAULT_REJECT_MESSAGE};

    const PEER: &str = "02a1633cafcc01ebfb6d78e39f687a1f0995c62fc95f51ead10a02ee0be551b5dc";
    const OTHER_PEER: &str =
        "03b2744dbfdd02fcfc7e89f4a798b2b20aa6d73fda6f62fbe21b03ff1c662c6ced";

    struct Harness {
        app: Router,
        keys: AuthKeyPair,
        store: Arc<Store>,
    }

    fn harness() -> Harness {
        let store = Arc::new(Store::new());
        store.init(Arc::new(MemoryEngine::new()));
        harness_with_store(store)
    }

    fn harness_with_store(store: Arc<Store>) -> Harness {
        let keys = AuthKeyPair::generate();
        let authenticator = RequestAuthenticator::new(&keys.public_key_hex()).unwrap();
        let app = router(AppState::new(Arc::clone(&store), authenticator));
        Harness { app, keys, store }
    }

    impl Harness {
        fn signed(&self, method: &str, uri: &str, body: &[u8]) -> Request<Body> {
            let signature = self.keys.sign_request(method, uri, body);
            Request::builder()
                .method(method)
                .uri(uri)
                .header(AUTH_HEADER, signature)
                .body(Body::from(body.to_vec()))
                .unwrap()
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, String::from_utf8(bytes.to_vec()).unwrap())
        }

        async fn send_signed(&self, method: &str, uri: &str, body: &[u8]) -> (StatusCode, String) {
            self.send(self.signed(method, uri, body)).await
        }
    }

    #[tokio::test]
    async fn test_unsigned_request_is_rejected_with_406() {
        let h = harness();
        let request = Request::builder()
            .method("GET")
            .uri("/whitelist")
            .body(Body::empty())
            .unwrap();
        let (status, body) = h.send(request).await;
        assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
        assert_eq!(body, "Unauthorized.");
    }

    #[tokio::test]
    async fn test_signature_must_cover_the_query_string() {
        let h = harness();
        // Signed for a different query than the one sent
        let signature = h.keys.sign_request("GET", "/whitelist?limit=1", b"");
        let request = Request::builder()
            .method("GET")
            .uri("/whitelist?limit=2")
            .header(AUTH_HEADER, signature)
            .body(Body::empty())
            .unwrap();
        let (status, _) = h.send(request).await;
        assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn test_signature_from_wrong_key_is_rejected() {
        let h = harness();
        let intruder = AuthKeyPair::generate();
        let signature = intruder.sign_request("GET", "/whitelist", b"");
        let request = Request::builder()
            .method("GET")
            .uri("/whitelist")
            .header(AUTH_HEADER, signature)
            .body(Body::empty())
            .unwrap();
        let (status, _) = h.send(request).await;
        assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn test_whitelist_add_list_remove_flow() {
        let h = harness();

        let (status, body) = h.send_signed("GET", "/whitelist", b"").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");

        let (status, _) = h
            .send_signed("POST", &format!("/whitelist/{PEER}"), b"")
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = h
            .send_signed("POST", &format!("/whitelist/{OTHER_PEER}"), b"")
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = h.send_signed("GET", "/whitelist", b"").await;
        assert_eq!(status, StatusCode::OK);
        let peers: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(peers, vec![PEER.to_string(), OTHER_PEER.to_string()]);

        let (status, _) = h
            .send_signed("DELETE", &format!("/whitelist/{PEER}"), b"")
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = h.send_signed("GET", "/whitelist", b"").await;
        let peers: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(peers, vec![OTHER_PEER.to_string()]);
    }

    #[tokio::test]
    async fn test_whitelist_list_honors_limit() {
        let h = harness();
        h.send_signed("POST", &format!("/whitelist/{PEER}"), b"")
            .await;
        h.send_signed("POST", &format!("/whitelist/{OTHER_PEER}"), b"")
            .await;

        let (status, body) = h.send_signed("GET", "/whitelist?limit=1", b"").await;
        assert_eq!(status, StatusCode::OK);
        let peers: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(peers.len(), 1);
    }

    #[tokio::test]
    async fn test_whitelist_rejects_malformed_pubkey() {
        let h = harness();
        for bad in ["abc", &format!("0x{PEER}"), "zz"] {
            let (status, body) = h
                .send_signed("POST", &format!("/whitelist/{bad}"), b"")
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "pubkey {bad:?}");
            assert_eq!(body, "Invalid pubKey");
        }
    }

    #[tokio::test]
    async fn test_reject_message_defaults_then_roundtrips() {
        let h = harness();

        let (status, body) = h.send_signed("GET", "/rejectMessage", b"").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, DEFAULT_REJECT_MESSAGE);

        let payload = br#"{"message":"Channels are invite only."}"#;
        let (status, _) = h.send_signed("POST", "/rejectMessage", payload).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = h.send_signed("GET", "/rejectMessage", b"").await;
        assert_eq!(body, "Channels are invite only.");

        let (status, _) = h.send_signed("DELETE", "/rejectMessage", b"").await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = h.send_signed("GET", "/rejectMessage", b"").await;
        assert_eq!(body, DEFAULT_REJECT_MESSAGE);
    }

    #[tokio::test]
    async fn test_reject_message_requires_a_message() {
        let h = harness();
        for payload in [&b"{}"[..], br#"{"message":""}"#, b"not json"] {
            let (status, body) = h.send_signed("POST", "/rejectMessage", payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, "Missing message");
        }
    }

    #[tokio::test]
    async fn test_reject_message_enforces_length_limit() {
        let h = harness();
        let long = "x".repeat(501);
        let payload = serde_json::json!({ "message": long }).to_string();
        let (status, _) = h
            .send_signed("POST", "/rejectMessage", payload.as_bytes())
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    fn seed_log(store: &Store) {
        let log = store.log().unwrap();
        for (ts, msg) in [(1000, "first"), (2000, "second"), (3000, "third")] {
            log.append(&LogRecord::new(Severity::Info, ts, msg), u64::MAX)
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_log_query_with_date_window() {
        let h = harness();
        seed_log(&h.store);

        let (status, body) = h
            .send_signed("GET", "/log?startDate=2000&endDate=3000", b"")
            .await;
        assert_eq!(status, StatusCode::OK);
        let records: Vec<LogRecord> = serde_json::from_str(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "second");
    }

    #[tokio::test]
    async fn test_log_query_start_date_before_2001_matches_newer_records() {
        let h = harness();
        let log = h.store.log().unwrap();
        let base = 1_700_000_000_000u64;
        for (offset, msg) in [(0, "boot"), (1, "ready")] {
            log.append(&LogRecord::new(Severity::Info, base + offset, msg), u64::MAX)
                .unwrap();
        }

        // 2000-01-01 is below 10^13 ms; the padded bound still sorts
        // under every later key
        let (status, body) = h.send_signed("GET", "/log?startDate=2000-01-01", b"").await;
        assert_eq!(status, StatusCode::OK);
        let records: Vec<LogRecord> = serde_json::from_str(&body).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_log_query_rejects_bad_dates() {
        let h = harness();
        let (status, body) = h.send_signed("GET", "/log?startDate=bogus", b"").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid startDate");

        let (status, body) = h.send_signed("GET", "/log?endDate=bogus", b"").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid endDate");
    }

    #[tokio::test]
    async fn test_log_purge_requires_a_bound() {
        let h = harness();
        let (status, body) = h.send_signed("DELETE", "/log", b"").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Must provide at least one of before or after dates");

        let (status, body) = h.send_signed("DELETE", "/log?after=bogus", b"").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid date for after param");
    }

    #[tokio::test]
    async fn test_log_purge_newest_first_with_limit() {
        let h = harness();
        seed_log(&h.store);

        let (status, _) = h
            .send_signed("DELETE", "/log?after=0&limit=1&desc=true", b"")
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = h.send_signed("GET", "/log", b"").await;
        let records: Vec<LogRecord> = serde_json::from_str(&body).unwrap();
        let messages: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_store_failure_returns_generic_500() {
        let store = Arc::new(Store::new());
        store.init(Arc::new(FailingEngine));
        let h = harness_with_store(store);

        let (status, body) = h.send_signed("GET", "/whitelist", b"").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
    }
}
