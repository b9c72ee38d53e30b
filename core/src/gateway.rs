//! The request gateway: four HTTP verbs over one base URL.
//!
//! # Design
//! `Gateway` holds only `base_url` and a transport, and carries no mutable
//! state between calls. Each verb is split the same way: `build_*` produces
//! an `HttpRequest`, the transport executes it, and one shared response
//! handler turns the `HttpResponse` into a decoded value or an error. Hosts
//! doing their own I/O can call `build_*` and `parse_response` directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};

/// Async client for a JSON-over-HTTP API rooted at `base_url`.
///
/// Every call issues exactly one request and yields exactly one outcome.
/// There are no retries and no timeouts; dropping the future abandons the
/// call.
#[derive(Debug, Clone)]
pub struct Gateway<T = ReqwestTransport> {
    base_url: String,
    transport: T,
}

impl Gateway<ReqwestTransport> {
    /// Gateway over the default reqwest transport. `base_url` is kept
    /// verbatim, including any trailing slash.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, ReqwestTransport::new())
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.base_url.clone())
    }
}

impl<T: Transport> Gateway<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `base_url + endpoint` and decode the JSON response.
    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        self.execute(self.build_get(endpoint)).await
    }

    /// POST `data` as JSON to `base_url + endpoint` and decode the response.
    pub async fn post<R, B>(&self, endpoint: &str, data: &B) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.build_post(endpoint, data)?).await
    }

    /// PUT `data` as JSON to `base_url + endpoint` and decode the response.
    pub async fn put<R, B>(&self, endpoint: &str, data: &B) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.build_put(endpoint, data)?).await
    }

    /// DELETE `base_url + endpoint` and decode the JSON response.
    pub async fn delete<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        self.execute(self.build_delete(endpoint)).await
    }

    pub fn build_get(&self, endpoint: &str) -> HttpRequest {
        self.bodyless(HttpMethod::Get, endpoint)
    }

    pub fn build_post<B: Serialize + ?Sized>(&self, endpoint: &str, data: &B) -> Result<HttpRequest> {
        self.with_json_body(HttpMethod::Post, endpoint, data)
    }

    pub fn build_put<B: Serialize + ?Sized>(&self, endpoint: &str, data: &B) -> Result<HttpRequest> {
        self.with_json_body(HttpMethod::Put, endpoint, data)
    }

    pub fn build_delete(&self, endpoint: &str) -> HttpRequest {
        self.bodyless(HttpMethod::Delete, endpoint)
    }

    /// Interpret a response obtained outside the gateway's transport.
    pub fn parse_response<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R> {
        handle_response(response)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    fn bodyless(&self, method: HttpMethod, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(endpoint),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: &B,
    ) -> Result<HttpRequest> {
        let body = serde_json::to_string(data).map_err(ApiError::Serialize)?;
        Ok(HttpRequest {
            method,
            url: self.url(endpoint),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    async fn execute<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        debug!(status = response.status, "response received");
        handle_response(response)
    }
}

/// Shared by all four verbs: non-2xx becomes `ApiError::Http`, anything else
/// is decoded as JSON. A decode failure stays `ApiError::Decode`.
fn handle_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R> {
    if !response.is_success() {
        warn!(status = response.status, "request failed");
        return Err(ApiError::Http {
            status: response.status,
        });
    }
    serde_json::from_str(&response.body).map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;

    /// Records every request and answers with one canned response.
    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::new(self.status, self.body))
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    fn gateway(status: u16, body: &'static str) -> Gateway<Canned> {
        Gateway::with_transport("http://localhost:8080", Canned::new(status, body))
    }

    #[tokio::test]
    async fn get_sends_one_bodyless_request() {
        let gw = gateway(200, r#"{"x":1}"#);
        let value: Value = gw.get("/events/pastEvents").await.unwrap();
        assert_eq!(value, json!({"x": 1}));

        let seen = gw.transport().requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].url, "http://localhost:8080/events/pastEvents");
        assert!(seen[0].body.is_none());
        assert!(seen[0].headers.is_empty());
    }

    #[tokio::test]
    async fn post_sends_json_body_and_content_type() {
        let gw = gateway(200, "true");
        let payload = json!({"name": "Konverents", "seats": 40});
        let ok: bool = gw.post("/events/addEvent", &payload).await.unwrap();
        assert!(ok);

        let seen = gw.transport().requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, payload);
    }

    #[tokio::test]
    async fn put_matches_post_except_for_verb() {
        let gw = gateway(200, "{}");
        let payload = json!({"firstName": "Mari"});
        let _: Value = gw.put("/events/editPersonParticipation/3", &payload).await.unwrap();

        let seen = gw.transport().requests();
        assert_eq!(seen[0].method, HttpMethod::Put);
        assert_eq!(seen[0].url, "http://localhost:8080/events/editPersonParticipation/3");
        assert_eq!(seen[0].header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn delete_sends_one_bodyless_request() {
        let gw = gateway(200, "false");
        let deleted: bool = gw.delete("/events/deleteEvent/9").await.unwrap();
        assert!(!deleted);

        let seen = gw.transport().requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Delete);
        assert!(seen[0].body.is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        for status in [301, 404, 500] {
            let gw = gateway(status, r#"{"error":"nope"}"#);
            let err = gw.get::<Value>("/missing").await.unwrap_err();
            assert!(matches!(err, ApiError::Http { status: s } if s == status));
            assert!(err.to_string().contains(&status.to_string()));
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let gw = gateway(200, "{not json");
        let err = gw.get::<Value>("/events/pastEvents").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn wrong_shape_is_decode_error() {
        let gw = gateway(200, r#"{"x":1}"#);
        let err = gw.get::<Vec<u32>>("/numbers").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn unserializable_payload_never_reaches_transport() {
        let gw = gateway(200, "{}");
        let mut bad = BTreeMap::new();
        bad.insert(vec![1u8], "value");
        let err = gw.post::<Value, _>("/x", &bad).await.unwrap_err();
        assert!(matches!(err, ApiError::Serialize(_)));
        assert!(gw.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_passes_through() {
        let gw = Gateway::with_transport("http://localhost:1", Unreachable);
        let err = gw.delete::<Value>("/x").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn base_url_is_used_verbatim() {
        let gw = Gateway::with_transport("http://localhost:8080/api/", Unreachable);
        assert_eq!(gw.build_get("events").url, "http://localhost:8080/api/events");
        assert_eq!(gw.build_delete("/events").url, "http://localhost:8080/api//events");
    }

    #[test]
    fn parse_response_uses_the_shared_handler() {
        let gw = Gateway::with_transport("http://localhost:8080", Unreachable);
        let err = gw
            .parse_response::<Value>(HttpResponse::new(418, ""))
            .unwrap_err();
        assert_eq!(err.status(), Some(418));
        let ok: Value = gw.parse_response(HttpResponse::new(201, "[1,2]")).unwrap();
        assert_eq!(ok, json!([1, 2]));
    }

    #[test]
    fn gateway_is_shareable_across_tasks() {
        fn assert_shareable<T: Clone + Send + Sync + 'static>() {}
        assert_shareable::<Gateway>();
        assert_shareable::<crate::events::EventsApi>();
    }

    #[test]
    fn from_config_keeps_base_url() {
        let gw = Gateway::from_config(&GatewayConfig::new("https://nullam.example"));
        assert_eq!(gw.base_url(), "https://nullam.example");
    }
}
