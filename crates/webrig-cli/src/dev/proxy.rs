//! Reverse proxy for API paths.
//!
//! Requests whose path starts with one of the configured context prefixes are
//! forwarded to the upstream target. The `Host` header is rewritten to the
//! target's authority and upstream certificates are not verified.

use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use reqwest::Url;
use tracing::{debug, warn};

use crate::dev::ApiProxy;
use crate::error::{CliError, Result};

/// Request bodies above this size are rejected with 413.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const HOP_BY_HOP: [header::HeaderName; 5] = [
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::TE,
    header::TRAILER,
];

#[derive(Debug, Clone)]
pub struct Proxy {
    client: reqwest::Client,
    target: Url,
    context: Vec<String>,
}

impl Proxy {
    pub fn new(config: &ApiProxy) -> Result<Self> {
        let target = Url::parse(&config.target).map_err(|e| {
            CliError::InvalidArgument(format!("invalid proxy target '{}': {e}", config.target))
        })?;
        if target.host_str().is_none() {
            return Err(CliError::InvalidArgument(format!(
                "proxy target '{}' has no host",
                config.target
            )));
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CliError::Server(format!("failed to create proxy client: {e}")))?;

        Ok(Self {
            client,
            target,
            context: config.context.clone(),
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.context.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// `host[:port]` of the target, used as the forwarded `Host` header.
    pub fn authority(&self) -> String {
        let host = self.target.host_str().unwrap_or_default();
        match self.target.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    pub fn upstream_url(&self, path_and_query: &str) -> String {
        format!(
            "{}{}",
            self.target.as_str().trim_end_matches('/'),
            path_and_query
        )
    }

    pub async fn forward(&self, request: Request) -> Response {
        let (parts, body) = request.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = self.upstream_url(path_and_query);

        let body = match to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return (StatusCode::PAYLOAD_TOO_LARGE, format!("Proxy error: {e}")).into_response();
            }
        };

        let mut headers = strip_hop_by_hop(parts.headers);
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);
        let authority = self.authority();
        if let Ok(value) = authority.parse() {
            headers.insert(header::HOST, value);
        }

        debug!("proxy {} {} -> {}", parts.method, path_and_query, url);
        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await;

        match upstream {
            Ok(response) => {
                let status = response.status();
                let headers = strip_hop_by_hop(response.headers().clone());
                let mut proxied = Response::new(Body::from_stream(response.bytes_stream()));
                *proxied.status_mut() = status;
                *proxied.headers_mut() = headers;
                proxied
            }
            Err(e) => {
                warn!("proxy request to {url} failed: {e}");
                (StatusCode::BAD_GATEWAY, format!("Proxy error: {e}")).into_response()
            }
        }
    }
}

fn strip_hop_by_hop(mut headers: HeaderMap) -> HeaderMap {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy(target: &str) -> Proxy {
        Proxy::new(&ApiProxy {
            target: target.to_string(),
            context: vec!["/api".to_string(), "/auth".to_string()],
        })
        .unwrap()
    }

    #[test]
    fn matches_context_prefixes() {
        let proxy = proxy("https://api.example.com");
        assert!(proxy.matches("/api/users"));
        assert!(proxy.matches("/auth"));
        assert!(!proxy.matches("/static/js/index.js"));
        assert!(!proxy.matches("/"));
    }

    #[test]
    fn authority_keeps_explicit_port() {
        assert_eq!(proxy("https://api.example.com").authority(), "api.example.com");
        assert_eq!(proxy("http://localhost:8080").authority(), "localhost:8080");
    }

    #[test]
    fn upstream_url_appends_path_and_query() {
        let proxy = proxy("https://api.example.com/");
        assert_eq!(
            proxy.upstream_url("/api/users?page=2"),
            "https://api.example.com/api/users?page=2"
        );
    }

    #[test]
    fn rejects_invalid_target() {
        let result = Proxy::new(&ApiProxy {
            target: "not a url".to_string(),
            context: vec!["/api".to_string()],
        });
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn hop_by_hop_headers_are_removed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, "keep-alive".parse().unwrap());
        headers.insert(header::ACCEPT, "application/json".parse().unwrap());
        let headers = strip_hop_by_hop(headers);
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get(header::ACCEPT).is_some());
    }
}
