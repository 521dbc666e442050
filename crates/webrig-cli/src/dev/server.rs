//! Dev server with hot reload via Server-Sent Events.
//!
//! Request handling order:
//! 1. proxied API paths
//! 2. the error overlay for page navigations while the last compile failed
//! 3. compiled files from the in-memory cache
//! 4. files under the static root
//! 5. history fallback to the main page

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Request, State};
use axum::handler::Handler;
use axum::http::{Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::sse::{Event, KeepAlive};
use axum::response::{Html, IntoResponse, Response, Sse};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::debug;

use crate::dev::error_overlay::generate_error_overlay;
use crate::dev::{Proxy, SharedState, TlsListener};
use crate::error::{CliError, Result};

pub const HMR_PATH: &str = "/__webrig_hmr__";
pub const CLIENT_SCRIPT_PATH: &str = "/__webrig_client__.js";

const CLIENT_SCRIPT: &str = include_str!("../../assets/dev/reload-client.js");

#[derive(Clone)]
struct RouteContext {
    state: SharedState,
    proxy: Option<Arc<Proxy>>,
}

pub struct DevServer {
    state: SharedState,
    proxy: Option<Arc<Proxy>>,
}

impl DevServer {
    pub fn new(state: SharedState, proxy: Option<Proxy>) -> Self {
        Self {
            state,
            proxy: proxy.map(Arc::new),
        }
    }

    pub fn router(&self) -> Router {
        let context = RouteContext {
            state: self.state.clone(),
            proxy: self.proxy.clone(),
        };

        let static_files = ServeDir::new(&self.state.static_dir)
            .append_index_html_on_directories(false)
            .call_fallback_on_method_not_allowed(true)
            .fallback(history_fallback.with_state(self.state.clone()));

        Router::new()
            .route(HMR_PATH, get(handle_sse))
            .route(CLIENT_SCRIPT_PATH, get(handle_client_script))
            .fallback_service(static_files)
            .layer(middleware::from_fn_with_state(context, route_request))
            .layer(CompressionLayer::new())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(self.state.clone())
    }

    /// Serve until the listener fails or the task is aborted.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        axum::serve(listener, self.router())
            .await
            .map_err(|e| CliError::Server(format!("server stopped: {e}")))
    }

    /// Like [`DevServer::serve`], over TLS.
    pub async fn serve_tls(self, listener: TcpListener, acceptor: TlsAcceptor) -> Result<()> {
        axum::serve(TlsListener::new(listener, acceptor), self.router())
            .await
            .map_err(|e| CliError::Server(format!("server stopped: {e}")))
    }
}

async fn route_request(
    State(context): State<RouteContext>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if let Some(proxy) = &context.proxy {
        if proxy.matches(&path) {
            return proxy.forward(request).await;
        }
    }

    if path.starts_with("/__webrig") {
        return next.run(request).await;
    }

    if is_navigation(request.method(), &path) {
        if let Some(errors) = context.state.get_status().errors() {
            return no_cache(Html(generate_error_overlay(errors)));
        }
    }

    if let Some(response) = serve_cached(&context.state, &path) {
        return response;
    }

    next.run(request).await
}

async fn history_fallback(State(state): State<SharedState>, request: Request) -> Response {
    let accepts_page = is_navigation(request.method(), request.uri().path());
    let main_page = state.main_page.as_deref().filter(|_| accepts_page);

    match main_page.and_then(|page| serve_cached(&state, page)) {
        Some(response) => response,
        None => {
            debug!("not found: {}", request.uri().path());
            (StatusCode::NOT_FOUND, format!("Not found: {}", request.uri().path())).into_response()
        }
    }
}

async fn handle_sse(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let (id, rx) = state.register_client();
    debug!("hot reload client {id} connected");

    let stream = ReceiverStream::new(rx).map(|data| Ok(Event::default().data(data)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

async fn handle_client_script() -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        CLIENT_SCRIPT,
    )
        .into_response()
}

fn serve_cached(state: &SharedState, path: &str) -> Option<Response> {
    let (content, content_type) = state.get_cached_file(path)?;
    let body = if state.hot && content_type.starts_with("text/html") {
        inject_client_script(&content)
    } else {
        content
    };
    Some(
        (
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            body,
        )
            .into_response(),
    )
}

fn no_cache(response: impl IntoResponse) -> Response {
    ([(header::CACHE_CONTROL, "no-cache")], response).into_response()
}

/// A GET or HEAD for a page: no file extension, or `.html`.
fn is_navigation(method: &Method, path: &str) -> bool {
    if method != Method::GET && method != Method::HEAD {
        return false;
    }
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    match Path::new(last_segment).extension() {
        None => true,
        Some(ext) => ext == "html",
    }
}

fn inject_client_script(content: &[u8]) -> Vec<u8> {
    let html = String::from_utf8_lossy(content);
    let script_tag = format!(r#"<script src="{CLIENT_SCRIPT_PATH}"></script>"#);

    match html.rfind("</body>") {
        Some(pos) => {
            let mut result = String::with_capacity(html.len() + script_tag.len() + 1);
            result.push_str(&html[..pos]);
            result.push_str(&script_tag);
            result.push('\n');
            result.push_str(&html[pos..]);
            result.into_bytes()
        }
        None => format!("{html}\n{script_tag}").into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_detection() {
        assert!(is_navigation(&Method::GET, "/"));
        assert!(is_navigation(&Method::GET, "/users/42"));
        assert!(is_navigation(&Method::HEAD, "/index.html"));
        assert!(!is_navigation(&Method::GET, "/static/js/index.js"));
        assert!(!is_navigation(&Method::GET, "/logo.png"));
        assert!(!is_navigation(&Method::POST, "/users"));
    }

    #[test]
    fn client_script_goes_before_body_close() {
        let html = inject_client_script(b"<html><body><div id=\"root\"></div></body></html>");
        let html = String::from_utf8(html).unwrap();
        let script = html.find(CLIENT_SCRIPT_PATH).unwrap();
        assert!(script < html.find("</body>").unwrap());
    }

    #[test]
    fn client_script_is_appended_without_body() {
        let html = inject_client_script(b"<h1>bare</h1>");
        let html = String::from_utf8(html).unwrap();
        assert!(html.starts_with("<h1>bare</h1>"));
        assert!(html.ends_with(r#"<script src="/__webrig_client__.js"></script>"#));
    }
}
