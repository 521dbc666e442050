//! Integration tests for the dev server and session.
//!
//! Servers bind an ephemeral port on localhost and are exercised over real
//! HTTP.

mod common;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderMap;
use axum::routing::get;
use common::{FakeBundler, project_with, synthesizer};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use webrig_bundler::{Compilation, CompilationOutcome, Diagnostic, EmittedFile};
use webrig_cli::CliError;
use webrig_cli::dev::{
    ApiProxy, BundleCache, DevOptions, DevServer, DevServerState, Proxy, SessionOrchestrator,
    SharedState,
};
use webrig_config::Flags;

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    addr
}

fn state_with(static_dir: PathBuf, files: &[EmittedFile]) -> SharedState {
    let state = Arc::new(DevServerState::new(
        static_dir,
        Some("/index.html".to_string()),
        true,
    ));
    state.update_cache(BundleCache::from_files(files));
    state.complete_build(10);
    state
}

fn app_files() -> Vec<EmittedFile> {
    vec![
        EmittedFile::new(
            "index.html",
            "<html><body><div id=\"root\"></div></body></html>",
        ),
        EmittedFile::new("static/js/index.js", "console.log('app');"),
    ]
}

#[tokio::test]
async fn serves_compiled_files_and_injects_client() {
    let temp = project_with(&[]);
    let state = state_with(temp.path().join("static"), &app_files());
    let addr = spawn(DevServer::new(state, None).router()).await;

    let js = reqwest::get(format!("http://{addr}/static/js/index.js"))
        .await
        .unwrap();
    assert_eq!(js.status(), 200);
    assert_eq!(
        js.headers()["content-type"].to_str().unwrap(),
        "application/javascript"
    );
    assert_eq!(js.text().await.unwrap(), "console.log('app');");

    let page = reqwest::get(format!("http://{addr}/index.html"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains(r#"<script src="/__webrig_client__.js"></script>"#));

    let client = reqwest::get(format!("http://{addr}/__webrig_client__.js"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(client.contains("/__webrig_hmr__"));
}

#[tokio::test]
async fn unknown_routes_fall_back_to_main_page() {
    let temp = project_with(&[]);
    let state = state_with(temp.path().join("static"), &app_files());
    let addr = spawn(DevServer::new(state, None).router()).await;

    let response = reqwest::get(format!("http://{addr}/users/42")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("<div id=\"root\">"));

    let missing = reqwest::get(format!("http://{addr}/static/js/missing.js"))
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn serves_static_root() {
    let temp = project_with(&[("static/robots.txt", "User-agent: *")]);
    let state = state_with(temp.path().join("static"), &app_files());
    let addr = spawn(DevServer::new(state, None).router()).await;

    let response = reqwest::get(format!("http://{addr}/robots.txt")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "User-agent: *");
}

#[tokio::test]
async fn failed_build_shows_overlay_for_pages_only() {
    let temp = project_with(&[]);
    let state = state_with(temp.path().join("static"), &app_files());
    state.fail_build(vec!["src/index.ts:1: Unexpected token".to_string()]);
    let addr = spawn(DevServer::new(state, None).router()).await;

    let page = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Failed to compile"));
    assert!(page.contains("src/index.ts:1: Unexpected token"));

    let js = reqwest::get(format!("http://{addr}/static/js/index.js"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(js, "console.log('app');");
}

#[tokio::test]
async fn proxy_forwards_with_rewritten_host() {
    let upstream = spawn(Router::new().route(
        "/api/echo",
        get(|headers: HeaderMap| async move {
            headers
                .get("host")
                .and_then(|h| h.to_str().ok())
                .unwrap_or_default()
                .to_string()
        }),
    ))
    .await;

    let proxy = Proxy::new(&ApiProxy {
        target: format!("http://{upstream}"),
        context: vec!["/api".to_string()],
    })
    .unwrap();
    let temp = project_with(&[]);
    let state = state_with(temp.path().join("static"), &app_files());
    let addr = spawn(DevServer::new(state, Some(proxy)).router()).await;

    let response = reqwest::get(format!("http://{addr}/api/echo")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), upstream.to_string());
}

#[tokio::test]
async fn proxy_reports_unreachable_upstream() {
    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = closed.local_addr().unwrap();
    drop(closed);

    let proxy = Proxy::new(&ApiProxy {
        target: format!("http://{dead}"),
        context: vec!["/api".to_string()],
    })
    .unwrap();
    let temp = project_with(&[]);
    let state = state_with(temp.path().join("static"), &app_files());
    let addr = spawn(DevServer::new(state, Some(proxy)).router()).await;

    let response = reqwest::get(format!("http://{addr}/api/users")).await.unwrap();
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn session_serves_until_shutdown() {
    let temp = project_with(&[
        ("src/index.ts", "export {}"),
        ("src/index.html", "<html><body></body></html>"),
    ]);
    let s = synthesizer(temp.path(), &Flags::new());
    let bundler = Arc::new(FakeBundler::new(Compilation {
        outcome: CompilationOutcome::new("client"),
        files: app_files(),
    }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let session = SessionOrchestrator::new(&s, bundler.clone(), DevOptions::default());

    let client = async {
        let page = reqwest::get(format!("http://{addr}/dashboard"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        stop.send(()).unwrap();
        page
    };
    let (result, page) = tokio::join!(
        session.run_with_listener(listener, async {
            let _ = stopped.await;
        }),
        client
    );

    result.unwrap();
    assert!(page.contains("<div id=\"root\">"));
    assert_eq!(bundler.calls(), 1);
    assert!(bundler.last_config().unwrap().hot());
}

#[tokio::test]
async fn https_session_serves_over_tls() {
    let temp = project_with(&[
        ("src/index.ts", "export {}"),
        ("src/index.html", "<html><body></body></html>"),
    ]);
    let s = synthesizer(temp.path(), &Flags::new());
    let bundler = Arc::new(FakeBundler::new(Compilation {
        outcome: CompilationOutcome::new("client"),
        files: app_files(),
    }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let options = DevOptions {
        https: true,
        port,
        ..DevOptions::default()
    };
    assert_eq!(options.server_url(), format!("https://localhost:{port}"));
    let (stop, stopped) = oneshot::channel::<()>();
    let session = SessionOrchestrator::new(&s, bundler, options);

    let client = async {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .unwrap();
        let js = http
            .get(format!("https://127.0.0.1:{port}/static/js/index.js"))
            .send()
            .await
            .unwrap();
        let status = js.status();
        let body = js.text().await.unwrap();
        let plain = reqwest::get(format!("http://127.0.0.1:{port}/static/js/index.js")).await;
        stop.send(()).unwrap();
        (status, body, plain.is_err())
    };
    let (result, (status, body, plain_failed)) = tokio::join!(
        session.run_with_listener(listener, async {
            let _ = stopped.await;
        }),
        client
    );

    result.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body, "console.log('app');");
    assert!(plain_failed);
}

#[tokio::test]
async fn session_with_compile_errors_still_starts() {
    let temp = project_with(&[("src/index.ts", "export {}")]);
    let s = synthesizer(temp.path(), &Flags::new());
    let bundler = Arc::new(FakeBundler::new(Compilation {
        outcome: CompilationOutcome::new("client")
            .with_errors([Diagnostic::new("Could not resolve './missing'")]),
        files: Vec::new(),
    }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let session = SessionOrchestrator::new(&s, bundler, DevOptions::default());

    let client = async {
        let page = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        stop.send(()).unwrap();
        page
    };
    let (result, page) = tokio::join!(
        session.run_with_listener(listener, async {
            let _ = stopped.await;
        }),
        client
    );

    result.unwrap();
    assert!(page.contains("Could not resolve &#x27;./missing&#x27;"));
}

#[tokio::test]
async fn session_startup_fails_when_bundler_cannot_run() {
    let temp = project_with(&[("src/index.ts", "export {}")]);
    let s = synthesizer(temp.path(), &Flags::new());
    let bundler = Arc::new(FakeBundler::failing("invalid options"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let err = SessionOrchestrator::new(&s, bundler, DevOptions::default())
        .run_with_listener(listener, std::future::pending())
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::Bundler(_)));
}
