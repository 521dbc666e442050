//! Shared state for the dev server.
//!
//! Compiled files live in memory; the static root is read from disk by the
//! server. Locks are `parking_lot` and never held across an await.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use webrig_bundler::EmittedFile;

use crate::dev::DevEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    NotStarted,
    InProgress { started_at: Instant },
    Success { duration_ms: u64 },
    /// Flattened errors and warnings of the last compile.
    Failed { errors: Vec<String> },
}

impl BuildStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, BuildStatus::InProgress { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Success { .. })
    }

    pub fn errors(&self) -> Option<&[String]> {
        match self {
            BuildStatus::Failed { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Compiled output keyed by URL path (`/static/js/index.js`).
#[derive(Debug, Clone, Default)]
pub struct BundleCache {
    files: HashMap<String, (Vec<u8>, &'static str)>,
}

impl BundleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_files(files: &[EmittedFile]) -> Self {
        let mut cache = Self::new();
        for file in files {
            cache.insert(format!("/{}", file.path), file.contents.clone());
        }
        cache
    }

    pub fn insert(&mut self, path: String, content: Vec<u8>) {
        let content_type = content_type_for(&path);
        self.files.insert(path, (content, content_type));
    }

    pub fn get(&self, path: &str) -> Option<&(Vec<u8>, &'static str)> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub fn content_type_for(path: &str) -> &'static str {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        _ => "application/octet-stream",
    }
}

pub type ClientRegistry = Arc<RwLock<HashMap<usize, mpsc::Sender<String>>>>;

pub struct DevServerState {
    pub status: RwLock<BuildStatus>,
    pub cache: RwLock<BundleCache>,
    pub clients: ClientRegistry,
    next_client_id: RwLock<usize>,
    /// Root for files served as-is.
    pub static_dir: PathBuf,
    /// URL path of the page served for history fallback, if any entry has one.
    pub main_page: Option<String>,
    /// Whether served pages get the hot-reload client.
    pub hot: bool,
}

impl DevServerState {
    pub fn new(static_dir: PathBuf, main_page: Option<String>, hot: bool) -> Self {
        Self {
            status: RwLock::new(BuildStatus::NotStarted),
            cache: RwLock::new(BundleCache::new()),
            clients: Arc::new(RwLock::new(HashMap::new())),
            next_client_id: RwLock::new(0),
            static_dir,
            main_page,
            hot,
        }
    }

    pub fn start_build(&self) {
        *self.status.write() = BuildStatus::InProgress {
            started_at: Instant::now(),
        };
    }

    pub fn complete_build(&self, duration_ms: u64) {
        *self.status.write() = BuildStatus::Success { duration_ms };
    }

    pub fn fail_build(&self, errors: Vec<String>) {
        *self.status.write() = BuildStatus::Failed { errors };
    }

    pub fn get_status(&self) -> BuildStatus {
        self.status.read().clone()
    }

    pub fn update_cache(&self, new_cache: BundleCache) {
        *self.cache.write() = new_cache;
    }

    pub fn get_cached_file(&self, path: &str) -> Option<(Vec<u8>, &'static str)> {
        self.cache.read().get(path).cloned()
    }

    pub fn register_client(&self) -> (usize, mpsc::Receiver<String>) {
        let id = {
            let mut next_id = self.next_client_id.write();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (tx, rx) = mpsc::channel(100);
        self.clients.write().insert(id, tx);
        (id, rx)
    }

    pub fn unregister_client(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Send `event` to every client, dropping the ones that went away.
    pub async fn broadcast(&self, event: &DevEvent) {
        let json = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
        let clients = self.clients.read().clone();

        let mut failed_ids = Vec::new();
        for (id, tx) in clients {
            if tx.send(json.clone()).await.is_err() {
                failed_ids.push(id);
            }
        }
        for id in failed_ids {
            self.unregister_client(id);
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }
}

pub type SharedState = Arc<DevServerState>;

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DevServerState {
        DevServerState::new(PathBuf::from("static"), Some("/index.html".into()), true)
    }

    #[test]
    fn build_lifecycle() {
        let state = state();
        assert_eq!(state.get_status(), BuildStatus::NotStarted);

        state.start_build();
        assert!(state.get_status().is_in_progress());

        state.complete_build(150);
        assert!(state.get_status().is_success());

        state.fail_build(vec!["boom".into()]);
        assert_eq!(state.get_status().errors(), Some(&["boom".to_string()][..]));
    }

    #[test]
    fn cache_is_keyed_by_url_path() {
        let cache = BundleCache::from_files(&[
            EmittedFile::new("static/js/index.js", "1"),
            EmittedFile::new("index.html", "<html></html>"),
        ]);
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get("/static/js/index.js").map(|(_, ct)| *ct),
            Some("application/javascript")
        );
        assert_eq!(
            cache.get("/index.html").map(|(_, ct)| *ct),
            Some("text/html; charset=utf-8")
        );
        assert!(cache.get("static/js/index.js").is_none());
    }

    #[tokio::test]
    async fn broadcast_reaches_clients_and_drops_closed_ones() {
        let state = Arc::new(state());
        let (_, mut rx1) = state.register_client();
        let (_, rx2) = state.register_client();
        drop(rx2);
        assert_eq!(state.client_count(), 2);

        state.broadcast(&DevEvent::BuildStarted).await;
        assert_eq!(rx1.recv().await.as_deref(), Some(r#"{"type":"BuildStarted"}"#));
        assert_eq!(state.client_count(), 1);
    }
}
