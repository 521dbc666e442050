//! Development session.
//!
//! - [`SessionOrchestrator`] ties everything together and owns the lifecycle
//! - [`server`] is the axum app: compiled files, static root, history fallback
//! - [`proxy`] forwards API paths upstream
//! - [`watcher`] triggers recompiles on source changes
//! - [`error_overlay`] renders compile failures in the browser
//! - [`tls`] serves HTTPS with a self-signed certificate

pub mod config;
pub mod error_overlay;
pub mod proxy;
pub mod server;
pub mod session;
pub mod state;
pub mod tls;
pub mod watcher;

pub use config::{ApiProxy, DevOptions};
pub use proxy::Proxy;
pub use server::DevServer;
pub use session::SessionOrchestrator;
pub use state::{BuildStatus, BundleCache, DevServerState, SharedState};
pub use tls::{TlsListener, self_signed_acceptor};
pub use watcher::{FileChange, FileWatcher};

use serde::{Deserialize, Serialize};

/// Events pushed to connected browsers over SSE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DevEvent {
    BuildStarted,
    BuildCompleted { duration_ms: u64 },
    BuildFailed { errors: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged() {
        let json = serde_json::to_string(&DevEvent::BuildCompleted { duration_ms: 12 }).unwrap();
        assert_eq!(json, r#"{"type":"BuildCompleted","duration_ms":12}"#);
        let json = serde_json::to_string(&DevEvent::BuildStarted).unwrap();
        assert_eq!(json, r#"{"type":"BuildStarted"}"#);
    }
}
