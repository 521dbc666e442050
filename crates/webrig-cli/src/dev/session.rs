//! Long-running dev session.

use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use webrig_bundler::{BuildResult, Bundler};
use webrig_config::{BundlerConfig, ConfigSynthesizer};

use crate::dev::tls::certificate_hosts;
use crate::dev::watcher::DEFAULT_DEBOUNCE_MS;
use crate::dev::{
    BundleCache, DevEvent, DevOptions, DevServer, DevServerState, FileWatcher, Proxy, SharedState,
    self_signed_acceptor,
};
use crate::error::{CliError, Result};
use crate::ui;

/// Owns a dev session from the first compile to shutdown.
///
/// Startup failures (configuration, bundler invocation, proxy target, bind)
/// return an error without retrying. Once the server is up, compile failures
/// only change what browsers see.
pub struct SessionOrchestrator<'a> {
    synthesizer: &'a ConfigSynthesizer,
    bundler: Arc<dyn Bundler>,
    options: DevOptions,
}

impl<'a> SessionOrchestrator<'a> {
    pub fn new(
        synthesizer: &'a ConfigSynthesizer,
        bundler: Arc<dyn Bundler>,
        options: DevOptions,
    ) -> Self {
        Self {
            synthesizer,
            bundler,
            options,
        }
    }

    /// Bind the configured address and serve until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let addr = self.options.addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("failed to bind {addr}: {e}")))?;
        self.run_with_listener(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn run_with_listener<S>(self, listener: TcpListener, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let config = self.synthesizer.development();
        let main_page = config
            .html_plugins()
            .next()
            .map(|(entry, _)| format!("/{entry}.html"));
        let state: SharedState = Arc::new(DevServerState::new(
            self.synthesizer.static_dir(),
            main_page,
            config.hot(),
        ));

        info!("Starting the development server...");
        self.compile(&config, &state).await?;

        let proxy = self.options.api_proxy.as_ref().map(Proxy::new).transpose()?;
        let (_watcher, mut changes) =
            FileWatcher::new(self.synthesizer.src_dir().to_path_buf(), DEFAULT_DEBOUNCE_MS)?;

        let server = DevServer::new(state.clone(), proxy);
        let mut server_task = if self.options.https {
            let acceptor = self_signed_acceptor(&certificate_hosts(self.options.host))?;
            tokio::spawn(server.serve_tls(listener, acceptor))
        } else {
            tokio::spawn(server.serve(listener))
        };
        ui::success(&format!(
            "Development server running at {}",
            self.options.server_url()
        ));

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                Some(change) = changes.recv() => {
                    debug!("changed: {}", change.path().display());
                    // Coalesce everything queued behind the first change.
                    while changes.try_recv().is_ok() {}
                    if let Err(e) = self.compile(&config, &state).await {
                        ui::error(&format!("Rebuild failed: {e}"));
                        state.fail_build(vec![e.to_string()]);
                        state
                            .broadcast(&DevEvent::BuildFailed {
                                errors: vec![e.to_string()],
                            })
                            .await;
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutting down the development server");
                    break;
                }
                joined = &mut server_task => {
                    return match joined {
                        Ok(result) => result,
                        Err(e) => Err(CliError::Server(format!("server task failed: {e}"))),
                    };
                }
            }
        }

        server_task.abort();
        Ok(())
    }

    /// Compile once and publish the result to the server state.
    ///
    /// Only a bundler invocation failure is an error. Diagnostics, warnings
    /// included, put the session into the failed state.
    async fn compile(&self, config: &BundlerConfig, state: &DevServerState) -> Result<()> {
        state.start_build();
        state.broadcast(&DevEvent::BuildStarted).await;
        let started = Instant::now();

        let compilation = self.bundler.compile(config).await?;
        let result = BuildResult::judge(&compilation.outcome);
        state.update_cache(BundleCache::from_files(&compilation.files));

        if result.succeeded {
            let duration_ms = started.elapsed().as_millis() as u64;
            info!("Compiled successfully in {duration_ms}ms");
            state.complete_build(duration_ms);
            state
                .broadcast(&DevEvent::BuildCompleted { duration_ms })
                .await;
        } else {
            let messages: Vec<String> = result
                .flattened_errors
                .iter()
                .chain(&result.flattened_warnings)
                .map(ToString::to_string)
                .collect();
            warn!("Failed to compile: {} problem(s)", messages.len());
            for message in &messages {
                warn!("{message}");
            }
            state.fail_build(messages.clone());
            state
                .broadcast(&DevEvent::BuildFailed { errors: messages })
                .await;
        }
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
