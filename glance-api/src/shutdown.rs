//! Graceful shutdown handling
//!
//! On SIGINT or SIGTERM the server stops accepting connections and drains
//! in-flight requests. Draining is bounded by a grace period; once it
//! elapses the process exits regardless.

use std::future::{Future, IntoFuture};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Shutdown coordinator for graceful termination
#[derive(Clone)]
pub struct ShutdownCoordinator {
    /// Watch channel for shutdown signal
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    /// Flag indicating shutdown has started
    is_shutting_down: Arc<AtomicBool>,
    /// Grace period for draining
    timeout: Duration,
}

impl ShutdownCoordinator {
    pub fn with_timeout(timeout: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            shutdown_tx,
            shutdown_rx,
            is_shutting_down: Arc::new(AtomicBool::new(false)),
            timeout,
        }
    }

    /// Get a receiver for shutdown signals
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Check if shutdown is in progress
    pub fn is_shutting_down(&self) -> bool {
        self.is_shutting_down.load(Ordering::SeqCst)
    }

    /// Initiate graceful shutdown
    pub fn shutdown(&self) {
        if self.is_shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }

        info!(grace = ?self.timeout, "Initiating graceful shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for SIGINT / SIGTERM, then trigger shutdown
    pub async fn wait_for_signal(&self) -> io::Result<()> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;

            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM"),
                _ = sigint.recv() => info!("Received SIGINT"),
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await?;
            info!("Received Ctrl+C");
        }

        self.shutdown();
        Ok(())
    }

    /// Listen for OS signals in the background
    pub fn listen_for_signals(&self) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            if let Err(e) = coordinator.wait_for_signal().await {
                warn!(error = %e, "Failed to register signal handlers");
            }
        });
    }

    /// Future that resolves once shutdown begins; pass to `with_graceful_shutdown`
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();

        async move {
            while !*rx.borrow() {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    /// Drive `server` to completion, cutting draining off after the grace period
    pub async fn run_until_drained<S>(&self, server: S) -> io::Result<()>
    where
        S: IntoFuture<Output = io::Result<()>>,
    {
        let server = server.into_future();
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => return result,
            _ = self.signal() => {}
        }

        match tokio::time::timeout(self.timeout, server).await {
            Ok(result) => {
                info!("In-flight requests drained");
                result
            }
            Err(_) => {
                warn!(grace = ?self.timeout, "Requests still in flight after grace period, forcing exit");
                Ok(())
            }
        }
    }
}
