/*!
 * Cooperative cancellation flag checked between records
 *
 * The CLI wires the flag to SIGINT/SIGTERM through a small watcher thread
 * that drives a single-threaded tokio runtime. The first signal cancels the
 * token so the run stops at the next record boundary and still flushes and
 * closes every output. A second signal exits immediately.
 */

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::EXIT_CANCELLED;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the current run stop at the next record boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Cancel `token` on Ctrl+C or SIGTERM
pub fn install_interrupt_handler(token: &CancelToken) -> io::Result<()> {
    spawn_watcher(token.clone(), wait_for_shutdown)?;
    debug!("Interrupt handler installed");
    Ok(())
}

/// Run `trigger` on a background thread. The first completion cancels
/// `token`; the second ends the process with the cancellation exit code.
pub(crate) fn spawn_watcher<F, Fut>(token: CancelToken, trigger: F) -> io::Result<JoinHandle<()>>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("interrupt-watcher".to_string())
        .spawn(move || {
            runtime.block_on(async {
                trigger().await;
                warn!("Interrupt received, stopping at the next record boundary");
                token.cancel();

                trigger().await;
                warn!("Second interrupt received, exiting without cleanup");
                std::process::exit(EXIT_CANCELLED);
            })
        })
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
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
