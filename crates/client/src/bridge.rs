//! Blocking entry into async code, safe whether or not the caller already
//! runs inside a tokio runtime.
//!
//! Driving a future with `block_on` from a runtime worker panics, and doing
//! it from a current-thread runtime deadlocks. [`run_isolated`] sidesteps both
//! by moving the work to a dedicated thread with its own current-thread
//! runtime; the caller only waits on a channel, bounded by an outer timeout.
//!
//! When the outer timeout fires the worker is detached, not killed: it runs
//! until its future completes and the result is dropped.

use scour_core::Confinement;
use std::future::Future;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use tokio::runtime::{Builder, Handle};

/// Failure to get a result back across the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("bridged call did not finish within {0:?}")]
    Timeout(Duration),

    #[error("bridge worker panicked")]
    WorkerPanicked,

    #[error("failed to start bridge runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Run the future built by `make` on a fresh named thread with its own
/// current-thread runtime, waiting at most `timeout` for the output.
pub fn run_isolated<F, Fut, T>(name: &str, timeout: Duration, make: F) -> Result<T, BridgeError>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = T>,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);

    std::thread::Builder::new().name(name.to_owned()).spawn(move || {
        let runtime = match Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(err) => {
                let _ = tx.send(Err(err));
                return;
            }
        };
        let output = runtime.block_on(make());
        let _ = tx.send(Ok(output));
    })?;

    match rx.recv_timeout(timeout) {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(err)) => Err(BridgeError::Runtime(err)),
        Err(RecvTimeoutError::Timeout) => Err(BridgeError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(BridgeError::WorkerPanicked),
    }
}

/// Chooses where a blocking call drives its future.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bridge {
    confinement: Confinement,
}

impl Bridge {
    pub fn new(confinement: Confinement) -> Self {
        Self { confinement }
    }

    pub fn confinement(&self) -> Confinement {
        self.confinement
    }

    /// Whether a call made from the current thread would go to a worker.
    pub fn isolates_here(&self) -> bool {
        self.confinement == Confinement::Isolated || Handle::try_current().is_ok()
    }

    /// Drive the future built by `make` to completion, bounded by `timeout`.
    ///
    /// Inside a runtime (or with isolated confinement) this is
    /// [`run_isolated`]; otherwise a current-thread runtime is built on the
    /// caller's own thread.
    pub fn block_on<F, Fut, T>(&self, name: &str, timeout: Duration, make: F) -> Result<T, BridgeError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T>,
        T: Send + 'static,
    {
        if self.isolates_here() {
            tracing::debug!("running {} on an isolated worker", name);
            return run_isolated(name, timeout, make);
        }

        let runtime = Builder::new_current_thread().enable_all().build()?;
        runtime
            .block_on(async { tokio::time::timeout(timeout, make()).await })
            .map_err(|_| BridgeError::Timeout(timeout))
    }
}
