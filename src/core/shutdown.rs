//! # OS termination signals.
//!
//! [`shutdown_signal`] completes when the process is asked to stop; callers
//! follow it with [`StrategyRunner::shutdown`](crate::StrategyRunner::shutdown).
//!
//! Unix listens for `SIGINT`, `SIGTERM` and `SIGQUIT`; other platforms for Ctrl-C.

/// Waits for a termination signal.
///
/// Returns `Err` if signal registration fails.
#[cfg(unix)]
pub async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Returns `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
