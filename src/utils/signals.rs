//! Signal handling for graceful shutdown

use std::{future::Future, io};

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{info, warn};

/// Resolve on the first SIGTERM or SIGINT. If the handlers cannot be
/// installed this never resolves.
pub async fn shutdown_signal() {
    settle(listen()).await
}

async fn listen() -> io::Result<()> {
    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    let handle = signals.handle();

    if let Some(signal) = signals.next().await {
        let name = match signal {
            SIGTERM => "SIGTERM",
            SIGINT => "SIGINT",
            _ => "unknown",
        };
        info!("Received signal: {}", name);
    }

    handle.close();
    Ok(())
}

async fn settle<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Signal handling unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}
