//! Refill Panel - terminal client for the refill timer server
//!
//! This is the main entry point for the refill-panel application.

use std::sync::Arc;

use tokio::{io::BufReader, sync::mpsc};
use tracing::{info, warn};

use refill_panel::{
    api::RequestClient,
    config::Config,
    state::SystemClock,
    transport::TransportClient,
    utils::shutdown_signal,
    view::{Flow, LineInput, PanelView, Screen},
    PanelError,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout belongs to the panel
    tracing_subscriber::fmt()
        .with_env_filter(format!("refill_panel={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let endpoints = config.endpoints()?;
    info!("Starting refill-panel v1.0.0");
    info!("API: {}  WebSocket: {}", endpoints.api_base, endpoints.ws_url);

    let api = RequestClient::new(endpoints.api_base.clone())?;
    match api.health().await {
        Ok(health) => info!(
            "Server {}: {} active / {} total timers",
            health.status, health.active_timers, health.total_timers
        ),
        Err(e) => warn!("Health check failed: {}", e),
    }

    // Snapshots are forwarded into the main loop in receipt order
    let (snapshot_tx, mut snapshot_rx) = mpsc::unbounded_channel();
    let transport = TransportClient::new(endpoints.ws_url.clone());
    transport.on_message(move |timers| {
        let _ = snapshot_tx.send(timers.to_vec());
    });
    transport.connect();

    let mut panel = PanelView::new(api, Arc::new(SystemClock), config.tick_interval());
    let mut screen = Screen::new(std::io::stdout(), !config.no_clear);
    panel.load().await;
    screen.draw(&panel.render())?;

    let mut input = LineInput::new(BufReader::new(tokio::io::stdin()));
    let mut input_open = true;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(timers) = snapshot_rx.recv() => {
                panel.apply_snapshot(timers);
            }
            Some(tick) = panel.next_tick() => {
                if !panel.accept_tick(&tick) {
                    continue;
                }
            }
            line = input.next_line(), if input_open => {
                match line {
                    Ok(Some(line)) => {
                        screen.invalidate();
                        if panel.handle_line(&line).await == Flow::Quit {
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("Input closed");
                        break;
                    }
                    Err(e) => {
                        // Keep showing live updates until a signal arrives
                        warn!("Reading input failed: {}", e);
                        input_open = false;
                        panel.show_error(&PanelError::validation(format!(
                            "Input unavailable ({}), press Ctrl-C to exit",
                            e
                        )));
                    }
                }
            }
            _ = &mut shutdown => break,
        }
        screen.draw(&panel.render())?;
    }

    transport.disconnect();
    drop(panel);
    info!("Panel shutdown complete");
    Ok(())
}
