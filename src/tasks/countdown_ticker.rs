//! Per-card countdown tick task

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::debug;

use crate::state::{Clock, Countdown};

/// Redraw notification from a ticker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTick {
    pub timer_id: String,
    /// Distinguishes a card's current ticker from ones it has replaced
    pub generation: u64,
    pub remaining: i64,
}

/// Handle to a running tick task. Dropping it cancels the task.
#[derive(Debug)]
pub struct CountdownTicker {
    generation: u64,
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    /// Spawn a ticker that follows `anchor_rx`.
    ///
    /// Every `period` (and on every anchor change) it recomputes the
    /// displayed seconds and sends a [`CardTick`] when the value changed.
    /// It exits once the anchor stops ticking or the receiver is gone.
    pub fn spawn(
        timer_id: String,
        generation: u64,
        anchor_rx: watch::Receiver<Countdown>,
        clock: Arc<dyn Clock>,
        period: Duration,
        ticks: mpsc::UnboundedSender<CardTick>,
    ) -> Self {
        let handle = tokio::spawn(countdown_tick_task(
            timer_id, generation, anchor_rx, clock, period, ticks,
        ));
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn countdown_tick_task(
    timer_id: String,
    generation: u64,
    mut anchor_rx: watch::Receiver<Countdown>,
    clock: Arc<dyn Clock>,
    period: Duration,
    ticks: mpsc::UnboundedSender<CardTick>,
) {
    debug!("Ticker {}#{} started", timer_id, generation);

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_sent: Option<i64> = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            changed = anchor_rx.changed() => {
                if changed.is_err() {
                    debug!("Ticker {}#{}: card dropped", timer_id, generation);
                    break;
                }
            }
        }

        let countdown = *anchor_rx.borrow_and_update();
        let remaining = countdown.remaining_at(clock.now());

        if last_sent != Some(remaining) {
            last_sent = Some(remaining);
            let tick = CardTick {
                timer_id: timer_id.clone(),
                generation,
                remaining,
            };
            if ticks.send(tick).is_err() {
                break;
            }
        }

        if !countdown.is_ticking() {
            debug!("Ticker {}#{} stopped: {}", timer_id, generation, countdown.status().as_str());
            break;
        }
    }
}
