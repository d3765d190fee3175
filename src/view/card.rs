//! One rendered timer with its countdown anchor and tick task

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    time::Instant,
};

use crate::{
    state::{Clock, Countdown, Timer, TimerStatus},
    tasks::{CardTick, CountdownTicker},
};

/// Spawns tickers with increasing generations
pub(crate) struct TickerFactory {
    clock: Arc<dyn Clock>,
    period: Duration,
    ticks: mpsc::UnboundedSender<CardTick>,
    next_generation: u64,
}

impl TickerFactory {
    pub(crate) fn new(
        clock: Arc<dyn Clock>,
        period: Duration,
        ticks: mpsc::UnboundedSender<CardTick>,
    ) -> Self {
        Self {
            clock,
            period,
            ticks,
            next_generation: 1,
        }
    }

    fn spawn(&mut self, timer_id: &str, anchor_rx: watch::Receiver<Countdown>) -> CountdownTicker {
        let generation = self.next_generation;
        self.next_generation += 1;
        CountdownTicker::spawn(
            timer_id.to_string(),
            generation,
            anchor_rx,
            Arc::clone(&self.clock),
            self.period,
            self.ticks.clone(),
        )
    }
}

/// A mounted timer card. Dropping it cancels its ticker.
pub struct Card {
    timer: Timer,
    anchor_tx: watch::Sender<Countdown>,
    ticker: Option<CountdownTicker>,
}

impl Card {
    pub(crate) fn mount(timer: Timer, now: Instant, tickers: &mut TickerFactory) -> Self {
        let (anchor_tx, _) = watch::channel(Countdown::sync(&timer, now));
        let mut card = Self {
            timer,
            anchor_tx,
            ticker: None,
        };
        card.sync_ticker(tickers);
        card
    }

    /// Apply a newer snapshot of this card's timer
    pub(crate) fn update(&mut self, timer: Timer, now: Instant, tickers: &mut TickerFactory) {
        self.anchor_tx.send_modify(|countdown| countdown.resync(&timer, now));
        self.timer = timer;
        self.sync_ticker(tickers);
    }

    /// Keep exactly one live ticker while active, none otherwise
    fn sync_ticker(&mut self, tickers: &mut TickerFactory) {
        if self.countdown().is_ticking() {
            let running = self.ticker.as_ref().is_some_and(|t| !t.is_finished());
            if !running {
                self.ticker = Some(tickers.spawn(&self.timer.id, self.anchor_tx.subscribe()));
            }
        } else {
            self.ticker = None;
        }
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn status(&self) -> TimerStatus {
        self.timer.status
    }

    pub fn countdown(&self) -> Countdown {
        *self.anchor_tx.borrow()
    }

    pub fn display_at(&self, now: Instant) -> String {
        self.countdown().display_at(now)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Whether `tick` comes from this card's current ticker
    pub fn accepts(&self, tick: &CardTick) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|t| t.generation() == tick.generation)
    }

    /// Controls offered for this card's status
    pub fn controls(&self) -> &'static str {
        match self.timer.status {
            TimerStatus::Active => "[+] [-] [delete]",
            TimerStatus::Completed | TimerStatus::Error => "[restart] [delete]",
            TimerStatus::Deleted => "",
        }
    }
}
