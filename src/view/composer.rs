//! Panel composition: timer cards, creation form, user actions

use std::{
    collections::{HashMap, HashSet},
    fmt::Write as _,
    sync::Arc,
    time::Duration,
};

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{
    card::{Card, TickerFactory},
    command::{CardRef, Command, USAGE},
};
use crate::{
    api::TimerApi,
    error::{PanelError, Result},
    state::{Clock, CreationDraft, PanelState, Timer, TimerStatus},
    tasks::CardTick,
};

/// Largest single adjustment the server accepts, in seconds
pub const MAX_ADJUST_SECONDS: i32 = 60;

/// What the main loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The timer panel.
///
/// Snapshots overwrite the card list wholesale. User actions go to the
/// [`TimerApi`] and never edit cards locally; the next snapshot shows their
/// effect.
pub struct PanelView<A> {
    api: A,
    clock: Arc<dyn Clock>,
    order: Vec<String>,
    cards: HashMap<String, Card>,
    state: PanelState,
    tickers: TickerFactory,
    ticks_rx: mpsc::UnboundedReceiver<CardTick>,
    show_help: bool,
}

impl<A: TimerApi> PanelView<A> {
    pub fn new(api: A, clock: Arc<dyn Clock>, tick_interval: Duration) -> Self {
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        Self {
            api,
            tickers: TickerFactory::new(Arc::clone(&clock), tick_interval, ticks_tx),
            clock,
            order: Vec::new(),
            cards: HashMap::new(),
            state: PanelState::new(),
            ticks_rx,
            show_help: false,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Cards in snapshot order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Current display text of a timer's card
    pub fn display_of(&self, id: &str) -> Option<String> {
        let now = self.clock.now();
        self.cards.get(id).map(|card| card.display_at(now))
    }

    /// Fetch the full timer list and apply it like a snapshot
    pub async fn load(&mut self) {
        match self.api.list().await {
            Ok(timers) => {
                info!("Loaded {} timers", timers.len());
                self.apply_snapshot(timers);
                self.state.record_success("load");
            }
            Err(e) => self.state.show_error(&e),
        }
    }

    /// Replace the card list with an authoritative snapshot
    pub fn apply_snapshot(&mut self, timers: Vec<Timer>) {
        let now = self.clock.now();
        let mut order = Vec::with_capacity(timers.len());
        let mut seen = HashSet::with_capacity(timers.len());

        for timer in timers {
            if !timer.status.is_visible() {
                continue;
            }
            if !seen.insert(timer.id.clone()) {
                debug!("Duplicate timer {} in snapshot", timer.id);
                continue;
            }

            let id = timer.id.clone();
            match self.cards.get_mut(&id) {
                Some(card) => card.update(timer, now, &mut self.tickers),
                None => {
                    debug!("Mounting card for {}", id);
                    let card = Card::mount(timer, now, &mut self.tickers);
                    self.cards.insert(id.clone(), card);
                }
            }
            order.push(id);
        }

        self.cards.retain(|id, _| {
            let keep = seen.contains(id);
            if !keep {
                debug!("Unmounting card for {}", id);
            }
            keep
        });
        self.order = order;

        if let Some(id) = &self.state.pending_delete {
            if !self.cards.contains_key(id) {
                self.state.pending_delete = None;
            }
        }
        self.state.mark_snapshot();
    }

    /// Show an error that did not come from a command
    pub fn show_error(&mut self, error: &PanelError) {
        self.state.show_error(error);
    }

    /// Wait for the next redraw notification from a card ticker
    pub async fn next_tick(&mut self) -> Option<CardTick> {
        self.ticks_rx.recv().await
    }

    /// Whether a tick belongs to a mounted card and warrants a redraw
    pub fn accept_tick(&self, tick: &CardTick) -> bool {
        self.cards
            .get(&tick.timer_id)
            .is_some_and(|card| card.accepts(tick))
    }

    /// Parse and run one input line
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        match line.parse::<Command>() {
            Ok(command) => self.handle(command).await,
            Err(usage) => {
                self.state.show_error(&PanelError::validation(usage));
                Flow::Continue
            }
        }
    }

    pub async fn handle(&mut self, command: Command) -> Flow {
        if let Some(id) = self.state.pending_delete.take() {
            match command {
                Command::Confirm => {
                    self.delete(&id).await;
                    return Flow::Continue;
                }
                Command::Cancel => {
                    info!("Delete of {} cancelled", id);
                    return Flow::Continue;
                }
                _ => info!("Delete of {} cancelled", id),
            }
        }

        match command {
            Command::Create { name, minutes, seconds } => {
                self.state.draft = CreationDraft::new(name, minutes, seconds);
                self.create().await;
            }
            Command::Adjust { card, delta } => self.adjust(&card, delta).await,
            Command::Restart(card) => self.restart(&card).await,
            Command::Delete(card) => self.request_delete(&card),
            Command::Confirm => {
                self.state
                    .show_error(&PanelError::validation("Nothing to confirm"));
            }
            Command::Cancel => {}
            Command::Refresh => self.load().await,
            Command::Dismiss => self.state.clear_error(),
            Command::Help => self.show_help = !self.show_help,
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    async fn create(&mut self) {
        let draft = self.state.draft.clone();
        if let Err(e) = draft.validate() {
            self.state.show_error(&e);
            return;
        }

        match self
            .api
            .create(draft.trimmed_name(), draft.minutes, draft.seconds)
            .await
        {
            Ok(timer) => {
                debug!("Created {} ({}s)", timer.id, timer.total_seconds);
                self.state.draft.reset();
                self.state.record_success("create");
            }
            Err(e) => self.state.show_error(&e),
        }
    }

    async fn adjust(&mut self, card: &CardRef, delta: i32) {
        let result = self
            .resolve_with_status(card, &[TimerStatus::Active], "Only active timers can be adjusted")
            .and_then(|id| {
                if delta == 0 || !(-MAX_ADJUST_SECONDS..=MAX_ADJUST_SECONDS).contains(&delta) {
                    Err(PanelError::validation(format!(
                        "Adjustment must be between -{0} and {0} seconds, and not 0",
                        MAX_ADJUST_SECONDS
                    )))
                } else {
                    Ok(id)
                }
            });

        let outcome = match result {
            Ok(id) => self.api.adjust(&id, delta).await,
            Err(e) => Err(e),
        };
        self.settle("adjust", outcome);
    }

    async fn restart(&mut self, card: &CardRef) {
        let outcome = match self.resolve_with_status(
            card,
            &[TimerStatus::Completed, TimerStatus::Error],
            "Only finished timers can be restarted",
        ) {
            Ok(id) => self.api.restart(&id).await,
            Err(e) => Err(e),
        };
        self.settle("restart", outcome);
    }

    fn request_delete(&mut self, card: &CardRef) {
        match self.resolve(card) {
            Ok(id) => {
                debug!("Awaiting delete confirmation for {}", id);
                self.state.pending_delete = Some(id);
            }
            Err(e) => self.state.show_error(&e),
        }
    }

    async fn delete(&mut self, id: &str) {
        let outcome = self.api.delete(id).await;
        self.settle("delete", outcome);
    }

    fn settle(&mut self, action: &str, outcome: Result<()>) {
        match outcome {
            Ok(()) => self.state.record_success(action),
            Err(e) => self.state.show_error(&e),
        }
    }

    fn resolve(&self, card: &CardRef) -> Result<String> {
        let id = match card {
            CardRef::Index(index) => index
                .checked_sub(1)
                .and_then(|i| self.order.get(i))
                .cloned(),
            CardRef::Id(id) => self.cards.contains_key(id).then(|| id.clone()),
        };
        id.ok_or_else(|| {
            let label = match card {
                CardRef::Index(index) => index.to_string(),
                CardRef::Id(id) => id.clone(),
            };
            PanelError::validation(format!("No timer '{}'", label))
        })
    }

    fn resolve_with_status(
        &self,
        card: &CardRef,
        allowed: &[TimerStatus],
        message: &str,
    ) -> Result<String> {
        let id = self.resolve(card)?;
        let status = self.cards.get(&id).map(Card::status);
        match status {
            Some(status) if allowed.contains(&status) => Ok(id),
            _ => Err(PanelError::validation(message)),
        }
    }

    /// Render the whole panel as text
    pub fn render(&self) -> String {
        let now = self.clock.now();
        let mut out = String::new();

        let updated = self
            .state
            .last_snapshot_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        let _ = writeln!(
            out,
            "Refill Timers · {} timer(s) · updated {}",
            self.order.len(),
            updated
        );
        let _ = writeln!(out, "{}", "-".repeat(64));

        if self.order.is_empty() {
            let _ = writeln!(out, "  No timers. Create one with: new <min> <sec> <name>");
        }
        for (position, card) in self.cards().enumerate() {
            let timer = card.timer();
            let _ = writeln!(
                out,
                "{:>3}. {:<24} {:>7}  {:<9}  {}",
                position + 1,
                timer.name,
                card.display_at(now),
                timer.status.as_str(),
                card.controls()
            );
        }
        let _ = writeln!(out, "{}", "-".repeat(64));

        if let Some(error) = &self.state.error {
            let _ = writeln!(out, "! {}  (dismiss to clear)", error);
        }
        if let Some(id) = &self.state.pending_delete {
            let name = self
                .cards
                .get(id)
                .map(|card| card.timer().name.as_str())
                .unwrap_or(id.as_str());
            let _ = writeln!(out, "? Delete \"{}\"? [y/N]", name);
        }
        if self.show_help {
            for usage in USAGE.split(" | ") {
                let _ = writeln!(out, "  {}", usage);
            }
        } else {
            let _ = writeln!(out, "  help for commands");
        }
        out
    }
}
