use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use refill_panel::{
    api::TimerApi,
    error::Result,
    state::{Clock, CreationDraft, ManualClock, Timer, TimerStatus},
    view::{Flow, LineInput, PanelView},
    PanelError,
};

/// Records calls; fails every call while `failure` is set
#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
    timers: Mutex<Vec<Timer>>,
}

impl FakeApi {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn fail_with(&self, message: Option<&str>) {
        *self.failure.lock().unwrap() = message.map(str::to_string);
    }

    fn call(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(PanelError::network(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TimerApi for FakeApi {
    async fn list(&self) -> Result<Vec<Timer>> {
        self.call("list".to_string())?;
        Ok(self.timers.lock().unwrap().clone())
    }

    async fn create(&self, name: &str, minutes: u32, seconds: u32) -> Result<Timer> {
        self.call(format!("create {} {} {}", name, minutes, seconds))?;
        Ok(Timer::active("new", name, (minutes * 60 + seconds) as i64))
    }

    async fn adjust(&self, id: &str, delta_seconds: i32) -> Result<()> {
        self.call(format!("adjust {} {}", id, delta_seconds))
    }

    async fn restart(&self, id: &str) -> Result<()> {
        self.call(format!("restart {}", id))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.call(format!("delete {}", id))
    }
}

fn panel() -> (PanelView<FakeApi>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let view = PanelView::new(
        FakeApi::default(),
        clock.clone(),
        Duration::from_millis(250),
    );
    (view, clock)
}

fn completed(id: &str, name: &str) -> Timer {
    Timer::active(id, name, 0).with_status(TimerStatus::Completed)
}

#[tokio::test]
async fn countdown_follows_snapshots_end_to_end() {
    let (mut view, clock) = panel();

    view.apply_snapshot(vec![Timer::active("a", "Tank A", 125)]);
    assert_eq!(view.display_of("a").as_deref(), Some("02:05"));
    assert!(view.render().contains("02:05"));

    clock.advance(Duration::from_secs(30));
    assert_eq!(view.display_of("a").as_deref(), Some("01:35"));

    view.apply_snapshot(vec![Timer::active("a", "Tank A", 10)]);
    assert_eq!(view.display_of("a").as_deref(), Some("10"));
}

#[tokio::test]
async fn snapshot_value_is_shown_immediately() {
    let (mut view, clock) = panel();
    for remaining in [300, 61, 60, 5, 0, -4] {
        clock.advance(Duration::from_millis(1700));
        view.apply_snapshot(vec![Timer::active("a", "Tank A", remaining)]);
        let countdown = view.card("a").unwrap().countdown();
        assert_eq!(countdown.remaining_at(clock.now()), remaining.max(0));
    }
}

#[tokio::test]
async fn identical_snapshot_does_not_jump() {
    let (mut view, _clock) = panel();
    let snapshot = vec![Timer::active("a", "Tank A", 45)];

    // skip the header, it carries the wall-clock time
    let body = |frame: String| frame.lines().skip(1).collect::<Vec<_>>().join("\n");

    view.apply_snapshot(snapshot.clone());
    let first = body(view.render());
    view.apply_snapshot(snapshot);
    assert_eq!(view.display_of("a").as_deref(), Some("45"));
    assert_eq!(body(view.render()), first);
}

#[tokio::test]
async fn deleted_timers_never_render() {
    let (mut view, _clock) = panel();
    view.apply_snapshot(vec![
        Timer::active("a", "Tank A", 90),
        Timer::active("b", "Ghost", 30).with_status(TimerStatus::Deleted),
    ]);

    assert_eq!(view.cards().count(), 1);
    assert!(view.card("b").is_none());
    assert!(!view.render().contains("Ghost"));
}

#[tokio::test]
async fn vanished_timer_is_unmounted() {
    let (mut view, _clock) = panel();
    view.apply_snapshot(vec![
        Timer::active("a", "Tank A", 90),
        Timer::active("b", "Tank B", 30),
    ]);
    view.apply_snapshot(vec![Timer::active("a", "Tank A", 89)]);

    assert!(view.card("b").is_none());
    assert_eq!(view.cards().count(), 1);
}

#[tokio::test]
async fn completed_timer_shows_sentinel_without_ticking() {
    let (mut view, clock) = panel();
    view.apply_snapshot(vec![Timer::active("a", "Tank A", 3)]);
    assert!(view.card("a").unwrap().is_ticking());

    view.apply_snapshot(vec![completed("a", "Tank A")]);
    clock.advance(Duration::from_secs(10));
    let card = view.card("a").unwrap();
    assert!(!card.is_ticking());
    assert_eq!(view.display_of("a").as_deref(), Some("REFILL"));
    assert!(view.render().contains("[restart] [delete]"));
}

#[tokio::test]
async fn invalid_drafts_never_reach_the_network() {
    let (mut view, _clock) = panel();

    view.handle_line("new 1 0    ").await;
    assert!(view.state().error.is_some());

    view.handle_line("new 0 0 Tank A").await;
    assert_eq!(view.state().error.as_deref(), Some("Time cannot be 0"));

    assert!(view.api().calls().is_empty());
}

#[tokio::test]
async fn successful_create_resets_draft_and_clears_error() {
    let (mut view, _clock) = panel();
    view.handle_line("bogus").await;
    assert!(view.state().error.is_some());

    view.handle_line("new 2 5   Tank A  ").await;
    assert_eq!(view.api().calls(), vec!["create Tank A 2 5"]);
    assert_eq!(view.state().error, None);
    assert_eq!(view.state().draft, CreationDraft::default());
    // the card only appears with the next snapshot
    assert_eq!(view.cards().count(), 0);
}

#[tokio::test]
async fn failed_create_keeps_the_draft() {
    let (mut view, _clock) = panel();
    view.api().fail_with(Some("Maximum active timers limit reached (6)"));

    view.handle_line("new 1:30 Tank A").await;
    assert_eq!(
        view.state().error.as_deref(),
        Some("Maximum active timers limit reached (6)")
    );
    assert_eq!(view.state().draft, CreationDraft::new("Tank A", 1, 30));
}

#[tokio::test]
async fn delete_waits_for_confirmation() {
    let (mut view, _clock) = panel();
    view.apply_snapshot(vec![Timer::active("a", "Tank A", 90)]);

    view.handle_line("delete 1").await;
    assert!(view.api().calls().is_empty());
    assert!(view.render().contains("Delete \"Tank A\"? [y/N]"));

    view.handle_line("n").await;
    assert!(view.api().calls().is_empty());
    assert_eq!(view.state().pending_delete, None);

    view.handle_line("delete a").await;
    view.handle_line("y").await;
    assert_eq!(view.api().calls(), vec!["delete a"]);
}

#[tokio::test]
async fn other_input_cancels_pending_delete() {
    let (mut view, _clock) = panel();
    view.apply_snapshot(vec![Timer::active("a", "Tank A", 90)]);

    view.handle_line("delete 1").await;
    view.handle_line("+ 1").await;
    view.handle_line("y").await;
    assert_eq!(view.api().calls(), vec!["adjust a 1"]);
    assert_eq!(view.state().error.as_deref(), Some("Nothing to confirm"));
}

#[tokio::test]
async fn controls_depend_on_status() {
    let (mut view, _clock) = panel();
    view.apply_snapshot(vec![
        Timer::active("a", "Tank A", 90),
        completed("b", "Tank B"),
    ]);

    view.handle_line("restart 1").await;
    assert_eq!(
        view.state().error.as_deref(),
        Some("Only finished timers can be restarted")
    );
    view.handle_line("- 2").await;
    assert_eq!(
        view.state().error.as_deref(),
        Some("Only active timers can be adjusted")
    );
    assert!(view.api().calls().is_empty());

    view.handle_line("- 1").await;
    view.handle_line("restart 2").await;
    assert_eq!(view.api().calls(), vec!["adjust a -1", "restart b"]);
    assert_eq!(view.state().error, None);
}

#[tokio::test]
async fn cards_are_addressed_in_snapshot_order() {
    let (mut view, _clock) = panel();
    view.apply_snapshot(vec![
        Timer::active("b", "Tank B", 30),
        Timer::active("a", "Tank A", 90),
    ]);

    view.handle_line("+ 1").await;
    view.handle_line("adjust 2 -15").await;
    view.handle_line("+ 3").await;
    assert_eq!(view.api().calls(), vec!["adjust b 1", "adjust a -15"]);
    assert_eq!(view.state().error.as_deref(), Some("No timer '3'"));
}

#[tokio::test]
async fn adjustment_range_is_checked_locally() {
    let (mut view, _clock) = panel();
    view.apply_snapshot(vec![Timer::active("a", "Tank A", 90)]);

    for line in ["adjust 1 61", "adjust 1 -61", "adjust 1 0", "adjust 1 -2147483648"] {
        view.handle_line("dismiss").await;
        assert_eq!(view.handle_line(line).await, Flow::Continue);
        assert!(view.state().error.is_some(), "{} was accepted", line);
    }
    assert!(view.api().calls().is_empty());

    view.handle_line("adjust 1 -60").await;
    assert_eq!(view.api().calls(), vec!["adjust a -60"]);
}

#[tokio::test]
async fn failures_replace_each_other_and_success_clears() {
    let (mut view, _clock) = panel();
    view.apply_snapshot(vec![Timer::active("a", "Tank A", 90)]);

    view.api().fail_with(Some("Failed to adjust timer (HTTP 502)"));
    view.handle_line("+ 1").await;
    view.api().fail_with(Some("Timer has finished"));
    view.handle_line("- 1").await;
    assert_eq!(view.state().error.as_deref(), Some("Timer has finished"));
    assert_eq!(view.render().matches("! ").count(), 1);

    view.api().fail_with(None);
    view.handle_line("- 1").await;
    assert_eq!(view.state().error, None);
}

#[tokio::test]
async fn dismiss_clears_the_error() {
    let (mut view, _clock) = panel();
    view.handle_line("restart 9").await;
    assert!(view.state().error.is_some());
    view.handle_line("dismiss").await;
    assert_eq!(view.state().error, None);
}

#[tokio::test]
async fn load_applies_server_state() {
    let (mut view, _clock) = panel();
    *view.api().timers.lock().unwrap() = vec![Timer::active("a", "Tank A", 61)];

    view.api().fail_with(Some("Failed to load timers (HTTP 503)"));
    view.load().await;
    assert!(view.state().error.is_some());
    assert_eq!(view.cards().count(), 0);

    view.api().fail_with(None);
    assert_eq!(view.handle_line("refresh").await, Flow::Continue);
    assert_eq!(view.state().error, None);
    assert_eq!(view.display_of("a").as_deref(), Some("01:01"));
}

#[tokio::test]
async fn quit_ends_the_loop() {
    let (mut view, _clock) = panel();
    assert_eq!(view.handle_line("quit").await, Flow::Quit);
    assert_eq!(view.handle_line("").await, Flow::Continue);
}

#[tokio::test]
async fn undecodable_input_is_reported_and_reading_continues() {
    let (mut view, _clock) = panel();
    view.apply_snapshot(vec![Timer::active("a", "Tank A", 90)]);
    let mut input = LineInput::new(&b"\xff\xfe\n+ 1\n"[..]);

    let garbled = input.next_line().await.unwrap().unwrap();
    assert_eq!(view.handle_line(&garbled).await, Flow::Continue);
    assert!(view.state().error.is_some());

    let next = input.next_line().await.unwrap().unwrap();
    assert_eq!(view.handle_line(&next).await, Flow::Continue);
    assert_eq!(view.api().calls(), vec!["adjust a 1"]);
    assert_eq!(view.state().error, None);
}
