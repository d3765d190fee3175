//! Persistent WebSocket client for state snapshots

use std::{
    future::Future,
    sync::{Arc, Mutex},
};

use futures::StreamExt;
use tokio::{net::TcpStream, task::JoinHandle, time::sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::{backoff::Backoff, frame::parse_frame};
use crate::{error::PanelError, state::Timer};

type MessageHandler = Box<dyn Fn(&[Timer]) + Send + Sync>;
type Handlers = Arc<Mutex<Vec<MessageHandler>>>;

/// Receive-only WebSocket client.
///
/// One background task owns the socket and runs the connect → read →
/// back off → reconnect cycle, so at most one reconnect is ever pending.
pub struct TransportClient {
    endpoint: String,
    handlers: Handlers,
    backoff: Backoff,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TransportClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            handlers: Arc::new(Mutex::new(Vec::new())),
            backoff: Backoff::default(),
            task: Mutex::new(None),
        }
    }

    /// Replace the default 1s..30s reconnect policy
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Register a callback for every state update. Callbacks run in
    /// registration order with the full timer list.
    pub fn on_message<F>(&self, handler: F)
    where
        F: Fn(&[Timer]) + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        handlers.push(Box::new(handler));
    }

    /// Start the connection loop. No-op while a loop is already running.
    pub fn connect(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            debug!("Transport already running for {}", self.endpoint);
            return;
        }

        info!("Starting transport for {}", self.endpoint);
        *task = Some(tokio::spawn(connection_loop(
            self.endpoint.clone(),
            Arc::clone(&self.handlers),
            self.backoff.clone(),
        )));
    }

    /// Close the connection and cancel any pending reconnect
    pub fn disconnect(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = task.take() {
            handle.abort();
            info!("Transport disconnected from {}", self.endpoint);
        }
    }

    pub fn is_running(&self) -> bool {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        task.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TransportClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// How one connection attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    /// Never connected
    Refused,
    /// Connected, then lost the connection
    Dropped,
}

async fn connection_loop(endpoint: String, handlers: Handlers, backoff: Backoff) {
    let target = endpoint.clone();
    supervise(&endpoint, backoff, move || {
        let endpoint = target.clone();
        let handlers = Arc::clone(&handlers);
        async move { run_session(&endpoint, &handlers).await }
    })
    .await
}

/// Run attempts forever, sleeping per `backoff` in between
async fn supervise<F, Fut>(endpoint: &str, mut backoff: Backoff, mut attempt: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt>,
{
    let mut failures: u32 = 0;

    loop {
        if attempt().await == Attempt::Dropped {
            backoff.reset();
            failures = 0;
        }

        failures += 1;
        let delay = backoff.next_delay();
        info!(
            "Reconnecting to {} in {:?} (attempt {})",
            endpoint, delay, failures
        );
        sleep(delay).await;
    }
}

async fn run_session(endpoint: &str, handlers: &Handlers) -> Attempt {
    match connect_async(endpoint).await {
        Ok((stream, _)) => {
            info!("WebSocket connected: {}", endpoint);
            let err = read_frames(stream, handlers).await;
            warn!("{} ({})", err, err.error_code());
            Attempt::Dropped
        }
        Err(e) => {
            let err = PanelError::connection(e.to_string());
            warn!("WebSocket connect to {} failed: {}", endpoint, err);
            Attempt::Refused
        }
    }
}

/// Read until the connection ends; the returned error says why
async fn read_frames(
    mut stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    handlers: &Handlers,
) -> PanelError {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => handle_text(&text, handlers),
            Ok(Message::Close(frame)) => {
                let reason = frame
                    .map(|f| format!("{} {}", u16::from(f.code), f.reason))
                    .unwrap_or_else(|| "no close frame".to_string());
                return PanelError::connection(format!("closed by server: {}", reason));
            }
            Ok(Message::Binary(_)) => debug!("Ignoring binary frame"),
            Ok(_) => {}
            Err(e) => return PanelError::connection(e.to_string()),
        }
    }
    PanelError::connection("stream ended")
}

fn handle_text(text: &str, handlers: &Handlers) {
    match parse_frame(text) {
        Ok(Some(timers)) => {
            debug!("State update with {} timers", timers.len());
            dispatch(handlers, &timers);
        }
        Ok(None) => debug!("Ignoring frame: {}", text),
        Err(e) => warn!("{} ({})", e, e.error_code()),
    }
}

fn dispatch(handlers: &Handlers, timers: &[Timer]) {
    let handlers = handlers.lock().unwrap_or_else(|e| e.into_inner());
    for handler in handlers.iter() {
        handler(timers);
    }
}
