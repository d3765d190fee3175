//! In-process stand-in for the refill timer server

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, task::JoinHandle};

use refill_panel::{
    api::{AdjustTimerRequest, CreateTimerRequest, HealthResponse},
    state::{Timer, TimerStatus},
};

pub const ROOT_PATH: &str = "/tools/wos/refill-bot-en";

#[derive(Default)]
pub struct MockState {
    pub timers: Mutex<Vec<Timer>>,
    /// One entry per request, e.g. `"PATCH a -1"`
    pub requests: Mutex<Vec<String>>,
    /// Frames to send, one script per WebSocket connection. A connection
    /// closes after its script unless it used the last one.
    pub ws_scripts: Mutex<VecDeque<Vec<String>>>,
    pub connections: AtomicUsize,
}

impl MockState {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start(timers: Vec<Timer>, ws_scripts: Vec<Vec<String>>) -> Self {
        let state = Arc::new(MockState {
            timers: Mutex::new(timers),
            ws_scripts: Mutex::new(ws_scripts.into()),
            ..Default::default()
        });

        let api = Router::new()
            .route("/timers", get(list_timers).post(create_timer))
            .route("/timers/:id", patch(adjust_timer).delete(delete_timer))
            .route("/timers/:id/restart", post(restart_timer))
            .route("/health", get(health));
        let app = Router::new()
            .nest(&format!("{}/api", ROOT_PATH), api)
            .route(&format!("{}/ws", ROOT_PATH), get(ws_upgrade))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state, handle }
    }

    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api_base(&self) -> String {
        format!("{}{}/api", self.origin(), ROOT_PATH)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}{}/ws", self.addr, ROOT_PATH)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn state_update(timers: &[Timer]) -> String {
    json!({ "type": "state_update", "timers": timers }).to_string()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Timer does not exist" })),
    )
        .into_response()
}

async fn list_timers(State(state): State<Arc<MockState>>) -> Json<Vec<Timer>> {
    state.record("GET /timers".to_string());
    Json(state.timers.lock().unwrap().clone())
}

async fn create_timer(
    State(state): State<Arc<MockState>>,
    Json(body): Json<CreateTimerRequest>,
) -> Response {
    state.record(format!("POST {} {} {}", body.name, body.minutes, body.seconds));

    if body.name == "boom" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }
    let total = (body.minutes * 60 + body.seconds) as i64;
    if total == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Time cannot be 0" })),
        )
            .into_response();
    }

    let mut timers = state.timers.lock().unwrap();
    let timer = Timer::active(format!("timer_{}", timers.len() + 1), body.name, total);
    timers.push(timer.clone());
    (StatusCode::CREATED, Json(timer)).into_response()
}

async fn adjust_timer(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Json(body): Json<AdjustTimerRequest>,
) -> Response {
    state.record(format!("PATCH {} {}", id, body.adjust_seconds));

    let mut timers = state.timers.lock().unwrap();
    let Some(timer) = timers.iter_mut().find(|t| t.id == id) else {
        return not_found();
    };
    if timer.status != TimerStatus::Active {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Timer has finished" })),
        )
            .into_response();
    }
    timer.remaining_seconds += body.adjust_seconds as i64;
    timer.total_seconds += body.adjust_seconds as i64;
    Json(json!({ "message": "Adjusted", "remaining": timer.remaining_seconds })).into_response()
}

async fn restart_timer(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.record(format!("RESTART {}", id));

    let mut timers = state.timers.lock().unwrap();
    let Some(timer) = timers.iter_mut().find(|t| t.id == id) else {
        return not_found();
    };
    timer.remaining_seconds = timer.total_seconds;
    timer.status = TimerStatus::Active;
    Json(json!({ "message": "Restarted", "remaining": timer.total_seconds })).into_response()
}

async fn delete_timer(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.record(format!("DELETE {}", id));

    let mut timers = state.timers.lock().unwrap();
    let before = timers.len();
    timers.retain(|t| t.id != id);
    if timers.len() == before {
        return not_found();
    }
    Json(json!({ "message": "Deleted" })).into_response()
}

async fn health(State(state): State<Arc<MockState>>) -> Json<HealthResponse> {
    let timers = state.timers.lock().unwrap();
    Json(HealthResponse {
        status: "healthy".to_string(),
        active_timers: timers.iter().filter(|t| t.is_active()).count() as u32,
        total_timers: timers.len() as u32,
    })
}

async fn ws_upgrade(State(state): State<Arc<MockState>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

async fn serve_socket(mut socket: WebSocket, state: Arc<MockState>) {
    state.connections.fetch_add(1, Ordering::SeqCst);

    let (script, last) = {
        let mut scripts = state.ws_scripts.lock().unwrap();
        let script = scripts.pop_front().unwrap_or_default();
        (script, scripts.is_empty())
    };

    for frame in script {
        if socket.send(Message::Text(frame)).await.is_err() {
            return;
        }
    }

    if last {
        // hold the connection until the client goes away
        while let Some(Ok(_)) = socket.recv().await {}
    } else {
        let _ = socket.send(Message::Close(None)).await;
    }
}
