//! HTTP + WebSocket API for Midnight Dial
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /catalog - The nine dial symbols
//! - POST /evaluate - Stateless answer for a glyph list
//! - POST /session/new - Create session
//! - GET /session/:id - Session status
//! - POST /session/:id/dial - Start a stroke
//! - POST /session/:id/reset - Hang up
//! - WS /ws/:id - Live updates

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::config::DialConfig;
use crate::core::{DialDriver, ResponseEvaluator};
use crate::error::DialError;
use crate::types::{DialOutput, Evaluation, Symbol, CATALOG};

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, DialDriver>>,
    pub config: DialConfig,
    /// Hands each session and evaluation its own seed offset
    pub streams: AtomicU64,
}

impl AppState {
    fn next_config(&self) -> DialConfig {
        self.config.for_stream(self.streams.fetch_add(1, Ordering::Relaxed))
    }
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub status: DialOutput,
}

/// Dial request: glyph, slot number or label
#[derive(Debug, Deserialize)]
pub struct DialRequest {
    pub symbol: String,
}

/// Stroke accepted
#[derive(Debug, Serialize)]
pub struct DialResponse {
    pub session_id: String,
    pub stroke_id: u64,
    pub glyph: String,
    pub slot: usize,
    pub rotation_deg: f64,
    /// When the symbol lands in the session
    pub time_to_stop_ms: u64,
    /// When the dial takes input again
    pub stroke_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub glyphs: Vec<String>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for DialError {
    fn into_response(self) -> Response {
        let status = match &self {
            DialError::UnknownSymbol(_) => StatusCode::BAD_REQUEST,
            DialError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            DialError::InputLocked(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the API router
pub fn create_router(config: DialConfig) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        config,
        streams: AtomicU64::new(0),
    });

    Router::new()
        .route("/health", get(health))
        .route("/catalog", get(catalog))
        .route("/evaluate", post(evaluate))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/dial", post(dial))
        .route("/session/:id/reset", post(reset_session))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

async fn catalog() -> Json<&'static [Symbol]> {
    Json(&CATALOG[..])
}

/// Answer a line without a session
async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> Json<Evaluation> {
    let mut rng = state.next_config().rng();
    Json(ResponseEvaluator::new().evaluate(&req.glyphs, &mut rng))
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NewSessionResponse>, DialError> {
    let session_id = generate_session_id();
    let driver = DialDriver::from_config(state.next_config())?;

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), driver);
    info!(session = %session_id, "session created");

    Ok(Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    }))
}

async fn find_session(state: &AppState, id: &str) -> Result<DialDriver, DialError> {
    let sessions = state.sessions.read().await;
    sessions
        .get(id)
        .cloned()
        .ok_or_else(|| DialError::SessionNotFound(id.to_string()))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, DialError> {
    let driver = find_session(&state, &id).await?;
    let status = driver.snapshot().await;
    Ok(Json(SessionStatusResponse {
        session_id: id,
        status,
    }))
}

/// Start a stroke; the symbol lands after `time_to_stop_ms`
async fn dial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<DialRequest>,
) -> Result<(StatusCode, Json<DialResponse>), DialError> {
    let driver = find_session(&state, &id).await?;
    let symbol =
        Symbol::resolve(&req.symbol).ok_or_else(|| DialError::UnknownSymbol(req.symbol.clone()))?;

    let started = driver.dial(symbol).await.map_err(|reason| {
        debug!(session = %id, reason = reason.code(), "dial refused");
        DialError::InputLocked(reason)
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(DialResponse {
            session_id: id,
            stroke_id: started.ticket.id,
            glyph: symbol.glyph.to_string(),
            slot: symbol.slot,
            rotation_deg: started.plan.rotation_deg,
            time_to_stop_ms: started.plan.time_to_stop().as_millis() as u64,
            stroke_ms: started.plan.total().as_millis() as u64,
        }),
    ))
}

/// Hang up
async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, DialError> {
    let driver = find_session(&state, &id).await?;
    let status = driver.reset().await;
    Ok(Json(SessionStatusResponse {
        session_id: id,
        status,
    }))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, DialError> {
    let driver = find_session(&state, &id).await?;
    let rx = driver.subscribe();
    let initial = driver.snapshot().await;

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, initial, rx).await;
    }))
}

/// Handle WebSocket connection
async fn handle_websocket(
    socket: WebSocket,
    initial: DialOutput,
    mut rx: broadcast::Receiver<DialOutput>,
) {
    let (mut sender, mut receiver) = socket.split();

    let json = serde_json::to_string(&initial).unwrap_or_default();
    if sender.send(Message::Text(json)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(update) => {
                    let json = serde_json::to_string(&update).unwrap_or_default();
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "websocket client lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

/// Generate session ID
fn generate_session_id() -> String {
    format!("dial_{:016x}", rand::random::<u64>())
}

/// Run the API server
pub async fn run_server(addr: &str, config: DialConfig) -> std::io::Result<()> {
    let router = create_router(config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "midnight dial API listening");
    println!("☎️  Midnight Dial API running on {}", addr);
    println!("  GET  /health             - Health check");
    println!("  GET  /catalog            - Dial symbols");
    println!("  POST /evaluate           - Answer a glyph list");
    println!("  POST /session/new        - Create session");
    println!("  GET  /session/:id        - Get status");
    println!("  POST /session/:id/dial   - Dial a symbol");
    println!("  POST /session/:id/reset  - Hang up");
    println!("  WS   /ws/:id             - Live updates");
    axum::serve(listener, router).await
}
