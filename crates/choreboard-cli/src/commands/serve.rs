//! HTTP transport for the request surface.
//!
//! Handlers never touch the board. They forward the raw query string to the
//! control loop over a channel and wait for its reply, so every mutation is
//! serialized through [`ControlLoop::step`].

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use choreboard_core::api::Response;
use choreboard_core::runtime::{Inbound, Peripherals, RequestSource};
use choreboard_core::{Config, ControlLoop, JsonStore};
use serde_json::{json, Value};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use crate::host::{IdleInput, LogDisplay, LogSignal, Online, SystemClock};

/// Pending requests allowed to queue before handlers wait.
const QUEUE_DEPTH: usize = 64;

/// Requests queued by HTTP handlers, drained by the control loop.
struct ChannelRequests(mpsc::Receiver<Inbound>);

impl RequestSource for ChannelRequests {
    fn poll(&mut self) -> Option<Inbound> {
        self.0.try_recv().ok()
    }
}

pub fn run(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = JsonStore::open()?;
    let addr: SocketAddr = format!("{}:{}", config.server.bind, port.unwrap_or(config.server.port)).parse()?;

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(serve(config, store, addr))
}

async fn serve(config: Config, store: JsonStore, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
    let app = build_router(tx);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("choreboard listening on http://{}", listener.local_addr()?);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .into_future();

    tokio::select! {
        result = server => result?,
        () = drive(config, store, rx) => {}
    }
    Ok(())
}

fn build_router(tx: mpsc::Sender<Inbound>) -> Router {
    Router::new()
        .route("/", get(handle_request))
        .route("/api", get(handle_request))
        .with_state(tx)
}

async fn handle_request(
    State(tx): State<mpsc::Sender<Inbound>>,
    RawQuery(query): RawQuery,
) -> (StatusCode, Json<Value>) {
    let (reply_tx, reply_rx) = oneshot::channel::<Response>();
    let inbound = Inbound {
        query: query.unwrap_or_default(),
        reply: Box::new(move |response: Response| {
            let _ = reply_tx.send(response);
        }),
    };

    if tx.send(inbound).await.is_err() {
        return unavailable();
    }
    match reply_rx.await {
        Ok(response) => (
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(response.body),
        ),
        Err(_) => unavailable(),
    }
}

fn unavailable() -> (StatusCode, Json<Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": "control loop stopped" })),
    )
}

/// Run the control loop on the configured poll interval. Never returns.
async fn drive(config: Config, store: JsonStore, rx: mpsc::Receiver<Inbound>) {
    let mut control = ControlLoop::new(&config, store);
    let mut display = LogDisplay;
    let mut signal = LogSignal;
    let mut input = IdleInput::centered(&config.input);
    let mut clock = SystemClock::new();
    let network = Online;
    let mut requests = ChannelRequests(rx);

    let mut interval = tokio::time::interval(Duration::from_millis(config.timers.poll_interval_ms.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let mut io = Peripherals {
            display: &mut display,
            signal: &mut signal,
            input: &mut input,
            clock: &mut clock,
            network: &network,
            requests: &mut requests,
        };
        control.step(&mut io);
    }
}
