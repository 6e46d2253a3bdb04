//! Shared test utilities: scripted data sources and a one-shot HTTP server.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use stockmeter::fetch::{StockSource, UsageSource};
use stockmeter::models::usage::UsageSnapshot;
use stockmeter::models::{ApiName, Period};
use stockmeter::{Result, StockmeterError};

/// A stock source whose responses are released by the test, per symbol.
///
/// Each call to [`expect`](Self::expect) queues one pending response for
/// the symbol; the returned sender resolves it.
#[derive(Default)]
pub struct ScriptedSource {
    pending: Mutex<HashMap<String, VecDeque<oneshot::Receiver<Result<Value>>>>>,
    calls: Mutex<Vec<(String, Period)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&self, symbol: &str) -> oneshot::Sender<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<(String, Period)> {
        self.calls.lock().unwrap().clone()
    }
}

impl StockSource for ScriptedSource {
    async fn fetch_stock(&self, symbol: &str, period: Period) -> Result<Value> {
        self.calls.lock().unwrap().push((symbol.to_string(), period));
        let response = self
            .pending
            .lock()
            .unwrap()
            .get_mut(symbol)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("unexpected fetch for {symbol}"));
        response.await.expect("response sender dropped")
    }
}

/// A usage source answering from a fixed table; missing APIs fail.
#[derive(Default)]
pub struct StaticUsageSource {
    snapshots: HashMap<ApiName, UsageSnapshot>,
}

impl StaticUsageSource {
    pub fn with(mut self, api: ApiName, snapshot: UsageSnapshot) -> Self {
        self.snapshots.insert(api, snapshot);
        self
    }
}

impl UsageSource for StaticUsageSource {
    async fn fetch_usage(&self, api: ApiName) -> Result<UsageSnapshot> {
        self.snapshots
            .get(&api)
            .cloned()
            .ok_or(StockmeterError::Status { status: 500 })
    }
}

/// A well-formed stock payload with two bars.
pub fn stock_payload(current_price: f64) -> Value {
    json!({
        "prices": [
            {
                "timestamp": "2024-03-14 00:00:00",
                "open": 171.2, "high": 173.5, "low": 170.9, "close": 173.0,
                "volume": 52000000
            },
            {
                "timestamp": "2024-03-15 00:00:00",
                "open": 173.0, "high": 174.1, "low": 171.8, "close": current_price,
                "volume": 48500000
            }
        ],
        "current_price": current_price,
        "change_percent": 0.42
    })
}

/// Serves exactly one HTTP response and yields the request line it received.
///
/// Returns the base URL (`http://127.0.0.1:{port}/api`) and a handle that
/// resolves to the request line, e.g. `GET /api/stock/AAPL?period=1mo HTTP/1.1`.
pub async fn serve_once(status: u16, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (format!("http://{addr}/api"), handle)
}
