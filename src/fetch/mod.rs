//! Stock fetch lifecycle.
//!
//! [`StockFetchController`] owns a single [`FetchState`] cell and moves it
//! through `Idle → Loading → Success | Error` as requests are initiated and
//! resolved. Every initiation is tagged with a sequence number; a response
//! whose sequence is no longer the latest is discarded, so the most recently
//! initiated request always wins regardless of resolution order.
//!
//! Data arrives through the [`StockSource`] and [`UsageSource`] traits;
//! [`http::HttpClient`] implements both against the backend.

pub mod http;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::StockmeterError;
use crate::models::stock::StockSnapshot;
use crate::models::usage::UsageSnapshot;
use crate::models::{ApiName, Period};
use crate::schema::StockSchema;

/// Shown when a payload fails [`StockSchema`] validation.
pub const INVALID_DATA_MESSAGE: &str = "Invalid data format received from API";

/// Shown when the backend answers with a non-success status.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch stock data";

/// Shown when a failure carries no usable message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Provider of raw stock payloads for a symbol and period.
///
/// The payload is returned unvalidated; the controller checks its shape.
pub trait StockSource: Send + Sync + 'static {
    fn fetch_stock(
        &self,
        symbol: &str,
        period: Period,
    ) -> impl Future<Output = crate::Result<Value>> + Send;
}

/// Provider of rate-limit usage counters per upstream API.
pub trait UsageSource: Send + Sync + 'static {
    fn fetch_usage(&self, api: ApiName)
    -> impl Future<Output = crate::Result<UsageSnapshot>> + Send;
}

/// Observable state of the stock fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(Arc<StockSnapshot>),
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// The fetched snapshot, if the last request succeeded.
    pub fn snapshot(&self) -> Option<&Arc<StockSnapshot>> {
        match self {
            FetchState::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// The failure message, if the last request failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Handle to an initiated fetch.
///
/// Dropping it does not cancel the request.
#[derive(Debug)]
pub struct FetchHandle {
    sequence: u64,
    task: JoinHandle<()>,
}

impl FetchHandle {
    /// Sequence number assigned at initiation; later fetches get larger numbers.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Waits until this request has resolved and its result was applied or discarded.
    pub async fn settled(self) {
        if let Err(e) = self.task.await {
            warn!(sequence = self.sequence, error = %e, "Fetch task did not complete");
        }
    }
}

/// Drives stock fetches and exposes their [`FetchState`].
pub struct StockFetchController<S> {
    source: Arc<S>,
    schema: StockSchema,
    state: Arc<watch::Sender<FetchState>>,
    /// Only read or written while the `state` channel's lock is held.
    latest: Arc<AtomicU64>,
    last_request: Mutex<Option<(String, Period)>>,
}

impl<S: StockSource> StockFetchController<S> {
    /// Creates an idle controller reading from `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_shared_source(Arc::new(source))
    }

    /// Creates an idle controller over a source shared with other consumers.
    #[must_use]
    pub fn with_shared_source(source: Arc<S>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            source,
            schema: StockSchema,
            state: Arc::new(state),
            latest: Arc::new(AtomicU64::new(0)),
            last_request: Mutex::new(None),
        }
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Starts fetching `symbol` over `period` and moves the state to `Loading`.
    ///
    /// The symbol is trimmed and upper-cased. Any fetch still in flight is
    /// superseded: its response will be ignored when it arrives.
    ///
    /// Must be called from within a tokio runtime.
    pub fn initiate_fetch(&self, symbol: &str, period: Period) -> FetchHandle {
        let symbol = normalize_symbol(symbol);
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((symbol.clone(), period));

        let mut sequence = 0;
        self.state.send_modify(|state| {
            sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = FetchState::Loading;
        });
        info!(sequence, symbol = %symbol, period = %period, "Fetching stock data");

        let task = tokio::spawn(resolve(
            Arc::clone(&self.source),
            self.schema,
            Arc::clone(&self.state),
            Arc::clone(&self.latest),
            sequence,
            symbol,
            period,
        ));

        FetchHandle { sequence, task }
    }

    /// Re-initiates the most recent symbol and period.
    ///
    /// Returns `None` if nothing has been fetched yet.
    pub fn retry(&self) -> Option<FetchHandle> {
        let (symbol, period) = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()?;
        Some(self.initiate_fetch(&symbol, period))
    }
}

/// Awaits the source, validates the payload, and applies the outcome if
/// `sequence` is still the latest initiated fetch.
async fn resolve<S: StockSource>(
    source: Arc<S>,
    schema: StockSchema,
    state: Arc<watch::Sender<FetchState>>,
    latest: Arc<AtomicU64>,
    sequence: u64,
    symbol: String,
    period: Period,
) {
    let outcome = match source.fetch_stock(&symbol, period).await {
        Ok(raw) => match schema.validate(&raw) {
            Ok(snapshot) => FetchState::Success(Arc::new(snapshot)),
            Err(violation) => {
                warn!(sequence, symbol = %symbol, error = %violation, "Rejected stock payload");
                FetchState::Error(INVALID_DATA_MESSAGE.to_string())
            }
        },
        Err(e) => {
            warn!(sequence, symbol = %symbol, error = %e, "Stock fetch failed");
            FetchState::Error(failure_message(&e))
        }
    };

    let applied = state.send_if_modified(|current| {
        if latest.load(Ordering::SeqCst) != sequence {
            return false;
        }
        *current = outcome;
        true
    });

    if applied {
        info!(sequence, symbol = %symbol, "Stock fetch resolved");
    } else {
        debug!(sequence, symbol = %symbol, "Discarded stale stock response");
    }
}

/// Extracts the user-facing message for a failed fetch.
fn failure_message(error: &StockmeterError) -> String {
    let message = match error {
        StockmeterError::Status { .. } => return FETCH_FAILED_MESSAGE.to_string(),
        StockmeterError::Schema(_) => return INVALID_DATA_MESSAGE.to_string(),
        StockmeterError::Config(message) => message.clone(),
        StockmeterError::Http(e) => e.to_string(),
        StockmeterError::Json(e) => e.to_string(),
    };

    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
