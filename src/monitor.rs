//! Periodic usage polling for the rate-limit cards.
//!
//! [`UsageMonitor`] belongs to the presentation side: it owns the polling
//! loop, pulls a [`UsageSnapshot`] per API on every tick of an injected
//! [`Ticker`], and classifies it against an injected [`Clock`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::fetch::UsageSource;
use crate::models::ApiName;
use crate::models::usage::UsageSnapshot;
use crate::schedule::{Clock, Ticker};
use crate::usage::{UsageClassification, classify};

/// Latest usage for one API together with its classification.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageReport {
    pub api: ApiName,
    pub snapshot: UsageSnapshot,
    pub classification: UsageClassification,
}

impl UsageReport {
    /// Re-evaluates the classification at `now`, e.g. to update the reset
    /// countdown between polls.
    pub fn reclassify(&mut self, now: DateTime<Utc>) {
        self.classification = classify(&self.snapshot, now);
    }
}

/// Polls usage for a fixed set of APIs.
pub struct UsageMonitor<S, C> {
    source: Arc<S>,
    clock: C,
    apis: Vec<ApiName>,
}

impl<S: UsageSource, C: Clock> UsageMonitor<S, C> {
    /// Creates a monitor covering every [`ApiName`].
    #[must_use]
    pub fn new(source: Arc<S>, clock: C) -> Self {
        Self {
            source,
            clock,
            apis: ApiName::ALL.to_vec(),
        }
    }

    /// Restricts polling to `apis`, in the given order.
    #[must_use]
    pub fn with_apis(mut self, apis: impl IntoIterator<Item = ApiName>) -> Self {
        self.apis = apis.into_iter().collect();
        self
    }

    /// Fetches and classifies usage for a single API.
    ///
    /// # Errors
    ///
    /// Returns whatever error the [`UsageSource`] reports.
    pub async fn refresh(&self, api: ApiName) -> crate::Result<UsageReport> {
        let snapshot = self.source.fetch_usage(api).await?;
        let classification = classify(&snapshot, self.clock.now());
        debug!(
            api = api.as_str(),
            status = %classification.status,
            minute_pct = classification.minute_percent,
            daily_pct = classification.daily_percent,
            "Classified usage"
        );
        Ok(UsageReport {
            api,
            snapshot,
            classification,
        })
    }

    /// Refreshes every API once. Failures are logged and skipped.
    pub async fn poll_once(&self) -> Vec<UsageReport> {
        let mut reports = Vec::with_capacity(self.apis.len());
        for &api in &self.apis {
            match self.refresh(api).await {
                Ok(report) => reports.push(report),
                Err(e) => warn!(api = api.as_str(), error = %e, "Usage poll failed"),
            }
        }
        reports
    }

    /// Polls on every tick and forwards the reports.
    ///
    /// Returns when the ticker ends or the receiving side is dropped.
    pub async fn run<T: Ticker>(&self, mut ticker: T, reports: mpsc::Sender<UsageReport>) {
        while ticker.tick().await {
            for report in self.poll_once().await {
                if reports.send(report).await.is_err() {
                    info!("Usage report receiver closed, stopping monitor");
                    return;
                }
            }
        }
        debug!("Usage ticker ended");
    }
}
