use std::sync::Arc;

use stockmeter::StockmeterError;
use stockmeter::config::fetch_config;
use stockmeter::fetch::http::HttpClient;
use stockmeter::fetch::{FetchState, StockFetchController};
use stockmeter::format::{
    ChangeDirection, change_direction, format_change_percent, format_market_cap,
    format_pe_ratio, format_price, format_volume,
};
use stockmeter::monitor::UsageMonitor;
use stockmeter::schedule::{IntervalTicker, SystemClock};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), StockmeterError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app_config = fetch_config()?;
    let client = Arc::new(HttpClient::new(&app_config.backend)?);

    let controller = StockFetchController::with_shared_source(Arc::clone(&client));
    controller
        .initiate_fetch(&app_config.dashboard.symbol, app_config.dashboard.period)
        .settled()
        .await;
    report_stock(&app_config.dashboard.symbol, &controller.state());

    let monitor = UsageMonitor::new(client, SystemClock);
    let ticker =
        IntervalTicker::new(app_config.dashboard.poll_interval).take(app_config.dashboard.usage_polls);
    let (tx, mut rx) = mpsc::channel(16);

    let poller = async move { monitor.run(ticker, tx).await };
    let printer = async {
        while let Some(report) = rx.recv().await {
            let c = &report.classification;
            let minute = format!("{}/{}", report.snapshot.minute.current, report.snapshot.minute.limit);
            let daily = format!("{}/{}", report.snapshot.daily.current, report.snapshot.daily.limit);
            info!(
                api = %report.api.display_name(),
                status = %c.status,
                minute = %minute,
                daily = %daily,
                resets_in_secs = c.seconds_to_minute_reset,
                "Rate limit usage"
            );
            if let Some(alert) = c.status.alert() {
                warn!(api = %report.api.display_name(), "{alert}");
            }
        }
    };
    tokio::join!(poller, printer);

    Ok(())
}

fn report_stock(symbol: &str, state: &FetchState) {
    match state {
        FetchState::Success(snapshot) => {
            let arrow = match change_direction(snapshot.change_percent) {
                ChangeDirection::Up => "▲",
                ChangeDirection::Down => "▼",
            };
            let change = format!("{arrow} {}", format_change_percent(snapshot.change_percent));
            info!(
                symbol,
                price = %format_price(snapshot.current_price),
                change = %change,
                market_cap = %format_market_cap(snapshot.market_cap),
                pe_ratio = %format_pe_ratio(snapshot.pe_ratio),
                bars = snapshot.prices.len(),
                "Stock quote"
            );
            if let Some(latest) = snapshot.latest() {
                info!(
                    timestamp = %latest.timestamp,
                    close = %format_price(latest.close),
                    volume = %format_volume(latest.volume),
                    "Latest bar"
                );
            }
        }
        FetchState::Error(message) => error!(symbol, "{message}"),
        FetchState::Idle | FetchState::Loading => warn!(symbol, "Stock fetch did not settle"),
    }
}
