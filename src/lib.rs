//! Client core for a stock chart and API rate-limit dashboard.
//!
//! Provides the backend payload models, a rate-limit usage classifier,
//! shape validation for stock payloads, a stock fetch controller that
//! guarantees last-initiated-wins ordering, and the display helpers the
//! quote cards use.

pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod models;
pub mod monitor;
pub mod schedule;
pub mod schema;
pub mod usage;

pub use error::{Result, StockmeterError};
