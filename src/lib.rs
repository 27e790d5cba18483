//! Support/resistance level detection and a tiered cache for market data.

pub mod cache;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
