//! Market data providers.
//!
//! A provider hands the engine two raw batches per cycle: the top
//! gainers and the top losers over the last 24 hours. Everything past
//! that point (validation, filtering, scoring) is provider-agnostic.

pub mod coinmarketcap;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::MarketSnapshot;

/// Source of 24h mover batches. Implemented by the CoinMarketCap client
/// in production and by stubs in tests.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch up to `limit` top gainers, strongest move first.
    async fn fetch_gainers(&self, limit: usize) -> Result<Vec<MarketSnapshot>>;

    /// Fetch up to `limit` top losers, steepest drop first.
    async fn fetch_losers(&self, limit: usize) -> Result<Vec<MarketSnapshot>>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
