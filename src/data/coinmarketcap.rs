//! CoinMarketCap Pro API integration.
//!
//! Uses `/v1/cryptocurrency/listings/latest` sorted by 24h percent
//! change in both directions to obtain the gainer and loser batches.
//!
//! API docs: https://coinmarketcap.com/api/documentation/v1/
//! Auth: `X-CMC_PRO_API_KEY` header, required for all endpoints.
//! Free tier: 10k credits/month; one listings call costs 1 credit
//! per 200 results.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::MarketDataProvider;
use crate::types::{MarketSnapshot, PulseError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BASE_URL: &str = "https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest";
const PROVIDER_NAME: &str = "coinmarketcap";

/// Over-fetch factor: the quality filter rejects most small movers, so
/// request several times more rows than we intend to keep.
const OVERFETCH_FACTOR: usize = 5;
const MIN_FETCH: usize = 30;

// ---------------------------------------------------------------------------
// API response types (CoinMarketCap JSON → Rust)
// ---------------------------------------------------------------------------

/// Envelope returned by `listings/latest`. A missing or non-array
/// `data` field is a hard deserialization error — the batch is
/// structurally unusable, not merely noisy.
#[derive(Debug, Deserialize)]
struct CmcListingsResponse {
    data: Vec<CmcCoin>,
}

/// One listing row. Only the fields we score on are deserialized.
/// Numeric fields default to 0.0 when null; the validator drops any
/// row that ends up malformed.
#[derive(Debug, Deserialize)]
struct CmcCoin {
    symbol: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    quote: Option<CmcQuote>,
}

#[derive(Debug, Deserialize)]
struct CmcQuote {
    #[serde(rename = "USD")]
    usd: Option<CmcUsdQuote>,
}

#[derive(Debug, Deserialize)]
struct CmcUsdQuote {
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    percent_change_24h: Option<f64>,
    #[serde(default)]
    volume_24h: Option<f64>,
    #[serde(default)]
    market_cap: Option<f64>,
}

impl CmcCoin {
    fn into_snapshot(self) -> MarketSnapshot {
        let usd = self.quote.and_then(|q| q.usd);
        let (price, pct, volume, mcap) = match usd {
            Some(q) => (
                q.price.unwrap_or(0.0),
                q.percent_change_24h.unwrap_or(0.0),
                q.volume_24h.unwrap_or(0.0),
                q.market_cap.unwrap_or(0.0),
            ),
            None => (0.0, 0.0, 0.0, 0.0),
        };
        MarketSnapshot {
            symbol: self.symbol,
            name: self.name,
            price_usd: price,
            percent_change_24h: pct,
            volume_24h_usd: volume,
            market_cap_usd: mcap,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// CoinMarketCap Pro API client.
pub struct CoinMarketCapClient {
    http: Client,
    api_key: String,
}

impl CoinMarketCapClient {
    pub fn new(api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent("PULSE/0.1.0 (crypto-analysis-agent)")
            .build()
            .context("Failed to build HTTP client for CoinMarketCap")?;

        Ok(Self { http, api_key })
    }

    /// Fetch one side of the movers list, sorted by 24h change.
    /// `sort_dir` is "desc" for gainers, "asc" for losers.
    async fn fetch_movers(&self, limit: usize, sort_dir: &str) -> Result<Vec<MarketSnapshot>> {
        let fetch_limit = (limit * OVERFETCH_FACTOR).max(MIN_FETCH);

        debug!(limit, fetch_limit, sort_dir, "Fetching CoinMarketCap listings");

        let resp = self
            .http
            .get(BASE_URL)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .query(&[
                ("start", "1".to_string()),
                ("limit", fetch_limit.to_string()),
                ("convert", "USD".to_string()),
                ("sort", "percent_change_24h".to_string()),
                ("sort_dir", sort_dir.to_string()),
            ])
            .send()
            .await
            .context("CoinMarketCap API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PulseError::MarketData {
                source_name: PROVIDER_NAME.to_string(),
                message: format!("{status}: {body}"),
            }
            .into());
        }

        let body = resp
            .text()
            .await
            .context("Failed to read CoinMarketCap response body")?;
        let listings = Self::parse_listings(&body)?;

        let snapshots: Vec<MarketSnapshot> = listings
            .data
            .into_iter()
            .take(limit)
            .map(CmcCoin::into_snapshot)
            .collect();

        info!(
            count = snapshots.len(),
            sort_dir, "CoinMarketCap batch fetched"
        );

        Ok(snapshots)
    }

    /// Parse a listings body. A structurally unusable envelope (missing
    /// or non-array `data`) is a [`PulseError::MalformedBatch`].
    fn parse_listings(body: &str) -> Result<CmcListingsResponse> {
        serde_json::from_str(body).map_err(|e| PulseError::MalformedBatch(e.to_string()).into())
    }
}

#[async_trait]
impl MarketDataProvider for CoinMarketCapClient {
    async fn fetch_gainers(&self, limit: usize) -> Result<Vec<MarketSnapshot>> {
        self.fetch_movers(limit, "desc").await
    }

    async fn fetch_losers(&self, limit: usize) -> Result<Vec<MarketSnapshot>> {
        self.fetch_movers(limit, "asc").await
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
