//! Snapshot validation and quality filtering.
//!
//! Two gates run before any scoring:
//! 1. The validator drops structurally malformed records (bad price,
//!    negative volume, empty symbol) — counted, never raised.
//! 2. The quality filter drops well-formed instruments that cannot
//!    realistically be traded: micro caps, illiquid volume, or a
//!    volume/market-cap ratio below the turnover floor.

use tracing::debug;

use super::AnalyzerConfig;
use crate::types::MarketSnapshot;

/// Result of running both gates over one batch side.
pub struct FilterOutcome<'a> {
    /// Snapshots that passed validation and the quality filter.
    pub kept: Vec<&'a MarketSnapshot>,
    /// Malformed records dropped by the validator.
    pub invalid: usize,
    /// Well-formed records rejected by the quality filter.
    pub rejected: usize,
}

/// Run validation and the quality filter over a raw batch.
pub fn apply<'a>(snapshots: &'a [MarketSnapshot], config: &AnalyzerConfig) -> FilterOutcome<'a> {
    let mut kept = Vec::new();
    let mut invalid = 0usize;
    let mut rejected = 0usize;

    for snap in snapshots {
        if !snap.is_wellformed() {
            debug!(symbol = %snap.symbol, "Dropping malformed snapshot");
            invalid += 1;
            continue;
        }
        if !passes_quality(snap, config) {
            rejected += 1;
            continue;
        }
        kept.push(snap);
    }

    FilterOutcome { kept, invalid, rejected }
}

/// Whether a well-formed snapshot clears all three quality thresholds.
///
/// A zero market cap is rejected outright — it is untradeable and would
/// otherwise require dividing by zero in the ratio check.
fn passes_quality(snap: &MarketSnapshot, config: &AnalyzerConfig) -> bool {
    if snap.market_cap_usd < config.min_market_cap {
        debug!(
            symbol = %snap.symbol,
            market_cap = snap.market_cap_usd,
            floor = config.min_market_cap,
            "Rejected: market cap below floor"
        );
        return false;
    }

    if snap.volume_24h_usd < config.min_volume_24h {
        debug!(
            symbol = %snap.symbol,
            volume = snap.volume_24h_usd,
            floor = config.min_volume_24h,
            "Rejected: 24h volume below floor"
        );
        return false;
    }

    match snap.volume_to_mcap_ratio() {
        Some(ratio) if ratio >= config.min_volume_to_mcap_ratio => true,
        Some(ratio) => {
            debug!(
                symbol = %snap.symbol,
                ratio,
                floor = config.min_volume_to_mcap_ratio,
                "Rejected: turnover ratio below floor"
            );
            false
        }
        None => {
            debug!(symbol = %snap.symbol, "Rejected: zero market cap");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
