//! Market opportunity analyzer.
//!
//! Pure scoring pipeline: raw snapshot batches in, ranked analyses out.
//! No I/O happens here — the engine owns fetching and reporting, which
//! keeps every stage deterministic and unit-testable.
//!
//! Pipeline per batch side:
//! 1. validate and quality-filter ([`filter`])
//! 2. score five weighted factors ([`factors`])
//! 3. estimate probability, classify risk, generate a signal ([`signal`])
//! 4. rank deterministically and keep the top N

pub mod factors;
pub mod filter;
pub mod signal;

use std::cmp::Ordering;

use tracing::info;

use crate::types::{BatchSide, LiquidityRating, MarketSnapshot, MomentumLabel, TokenAnalysis};
use self::factors::FactorScores;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Quality-filter thresholds. All three must pass for an instrument to
/// be scored at all.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Minimum market cap in USD.
    pub min_market_cap: f64,
    /// Minimum 24h volume in USD.
    pub min_volume_24h: f64,
    /// Minimum 24h volume / market cap turnover ratio.
    pub min_volume_to_mcap_ratio: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            min_market_cap: 1_000_000.0,
            min_volume_24h: 100_000.0,
            min_volume_to_mcap_ratio: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Output of one analysis pass over both batch sides.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Top gainer-side opportunities, best first.
    pub best_gainers: Vec<TokenAnalysis>,
    /// Top loser-side opportunities, best first.
    pub best_losers: Vec<TokenAnalysis>,
    /// Malformed records dropped by the validator, both sides.
    pub invalid_dropped: usize,
    /// Well-formed records rejected by the quality filter, both sides.
    pub filtered_out: usize,
}

/// Stateless scoring engine. Construct once, call [`Analyzer::analyze`]
/// per cycle.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Analyzer { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Score both batch sides and keep the `top_n` best of each.
    ///
    /// The ranking is fully deterministic: trade score descending, then
    /// profit probability descending, then symbol ascending. Identical
    /// input always produces identical output.
    pub fn analyze(
        &self,
        gainers: &[MarketSnapshot],
        losers: &[MarketSnapshot],
        top_n: usize,
    ) -> AnalysisOutcome {
        let gainer_outcome = filter::apply(gainers, &self.config);
        let loser_outcome = filter::apply(losers, &self.config);

        let best_gainers = self.rank_side(&gainer_outcome.kept, BatchSide::Gainer, top_n);
        let best_losers = self.rank_side(&loser_outcome.kept, BatchSide::Loser, top_n);

        let outcome = AnalysisOutcome {
            best_gainers,
            best_losers,
            invalid_dropped: gainer_outcome.invalid + loser_outcome.invalid,
            filtered_out: gainer_outcome.rejected + loser_outcome.rejected,
        };

        info!(
            gainers_in = gainers.len(),
            losers_in = losers.len(),
            gainers_selected = outcome.best_gainers.len(),
            losers_selected = outcome.best_losers.len(),
            invalid = outcome.invalid_dropped,
            filtered = outcome.filtered_out,
            "Analysis pass complete"
        );

        outcome
    }

    fn rank_side(
        &self,
        kept: &[&MarketSnapshot],
        side: BatchSide,
        top_n: usize,
    ) -> Vec<TokenAnalysis> {
        let mut analyses: Vec<TokenAnalysis> =
            kept.iter().map(|snap| analyze_snapshot(snap, side)).collect();

        analyses.sort_by(|a, b| {
            b.trade_score
                .partial_cmp(&a.trade_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.profit_probability
                        .partial_cmp(&a.profit_probability)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        analyses.truncate(top_n);
        analyses
    }
}

/// Score a single snapshot that already passed the quality filter.
fn analyze_snapshot(snap: &MarketSnapshot, side: BatchSide) -> TokenAnalysis {
    let scores = FactorScores::compute(
        snap.percent_change_24h,
        snap.volume_24h_usd,
        snap.market_cap_usd,
    );
    let trade_score = scores.composite();

    let liquidity_rating = LiquidityRating::classify(snap.volume_24h_usd, snap.market_cap_usd);
    let profit_probability =
        signal::profit_probability(trade_score, snap.percent_change_24h, liquidity_rating);
    let risk_level = signal::assess_risk(
        snap.market_cap_usd,
        snap.volume_24h_usd,
        snap.percent_change_24h,
    );
    let trading_signal = signal::generate_signal(trade_score, profit_probability, risk_level, side);
    let momentum = MomentumLabel::classify(snap.percent_change_24h, side);
    let reasoning = signal::reasoning(
        &snap.symbol,
        trade_score,
        snap.volume_24h_usd,
        snap.market_cap_usd,
        snap.percent_change_24h,
        side,
    );

    TokenAnalysis {
        symbol: snap.symbol.clone(),
        name: snap.name.clone(),
        price_usd: snap.price_usd,
        percent_change_24h: snap.percent_change_24h,
        volume_24h_usd: snap.volume_24h_usd,
        market_cap_usd: snap.market_cap_usd,
        side,
        trade_score,
        profit_probability,
        risk_level,
        momentum,
        liquidity_rating,
        trading_signal,
        reasoning,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
