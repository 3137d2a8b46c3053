//! Shared types for the PULSE agent.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that data, analyzer, report,
//! and engine modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// MarketSnapshot
// ---------------------------------------------------------------------------

/// One instrument's 24-hour price-movement snapshot, as handed to the
/// analyzer by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Short ticker, unique within one batch side.
    pub symbol: String,
    /// Display name (not used in scoring).
    pub name: String,
    pub price_usd: f64,
    /// Signed 24h change in percent (e.g. 5.23 means +5.23%).
    pub percent_change_24h: f64,
    pub volume_24h_usd: f64,
    pub market_cap_usd: f64,
}

impl fmt::Display for MarketSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (${:.4} | {:+.2}% | vol ${:.0} | mcap ${:.0})",
            self.symbol,
            self.price_usd,
            self.percent_change_24h,
            self.volume_24h_usd,
            self.market_cap_usd,
        )
    }
}

impl MarketSnapshot {
    /// 24h volume as a fraction of market cap. `None` when the market cap
    /// is zero or negative (the untradeable degenerate case).
    pub fn volume_to_mcap_ratio(&self) -> Option<f64> {
        if self.market_cap_usd > 0.0 {
            Some(self.volume_24h_usd / self.market_cap_usd)
        } else {
            None
        }
    }

    /// Whether the record is structurally usable: non-empty symbol, finite
    /// positive price, finite non-negative volume and market cap, finite
    /// percent change. Records failing this are dropped by the validator.
    pub fn is_wellformed(&self) -> bool {
        !self.symbol.is_empty()
            && self.price_usd.is_finite()
            && self.price_usd > 0.0
            && self.percent_change_24h.is_finite()
            && self.volume_24h_usd.is_finite()
            && self.volume_24h_usd >= 0.0
            && self.market_cap_usd.is_finite()
            && self.market_cap_usd >= 0.0
    }

    /// Helper to build a test/sample snapshot with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        MarketSnapshot {
            symbol: "BTC".to_string(),
            name: "Bitcoin".to_string(),
            price_usd: 48234.12,
            percent_change_24h: 5.23,
            volume_24h_usd: 24_500_000_000.0,
            market_cap_usd: 950_000_000_000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which side of the movers list a batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchSide {
    Gainer,
    Loser,
}

impl fmt::Display for BatchSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSide::Gainer => write!(f, "GAINER"),
            BatchSide::Loser => write!(f, "LOSER"),
        }
    }
}

/// Joint risk classification over market cap, volume, and volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Discrete trading signal produced by the decision table.
///
/// Gainer-side signals: StrongBuy / Buy / Hold / Avoid.
/// Loser-side signals: ShortOpp / BouncePlay / Hold / Avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingSignal {
    StrongBuy,
    Buy,
    Hold,
    Avoid,
    BouncePlay,
    ShortOpp,
}

impl fmt::Display for TradingSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingSignal::StrongBuy => write!(f, "STRONG_BUY"),
            TradingSignal::Buy => write!(f, "BUY"),
            TradingSignal::Hold => write!(f, "HOLD"),
            TradingSignal::Avoid => write!(f, "AVOID"),
            TradingSignal::BouncePlay => write!(f, "BOUNCE_PLAY"),
            TradingSignal::ShortOpp => write!(f, "SHORT_OPP"),
        }
    }
}

/// Qualitative liquidity tier from the volume / market-cap ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidityRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl LiquidityRating {
    /// Tier boundaries on 24h turnover (volume / market cap):
    /// >= 30% Excellent, >= 10% Good, >= 5% Fair, else Poor.
    /// Zero market cap rates Poor (the quality filter rejects it anyway).
    pub fn classify(volume_24h_usd: f64, market_cap_usd: f64) -> Self {
        let ratio = if market_cap_usd > 0.0 {
            volume_24h_usd / market_cap_usd
        } else {
            0.0
        };

        if ratio >= 0.3 {
            LiquidityRating::Excellent
        } else if ratio >= 0.1 {
            LiquidityRating::Good
        } else if ratio >= 0.05 {
            LiquidityRating::Fair
        } else {
            LiquidityRating::Poor
        }
    }
}

impl fmt::Display for LiquidityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiquidityRating::Poor => write!(f, "POOR"),
            LiquidityRating::Fair => write!(f, "FAIR"),
            LiquidityRating::Good => write!(f, "GOOD"),
            LiquidityRating::Excellent => write!(f, "EXCELLENT"),
        }
    }
}

/// Qualitative momentum label, interpreted per batch side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MomentumLabel {
    // Gainer side
    Extreme,
    Strong,
    Moderate,
    Weak,
    // Loser side
    FallingKnife,
    HeavySell,
    Selling,
    Drifting,
}

impl MomentumLabel {
    /// Label a move by magnitude: > 30% / > 15% / > 8% / else,
    /// with loser-side variants for downward moves.
    pub fn classify(percent_change_24h: f64, side: BatchSide) -> Self {
        let abs_change = percent_change_24h.abs();
        match side {
            BatchSide::Gainer => {
                if abs_change > 30.0 {
                    MomentumLabel::Extreme
                } else if abs_change > 15.0 {
                    MomentumLabel::Strong
                } else if abs_change > 8.0 {
                    MomentumLabel::Moderate
                } else {
                    MomentumLabel::Weak
                }
            }
            BatchSide::Loser => {
                if abs_change > 30.0 {
                    MomentumLabel::FallingKnife
                } else if abs_change > 15.0 {
                    MomentumLabel::HeavySell
                } else if abs_change > 8.0 {
                    MomentumLabel::Selling
                } else {
                    MomentumLabel::Drifting
                }
            }
        }
    }
}

impl fmt::Display for MomentumLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MomentumLabel::Extreme => write!(f, "EXTREME"),
            MomentumLabel::Strong => write!(f, "STRONG"),
            MomentumLabel::Moderate => write!(f, "MODERATE"),
            MomentumLabel::Weak => write!(f, "WEAK"),
            MomentumLabel::FallingKnife => write!(f, "FALLING_KNIFE"),
            MomentumLabel::HeavySell => write!(f, "HEAVY_SELL"),
            MomentumLabel::Selling => write!(f, "SELLING"),
            MomentumLabel::Drifting => write!(f, "DRIFTING"),
        }
    }
}

// ---------------------------------------------------------------------------
// TokenAnalysis
// ---------------------------------------------------------------------------

/// Full trading analysis for one instrument that survived the quality
/// filter. Carries the snapshot fields plus every derived metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAnalysis {
    pub symbol: String,
    pub name: String,
    pub price_usd: f64,
    pub percent_change_24h: f64,
    pub volume_24h_usd: f64,
    pub market_cap_usd: f64,
    pub side: BatchSide,

    /// Composite 0–100 opportunity score (whole number).
    pub trade_score: f64,
    /// Estimated 0–100 probability of a profitable entry.
    pub profit_probability: f64,
    pub risk_level: RiskLevel,
    pub momentum: MomentumLabel,
    pub liquidity_rating: LiquidityRating,
    pub trading_signal: TradingSignal,
    /// Human-readable selection rationale for the briefing.
    pub reasoning: String,
}

impl fmt::Display for TokenAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}: ${} ({}) | score {:.0}/100 | prob {:.0}% | risk {} | {} | {}",
            self.symbol,
            self.format_price(),
            self.format_pct(),
            self.trade_score,
            self.profit_probability,
            self.risk_level,
            self.momentum,
            self.trading_signal,
        )
    }
}

impl TokenAnalysis {
    /// Format the price with precision appropriate to its magnitude.
    pub fn format_price(&self) -> String {
        if self.price_usd >= 1.0 {
            format!("{:.2}", self.price_usd)
        } else if self.price_usd >= 0.01 {
            format!("{:.4}", self.price_usd)
        } else {
            format!("{:.8}", self.price_usd)
        }
    }

    /// Format the 24h change with an explicit sign.
    pub fn format_pct(&self) -> String {
        format!("{:+.2}%", self.percent_change_24h)
    }
}

// ---------------------------------------------------------------------------
// Cycle report
// ---------------------------------------------------------------------------

/// Summary of a single fetch → analyze → report cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_number: u64,
    pub timestamp: DateTime<Utc>,
    pub gainers_in: usize,
    pub losers_in: usize,
    pub gainers_selected: usize,
    pub losers_selected: usize,
    /// Malformed records dropped by the validator.
    pub invalid_dropped: usize,
    /// Well-formed records rejected by the quality filter.
    pub filtered_out: usize,
    pub briefing_len: usize,
    pub posted: bool,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle #{}: in={}/{} selected={}/{} invalid={} filtered={} briefing={}ch posted={}",
            self.cycle_number,
            self.gainers_in,
            self.losers_in,
            self.gainers_selected,
            self.losers_selected,
            self.invalid_dropped,
            self.filtered_out,
            self.briefing_len,
            self.posted,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for PULSE. Raised at the provider and
/// notifier boundaries; callers match or downcast through `anyhow`.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("Market data error ({source_name}): {message}")]
    MarketData { source_name: String, message: String },

    #[error("Malformed batch from provider: {0}")]
    MalformedBatch(String),

    #[error("Notification error: {0}")]
    Notify(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- MarketSnapshot tests --

    #[test]
    fn test_snapshot_ratio() {
        let snap = MarketSnapshot::sample();
        let ratio = snap.volume_to_mcap_ratio().unwrap();
        assert!((ratio - 24_500_000_000.0 / 950_000_000_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_ratio_zero_mcap() {
        let snap = MarketSnapshot {
            market_cap_usd: 0.0,
            ..MarketSnapshot::sample()
        };
        assert!(snap.volume_to_mcap_ratio().is_none());
    }

    #[test]
    fn test_snapshot_wellformed() {
        assert!(MarketSnapshot::sample().is_wellformed());
    }

    #[test]
    fn test_snapshot_malformed_variants() {
        let base = MarketSnapshot::sample();
        let cases = vec![
            MarketSnapshot { symbol: String::new(), ..base.clone() },
            MarketSnapshot { price_usd: 0.0, ..base.clone() },
            MarketSnapshot { price_usd: -1.0, ..base.clone() },
            MarketSnapshot { price_usd: f64::NAN, ..base.clone() },
            MarketSnapshot { percent_change_24h: f64::INFINITY, ..base.clone() },
            MarketSnapshot { volume_24h_usd: -5.0, ..base.clone() },
            MarketSnapshot { market_cap_usd: -1.0, ..base.clone() },
        ];
        for snap in cases {
            assert!(!snap.is_wellformed(), "expected malformed: {snap}");
        }
    }

    #[test]
    fn test_snapshot_zero_mcap_is_wellformed() {
        // Zero market cap is a valid (degenerate) input — the quality
        // filter rejects it, not the validator.
        let snap = MarketSnapshot {
            market_cap_usd: 0.0,
            ..MarketSnapshot::sample()
        };
        assert!(snap.is_wellformed());
    }

    // -- Enum display tests --

    #[test]
    fn test_side_display() {
        assert_eq!(format!("{}", BatchSide::Gainer), "GAINER");
        assert_eq!(format!("{}", BatchSide::Loser), "LOSER");
    }

    #[test]
    fn test_risk_display() {
        assert_eq!(format!("{}", RiskLevel::Low), "LOW");
        assert_eq!(format!("{}", RiskLevel::High), "HIGH");
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(format!("{}", TradingSignal::StrongBuy), "STRONG_BUY");
        assert_eq!(format!("{}", TradingSignal::BouncePlay), "BOUNCE_PLAY");
        assert_eq!(format!("{}", TradingSignal::ShortOpp), "SHORT_OPP");
    }

    // -- LiquidityRating tests --

    #[test]
    fn test_liquidity_rating_tiers() {
        assert_eq!(LiquidityRating::classify(35.0, 100.0), LiquidityRating::Excellent);
        assert_eq!(LiquidityRating::classify(15.0, 100.0), LiquidityRating::Good);
        assert_eq!(LiquidityRating::classify(6.0, 100.0), LiquidityRating::Fair);
        assert_eq!(LiquidityRating::classify(1.0, 100.0), LiquidityRating::Poor);
    }

    #[test]
    fn test_liquidity_rating_boundaries() {
        assert_eq!(LiquidityRating::classify(30.0, 100.0), LiquidityRating::Excellent);
        assert_eq!(LiquidityRating::classify(10.0, 100.0), LiquidityRating::Good);
        assert_eq!(LiquidityRating::classify(5.0, 100.0), LiquidityRating::Fair);
    }

    #[test]
    fn test_liquidity_rating_zero_mcap() {
        assert_eq!(LiquidityRating::classify(1000.0, 0.0), LiquidityRating::Poor);
    }

    // -- MomentumLabel tests --

    #[test]
    fn test_momentum_label_gainer() {
        assert_eq!(MomentumLabel::classify(45.0, BatchSide::Gainer), MomentumLabel::Extreme);
        assert_eq!(MomentumLabel::classify(20.0, BatchSide::Gainer), MomentumLabel::Strong);
        assert_eq!(MomentumLabel::classify(10.0, BatchSide::Gainer), MomentumLabel::Moderate);
        assert_eq!(MomentumLabel::classify(3.0, BatchSide::Gainer), MomentumLabel::Weak);
    }

    #[test]
    fn test_momentum_label_loser() {
        assert_eq!(MomentumLabel::classify(-45.0, BatchSide::Loser), MomentumLabel::FallingKnife);
        assert_eq!(MomentumLabel::classify(-20.0, BatchSide::Loser), MomentumLabel::HeavySell);
        assert_eq!(MomentumLabel::classify(-10.0, BatchSide::Loser), MomentumLabel::Selling);
        assert_eq!(MomentumLabel::classify(-3.0, BatchSide::Loser), MomentumLabel::Drifting);
    }

    // -- TokenAnalysis tests --

    fn make_analysis(price: f64) -> TokenAnalysis {
        TokenAnalysis {
            symbol: "BTC".to_string(),
            name: "Bitcoin".to_string(),
            price_usd: price,
            percent_change_24h: 5.23,
            volume_24h_usd: 24_500_000_000.0,
            market_cap_usd: 950_000_000_000.0,
            side: BatchSide::Gainer,
            trade_score: 67.0,
            profit_probability: 60.3,
            risk_level: RiskLevel::Low,
            momentum: MomentumLabel::Weak,
            liquidity_rating: LiquidityRating::Poor,
            trading_signal: TradingSignal::Buy,
            reasoning: "BTC: strong setup".to_string(),
        }
    }

    #[test]
    fn test_analysis_price_formats_by_magnitude() {
        assert_eq!(make_analysis(48234.12).format_price(), "48234.12");
        assert_eq!(make_analysis(0.0456).format_price(), "0.0456");
        assert_eq!(make_analysis(0.00001234).format_price(), "0.00001234");
    }

    #[test]
    fn test_analysis_pct_sign() {
        let mut a = make_analysis(1.0);
        assert_eq!(a.format_pct(), "+5.23%");
        a.percent_change_24h = -8.34;
        assert_eq!(a.format_pct(), "-8.34%");
    }

    #[test]
    fn test_analysis_display() {
        let a = make_analysis(48234.12);
        let display = format!("{a}");
        assert!(display.contains("$BTC"));
        assert!(display.contains("67/100"));
        assert!(display.contains("LOW"));
        assert!(display.contains("BUY"));
    }

    #[test]
    fn test_analysis_serialization_roundtrip() {
        let a = make_analysis(48234.12);
        let json = serde_json::to_string(&a).unwrap();
        let parsed: TokenAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, a);
    }

    // -- CycleReport tests --

    #[test]
    fn test_cycle_report_display() {
        let report = CycleReport {
            cycle_number: 42,
            timestamp: Utc::now(),
            gainers_in: 50,
            losers_in: 48,
            gainers_selected: 5,
            losers_selected: 3,
            invalid_dropped: 2,
            filtered_out: 61,
            briefing_len: 900,
            posted: true,
        };
        let display = format!("{report}");
        assert!(display.contains("#42"));
        assert!(display.contains("50/48"));
        assert!(display.contains("5/3"));
    }

    // -- PulseError tests --

    #[test]
    fn test_error_display() {
        let e = PulseError::MarketData {
            source_name: "coinmarketcap".to_string(),
            message: "timeout".to_string(),
        };
        assert_eq!(format!("{e}"), "Market data error (coinmarketcap): timeout");

        let e = PulseError::MalformedBatch("missing data field".to_string());
        assert!(format!("{e}").contains("missing data field"));

        let e = PulseError::Notify("403 Forbidden".to_string());
        assert_eq!(format!("{e}"), "Notification error: 403 Forbidden");
    }
}
