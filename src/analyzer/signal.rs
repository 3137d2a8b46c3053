//! Probability estimation, risk classification, and signal generation.
//!
//! These three stages run after factor scoring and are deliberately
//! independent axes: risk is derived from raw market structure (cap,
//! volume, volatility), never re-derived from the trade score.

use crate::types::{BatchSide, LiquidityRating, RiskLevel, TradingSignal};

/// A 24h move beyond this magnitude is considered overextended: the
/// contrarian penalty applies because continuation is statistically
/// less likely.
pub const OVEREXTENDED_PCT: f64 = 50.0;

/// Beyond this magnitude the move is treated as likely exhausted and
/// takes the full contrarian penalty.
pub const EXHAUSTED_PCT: f64 = 100.0;

// ---------------------------------------------------------------------------
// Profit probability
// ---------------------------------------------------------------------------

/// Estimate the 0–100 probability of a profitable entry.
///
/// Starts from `trade_score * 0.9`, then:
/// - contrarian penalty: −15 when abs(pct) > 100, −8 when > 50;
/// - execution bonus: +5 when liquidity is EXCELLENT (easy entry/exit).
pub fn profit_probability(
    trade_score: f64,
    percent_change_24h: f64,
    liquidity_rating: LiquidityRating,
) -> f64 {
    let mut prob = trade_score * 0.9;

    let abs_change = percent_change_24h.abs();
    if abs_change > EXHAUSTED_PCT {
        prob -= 15.0;
    } else if abs_change > OVEREXTENDED_PCT {
        prob -= 8.0;
    }

    if liquidity_rating == LiquidityRating::Excellent {
        prob += 5.0;
    }

    prob.clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Risk classification
// ---------------------------------------------------------------------------

/// Classify risk from market cap, absolute 24h volume, and volatility.
///
/// Additive 3–9 point scale with explicit thresholds per axis:
///
/// | axis       | 3 points | 2 points | 1 point  |
/// |------------|----------|----------|----------|
/// | market cap | < $10M   | < $100M  | >= $100M |
/// | 24h volume | < $1M    | < $10M   | >= $10M  |
/// | abs(pct)   | > 50%    | > 20%    | <= 20%   |
///
/// Total >= 7 → HIGH, >= 5 → MEDIUM, else LOW.
pub fn assess_risk(market_cap_usd: f64, volume_24h_usd: f64, percent_change_24h: f64) -> RiskLevel {
    let mut risk_points = 0u8;

    risk_points += if market_cap_usd < 10_000_000.0 {
        3
    } else if market_cap_usd < 100_000_000.0 {
        2
    } else {
        1
    };

    risk_points += if volume_24h_usd < 1_000_000.0 {
        3
    } else if volume_24h_usd < 10_000_000.0 {
        2
    } else {
        1
    };

    let abs_change = percent_change_24h.abs();
    risk_points += if abs_change > 50.0 {
        3
    } else if abs_change > 20.0 {
        2
    } else {
        1
    };

    if risk_points >= 7 {
        RiskLevel::High
    } else if risk_points >= 5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

// ---------------------------------------------------------------------------
// Signal generation
// ---------------------------------------------------------------------------

/// Map score, probability, and risk to a discrete signal.
///
/// Priority-ordered decision table — thresholds overlap, first match wins:
/// 1. score >= 80, prob > 70, risk != HIGH → STRONG_BUY / SHORT_OPP
/// 2. score >= 65, prob > 55              → BUY / BOUNCE_PLAY
/// 3. score >= 50                         → HOLD
/// 4. otherwise                           → AVOID
///
/// On the loser side the top tier reads as a shorting opportunity and
/// the second tier as a potential oversold reversal.
pub fn generate_signal(
    trade_score: f64,
    profit_probability: f64,
    risk_level: RiskLevel,
    side: BatchSide,
) -> TradingSignal {
    if trade_score >= 80.0 && profit_probability > 70.0 && risk_level != RiskLevel::High {
        return match side {
            BatchSide::Gainer => TradingSignal::StrongBuy,
            BatchSide::Loser => TradingSignal::ShortOpp,
        };
    }
    if trade_score >= 65.0 && profit_probability > 55.0 {
        return match side {
            BatchSide::Gainer => TradingSignal::Buy,
            BatchSide::Loser => TradingSignal::BouncePlay,
        };
    }
    if trade_score >= 50.0 {
        return TradingSignal::Hold;
    }
    TradingSignal::Avoid
}

// ---------------------------------------------------------------------------
// Reasoning
// ---------------------------------------------------------------------------

/// Build the human-readable rationale shown in the briefing.
pub fn reasoning(
    symbol: &str,
    trade_score: f64,
    volume_24h_usd: f64,
    market_cap_usd: f64,
    percent_change_24h: f64,
    side: BatchSide,
) -> String {
    let mut reasons = Vec::new();

    if trade_score >= 80.0 {
        reasons.push("exceptional opportunity");
    } else if trade_score >= 65.0 {
        reasons.push("strong setup");
    } else {
        reasons.push("moderate potential");
    }

    let ratio = if market_cap_usd > 0.0 {
        volume_24h_usd / market_cap_usd
    } else {
        0.0
    };
    if ratio >= 0.2 {
        reasons.push("highly liquid");
    } else if ratio >= 0.1 {
        reasons.push("good liquidity");
    }

    let abs_change = percent_change_24h.abs();
    if abs_change > 50.0 {
        reasons.push(match side {
            BatchSide::Gainer => "extreme volatility",
            BatchSide::Loser => "oversold potential",
        });
    } else if abs_change > 20.0 {
        reasons.push(match side {
            BatchSide::Gainer => "strong momentum",
            BatchSide::Loser => "heavy selling",
        });
    }

    format!("{symbol}: {}", reasons.join(", "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
