//! Factor scoring — five independent 0–100 sub-scores per instrument
//! and their weighted composite.
//!
//! Each sub-score is a documented breakpoint table rather than a smooth
//! curve: tiers keep the ranking deterministic and easy to audit against
//! a briefing. Weights sum to 1.0.

/// Weight of price-action strength in the composite.
pub const WEIGHT_MOMENTUM: f64 = 0.30;
/// Weight of volume/market-cap turnover.
pub const WEIGHT_LIQUIDITY: f64 = 0.25;
/// Weight of raw movement magnitude (risk = reward).
pub const WEIGHT_VOLATILITY: f64 = 0.20;
/// Weight of market-cap sizing (stability vs. opportunity).
pub const WEIGHT_MARKET_CAP: f64 = 0.15;
/// Weight of the sustained-vs-spike heuristic.
pub const WEIGHT_CONSISTENCY: f64 = 0.10;

/// The five sub-scores for one instrument, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScores {
    pub momentum: f64,
    pub liquidity: f64,
    pub volatility: f64,
    pub market_cap: f64,
    pub consistency: f64,
}

impl FactorScores {
    /// Compute all five sub-scores from a snapshot's raw fields.
    pub fn compute(percent_change_24h: f64, volume_24h_usd: f64, market_cap_usd: f64) -> Self {
        FactorScores {
            momentum: momentum_score(percent_change_24h),
            liquidity: liquidity_score(volume_24h_usd, market_cap_usd),
            volatility: volatility_score(percent_change_24h),
            market_cap: market_cap_score(market_cap_usd),
            consistency: consistency_score(percent_change_24h, volume_24h_usd, market_cap_usd),
        }
    }

    /// Weighted composite, rounded to a whole number and clamped to [0, 100].
    /// This is the primary sort key for selection.
    pub fn composite(&self) -> f64 {
        let weighted = self.momentum * WEIGHT_MOMENTUM
            + self.liquidity * WEIGHT_LIQUIDITY
            + self.volatility * WEIGHT_VOLATILITY
            + self.market_cap * WEIGHT_MARKET_CAP
            + self.consistency * WEIGHT_CONSISTENCY;
        weighted.round().clamp(0.0, 100.0)
    }
}

/// Momentum: peaks for moves in the 20–50% band, tapers to 60 above 50%
/// (a move that large has likely already run), and to 10 below 2%
/// (nothing meaningful happened).
///
/// | abs(pct)   | score |
/// |------------|-------|
/// | >= 50      | 60    |
/// | >= 20      | 100   |
/// | >= 10      | 95    |
/// | >= 5       | 85    |
/// | >= 2       | 40    |
/// | < 2        | 10    |
pub fn momentum_score(percent_change_24h: f64) -> f64 {
    let abs_change = percent_change_24h.abs();
    if abs_change >= 50.0 {
        60.0
    } else if abs_change >= 20.0 {
        100.0
    } else if abs_change >= 10.0 {
        95.0
    } else if abs_change >= 5.0 {
        85.0
    } else if abs_change >= 2.0 {
        40.0
    } else {
        10.0
    }
}

/// Liquidity: 24h turnover ratio. Near 100 at 10% daily turnover,
/// approaching 0 at the 1% quality-filter threshold.
///
/// | volume/mcap | score |
/// |-------------|-------|
/// | >= 0.10     | 100   |
/// | >= 0.05     | 75    |
/// | >= 0.02     | 45    |
/// | >= 0.01     | 15    |
/// | < 0.01      | 0     |
pub fn liquidity_score(volume_24h_usd: f64, market_cap_usd: f64) -> f64 {
    if market_cap_usd <= 0.0 {
        return 0.0;
    }
    let ratio = volume_24h_usd / market_cap_usd;
    if ratio >= 0.10 {
        100.0
    } else if ratio >= 0.05 {
        75.0
    } else if ratio >= 0.02 {
        45.0
    } else if ratio >= 0.01 {
        15.0
    } else {
        0.0
    }
}

/// Volatility: movement magnitude regardless of direction. Unlike
/// momentum this is monotone — bigger moves always mean more intraday
/// opportunity.
///
/// | abs(pct) | score |
/// |----------|-------|
/// | >= 30    | 100   |
/// | >= 15    | 85    |
/// | >= 8     | 70    |
/// | >= 4     | 55    |
/// | >= 2     | 35    |
/// | < 2      | 15    |
pub fn volatility_score(percent_change_24h: f64) -> f64 {
    let abs_change = percent_change_24h.abs();
    if abs_change >= 30.0 {
        100.0
    } else if abs_change >= 15.0 {
        85.0
    } else if abs_change >= 8.0 {
        70.0
    } else if abs_change >= 4.0 {
        55.0
    } else if abs_change >= 2.0 {
        35.0
    } else {
        15.0
    }
}

/// Market-cap sizing: the $100M–$1B band is the sweet spot of size vs.
/// stability. Mega caps move too slowly, micro caps carry rug risk.
///
/// | market cap | score |
/// |------------|-------|
/// | >= $1B     | 85    |
/// | >= $100M   | 100   |
/// | >= $10M    | 70    |
/// | >= $1M     | 40    |
/// | < $1M      | 0     |
pub fn market_cap_score(market_cap_usd: f64) -> f64 {
    if market_cap_usd >= 1_000_000_000.0 {
        85.0
    } else if market_cap_usd >= 100_000_000.0 {
        100.0
    } else if market_cap_usd >= 10_000_000.0 {
        70.0
    } else if market_cap_usd >= 1_000_000.0 {
        40.0
    } else {
        0.0
    }
}

/// Consistency: without tick history, approximate "sustained vs. spike"
/// from volume/move proportionality. A large move carried by thin volume
/// looks like a single print; a move backed by proportional turnover
/// looks sustained.
///
/// `prop = (volume/mcap) / (abs(pct)/100)` — turnover per unit of move.
///
/// | prop    | score |
/// |---------|-------|
/// | >= 1.0  | 90    |
/// | >= 0.5  | 75    |
/// | >= 0.25 | 60    |
/// | >= 0.1  | 40    |
/// | < 0.1   | 20    |
///
/// Moves under 0.5% score a neutral 50 — too small to judge either way.
pub fn consistency_score(percent_change_24h: f64, volume_24h_usd: f64, market_cap_usd: f64) -> f64 {
    if market_cap_usd <= 0.0 {
        return 0.0;
    }
    let abs_change = percent_change_24h.abs();
    if abs_change < 0.5 {
        return 50.0;
    }

    let ratio = volume_24h_usd / market_cap_usd;
    let prop = ratio / (abs_change / 100.0);
    if prop >= 1.0 {
        90.0
    } else if prop >= 0.5 {
        75.0
    } else if prop >= 0.25 {
        60.0
    } else if prop >= 0.1 {
        40.0
    } else {
        20.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
