//! Briefing rendering.
//!
//! Pure text generation: ranked analyses in, a Telegram-ready briefing
//! out. The current time is passed in so rendering stays deterministic
//! and testable.

pub mod telegram;

use chrono::{DateTime, Utc};

use crate::types::TokenAnalysis;

/// Telegram rejects messages longer than this (in characters).
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Render the full market briefing for one cycle.
///
/// Output longer than [`TELEGRAM_MESSAGE_LIMIT`] is truncated on a
/// character boundary so multi-byte symbols are never split.
pub fn render_briefing(
    gainers: &[TokenAnalysis],
    losers: &[TokenAnalysis],
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "🤖 PULSE Market Briefing\n📅 {}\n",
        now.format("%Y-%m-%d %H:%M UTC")
    ));

    if !gainers.is_empty() {
        out.push_str("\n📈 TOP GAINER OPPORTUNITIES\n");
        for (rank, analysis) in gainers.iter().enumerate() {
            out.push_str(&format!("\n{}. {analysis}\n   {}\n", rank + 1, analysis.reasoning));
        }
    }

    if !losers.is_empty() {
        out.push_str("\n📉 TOP LOSER OPPORTUNITIES\n");
        for (rank, analysis) in losers.iter().enumerate() {
            out.push_str(&format!("\n{}. {analysis}\n   {}\n", rank + 1, analysis.reasoning));
        }
    }

    out.push_str(
        "\n⚠️ Not financial advice. Always DYOR.\n#crypto #trading #marketanalysis",
    );

    truncate_chars(&out, TELEGRAM_MESSAGE_LIMIT)
}

/// Briefing used when both sides came back empty: the agent still
/// posts, so a silent cycle is distinguishable from a dead one.
pub fn render_fallback(now: DateTime<Utc>) -> String {
    format!(
        "🤖 PULSE Market Briefing\n📅 {}\n\n\
         😴 No tradeable opportunities passed the quality filter this cycle.\n\
         The market may be quiet, or every mover was too small or illiquid.\n\n\
         ⚠️ Not financial advice. Always DYOR.\n#crypto #trading #marketanalysis",
        now.format("%Y-%m-%d %H:%M UTC")
    )
}

/// Truncate to at most `limit` characters without splitting a char.
fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    text.chars().take(limit).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
