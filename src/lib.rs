//! PULSE — Autonomous Crypto Market Analysis Agent
//!
//! Watches the 24h top gainers and losers, scores each survivor of a
//! quality filter on five weighted factors, and posts a ranked trading
//! briefing to Telegram on a fixed interval.

pub mod analyzer;
pub mod config;
pub mod data;
pub mod engine;
pub mod report;
pub mod storage;
pub mod types;
