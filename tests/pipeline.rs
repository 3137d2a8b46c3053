//! End-to-end cycle tests against a deterministic in-memory provider.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use pulse::analyzer::{Analyzer, AnalyzerConfig};
use pulse::data::MarketDataProvider;
use pulse::engine;
use pulse::storage;
use pulse::types::{BatchSide, MarketSnapshot, TradingSignal};

/// Deterministic `MarketDataProvider` for testing. All batches are
/// in-memory and fully controllable from test code.
struct StubProvider {
    gainers: Vec<MarketSnapshot>,
    losers: Vec<MarketSnapshot>,
    /// If set, gainer fetches return this error.
    gainers_error: Arc<Mutex<Option<String>>>,
    /// If set, loser fetches return this error.
    losers_error: Arc<Mutex<Option<String>>>,
}

impl StubProvider {
    fn new(gainers: Vec<MarketSnapshot>, losers: Vec<MarketSnapshot>) -> Self {
        Self {
            gainers,
            losers,
            gainers_error: Arc::new(Mutex::new(None)),
            losers_error: Arc::new(Mutex::new(None)),
        }
    }

    fn set_gainers_error(&self, msg: &str) {
        *self.gainers_error.lock().unwrap() = Some(msg.to_string());
    }

    fn set_losers_error(&self, msg: &str) {
        *self.losers_error.lock().unwrap() = Some(msg.to_string());
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    async fn fetch_gainers(&self, limit: usize) -> Result<Vec<MarketSnapshot>> {
        if let Some(msg) = self.gainers_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        Ok(self.gainers.iter().take(limit).cloned().collect())
    }

    async fn fetch_losers(&self, limit: usize) -> Result<Vec<MarketSnapshot>> {
        if let Some(msg) = self.losers_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        Ok(self.losers.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn snapshot(symbol: &str, pct: f64, volume: f64, mcap: f64) -> MarketSnapshot {
    MarketSnapshot {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        price_usd: 2.5,
        percent_change_24h: pct,
        volume_24h_usd: volume,
        market_cap_usd: mcap,
    }
}

fn temp_history_path() -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("pulse_pipeline_test_{}.json", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

fn default_batches() -> (Vec<MarketSnapshot>, Vec<MarketSnapshot>) {
    let gainers = vec![
        snapshot("SOL", 12.5, 40_000_000.0, 300_000_000.0),
        snapshot("AVAX", 8.2, 15_000_000.0, 200_000_000.0),
        snapshot("DUST", 95.0, 50_000.0, 400_000.0), // filtered: micro cap
    ];
    let losers = vec![
        snapshot("ADA", -8.34, 2_500_000.0, 50_000_000.0),
        snapshot("DOT", -14.1, 20_000_000.0, 150_000_000.0),
    ];
    (gainers, losers)
}

#[tokio::test]
async fn test_full_cycle_selects_and_persists() {
    let (gainers, losers) = default_batches();
    let provider = StubProvider::new(gainers, losers);
    let analyzer = Analyzer::new(AnalyzerConfig::default());
    let history = temp_history_path();

    let report = engine::run_cycle(&provider, &analyzer, None, Some(&history), 1, 50, 5)
        .await
        .unwrap();

    assert_eq!(report.cycle_number, 1);
    assert_eq!(report.gainers_in, 3);
    assert_eq!(report.losers_in, 2);
    assert_eq!(report.gainers_selected, 2);
    assert_eq!(report.losers_selected, 2);
    assert_eq!(report.filtered_out, 1);
    assert_eq!(report.invalid_dropped, 0);
    assert!(report.briefing_len > 0);
    assert!(!report.posted); // no notifier configured

    let records = storage::load_history(Some(&history)).unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.cycle == 1));
    let symbols: Vec<&str> = records.iter().map(|r| r.analysis.symbol.as_str()).collect();
    assert!(symbols.contains(&"SOL"));
    assert!(symbols.contains(&"ADA"));
    assert!(!symbols.contains(&"DUST"));

    storage::delete_history(Some(&history)).unwrap();
}

#[tokio::test]
async fn test_cycle_history_accumulates() {
    let (gainers, losers) = default_batches();
    let provider = StubProvider::new(gainers, losers);
    let analyzer = Analyzer::new(AnalyzerConfig::default());
    let history = temp_history_path();

    engine::run_cycle(&provider, &analyzer, None, Some(&history), 1, 50, 5)
        .await
        .unwrap();
    engine::run_cycle(&provider, &analyzer, None, Some(&history), 2, 50, 5)
        .await
        .unwrap();

    let records = storage::load_history(Some(&history)).unwrap();
    assert_eq!(records.len(), 8);
    assert_eq!(records.iter().filter(|r| r.cycle == 2).count(), 4);

    storage::delete_history(Some(&history)).unwrap();
}

#[tokio::test]
async fn test_cycle_without_persistence_still_reports() {
    let (gainers, losers) = default_batches();
    let provider = StubProvider::new(gainers, losers);
    let analyzer = Analyzer::new(AnalyzerConfig::default());

    let report = engine::run_cycle(&provider, &analyzer, None, None, 1, 50, 5)
        .await
        .unwrap();
    assert_eq!(report.gainers_selected, 2);
    assert!(!report.posted);
}

#[tokio::test]
async fn test_cycle_with_empty_market() {
    let provider = StubProvider::new(Vec::new(), Vec::new());
    let analyzer = Analyzer::new(AnalyzerConfig::default());

    let report = engine::run_cycle(&provider, &analyzer, None, None, 7, 50, 5)
        .await
        .unwrap();
    assert_eq!(report.gainers_selected, 0);
    assert_eq!(report.losers_selected, 0);
    // Fallback briefing still rendered.
    assert!(report.briefing_len > 0);
}

#[tokio::test]
async fn test_one_side_fetch_failure_degrades_to_empty() {
    // Gainers endpoint is down; the loser side must still be analyzed.
    let (gainers, losers) = default_batches();
    let provider = StubProvider::new(gainers, losers);
    provider.set_gainers_error("gainers endpoint down");
    let analyzer = Analyzer::new(AnalyzerConfig::default());

    let report = engine::run_cycle(&provider, &analyzer, None, None, 1, 50, 5)
        .await
        .expect("a single failed side must not abort the cycle");
    assert_eq!(report.gainers_in, 0);
    assert_eq!(report.gainers_selected, 0);
    assert_eq!(report.losers_in, 2);
    assert_eq!(report.losers_selected, 2);
}

#[tokio::test]
async fn test_both_sides_failing_yields_fallback_briefing() {
    let (gainers, losers) = default_batches();
    let provider = StubProvider::new(gainers, losers);
    provider.set_gainers_error("outage");
    provider.set_losers_error("outage");
    let analyzer = Analyzer::new(AnalyzerConfig::default());

    let report = engine::run_cycle(&provider, &analyzer, None, None, 1, 50, 5)
        .await
        .unwrap();
    assert_eq!(report.gainers_in, 0);
    assert_eq!(report.losers_in, 0);
    assert_eq!(report.gainers_selected + report.losers_selected, 0);
    // Fallback briefing still rendered.
    assert!(report.briefing_len > 0);
}

#[tokio::test]
async fn test_cycle_is_deterministic() {
    let (gainers, losers) = default_batches();
    let provider = StubProvider::new(gainers.clone(), losers.clone());
    let analyzer = Analyzer::new(AnalyzerConfig::default());

    let first = analyzer.analyze(&gainers, &losers, 5);
    let second = analyzer.analyze(&gainers, &losers, 5);
    assert_eq!(first.best_gainers, second.best_gainers);
    assert_eq!(first.best_losers, second.best_losers);

    // And the engine sees the same selections the analyzer does.
    let report = engine::run_cycle(&provider, &analyzer, None, None, 1, 50, 5)
        .await
        .unwrap();
    assert_eq!(report.gainers_selected, first.best_gainers.len());
}

#[tokio::test]
async fn test_loser_side_signals_use_loser_vocabulary() {
    let losers = vec![snapshot("ADA", -8.34, 2_500_000.0, 50_000_000.0)];
    let provider = StubProvider::new(Vec::new(), losers.clone());
    let analyzer = Analyzer::new(AnalyzerConfig::default());

    let outcome = analyzer.analyze(&[], &losers, 5);
    assert_eq!(outcome.best_losers.len(), 1);
    let a = &outcome.best_losers[0];
    assert_eq!(a.side, BatchSide::Loser);
    assert_eq!(a.trading_signal, TradingSignal::BouncePlay);

    let report = engine::run_cycle(&provider, &analyzer, None, None, 1, 50, 5)
        .await
        .unwrap();
    assert_eq!(report.losers_selected, 1);
}
