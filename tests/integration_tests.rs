//! Integration tests for the brokerage toolkit
//!
//! These tests verify that fee calculation, reward:risk evaluation, and
//! journaling work together end to end.

use approx::assert_relative_eq;
use chrono::{Datelike, Duration, NaiveDate};

use brokerage_tools::fees::FeeCalculator;
use brokerage_tools::forecast::{
    calendar_features, ForecastPipeline, LeastSquaresFitter, PriceHistorySource,
};
use brokerage_tools::journal::{date_key, FileBackend, JournalStore, MemoryBackend};
use brokerage_tools::risk::{reward_risk, RiskReward};
use brokerage_tools::types::{
    JournalEntry, OrderCategory, Outcome, PricePoint, Side, TradeParams,
};

// =============================================================================
// Test Utilities
// =============================================================================

fn record_trade(
    store: &mut JournalStore<impl brokerage_tools::journal::JournalBackend>,
    date: NaiveDate,
    trade: TradeParams,
    category: OrderCategory,
    side: Side,
    second_leg: f64,
) -> Option<f64> {
    let report = FeeCalculator::new(trade).calculate(category);
    let ratio = reward_risk(&trade, side, second_leg).as_ratio()?;

    store
        .append(
            date,
            JournalEntry {
                order_type: category.label().to_string(),
                position: side,
                ratio,
                time: "10:15:00".to_string(),
                result: Outcome::from_net_profit(report.net_profit),
                net_pl: report.net_profit,
                quantity: trade.quantity(),
            },
        )
        .unwrap();
    Some(report.net_profit)
}

/// Price series that is exactly linear in the calendar features
fn synthetic_history(days: usize) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
    (0..days)
        .map(|i| {
            let date = start + Duration::days(i as i64);
            let close = 2.0 * date.year() as f64 + 1.5 * date.month() as f64
                - 0.25 * date.day() as f64;
            PricePoint { date, close }
        })
        .collect()
}

struct StubSource(Vec<PricePoint>);

impl PriceHistorySource for StubSource {
    fn fetch(
        &self,
        _symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> anyhow::Result<Vec<PricePoint>> {
        Ok(self.0.clone())
    }
}

// =============================================================================
// Calculate -> evaluate -> journal
// =============================================================================

#[test]
fn test_full_trade_flow_into_journal() {
    let mut store = JournalStore::new(MemoryBackend::new());
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

    let winner = TradeParams::new(100.0, 105.0, 100).unwrap();
    let net = record_trade(
        &mut store,
        date,
        winner,
        OrderCategory::Intraday,
        Side::Buy,
        98.0,
    )
    .unwrap();
    assert!(net > 0.0 && net < 500.0);

    let loser = TradeParams::new(105.0, 100.0, 100).unwrap();
    record_trade(
        &mut store,
        date,
        loser,
        OrderCategory::Delivery,
        Side::Sell,
        107.0,
    )
    .unwrap();

    let journal = store.load().unwrap();
    let day = journal.get(&date_key(date)).unwrap();
    assert_eq!(day.len(), 2);
    assert_eq!(day[0].result, Outcome::Profit);
    assert_eq!(day[0].order_type, "Intraday");
    assert_eq!(day[1].result, Outcome::Loss);
    assert_eq!(day[1].order_type, "Delivery");
    assert_relative_eq!(day[0].ratio, 2.5);
}

#[test]
fn test_zero_risk_trade_is_not_journaled() {
    let mut store = JournalStore::new(MemoryBackend::new());
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let trade = TradeParams::new(100.0, 105.0, 100).unwrap();

    // second leg equal to the buy price: undefined ratio, no entry
    let result = record_trade(
        &mut store,
        date,
        trade,
        OrderCategory::Intraday,
        Side::Buy,
        100.0,
    );
    assert!(result.is_none());
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_undefined_ratio_matches_direct_evaluation() {
    let trade = TradeParams::new(100.0, 105.0, 100).unwrap();
    assert_eq!(reward_risk(&trade, Side::Buy, 100.0), RiskReward::Undefined);
}

// =============================================================================
// File-backed journal
// =============================================================================

#[test]
fn test_file_journal_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.json");
    let day_one = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let day_two = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
    let trade = TradeParams::new(100.0, 105.0, 100).unwrap();

    {
        let mut store = JournalStore::new(FileBackend::new(&path));
        record_trade(
            &mut store,
            day_one,
            trade,
            OrderCategory::Options,
            Side::Buy,
            95.0,
        )
        .unwrap();
    }

    // A fresh store sees the prior entry and appends under a new date
    let mut store = JournalStore::new(FileBackend::new(&path));
    record_trade(
        &mut store,
        day_two,
        trade,
        OrderCategory::Intraday,
        Side::Buy,
        95.0,
    )
    .unwrap();

    let journal = store.load().unwrap();
    assert_eq!(journal.dates().count(), 2);
    assert_eq!(journal.get("07-03-2024").unwrap()[0].order_type, "Options");
    assert_eq!(journal.get("08-03-2024").unwrap()[0].order_type, "Intraday");
}

// =============================================================================
// Fee invariants
// =============================================================================

#[test]
fn test_options_flat_brokerage_invariant() {
    for qty in [1, 500, 100_000] {
        let trade = TradeParams::new(250.0, 260.0, qty).unwrap();
        let report = FeeCalculator::new(trade).calculate(OrderCategory::Options);
        assert_relative_eq!(report.breakdown.brokerage, 40.0);
    }
}

#[test]
fn test_break_even_covers_charges_exactly() {
    let trade = TradeParams::new(100.0, 105.0, 100).unwrap();
    let report = FeeCalculator::new(trade).calculate(OrderCategory::Intraday);
    assert_relative_eq!(
        report.break_even * trade.quantity() as f64,
        report.total_charges,
        max_relative = 1e-12
    );
}

// =============================================================================
// Forecast pipeline
// =============================================================================

#[test]
fn test_forecast_pipeline_end_to_end() {
    let history = synthetic_history(600);
    let end = history.last().unwrap().date;
    let start = history.first().unwrap().date;

    let mut pipeline = ForecastPipeline::new(StubSource(history), LeastSquaresFitter::new(), 90);
    let forecast = pipeline.run("SYN", start, end).unwrap();

    assert_eq!(forecast.projection.len(), 90);
    assert!(forecast.rmse < 1e-6);

    // Projected values follow the same linear rule as the history
    for point in &forecast.projection {
        let [year, month, day] = calendar_features(point.date);
        let expected = 2.0 * year + 1.5 * month - 0.25 * day;
        assert_relative_eq!(point.close, expected, max_relative = 1e-6);
    }
}
