//! Brokerage Tools
//!
//! A single-user toolkit for equity and derivative traders:
//! - **Fee calculation**: per-category brokerage, statutory charges, GST,
//!   break-even offset, and net profit/loss
//! - **Reward:risk evaluation** against a stop-loss or target reference
//! - **Trade journaling**: append-only, date-keyed JSON journal with a
//!   pluggable persistence backend
//! - **Price forecasting**: calendar-feature regression over historical
//!   daily closes with a 90-day projection
//!
//! ## Fee calculation example
//! ```
//! use brokerage_tools::fees::FeeCalculator;
//! use brokerage_tools::types::{OrderCategory, TradeParams};
//!
//! let trade = TradeParams::new(100.0, 105.0, 100)?;
//! let report = FeeCalculator::new(trade).calculate(OrderCategory::Intraday);
//! assert!(report.net_profit < trade.gross_profit());
//! # Ok::<(), brokerage_tools::types::InputError>(())
//! ```

pub mod config;
pub mod fees;
pub mod forecast;
pub mod journal;
pub mod risk;
pub mod types;

pub use config::Config;
pub use fees::{ChargeBreakdown, FeeCalculator, FeeReport};
pub use journal::{FileBackend, Journal, JournalBackend, JournalStore, MemoryBackend};
pub use risk::{reward_risk, RiskReward};
pub use types::{InputError, JournalEntry, OrderCategory, Outcome, PricePoint, Side, TradeParams};
