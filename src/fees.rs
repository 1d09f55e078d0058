//! Brokerage charge computation
//!
//! Implements the per-category charge schedule: brokerage (capped or flat),
//! securities transaction tax, SEBI turnover fee, stamp duty, exchange
//! transaction charge, Cash+ financing interest, and 18% GST on the total.
//! All values are derived per call and never persisted.

use serde::{Deserialize, Serialize};

use crate::types::{OrderCategory, TradeParams};

// =============================================================================
// Charge schedule constants
// =============================================================================

/// Brokerage ceiling for intraday and delivery orders, and the flat
/// brokerage for options
const BROKERAGE_CAP: f64 = 40.0;

const INTRADAY_BROKERAGE_RATE: f64 = 0.0002; // 0.02% of turnover
const DELIVERY_BROKERAGE_RATE: f64 = 0.002; // 0.2% of turnover

const EQUITY_STT_RATE: f64 = 0.00025; // 0.025% of qty * avg price
const OPTIONS_STT_RATE: f64 = 0.0005; // 0.05% of qty * avg price

const SEBI_RATE: f64 = 0.000002; // 0.0002% of turnover
const STAMP_RATE: f64 = 0.00003; // 0.003% of qty * avg price

const EQUITY_EXCHANGE_RATE: f64 = 0.0000325; // 0.00325% of turnover
const OPTIONS_EXCHANGE_RATE: f64 = 0.00053; // 0.053% of turnover

const CASH_PLUS_DAILY_INTEREST_RATE: f64 = 0.00025; // 0.025% of turnover per day

const GST_RATE: f64 = 0.18;

// =============================================================================
// Charge breakdown and report
// =============================================================================

/// Itemized charges for a single round trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub brokerage: f64,
    pub stt: f64,
    pub sebi: f64,
    pub stamp_duty: f64,
    pub exchange: f64,
    /// Financing interest, nonzero only for Delivery (Cash+)
    pub interest: f64,
    /// 18% GST on the sum of all of the above
    pub gst: f64,
}

impl ChargeBreakdown {
    fn pre_tax_total(&self) -> f64 {
        self.brokerage + self.stt + self.sebi + self.stamp_duty + self.exchange + self.interest
    }
}

/// Full result of a fee calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeReport {
    pub category_label: String,
    pub breakdown: ChargeBreakdown,
    /// All charges including GST
    pub total_charges: f64,
    /// Per-unit price movement required to cover all charges
    pub break_even: f64,
    /// Gross profit minus total charges
    pub net_profit: f64,
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes the charge schedule for a trade. Pure; display and journaling
/// are the caller's responsibility.
pub struct FeeCalculator {
    trade: TradeParams,
}

impl FeeCalculator {
    pub fn new(trade: TradeParams) -> Self {
        FeeCalculator { trade }
    }

    /// Compute the full fee report for the given order category
    pub fn calculate(&self, category: OrderCategory) -> FeeReport {
        let turnover = self.trade.turnover();
        let notional = self.trade.quantity() as f64 * self.trade.avg_price();

        let breakdown = match category {
            OrderCategory::Intraday => self.equity_breakdown(
                capped(turnover * INTRADAY_BROKERAGE_RATE),
                turnover,
                notional,
                0.0,
            ),
            OrderCategory::Delivery => self.equity_breakdown(
                capped(turnover * DELIVERY_BROKERAGE_RATE),
                turnover,
                notional,
                0.0,
            ),
            OrderCategory::DeliveryCashPlus { days } => self.equity_breakdown(
                capped(turnover * DELIVERY_BROKERAGE_RATE),
                turnover,
                notional,
                turnover * CASH_PLUS_DAILY_INTEREST_RATE * days as f64,
            ),
            OrderCategory::Options => {
                let mut b = ChargeBreakdown {
                    brokerage: BROKERAGE_CAP,
                    stt: notional * OPTIONS_STT_RATE,
                    sebi: turnover * SEBI_RATE,
                    stamp_duty: notional * STAMP_RATE,
                    exchange: turnover * OPTIONS_EXCHANGE_RATE,
                    interest: 0.0,
                    gst: 0.0,
                };
                b.gst = b.pre_tax_total() * GST_RATE;
                b
            }
        };

        let total_charges = breakdown.pre_tax_total() + breakdown.gst;
        FeeReport {
            category_label: category.label().to_string(),
            total_charges,
            break_even: total_charges / self.trade.quantity() as f64,
            net_profit: self.trade.gross_profit() - total_charges,
            breakdown,
        }
    }

    fn equity_breakdown(
        &self,
        brokerage: f64,
        turnover: f64,
        notional: f64,
        interest: f64,
    ) -> ChargeBreakdown {
        let mut b = ChargeBreakdown {
            brokerage,
            stt: notional * EQUITY_STT_RATE,
            sebi: turnover * SEBI_RATE,
            stamp_duty: notional * STAMP_RATE,
            exchange: turnover * EQUITY_EXCHANGE_RATE,
            interest,
            gst: 0.0,
        };
        b.gst = b.pre_tax_total() * GST_RATE;
        b
    }
}

fn capped(brokerage: f64) -> f64 {
    brokerage.min(BROKERAGE_CAP)
}
