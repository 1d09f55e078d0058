//! Core data types used across the brokerage toolkit

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while validating or parsing user-supplied trade input
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("buy price must be a positive number, got {0}")]
    BuyPrice(f64),
    #[error("sell price must be a positive number, got {0}")]
    SellPrice(f64),
    #[error("quantity must be a positive integer, got {0}")]
    Quantity(i64),
    #[error("invalid order side '{0}', expected 'b'/'buy' or 's'/'sell'")]
    Side(String),
    #[error("unknown order category '{0}'")]
    Category(String),
}

/// Validated trade parameters
///
/// Construction enforces positive prices and a positive integral quantity,
/// so every later division by quantity is safe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeParams {
    buy_price: f64,
    sell_price: f64,
    quantity: u64,
}

impl TradeParams {
    pub fn new(buy_price: f64, sell_price: f64, quantity: i64) -> Result<Self, InputError> {
        if !buy_price.is_finite() || buy_price <= 0.0 {
            return Err(InputError::BuyPrice(buy_price));
        }
        if !sell_price.is_finite() || sell_price <= 0.0 {
            return Err(InputError::SellPrice(sell_price));
        }
        if quantity <= 0 {
            return Err(InputError::Quantity(quantity));
        }
        Ok(TradeParams {
            buy_price,
            sell_price,
            quantity: quantity as u64,
        })
    }

    pub fn buy_price(&self) -> f64 {
        self.buy_price
    }

    pub fn sell_price(&self) -> f64 {
        self.sell_price
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Total notional value traded: buy leg plus sell leg
    pub fn turnover(&self) -> f64 {
        (self.buy_price + self.sell_price) * self.quantity as f64
    }

    /// Average executed price across both legs
    pub fn avg_price(&self) -> f64 {
        self.turnover() / (2.0 * self.quantity as f64)
    }

    /// Gross profit before any charges
    pub fn gross_profit(&self) -> f64 {
        (self.sell_price - self.buy_price) * self.quantity as f64
    }
}

/// Order category selecting the charge schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderCategory {
    Intraday,
    Delivery,
    /// Delivery with daily financing interest over a holding period
    DeliveryCashPlus {
        days: u32,
    },
    Options,
}

impl OrderCategory {
    /// Parse a category name as given on the command line. `days` only
    /// applies to the Cash+ variant.
    pub fn parse(s: &str, days: u32) -> Result<Self, InputError> {
        match s.to_lowercase().as_str() {
            "intraday" => Ok(OrderCategory::Intraday),
            "delivery" => Ok(OrderCategory::Delivery),
            "cashplus" | "cash+" | "delivery-cashplus" => {
                Ok(OrderCategory::DeliveryCashPlus { days })
            }
            "options" => Ok(OrderCategory::Options),
            other => Err(InputError::Category(other.to_string())),
        }
    }

    /// Label used in the journal file and in reports
    pub fn label(&self) -> &'static str {
        match self {
            OrderCategory::Intraday => "Intraday",
            OrderCategory::Delivery => "Delivery",
            OrderCategory::DeliveryCashPlus { .. } => "Delivery (Cash+)",
            OrderCategory::Options => "Options",
        }
    }
}

impl fmt::Display for OrderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "b")]
    Buy,
    #[serde(rename = "s")]
    Sell,
}

impl Side {
    /// Single-letter wire value used in the journal file
    pub fn wire_value(&self) -> &'static str {
        match self {
            Side::Buy => "b",
            Side::Sell => "s",
        }
    }
}

impl FromStr for Side {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "b" | "buy" => Ok(Side::Buy),
            "s" | "sell" => Ok(Side::Sell),
            other => Err(InputError::Side(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Trade outcome recorded in the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "P")]
    Profit,
    #[serde(rename = "L")]
    Loss,
}

impl Outcome {
    pub fn from_net_profit(net_profit: f64) -> Self {
        if net_profit > 0.0 {
            Outcome::Profit
        } else {
            Outcome::Loss
        }
    }
}

/// A single journaled trade record
///
/// Field names follow the journal file format and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(rename = "orderType")]
    pub order_type: String,
    pub position: Side,
    pub ratio: f64,
    /// Wall-clock time of the append, "HH:MM:SS"
    pub time: String,
    pub result: Outcome,
    #[serde(rename = "netPL")]
    pub net_pl: f64,
    pub quantity: u64,
}

/// Daily closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_turnover_and_avg_price() {
        let trade = TradeParams::new(100.0, 105.0, 100).unwrap();
        assert_relative_eq!(trade.turnover(), 20_500.0);
        assert_relative_eq!(trade.avg_price(), 102.5);
        assert_relative_eq!(trade.gross_profit(), 500.0);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert_eq!(
            TradeParams::new(100.0, 105.0, 0),
            Err(InputError::Quantity(0))
        );
        assert_eq!(
            TradeParams::new(100.0, 105.0, -5),
            Err(InputError::Quantity(-5))
        );
    }

    #[test]
    fn test_invalid_prices_rejected() {
        assert!(matches!(
            TradeParams::new(0.0, 105.0, 10),
            Err(InputError::BuyPrice(_))
        ));
        assert!(matches!(
            TradeParams::new(100.0, -1.0, 10),
            Err(InputError::SellPrice(_))
        ));
        assert!(matches!(
            TradeParams::new(f64::NAN, 105.0, 10),
            Err(InputError::BuyPrice(_))
        ));
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("b".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("BUY".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("sell".parse::<Side>().unwrap(), Side::Sell);
        assert!(matches!("hold".parse::<Side>(), Err(InputError::Side(_))));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(OrderCategory::Intraday.label(), "Intraday");
        assert_eq!(
            OrderCategory::DeliveryCashPlus { days: 3 }.label(),
            "Delivery (Cash+)"
        );
    }
}
