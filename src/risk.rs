//! Reward:risk evaluation
//!
//! Computes the reward:risk ratio of a trade against a second-leg reference
//! price (stop loss for longs, target for shorts). A zero-risk setup has no
//! defined ratio and is reported as such instead of dividing by zero.

use std::fmt;

use crate::types::{Side, TradeParams};

/// Result of a reward:risk evaluation
///
/// A ratio of exactly 0.0 (zero reward over nonzero risk) is a legitimate
/// value; only zero risk is undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskReward {
    Ratio(f64),
    /// Second leg coincides with the entry, risk is zero
    Undefined,
}

impl RiskReward {
    pub fn as_ratio(&self) -> Option<f64> {
        match self {
            RiskReward::Ratio(r) => Some(*r),
            RiskReward::Undefined => None,
        }
    }
}

impl fmt::Display for RiskReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskReward::Ratio(r) => write!(f, "{:.4}", r),
            RiskReward::Undefined => write!(f, "undefined (zero risk)"),
        }
    }
}

/// Evaluate the reward:risk ratio of a trade
///
/// For a buy the risk is the distance from entry down to the second leg;
/// for a sell it is the distance from exit up to the second leg. Reward is
/// the captured move in both cases.
pub fn reward_risk(trade: &TradeParams, side: Side, second_leg: f64) -> RiskReward {
    let reward = trade.sell_price() - trade.buy_price();
    let risk = match side {
        Side::Buy => trade.buy_price() - second_leg,
        Side::Sell => second_leg - trade.sell_price(),
    };

    if risk == 0.0 {
        RiskReward::Undefined
    } else {
        RiskReward::Ratio(reward / risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trade(buy: f64, sell: f64) -> TradeParams {
        TradeParams::new(buy, sell, 100).unwrap()
    }

    #[test]
    fn test_buy_ratio() {
        // entry 100, stop 98, exit 105: reward 5, risk 2
        let rr = reward_risk(&trade(100.0, 105.0), Side::Buy, 98.0);
        assert_relative_eq!(rr.as_ratio().unwrap(), 2.5);
    }

    #[test]
    fn test_sell_ratio() {
        // short covered at 100 after entry 105, stop 107: reward 5, risk 2
        let rr = reward_risk(&trade(100.0, 105.0), Side::Sell, 107.0);
        assert_relative_eq!(rr.as_ratio().unwrap(), 2.5);
    }

    #[test]
    fn test_zero_risk_is_undefined() {
        // second leg equal to the buy price: risk 0, must not fault
        let rr = reward_risk(&trade(100.0, 105.0), Side::Buy, 100.0);
        assert_eq!(rr, RiskReward::Undefined);
        assert_eq!(rr.as_ratio(), None);
    }

    #[test]
    fn test_zero_reward_is_a_defined_ratio() {
        let rr = reward_risk(&trade(100.0, 100.0), Side::Buy, 98.0);
        assert_eq!(rr, RiskReward::Ratio(0.0));
    }

    #[test]
    fn test_negative_ratio_passes_through() {
        // stop above entry on a long: negative risk, ratio reported as-is
        let rr = reward_risk(&trade(100.0, 105.0), Side::Buy, 102.0);
        assert_relative_eq!(rr.as_ratio().unwrap(), -2.5);
    }
}
