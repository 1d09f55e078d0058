//! Charges command - compute the fee report, optionally evaluate the
//! reward:risk ratio and append the trade to the journal

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use brokerage_tools::fees::FeeCalculator;
use brokerage_tools::journal::{date_key, JournalStore};
use brokerage_tools::risk::{reward_risk, RiskReward};
use brokerage_tools::types::{JournalEntry, OrderCategory, Outcome, Side, TradeParams};
use brokerage_tools::Config;

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: &Config,
    category: &str,
    buy: f64,
    sell: f64,
    qty: i64,
    days: u32,
    side: Option<String>,
    second_leg: Option<f64>,
    journal_path: Option<String>,
) -> Result<()> {
    let category = OrderCategory::parse(category, days)?;
    let trade = TradeParams::new(buy, sell, qty)?;

    let report = FeeCalculator::new(trade).calculate(category);
    info!(
        "Computed {} charges for {} units: total {:.2}",
        category,
        trade.quantity(),
        report.total_charges
    );

    println!("\n{}", "=".repeat(60));
    println!("CHARGES — {}", report.category_label.to_uppercase());
    println!("{}", "=".repeat(60));
    println!("  Turnover:             {:.2}", trade.turnover());
    println!("  Average price:        {:.2}", trade.avg_price());
    println!("  Brokerage:            {:.2}", report.breakdown.brokerage);
    println!("  STT:                  {:.2}", report.breakdown.stt);
    println!("  SEBI fee:             {:.4}", report.breakdown.sebi);
    println!("  Stamp duty:           {:.4}", report.breakdown.stamp_duty);
    println!("  Exchange charge:      {:.4}", report.breakdown.exchange);
    if let OrderCategory::DeliveryCashPlus { days } = category {
        println!(
            "  Interest ({} days):    {:.2}",
            days, report.breakdown.interest
        );
    }
    println!("  GST (18%):            {:.2}", report.breakdown.gst);
    println!("{}", "-".repeat(60));
    println!("  Total charges:        {:.2}", report.total_charges);
    println!("  Points to break even: {:.4}", report.break_even);
    println!("  Net profit:           {:.2}", report.net_profit);
    println!("{}", "=".repeat(60));

    // Reward:risk and journaling only when both inputs are present
    let (side, second_leg) = match (side, second_leg) {
        (Some(s), Some(leg)) => (s.parse::<Side>()?, leg),
        (None, None) => return Ok(()),
        _ => bail!("--side and --second-leg must be given together"),
    };

    let ratio = match reward_risk(&trade, side, second_leg) {
        RiskReward::Ratio(r) => r,
        RiskReward::Undefined => {
            warn!("Second leg {} gives zero risk, nothing journaled", second_leg);
            bail!("undefined ratio: second leg {} leaves zero risk", second_leg);
        }
    };
    println!("  Reward:Risk ratio:    {:.4}", ratio);

    let now = chrono::Local::now();
    let entry = JournalEntry {
        order_type: category.label().to_string(),
        position: side,
        ratio,
        time: now.format("%H:%M:%S").to_string(),
        result: Outcome::from_net_profit(report.net_profit),
        net_pl: report.net_profit,
        quantity: trade.quantity(),
    };

    let path = journal_path.unwrap_or_else(|| config.journal.path.clone());
    let mut store = JournalStore::open(&path);
    store
        .append(now.date_naive(), entry)
        .context("Failed to append journal entry")?;
    info!(
        "Journaled {} {} trade under {}",
        side,
        category,
        date_key(now.date_naive())
    );
    println!("  Journaled to:         {}", path);

    Ok(())
}
