//! Journal command - display persisted trade records

use anyhow::{bail, Context, Result};

use brokerage_tools::journal::JournalStore;
use brokerage_tools::types::JournalEntry;
use brokerage_tools::Config;

pub fn run(config: &Config, date: Option<String>, journal_path: Option<String>) -> Result<()> {
    let path = journal_path.unwrap_or_else(|| config.journal.path.clone());
    let store = JournalStore::open(&path);
    let journal = store.load().context("Failed to load journal")?;

    if journal.is_empty() {
        println!("Journal at {} is empty.", path);
        return Ok(());
    }

    println!("\n{}", "=".repeat(60));
    println!("TRADE JOURNAL — {}", path);
    println!("{}", "=".repeat(60));

    match date {
        Some(date) => match journal.get(&date) {
            Some(entries) => print_day(&date, entries),
            None => bail!("no journal entries for {}", date),
        },
        None => {
            for (date, entries) in journal.iter() {
                print_day(date, entries);
            }
        }
    }

    println!("{}", "=".repeat(60));
    println!("  {} entries total", journal.entry_count());

    Ok(())
}

fn print_day(date: &str, entries: &[JournalEntry]) {
    println!("\n{}:", date);
    for entry in entries {
        println!(
            "  {}  {:<16} {}  ratio {:>8.4}  qty {:>6}  [{}] netPL {:>10.2}",
            entry.time,
            entry.order_type,
            entry.position.wire_value(),
            entry.ratio,
            entry.quantity,
            match entry.result {
                brokerage_tools::types::Outcome::Profit => "P",
                brokerage_tools::types::Outcome::Loss => "L",
            },
            entry.net_pl
        );
    }
}
