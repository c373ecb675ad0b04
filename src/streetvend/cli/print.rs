use colored::Colorize;
use std::io::{self, Write};
use streetvend::api::{CmdMessage, MessageLevel};
use streetvend::config::VendorConfig;
use streetvend::model::{FeedbackEntry, Inventory, SalesSummary, TIMESTAMP_FORMAT};
use unicode_width::UnicodeWidthStr;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_inventory(inventory: &Inventory) {
    if inventory.is_empty() {
        return;
    }
    println!("\n{}", "Current Inventory:".bold());
    for line in inventory_lines(inventory) {
        println!("{}", line);
    }
}

/// Item names padded to a common display width so the figures line up.
fn inventory_lines(inventory: &Inventory) -> Vec<String> {
    let name_width = inventory
        .iter()
        .map(|item| item.name.width())
        .max()
        .unwrap_or(0);

    inventory
        .iter()
        .map(|item| {
            let padding = name_width.saturating_sub(item.name.width());
            format!(
                "  {}{}  {:>5} units at {} each",
                item.name,
                " ".repeat(padding),
                item.quantity,
                item.price.dollars()
            )
        })
        .collect()
}

pub(super) fn print_summary(summary: &SalesSummary) {
    println!("\n{}", "Sales Report:".bold());
    println!("Total Revenue: {}", summary.total_revenue.dollars().green());
    println!("Transactions: {}", summary.transaction_count);
    println!("Items Sold: {}", summary.total_units());
    println!("Unique Items: {}", summary.unique_items());
    if let Some((name, units)) = summary.best_seller() {
        println!("Best Seller: {} ({} units)", name.yellow(), units);
    }

    if !summary.items_sold.is_empty() {
        println!("\nItem Breakdown:");
        for (name, units) in &summary.items_sold {
            println!("  {}: {} units", name, units);
        }
    }
}

pub(super) fn print_feedback(entries: &[FeedbackEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "\n{}. Date: {}",
            i + 1,
            entry.timestamp.format(TIMESTAMP_FORMAT)
        );
        println!("   Customer: {}", entry.customer_name);
        println!("   Rating: {}", entry.rating);
        println!("   Comments: {}", entry.comments);
    }
}

pub(super) fn print_config(config: &VendorConfig) {
    for (key, value) in config.entries() {
        println!("{} = {}", key, value);
    }
}

/// Prints `label` without a newline and flushes so the cursor waits after it.
pub(super) fn prompt(label: &str) {
    print!("{}", label);
    let _ = io::stdout().flush();
}
