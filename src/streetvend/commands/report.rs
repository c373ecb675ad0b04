use crate::commands::inventory::load_inventory_or_default;
use crate::commands::sales::load_sales_or_default;
use crate::error::{CorruptRecord, Result, VendorError};
use crate::model::{Inventory, SaleRecord, SalesSummary, TIMESTAMP_FORMAT};
use crate::store;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const RULE_WIDTH: usize = 50;

/// Everything that goes into one day's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub summary: SalesSummary,
    pub inventory: Inventory,
    pub sales: Vec<SaleRecord>,
    /// Corrupt inventory lines and ledger rows left out of the figures.
    pub skipped: Vec<CorruptRecord>,
}

/// Parses a strict, zero-padded `YYYY-MM-DD` calendar date.
pub fn parse_report_date(date: &str) -> Result<NaiveDate> {
    let date = date.trim();
    let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        .filter(|d| d.format(DATE_FORMAT).to_string() == date);
    parsed.ok_or_else(|| {
        VendorError::validation(format!("Date '{}' must be in YYYY-MM-DD format", date))
    })
}

pub fn generate_daily_report(
    inventory_path: &Path,
    sales_path: &Path,
    report_path: &Path,
    date: &str,
) -> Result<DailyReport> {
    let date = parse_report_date(date)?;

    let inventory = load_inventory_or_default(inventory_path)?;
    let ledger = load_sales_or_default(sales_path)?;

    let sales: Vec<SaleRecord> = ledger
        .value
        .into_iter()
        .filter(|sale| sale.timestamp.date() == date)
        .collect();
    let mut skipped = inventory.skipped;
    skipped.extend(ledger.skipped);

    let report = DailyReport {
        date,
        summary: SalesSummary::from_records(&sales)?,
        inventory: inventory.value,
        sales,
        skipped,
    };
    store::write_atomic(report_path, &render_report(&report))?;

    tracing::info!(
        date = %report.date,
        sales = report.summary.transaction_count,
        revenue = %report.summary.total_revenue,
        path = %report_path.display(),
        "daily report written"
    );
    Ok(report)
}

pub fn render_report(report: &DailyReport) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "DAILY SALES REPORT - {}", report.date.format(DATE_FORMAT));
    let _ = writeln!(out, "{}", heavy);
    out.push('\n');

    let _ = writeln!(out, "SALES SUMMARY");
    let _ = writeln!(out, "{}", light);
    let _ = writeln!(
        out,
        "Total Revenue: {}",
        report.summary.total_revenue.dollars()
    );
    let _ = writeln!(out, "Number of Sales: {}", report.summary.transaction_count);
    let _ = writeln!(out, "Units Sold: {}", report.summary.total_units());
    for (name, units) in &report.summary.items_sold {
        let _ = writeln!(out, "  {}: {} units", name, units);
    }
    out.push('\n');

    let _ = writeln!(out, "INVENTORY STATUS");
    let _ = writeln!(out, "{}", light);
    if report.inventory.is_empty() {
        let _ = writeln!(out, "No items in inventory");
    }
    for item in report.inventory.iter() {
        let _ = writeln!(
            out,
            "{}: {} units at {} each",
            item.name,
            item.quantity,
            item.price.dollars()
        );
    }
    out.push('\n');

    let _ = writeln!(out, "DETAILED SALES");
    let _ = writeln!(out, "{}", light);
    if report.sales.is_empty() {
        let _ = writeln!(out, "No sales recorded");
    }
    for sale in &report.sales {
        let _ = writeln!(
            out,
            "{} - {} x{} - {}",
            sale.timestamp.format(TIMESTAMP_FORMAT),
            sale.item_name,
            sale.quantity,
            sale.total_price.dollars()
        );
    }
    let _ = writeln!(out, "{}", heavy);

    out
}
