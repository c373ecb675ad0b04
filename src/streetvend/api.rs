//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. Every UI (the
//! subcommand CLI, the interactive menu, tests) goes through [`VendorApi`].
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Resolves paths**: callers never see file names, only the data directory
//! - **Normalizes inputs**: quantities, prices and ratings arrive as the text an
//!   operator typed and are parsed here into typed values
//! - **Returns structured types** (`Result<CmdResult>`), turning recoverable
//!   conditions (absent files, skipped corrupt records) into messages
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Terminal output**: no stdout, stderr or colors

use crate::commands;
use crate::error::{Result, VendorError};
use crate::model::{Money, Rating};
use chrono::Local;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, VendorPaths};

pub struct VendorApi {
    paths: VendorPaths,
}

impl VendorApi {
    pub fn new(paths: VendorPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &VendorPaths {
        &self.paths
    }

    pub fn view_inventory(&self) -> Result<CmdResult> {
        let path = self.paths.inventory();
        match commands::inventory::read_inventory(&path) {
            Ok(loaded) => {
                let mut result = CmdResult::default().with_inventory(loaded.value);
                result.add_messages(CmdMessage::skipped(&path, &loaded.skipped));
                Ok(result)
            }
            Err(VendorError::NotFound(_)) => {
                let mut result = CmdResult::default().with_inventory(Default::default());
                result.add_message(CmdMessage::info(
                    "No inventory yet. Add items with option 2 or `streetvend stock`.",
                ));
                Ok(result)
            }
            Err(e) => Err(e),
        }
    }

    pub fn update_inventory(&self, name: &str, quantity: &str, price: &str) -> Result<CmdResult> {
        let quantity = parse_quantity(quantity)?;
        let price = parse_price(price)?;

        let path = self.paths.inventory();
        let loaded = commands::inventory::update_inventory(&path, name, quantity, price)?;

        let mut result = CmdResult::default();
        for record in &loaded.skipped {
            result.add_message(CmdMessage::warning(format!(
                "Dropped unreadable inventory {} while rewriting",
                record
            )));
        }
        result.add_message(CmdMessage::success(format!(
            "Inventory updated for {}: {} units at {}",
            loaded.value.name,
            loaded.value.quantity,
            loaded.value.price.dollars()
        )));
        Ok(result.with_affected_items(vec![loaded.value]))
    }

    /// Sells at the catalog price and takes the units out of stock.
    pub fn record_sale(&self, item_name: &str, quantity: &str) -> Result<CmdResult> {
        let quantity = parse_quantity(quantity)?;
        let sale = commands::sales::record_sale(
            &self.paths.sales(),
            &self.paths.inventory(),
            item_name,
            quantity,
        )?;

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Sale recorded: {} {} for {}",
            sale.quantity,
            sale.item_name,
            sale.total_price.dollars()
        )));
        Ok(result.with_sale(sale))
    }

    /// Appends a sale with an explicit total. Stock is left unchanged.
    pub fn log_sale(&self, item_name: &str, quantity: &str, total: &str) -> Result<CmdResult> {
        let quantity = parse_quantity(quantity)?;
        let total = parse_price(total)?;
        let sale = commands::sales::log_sale(
            &self.paths.sales(),
            &self.paths.inventory(),
            item_name,
            quantity,
            total,
        )?;

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Sale logged: {} {} for {}",
            sale.quantity,
            sale.item_name,
            sale.total_price.dollars()
        )));
        Ok(result.with_sale(sale))
    }

    pub fn submit_feedback(
        &self,
        customer_name: &str,
        rating: &str,
        comments: &str,
    ) -> Result<CmdResult> {
        let rating: Rating = rating.parse()?;
        let entry = commands::feedback::save_customer_feedback(
            &self.paths.feedback(),
            customer_name,
            i64::from(rating.value()),
            comments,
        )?;

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Feedback from {} saved",
            entry.customer_name
        )));
        Ok(result.with_feedback(vec![entry]))
    }

    pub fn sales_report(&self) -> Result<CmdResult> {
        let path = self.paths.sales();
        match commands::sales::read_sales_report(&path) {
            Ok(loaded) => {
                let mut result = CmdResult::default().with_summary(loaded.value);
                result.add_messages(CmdMessage::skipped(&path, &loaded.skipped));
                Ok(result)
            }
            Err(VendorError::NotFound(_)) => {
                let mut result = CmdResult::default();
                result.add_message(CmdMessage::info("No sales data available"));
                Ok(result)
            }
            Err(e) => Err(e),
        }
    }

    /// Writes the report for `date`, or for today when `None`.
    pub fn daily_report(&self, date: Option<&str>) -> Result<CmdResult> {
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => d.to_string(),
            None => Local::now()
                .format(commands::report::DATE_FORMAT)
                .to_string(),
        };
        let report_path = self.paths.report();
        let report = commands::report::generate_daily_report(
            &self.paths.inventory(),
            &self.paths.sales(),
            &report_path,
            &date,
        )?;

        let mut result = CmdResult::default();
        for record in &report.skipped {
            result.add_message(CmdMessage::warning(format!(
                "{} (left out of the report)",
                VendorError::CorruptData(record.clone())
            )));
        }
        result.add_message(CmdMessage::success(format!(
            "Daily report generated as {}",
            report_path.display()
        )));
        Ok(result.with_report(report))
    }

    pub fn search_feedback(&self, term: &str) -> Result<CmdResult> {
        let path = self.paths.feedback();
        let loaded = commands::feedback::search_feedback(&path, term)?;

        let mut result = CmdResult::default();
        result.add_messages(CmdMessage::skipped(&path, &loaded.skipped));
        result.add_message(CmdMessage::info(format!(
            "Found {} feedback entries containing '{}'",
            loaded.value.len(),
            term
        )));
        Ok(result.with_feedback(loaded.value))
    }

    pub fn backup(&self) -> Result<CmdResult> {
        let backup_dir = self.paths.backup_dir();
        let report = commands::backup::backup_data_files(&self.paths.data_dir, &backup_dir)?;

        let mut result = CmdResult::default();
        for failure in &report.failures {
            result.add_message(CmdMessage::warning(format!(
                "Could not back up {}: {}",
                failure.source.display(),
                failure.reason
            )));
        }
        result.add_message(CmdMessage::success(format!(
            "{} files backed up to {}",
            report.count(),
            backup_dir.display()
        )));
        Ok(result.with_backup(report))
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn init(&self) -> Result<CmdResult> {
        commands::init::run(&self.paths)
    }
}

fn parse_quantity(input: &str) -> Result<i64> {
    input
        .trim()
        .parse()
        .map_err(|_| {
            VendorError::validation(format!("Quantity '{}' must be an integer", input.trim()))
        })
}

fn parse_price(input: &str) -> Result<Money> {
    input.trim().trim_start_matches('$').parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VendorConfig;
    use std::fs;
    use tempfile::TempDir;

    fn api(dir: &TempDir) -> VendorApi {
        VendorApi::new(VendorPaths::new(
            dir.path().to_path_buf(),
            VendorConfig::default(),
        ))
    }

    #[test]
    fn view_inventory_without_file_is_informational() {
        let dir = TempDir::new().unwrap();
        let res = api(&dir).view_inventory().unwrap();
        assert!(res.inventory.unwrap().is_empty());
        assert_eq!(res.messages[0].level, MessageLevel::Info);
    }

    #[test]
    fn update_inventory_parses_operator_text() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir);

        let res = api.update_inventory("samosa", " 50 ", "$2.5").unwrap();
        assert_eq!(res.affected_items[0].price, Money::from_cents(250));

        assert!(matches!(
            api.update_inventory("samosa", "fifty", "2.50"),
            Err(VendorError::Validation(_))
        ));
        assert!(matches!(
            api.update_inventory("samosa", "5", "cheap"),
            Err(VendorError::Validation(_))
        ));
        assert!(matches!(
            api.update_inventory("samosa", "5", "1e300"),
            Err(VendorError::Validation(_))
        ));
    }

    #[test]
    fn record_sale_flows_into_reports() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir);
        api.update_inventory("samosa", "50", "2.50").unwrap();

        let res = api.record_sale("samosa", "5").unwrap();
        assert_eq!(res.sale.unwrap().total_price, Money::from_cents(1250));

        let summary = api.sales_report().unwrap().summary.unwrap();
        assert_eq!(summary.total_revenue, Money::from_cents(1250));

        let inv = api.view_inventory().unwrap().inventory.unwrap();
        assert_eq!(inv.get("samosa").unwrap().quantity, 45);
    }

    #[test]
    fn sales_report_without_ledger_is_informational() {
        let dir = TempDir::new().unwrap();
        let res = api(&dir).sales_report().unwrap();
        assert!(res.summary.is_none());
        assert_eq!(res.messages[0].content, "No sales data available");
    }

    #[test]
    fn skipped_rows_become_warnings() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("sales.csv"),
            "timestamp,item_name,quantity,total_price\n\
             2024-01-01 10:00:00,chai,x,1.00\n",
        )
        .unwrap();

        let res = api(&dir).sales_report().unwrap();
        assert_eq!(res.messages.len(), 1);
        assert_eq!(res.messages[0].level, MessageLevel::Warning);
        assert!(res.messages[0].content.starts_with("sales.csv: Corrupt record at line 2"));
    }

    #[test]
    fn feedback_rating_must_be_numeric() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir);
        assert!(api.submit_feedback("Ana", "great", "").is_err());
        api.submit_feedback("Ana", "5", "Crispy").unwrap();

        let res = api.search_feedback("crispy").unwrap();
        assert_eq!(res.feedback.len(), 1);
    }

    #[test]
    fn backup_reports_count() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir);
        api.update_inventory("chai", "10", "1.00").unwrap();
        api.submit_feedback("Ana", "4", "").unwrap();

        let res = api.backup().unwrap();
        assert_eq!(res.backup.unwrap().count(), 2);
    }

    #[test]
    fn daily_report_defaults_to_today() {
        let dir = TempDir::new().unwrap();
        let res = api(&dir).daily_report(None).unwrap();
        let today = Local::now().date_naive();
        assert_eq!(res.report.unwrap().date, today);
        assert!(dir.path().join("daily_report.txt").exists());
    }
}
