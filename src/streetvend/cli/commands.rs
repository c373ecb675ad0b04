//! # CLI Layer
//!
//! One UI client for the streetvend library, with two faces: scripted
//! subcommands and the numbered menu. Both end up in the same `handle_*`
//! functions below, so a sale recorded from the menu prints exactly what
//! `streetvend sell` prints.
//!
//! This is the only place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Resolves where the data directory lives
//! - Installs the log subscriber
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory and builds the API
//! - `handle_*()`: Per-operation handlers that call the API and print results

use super::logging;
use super::menu;
use super::print::{print_config, print_feedback, print_inventory, print_messages, print_summary};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use streetvend::api::{ConfigAction, VendorApi, VendorPaths};
use streetvend::error::{Result, VendorError};

const DEFAULT_DATA_DIR: &str = "vendor_data";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let api = init_context(&cli)?;
    tracing::debug!(data_dir = %api.paths().data_dir.display(), "using data directory");

    match cli.command {
        Some(Commands::Inventory) => handle_inventory(&api),
        Some(Commands::Stock {
            name,
            quantity,
            price,
        }) => handle_stock(&api, &name, &quantity, &price),
        Some(Commands::Sell { name, quantity }) => handle_sell(&api, &name, &quantity),
        Some(Commands::LogSale {
            name,
            quantity,
            total,
        }) => handle_log_sale(&api, &name, &quantity, &total),
        Some(Commands::Feedback {
            customer,
            rating,
            comments,
        }) => handle_feedback(&api, &customer, &rating, &comments.join(" ")),
        Some(Commands::Sales) => handle_sales(&api),
        Some(Commands::Report { date }) => handle_report(&api, date.as_deref()),
        Some(Commands::Search { term }) => handle_search(&api, &term),
        Some(Commands::Backup) => handle_backup(&api),
        Some(Commands::Config { key, value }) => handle_config(&api, key, value),
        Some(Commands::Init) => handle_init(&api),
        Some(Commands::Menu) | None => {
            let stdin = std::io::stdin();
            menu::run_menu(&api, &mut stdin.lock())
        }
    }
}

fn init_context(cli: &Cli) -> Result<VendorApi> {
    let data_dir = resolve_data_dir(cli)?;
    let paths = VendorPaths::load(data_dir)?;
    Ok(VendorApi::new(paths))
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if cli.global {
        let proj_dirs = ProjectDirs::from("com", "streetvend", "streetvend").ok_or_else(|| {
            VendorError::Config("Could not determine the per-user data directory".into())
        })?;
        return Ok(proj_dirs.data_dir().to_path_buf());
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    Ok(cwd.join(DEFAULT_DATA_DIR))
}

pub(super) fn handle_inventory(api: &VendorApi) -> Result<()> {
    let result = api.view_inventory()?;
    if let Some(inventory) = &result.inventory {
        print_inventory(inventory);
    }
    print_messages(&result.messages);
    Ok(())
}

pub(super) fn handle_stock(api: &VendorApi, name: &str, quantity: &str, price: &str) -> Result<()> {
    let result = api.update_inventory(name, quantity, price)?;
    print_messages(&result.messages);
    Ok(())
}

pub(super) fn handle_sell(api: &VendorApi, name: &str, quantity: &str) -> Result<()> {
    let result = api.record_sale(name, quantity)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_log_sale(api: &VendorApi, name: &str, quantity: &str, total: &str) -> Result<()> {
    let result = api.log_sale(name, quantity, total)?;
    print_messages(&result.messages);
    Ok(())
}

pub(super) fn handle_feedback(
    api: &VendorApi,
    customer: &str,
    rating: &str,
    comments: &str,
) -> Result<()> {
    let result = api.submit_feedback(customer, rating, comments)?;
    print_messages(&result.messages);
    Ok(())
}

pub(super) fn handle_sales(api: &VendorApi) -> Result<()> {
    let result = api.sales_report()?;
    if let Some(summary) = &result.summary {
        print_summary(summary);
    }
    print_messages(&result.messages);
    Ok(())
}

pub(super) fn handle_report(api: &VendorApi, date: Option<&str>) -> Result<()> {
    let result = api.daily_report(date)?;
    print_messages(&result.messages);
    Ok(())
}

pub(super) fn handle_search(api: &VendorApi, term: &str) -> Result<()> {
    let result = api.search_feedback(term)?;
    print_messages(&result.messages);
    print_feedback(&result.feedback);
    Ok(())
}

pub(super) fn handle_backup(api: &VendorApi) -> Result<()> {
    let result = api.backup()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(api: &VendorApi, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let show_all = matches!(action, ConfigAction::ShowAll);
    let result = api.config(action)?;
    if let Some(config) = result.config.as_ref().filter(|_| show_all) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(api: &VendorApi) -> Result<()> {
    let result = api.init()?;
    print_messages(&result.messages);
    Ok(())
}
