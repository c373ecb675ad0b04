use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "streetvend", bin_name = "streetvend", version)]
#[command(
    about = "Inventory, sales and customer feedback for a street food stall",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the data files [default: ./vendor_data]
    #[arg(
        long,
        global = true,
        env = "STREETVEND_DATA_DIR",
        value_name = "DIR",
        conflicts_with = "global"
    )]
    pub data_dir: Option<PathBuf>,

    /// Use the per-user data directory
    #[arg(short, long, global = true)]
    pub global: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show current stock and prices
    #[command(alias = "inv")]
    Inventory,

    /// Add an item or replace its quantity and price
    Stock {
        name: String,
        quantity: String,
        price: String,
    },

    /// Sell at the stocked price and take the units out of stock
    Sell { name: String, quantity: String },

    /// Log a sale with an explicit total (stock is not changed)
    LogSale {
        name: String,
        quantity: String,
        total: String,
    },

    /// Record customer feedback (rating 1-5)
    Feedback {
        customer: String,
        rating: String,
        comments: Vec<String>,
    },

    /// Summarize the whole sales ledger
    Sales,

    /// Write the daily report
    Report {
        /// Day to report on (YYYY-MM-DD) [default: today]
        #[arg(long)]
        date: Option<String>,
    },

    /// Search feedback (case-insensitive)
    Search { term: String },

    /// Copy the data files into the backup directory
    Backup,

    /// Get or set configuration
    Config {
        /// Config key (inventory-file, sales-file, feedback-file, report-file, backup-dir)
        key: Option<String>,
        /// Value to set
        value: Option<String>,
    },

    /// Create the data directory and its config
    Init,

    /// Run the interactive menu (the default)
    Menu,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("streetvend").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_stock_with_global_options_after() {
        let cli = parse(&["stock", "samosa", "50", "2.50", "--data-dir", "/tmp/x", "-v"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Stock {
                name,
                quantity,
                price,
            }) => {
                assert_eq!(name, "samosa");
                assert_eq!(quantity, "50");
                assert_eq!(price, "2.50");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn feedback_comments_are_trailing_words() {
        let cli = parse(&["feedback", "Ana", "5", "very", "crispy"]);
        match cli.command {
            Some(Commands::Feedback { comments, .. }) => {
                assert_eq!(comments, vec!["very", "crispy"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn data_dir_conflicts_with_global() {
        let res = Cli::try_parse_from(["streetvend", "--data-dir", "x", "-g", "sales"]);
        assert!(res.is_err());
    }
}
