//! # Streetvend Architecture
//!
//! Streetvend keeps the books of a single street food stall: what is in stock, what
//! sold and for how much, what customers said, and an end-of-day summary. Everything
//! lives as plain text files in one data directory that an operator can open and fix
//! by hand.
//!
//! The core is a library; the interactive menu and the subcommands are two clients
//! of the same API.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Subcommands and the numbered menu loop                   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses operator text (quantities, prices, ratings)       │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Inventory, sales ledger, feedback log, reports, backups  │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Absent / empty / present file states                     │
//! │  - Atomic rewrites and single-write appends                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Files
//!
//! | File              | Format                                   | Written by          |
//! |-------------------|------------------------------------------|---------------------|
//! | `inventory.txt`   | `name,quantity,price` lines              | full atomic rewrite |
//! | `sales.csv`       | CSV with a header row                    | append              |
//! | `feedback.txt`    | blank-line separated key/value blocks    | append              |
//! | `daily_report.txt`| human-readable report                    | full atomic rewrite |
//!
//! File names are configurable per data directory (see [`config`]).
//!
//! ## Damaged Files
//!
//! Readers never give up on a whole file because of one bad line. Records that do not
//! parse are collected as [`error::CorruptRecord`]s next to the good ones (see
//! [`model::Loaded`]) and surface as warnings.
//!
//! ## Money
//!
//! Prices and totals are whole cents ([`model::Money`]). A logged sale total may differ
//! from `quantity × price` by at most one cent.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: File states and write primitives
//! - [`model`]: Core data types (`Money`, `InventoryItem`, `SaleRecord`, ...)
//! - [`config`]: Per-directory file layout
//! - [`error`]: Error types
//! - `cli`: Argument parsing, the menu loop and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
