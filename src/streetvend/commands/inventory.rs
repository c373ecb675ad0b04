use crate::error::{CorruptRecord, Result, VendorError};
use crate::model::{Inventory, InventoryItem, Loaded, Money};
use crate::store::{self, FileState};
use std::fmt::Write as _;
use std::path::Path;

const FILE_HEADER: &str = "# Inventory - format: item_name,quantity,price";

/// Reads the catalog. An absent file is `NotFound`.
pub fn read_inventory(path: &Path) -> Result<Loaded<Inventory>> {
    let content = store::read_state(path)?.require(path)?;
    parse_inventory(&content)
}

/// Reads the catalog, treating an absent file as an empty one.
pub fn load_inventory_or_default(path: &Path) -> Result<Loaded<Inventory>> {
    match store::read_state(path)? {
        FileState::Absent => Ok(Loaded::clean(Inventory::new())),
        state => parse_inventory(state.contents()),
    }
}

/// Inserts or overwrites `name` and rewrites the whole file.
///
/// Corrupt lines skipped while loading the current file are returned so the
/// caller can tell the operator they were dropped.
pub fn update_inventory(
    path: &Path,
    name: &str,
    quantity: i64,
    price: Money,
) -> Result<Loaded<InventoryItem>> {
    let item = InventoryItem::new(name, quantity, price)?;

    let Loaded {
        value: mut inventory,
        skipped,
    } = load_inventory_or_default(path)?;
    for record in &skipped {
        tracing::warn!(
            path = %path.display(),
            "dropping unreadable inventory {} on rewrite",
            record
        );
    }

    inventory.upsert(item.clone());
    store::write_atomic(path, &render_inventory(&inventory))?;

    tracing::info!(
        item = %item.name,
        quantity = item.quantity,
        price = %item.price,
        "inventory updated"
    );
    Ok(Loaded {
        value: item,
        skipped,
    })
}

pub(crate) fn parse_inventory(content: &str) -> Result<Loaded<Inventory>> {
    let mut inventory = Inventory::new();
    let mut skipped = Vec::new();
    let mut seen_data_line = false;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let first_data_line = !seen_data_line;
        seen_data_line = true;

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            skip(
                &mut skipped,
                line_no,
                format!("expected 3 fields, found {}", fields.len()),
            );
            continue;
        }
        let (name, quantity, price) = (fields[0], fields[1], fields[2]);

        let quantity: i64 = match quantity.parse() {
            Ok(q) => q,
            Err(_) if first_data_line => {
                tracing::debug!(line = line_no, "ignoring inventory header line");
                continue;
            }
            Err(_) => {
                skip(
                    &mut skipped,
                    line_no,
                    format!("quantity '{}' is not a number", quantity),
                );
                continue;
            }
        };
        let price: Money = match price.parse() {
            Ok(p) => p,
            Err(_) => {
                skip(
                    &mut skipped,
                    line_no,
                    format!("price '{}' is not a number", price),
                );
                continue;
            }
        };
        if name.is_empty() {
            skip(&mut skipped, line_no, "item name is empty");
            continue;
        }

        let item = InventoryItem::new(name, quantity, price).map_err(|e| match e {
            VendorError::Validation(msg) => {
                VendorError::Validation(format!("inventory line {}: {}", line_no, msg))
            }
            other => other,
        })?;
        inventory.upsert(item);
    }

    Ok(Loaded {
        value: inventory,
        skipped,
    })
}

fn skip(skipped: &mut Vec<CorruptRecord>, line: usize, reason: impl Into<String>) {
    let record = CorruptRecord::new(line, reason);
    tracing::warn!("skipping inventory {}", record);
    skipped.push(record);
}

pub(crate) fn render_inventory(inventory: &Inventory) -> String {
    let mut out = String::new();
    out.push_str(FILE_HEADER);
    out.push('\n');
    for item in inventory.iter() {
        let _ = writeln!(out, "{},{},{}", item.name, item.quantity, item.price);
    }
    out
}
