use crate::commands::inventory::{load_inventory_or_default, update_inventory};
use crate::error::{CorruptRecord, Result, VendorError};
use crate::model::{local_now, Loaded, Money, SaleRecord, SalesSummary, TIMESTAMP_FORMAT};
use crate::store::{self, FileState};
use chrono::NaiveDateTime;
use std::path::Path;

pub const LEDGER_COLUMNS: [&str; 4] = ["timestamp", "item_name", "quantity", "total_price"];

/// A logged total may differ from quantity x unit price by at most one cent.
const PRICE_TOLERANCE_CENTS: u64 = 1;

/// Appends one sale to the ledger after checking it against the inventory.
pub fn log_sale(
    sales_path: &Path,
    inventory_path: &Path,
    item_name: &str,
    quantity: i64,
    total_price: Money,
) -> Result<SaleRecord> {
    log_sale_at(
        sales_path,
        inventory_path,
        item_name,
        quantity,
        total_price,
        local_now(),
    )
}

pub(crate) fn log_sale_at(
    sales_path: &Path,
    inventory_path: &Path,
    item_name: &str,
    quantity: i64,
    total_price: Money,
    now: NaiveDateTime,
) -> Result<SaleRecord> {
    let item_name = item_name.trim();
    if item_name.is_empty() {
        return Err(VendorError::validation("Item name cannot be empty"));
    }
    if quantity <= 0 {
        return Err(VendorError::validation(format!(
            "Sale quantity must be positive, got {}",
            quantity
        )));
    }
    let quantity = u32::try_from(quantity)
        .map_err(|_| VendorError::validation("Sale quantity is too large"))?;
    if !total_price.is_positive() {
        return Err(VendorError::validation(format!(
            "Sale total must be positive, got {}",
            total_price
        )));
    }

    let inventory = load_inventory_or_default(inventory_path)?.value;
    let item = inventory.get(item_name).ok_or_else(|| {
        VendorError::validation(format!("{} not found in inventory", item_name))
    })?;

    let expected = line_total(item.price, quantity, item_name)?;
    if total_price.distance(expected) > PRICE_TOLERANCE_CENTS {
        return Err(VendorError::validation(format!(
            "Total {} does not match {} x {} = {}",
            total_price.dollars(),
            quantity,
            item.price.dollars(),
            expected.dollars()
        )));
    }

    let record = SaleRecord {
        timestamp: now,
        item_name: item_name.to_string(),
        quantity,
        total_price,
    };
    let timestamp = record.timestamp.format(TIMESTAMP_FORMAT).to_string();
    let quantity = record.quantity.to_string();
    let total = record.total_price.to_string();
    let row = encode_row(&[
        timestamp.as_str(),
        record.item_name.as_str(),
        quantity.as_str(),
        total.as_str(),
    ])?;
    store::append_record(sales_path, Some(&encode_row(&LEDGER_COLUMNS)?), &row)?;

    tracing::info!(
        item = %record.item_name,
        quantity = record.quantity,
        total = %record.total_price,
        "sale logged"
    );
    Ok(record)
}

/// Sells `quantity` units at the catalog price and takes them out of stock.
pub fn record_sale(
    sales_path: &Path,
    inventory_path: &Path,
    item_name: &str,
    quantity: i64,
) -> Result<SaleRecord> {
    let item_name = item_name.trim();
    let inventory = load_inventory_or_default(inventory_path)?.value;
    let item = inventory.get(item_name).ok_or_else(|| {
        VendorError::validation(format!("{} not found in inventory", item_name))
    })?;

    if quantity > i64::from(item.quantity) {
        return Err(VendorError::validation(format!(
            "Not enough {} in inventory ({} left, {} requested)",
            item_name, item.quantity, quantity
        )));
    }

    let total = match u32::try_from(quantity) {
        Ok(units) if units > 0 => line_total(item.price, units, item_name)?,
        _ => Money::ZERO,
    };
    let record = log_sale(sales_path, inventory_path, item_name, quantity, total)?;

    let remaining = i64::from(item.quantity) - i64::from(record.quantity);
    update_inventory(inventory_path, item_name, remaining, item.price)?;
    Ok(record)
}

/// Reads every well-formed sale. An absent ledger is `NotFound`.
pub fn read_sales(path: &Path) -> Result<Loaded<Vec<SaleRecord>>> {
    let content = store::read_state(path)?.require(path)?;
    parse_ledger(&content)
}

/// Reads the ledger, treating an absent file as having no sales.
pub fn load_sales_or_default(path: &Path) -> Result<Loaded<Vec<SaleRecord>>> {
    match store::read_state(path)? {
        FileState::Absent => Ok(Loaded::clean(Vec::new())),
        state => parse_ledger(state.contents()),
    }
}

/// Aggregates the whole ledger.
pub fn read_sales_report(path: &Path) -> Result<Loaded<SalesSummary>> {
    let Loaded { value, skipped } = read_sales(path)?;
    Ok(Loaded {
        value: SalesSummary::from_records(&value)?,
        skipped,
    })
}

/// `price × quantity`, or a validation error when it does not fit.
fn line_total(price: Money, quantity: u32, item_name: &str) -> Result<Money> {
    price.checked_mul(quantity).ok_or_else(|| {
        VendorError::validation(format!(
            "{} x {} {} is too large to total",
            quantity,
            price.dollars(),
            item_name
        ))
    })
}

pub(crate) fn parse_ledger(content: &str) -> Result<Loaded<Vec<SaleRecord>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (idx, row) in reader.records().enumerate() {
        let fallback_line = idx + 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(fallback_line);
                skip(&mut skipped, line, e.to_string());
                continue;
            }
        };
        let line = row
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        if row.iter().all(str::is_empty) {
            continue;
        }
        if row.get(0) == Some(LEDGER_COLUMNS[0]) {
            continue;
        }

        match parse_row(&row) {
            Ok(record) => records.push(record),
            Err(reason) => skip(&mut skipped, line, reason),
        }
    }

    Ok(Loaded {
        value: records,
        skipped,
    })
}

fn parse_row(row: &csv::StringRecord) -> std::result::Result<SaleRecord, String> {
    if row.len() != LEDGER_COLUMNS.len() {
        return Err(format!(
            "expected {} columns, found {}",
            LEDGER_COLUMNS.len(),
            row.len()
        ));
    }

    let timestamp = NaiveDateTime::parse_from_str(&row[0], TIMESTAMP_FORMAT)
        .map_err(|_| format!("timestamp '{}' is not {}", &row[0], TIMESTAMP_FORMAT))?;
    let item_name = row[1].to_string();
    if item_name.is_empty() {
        return Err("item name is empty".to_string());
    }
    let quantity: u32 = row[2]
        .parse()
        .map_err(|_| format!("quantity '{}' is not a number", &row[2]))?;
    if quantity == 0 {
        return Err("quantity is zero".to_string());
    }
    let total_price: Money = row[3]
        .parse()
        .map_err(|_| format!("total price '{}' is not a number", &row[3]))?;
    if !total_price.is_positive() {
        return Err(format!("total price {} is not positive", total_price));
    }

    Ok(SaleRecord {
        timestamp,
        item_name,
        quantity,
        total_price,
    })
}

fn skip(skipped: &mut Vec<CorruptRecord>, line: usize, reason: impl Into<String>) {
    let record = CorruptRecord::new(line, reason);
    tracing::warn!("skipping sales {}", record);
    skipped.push(record);
}

fn encode_row(fields: &[&str]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| VendorError::Io(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes)
        .map_err(|e| VendorError::validation(format!("sale row is not valid UTF-8: {}", e)))
}
