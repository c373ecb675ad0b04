use crate::error::{CorruptRecord, Result, VendorError};
use chrono::{Local, NaiveDateTime, Timelike};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Timestamp layout shared by the sales ledger and the feedback file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time, truncated to the whole seconds the data files keep.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// An amount of money held as whole cents.
///
/// Amounts are entered as decimals ("2.5", "12.50"). Digits past the second
/// decimal are rounded half away from zero on the way in, so `"12.5149"` is
/// stored as `12.51` and every later comparison is exact in cents. Amounts
/// above [`Money::MAX`] are rejected.
///
/// Arithmetic is checked: sums and products that leave the `i64` range come
/// back as `None` instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// One billion, the largest amount accepted from text.
    pub const MAX: Money = Money(100_000_000_000);

    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Absolute difference in cents.
    pub fn distance(self, other: Money) -> u64 {
        self.0.abs_diff(other.0)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    /// `$12.50` form used in reports and terminal output.
    pub fn dollars(self) -> String {
        format!("${}", self)
    }
}

impl FromStr for Money {
    type Err = VendorError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let cents = parse_cents(trimmed).ok_or_else(|| {
            VendorError::validation(format!("'{}' is not a valid amount", trimmed))
        })?;
        if cents.unsigned_abs() > Money::MAX.0.unsigned_abs() {
            return Err(VendorError::validation(format!(
                "'{}' is larger than the maximum amount {}",
                trimmed,
                Money::MAX.dollars()
            )));
        }
        Ok(Money(cents))
    }
}

/// Exact decimal parse: optional sign, digits, optional fraction.
fn parse_cents(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut frac = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = frac.next().unwrap_or(0);
    let hundredths = frac.next().unwrap_or(0);
    let round_up = frac.next().is_some_and(|d| d >= 5);

    let cents = whole
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;
    Some(if negative { -cents } else { cents })
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// A customer rating between [`MIN_RATING`] and [`MAX_RATING`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> Result<Self> {
        if (i64::from(MIN_RATING)..=i64::from(MAX_RATING)).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(VendorError::validation(format!(
                "Rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, value
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl FromStr for Rating {
    type Err = VendorError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s.trim().parse().map_err(|_| {
            VendorError::validation(format!(
                "Rating must be an integer between {} and {}",
                MIN_RATING, MAX_RATING
            ))
        })?;
        Rating::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, MAX_RATING)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u32,
    pub price: Money,
}

impl InventoryItem {
    /// Builds an item, enforcing the catalog constraints.
    pub fn new(name: &str, quantity: i64, price: Money) -> Result<Self> {
        let name = validate_item_name(name)?;
        if quantity < 0 {
            return Err(VendorError::validation(format!(
                "Quantity for '{}' cannot be negative ({})",
                name, quantity
            )));
        }
        let quantity = u32::try_from(quantity).map_err(|_| {
            VendorError::validation(format!("Quantity for '{}' is too large", name))
        })?;
        if !price.is_positive() {
            return Err(VendorError::validation(format!(
                "Price for '{}' must be greater than zero ({})",
                name, price
            )));
        }
        Ok(Self {
            name,
            quantity,
            price,
        })
    }
}

fn validate_item_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VendorError::validation("Item name cannot be empty"));
    }
    if name.contains(',') || name.contains('\n') || name.contains('\r') {
        return Err(VendorError::validation(format!(
            "Item name '{}' cannot contain commas or line breaks",
            name
        )));
    }
    Ok(name.to_string())
}

/// Snapshot of the catalog, keyed by item name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: BTreeMap<String, InventoryItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&InventoryItem> {
        self.items.get(name)
    }

    /// Inserts or overwrites by name, returning the previous entry.
    pub fn upsert(&mut self, item: InventoryItem) -> Option<InventoryItem> {
        self.items.insert(item.name.clone(), item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<InventoryItem> for Inventory {
    fn from_iter<I: IntoIterator<Item = InventoryItem>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for item in iter {
            inventory.upsert(item);
        }
        inventory
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    pub timestamp: NaiveDateTime,
    pub item_name: String,
    pub quantity: u32,
    pub total_price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub timestamp: NaiveDateTime,
    pub customer_name: String,
    pub rating: Rating,
    pub comments: String,
}

impl FeedbackEntry {
    /// The text a search term is matched against.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.customer_name,
            self.rating,
            self.comments
        )
    }
}

/// Aggregate view over a run of sale records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesSummary {
    pub total_revenue: Money,
    pub items_sold: BTreeMap<String, u64>,
    pub transaction_count: usize,
}

impl SalesSummary {
    /// Aggregates `records`. Fails when the revenue leaves the `i64` range.
    pub fn from_records<'a, I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a SaleRecord>,
    {
        let mut summary = SalesSummary::default();
        for record in records {
            summary.total_revenue = summary
                .total_revenue
                .checked_add(record.total_price)
                .ok_or_else(|| VendorError::validation("Sales revenue is too large to total"))?;
            *summary
                .items_sold
                .entry(record.item_name.clone())
                .or_insert(0) += u64::from(record.quantity);
            summary.transaction_count += 1;
        }
        Ok(summary)
    }

    pub fn total_units(&self) -> u64 {
        self.items_sold.values().sum()
    }

    pub fn unique_items(&self) -> usize {
        self.items_sold.len()
    }

    /// Item with the most units sold. Ties go to the name that sorts first.
    pub fn best_seller(&self) -> Option<(&str, u64)> {
        self.items_sold
            .iter()
            .fold(None, |best: Option<(&str, u64)>, (name, &units)| match best {
                Some((_, top)) if top >= units => best,
                _ => Some((name.as_str(), units)),
            })
    }
}

/// A value read from a data file together with the records skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loaded<T> {
    pub value: T,
    pub skipped: Vec<CorruptRecord>,
}

impl<T> Loaded<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            skipped: Vec::new(),
        }
    }
}
