//! Row normalization
//!
//! Turns parser output into canonical rows: sign-split amount, parsed value
//! date, and an advisory category hint.

use chrono::{NaiveDate, Utc};

use crate::error::LedgerError;
use crate::models::Money;

use super::RawRow;

/// Direction of a movement relative to the account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Money coming in (positive amount)
    In,
    /// Money going out (negative amount)
    Out,
}

/// A canonical row ready for the ingestion pipeline
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    /// Parsed value date
    pub value_date: NaiveDate,
    /// Amount magnitude (always non-negative)
    pub amount: Money,
    /// In for inflows, Out for outflows
    pub direction: Direction,
    /// Description, trimmed
    pub description: String,
    /// Advisory category keyword hit, if any
    pub category_hint: Option<&'static str>,
}

impl NormalizedRow {
    /// The signed amount a movement carries: negative for outflows
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            Direction::In => self.amount,
            Direction::Out => -self.amount,
        }
    }
}

/// Date encodings accepted from statement parsers
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Keyword -> advisory category hint. Lookup is case-insensitive substring.
const CATEGORY_KEYWORDS: [(&str, &str); 10] = [
    ("nomina", "payroll"),
    ("salary", "payroll"),
    ("alquiler", "rent"),
    ("rent", "rent"),
    ("hipoteca", "mortgage"),
    ("supermercado", "groceries"),
    ("luz", "utilities"),
    ("agua", "utilities"),
    ("seguro", "insurance"),
    ("transferencia", "transfer"),
];

/// Try the accepted date encodings in order
fn parse_value_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Advisory category from description keywords
fn category_hint(description: &str) -> Option<&'static str> {
    let lowered = description.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, category)| *category)
}

/// Normalize a single raw row.
///
/// An unparsable date falls back to today rather than failing the row; the
/// row still imports and can be corrected later. Source systems emit this
/// for balance-carryforward lines with no date column.
pub fn normalize_row(raw: &RawRow) -> NormalizedRow {
    let value_date =
        parse_value_date(&raw.date).unwrap_or_else(|| Utc::now().date_naive());

    let amount = Money::from_major(raw.amount);
    let direction = if amount.is_negative() {
        Direction::Out
    } else {
        Direction::In
    };

    let description = raw.description.trim().to_string();

    NormalizedRow {
        value_date,
        amount: amount.abs(),
        direction,
        category_hint: category_hint(&description),
        description,
    }
}

/// Normalize a batch of raw rows.
///
/// Zero rows means the upstream parser produced nothing usable; that fails
/// the whole batch before any persistence.
pub fn normalize_rows(rows: &[RawRow]) -> Result<Vec<NormalizedRow>, LedgerError> {
    if rows.is_empty() {
        return Err(LedgerError::ParseFailure(
            "statement parser produced zero rows".into(),
        ));
    }
    Ok(rows.iter().map(normalize_row).collect())
}
