//! Duplicate guard
//!
//! A row is a duplicate when a persisted movement already carries the same
//! composite key: same account, same value date, same amount magnitude in
//! cents, same description (exact, case-sensitive). The lookup goes through
//! the repository's `(account_id, date)` index, so only same-day movements
//! are compared.

use crate::error::LedgerError;
use crate::models::AccountId;
use crate::storage::MovementRepository;

use super::NormalizedRow;

/// Check whether a normalized row collides with an existing movement
pub fn is_duplicate(
    movements: &MovementRepository,
    account_id: AccountId,
    row: &NormalizedRow,
) -> Result<bool, LedgerError> {
    let same_day = movements.get_on_date(account_id, row.value_date)?;
    Ok(same_day
        .iter()
        .any(|m| m.matches_row(row.value_date, row.amount, &row.description)))
}
