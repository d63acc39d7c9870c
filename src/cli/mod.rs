//! CLI command handlers
//!
//! Bridges clap argument parsing to the service layer. All business logic
//! lives in the services; handlers parse arguments, resolve user-typed
//! references to entities, and print results.

pub mod account;
pub mod import;
pub mod obligation;
pub mod reconcile;

pub use account::{handle_account_command, AccountCommands};
pub use import::handle_import_command;
pub use obligation::{handle_obligation_command, ObligationCommands};
pub use reconcile::{
    handle_auto_reconcile_command, handle_candidates_command, handle_reconcile_command,
    handle_settle_command,
};

use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Movement, Obligation, ObligationKind};
use crate::storage::Storage;

/// Resolve a user-typed account reference: exact name (case-insensitive),
/// full UUID, or the short `acc-xxxxxxxx` display form.
pub fn find_account(storage: &Storage, text: &str) -> LedgerResult<Account> {
    let accounts = storage.accounts.get_all()?;

    accounts
        .into_iter()
        .find(|a| {
            a.name.eq_ignore_ascii_case(text)
                || a.id.as_uuid().to_string() == text
                || a.id.to_string() == text
        })
        .ok_or_else(|| LedgerError::account_not_found(text))
}

/// Resolve a user-typed movement reference: full UUID or the short
/// `mov-xxxxxxxx` display form.
pub fn find_movement(storage: &Storage, text: &str) -> LedgerResult<Movement> {
    if let Ok(id) = crate::models::MovementId::from_str(text) {
        if let Some(movement) = storage.movements.get(id)? {
            return Ok(movement);
        }
    }

    storage
        .movements
        .get_all()?
        .into_iter()
        .find(|m| m.id.to_string() == text)
        .ok_or_else(|| LedgerError::movement_not_found(text))
}

/// Resolve a user-typed obligation reference within a kind
pub fn find_obligation(
    storage: &Storage,
    kind: ObligationKind,
    text: &str,
) -> LedgerResult<Obligation> {
    if let Ok(id) = crate::models::ObligationId::from_str(text) {
        if let Some(obligation) = storage.obligations.get(kind, id)? {
            return Ok(obligation);
        }
    }

    storage
        .obligations
        .get_by_kind(kind)?
        .into_iter()
        .find(|o| o.id.to_string() == text)
        .ok_or_else(|| LedgerError::obligation_not_found(text))
}
