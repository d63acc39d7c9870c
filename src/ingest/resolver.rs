//! Destination-account resolution gate
//!
//! When the caller does not name a destination account, a resolver gets one
//! chance to identify it from the statement file. Anything short of a single
//! confident match stops the import before any row is touched; the caller
//! gets the candidate list and must ask the user.

use crate::error::LedgerError;
use crate::models::AccountId;
use crate::storage::AccountRepository;

use super::StatementFile;

/// One possible destination account, offered to the caller on ambiguity
#[derive(Debug, Clone, PartialEq)]
pub struct AccountCandidate {
    pub account_id: AccountId,
    pub display_name: String,
    /// Resolver confidence in [0, 1]
    pub confidence: f64,
}

/// Outcome of account resolution
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Exactly one account matched; ingestion may proceed
    Resolved { account_id: AccountId },
    /// Zero or several accounts matched; ingestion must not run.
    /// An empty candidate list means nothing matched at all.
    Ambiguous {
        detected_iban: Option<String>,
        candidates: Vec<AccountCandidate>,
    },
}

/// Resolves the destination account for a statement file
pub trait AccountResolver {
    fn resolve(&self, file: &StatementFile) -> Result<Resolution, LedgerError>;
}

/// Reference resolver: matches the IBAN detected in the file header against
/// the IBANs stored on accounts
pub struct IbanResolver<'a> {
    accounts: &'a AccountRepository,
}

impl<'a> IbanResolver<'a> {
    pub fn new(accounts: &'a AccountRepository) -> Self {
        Self { accounts }
    }
}

impl AccountResolver for IbanResolver<'_> {
    fn resolve(&self, file: &StatementFile) -> Result<Resolution, LedgerError> {
        let Some(iban) = file.detected_iban.as_deref() else {
            return Ok(Resolution::Ambiguous {
                detected_iban: None,
                candidates: Vec::new(),
            });
        };

        let matches = self.accounts.find_by_iban(iban)?;

        if matches.len() == 1 {
            return Ok(Resolution::Resolved {
                account_id: matches[0].id,
            });
        }

        Ok(Resolution::Ambiguous {
            detected_iban: Some(iban.to_string()),
            candidates: matches
                .into_iter()
                .map(|a| AccountCandidate {
                    account_id: a.id,
                    display_name: a.name,
                    confidence: 1.0,
                })
                .collect(),
        })
    }
}
