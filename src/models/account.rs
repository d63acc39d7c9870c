//! Bank account model
//!
//! Accounts are the ingestion destination for movements. They carry an
//! optional IBAN used by the resolution gate and an archived flag: the
//! per-row account-existence check treats archived accounts as missing,
//! because an account can be archived between resolution and ingestion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::AccountId;

/// A bank account that movements are ingested into
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Human-readable account name
    pub name: String,

    /// IBAN, when known; used by the account resolution gate
    pub iban: Option<String>,

    /// Archived accounts reject new movements
    #[serde(default)]
    pub archived: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            name: name.into(),
            iban: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new account with an IBAN
    pub fn with_iban(name: impl Into<String>, iban: impl Into<String>) -> Self {
        let mut account = Self::new(name);
        account.iban = Some(normalize_iban(&iban.into()));
        account
    }

    /// Archive the account
    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    /// Check whether this account's IBAN matches a detected one,
    /// ignoring spacing and case
    pub fn iban_matches(&self, detected: &str) -> bool {
        match &self.iban {
            Some(iban) => *iban == normalize_iban(detected),
            None => false,
        }
    }
}

/// Strip spaces and uppercase an IBAN for comparison
pub fn normalize_iban(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new("Checking");
        assert_eq!(account.name, "Checking");
        assert!(account.iban.is_none());
        assert!(!account.archived);
    }

    #[test]
    fn test_iban_normalization() {
        let account = Account::with_iban("Checking", "es91 2100 0418 4502 0005 1332");
        assert_eq!(
            account.iban.as_deref(),
            Some("ES9121000418450200051332")
        );
        assert!(account.iban_matches("ES91 2100 0418 4502 0005 1332"));
        assert!(!account.iban_matches("ES9121000418450200051333"));
    }

    #[test]
    fn test_iban_match_without_iban() {
        let account = Account::new("Cash");
        assert!(!account.iban_matches("ES9121000418450200051332"));
    }

    #[test]
    fn test_archive() {
        let mut account = Account::new("Old");
        account.archive();
        assert!(account.archived);
    }
}
