//! Movement model
//!
//! A movement is a ledger entry derived from one imported bank transaction
//! row. Movements are created only by the ledger ingestor, mutated only by
//! the reconciliation policy, and never deleted once persisted (duplicates
//! are rejected before creation, not cleaned up after).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, BatchId, MovementId, ObligationId};
use super::money::Money;
use super::obligation::ObligationKind;

/// Reconciliation state of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationState {
    /// Not yet linked to any obligation
    #[default]
    Unreconciled,
    /// Linked 1:1 to an obligation
    Reconciled,
    /// Settled outside the bank statement (cash, card)
    SettledOutOfBand,
}

impl fmt::Display for ReconciliationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreconciled => write!(f, "Unreconciled"),
            Self::Reconciled => write!(f, "Reconciled"),
            Self::SettledOutOfBand => write!(f, "SettledOutOfBand"),
        }
    }
}

/// A ledger entry created from an imported bank transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    /// Unique identifier
    pub id: MovementId,

    /// The account this movement belongs to
    pub account_id: AccountId,

    /// Value date of the transaction
    pub date: NaiveDate,

    /// Signed amount (positive for inflow, negative for outflow)
    pub amount: Money,

    /// Free-text description from the statement
    pub description: String,

    /// Counterparty text when the statement carries it separately
    pub counterparty_text: Option<String>,

    /// The import batch that created this movement
    pub batch_id: BatchId,

    /// Zero-based row index within the source file, for traceability
    pub source_row_index: usize,

    /// Reconciliation state
    #[serde(default)]
    pub state: ReconciliationState,

    /// The obligation this movement is linked to, once reconciled
    pub linked_obligation: Option<(ObligationKind, ObligationId)>,

    /// Optimistic concurrency version, bumped on every write
    #[serde(default)]
    pub version: u64,

    /// When the movement was created
    pub created_at: DateTime<Utc>,

    /// When the movement was last modified
    pub updated_at: DateTime<Utc>,
}

impl Movement {
    /// Create a new unreconciled movement
    pub fn new(
        account_id: AccountId,
        date: NaiveDate,
        amount: Money,
        description: impl Into<String>,
        batch_id: BatchId,
        source_row_index: usize,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: MovementId::new(),
            account_id,
            date,
            amount,
            description: description.into(),
            counterparty_text: None,
            batch_id,
            source_row_index,
            state: ReconciliationState::Unreconciled,
            linked_obligation: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is an inflow (positive amount)
    pub fn is_inflow(&self) -> bool {
        self.amount.is_positive()
    }

    /// Check if this movement is still available for matching
    pub fn is_unreconciled(&self) -> bool {
        self.state == ReconciliationState::Unreconciled
    }

    /// The text used for counterparty similarity scoring: the dedicated
    /// counterparty field when present, otherwise the description
    pub fn counterparty_or_description(&self) -> &str {
        self.counterparty_text.as_deref().unwrap_or(&self.description)
    }

    /// Link this movement to an obligation and mark it reconciled
    pub fn link_obligation(&mut self, kind: ObligationKind, obligation_id: ObligationId) {
        self.linked_obligation = Some((kind, obligation_id));
        self.state = ReconciliationState::Reconciled;
        self.updated_at = Utc::now();
    }

    /// The composite identity used by the duplicate guard:
    /// `(account_id, date, |amount| in cents, description)`.
    ///
    /// The source compared amounts with a 0.01 tolerance on the
    /// sign-normalized value; in integer cents that is equality of the
    /// magnitude. Description comparison is exact and case-sensitive.
    pub fn composite_key(&self) -> (AccountId, NaiveDate, i64, &str) {
        (
            self.account_id,
            self.date,
            self.amount.abs().cents(),
            self.description.as_str(),
        )
    }

    /// Check whether a candidate row collides with this movement's
    /// composite key
    pub fn matches_row(&self, date: NaiveDate, amount: Money, description: &str) -> bool {
        self.date == date
            && self.amount.abs().cents() == amount.abs().cents()
            && self.description == description
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}
