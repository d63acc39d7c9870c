//! Obligation model
//!
//! An obligation is an accounting record (income, expense, or capital
//! expenditure) expected to eventually correspond to a bank movement. The
//! three kinds share one shape, tagged by [`ObligationKind`]. State
//! progresses `Forecast -> Reconciled | SettledOutOfBand` and never reverts
//! automatically.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{MovementId, ObligationId};
use super::money::Money;

/// The kind of accounting record an obligation represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    /// Expected incoming payment (matched against inflows)
    Income,
    /// Expected outgoing payment (matched against outflows)
    Expense,
    /// Capital expenditure (matched against outflows)
    Capex,
}

impl ObligationKind {
    /// All kinds, in matching order
    pub const ALL: [ObligationKind; 3] = [Self::Income, Self::Expense, Self::Capex];

    /// Kinds eligible to match a movement of the given direction:
    /// inflows match income only, outflows match expenses and capex
    pub fn for_inflow(inflow: bool) -> &'static [ObligationKind] {
        if inflow {
            &[Self::Income]
        } else {
            &[Self::Expense, Self::Capex]
        }
    }
}

impl fmt::Display for ObligationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Capex => write!(f, "capex"),
        }
    }
}

impl std::str::FromStr for ObligationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "capex" => Ok(Self::Capex),
            other => Err(format!("unknown obligation kind: {}", other)),
        }
    }
}

/// Lifecycle state of an obligation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObligationState {
    /// Outstanding; eligible for matching
    #[default]
    Forecast,
    /// Linked 1:1 to a movement; terminal
    Reconciled,
    /// Settled without a bank movement (cash, card); terminal
    SettledOutOfBand,
}

impl fmt::Display for ObligationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forecast => write!(f, "Forecast"),
            Self::Reconciled => write!(f, "Reconciled"),
            Self::SettledOutOfBand => write!(f, "SettledOutOfBand"),
        }
    }
}

/// What an obligation is linked to once it leaves `Forecast`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementLink {
    /// Linked to a persisted movement
    Movement(MovementId),
    /// Sentinel for settlement that never appears as a bank movement
    OutOfBand,
}

/// An accounting record expected to correspond to a movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obligation {
    /// Unique identifier
    pub id: ObligationId,

    /// Income, expense, or capex
    pub kind: ObligationKind,

    /// Counterparty text used for similarity scoring
    pub counterparty_text: String,

    /// Expected amount (unsigned magnitude)
    pub expected_amount: Money,

    /// Expected payment date
    pub expected_date: NaiveDate,

    /// Lifecycle state
    #[serde(default)]
    pub state: ObligationState,

    /// Link established on reconciliation or settlement
    pub linked_movement: Option<MovementLink>,

    /// Payment method recorded on out-of-band settlement
    pub payment_method: Option<String>,

    /// Settlement date recorded on out-of-band settlement
    pub settled_date: Option<NaiveDate>,

    /// Free-form notes
    pub notes: Option<String>,

    /// Optimistic concurrency version, bumped on every write
    #[serde(default)]
    pub version: u64,

    /// When the obligation was created
    pub created_at: DateTime<Utc>,

    /// When the obligation was last modified
    pub updated_at: DateTime<Utc>,
}

impl Obligation {
    /// Create a new forecast obligation
    pub fn new(
        kind: ObligationKind,
        counterparty_text: impl Into<String>,
        expected_amount: Money,
        expected_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObligationId::new(),
            kind,
            counterparty_text: counterparty_text.into(),
            expected_amount: expected_amount.abs(),
            expected_date,
            state: ObligationState::Forecast,
            linked_movement: None,
            payment_method: None,
            settled_date: None,
            notes: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this obligation is outstanding and eligible for matching
    pub fn is_forecast(&self) -> bool {
        self.state == ObligationState::Forecast
    }

    /// Link to a movement and mark reconciled
    pub fn link_movement(&mut self, movement_id: MovementId) {
        self.linked_movement = Some(MovementLink::Movement(movement_id));
        self.state = ObligationState::Reconciled;
        self.updated_at = Utc::now();
    }

    /// Mark as settled out of band (cash/card payment with no movement)
    pub fn settle_out_of_band(
        &mut self,
        method: impl Into<String>,
        date: NaiveDate,
        notes: Option<String>,
    ) {
        self.linked_movement = Some(MovementLink::OutOfBand);
        self.state = ObligationState::SettledOutOfBand;
        self.payment_method = Some(method.into());
        self.settled_date = Some(date);
        if notes.is_some() {
            self.notes = notes;
        }
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Obligation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.kind, self.expected_date, self.expected_amount, self.counterparty_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_obligation() -> Obligation {
        Obligation::new(
            ObligationKind::Expense,
            "John Doe",
            Money::from_cents(120000),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
    }

    #[test]
    fn test_new_obligation_defaults() {
        let o = test_obligation();
        assert_eq!(o.state, ObligationState::Forecast);
        assert!(o.linked_movement.is_none());
        assert!(o.is_forecast());
    }

    #[test]
    fn test_expected_amount_is_unsigned() {
        let o = Obligation::new(
            ObligationKind::Expense,
            "X",
            Money::from_cents(-5000),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        );
        assert_eq!(o.expected_amount.cents(), 5000);
    }

    #[test]
    fn test_link_movement() {
        let mut o = test_obligation();
        let movement_id = MovementId::new();
        o.link_movement(movement_id);

        assert_eq!(o.state, ObligationState::Reconciled);
        assert_eq!(o.linked_movement, Some(MovementLink::Movement(movement_id)));
        assert!(!o.is_forecast());
    }

    #[test]
    fn test_settle_out_of_band() {
        let mut o = test_obligation();
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        o.settle_out_of_band("cash", date, Some("paid at office".into()));

        assert_eq!(o.state, ObligationState::SettledOutOfBand);
        assert_eq!(o.linked_movement, Some(MovementLink::OutOfBand));
        assert_eq!(o.payment_method.as_deref(), Some("cash"));
        assert_eq!(o.settled_date, Some(date));
        assert_eq!(o.notes.as_deref(), Some("paid at office"));
    }

    #[test]
    fn test_kinds_for_direction() {
        assert_eq!(ObligationKind::for_inflow(true), &[ObligationKind::Income]);
        assert_eq!(
            ObligationKind::for_inflow(false),
            &[ObligationKind::Expense, ObligationKind::Capex]
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "capex".parse::<ObligationKind>().unwrap(),
            ObligationKind::Capex
        );
        assert!("loan".parse::<ObligationKind>().is_err());
    }
}
