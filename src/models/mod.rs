//! Core data models
//!
//! All persistent entities (accounts, movements, obligations) plus the
//! shared value types (money, typed ids).

pub mod account;
pub mod ids;
pub mod money;
pub mod movement;
pub mod obligation;

pub use account::Account;
pub use ids::{AccountId, BatchId, MovementId, ObligationId};
pub use money::Money;
pub use movement::{Movement, ReconciliationState};
pub use obligation::{MovementLink, Obligation, ObligationKind, ObligationState};
