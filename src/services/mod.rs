//! Service layer for ledgerlink
//!
//! Business logic on top of the storage layer: the import pipeline, the
//! matching sweep, and the reconciliation policy. Services borrow the
//! storage coordinator and the operation logger; they never own state.

pub mod import;
pub mod matching;
pub mod reconciliation;

pub use import::{ImportOutcome, ImportService, ImportSummary, IngestSummary};
pub use matching::{MatchCandidate, MatchingService, MovementCandidates};
pub use reconciliation::{AutoReconcileSummary, ReconciliationService};
