//! Operation logging for ledgerlink
//!
//! Every public engine operation (import, reconciliation sweep, manual
//! link, out-of-band settlement) appends one structured entry to an
//! append-only JSONL log. Entries carry aggregate counts plus per-item
//! detail lines, so a sweep that touched forty movements is still one
//! entry.

mod entry;
mod logger;

pub use entry::{OperationEntry, OperationKind};
pub use logger::OperationLogger;
