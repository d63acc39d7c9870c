//! Statement import service
//!
//! Drives the full pipeline: normalize rows, settle the destination
//! account, then run every row through duplicate guard, account check,
//! and synthetic filter before persisting.
//!
//! Per-row problems are counted and skipped; only a parse failure or an
//! unresolvable destination aborts the whole call, and those abort before
//! any row is persisted.

use crate::audit::{OperationEntry, OperationKind, OperationLogger};
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::ingest::{
    self, AccountCandidate, AccountResolver, IbanResolver, NormalizedRow, Resolution,
    StatementFile,
};
use crate::models::{AccountId, BatchId, Movement, MovementId};
use crate::storage::Storage;

/// Counters for one ingestion batch
#[derive(Debug, Default)]
pub struct IngestSummary {
    /// Movements persisted
    pub inserted: usize,
    /// Rows skipped because a movement with the same composite key exists
    pub duplicates: usize,
    /// Rows skipped for any other reason (missing account, synthetic
    /// marker, persistence failure)
    pub errors: usize,
    /// IDs of the movements created, in row order
    pub created_ids: Vec<MovementId>,
    /// One line per skipped or failed row
    pub details: Vec<String>,
}

/// Result of a completed import
#[derive(Debug)]
pub struct ImportSummary {
    pub batch_id: BatchId,
    pub inserted: usize,
    pub duplicates: usize,
    pub errors: usize,
    pub created_ids: Vec<MovementId>,
}

/// Outcome of an import call
#[derive(Debug)]
pub enum ImportOutcome {
    /// Rows were processed; see the summary for counts
    Completed(ImportSummary),
    /// The destination account is ambiguous. Nothing was persisted; the
    /// caller must ask the user to pick a candidate and call again.
    RequiresAccountSelection {
        detected_iban: Option<String>,
        candidates: Vec<AccountCandidate>,
    },
}

/// Service for importing bank statements
pub struct ImportService<'a> {
    storage: &'a Storage,
    logger: &'a OperationLogger,
    demo_mode: bool,
}

impl<'a> ImportService<'a> {
    /// Create a new import service.
    ///
    /// Demo mode is read from settings here, once, and threaded through;
    /// there is no ambient flag to flip mid-import.
    pub fn new(storage: &'a Storage, logger: &'a OperationLogger, settings: &Settings) -> Self {
        Self {
            storage,
            logger,
            demo_mode: settings.demo_mode,
        }
    }

    /// Import a parsed statement file.
    ///
    /// When `destination` is `None` the IBAN resolver gets one chance to
    /// identify the account. Several matches produce
    /// [`ImportOutcome::RequiresAccountSelection`]; zero matches fail with
    /// [`LedgerError::MissingDestinationAccount`]. Either way nothing is
    /// persisted until the destination is settled.
    pub fn import_bank_statement(
        &self,
        file: &StatementFile,
        destination: Option<AccountId>,
        actor: Option<&str>,
    ) -> LedgerResult<ImportOutcome> {
        let rows = ingest::normalize_rows(&file.rows)?;

        let account_id = match destination {
            Some(id) => id,
            None => {
                let resolver = IbanResolver::new(&self.storage.accounts);
                match resolver.resolve(file)? {
                    Resolution::Resolved { account_id } => account_id,
                    Resolution::Ambiguous {
                        detected_iban,
                        candidates,
                    } => {
                        if candidates.is_empty() {
                            return Err(LedgerError::MissingDestinationAccount(
                                file.source_name.clone(),
                            ));
                        }
                        return Ok(ImportOutcome::RequiresAccountSelection {
                            detected_iban,
                            candidates,
                        });
                    }
                }
            }
        };

        let batch_id = BatchId::new();
        let summary = self.ingest(&rows, account_id, batch_id)?;

        self.storage.movements.save()?;

        let mut entry = OperationEntry::new(OperationKind::Import)
            .with_batch(batch_id)
            .with_count("inserted", summary.inserted as u64)
            .with_count("duplicates", summary.duplicates as u64)
            .with_count("errors", summary.errors as u64);
        if let Some(actor) = actor {
            entry = entry.with_actor(actor);
        }
        for detail in &summary.details {
            entry = entry.with_detail(detail.clone());
        }
        self.logger.log(&entry)?;

        Ok(ImportOutcome::Completed(ImportSummary {
            batch_id,
            inserted: summary.inserted,
            duplicates: summary.duplicates,
            errors: summary.errors,
            created_ids: summary.created_ids,
        }))
    }

    /// Run normalized rows through the per-row pipeline and persist the
    /// survivors.
    ///
    /// Per row, in order: duplicate guard, account-existence check
    /// (archived counts as missing; accounts can disappear between
    /// resolution and ingestion), synthetic filter, insert. A failing row
    /// is counted and the batch carries on.
    pub fn ingest(
        &self,
        rows: &[NormalizedRow],
        account_id: AccountId,
        batch_id: BatchId,
    ) -> LedgerResult<IngestSummary> {
        let mut summary = IngestSummary::default();

        for (index, row) in rows.iter().enumerate() {
            if ingest::is_duplicate(&self.storage.movements, account_id, row)? {
                summary.duplicates += 1;
                continue;
            }

            if !self.storage.accounts.exists_active(account_id)? {
                summary.errors += 1;
                summary
                    .details
                    .push(format!("row {}: account {} not available", index, account_id));
                continue;
            }

            if !self.demo_mode {
                if let Some(marker) = ingest::find_synthetic_marker(&row.description) {
                    summary.errors += 1;
                    summary
                        .details
                        .push(format!("row {}: synthetic marker '{}'", index, marker));
                    continue;
                }
            }

            let movement = Movement::new(
                account_id,
                row.value_date,
                row.signed_amount(),
                row.description.clone(),
                batch_id,
                index,
            );
            let movement_id = movement.id;

            match self.storage.movements.insert(movement) {
                Ok(()) => {
                    summary.inserted += 1;
                    summary.created_ids.push(movement_id);
                }
                Err(e) => {
                    summary.errors += 1;
                    summary.details.push(format!("row {}: {}", index, e));
                }
            }
        }

        Ok(summary)
    }
}
