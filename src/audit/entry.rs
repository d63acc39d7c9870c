//! Operation log entry structures

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::BatchId;

/// The public operations the engine records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Statement import
    Import,
    /// Unattended reconciliation sweep
    AutoReconcile,
    /// Manual movement/obligation link
    Reconcile,
    /// Out-of-band settlement
    Settle,
    /// First-run storage bootstrap
    Init,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Import => write!(f, "IMPORT"),
            OperationKind::AutoReconcile => write!(f, "AUTO-RECONCILE"),
            OperationKind::Reconcile => write!(f, "RECONCILE"),
            OperationKind::Settle => write!(f, "SETTLE"),
            OperationKind::Init => write!(f, "INIT"),
        }
    }
}

/// One operation log entry
///
/// Aggregate counts live in `counts` (e.g. `inserted`, `duplicates`);
/// `details` carries one line per notable item (a linked pair, a rejected
/// row, a warning).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationEntry {
    /// When the operation ran (UTC)
    pub timestamp: DateTime<Utc>,

    /// Which operation this records
    pub operation: OperationKind,

    /// Who triggered it, when the caller identified themselves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// The import batch involved, for import entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,

    /// Aggregate counters, sorted by name for stable output
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub counts: BTreeMap<String, u64>,

    /// Per-item detail lines
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl OperationEntry {
    /// Create a new entry for the given operation
    pub fn new(operation: OperationKind) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            actor: None,
            batch_id: None,
            counts: BTreeMap::new(),
            details: Vec::new(),
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_batch(mut self, batch_id: BatchId) -> Self {
        self.batch_id = Some(batch_id);
        self
    }

    pub fn with_count(mut self, name: impl Into<String>, value: u64) -> Self {
        self.counts.insert(name.into(), value);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation
        );

        if let Some(batch_id) = &self.batch_id {
            output.push_str(&format!(" batch {}", batch_id));
        }

        for (name, value) in &self.counts {
            output.push_str(&format!(" {}={}", name, value));
        }

        for detail in &self.details {
            output.push_str(&format!("\n  {}", detail));
        }

        output
    }
}
