//! ledgerlink - Bank statement ingestion and reconciliation engine
//!
//! This library turns externally-parsed bank transaction rows into canonical
//! ledger entries (movements), guards against duplicate and synthetic data,
//! and computes confidence-scored matches between movements and recorded
//! obligations (income, expense, capex), auto-linking the unambiguous cases.
//!
//! # Architecture
//!
//! - `config`: Settings and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, movements, obligations)
//! - `storage`: JSON file storage layer
//! - `ingest`: Row normalization, duplicate guard, synthetic-data filter,
//!   account resolution gate
//! - `matching`: Pure confidence scoring (amount / date / text similarity)
//! - `services`: Business logic layer (import, matching, reconciliation)
//! - `audit`: Structured operation log

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod matching;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
