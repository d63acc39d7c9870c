//! Statement ingestion pipeline
//!
//! The external bank-statement parser delivers rows as
//! `{ date, description, amount }`; everything in this module sits between
//! that contract and the movement repository. Submodules:
//!
//! - `normalize`: raw row -> canonical `NormalizedRow`
//! - `duplicate`: composite-key duplicate guard
//! - `synthetic`: demo/test data filter
//! - `resolver`: destination-account resolution gate

pub mod duplicate;
pub mod normalize;
pub mod resolver;
pub mod synthetic;

pub use duplicate::is_duplicate;
pub use normalize::{normalize_rows, Direction, NormalizedRow};
pub use resolver::{AccountCandidate, AccountResolver, IbanResolver, Resolution};
pub use synthetic::find_synthetic_marker;

use std::path::Path;

use serde::Deserialize;

use crate::error::LedgerError;

/// One transaction row as delivered by the external statement parser
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    /// Value date as text; encoding varies by bank
    pub date: String,
    /// Free-text description
    pub description: String,
    /// Signed amount in major units (negative for outflows)
    pub amount: f64,
}

/// A parsed statement file handed to the import pipeline
#[derive(Debug, Clone)]
pub struct StatementFile {
    /// Display name of the source (file name)
    pub source_name: String,
    /// IBAN detected in the file header, when the parser found one
    pub detected_iban: Option<String>,
    /// Parsed transaction rows
    pub rows: Vec<RawRow>,
}

/// Row shape for the CSV stand-in parser
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    description: String,
    amount: f64,
    #[serde(default)]
    iban: Option<String>,
}

impl StatementFile {
    /// Read a statement from a CSV file with `date,description,amount`
    /// columns and an optional `iban` column.
    ///
    /// This is the in-tree stand-in for the external parser collaborator;
    /// any parser that produces [`RawRow`]s can feed the pipeline.
    pub fn from_csv_path(path: &Path) -> Result<Self, LedgerError> {
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            LedgerError::ParseFailure(format!("{}: {}", path.display(), e))
        })?;

        let mut detected_iban = None;
        let mut rows = Vec::new();

        for record in reader.deserialize() {
            let row: CsvRow = record.map_err(|e| {
                LedgerError::ParseFailure(format!("{}: {}", path.display(), e))
            })?;

            if detected_iban.is_none() {
                if let Some(iban) = row.iban.as_deref() {
                    if !iban.trim().is_empty() {
                        detected_iban = Some(iban.trim().to_string());
                    }
                }
            }

            rows.push(RawRow {
                date: row.date,
                description: row.description,
                amount: row.amount,
            });
        }

        if rows.is_empty() {
            return Err(LedgerError::ParseFailure(format!(
                "{}: statement contains no transaction rows",
                path.display()
            )));
        }

        Ok(Self {
            source_name,
            detected_iban,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_csv_statement() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "statement.csv",
            "date,description,amount,iban\n\
             2024-01-15,Rent payment,-1200.00,ES9121000418450200051332\n\
             2024-01-16,Salary,2500.00,\n",
        );

        let file = StatementFile::from_csv_path(&path).unwrap();
        assert_eq!(file.rows.len(), 2);
        assert_eq!(file.rows[0].description, "Rent payment");
        assert_eq!(
            file.detected_iban.as_deref(),
            Some("ES9121000418450200051332")
        );
    }

    #[test]
    fn test_empty_statement_is_parse_failure() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "empty.csv", "date,description,amount\n");

        let err = StatementFile::from_csv_path(&path).unwrap_err();
        assert!(matches!(err, LedgerError::ParseFailure(_)));
    }

    #[test]
    fn test_missing_file_is_parse_failure() {
        let err =
            StatementFile::from_csv_path(Path::new("/nonexistent/statement.csv")).unwrap_err();
        assert!(matches!(err, LedgerError::ParseFailure(_)));
    }
}
