//! CSV intake and reporting for the replay driver.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::model::Transaction;
use crate::{Amount, TransactionRequest, TransactionType};

/// Errors that can occur when parsing csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: {tx_type} missing amount")]
    MissingAmount { line: usize, tx_type: String },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    r#type: String,
    amount: Option<f64>,
    source: String,
    destination: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    id: u64,
    r#type: String,
    amount: String,
    source: String,
    destination: String,
    status: String,
}

/// Read transaction requests from a csv file.
///
/// Unrecognized type strings are not an error here: they map to
/// [`TransactionType::Unknown`] and the processor cancels them.
pub fn read_requests(
    path: impl AsRef<Path>,
) -> impl Iterator<Item = Result<TransactionRequest, CsvError>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .expect("failed to open csv file");

    reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;

            let kind = match row.r#type.as_str() {
                "deposit" => TransactionType::Deposit,
                "withdrawal" => TransactionType::Withdrawal,
                "transfer" => TransactionType::Transfer,
                "refund" => TransactionType::Refund,
                _ => TransactionType::Unknown,
            };
            let amount = row.amount.ok_or_else(|| CsvError::MissingAmount {
                line,
                tx_type: row.r#type.clone(),
            })?;

            Ok(TransactionRequest {
                kind,
                amount: Amount::from_float(amount),
                source: row.source,
                destination: row.destination.unwrap_or_default(),
            })
        })
}

/// Write the processed transaction history to stdout in csv format.
pub fn write_history(history: &[Transaction]) {
    let stdout = io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());

    for transaction in history {
        let row = OutputRow {
            id: transaction.id,
            r#type: transaction.kind.to_string(),
            amount: transaction.amount.to_string(),
            source: transaction.source.clone(),
            destination: transaction.destination.clone(),
            status: transaction.status.to_string(),
        };
        writer.serialize(&row).expect("failed to write csv row");
    }

    writer.flush().expect("failed to flush csv writer");
}
