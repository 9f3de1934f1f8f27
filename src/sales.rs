use std::collections::HashMap;
use std::io::BufRead;

use crate::record;

/// Delimiter used by the sales data file.
pub const SALES_DELIMITER: char = ',';

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("no sales entries loaded")]
    EmptyLedger,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FraudVerdict {
    NotLikely,
    Likely,
}

impl std::fmt::Display for FraudVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            FraudVerdict::NotLikely => "Sales fraud is not likely.",
            FraudVerdict::Likely => {
                "Sales fraud is likely, further investigation is recommended."
            }
        })
    }
}

/// The session's sales data, transaction id to amount. Loaded once from text
/// supplied by the caller and read-only for reporting.
pub struct SalesLedger {
    entries: HashMap<String, u64>,
    skipped: usize,
}

impl SalesLedger {
    /// Loads `id,amount` lines until an empty line or end of input. The
    /// first line is a header and is ignored. Lines with the wrong field
    /// count or an unparseable amount are skipped and counted.
    pub fn load(reader: impl BufRead) -> std::io::Result<Self> {
        let mut lines = reader.lines();
        lines.next().transpose()?;

        let mut entries = HashMap::new();
        let mut skipped = 0;
        for line in lines {
            let line = line?;
            if line.is_empty() {
                break;
            }
            match record::split(&line, SALES_DELIMITER).as_slice() {
                [id, amount] => match amount.parse::<u64>() {
                    Ok(amount) => {
                        entries.insert(id.clone(), amount);
                    }
                    Err(_) => skipped += 1,
                },
                _ => skipped += 1,
            }
        }

        Ok(Self { entries, skipped })
    }

    /// Number of malformed data lines dropped during loading.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of every sale amount.
    pub fn total(&self) -> u64 {
        self.entries.values().sum()
    }

    /// Leading-digit frequency test. In naturally occurring sales data the
    /// share of amounts with leading digit 1 sits near 30% (Benford's law),
    /// so a share inside [29, 32] percent is unremarkable and anything else
    /// is worth investigating. An empty ledger is an error, not a verdict.
    pub fn fraud_check(&self) -> Result<FraudVerdict, LedgerError> {
        if self.entries.is_empty() {
            return Err(LedgerError::EmptyLedger);
        }
        let mut freq = [0u32; 10];
        for amount in self.entries.values() {
            let leading = amount.to_string().as_bytes()[0] - b'0';
            freq[usize::from(leading)] += 1;
        }
        let pct1 = 100.0 * f64::from(freq[1]) / self.entries.len() as f64;
        if (29.0..=32.0).contains(&pct1) {
            Ok(FraudVerdict::NotLikely)
        } else {
            Ok(FraudVerdict::Likely)
        }
    }
}
