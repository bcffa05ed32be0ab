use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::InputFile, error::ReportError};

/// Columns every result file must carry
pub const REQUIRED_COLUMNS: &[&str] = &["experiment", "name", "size", "no_warmup_avg"];
/// Columns written by the benchmark host that play no part in the comparison
pub const DROPPED_COLUMNS: &[&str] = &["timestamp", "amount", "warmup", "duration", "amount_avg"];

#[derive(Debug, Deserialize)]
struct RawRow {
    experiment: String,
    name: String,
    size: u64,
    no_warmup_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub experiment: String,
    pub name: String,
    pub size: u64,
    /// Mean execution time without warmup rounds, in microseconds
    pub no_warmup_avg: f64,
    pub source_file: String,
    pub source_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnifiedTable {
    rows: Vec<ResultRow>,
}

impl UnifiedTable {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn extend(&mut self, other: UnifiedTable) {
        self.rows.extend(other.rows);
    }
}

/// Reads every listed file in order and concatenates the rows.
/// A missing or malformed file fails the whole load.
pub fn load_table(root: &Path, file_names: &[InputFile]) -> Result<UnifiedTable, ReportError> {
    let mut table = UnifiedTable::default();
    for input in file_names {
        let part = load_file(root, input)?;
        debug!("Loaded {} rows from {}", part.len(), input.file);
        table.extend(part);
    }
    Ok(table)
}

pub fn load_file(root: &Path, input: &InputFile) -> Result<UnifiedTable, ReportError> {
    let path = input.path(root);
    if !path.is_file() {
        return Err(ReportError::MissingFile { path });
    }
    let file = std::fs::File::open(&path)?;
    read_rows(file, input)
}

pub fn read_rows<R: std::io::Read>(
    reader: R,
    input: &InputFile,
) -> Result<UnifiedTable, ReportError> {
    let csv_error = |source: csv::Error| ReportError::Csv {
        file: input.file.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(ReportError::Schema {
                file: input.file.clone(),
                column: (*column).to_owned(),
            });
        }
    }
    let (dropped, unexpected): (Vec<_>, Vec<_>) = headers
        .iter()
        .filter(|h| !REQUIRED_COLUMNS.contains(h))
        .partition(|h| DROPPED_COLUMNS.contains(h));
    debug!("{}: dropping columns {dropped:?}", input.file);
    if !unexpected.is_empty() {
        debug!("{}: ignoring extra columns {unexpected:?}", input.file);
    }

    let rows = reader
        .deserialize::<RawRow>()
        .map(|row| {
            let row = row.map_err(csv_error)?;
            Ok(ResultRow {
                experiment: row.experiment,
                name: row.name,
                size: row.size,
                no_warmup_avg: row.no_warmup_avg,
                source_file: input.file.clone(),
                source_label: input.label.clone(),
            })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;
    Ok(UnifiedTable::new(rows))
}
