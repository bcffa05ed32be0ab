use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Input file {} does not exist", path.display())]
    MissingFile { path: PathBuf },
    #[error("{file}: missing required column '{column}'")]
    Schema { file: String, column: String },
    #[error("{file}: malformed row: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),
    #[error("No rows for file '{file}', name '{name}', size {size}")]
    NoMatch {
        file: String,
        name: String,
        size: u64,
    },
    #[error("No renderable bars: {0}")]
    EmptyBars(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
