use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::CategoricalColumn;

/// Failure to produce a Dataset at startup. Always fatal.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read header row: {0}")]
    Header(#[source] csv::Error),

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("malformed row {row}: {source}")]
    MalformedRow {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("export buffer was not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for ExportError {
    fn from(err: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        ExportError::Csv(csv::Error::from(err.into_error()))
    }
}

/// Top-level error for the binary.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("unknown {column} value {value:?}; expected one of: {}", .allowed.join(", "))]
    UnknownFilterValue {
        column: CategoricalColumn,
        value: String,
        allowed: Vec<String>,
    },

    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("report formatting failed")]
    Format(#[from] std::fmt::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("input thread disconnected")]
    InputClosed(#[from] std::sync::mpsc::RecvError),
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
