use std::io;
use thiserror::Error;

/// Failure of a serialization call. The structure being written is never modified.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Value '{value}' of {record} field '{field}' does not fit in {width} columns")]
    FormatOverflow {
        record: &'static str,
        field: &'static str,
        value: String,
        width: usize,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

impl WriteError {
    pub(crate) fn overflow(
        record: &'static str,
        field: &'static str,
        value: impl Into<String>,
        width: usize,
    ) -> Self {
        Self::FormatOverflow {
            record,
            field,
            value: value.into(),
            width,
        }
    }
}
