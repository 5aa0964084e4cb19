//! Explicit "no data" signal for aggregation results.

use serde::Serialize;

/// Result of an aggregation over a filtered table.
///
/// An empty selection is reported as `NoData` rather than an empty table so
/// the caller can tell "nothing matched" apart from "computed nothing".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Report<T> {
    Ready(T),
    NoData,
}

impl<T> Report<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Report::NoData)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Report::Ready(value) => Some(value),
            Report::NoData => None,
        }
    }

    pub fn as_ref(&self) -> Report<&T> {
        match self {
            Report::Ready(value) => Report::Ready(value),
            Report::NoData => Report::NoData,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Report<U> {
        match self {
            Report::Ready(value) => Report::Ready(f(value)),
            Report::NoData => Report::NoData,
        }
    }
}

impl<T> Report<Vec<T>> {
    /// `NoData` when `rows` is empty.
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Report::NoData
        } else {
            Report::Ready(rows)
        }
    }
}

impl<T> From<Option<T>> for Report<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Report::Ready(value),
            None => Report::NoData,
        }
    }
}
