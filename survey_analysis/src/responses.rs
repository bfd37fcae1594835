//! The response records and their bookkeeping columns.

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

/// Columns written by the survey platform that hold no answer.
pub const METADATA_COLUMNS: &[&str] = &[
    "id",
    "submitdate",
    "lastpage",
    "startlanguage",
    "seed",
    "startdate",
    "datestamp",
    "refurl",
];

const SUBMIT_DATE: &str = "submitdate";

/// The answers of one respondent, keyed by column code.
///
/// Values are kept as strings. An empty or blank value is the same as a
/// missing one.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ResponseRecord {
    pub id: Option<String>,
    values: HashMap<String, String>,
    // The columns in the order they were inserted.
    columns: Vec<String>,
}

impl ResponseRecord {
    pub fn new(id: Option<String>) -> ResponseRecord {
        ResponseRecord {
            id,
            ..Default::default()
        }
    }

    /// Builds a record from (column, value) pairs. The `id` column, if any,
    /// also becomes the id of the record.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> ResponseRecord {
        let mut res = ResponseRecord::new(None);
        for (column, value) in pairs.iter() {
            res.insert(column, value);
        }
        res
    }

    pub fn insert(&mut self, column: &str, value: &str) {
        if column == "id" && !value.trim().is_empty() {
            self.id = Some(value.trim().to_string());
        }
        if self
            .values
            .insert(column.to_string(), value.to_string())
            .is_none()
        {
            self.columns.push(column.to_string());
        }
    }

    /// The trimmed value of a column, `None` if missing or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The value of a column as it was stored.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(|v| v.as_str())
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// A record is complete when it has a submission date.
    pub fn is_complete(&self) -> bool {
        self.get(SUBMIT_DATE).is_some()
    }
}

pub fn is_metadata_column(column: &str) -> bool {
    METADATA_COLUMNS.contains(&column)
}

/// The answer columns of a set of records: all the columns seen, in the
/// order they first appear, without the metadata columns.
pub fn column_names(records: &[ResponseRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut res: Vec<String> = Vec::new();
    for r in records.iter() {
        for c in r.columns.iter() {
            if !is_metadata_column(c) && seen.insert(c.as_str()) {
                res.push(c.clone());
            }
        }
    }
    res
}

/// The bookkeeping part of a record.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ResponseMetadata {
    pub id: Option<String>,
    pub values: Vec<(String, String)>,
}

/// Separates the metadata columns from the answer columns of each record.
pub fn split_metadata(records: &[ResponseRecord]) -> (Vec<ResponseMetadata>, Vec<ResponseRecord>) {
    let mut metadata: Vec<ResponseMetadata> = Vec::new();
    let mut answers: Vec<ResponseRecord> = Vec::new();
    for r in records.iter() {
        let mut m = ResponseMetadata {
            id: r.id.clone(),
            values: Vec::new(),
        };
        let mut a = ResponseRecord::new(r.id.clone());
        for c in r.columns.iter() {
            let v = r.values.get(c).map(|v| v.as_str()).unwrap_or("");
            if is_metadata_column(c) {
                m.values.push((c.clone(), v.to_string()));
            } else {
                a.insert(c, v);
            }
        }
        metadata.push(m);
        answers.push(a);
    }
    (metadata, answers)
}

/// Removes the records that were never submitted.
///
/// Without any submission date column, all the records are kept.
pub fn drop_incomplete(records: Vec<ResponseRecord>) -> Vec<ResponseRecord> {
    let has_column = records
        .iter()
        .any(|r| r.columns.iter().any(|c| c == SUBMIT_DATE));
    if !has_column {
        warn!(
            "drop_incomplete: no {} column, keeping all {} responses",
            SUBMIT_DATE,
            records.len()
        );
        return records;
    }
    let total = records.len();
    let res: Vec<ResponseRecord> = records.into_iter().filter(|r| r.is_complete()).collect();
    info!(
        "drop_incomplete: kept {} complete responses out of {}",
        res.len(),
        total
    );
    debug!("drop_incomplete: dropped {}", total - res.len());
    res
}
