//! Mapping from the columns of the response records to the questions.
//!
//! A response record is flat: a question with several parts (the ranks of a
//! ranking, the items of a multiple choice) is spread over several columns
//! whose names derive from the question code:
//!
//! - `Q1`: the answer of question `Q1`
//! - `Q1[SQ001]` or `Q1_SQ001`: the part `SQ001` of question `Q1`
//! - `Q1[other]`, `Q1_other` or `Q1other`: the free text of the "other" choice

use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::Display;

use crate::config::Question;

const OTHER_SUFFIX: &str = "other";

/// The role of a column for the question it belongs to.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum ColumnKind {
    /// The column is named after the question code.
    Main,
    /// A sub-question, a rank or an option, named by its code.
    Sub(String),
    /// The free text of the "other" choice.
    OtherText,
}

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct ColumnRef {
    pub column: String,
    pub kind: ColumnKind,
}

/// The column name has square brackets that do not close it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MalformedColumn(pub String);

impl Error for MalformedColumn {}

impl Display for MalformedColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "column {:?} contains square brackets but does not end with them",
            self.0
        )
    }
}

/// Splits a column name into the part before the last pair of square
/// brackets and the content of these brackets.
///
/// ```
/// use survey_analysis::columns::split_column_code;
///
/// assert_eq!(split_column_code("SQ007"), Ok(("SQ007", None)));
/// assert_eq!(split_column_code("G02Q01[SQ006]"), Ok(("G02Q01", Some("SQ006"))));
/// assert_eq!(split_column_code("G02Q[V2]01[SQ006]"), Ok(("G02Q[V2]01", Some("SQ006"))));
/// assert!(split_column_code("G02Q01[SQ006]2b").is_err());
/// ```
pub fn split_column_code(name: &str) -> Result<(&str, Option<&str>), MalformedColumn> {
    if !name.contains('[') && !name.contains(']') {
        return Ok((name, None));
    }
    if let Some(stripped) = name.strip_suffix(']') {
        if let Some(open) = stripped.rfind('[') {
            let inside = &stripped[open + 1..];
            if !inside.is_empty() && !inside.contains(']') {
                return Ok((&stripped[..open], Some(inside)));
            }
        }
    }
    Err(MalformedColumn(name.to_string()))
}

/// For each question, the ordered columns that hold its answers.
///
/// Only the top-level questions own columns: the codes of sub-questions are
/// only unique within their parent.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ColumnIndex {
    columns: HashMap<String, Vec<ColumnRef>>,
}

impl ColumnIndex {
    pub fn build(column_names: &[String], questions: &[Question]) -> ColumnIndex {
        let mut codes: HashMap<&str, &str> = HashMap::new();
        for q in questions.iter().filter(|q| q.is_top_level()) {
            if q.code.is_empty() {
                continue;
            }
            if let Some(owner) = codes.get(q.code.as_str()) {
                warn!(
                    "ColumnIndex::build: question {} reuses the code {} of question {}, its columns go to {}",
                    q.id, q.code, owner, owner
                );
                continue;
            }
            codes.insert(q.code.as_str(), q.id.as_str());
        }

        let mut columns: HashMap<String, Vec<ColumnRef>> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for name in column_names.iter() {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match match_column(name, &codes) {
                Some((qid, kind)) => {
                    columns.entry(qid.to_string()).or_default().push(ColumnRef {
                        column: name.clone(),
                        kind,
                    });
                }
                None => {
                    debug!("ColumnIndex::build: column {:?} matches no question", name);
                }
            }
        }
        debug!(
            "ColumnIndex::build: {} columns, {} questions with columns",
            column_names.len(),
            columns.len()
        );
        ColumnIndex { columns }
    }

    /// The columns of a question, in the order of the response schema.
    pub fn columns(&self, question_id: &str) -> &[ColumnRef] {
        self.columns
            .get(question_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The question owning a column, if any.
    pub fn question_for(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, refs)| refs.iter().any(|r| r.column == column))
            .map(|(qid, _)| qid.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn sub_kind(sub: &str) -> ColumnKind {
    if sub.eq_ignore_ascii_case(OTHER_SUFFIX) {
        ColumnKind::OtherText
    } else {
        ColumnKind::Sub(sub.to_string())
    }
}

// Codes are only ever compared whole. A plain prefix test would give the
// columns of Q10 to Q1.
fn match_column<'a>(name: &str, codes: &HashMap<&str, &'a str>) -> Option<(&'a str, ColumnKind)> {
    if let Some(qid) = codes.get(name) {
        return Some((*qid, ColumnKind::Main));
    }

    match split_column_code(name) {
        Ok((base, Some(sub))) => {
            return codes.get(base).map(|qid| (*qid, sub_kind(sub)));
        }
        Ok((_, None)) => {}
        Err(e) => {
            debug!("match_column: {}", e);
            return None;
        }
    }

    // The longest known code wins.
    for (idx, _) in name.rmatch_indices('_') {
        let (base, sub) = (&name[..idx], &name[idx + 1..]);
        if sub.is_empty() {
            continue;
        }
        if let Some(qid) = codes.get(base) {
            return Some((*qid, sub_kind(sub)));
        }
    }

    if let Some(base) = name.strip_suffix(OTHER_SUFFIX) {
        if let Some(qid) = codes.get(base) {
            return Some((*qid, ColumnKind::OtherText));
        }
    }
    None
}
