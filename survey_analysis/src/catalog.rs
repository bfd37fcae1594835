//! Loading of the question rows into [`Question`]s.

use log::{debug, info};
use std::collections::HashSet;

use crate::config::*;

const ENTITY: &str = "question";

/// Returns the first non-empty value among the given field names.
pub(crate) fn field<'a>(row: &'a RawRow, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|n| row.get(*n))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

fn flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.to_lowercase()).as_deref(),
        Some("y") | Some("yes") | Some("true") | Some("1")
    )
}

fn load_question(row_idx: usize, row: &RawRow) -> Result<Question, SchemaError> {
    let id = field(row, &["id", "qid"]).ok_or(SchemaError::MissingField {
        entity: ENTITY,
        row: row_idx,
        field: "id",
    })?;
    let type_code = field(row, &["type"]);
    // The theme name is more precise than the type letter when both are exported.
    let type_tag = field(row, &["question_theme_name"])
        .or(type_code)
        .ok_or(SchemaError::MissingField {
            entity: ENTITY,
            row: row_idx,
            field: "type",
        })?;
    let question_type = match (QuestionType::from_tag(type_tag), type_code) {
        // Custom themes: the type letter still tells how the answers are stored.
        (QuestionType::Other(_), Some(code)) if code != type_tag => {
            debug!(
                "load_question: question {}: unknown theme {:?}, using type {:?}",
                id, type_tag, code
            );
            QuestionType::from_tag(code)
        }
        (t, _) => t,
    };
    let parent_id = match field(row, &["parent_qid"]) {
        None | Some("0") => None,
        Some(p) => Some(p.to_string()),
    };
    Ok(Question {
        id: id.to_string(),
        code: field(row, &["code", "title"]).unwrap_or("").to_string(),
        question_type,
        type_tag: type_tag.to_string(),
        type_code: type_code.map(|c| c.to_string()),
        title: field(row, &["question", "text"]).unwrap_or("").to_string(),
        group_id: field(row, &["group_id", "gid"]).unwrap_or("").to_string(),
        mandatory: flag(field(row, &["mandatory"])),
        parent_id,
        order: field(row, &["question_order"]).and_then(|s| s.parse::<u32>().ok()),
        has_other: flag(field(row, &["other"])),
        // Empty or zero means no limit.
        max_answers: field(row, &["max_answers"])
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|x| *x > 0),
    })
}

/// Turns the raw question rows into questions, in the same order.
///
/// Fails if a row has no id or no type, or if two rows share an id.
pub fn load_questions(rows: &[RawRow]) -> Result<Vec<Question>, SchemaError> {
    let mut res: Vec<Question> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let q = load_question(idx, row)?;
        debug!("load_questions: row {}: {:?}", idx, q);
        res.push(q);
    }
    check_catalog(&res)?;
    info!(
        "load_questions: {} questions, {} sub-questions",
        res.iter().filter(|q| q.is_top_level()).count(),
        res.iter().filter(|q| !q.is_top_level()).count()
    );
    Ok(res)
}

pub fn check_catalog(questions: &[Question]) -> Result<(), SchemaError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for q in questions.iter() {
        if !seen.insert(q.id.as_str()) {
            return Err(SchemaError::DuplicateQuestionId(q.id.clone()));
        }
    }
    Ok(())
}

/// The sub-questions of a question, sorted by their order when it is known.
pub fn sub_questions<'a>(questions: &'a [Question], parent_id: &str) -> Vec<&'a Question> {
    let mut res: Vec<&Question> = questions
        .iter()
        .filter(|q| q.parent_id.as_deref() == Some(parent_id))
        .collect();
    // Stable: rows without an order keep their relative position, at the end.
    res.sort_by_key(|q| q.order.unwrap_or(u32::MAX));
    res
}
