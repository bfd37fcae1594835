//! Answer options and the resolution of stored codes into labels.

use log::{debug, info, warn};
use std::collections::HashMap;

use crate::catalog::field;
use crate::columns::{ColumnKind, ColumnRef};
use crate::config::*;

const ENTITY: &str = "option";

/// Turns the raw option rows into options. No question codes are attached.
pub fn load_raw_options(rows: &[RawRow]) -> Result<Vec<AnswerOption>, SchemaError> {
    let mut res: Vec<AnswerOption> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let missing = |f: &'static str| SchemaError::MissingField {
            entity: ENTITY,
            row: idx,
            field: f,
        };
        let question_id = field(row, &["question_id", "qid"]).ok_or_else(|| missing("question_id"))?;
        let value = field(row, &["value", "code", "option_code"]).ok_or_else(|| missing("value"))?;
        let label = field(row, &["label", "answer"]).ok_or_else(|| missing("label"))?;
        res.push(AnswerOption {
            question_id: question_id.to_string(),
            value: value.to_string(),
            label: label.to_string(),
            order: field(row, &["order", "sortorder"]).and_then(|s| s.parse::<u32>().ok()),
            question_code: None,
        });
    }
    debug!("load_raw_options: {} options", res.len());
    Ok(res)
}

/// Attaches to each option the code of the question it belongs to.
///
/// Options of unknown questions are dropped.
pub fn enrich_with_question_codes(
    options: &[AnswerOption],
    questions: &[Question],
) -> Vec<AnswerOption> {
    let codes: HashMap<&str, &str> = questions
        .iter()
        .map(|q| (q.id.as_str(), q.code.as_str()))
        .collect();
    options
        .iter()
        .filter_map(|o| match codes.get(o.question_id.as_str()) {
            Some(code) => Some(AnswerOption {
                question_code: Some(code.to_string()),
                ..o.clone()
            }),
            None => {
                warn!(
                    "enrich_with_question_codes: dropping option {:?} of unknown question {}",
                    o.value, o.question_id
                );
                None
            }
        })
        .collect()
}

/// The answer scales that the survey platform does not export as options.
///
/// The key is the type letter or theme name of the question.
pub fn predefined_scale(type_tag: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match type_tag {
        "Y" | "yesno" => Some(&[("Y", "Yes"), ("N", "No")]),
        "G" | "gender" => Some(&[("M", "Male"), ("F", "Female")]),
        "5" | "5pointchoice" | "A" | "arrays/5point" => Some(&[
            ("1", "Point 1"),
            ("2", "Point 2"),
            ("3", "Point 3"),
            ("4", "Point 4"),
            ("5", "Point 5"),
        ]),
        "B" | "arrays/10point" => Some(&[
            ("1", "Point 1"),
            ("2", "Point 2"),
            ("3", "Point 3"),
            ("4", "Point 4"),
            ("5", "Point 5"),
            ("6", "Point 6"),
            ("7", "Point 7"),
            ("8", "Point 8"),
            ("9", "Point 9"),
            ("10", "Point 10"),
        ]),
        "C" | "arrays/yesnouncertain" => Some(&[("Y", "Yes"), ("N", "No"), ("U", "Uncertain")]),
        "E" | "arrays/increasesamedecrease" => {
            Some(&[("I", "Increase"), ("S", "Same"), ("D", "Decrease")])
        }
        _ => None,
    }
}

/// The predefined scale of a question, from its theme name or else its type letter.
fn question_scale(question: &Question) -> Option<&'static [(&'static str, &'static str)]> {
    predefined_scale(&question.type_tag)
        .or_else(|| question.type_code.as_deref().and_then(predefined_scale))
}

/// The options of all the questions, grouped by question.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OptionTable {
    // (value, label), sorted by option order
    by_question: HashMap<String, Vec<(String, String)>>,
}

impl OptionTable {
    pub fn new(options: &[AnswerOption]) -> OptionTable {
        let mut grouped: HashMap<String, Vec<&AnswerOption>> = HashMap::new();
        for o in options.iter() {
            let entry = grouped.entry(o.question_id.clone()).or_default();
            if entry.iter().any(|prev| prev.value == o.value) {
                warn!(
                    "OptionTable::new: question {}: duplicate option value {:?}, keeping the first one",
                    o.question_id, o.value
                );
                continue;
            }
            entry.push(o);
        }
        let by_question: HashMap<String, Vec<(String, String)>> = grouped
            .into_iter()
            .map(|(qid, mut opts)| {
                opts.sort_by_key(|o| o.order.unwrap_or(u32::MAX));
                let pairs = opts
                    .iter()
                    .map(|o| (o.value.clone(), o.label.clone()))
                    .collect();
                (qid, pairs)
            })
            .collect();
        info!(
            "OptionTable::new: {} options for {} questions",
            options.len(),
            by_question.len()
        );
        OptionTable { by_question }
    }

    /// The (value, label) pairs of a question, in option order.
    pub fn options(&self, question_id: &str) -> &[(String, String)] {
        self.by_question
            .get(question_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    fn lookup(&self, question_id: &str, value: &str) -> Option<&str> {
        self.options(question_id)
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, l)| l.as_str())
    }

    /// The label of the option with this value, or the value itself.
    pub fn resolve_label(&self, question_id: &str, raw_value: &str) -> String {
        self.lookup(question_id, raw_value)
            .unwrap_or(raw_value)
            .to_string()
    }

    /// Resolves a stored answer of a question.
    ///
    /// On top of the declared options, this knows the code of the "other"
    /// choice and the scales that some question types have built in.
    pub fn resolve_answer(&self, question: &Question, raw_value: &str) -> String {
        if let Some(label) = self.lookup(&question.id, raw_value) {
            return label.to_string();
        }
        if raw_value == OTHER_OPTION_CODE {
            return OTHER_LABEL.to_string();
        }
        question_scale(question)
            .and_then(|scale| scale.iter().find(|(code, _)| *code == raw_value))
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| raw_value.to_string())
    }

    /// All the labels a question can produce, in display order.
    pub fn label_order(&self, question: &Question) -> Vec<String> {
        let mut res: Vec<String> = self
            .options(&question.id)
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        if let Some(scale) = question_scale(question) {
            for (_, label) in scale.iter() {
                if !res.iter().any(|l| l == label) {
                    res.push(label.to_string());
                }
            }
        }
        res
    }

    /// The label of a column of a multiple choice question: the option with
    /// the code of the column, else the sub-question with that code.
    pub fn option_column_label(
        &self,
        question: &Question,
        subquestions: &[&Question],
        column: &ColumnRef,
    ) -> String {
        match &column.kind {
            ColumnKind::Sub(code) => match self.lookup(&question.id, code) {
                Some(label) => label.to_string(),
                None => subquestion_label(subquestions, code),
            },
            ColumnKind::OtherText => OTHER_LABEL.to_string(),
            ColumnKind::Main => question.code.clone(),
        }
    }
}

/// The label of a column holding a sub-question: its text, else its code.
pub fn sub_column_label(question: &Question, subquestions: &[&Question], column: &ColumnRef) -> String {
    match &column.kind {
        ColumnKind::Sub(code) => subquestion_label(subquestions, code),
        ColumnKind::OtherText => OTHER_LABEL.to_string(),
        ColumnKind::Main => question.code.clone(),
    }
}

fn subquestion_label(subquestions: &[&Question], code: &str) -> String {
    match subquestions.iter().find(|sq| sq.code == code) {
        Some(sq) if !sq.title.is_empty() => sq.title.clone(),
        _ => code.to_string(),
    }
}
