// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// A row of survey metadata as exported by the survey platform.
///
/// All the values are kept in their textual form. The loaders in
/// [`crate::catalog`] and [`crate::options`] turn them into typed structures.
pub type RawRow = HashMap<String, String>;

/// Convenience constructor for a [`RawRow`].
pub fn raw_row(fields: &[(&str, &str)]) -> RawRow {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// The families of questions known to the engine.
///
/// Each family has its own decoding rules for the response columns.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum QuestionType {
    /// One answer picked from a list of options.
    SingleChoice,
    /// Any number of options ticked, one column per option.
    MultipleChoice,
    /// Options placed in order, one column per rank.
    Ranking,
    FreeText,
    /// Computed value. It is aggregated like a single choice question.
    Equation,
    /// Several free text fields, one column per sub-question.
    MultipleShortText,
    /// A grid: one column per sub-question, each answered from the same scale.
    Array,
    /// A type the engine does not aggregate. The original tag is kept.
    Other(String),
}

impl QuestionType {
    /// Parses a type tag.
    ///
    /// Accepts the one-letter type codes of LimeSurvey (case sensitive), the
    /// question theme names and the names of this enumeration (case insensitive).
    pub fn from_tag(tag: &str) -> QuestionType {
        let t = tag.trim();
        match t {
            "L" | "!" | "O" | "5" | "Y" | "G" => QuestionType::SingleChoice,
            "M" | "P" => QuestionType::MultipleChoice,
            "R" => QuestionType::Ranking,
            "S" | "T" | "U" | "N" => QuestionType::FreeText,
            "*" => QuestionType::Equation,
            "Q" => QuestionType::MultipleShortText,
            "A" | "B" | "C" | "E" | "F" | "H" => QuestionType::Array,
            _ => match t.to_lowercase().as_str() {
                "singlechoice" | "listradio" | "image_select-listradio" | "list_dropdown"
                | "list_with_comment" | "yesno" | "gender" | "5pointchoice" => {
                    QuestionType::SingleChoice
                }
                "multiplechoice"
                | "image_select-multiplechoice"
                | "multiplechoice_with_comments"
                | "multiplechoice_withcomments" => QuestionType::MultipleChoice,
                "ranking" => QuestionType::Ranking,
                "freetext" | "shortfreetext" | "longfreetext" | "hugefreetext" | "numerical" => {
                    QuestionType::FreeText
                }
                "equation" => QuestionType::Equation,
                "multipleshorttext" => QuestionType::MultipleShortText,
                "array"
                | "arrays/array"
                | "arrays/5point"
                | "arrays/10point"
                | "arrays/yesnouncertain"
                | "arrays/increasesamedecrease" => QuestionType::Array,
                _ => QuestionType::Other(t.to_string()),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            QuestionType::SingleChoice => "singleChoice",
            QuestionType::MultipleChoice => "multipleChoice",
            QuestionType::Ranking => "ranking",
            QuestionType::FreeText => "freeText",
            QuestionType::Equation => "equation",
            QuestionType::MultipleShortText => "multipleShortText",
            QuestionType::Array => "array",
            QuestionType::Other(tag) => tag.as_str(),
        }
    }
}

/// A question (or a sub-question) of the survey.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Question {
    pub id: String,
    /// The code under which the answers are stored in the response records.
    pub code: String,
    pub question_type: QuestionType,
    /// The tag the type was parsed from.
    pub type_tag: String,
    /// The one-letter LimeSurvey type, when it was exported next to a theme name.
    pub type_code: Option<String>,
    pub title: String,
    pub group_id: String,
    pub mandatory: bool,
    /// Set for sub-questions: the id of the question they belong to.
    pub parent_id: Option<String>,
    pub order: Option<u32>,
    /// The question offers an "other" choice with a free text field.
    pub has_other: bool,
    /// For rankings, the number of ranks that are counted.
    pub max_answers: Option<u32>,
}

impl Question {
    pub fn new(id: &str, code: &str, question_type: QuestionType) -> Question {
        Question {
            id: id.to_string(),
            code: code.to_string(),
            type_tag: question_type.name().to_string(),
            type_code: None,
            question_type,
            title: String::new(),
            group_id: String::new(),
            mandatory: false,
            parent_id: None,
            order: None,
            has_other: false,
            max_answers: None,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// One enumerated choice of a question.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct AnswerOption {
    pub question_id: String,
    /// The code stored in the response records.
    pub value: String,
    pub label: String,
    pub order: Option<u32>,
    /// The code of the owning question. Only filled after enrichment.
    pub question_code: Option<String>,
}

impl AnswerOption {
    pub fn new(question_id: &str, value: &str, label: &str) -> AnswerOption {
        AnswerOption {
            question_id: question_id.to_string(),
            value: value.to_string(),
            label: label.to_string(),
            order: None,
            question_code: None,
        }
    }
}

pub const OTHER_LABEL: &str = "Other";

/// The code stored when a respondent picks the "other" choice.
pub const OTHER_OPTION_CODE: &str = "-oth-";

// ******** Output data structures *********

/// Counts per label, in a stable order.
///
/// Labels of declared options come first in the order of the options, followed
/// by the values that could not be resolved, in the order they were seen.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Distribution {
    pub counts: Vec<(String, u64)>,
}

impl Distribution {
    pub fn from_counts(counts: &[(&str, u64)]) -> Distribution {
        Distribution {
            counts: counts.iter().map(|(l, c)| (l.to_string(), *c)).collect(),
        }
    }

    /// The count for a label. Missing labels count as zero.
    pub fn get(&self, label: &str) -> u64 {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.counts.iter().any(|(l, _)| l == label)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, c)| *c).sum()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.counts.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// The aggregate computed for one question.
///
/// Consumers are expected to match on the variant, which follows the type of
/// the question.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum QuestionResult {
    /// Single choice and equation questions: label -> number of respondents.
    Choice(Distribution),
    /// label -> number of respondents who ticked it. Options nobody ticked
    /// are present with a zero count.
    MultipleChoice {
        counts: Distribution,
        /// Respondents who ticked at least one option.
        respondents: u64,
    },
    /// label -> rank -> number of respondents who put the label at that rank.
    /// Ranks without any respondent are absent.
    Ranking(Vec<(String, Distribution)>),
    /// The non-empty answers, in respondent order.
    FreeText(Vec<String>),
    /// sub-question label -> non-empty answers.
    MultipleShortText(Vec<(String, Vec<String>)>),
    /// sub-question label -> distribution of the answers.
    Array(Vec<(String, Distribution)>),
}

impl QuestionResult {
    /// For multiple choice questions, the fraction of respondents (those who
    /// ticked at least one option) who ticked each option.
    pub fn response_rates(&self) -> Option<Vec<(String, f64)>> {
        match self {
            QuestionResult::MultipleChoice {
                counts,
                respondents,
            } => Some(
                counts
                    .counts
                    .iter()
                    .map(|(label, count)| {
                        let rate = if *respondents == 0 {
                            0.0
                        } else {
                            *count as f64 / *respondents as f64
                        };
                        (label.clone(), rate)
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// The output of an analysis run.
///
/// Both lists follow the order of the question catalog.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct AnalysisResult {
    pub results: Vec<(String, QuestionResult)>,
    pub failures: Vec<(String, ProcessingError)>,
}

impl AnalysisResult {
    pub fn result(&self, question_id: &str) -> Option<&QuestionResult> {
        self.results
            .iter()
            .find(|(qid, _)| qid == question_id)
            .map(|(_, r)| r)
    }

    pub fn failure(&self, question_id: &str) -> Option<&ProcessingError> {
        self.failures
            .iter()
            .find(|(qid, _)| qid == question_id)
            .map(|(_, e)| e)
    }
}

/// Errors in the survey structure. They abort the whole analysis.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SchemaError {
    MissingField {
        entity: &'static str,
        row: usize,
        field: &'static str,
    },
    DuplicateQuestionId(String),
}

impl Error for SchemaError {}

impl Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::MissingField { entity, row, field } => {
                write!(f, "{} row {}: missing field {}", entity, row, field)
            }
            SchemaError::DuplicateQuestionId(id) => {
                write!(f, "question id {} appears more than once", id)
            }
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ProcessingCause {
    /// None of the response columns belongs to the question.
    MissingColumns,
    /// A multiple choice column holds a value that is not a selection marker.
    InvalidSelection { column: String, value: String },
}

/// The distribution of a single question could not be computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ProcessingError {
    pub question_id: String,
    pub cause: ProcessingCause,
}

impl Error for ProcessingError {}

impl Display for ProcessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            ProcessingCause::MissingColumns => write!(
                f,
                "question {}: no response column found",
                self.question_id
            ),
            ProcessingCause::InvalidSelection { column, value } => write!(
                f,
                "question {}: invalid value {:?} in column {}, expected Y, N or empty",
                self.question_id, value, column
            ),
        }
    }
}

// ********* Configuration **********

/// How a multiple choice column is read.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SelectionRule {
    /// `Y` (any case) is selected. `N`, empty and missing are not selected.
    /// Any other value fails the question.
    Strict,
    /// Any non-empty value other than `N` is selected.
    NonEmpty,
}

impl SelectionRule {
    /// Returns whether the value marks a selection, or `None` if the value is
    /// not acceptable under this rule.
    pub fn is_selected(&self, value: Option<&str>) -> Option<bool> {
        let v = match value.map(str::trim) {
            None | Some("") => return Some(false),
            Some(v) => v,
        };
        if v.eq_ignore_ascii_case("N") {
            return Some(false);
        }
        match self {
            SelectionRule::Strict if v.eq_ignore_ascii_case("Y") => Some(true),
            SelectionRule::Strict => None,
            SelectionRule::NonEmpty => Some(true),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnalysisRules {
    pub selection_rule: SelectionRule,
    /// Ignore the ranks beyond the `max_answers` attribute of a ranking question.
    pub respect_max_answers: bool,
    /// Process the questions on the rayon thread pool.
    pub parallel: bool,
}

impl AnalysisRules {
    pub const DEFAULT_RULES: AnalysisRules = AnalysisRules {
        selection_rule: SelectionRule::Strict,
        respect_max_answers: true,
        parallel: false,
    };
}
