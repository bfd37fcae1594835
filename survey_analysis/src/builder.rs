pub use crate::config::*;
use crate::responses::ResponseRecord;

/// A builder for collecting the survey structure and the responses.
///
/// It is convenient when the responses arrive one at a time.
///
/// ```
/// pub use survey_analysis::builder::Builder;
/// pub use survey_analysis::AnalysisRules;
/// # use survey_analysis::{raw_row, QuestionResult, SchemaError};
///
/// let mut builder = Builder::new(&AnalysisRules::DEFAULT_RULES)?
///     .questions(&[raw_row(&[("qid", "1"), ("type", "L"), ("title", "Q1")])])?
///     .options(&[
///         raw_row(&[("qid", "1"), ("code", "A1"), ("answer", "Yes")]),
///         raw_row(&[("qid", "1"), ("code", "A2"), ("answer", "No")]),
///     ])?;
///
/// builder.add_response_simple(&[("Q1", "A1")]);
/// builder.add_response_simple(&[("Q1", "A2")]);
/// builder.add_response_simple(&[("Q1", "A1")]);
///
/// let res = builder.analyze()?;
/// match res.result("1") {
///     Some(QuestionResult::Choice(d)) => assert_eq!(d.get("Yes"), 2),
///     _ => unreachable!(),
/// }
///
/// # Ok::<(), SchemaError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: AnalysisRules,
    pub(crate) _questions: Vec<Question>,
    pub(crate) _options: Vec<AnswerOption>,
    pub(crate) _responses: Vec<ResponseRecord>,
}

impl Builder {
    pub fn new(rules: &AnalysisRules) -> Result<Builder, SchemaError> {
        Ok(Builder {
            _rules: rules.clone(),
            _questions: Vec::new(),
            _options: Vec::new(),
            _responses: Vec::new(),
        })
    }

    /// Sets the question catalog from the raw question rows.
    pub fn questions(self, rows: &[RawRow]) -> Result<Builder, SchemaError> {
        Ok(Builder {
            _questions: crate::catalog::load_questions(rows)?,
            ..self
        })
    }

    /// Sets the answer options from the raw option rows.
    pub fn options(self, rows: &[RawRow]) -> Result<Builder, SchemaError> {
        Ok(Builder {
            _options: crate::options::load_raw_options(rows)?,
            ..self
        })
    }

    /// Adds the response of one respondent, given as (column, value) pairs.
    pub fn add_response_simple(&mut self, values: &[(&str, &str)]) {
        self.add_response(&ResponseRecord::from_pairs(values))
    }

    pub fn add_response(&mut self, record: &ResponseRecord) {
        self._responses.push(record.clone());
    }

    pub fn analyze(&self) -> Result<AnalysisResult, SchemaError> {
        crate::analyze(
            &self._questions,
            &self._options,
            &self._responses,
            &self._rules,
        )
    }
}
