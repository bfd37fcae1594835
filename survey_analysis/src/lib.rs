mod config;
use log::{debug, info, warn};
use rayon::prelude::*;

pub mod builder;
pub mod cache;
pub mod catalog;
pub mod columns;
pub mod manual;
pub mod options;
pub mod processors;
pub mod responses;

pub use crate::cache::{MemoryCache, OptionCache};
pub use crate::config::*;
pub use crate::responses::ResponseRecord;

use crate::columns::ColumnIndex;
use crate::options::OptionTable;
use crate::processors::{process_question, QuestionContext};

/// Computes the aggregate of every question of the survey.
///
/// Arguments:
/// * `questions` the question catalog, including the sub-questions
/// * `options` the answer options, as loaded. They get enriched with the codes
/// of their questions.
/// * `responses` the responses to aggregate. All of them are used, see
/// [`responses::drop_incomplete`] to keep only the submitted ones.
/// * `rules` the decoding rules
///
/// A question that cannot be aggregated does not stop the analysis: it is
/// reported in the failures of the result.
pub fn analyze(
    questions: &[Question],
    options: &[AnswerOption],
    responses: &[ResponseRecord],
    rules: &AnalysisRules,
) -> Result<AnalysisResult, SchemaError> {
    catalog::check_catalog(questions)?;
    let enriched = options::enrich_with_question_codes(options, questions);
    Ok(run_analysis(questions, &enriched, responses, rules))
}

/// Same as [`analyze`], starting from the raw question and option rows.
pub fn analyze_rows(
    question_rows: &[RawRow],
    option_rows: &[RawRow],
    responses: &[ResponseRecord],
    rules: &AnalysisRules,
) -> Result<AnalysisResult, SchemaError> {
    let questions = catalog::load_questions(question_rows)?;
    let options = options::load_raw_options(option_rows)?;
    analyze(&questions, &options, responses, rules)
}

/// Same as [`analyze`], reusing the enriched options stored in the cache
/// for the same questions and options.
pub fn analyze_with_cache(
    questions: &[Question],
    options: &[AnswerOption],
    responses: &[ResponseRecord],
    rules: &AnalysisRules,
    cache: &mut dyn OptionCache,
) -> Result<AnalysisResult, SchemaError> {
    catalog::check_catalog(questions)?;
    let key = cache::options_fingerprint(questions, options);
    let enriched = match cache.get(&key) {
        Some(cached) => {
            info!("analyze_with_cache: {} options from the cache", cached.len());
            cached
        }
        None => {
            info!("analyze_with_cache: cache miss for {}", key);
            let enriched = options::enrich_with_question_codes(options, questions);
            cache.put(&key, &enriched);
            enriched
        }
    };
    Ok(run_analysis(questions, &enriched, responses, rules))
}

fn run_analysis(
    questions: &[Question],
    enriched_options: &[AnswerOption],
    responses: &[ResponseRecord],
    rules: &AnalysisRules,
) -> AnalysisResult {
    info!(
        "Processing {:?} questions, {:?} responses, rules: {:?}",
        questions.len(),
        responses.len(),
        rules
    );
    let table = OptionTable::new(enriched_options);
    let index = ColumnIndex::build(&responses::column_names(responses), questions);
    let top_level: Vec<&Question> = questions.iter().filter(|q| q.is_top_level()).collect();

    let process = |q: &&Question| {
        let ctx = QuestionContext {
            question: q,
            columns: index.columns(&q.id),
            responses,
            options: &table,
            subquestions: catalog::sub_questions(questions, &q.id),
            rules,
        };
        process_question(&ctx).map(|r| (q.id.clone(), r))
    };
    // The indexed collect keeps the order of the catalog.
    let outcomes: Vec<Option<(String, Result<QuestionResult, ProcessingError>)>> = if rules.parallel
    {
        top_level.par_iter().map(process).collect()
    } else {
        top_level.iter().map(process).collect()
    };

    let mut res = AnalysisResult::default();
    for (qid, outcome) in outcomes.into_iter().flatten() {
        match outcome {
            Ok(r) => {
                debug!("run_analysis: question {}: {:?}", qid, r);
                res.results.push((qid, r));
            }
            Err(e) => {
                warn!("run_analysis: {}", e);
                res.failures.push((qid, e));
            }
        }
    }
    info!(
        "run_analysis: {} questions processed, {} failed",
        res.results.len(),
        res.failures.len()
    );
    res
}
