//! The decoding of the response columns of one question into its aggregate.

use log::debug;
use std::collections::HashSet;

use crate::columns::{ColumnKind, ColumnRef};
use crate::config::*;
use crate::options::{sub_column_label, OptionTable};
use crate::responses::ResponseRecord;

/// Everything a processor may read for one question.
#[derive(Debug, Clone)]
pub struct QuestionContext<'a> {
    pub question: &'a Question,
    /// The columns of the question, as found by the column index.
    pub columns: &'a [ColumnRef],
    pub responses: &'a [ResponseRecord],
    pub options: &'a OptionTable,
    pub subquestions: Vec<&'a Question>,
    pub rules: &'a AnalysisRules,
}

impl<'a> QuestionContext<'a> {
    fn fail(&self, cause: ProcessingCause) -> ProcessingError {
        ProcessingError {
            question_id: self.question.id.clone(),
            cause,
        }
    }

    fn main_column(&self) -> Result<&'a ColumnRef, ProcessingError> {
        self.columns
            .iter()
            .find(|c| c.kind == ColumnKind::Main)
            .ok_or_else(|| self.fail(ProcessingCause::MissingColumns))
    }

    fn sub_columns(&self) -> Result<Vec<&'a ColumnRef>, ProcessingError> {
        let res: Vec<&ColumnRef> = self
            .columns
            .iter()
            .filter(|c| matches!(c.kind, ColumnKind::Sub(_)))
            .collect();
        if res.is_empty() {
            Err(self.fail(ProcessingCause::MissingColumns))
        } else {
            Ok(res)
        }
    }
}

/// Counts per label that keeps the labels in the order they were declared,
/// then in the order they were first seen.
#[derive(Debug, Clone, Default)]
struct Tally {
    counts: Vec<(String, u64)>,
}

impl Tally {
    fn with_labels(labels: &[String]) -> Tally {
        let mut res = Tally::default();
        for l in labels.iter() {
            res.declare(l);
        }
        res
    }

    fn declare(&mut self, label: &str) -> usize {
        match self.counts.iter().position(|(l, _)| l == label) {
            Some(idx) => idx,
            None => {
                self.counts.push((label.to_string(), 0));
                self.counts.len() - 1
            }
        }
    }

    fn add(&mut self, label: &str) {
        let idx = self.declare(label);
        self.counts[idx].1 += 1;
    }

    fn into_distribution(self, keep_zeros: bool) -> Distribution {
        Distribution {
            counts: self
                .counts
                .into_iter()
                .filter(|(_, c)| keep_zeros || *c > 0)
                .collect(),
        }
    }
}

/// Computes the aggregate of a question.
///
/// Returns `None` for the types that are not aggregated.
pub fn process_question(ctx: &QuestionContext) -> Option<Result<QuestionResult, ProcessingError>> {
    let res = match &ctx.question.question_type {
        QuestionType::SingleChoice | QuestionType::Equation => process_choice(ctx),
        QuestionType::MultipleChoice => process_multiple_choice(ctx),
        QuestionType::Ranking => process_ranking(ctx),
        QuestionType::FreeText => process_free_text(ctx),
        QuestionType::MultipleShortText => process_multiple_short_text(ctx),
        QuestionType::Array => process_array(ctx),
        QuestionType::Other(tag) => {
            debug!(
                "process_question: question {}: type {:?} is not aggregated",
                ctx.question.id, tag
            );
            return None;
        }
    };
    Some(res)
}

fn process_choice(ctx: &QuestionContext) -> Result<QuestionResult, ProcessingError> {
    let column = ctx.main_column()?;
    let mut tally = Tally::with_labels(&ctx.options.label_order(ctx.question));
    for r in ctx.responses.iter() {
        if let Some(v) = r.get(&column.column) {
            tally.add(&ctx.options.resolve_answer(ctx.question, v));
        }
    }
    Ok(QuestionResult::Choice(tally.into_distribution(false)))
}

const COMMENT_SUFFIX: &str = "comment";

/// The comment typed next to an option: `Q1[SQ001comment]`, or
/// `Q1[othercomment]` for the "other" choice.
fn is_comment_column(column: &ColumnRef, columns: &[ColumnRef]) -> bool {
    let prefix = match &column.kind {
        ColumnKind::Sub(sub) => sub.strip_suffix(COMMENT_SUFFIX),
        _ => None,
    };
    match prefix {
        Some("") | None => false,
        Some(p) if p.eq_ignore_ascii_case("other") => true,
        Some(p) => columns
            .iter()
            .any(|c| matches!(&c.kind, ColumnKind::Sub(sub) if sub == p)),
    }
}

fn process_multiple_choice(ctx: &QuestionContext) -> Result<QuestionResult, ProcessingError> {
    let columns: Vec<(&ColumnRef, String)> = ctx
        .columns
        .iter()
        .filter(|c| c.kind != ColumnKind::Main)
        .filter(|c| {
            let comment = is_comment_column(c, ctx.columns);
            if comment {
                debug!(
                    "process_multiple_choice: question {}: {} is a comment",
                    ctx.question.id, c.column
                );
            }
            !comment
        })
        .map(|c| {
            (
                c,
                ctx.options
                    .option_column_label(ctx.question, &ctx.subquestions, c),
            )
        })
        .collect();
    if columns.is_empty() {
        return Err(ctx.fail(ProcessingCause::MissingColumns));
    }

    let labels: Vec<String> = columns.iter().map(|(_, l)| l.clone()).collect();
    let mut tally = Tally::with_labels(&labels);
    let mut respondents: u64 = 0;
    for r in ctx.responses.iter() {
        let mut selected: HashSet<&str> = HashSet::new();
        for (c, label) in columns.iter() {
            let is_selected = match c.kind {
                // Whatever was typed in the "other" field counts as a selection.
                ColumnKind::OtherText => r.get(&c.column).is_some(),
                _ => ctx
                    .rules
                    .selection_rule
                    .is_selected(r.get(&c.column))
                    .ok_or_else(|| {
                        ctx.fail(ProcessingCause::InvalidSelection {
                            column: c.column.clone(),
                            value: r.raw(&c.column).unwrap_or("").to_string(),
                        })
                    })?,
            };
            if is_selected && selected.insert(label.as_str()) {
                tally.add(label);
            }
        }
        if !selected.is_empty() {
            respondents += 1;
        }
    }
    Ok(QuestionResult::MultipleChoice {
        counts: tally.into_distribution(true),
        respondents,
    })
}

/// "01" and "1" are the same rank.
fn rank_key(sub: &str) -> String {
    match sub.parse::<u64>() {
        Ok(x) => x.to_string(),
        Err(_) => sub.to_string(),
    }
}

fn rank_order(key: &str) -> (u64, String) {
    (key.parse::<u64>().unwrap_or(u64::MAX), key.to_string())
}

fn process_ranking(ctx: &QuestionContext) -> Result<QuestionResult, ProcessingError> {
    let max_rank = if ctx.rules.respect_max_answers {
        ctx.question.max_answers
    } else {
        None
    };
    let columns: Vec<(&ColumnRef, String)> = ctx
        .sub_columns()?
        .into_iter()
        .filter_map(|c| match &c.kind {
            ColumnKind::Sub(sub) => Some((c, rank_key(sub))),
            _ => None,
        })
        .filter(|(c, key)| match (max_rank, key.parse::<u32>()) {
            (Some(m), Ok(rank)) if rank > m => {
                debug!(
                    "process_ranking: question {}: ignoring column {} beyond {} ranks",
                    ctx.question.id, c.column, m
                );
                false
            }
            _ => true,
        })
        .collect();

    // label -> tally of the ranks
    let mut ranks: Vec<(String, Tally)> = ctx
        .options
        .label_order(ctx.question)
        .into_iter()
        .map(|l| (l, Tally::default()))
        .collect();
    for r in ctx.responses.iter() {
        // Two columns may name the same rank.
        let mut seen: HashSet<(String, &str)> = HashSet::new();
        for (c, key) in columns.iter() {
            if let Some(v) = r.get(&c.column) {
                let label = ctx.options.resolve_answer(ctx.question, v);
                if !seen.insert((label.clone(), key.as_str())) {
                    continue;
                }
                let idx = match ranks.iter().position(|(l, _)| *l == label) {
                    Some(idx) => idx,
                    None => {
                        ranks.push((label, Tally::default()));
                        ranks.len() - 1
                    }
                };
                ranks[idx].1.add(key);
            }
        }
    }

    let res: Vec<(String, Distribution)> = ranks
        .into_iter()
        .filter(|(_, t)| !t.counts.is_empty())
        .map(|(label, mut t)| {
            t.counts.sort_by_key(|(k, _)| rank_order(k));
            (label, t.into_distribution(false))
        })
        .collect();
    Ok(QuestionResult::Ranking(res))
}

fn process_free_text(ctx: &QuestionContext) -> Result<QuestionResult, ProcessingError> {
    let column = ctx.main_column()?;
    let texts: Vec<String> = ctx
        .responses
        .iter()
        .filter_map(|r| r.get(&column.column))
        .map(|v| v.to_string())
        .collect();
    Ok(QuestionResult::FreeText(texts))
}

fn process_multiple_short_text(ctx: &QuestionContext) -> Result<QuestionResult, ProcessingError> {
    let res = ctx
        .sub_columns()?
        .into_iter()
        .map(|c| {
            let texts: Vec<String> = ctx
                .responses
                .iter()
                .filter_map(|r| r.get(&c.column))
                .map(|v| v.to_string())
                .collect();
            (sub_column_label(ctx.question, &ctx.subquestions, c), texts)
        })
        .collect();
    Ok(QuestionResult::MultipleShortText(res))
}

fn process_array(ctx: &QuestionContext) -> Result<QuestionResult, ProcessingError> {
    let scale = ctx.options.label_order(ctx.question);
    let res = ctx
        .sub_columns()?
        .into_iter()
        .map(|c| {
            let mut tally = Tally::with_labels(&scale);
            for r in ctx.responses.iter() {
                if let Some(v) = r.get(&c.column) {
                    tally.add(&ctx.options.resolve_answer(ctx.question, v));
                }
            }
            (
                sub_column_label(ctx.question, &ctx.subquestions, c),
                tally.into_distribution(false),
            )
        })
        .collect();
    Ok(QuestionResult::Array(res))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnIndex;
    use proptest::prelude::*;

    struct Fixture {
        questions: Vec<Question>,
        options: OptionTable,
        responses: Vec<ResponseRecord>,
        index: ColumnIndex,
    }

    impl Fixture {
        fn new(
            questions: Vec<Question>,
            options: &[AnswerOption],
            responses: Vec<ResponseRecord>,
        ) -> Fixture {
            let names = crate::responses::column_names(&responses);
            Fixture {
                index: ColumnIndex::build(&names, &questions),
                questions,
                options: OptionTable::new(options),
                responses,
            }
        }

        fn run(
            &self,
            question_id: &str,
            rules: &AnalysisRules,
        ) -> Option<Result<QuestionResult, ProcessingError>> {
            let question = self
                .questions
                .iter()
                .find(|q| q.id == question_id)
                .unwrap();
            let ctx = QuestionContext {
                question,
                columns: self.index.columns(question_id),
                responses: &self.responses,
                options: &self.options,
                subquestions: crate::catalog::sub_questions(&self.questions, question_id),
                rules,
            };
            process_question(&ctx)
        }

        fn result(&self, question_id: &str) -> QuestionResult {
            self.run(question_id, &AnalysisRules::DEFAULT_RULES)
                .unwrap()
                .unwrap()
        }
    }

    fn records(rows: &[&[(&str, &str)]]) -> Vec<ResponseRecord> {
        rows.iter().map(|r| ResponseRecord::from_pairs(r)).collect()
    }

    #[test]
    fn single_choice_skips_missing() {
        let f = Fixture::new(
            vec![Question::new("1", "Q1", QuestionType::SingleChoice)],
            &[
                AnswerOption::new("1", "A", "Yes"),
                AnswerOption::new("1", "B", "No"),
            ],
            records(&[
                &[("Q1", "B")],
                &[("Q1", "")],
                &[("Q1", "A")],
                &[("Q1", "Z")],
                &[("Q1", "-oth-")],
                &[],
            ]),
        );
        assert_eq!(
            f.result("1"),
            QuestionResult::Choice(Distribution::from_counts(&[
                ("Yes", 1),
                ("No", 1),
                ("Z", 1),
                ("Other", 1)
            ]))
        );
    }

    #[test]
    fn single_choice_without_column() {
        let f = Fixture::new(
            vec![Question::new("1", "Q1", QuestionType::SingleChoice)],
            &[],
            records(&[&[("Q2", "A")]]),
        );
        assert_eq!(
            f.run("1", &AnalysisRules::DEFAULT_RULES),
            Some(Err(ProcessingError {
                question_id: "1".to_string(),
                cause: ProcessingCause::MissingColumns
            }))
        );
    }

    #[test]
    fn equation_is_counted() {
        let f = Fixture::new(
            vec![Question::new("1", "EQ", QuestionType::Equation)],
            &[],
            records(&[&[("EQ", "3")], &[("EQ", "3")], &[("EQ", "4")]]),
        );
        assert_eq!(
            f.result("1"),
            QuestionResult::Choice(Distribution::from_counts(&[("3", 2), ("4", 1)]))
        );
    }

    fn multiple_choice_fixture(rows: &[&[(&str, &str)]]) -> Fixture {
        let mut sq = Question::new("11", "SQ002", QuestionType::MultipleChoice);
        sq.parent_id = Some("1".to_string());
        sq.title = "Bananas".to_string();
        Fixture::new(
            vec![Question::new("1", "Q1", QuestionType::MultipleChoice), sq],
            &[AnswerOption::new("1", "SQ001", "Apples")],
            records(rows),
        )
    }

    #[test]
    fn multiple_choice_counts() {
        let f = multiple_choice_fixture(&[
            &[("Q1[SQ001]", "Y"), ("Q1[SQ002]", "Y"), ("Q1[SQ003]", "")],
            &[("Q1[SQ001]", "y"), ("Q1[SQ002]", "N"), ("Q1[other]", "Cherries")],
            &[("Q1[SQ001]", ""), ("Q1[SQ002]", "")],
        ]);
        let res = f.result("1");
        assert_eq!(
            res,
            QuestionResult::MultipleChoice {
                counts: Distribution::from_counts(&[
                    ("Apples", 2),
                    ("Bananas", 1),
                    ("SQ003", 0),
                    ("Other", 1)
                ]),
                respondents: 2
            }
        );
        assert_eq!(
            res.response_rates().unwrap()[0],
            ("Apples".to_string(), 1.0)
        );
    }

    #[test]
    fn multiple_choice_selection_rules() {
        let f = multiple_choice_fixture(&[&[("Q1[SQ001]", "1"), ("Q1[SQ002]", "N")]]);
        assert_eq!(
            f.run("1", &AnalysisRules::DEFAULT_RULES),
            Some(Err(ProcessingError {
                question_id: "1".to_string(),
                cause: ProcessingCause::InvalidSelection {
                    column: "Q1[SQ001]".to_string(),
                    value: "1".to_string()
                }
            }))
        );
        let lenient = AnalysisRules {
            selection_rule: SelectionRule::NonEmpty,
            ..AnalysisRules::DEFAULT_RULES
        };
        assert_eq!(
            f.run("1", &lenient).unwrap().unwrap(),
            QuestionResult::MultipleChoice {
                counts: Distribution::from_counts(&[("Apples", 1), ("Bananas", 0)]),
                respondents: 1
            }
        );
    }

    #[test]
    fn multiple_choice_one_count_per_respondent() {
        // Two columns resolving to the same label.
        let f = Fixture::new(
            vec![Question::new("1", "Q1", QuestionType::MultipleChoice)],
            &[
                AnswerOption::new("1", "A", "Same"),
                AnswerOption::new("1", "B", "Same"),
            ],
            records(&[&[("Q1[A]", "Y"), ("Q1[B]", "Y")]]),
        );
        assert_eq!(
            f.result("1"),
            QuestionResult::MultipleChoice {
                counts: Distribution::from_counts(&[("Same", 1)]),
                respondents: 1
            }
        );
    }

    #[test]
    fn multiple_choice_comments_are_not_options() {
        let mut q = Question::new("1", "Q1", QuestionType::MultipleChoice);
        q.type_tag = "P".to_string();
        let mut sq = Question::new("11", "SQ001", QuestionType::MultipleChoice);
        sq.parent_id = Some("1".to_string());
        sq.title = "Apples".to_string();
        let f = Fixture::new(
            vec![q, sq],
            &[],
            records(&[
                &[
                    ("Q1[SQ001]", "Y"),
                    ("Q1[SQ001comment]", "tasty"),
                    ("Q1[othercomment]", "none"),
                ],
                &[("Q1[SQ001]", ""), ("Q1[SQ001comment]", "")],
            ]),
        );
        let lenient = AnalysisRules {
            selection_rule: SelectionRule::NonEmpty,
            ..AnalysisRules::DEFAULT_RULES
        };
        for rules in [AnalysisRules::DEFAULT_RULES, lenient] {
            assert_eq!(
                f.run("1", &rules).unwrap().unwrap(),
                QuestionResult::MultipleChoice {
                    counts: Distribution::from_counts(&[("Apples", 1)]),
                    respondents: 1
                }
            );
        }
    }

    #[test]
    fn comment_suffix_needs_an_option() {
        let columns = vec![
            ColumnRef {
                column: "Q1[SQ001]".to_string(),
                kind: ColumnKind::Sub("SQ001".to_string()),
            },
            ColumnRef {
                column: "Q1[SQ001comment]".to_string(),
                kind: ColumnKind::Sub("SQ001comment".to_string()),
            },
            ColumnRef {
                column: "Q1[nocomment]".to_string(),
                kind: ColumnKind::Sub("nocomment".to_string()),
            },
            ColumnRef {
                column: "Q1[comment]".to_string(),
                kind: ColumnKind::Sub("comment".to_string()),
            },
        ];
        let flags: Vec<bool> = columns
            .iter()
            .map(|c| is_comment_column(c, &columns))
            .collect();
        assert_eq!(flags, vec![false, true, false, false]);
    }

    #[test]
    fn ranking_counts_a_rank_once_per_respondent() {
        let f = Fixture::new(
            vec![Question::new("1", "R1", QuestionType::Ranking)],
            &[AnswerOption::new("1", "A1", "X")],
            records(&[&[("R1[01]", "A1"), ("R1[1]", "A1")]]),
        );
        assert_eq!(
            f.result("1"),
            QuestionResult::Ranking(vec![(
                "X".to_string(),
                Distribution::from_counts(&[("1", 1)])
            )])
        );
    }

    fn ranking_fixture(max_answers: Option<u32>) -> Fixture {
        let mut q = Question::new("1", "R1", QuestionType::Ranking);
        q.max_answers = max_answers;
        Fixture::new(
            vec![q],
            &[
                AnswerOption::new("1", "A1", "X"),
                AnswerOption::new("1", "A2", "Y"),
                AnswerOption::new("1", "A3", "Z"),
            ],
            records(&[
                &[("R1[1]", "A1"), ("R1[2]", "A2"), ("R1[3]", "A3")],
                &[("R1_01", "A2"), ("R1_02", "A1"), ("R1_03", "")],
                &[("R1[1]", "A9")],
            ]),
        )
    }

    #[test]
    fn ranking_counts() {
        let f = ranking_fixture(None);
        let dist = |c: &[(&str, u64)]| Distribution::from_counts(c);
        assert_eq!(
            f.result("1"),
            QuestionResult::Ranking(vec![
                ("X".to_string(), dist(&[("1", 1), ("2", 1)])),
                ("Y".to_string(), dist(&[("1", 1), ("2", 1)])),
                ("Z".to_string(), dist(&[("3", 1)])),
                ("A9".to_string(), dist(&[("1", 1)])),
            ])
        );
    }

    #[test]
    fn ranking_max_answers() {
        let f = ranking_fixture(Some(2));
        match f.result("1") {
            QuestionResult::Ranking(ranks) => {
                assert!(ranks.iter().all(|(l, _)| l != "Z"));
                assert_eq!(ranks.len(), 3);
            }
            x => panic!("unexpected result {:?}", x),
        }
        let all_ranks = AnalysisRules {
            respect_max_answers: false,
            ..AnalysisRules::DEFAULT_RULES
        };
        match f.run("1", &all_ranks).unwrap().unwrap() {
            QuestionResult::Ranking(ranks) => assert_eq!(ranks.len(), 4),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn free_text_in_order() {
        let f = Fixture::new(
            vec![Question::new("1", "T1", QuestionType::FreeText)],
            &[],
            records(&[&[("T1", "first")], &[("T1", " ")], &[("T1", "second")]]),
        );
        assert_eq!(
            f.result("1"),
            QuestionResult::FreeText(vec!["first".to_string(), "second".to_string()])
        );
    }

    #[test]
    fn multiple_short_text_by_sub_question() {
        let mut sq = Question::new("11", "SQ001", QuestionType::MultipleShortText);
        sq.parent_id = Some("1".to_string());
        sq.title = "Name".to_string();
        let f = Fixture::new(
            vec![Question::new("1", "MT", QuestionType::MultipleShortText), sq],
            &[],
            records(&[
                &[("MT[SQ001]", "Ann"), ("MT[SQ002]", "")],
                &[("MT[SQ001]", "Bob"), ("MT[SQ002]", "x")],
            ]),
        );
        assert_eq!(
            f.result("1"),
            QuestionResult::MultipleShortText(vec![
                (
                    "Name".to_string(),
                    vec!["Ann".to_string(), "Bob".to_string()]
                ),
                ("SQ002".to_string(), vec!["x".to_string()]),
            ])
        );
    }

    #[test]
    fn array_uses_the_predefined_scale() {
        let mut q = Question::new("1", "AR", QuestionType::Array);
        q.type_tag = "E".to_string();
        let f = Fixture::new(
            vec![q],
            &[],
            records(&[
                &[("AR[SQ001]", "I"), ("AR[SQ002]", "D")],
                &[("AR[SQ001]", "I"), ("AR[SQ002]", "S")],
            ]),
        );
        assert_eq!(
            f.result("1"),
            QuestionResult::Array(vec![
                (
                    "SQ001".to_string(),
                    Distribution::from_counts(&[("Increase", 2)])
                ),
                (
                    "SQ002".to_string(),
                    Distribution::from_counts(&[("Same", 1), ("Decrease", 1)])
                ),
            ])
        );
    }

    #[test]
    fn unknown_types_are_skipped() {
        let f = Fixture::new(
            vec![Question::new(
                "1",
                "B1",
                QuestionType::Other("boilerplate".to_string()),
            )],
            &[],
            records(&[&[("B1", "x")]]),
        );
        assert_eq!(f.run("1", &AnalysisRules::DEFAULT_RULES), None);
    }

    proptest! {
        #[test]
        fn single_choice_total_is_answered_count(answers in prop::collection::vec("[ABC]?", 0..40)) {
            let rows: Vec<ResponseRecord> = answers
                .iter()
                .map(|a| ResponseRecord::from_pairs(&[("Q1", a.as_str())]))
                .collect();
            let f = Fixture::new(
                vec![Question::new("1", "Q1", QuestionType::SingleChoice)],
                &[AnswerOption::new("1", "A", "Alpha")],
                rows,
            );
            let answered = answers.iter().filter(|a| !a.is_empty()).count() as u64;
            match f.run("1", &AnalysisRules::DEFAULT_RULES) {
                Some(Ok(QuestionResult::Choice(d))) => prop_assert_eq!(d.total(), answered),
                // Without any record, the column does not exist.
                Some(Err(_)) => prop_assert!(answers.is_empty()),
                x => prop_assert!(false, "unexpected result {:?}", x),
            }
        }

        #[test]
        fn multiple_choice_counts_are_bounded(ticks in prop::collection::vec(prop::collection::vec(any::<bool>(), 3), 1..30)) {
            let rows: Vec<ResponseRecord> = ticks
                .iter()
                .map(|t| {
                    let v = |b: bool| if b { "Y" } else { "" };
                    ResponseRecord::from_pairs(&[
                        ("Q1[A]", v(t[0])),
                        ("Q1[B]", v(t[1])),
                        ("Q1[C]", v(t[2])),
                    ])
                })
                .collect();
            let f = Fixture::new(
                vec![Question::new("1", "Q1", QuestionType::MultipleChoice)],
                &[],
                rows,
            );
            match f.result("1") {
                QuestionResult::MultipleChoice { counts, respondents } => {
                    prop_assert_eq!(counts.len(), 3);
                    prop_assert!(respondents <= ticks.len() as u64);
                    for (_, c) in counts.counts.iter() {
                        prop_assert!(*c <= respondents);
                    }
                    let expected = ticks.iter().filter(|t| t.iter().any(|b| *b)).count() as u64;
                    prop_assert_eq!(respondents, expected);
                }
                x => prop_assert!(false, "unexpected result {:?}", x),
            }
        }

        #[test]
        fn ranking_counts_every_filled_rank(ranks in prop::collection::vec(prop::collection::vec("[XYZ]?", 3), 1..30)) {
            let rows: Vec<ResponseRecord> = ranks
                .iter()
                .map(|r| {
                    ResponseRecord::from_pairs(&[
                        ("R[1]", r[0].as_str()),
                        ("R[2]", r[1].as_str()),
                        ("R[3]", r[2].as_str()),
                    ])
                })
                .collect();
            let f = Fixture::new(
                vec![Question::new("1", "R", QuestionType::Ranking)],
                &[],
                rows,
            );
            let filled = ranks.iter().flatten().filter(|v| !v.is_empty()).count() as u64;
            match f.result("1") {
                QuestionResult::Ranking(res) => {
                    let total: u64 = res.iter().map(|(_, d)| d.total()).sum();
                    prop_assert_eq!(total, filled);
                }
                x => prop_assert!(false, "unexpected result {:?}", x),
            }
        }
    }
}
