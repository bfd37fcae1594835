use serde_json::json;
use serde_json::Map as JSMap;

use crate::survey::*;

fn distribution_to_json(d: &Distribution) -> JSValue {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for (label, count) in d.counts.iter() {
        m.insert(label.clone(), json!(count));
    }
    JSValue::Object(m)
}

fn labelled_to_json<T>(elts: &[(String, T)], f: impl Fn(&T) -> JSValue) -> JSValue {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for (label, x) in elts.iter() {
        m.insert(label.clone(), f(x));
    }
    JSValue::Object(m)
}

/// The JSON fields that hold the aggregate of a question.
fn result_to_json(res: &QuestionResult) -> JSMap<String, JSValue> {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    match res {
        QuestionResult::Choice(d) => {
            m.insert("distribution".to_string(), distribution_to_json(d));
        }
        QuestionResult::MultipleChoice {
            counts,
            respondents,
        } => {
            m.insert("distribution".to_string(), distribution_to_json(counts));
            m.insert("respondents".to_string(), json!(respondents));
            let rates = res.response_rates().unwrap_or_default();
            m.insert(
                "responseRates".to_string(),
                labelled_to_json(&rates, |r| json!(r)),
            );
        }
        QuestionResult::Ranking(ranks) => {
            m.insert(
                "ranks".to_string(),
                labelled_to_json(ranks, distribution_to_json),
            );
        }
        QuestionResult::FreeText(answers) => {
            m.insert("answers".to_string(), json!(answers));
        }
        QuestionResult::MultipleShortText(answers) => {
            m.insert(
                "answers".to_string(),
                labelled_to_json(answers, |a| json!(a)),
            );
        }
        QuestionResult::Array(rows) => {
            m.insert(
                "distributions".to_string(),
                labelled_to_json(rows, distribution_to_json),
            );
        }
    }
    m
}

pub fn build_summary_js(
    inputs: &AnalysisInputs,
    questions: &[Question],
    num_responses: usize,
    result: &AnalysisResult,
) -> JSValue {
    let question = |qid: &str| questions.iter().find(|q| q.id == qid);

    let results: Vec<JSValue> = result
        .results
        .iter()
        .map(|(qid, res)| {
            let mut entry: JSMap<String, JSValue> = JSMap::new();
            entry.insert("questionId".to_string(), json!(qid));
            if let Some(q) = question(qid.as_str()) {
                entry.insert("code".to_string(), json!(q.code));
                entry.insert("type".to_string(), json!(q.question_type.name()));
                entry.insert("title".to_string(), json!(q.title));
            }
            entry.extend(result_to_json(res));
            JSValue::Object(entry)
        })
        .collect();

    let failures: Vec<JSValue> = result
        .failures
        .iter()
        .map(|(qid, e)| {
            json!({
                "questionId": qid,
                "code": question(qid.as_str()).map(|q| q.code.clone()),
                "error": e.to_string()
            })
        })
        .collect();

    json!({
        "config": {
            "surveyName": inputs.survey_name,
            "surveyId": inputs.survey_id,
            "responses": num_responses
        },
        "results": results,
        "failures": failures
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_fields() {
        let mc = QuestionResult::MultipleChoice {
            counts: Distribution::from_counts(&[("A", 1), ("B", 0)]),
            respondents: 2,
        };
        let js = JSValue::Object(result_to_json(&mc));
        assert_eq!(
            js,
            json!({
                "distribution": {"A": 1, "B": 0},
                "respondents": 2,
                "responseRates": {"A": 0.5, "B": 0.0}
            })
        );

        let ranking = QuestionResult::Ranking(vec![(
            "X".to_string(),
            Distribution::from_counts(&[("1", 2)]),
        )]);
        assert_eq!(
            JSValue::Object(result_to_json(&ranking)),
            json!({"ranks": {"X": {"1": 2}}})
        );

        let texts = QuestionResult::MultipleShortText(vec![(
            "Name".to_string(),
            vec!["Ann".to_string()],
        )]);
        assert_eq!(
            JSValue::Object(result_to_json(&texts)),
            json!({"answers": {"Name": ["Ann"]}})
        );
    }

    #[test]
    fn distributions_keep_their_order() {
        let d = Distribution::from_counts(&[("Zeta", 1), ("Alpha", 2)]);
        let s = serde_json::to_string(&distribution_to_json(&d)).unwrap();
        assert_eq!(s, r#"{"Zeta":1,"Alpha":2}"#);
    }
}
