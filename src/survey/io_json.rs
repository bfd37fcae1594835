// Primitives for reading the JSON exports.

use serde_json::Map as JSMap;

use crate::survey::{io_common::make_default_id, *};

/// The remote API answers this instead of an empty option list.
const NO_OPTIONS: &str = "No available answer options";

pub fn read_json(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

/// The textual form of a value. `null` is a missing value.
pub fn js_to_string(v: &JSValue) -> Option<String> {
    match v {
        JSValue::Null => None,
        JSValue::String(s) => Some(s.clone()),
        JSValue::Number(n) => Some(n.to_string()),
        JSValue::Bool(b) => Some(b.to_string()),
        x => Some(x.to_string()),
    }
}

fn object_to_row(obj: &JSMap<String, JSValue>) -> RawRow {
    obj.iter()
        .filter_map(|(k, v)| js_to_string(v).map(|s| (k.clone(), s)))
        .collect()
}

fn rows_from_array(elts: &[JSValue], path: &str) -> SurveyResult<Vec<RawRow>> {
    let mut res: Vec<RawRow> = Vec::new();
    for (idx, elt) in elts.iter().enumerate() {
        match elt {
            JSValue::Object(obj) => res.push(object_to_row(obj)),
            x => whatever!("{}: element {} is not an object: {}", path, idx, x),
        }
    }
    Ok(res)
}

/// Reads the question rows: an array of objects.
pub fn read_question_rows(path: &str) -> SurveyResult<Vec<RawRow>> {
    let js = read_json(path)?;
    let res = match &js {
        JSValue::Array(elts) => rows_from_array(elts, path)?,
        _ => whatever!("{}: expected an array of questions", path),
    };
    info!("read_question_rows: {} rows from {:?}", res.len(), path);
    Ok(res)
}

/// Reads the option rows: either an array of objects, or an object that maps
/// each question id to its options, keyed by option code.
pub fn read_option_rows(path: &str) -> SurveyResult<Vec<RawRow>> {
    let js = read_json(path)?;
    let res = match &js {
        JSValue::Array(elts) => rows_from_array(elts, path)?,
        JSValue::Object(by_question) => {
            let mut res: Vec<RawRow> = Vec::new();
            for (qid, opts) in by_question.iter() {
                match opts {
                    JSValue::Object(by_code) => {
                        for (code, opt) in by_code.iter() {
                            let mut row = match opt {
                                JSValue::Object(obj) => object_to_row(obj),
                                x => whatever!("{}: option {} of {}: {}", path, code, qid, x),
                            };
                            row.insert("qid".to_string(), qid.clone());
                            row.insert("code".to_string(), code.clone());
                            res.push(row);
                        }
                    }
                    JSValue::String(s) if s == NO_OPTIONS => {
                        debug!("read_option_rows: question {} has no options", qid);
                    }
                    JSValue::Null => {}
                    x => whatever!("{}: unexpected options for question {}: {}", path, qid, x),
                }
            }
            res
        }
        _ => whatever!("{}: expected an array or an object of options", path),
    };
    info!("read_option_rows: {} rows from {:?}", res.len(), path);
    Ok(res)
}

fn record_from_js(
    idx: usize,
    elt: &JSValue,
    default_id: &impl Fn(usize) -> String,
) -> SurveyResult<ResponseRecord> {
    let obj = match elt {
        JSValue::Object(obj) => obj,
        x => whatever!("response {} is not an object: {}", idx, x),
    };
    // LimeSurvey wraps each response in an object keyed by the response id.
    let obj = match obj.values().next() {
        Some(JSValue::Object(inner)) if obj.len() == 1 => inner,
        _ => obj,
    };
    let mut res = ResponseRecord::new(Some(default_id(idx + 1)));
    for (column, v) in obj.iter() {
        res.insert(column, &js_to_string(v).unwrap_or_default());
    }
    Ok(res)
}

/// Reads the responses: an array of records, an object with the array under
/// `responses`, or a single record.
pub fn read_json_responses(path: &str) -> SurveyResult<Vec<ResponseRecord>> {
    let default_id = make_default_id(path);
    let js = read_json(path)?;
    let elts: Vec<JSValue> = match js {
        JSValue::Array(elts) => elts,
        JSValue::Object(mut obj) => match obj.remove("responses") {
            Some(JSValue::Array(elts)) => elts,
            Some(x) => whatever!("{}: responses is not an array: {}", path, x),
            None => vec![JSValue::Object(obj)],
        },
        x => whatever!("{}: unexpected content {}", path, x),
    };
    let mut res: Vec<ResponseRecord> = Vec::new();
    for (idx, elt) in elts.iter().enumerate() {
        res.push(record_from_js(idx, elt, &default_id)?);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(dir: &Path, content: &str) -> String {
        let p = dir.join("data.json");
        fs::write(&p, content).unwrap();
        p.display().to_string()
    }

    #[test]
    fn question_rows_are_stringified() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(
            dir.path(),
            r#"[{"qid": 12, "type": "L", "title": "Q1", "mandatory": null, "other": true}]"#,
        );
        let rows = read_question_rows(&p).unwrap();
        assert_eq!(rows[0].get("qid").map(|s| s.as_str()), Some("12"));
        assert_eq!(rows[0].get("other").map(|s| s.as_str()), Some("true"));
        assert!(rows[0].get("mandatory").is_none());

        let not_array = write(dir.path(), r#"{"qid": 12}"#);
        assert!(read_question_rows(&not_array).is_err());
    }

    #[test]
    fn option_rows_from_the_api_shape() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(
            dir.path(),
            r#"{"1": {"A1": {"answer": "Yes", "order": 1}, "A2": {"answer": "No", "order": 2}},
                "2": "No available answer options"}"#,
        );
        let opts = survey_analysis::options::load_raw_options(&read_option_rows(&p).unwrap())
            .unwrap();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].question_id, "1");
        assert_eq!(opts[0].value, "A1");
        assert_eq!(opts[0].label, "Yes");
        assert_eq!(opts[1].order, Some(2));
    }

    #[test]
    fn response_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let flat = write(dir.path(), r#"[{"id": 1, "Q1": "A", "Q2": null}, {"Q1": 3}]"#);
        let records = read_json_responses(&flat).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_deref(), Some("1"));
        assert_eq!(records[0].get("Q2"), None);
        assert_eq!(records[1].get("Q1"), Some("3"));
        assert_eq!(records[1].id.as_deref(), Some("data.json-00000002"));

        let wrapped = write(
            dir.path(),
            r#"{"responses": [{"7": {"id": "7", "Q1": "B"}}]}"#,
        );
        let records = read_json_responses(&wrapped).unwrap();
        assert_eq!(records[0].id.as_deref(), Some("7"));
        assert_eq!(records[0].get("Q1"), Some("B"));

        let single = write(dir.path(), r#"{"Q1": "C", "Q2": "D"}"#);
        assert_eq!(read_json_responses(&single).unwrap().len(), 1);
    }
}
