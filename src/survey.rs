use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_analysis::*;

use std::fs;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::cache_file::FileOptionCache;
use crate::survey::config_reader::*;

pub mod cache_file;
pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod io_json;
pub mod output;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Unexpected cell in row {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error reading file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error formatting the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error opening the CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Invalid survey structure"))]
    Schema { source: SchemaError },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

fn read_responses(inputs: &AnalysisInputs) -> SurveyResult<Vec<ResponseRecord>> {
    let path = inputs.responses_path.as_str();
    info!(
        "Attempting to read responses {:?} as {:?}",
        path, inputs.provider
    );
    let records = match inputs.provider {
        ResponsesProvider::Json => io_json::read_json_responses(path)?,
        ResponsesProvider::Csv => io_csv::read_csv_responses(path)?,
        ResponsesProvider::Xlsx => {
            io_excel::read_excel_responses(path, inputs.excel_worksheet_name.as_deref())?
        }
    };
    info!("read_responses: {} responses", records.len());
    if inputs.keep_incomplete {
        Ok(records)
    } else {
        Ok(responses::drop_incomplete(records))
    }
}

/// Reads all the inputs, runs the analysis and returns the JSON summary.
pub fn analyze_inputs(inputs: &AnalysisInputs) -> SurveyResult<JSValue> {
    let question_rows = io_json::read_question_rows(&inputs.questions_path)?;
    let option_rows = match &inputs.options_path {
        Some(p) => io_json::read_option_rows(p)?,
        None => {
            warn!("No answer options provided, the raw answers will be reported");
            Vec::new()
        }
    };
    let records = read_responses(inputs)?;

    let questions = catalog::load_questions(&question_rows).context(SchemaSnafu {})?;
    let raw_options = options::load_raw_options(&option_rows).context(SchemaSnafu {})?;

    let result = match &inputs.cache_directory {
        Some(dir) => {
            let mut cache = FileOptionCache::new(dir, inputs.survey_id.as_deref());
            analyze_with_cache(
                &questions,
                &raw_options,
                &records,
                &inputs.rules,
                &mut cache,
            )
        }
        None => analyze(&questions, &raw_options, &records, &inputs.rules),
    }
    .context(SchemaSnafu {})?;

    for (qid, e) in result.failures.iter() {
        warn!("Question {} could not be processed: {}", qid, e);
    }
    Ok(output::build_summary_js(
        inputs,
        &questions,
        records.len(),
        &result,
    ))
}

fn write_summary(pretty_js: &str, out: Option<&str>) -> SurveyResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

/// Fails if the summary differs from the reference summary, after printing
/// the differences.
pub fn check_reference(pretty_js: &str, reference_path: &str) -> SurveyResult<()> {
    let summary_ref = io_json::read_json(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js, "\n");
        whatever!("Difference detected between computed summary and reference summary")
    }
    debug!("check_reference: summary matches {:?}", reference_path);
    Ok(())
}

pub fn run_analysis(args: &Args) -> SurveyResult<()> {
    let inputs = resolve_inputs(args)?;
    info!("inputs: {:?}", inputs);

    let summary = analyze_inputs(&inputs)?;
    let pretty_js = serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;
    write_summary(&pretty_js, inputs.output_path.as_deref())?;

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(&pretty_js, reference_path)?;
    }
    Ok(())
}
