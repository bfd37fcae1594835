// Primitives for reading CSV files.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::survey::{io_common::make_default_id, *};

const BOM: char = '\u{feff}';

// LimeSurvey writes its CSV exports with semicolons.
fn detect_delimiter(path: &str) -> SurveyResult<u8> {
    let f = File::open(path).context(OpeningFileSnafu { path })?;
    let mut first_line = String::new();
    BufReader::new(f)
        .read_line(&mut first_line)
        .context(OpeningFileSnafu { path })?;
    let delimiter = if first_line.matches(';').count() > first_line.matches(',').count() {
        b';'
    } else {
        b','
    };
    debug!(
        "detect_delimiter: {:?}: {:?}",
        path, delimiter as char
    );
    Ok(delimiter)
}

/// Reads the responses from a CSV file with a header row of column codes.
pub fn read_csv_responses(path: &str) -> SurveyResult<Vec<ResponseRecord>> {
    let default_id = make_default_id(path);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(detect_delimiter(path)?)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let headers: Vec<String> = rdr
        .headers()
        .context(CsvOpenSnafu { path })?
        .iter()
        .map(|h| h.trim_start_matches(BOM).trim().to_string())
        .collect();
    debug!("read_csv_responses: headers: {:?}", headers);

    let mut res: Vec<ResponseRecord> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let mut record = ResponseRecord::new(Some(default_id(lineno)));
        for (column, value) in headers.iter().zip(line.iter()) {
            record.insert(column, value);
        }
        res.push(record);
    }
    Ok(res)
}
