use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::survey::{io_common::make_default_id, *};

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> SurveyResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: path: {:?} worksheet: {:?}", &path, &worksheet_name);
                Ok(wrange.clone())
            }
            _ => {
                let names: Vec<&String> = all_worksheets.iter().map(|(n, _)| n).collect();
                whatever!(
                    "{} has several worksheets {:?}: choose one with excelWorksheetName",
                    path,
                    names
                )
            }
        }
    }
}

fn cell_to_string(lineno: usize, cell: &DataType) -> SurveyResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        // Codes typed as numbers come back as floats.
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::DateTime(f) => Ok(f.to_string()),
        x => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

/// Reads the responses from a worksheet whose first row holds the column
/// codes.
pub fn read_excel_responses(
    path: &str,
    worksheet_name: Option<&str>,
) -> SurveyResult<Vec<ResponseRecord>> {
    let default_id = make_default_id(path);
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(|c| cell_to_string(1, c).map(|s| s.trim().to_string()))
        .collect::<SurveyResult<Vec<String>>>()?;
    debug!("read_excel_responses: header: {:?}", header);

    let mut res: Vec<ResponseRecord> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // Same numbering as in the spreadsheet.
        let lineno = idx + 2;
        let mut record = ResponseRecord::new(Some(default_id(lineno)));
        for (column, cell) in header.iter().zip(row.iter()) {
            if column.is_empty() {
                continue;
            }
            record.insert(column, &cell_to_string(lineno, cell)?);
        }
        res.push(record);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(2, &DataType::Float(3.0)).unwrap(), "3");
        assert_eq!(cell_to_string(2, &DataType::Float(2.5)).unwrap(), "2.5");
        assert_eq!(cell_to_string(2, &DataType::Int(7)).unwrap(), "7");
        assert_eq!(cell_to_string(2, &DataType::Empty).unwrap(), "");
        assert_eq!(
            cell_to_string(2, &DataType::String("A1".to_string())).unwrap(),
            "A1"
        );
        assert!(cell_to_string(2, &DataType::Error(calamine::CellErrorType::Div0)).is_err());
    }

    #[test]
    fn missing_workbook() {
        assert!(read_excel_responses("/nonexistent/responses.xlsx", None).is_err());
    }
}
