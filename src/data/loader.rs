use std::io::Read;
use std::path::Path;

use chrono::{Local, NaiveDate};
use log::info;

use super::model::{
    tenure_years, DateFormat, EmployeeDataset, EmployeeRecord, COL_AGE, COL_ANNUAL_SALARY,
    COL_BONUS_PCT, COL_BUSINESS_UNIT, COL_CITY, COL_COUNTRY, COL_DEPARTMENT, COL_EEID,
    COL_ETHNICITY, COL_EXIT_DATE, COL_FULL_NAME, COL_GENDER, COL_HIRE_DATE, PASSTHROUGH_COLUMNS,
    REQUIRED_COLUMNS,
};
use crate::error::MalformedInput;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an employee dataset from a delimited text file.
///
/// Tenure is derived against the current local date, once, here; it is a
/// session-long snapshot, never re-evaluated per filter change.
pub fn load_path(path: &Path) -> Result<EmployeeDataset, MalformedInput> {
    let file = std::fs::File::open(path)?;
    let dataset = load_reader(file, Local::now().date_naive())?;
    info!(
        "loaded {} employees from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Load from any reader, deriving tenure against `today`.
///
/// CSV layout: header row with the schema's column names; the eight required
/// columns must be present, the five passthrough columns may be. `HireDate`
/// uses one consistent format for the whole file, detected on the first data
/// row.
pub fn load_reader<R: Read>(
    reader: R,
    today: NaiveDate,
) -> Result<EmployeeDataset, MalformedInput> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let header: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = ColumnIndex::from_header(&header)?;

    let mut records = Vec::new();
    let mut date_format: Option<DateFormat> = None;

    for (row_no, result) in csv_reader.records().enumerate() {
        let row = result?;
        let record = parse_row(&row, &columns, &mut date_format, row_no, today)?;
        records.push(record);
    }

    // An empty file never saw a date; fall back to the first candidate so
    // exports still have a convention to render with.
    let date_format = date_format.unwrap_or(DateFormat::CANDIDATES[0]);

    Ok(EmployeeDataset::from_records(records, header, date_format))
}

// ---------------------------------------------------------------------------
// Header handling
// ---------------------------------------------------------------------------

/// Position of each consumed column within the source header.
struct ColumnIndex {
    eeid: usize,
    department: usize,
    business_unit: usize,
    country: usize,
    gender: usize,
    age: usize,
    annual_salary: usize,
    hire_date: usize,
    // Passthrough columns are optional.
    full_name: Option<usize>,
    ethnicity: Option<usize>,
    bonus_pct: Option<usize>,
    city: Option<usize>,
    exit_date: Option<usize>,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self, MalformedInput> {
        for name in header {
            let known = REQUIRED_COLUMNS.contains(&name.as_str())
                || PASSTHROUGH_COLUMNS.contains(&name.as_str());
            if !known {
                return Err(MalformedInput::UnknownColumn(name.clone()));
            }
        }

        let required = |name: &str| -> Result<usize, MalformedInput> {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| MalformedInput::MissingColumn(name.to_string()))
        };
        let optional = |name: &str| header.iter().position(|h| h == name);

        Ok(ColumnIndex {
            eeid: required(COL_EEID)?,
            department: required(COL_DEPARTMENT)?,
            business_unit: required(COL_BUSINESS_UNIT)?,
            country: required(COL_COUNTRY)?,
            gender: required(COL_GENDER)?,
            age: required(COL_AGE)?,
            annual_salary: required(COL_ANNUAL_SALARY)?,
            hire_date: required(COL_HIRE_DATE)?,
            full_name: optional(COL_FULL_NAME),
            ethnicity: optional(COL_ETHNICITY),
            bonus_pct: optional(COL_BONUS_PCT),
            city: optional(COL_CITY),
            exit_date: optional(COL_EXIT_DATE),
        })
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

fn parse_row(
    row: &csv::StringRecord,
    columns: &ColumnIndex,
    date_format: &mut Option<DateFormat>,
    row_no: usize,
    today: NaiveDate,
) -> Result<EmployeeRecord, MalformedInput> {
    let cell = |idx: usize| row.get(idx).unwrap_or("").trim();
    let passthrough = |idx: Option<usize>| idx.map(|i| cell(i).to_string()).unwrap_or_default();

    let age_text = cell(columns.age);
    let age: u32 = age_text.parse().map_err(|_| MalformedInput::BadNumber {
        row: row_no,
        column: COL_AGE.to_string(),
        value: age_text.to_string(),
    })?;

    let salary_text = cell(columns.annual_salary);
    let annual_salary: f64 = salary_text.parse().map_err(|_| MalformedInput::BadNumber {
        row: row_no,
        column: COL_ANNUAL_SALARY.to_string(),
        value: salary_text.to_string(),
    })?;

    let date_text = cell(columns.hire_date);
    let format = match *date_format {
        Some(fmt) => fmt,
        // First data row fixes the convention for the whole file.
        None => {
            let detected = DateFormat::detect(date_text)
                .ok_or_else(|| MalformedInput::UnknownDateFormat(date_text.to_string()))?;
            *date_format = Some(detected);
            detected
        }
    };
    let hire_date = format.parse(date_text).ok_or_else(|| MalformedInput::BadDate {
        row: row_no,
        column: COL_HIRE_DATE.to_string(),
        value: date_text.to_string(),
    })?;

    Ok(EmployeeRecord {
        id: cell(columns.eeid).to_string(),
        department: cell(columns.department).to_string(),
        business_unit: cell(columns.business_unit).to_string(),
        country: cell(columns.country).to_string(),
        gender: cell(columns.gender).to_string(),
        age,
        annual_salary,
        hire_date,
        tenure_years: tenure_years(hire_date, today),
        full_name: passthrough(columns.full_name),
        ethnicity: passthrough(columns.ethnicity),
        bonus_pct: passthrough(columns.bonus_pct),
        city: passthrough(columns.city),
        exit_date: passthrough(columns.exit_date),
    })
}
