use std::io::Write;
use std::path::Path;

use log::info;

use super::model::{
    DateFormat, EmployeeDataset, EmployeeRecord, COL_AGE, COL_ANNUAL_SALARY, COL_BONUS_PCT,
    COL_BUSINESS_UNIT, COL_CITY, COL_COUNTRY, COL_DEPARTMENT, COL_EEID, COL_ETHNICITY,
    COL_EXIT_DATE, COL_FULL_NAME, COL_GENDER, COL_HIRE_DATE,
};

// ---------------------------------------------------------------------------
// CSV export – the inverse of the loader
// ---------------------------------------------------------------------------

/// Write records as delimited text with the dataset's own header: same
/// column set, same order, dates rendered with the load-time format.
///
/// Feeding the output back through the loader reproduces the records
/// (modulo `tenure_years`, which is re-derived against the new load date).
pub fn export_csv<W: Write>(
    writer: W,
    dataset: &EmployeeDataset,
    records: &[EmployeeRecord],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(&dataset.header)?;
    for rec in records {
        let row: Vec<String> = dataset
            .header
            .iter()
            .map(|column| column_value(rec, column, dataset.date_format))
            .collect();
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export to a file path.
pub fn export_to_path(
    path: &Path,
    dataset: &EmployeeDataset,
    records: &[EmployeeRecord],
) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    export_csv(file, dataset, records)?;
    info!("exported {} records to {}", records.len(), path.display());
    Ok(())
}

/// Render one cell. `{}` on `f64` prints the shortest exact representation,
/// so salaries are never truncated.
fn column_value(rec: &EmployeeRecord, column: &str, date_format: DateFormat) -> String {
    match column {
        COL_EEID => rec.id.clone(),
        COL_DEPARTMENT => rec.department.clone(),
        COL_BUSINESS_UNIT => rec.business_unit.clone(),
        COL_COUNTRY => rec.country.clone(),
        COL_GENDER => rec.gender.clone(),
        COL_AGE => rec.age.to_string(),
        COL_ANNUAL_SALARY => rec.annual_salary.to_string(),
        COL_HIRE_DATE => date_format.render(rec.hire_date),
        COL_FULL_NAME => rec.full_name.clone(),
        COL_ETHNICITY => rec.ethnicity.clone(),
        COL_BONUS_PCT => rec.bonus_pct.clone(),
        COL_CITY => rec.city.clone(),
        COL_EXIT_DATE => rec.exit_date.clone(),
        // The loader rejects anything else at load time.
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;
    use chrono::NaiveDate;

    #[test]
    fn export_matches_header_order_and_formats() {
        let text = "Full Name,EEID,Department,Country,BusinessUnit,Age,AnnualSalary,Gender,HireDate\n\
                    Ada Park,E1,Sales,US,Corporate,30,60000,F,2020-01-01\n";
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let ds = load_reader(text.as_bytes(), today).unwrap();

        let mut out = Vec::new();
        export_csv(&mut out, &ds, &ds.records).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), text);
    }

    #[test]
    fn fractional_salaries_are_not_truncated() {
        let text = "EEID,Department,Country,BusinessUnit,Age,AnnualSalary,Gender,HireDate\n\
                    E1,Sales,US,Corporate,30,60000.55,F,2020-01-01\n";
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let ds = load_reader(text.as_bytes(), today).unwrap();

        let mut out = Vec::new();
        export_csv(&mut out, &ds, &ds.records).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("60000.55"));
    }
}
