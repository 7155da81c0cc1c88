use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names – the delimited source schema
// ---------------------------------------------------------------------------

pub const COL_EEID: &str = "EEID";
pub const COL_FULL_NAME: &str = "Full Name";
pub const COL_DEPARTMENT: &str = "Department";
pub const COL_BUSINESS_UNIT: &str = "BusinessUnit";
pub const COL_GENDER: &str = "Gender";
pub const COL_ETHNICITY: &str = "Ethnicity";
pub const COL_AGE: &str = "Age";
pub const COL_HIRE_DATE: &str = "HireDate";
pub const COL_ANNUAL_SALARY: &str = "AnnualSalary";
pub const COL_BONUS_PCT: &str = "Bonus%";
pub const COL_COUNTRY: &str = "Country";
pub const COL_CITY: &str = "City";
pub const COL_EXIT_DATE: &str = "ExitDate";

/// Columns the engine reads. Loading fails if any is absent.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_EEID,
    COL_DEPARTMENT,
    COL_COUNTRY,
    COL_BUSINESS_UNIT,
    COL_AGE,
    COL_ANNUAL_SALARY,
    COL_GENDER,
    COL_HIRE_DATE,
];

/// Columns carried through untouched so exports reproduce the source.
pub const PASSTHROUGH_COLUMNS: [&str; 5] = [
    COL_FULL_NAME,
    COL_ETHNICITY,
    COL_BONUS_PCT,
    COL_CITY,
    COL_EXIT_DATE,
];

// ---------------------------------------------------------------------------
// DateFormat – the single date convention used throughout one source file
// ---------------------------------------------------------------------------

/// The hire-date convention of a source file, detected once on load and
/// reused when exporting, so round-trips keep the source's own notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormat(&'static str);

impl DateFormat {
    /// Formats tried, in order, against the first data row. Ambiguous
    /// day/month values resolve to the earlier candidate.
    pub const CANDIDATES: [DateFormat; 3] = [
        DateFormat("%Y-%m-%d"),
        DateFormat("%m/%d/%Y"),
        DateFormat("%d/%m/%Y"),
    ];

    /// Pick the first candidate that parses `sample`.
    pub fn detect(sample: &str) -> Option<DateFormat> {
        Self::CANDIDATES
            .iter()
            .copied()
            .find(|fmt| fmt.parse(sample).is_some())
    }

    pub fn parse(&self, s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), self.0).ok()
    }

    pub fn render(&self, date: NaiveDate) -> String {
        date.format(self.0).to_string()
    }
}

// ---------------------------------------------------------------------------
// EmployeeRecord – one row of the source file
// ---------------------------------------------------------------------------

/// A single employee (one row of the source file), with typed fields for
/// everything the engine touches and raw strings for the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRecord {
    pub id: String,
    pub department: String,
    pub business_unit: String,
    pub country: String,
    pub gender: String,
    pub age: u32,
    pub annual_salary: f64,
    pub hire_date: NaiveDate,
    /// Whole years since `hire_date`, computed once against the load-time
    /// date. Negative when the hire date lies in the future.
    pub tenure_years: i64,

    // Passthrough columns: unused by the engine, reproduced on export.
    pub full_name: String,
    pub ethnicity: String,
    pub bonus_pct: String,
    pub city: String,
    pub exit_date: String,
}

/// floor((today − hire) in days / 365), with a true floor so future hire
/// dates go negative instead of rounding toward zero.
pub fn tenure_years(hire: NaiveDate, today: NaiveDate) -> i64 {
    (today - hire).num_days().div_euclid(365)
}

// ---------------------------------------------------------------------------
// EmployeeDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter indexes.
///
/// Immutable after load: one instance per session, shared by reference with
/// every `apply` call.
#[derive(Debug, Clone)]
pub struct EmployeeDataset {
    /// All employees, in source-file order.
    pub records: Vec<EmployeeRecord>,
    /// The source header, in source order. Export reproduces it verbatim.
    pub header: Vec<String>,
    /// Date convention detected on load.
    pub date_format: DateFormat,

    /// Distinct values per filterable categorical column.
    pub departments: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub business_units: BTreeSet<String>,

    /// Observed (min, max) spans; (0, 0) for an empty dataset.
    pub age_span: (u32, u32),
    pub salary_span: (f64, f64),
}

impl EmployeeDataset {
    /// Build the filter indexes from loaded records.
    pub fn from_records(
        records: Vec<EmployeeRecord>,
        header: Vec<String>,
        date_format: DateFormat,
    ) -> Self {
        let mut departments = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut business_units = BTreeSet::new();
        let mut age_span: Option<(u32, u32)> = None;
        let mut salary_span: Option<(f64, f64)> = None;

        for rec in &records {
            departments.insert(rec.department.clone());
            countries.insert(rec.country.clone());
            business_units.insert(rec.business_unit.clone());

            age_span = Some(match age_span {
                None => (rec.age, rec.age),
                Some((lo, hi)) => (lo.min(rec.age), hi.max(rec.age)),
            });
            salary_span = Some(match salary_span {
                None => (rec.annual_salary, rec.annual_salary),
                Some((lo, hi)) => (lo.min(rec.annual_salary), hi.max(rec.annual_salary)),
            });
        }

        EmployeeDataset {
            records,
            header,
            date_format,
            departments,
            countries,
            business_units,
            age_span: age_span.unwrap_or((0, 0)),
            salary_span: salary_span.unwrap_or((0.0, 0.0)),
        }
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tenure_floors_whole_years() {
        let hire = date(2020, 1, 1);
        assert_eq!(tenure_years(hire, date(2020, 12, 30)), 0);
        assert_eq!(tenure_years(hire, date(2021, 1, 1)), 1);
        assert_eq!(tenure_years(hire, date(2025, 6, 1)), 5);
    }

    #[test]
    fn tenure_goes_negative_for_future_hires() {
        let today = date(2024, 1, 1);
        assert_eq!(tenure_years(date(2024, 1, 2), today), -1);
        assert_eq!(tenure_years(date(2025, 6, 1), today), -2);
    }

    #[test]
    fn date_format_detection_prefers_earlier_candidates() {
        assert_eq!(
            DateFormat::detect("2020-05-17"),
            Some(DateFormat::CANDIDATES[0])
        );
        // Ambiguous day/month: month-first wins.
        assert_eq!(
            DateFormat::detect("01/02/2020"),
            Some(DateFormat::CANDIDATES[1])
        );
        // Day value above 12 only fits day-first.
        assert_eq!(
            DateFormat::detect("25/02/2020"),
            Some(DateFormat::CANDIDATES[2])
        );
        assert_eq!(DateFormat::detect("not a date"), None);
    }

    #[test]
    fn date_format_round_trips() {
        let fmt = DateFormat::detect("2020-05-17").unwrap();
        let parsed = fmt.parse("2020-05-17").unwrap();
        assert_eq!(fmt.render(parsed), "2020-05-17");
    }
}
