use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{EmployeeDataset, EmployeeRecord};
use crate::error::InvalidFilter;

// ---------------------------------------------------------------------------
// FilterSpec – the user's current filter selection
// ---------------------------------------------------------------------------

/// The filterable categorical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalColumn {
    Department,
    Country,
    BusinessUnit,
}

/// A complete filter selection. A record passes iff every clause holds:
/// membership in all three categorical sets plus both inclusive ranges.
///
/// An empty categorical set is a valid selection that matches nothing
/// (deselecting every department hides every record, it does not mean
/// "no constraint").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    pub departments: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub business_units: BTreeSet<String>,
    /// Inclusive (min, max).
    pub age_range: (u32, u32),
    /// Inclusive (min, max).
    pub salary_range: (f64, f64),
}

impl FilterSpec {
    /// The identity spec for a dataset: every distinct categorical value
    /// selected and both ranges at the observed spans. Applying it returns
    /// the dataset unchanged.
    pub fn full(dataset: &EmployeeDataset) -> Self {
        FilterSpec {
            departments: dataset.departments.clone(),
            countries: dataset.countries.clone(),
            business_units: dataset.business_units.clone(),
            age_range: dataset.age_span,
            salary_range: dataset.salary_span,
        }
    }

    /// Reject inverted ranges instead of silently swapping bounds.
    pub fn validate(&self) -> Result<(), InvalidFilter> {
        let (age_min, age_max) = self.age_range;
        if age_min > age_max {
            return Err(InvalidFilter::AgeRange {
                min: age_min,
                max: age_max,
            });
        }
        let (salary_min, salary_max) = self.salary_range;
        if salary_min > salary_max {
            return Err(InvalidFilter::SalaryRange {
                min: salary_min,
                max: salary_max,
            });
        }
        Ok(())
    }

    /// Whether a record passes every clause.
    pub fn matches(&self, rec: &EmployeeRecord) -> bool {
        self.departments.contains(&rec.department)
            && self.countries.contains(&rec.country)
            && self.business_units.contains(&rec.business_unit)
            && self.age_range.0 <= rec.age
            && rec.age <= self.age_range.1
            && self.salary_range.0 <= rec.annual_salary
            && rec.annual_salary <= self.salary_range.1
    }

    /// The selection set for one categorical column.
    pub fn selection(&self, column: CategoricalColumn) -> &BTreeSet<String> {
        match column {
            CategoricalColumn::Department => &self.departments,
            CategoricalColumn::Country => &self.countries,
            CategoricalColumn::BusinessUnit => &self.business_units,
        }
    }

    pub fn selection_mut(&mut self, column: CategoricalColumn) -> &mut BTreeSet<String> {
        match column {
            CategoricalColumn::Department => &mut self.departments,
            CategoricalColumn::Country => &mut self.countries,
            CategoricalColumn::BusinessUnit => &mut self.business_units,
        }
    }
}

impl CategoricalColumn {
    /// The dataset-wide distinct values for this column.
    pub fn distinct<'a>(&self, dataset: &'a EmployeeDataset) -> &'a BTreeSet<String> {
        match self {
            CategoricalColumn::Department => &dataset.departments,
            CategoricalColumn::Country => &dataset.countries,
            CategoricalColumn::BusinessUnit => &dataset.business_units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(department: &str, country: &str, age: u32, salary: f64) -> EmployeeRecord {
        EmployeeRecord {
            id: "E1".into(),
            department: department.into(),
            business_unit: "Corporate".into(),
            country: country.into(),
            gender: "F".into(),
            age,
            annual_salary: salary,
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            tenure_years: 4,
            full_name: String::new(),
            ethnicity: String::new(),
            bonus_pct: String::new(),
            city: String::new(),
            exit_date: String::new(),
        }
    }

    fn spec() -> FilterSpec {
        FilterSpec {
            departments: ["Sales".to_string()].into(),
            countries: ["US".to_string()].into(),
            business_units: ["Corporate".to_string()].into(),
            age_range: (25, 50),
            salary_range: (50_000.0, 100_000.0),
        }
    }

    #[test]
    fn all_clauses_must_hold() {
        let s = spec();
        assert!(s.matches(&record("Sales", "US", 30, 60_000.0)));
        assert!(!s.matches(&record("Engineering", "US", 30, 60_000.0)));
        assert!(!s.matches(&record("Sales", "UK", 30, 60_000.0)));
        assert!(!s.matches(&record("Sales", "US", 24, 60_000.0)));
        assert!(!s.matches(&record("Sales", "US", 30, 120_000.0)));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let s = spec();
        assert!(s.matches(&record("Sales", "US", 25, 50_000.0)));
        assert!(s.matches(&record("Sales", "US", 50, 100_000.0)));
    }

    #[test]
    fn empty_categorical_set_matches_nothing() {
        let mut s = spec();
        s.departments.clear();
        assert!(!s.matches(&record("Sales", "US", 30, 60_000.0)));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let mut s = spec();
        s.age_range = (50, 25);
        assert_eq!(
            s.validate(),
            Err(InvalidFilter::AgeRange { min: 50, max: 25 })
        );

        let mut s = spec();
        s.salary_range = (100_000.0, 50_000.0);
        assert!(matches!(
            s.validate(),
            Err(InvalidFilter::SalaryRange { .. })
        ));
    }
}
