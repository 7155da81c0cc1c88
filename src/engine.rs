//! The filter-and-aggregate engine.
//!
//! `apply` is a pure function from an immutable dataset and a filter spec to
//! a fresh [`FilteredView`]; nothing is cached or incrementally maintained
//! between calls.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::data::filter::FilterSpec;
use crate::data::model::{EmployeeDataset, EmployeeRecord};
use crate::error::InvalidFilter;

/// Bin count of the tenure histogram.
pub const TENURE_BINS: usize = 10;

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Headline metrics of a filtered set. Means are `None` for an empty set,
/// never NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub count: usize,
    pub total_salary: f64,
    pub mean_age: Option<f64>,
    pub mean_tenure: Option<f64>,
}

/// One equal-width tenure bin: `[start, end)`, except the last bin which
/// also includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenureBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// The filtered subset plus every derived aggregation, recomputed from
/// scratch for each spec.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredView {
    /// Surviving records, in source order.
    pub records: Vec<EmployeeRecord>,
    pub metrics: Metrics,
    /// Gender value → count, only for values present in the filtered set.
    pub gender_distribution: BTreeMap<String, usize>,
    /// Department → salary sum, only for departments present in the set.
    pub salary_by_department: BTreeMap<String, f64>,
    /// Equal-width bins over the filtered set's own tenure span; empty for
    /// an empty set.
    pub tenure_histogram: Vec<TenureBin>,
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

/// Filter `dataset` with `spec` and compute all aggregations.
///
/// An empty result is valid; a malformed spec (inverted range) is the only
/// error.
pub fn apply(
    dataset: &EmployeeDataset,
    spec: &FilterSpec,
) -> Result<FilteredView, InvalidFilter> {
    spec.validate()?;

    let records: Vec<EmployeeRecord> = dataset
        .records
        .iter()
        .filter(|rec| spec.matches(rec))
        .cloned()
        .collect();
    debug!("filter matched {} of {} records", records.len(), dataset.len());

    Ok(FilteredView {
        metrics: compute_metrics(&records),
        gender_distribution: gender_distribution(&records),
        salary_by_department: salary_by_department(&records),
        tenure_histogram: tenure_histogram(&records, TENURE_BINS),
        records,
    })
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

fn compute_metrics(records: &[EmployeeRecord]) -> Metrics {
    let count = records.len();
    let total_salary: f64 = records.iter().map(|r| r.annual_salary).sum();

    let (mean_age, mean_tenure) = if count == 0 {
        (None, None)
    } else {
        let age_sum: u64 = records.iter().map(|r| u64::from(r.age)).sum();
        let tenure_sum: i64 = records.iter().map(|r| r.tenure_years).sum();
        (
            Some(age_sum as f64 / count as f64),
            Some(tenure_sum as f64 / count as f64),
        )
    };

    Metrics {
        count,
        total_salary,
        mean_age,
        mean_tenure,
    }
}

fn gender_distribution(records: &[EmployeeRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for rec in records {
        *counts.entry(rec.gender.clone()).or_insert(0) += 1;
    }
    counts
}

fn salary_by_department(records: &[EmployeeRecord]) -> BTreeMap<String, f64> {
    let mut sums = BTreeMap::new();
    for rec in records {
        *sums.entry(rec.department.clone()).or_insert(0.0) += rec.annual_salary;
    }
    sums
}

/// Equal-width histogram over the records' own observed tenure span.
///
/// The span shifts with every filter change on purpose; bins are not
/// anchored to the unfiltered dataset. A single distinct tenure value
/// collapses to one bin covering it.
fn tenure_histogram(records: &[EmployeeRecord], bins: usize) -> Vec<TenureBin> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    let mut min = first.tenure_years;
    let mut max = first.tenure_years;
    for rec in records {
        min = min.min(rec.tenure_years);
        max = max.max(rec.tenure_years);
    }

    if min == max {
        return vec![TenureBin {
            start: min as f64,
            end: max as f64,
            count: records.len(),
        }];
    }

    let lo = min as f64;
    let width = (max - min) as f64 / bins as f64;
    let mut histogram: Vec<TenureBin> = (0..bins)
        .map(|i| TenureBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for rec in records {
        let offset = (rec.tenure_years as f64 - lo) / width;
        // The maximum lands exactly on the top edge; fold it into the
        // last bin.
        let idx = (offset as usize).min(bins - 1);
        histogram[idx].count += 1;
    }

    histogram
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DateFormat;
    use chrono::NaiveDate;

    fn record(
        id: &str,
        department: &str,
        country: &str,
        gender: &str,
        age: u32,
        salary: f64,
        tenure: i64,
    ) -> EmployeeRecord {
        EmployeeRecord {
            id: id.into(),
            department: department.into(),
            business_unit: "Corporate".into(),
            country: country.into(),
            gender: gender.into(),
            age,
            annual_salary: salary,
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            tenure_years: tenure,
            full_name: String::new(),
            ethnicity: String::new(),
            bonus_pct: String::new(),
            city: String::new(),
            exit_date: String::new(),
        }
    }

    fn dataset(records: Vec<EmployeeRecord>) -> EmployeeDataset {
        EmployeeDataset::from_records(records, Vec::new(), DateFormat::CANDIDATES[0])
    }

    fn three_employees() -> EmployeeDataset {
        dataset(vec![
            record("E1", "Sales", "US", "F", 30, 60_000.0, 4),
            record("E2", "Sales", "UK", "M", 45, 90_000.0, 14),
            record("E3", "Engineering", "US", "M", 50, 120_000.0, 9),
        ])
    }

    #[test]
    fn identity_spec_returns_whole_dataset() {
        let ds = three_employees();
        let view = apply(&ds, &FilterSpec::full(&ds)).unwrap();
        assert_eq!(view.records, ds.records);
    }

    #[test]
    fn example_scenario() {
        // All categoricals selected, age [25, 50], salary [50k, 100k]:
        // the Engineering record is excluded by salary alone.
        let ds = three_employees();
        let mut spec = FilterSpec::full(&ds);
        spec.age_range = (25, 50);
        spec.salary_range = (50_000.0, 100_000.0);

        let view = apply(&ds, &spec).unwrap();
        let ids: Vec<&str> = view.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["E1", "E2"]);

        assert_eq!(view.metrics.count, 2);
        assert_eq!(view.metrics.total_salary, 150_000.0);
        assert_eq!(view.gender_distribution["F"], 1);
        assert_eq!(view.gender_distribution["M"], 1);
        assert_eq!(view.salary_by_department.len(), 1);
        assert_eq!(view.salary_by_department["Sales"], 150_000.0);
    }

    #[test]
    fn aggregation_totals_are_consistent() {
        let ds = three_employees();
        let view = apply(&ds, &FilterSpec::full(&ds)).unwrap();

        let dept_total: f64 = view.salary_by_department.values().sum();
        assert_eq!(dept_total, view.metrics.total_salary);

        let gender_total: usize = view.gender_distribution.values().sum();
        assert_eq!(gender_total, view.metrics.count);
    }

    #[test]
    fn empty_result_is_valid_and_fully_empty() {
        let ds = three_employees();
        let mut spec = FilterSpec::full(&ds);
        spec.salary_range = (10_000_000.0, 20_000_000.0);

        let view = apply(&ds, &spec).unwrap();
        assert!(view.records.is_empty());
        assert_eq!(view.metrics.count, 0);
        assert_eq!(view.metrics.total_salary, 0.0);
        assert_eq!(view.metrics.mean_age, None);
        assert_eq!(view.metrics.mean_tenure, None);
        assert!(view.gender_distribution.is_empty());
        assert!(view.salary_by_department.is_empty());
        assert!(view.tenure_histogram.is_empty());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let ds = three_employees();
        let mut spec = FilterSpec::full(&ds);
        spec.salary_range = (100_000.0, 50_000.0);
        assert!(apply(&ds, &spec).is_err());
    }

    #[test]
    fn means_are_computed_over_the_filtered_set() {
        let ds = three_employees();
        let view = apply(&ds, &FilterSpec::full(&ds)).unwrap();
        let mean_age = view.metrics.mean_age.unwrap();
        assert!((mean_age - (30.0 + 45.0 + 50.0) / 3.0).abs() < 1e-9);
        let mean_tenure = view.metrics.mean_tenure.unwrap();
        assert!((mean_tenure - 9.0).abs() < 1e-9);
    }

    #[test]
    fn histogram_spans_the_filtered_tenure_range() {
        let ds = three_employees();
        let view = apply(&ds, &FilterSpec::full(&ds)).unwrap();
        let bins = &view.tenure_histogram;

        assert_eq!(bins.len(), TENURE_BINS);
        assert_eq!(bins.first().unwrap().start, 4.0);
        assert_eq!(bins.last().unwrap().end, 14.0);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 3);
        // The maximum tenure falls into the last bin, not past it.
        assert_eq!(bins.last().unwrap().count, 1);
    }

    #[test]
    fn histogram_collapses_when_all_tenures_are_equal() {
        let ds = dataset(vec![
            record("E1", "Sales", "US", "F", 30, 60_000.0, 5),
            record("E2", "Sales", "US", "M", 40, 70_000.0, 5),
        ]);
        let view = apply(&ds, &FilterSpec::full(&ds)).unwrap();
        assert_eq!(view.tenure_histogram.len(), 1);
        assert_eq!(view.tenure_histogram[0].count, 2);
    }

    #[test]
    fn negative_tenure_flows_through_unclamped() {
        let ds = dataset(vec![
            record("E1", "Sales", "US", "F", 30, 60_000.0, -1),
            record("E2", "Sales", "US", "M", 40, 70_000.0, 9),
        ]);
        let view = apply(&ds, &FilterSpec::full(&ds)).unwrap();
        assert_eq!(view.metrics.mean_tenure, Some(4.0));
        assert_eq!(view.tenure_histogram.first().unwrap().start, -1.0);
    }
}
