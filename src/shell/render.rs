use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::data::filter::FilterSpec;
use crate::data::model::{EmployeeDataset, EmployeeRecord};
use crate::engine::{FilteredView, Metrics, TenureBin};

const BAR_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// Overview blocks – metrics and the three charts
// ---------------------------------------------------------------------------

/// The full overview: metrics row plus all three charts.
pub fn view_block(view: &FilteredView) -> String {
    let mut out = String::new();
    out.push_str(&metrics_block(&view.metrics));
    out.push('\n');
    out.push_str(&gender_block(&view.gender_distribution, view.metrics.count));
    out.push('\n');
    out.push_str(&department_block(&view.salary_by_department));
    out.push('\n');
    out.push_str(&tenure_block(&view.tenure_histogram));
    out
}

pub fn metrics_block(metrics: &Metrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total employees      {}", metrics.count);
    let _ = writeln!(
        out,
        "Total annual salary  ${}",
        thousands(metrics.total_salary)
    );
    let _ = writeln!(out, "Average age          {}", years(metrics.mean_age));
    let _ = writeln!(out, "Average tenure       {}", years(metrics.mean_tenure));
    out
}

pub fn gender_block(distribution: &BTreeMap<String, usize>, total: usize) -> String {
    let mut out = String::from("Gender distribution\n");
    if distribution.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    let widest = distribution.keys().map(|g| g.len()).max().unwrap_or(0);
    let max = distribution.values().copied().max().unwrap_or(0);
    for (gender, count) in distribution {
        let share = 100.0 * *count as f64 / total as f64;
        let _ = writeln!(
            out,
            "  {gender:<widest$}  {} {count} ({share:.1}%)",
            bar(*count as f64, max as f64),
        );
    }
    out
}

pub fn department_block(salary_by_department: &BTreeMap<String, f64>) -> String {
    let mut out = String::from("Salary by department\n");
    if salary_by_department.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    let widest = salary_by_department
        .keys()
        .map(|d| d.len())
        .max()
        .unwrap_or(0);
    let max = salary_by_department
        .values()
        .fold(0.0_f64, |acc, v| acc.max(*v));
    for (department, sum) in salary_by_department {
        let _ = writeln!(
            out,
            "  {department:<widest$}  {} ${}",
            bar(*sum, max),
            thousands(*sum),
        );
    }
    out
}

pub fn tenure_block(histogram: &[TenureBin]) -> String {
    let mut out = String::from("Tenure distribution (years)\n");
    if histogram.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    let max = histogram.iter().map(|b| b.count).max().unwrap_or(0);
    for bin in histogram {
        let _ = writeln!(
            out,
            "  [{:>5.1}, {:>5.1})  {} {}",
            bin.start,
            bin.end,
            bar(bin.count as f64, max as f64),
            bin.count,
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Detailed-data blocks – table and numeric summary
// ---------------------------------------------------------------------------

pub fn table_block(records: &[EmployeeRecord], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<22} {:<16} {:<14} {:<8} {:>4} {:>12} {:>7}",
        "EEID", "Name", "Department", "Country", "Gender", "Age", "Salary", "Tenure"
    );
    for rec in records.iter().take(limit) {
        let _ = writeln!(
            out,
            "{:<8} {:<22} {:<16} {:<14} {:<8} {:>4} {:>12} {:>7}",
            rec.id,
            rec.full_name,
            rec.department,
            rec.country,
            rec.gender,
            rec.age,
            format!("${}", thousands(rec.annual_salary)),
            rec.tenure_years,
        );
    }
    if records.len() > limit {
        let _ = writeln!(out, "... {} more rows", records.len() - limit);
    }
    out
}

pub fn describe_block(records: &[EmployeeRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:>8} {:>12} {:>12} {:>12} {:>12}",
        "", "count", "mean", "std", "min", "max"
    );

    let columns: [(&str, Vec<f64>); 3] = [
        ("Age", records.iter().map(|r| f64::from(r.age)).collect()),
        (
            "AnnualSalary",
            records.iter().map(|r| r.annual_salary).collect(),
        ),
        (
            "Tenure",
            records.iter().map(|r| r.tenure_years as f64).collect(),
        ),
    ];
    for (name, values) in &columns {
        match summarize(values) {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "{name:<14} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
                    s.count, s.mean, s.std_dev, s.min, s.max
                );
            }
            None => {
                let _ = writeln!(out, "{name:<14} {:>8} (no data)", 0);
            }
        }
    }
    out
}

pub fn filters_block(dataset: &EmployeeDataset, spec: &FilterSpec) -> String {
    let mut out = String::new();

    let categorical = [
        ("Department", &dataset.departments, &spec.departments),
        ("Country", &dataset.countries, &spec.countries),
        ("BusinessUnit", &dataset.business_units, &spec.business_units),
    ];
    for (name, all, selected) in categorical {
        let values: Vec<&str> = selected.iter().map(String::as_str).collect();
        let _ = writeln!(
            out,
            "{name} ({}/{}): {}",
            selected.len(),
            all.len(),
            if values.is_empty() {
                "(none)".to_string()
            } else {
                values.join(", ")
            }
        );
    }

    let _ = writeln!(
        out,
        "Age: {}..{} (dataset {}..{})",
        spec.age_range.0, spec.age_range.1, dataset.age_span.0, dataset.age_span.1
    );
    let _ = writeln!(
        out,
        "Salary: ${}..${} (dataset ${}..${})",
        thousands(spec.salary_range.0),
        thousands(spec.salary_range.1),
        thousands(dataset.salary_span.0),
        thousands(dataset.salary_span.1),
    );
    out
}

// ---------------------------------------------------------------------------
// Machine-readable summary
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ViewSummary<'a> {
    metrics: &'a Metrics,
    gender_distribution: &'a BTreeMap<String, usize>,
    salary_by_department: &'a BTreeMap<String, f64>,
    tenure_histogram: &'a [TenureBin],
}

/// The view's aggregations as pretty JSON (records omitted).
pub fn json_summary(view: &FilteredView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ViewSummary {
        metrics: &view.metrics,
        gender_distribution: &view.gender_distribution,
        salary_by_department: &view.salary_by_department,
        tenure_histogram: &view.tenure_histogram,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct NumericSummary {
    count: usize,
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
}

fn summarize(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;
    let min = values.iter().fold(f64::INFINITY, |acc, v| acc.min(*v));
    let max = values.iter().fold(f64::NEG_INFINITY, |acc, v| acc.max(*v));
    Some(NumericSummary {
        count,
        mean,
        std_dev: variance.sqrt(),
        min,
        max,
    })
}

fn years(mean: Option<f64>) -> String {
    match mean {
        Some(value) => format!("{value:.1} years"),
        None => "no data".to_string(),
    }
}

/// Integer part with thousands separators; fractions are rounded away, as
/// the dashboard's headline figures do.
fn thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}

fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "#".repeat(filled.min(BAR_WIDTH))
}
