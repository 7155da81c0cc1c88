use log::warn;

use crate::data::filter::{CategoricalColumn, FilterSpec};
use crate::data::model::EmployeeDataset;
use crate::engine::{self, FilteredView};
use crate::error::InvalidFilter;

// ---------------------------------------------------------------------------
// Session – one loaded dataset plus the current selection
// ---------------------------------------------------------------------------

/// A single analysis session: the immutable dataset, the current filter
/// selection, and the last *valid* view.
///
/// A rejected spec never replaces the view; callers keep rendering the
/// previous result.
pub struct Session {
    dataset: EmployeeDataset,
    spec: FilterSpec,
    view: FilteredView,
}

impl Session {
    /// Start a session with the identity spec applied.
    pub fn new(dataset: EmployeeDataset) -> Self {
        let spec = FilterSpec::full(&dataset);
        // The identity spec always validates.
        let view = engine::apply(&dataset, &spec).expect("identity spec is valid");
        Session {
            dataset,
            spec,
            view,
        }
    }

    pub fn dataset(&self) -> &EmployeeDataset {
        &self.dataset
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// Replace the whole selection, e.g. from a shell that rebuilds the spec
    /// per input event. On rejection the previous spec and view stay.
    pub fn apply_spec(&mut self, spec: FilterSpec) -> Result<&FilteredView, InvalidFilter> {
        let view = engine::apply(&self.dataset, &spec).inspect_err(|err| {
            warn!("filter spec rejected: {err}");
        })?;
        self.spec = spec;
        self.view = view;
        Ok(&self.view)
    }

    /// Toggle one value in a categorical column's selection.
    pub fn toggle(&mut self, column: CategoricalColumn, value: &str) {
        let selected = self.spec.selection_mut(column);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every distinct value of a column.
    pub fn select_all(&mut self, column: CategoricalColumn) {
        let all = column.distinct(&self.dataset).clone();
        *self.spec.selection_mut(column) = all;
        self.refilter();
    }

    /// Deselect every value of a column (matches nothing).
    pub fn select_none(&mut self, column: CategoricalColumn) {
        self.spec.selection_mut(column).clear();
        self.refilter();
    }

    pub fn set_age_range(&mut self, min: u32, max: u32) -> Result<(), InvalidFilter> {
        let mut spec = self.spec.clone();
        spec.age_range = (min, max);
        self.apply_spec(spec).map(|_| ())
    }

    pub fn set_salary_range(&mut self, min: f64, max: f64) -> Result<(), InvalidFilter> {
        let mut spec = self.spec.clone();
        spec.salary_range = (min, max);
        self.apply_spec(spec).map(|_| ())
    }

    /// Back to the identity spec.
    pub fn reset(&mut self) {
        self.spec = FilterSpec::full(&self.dataset);
        self.refilter();
    }

    /// Recompute the view after a mutation that cannot invalidate the spec.
    fn refilter(&mut self) {
        self.view = engine::apply(&self.dataset, &self.spec).expect("ranges unchanged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;
    use chrono::NaiveDate;

    fn session() -> Session {
        let text = "EEID,Department,Country,BusinessUnit,Age,AnnualSalary,Gender,HireDate\n\
                    E1,Sales,US,Corporate,30,60000,F,2020-01-01\n\
                    E2,Sales,UK,Corporate,45,90000,M,2010-01-01\n\
                    E3,Engineering,US,Corporate,50,120000,M,2015-01-01\n";
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        Session::new(load_reader(text.as_bytes(), today).unwrap())
    }

    #[test]
    fn starts_with_the_identity_view() {
        let s = session();
        assert_eq!(s.view().metrics.count, 3);
    }

    #[test]
    fn toggling_a_department_excludes_its_records() {
        let mut s = session();
        s.toggle(CategoricalColumn::Department, "Engineering");
        assert_eq!(s.view().metrics.count, 2);
        s.toggle(CategoricalColumn::Department, "Engineering");
        assert_eq!(s.view().metrics.count, 3);
    }

    #[test]
    fn select_none_hides_everything() {
        let mut s = session();
        s.select_none(CategoricalColumn::Country);
        assert_eq!(s.view().metrics.count, 0);
        s.select_all(CategoricalColumn::Country);
        assert_eq!(s.view().metrics.count, 3);
    }

    #[test]
    fn rejected_range_keeps_the_previous_view() {
        let mut s = session();
        s.set_salary_range(50_000.0, 100_000.0).unwrap();
        assert_eq!(s.view().metrics.count, 2);

        let err = s.set_salary_range(100_000.0, 50_000.0).unwrap_err();
        assert!(matches!(err, InvalidFilter::SalaryRange { .. }));
        // Spec and view are unchanged.
        assert_eq!(s.spec().salary_range, (50_000.0, 100_000.0));
        assert_eq!(s.view().metrics.count, 2);
    }

    #[test]
    fn reset_restores_the_identity_spec() {
        let mut s = session();
        s.toggle(CategoricalColumn::Department, "Sales");
        s.set_age_range(40, 60).unwrap();
        s.reset();
        assert_eq!(s.view().metrics.count, 3);
        assert_eq!(s.spec(), &FilterSpec::full(s.dataset()));
    }
}
