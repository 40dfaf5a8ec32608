use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::aggregate::{
    group_average, histogram, summarize, top_n, GroupAverages, Histogram, Metrics, DISTRIBUTION_BINS,
    TOP_STUDENTS,
};
use crate::dataset::{CategoricalColumn, Dataset, ScoreColumn, StudentRecord};
use crate::filter::{filter, FilterSelection};
use crate::outcome::{derive_result, Outcome, OutcomeTally};

/// Rows shown in the filtered data preview.
pub const PREVIEW_ROWS: usize = 25;

/// Everything the presentation layer shows for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    #[serde(skip)]
    pub filtered: Dataset,
    pub metrics: Metrics,
    pub outcomes: OutcomeTally,
    pub distributions: Vec<(ScoreColumn, Option<Histogram>)>,
    pub comparisons: Vec<GroupAverages>,
    #[serde(serialize_with = "serialize_rows")]
    pub top_students: Dataset,
    #[serde(serialize_with = "serialize_rows")]
    pub preview: Dataset,
}

impl DashboardView {
    /// Runs the full pipeline against the loaded dataset.
    pub fn compute(dataset: &Dataset, selection: &FilterSelection) -> Self {
        let filtered = filter(dataset, selection);
        debug!(rows = filtered.len(), "recomputing dashboard view");

        let distributions = ScoreColumn::SUBJECTS
            .iter()
            .map(|&column| (column, histogram(&filtered, column, DISTRIBUTION_BINS)))
            .collect();
        let comparisons = CategoricalColumn::ALL
            .iter()
            .map(|&column| group_average(&filtered, column, &ScoreColumn::SUBJECTS))
            .collect();

        DashboardView {
            metrics: summarize(&filtered),
            outcomes: OutcomeTally::tabulate(&filtered),
            distributions,
            comparisons,
            top_students: top_n(&filtered, TOP_STUDENTS),
            preview: filtered.head(PREVIEW_ROWS),
            filtered,
        }
    }
}

#[derive(Serialize)]
struct RowOut<'a> {
    row: usize,
    #[serde(flatten)]
    record: &'a StudentRecord,
    result: Outcome,
}

fn serialize_rows<S: Serializer>(dataset: &Dataset, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(dataset.rows().map(|(row, record)| RowOut {
        row,
        record,
        result: derive_result(record),
    }))
}

/// Per-user state: a shared read-only dataset plus this user's selection.
///
/// The last computed view is kept and reused while the selection is
/// unchanged.
pub struct Session {
    dataset: Arc<Dataset>,
    selection: FilterSelection,
    cached: Option<(FilterSelection, DashboardView)>,
}

impl Session {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let selection = FilterSelection::all(&dataset);
        Session {
            dataset,
            selection,
            cached: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
    }

    /// Applies `change` to the current selection.
    pub fn update_selection<F>(&mut self, change: F)
    where
        F: FnOnce(&mut FilterSelection, &Dataset),
    {
        change(&mut self.selection, &self.dataset);
    }

    pub fn view(&mut self) -> &DashboardView {
        if matches!(&self.cached, Some((cached, _)) if *cached != self.selection) {
            self.cached = None;
        }
        let (dataset, selection) = (&self.dataset, &self.selection);
        &self
            .cached
            .get_or_insert_with(|| (selection.clone(), DashboardView::compute(dataset, selection)))
            .1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;

    #[test]
    fn view_covers_every_chart() {
        let data = sample();
        let view = DashboardView::compute(&data, &FilterSelection::all(&data));
        assert_eq!(view.metrics.count, 6);
        assert_eq!(view.distributions.len(), 3);
        assert_eq!(view.comparisons.len(), 3);
        assert_eq!(view.comparisons[1].column, CategoricalColumn::TestPreparation);
        assert_eq!(view.top_students.len(), 6);
        assert_eq!(view.top_students.row_ids()[0], 1);
        assert_eq!(view.preview.len(), 6);
    }

    #[test]
    fn histogram_range_follows_the_filtered_rows() {
        let data = sample();
        let math_range = |view: &DashboardView| {
            let (column, hist) = &view.distributions[0];
            assert_eq!(*column, ScoreColumn::Math);
            hist.as_ref().map(|h| (h.min, h.max))
        };

        let everyone = DashboardView::compute(&data, &FilterSelection::all(&data));
        assert_eq!(math_range(&everyone), Some((40.0, 76.0)));

        let mut females = FilterSelection::all(&data);
        females.set(CategoricalColumn::Gender, ["female"]);
        let view = DashboardView::compute(&data, &females);
        assert_eq!(math_range(&view), Some((69.0, 72.0)));

        let mut free_lunch_none = FilterSelection::all(&data);
        free_lunch_none.set(CategoricalColumn::LunchType, ["free/reduced"]);
        free_lunch_none.set(CategoricalColumn::TestPreparation, ["none"]);
        let view = DashboardView::compute(&data, &free_lunch_none);
        assert_eq!(math_range(&view), Some((47.0, 71.0)));
    }

    #[test]
    fn empty_selection_yields_no_data_view() {
        let data = sample();
        let mut selection = FilterSelection::all(&data);
        selection.clear(CategoricalColumn::Gender);
        let view = DashboardView::compute(&data, &selection);
        assert_eq!(view.metrics.count, 0);
        assert_eq!(view.metrics.total, None);
        assert!(view.outcomes.is_empty());
        assert!(view.distributions.iter().all(|(_, h)| h.is_none()));
        assert!(view.comparisons.iter().all(|c| c.groups.is_empty()));
        assert!(view.top_students.is_empty());
    }

    #[test]
    fn session_recomputes_on_selection_change() {
        let mut session = Session::new(Arc::new(sample()));
        assert_eq!(session.view().metrics.count, 6);
        session.update_selection(|s, _| s.toggle(CategoricalColumn::Gender, "male"));
        assert_eq!(session.view().metrics.count, 3);
        session.update_selection(|s, d| s.select_all(CategoricalColumn::Gender, d));
        assert_eq!(session.view().metrics.count, 6);
    }

    #[test]
    fn sessions_share_only_the_dataset() {
        let data = Arc::new(sample());
        let mut a = Session::new(Arc::clone(&data));
        let mut b = Session::new(Arc::clone(&data));
        a.update_selection(|s, _| s.clear(CategoricalColumn::LunchType));
        assert_eq!(a.view().metrics.count, 0);
        assert_eq!(b.view().metrics.count, 6);
    }

    #[test]
    fn view_serializes_rows_with_result() {
        let data = sample();
        let view = DashboardView::compute(&data, &FilterSelection::all(&data));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["metrics"]["count"], 6);
        assert_eq!(json["top_students"][0]["row"], 1);
        assert_eq!(json["top_students"][0]["result"], "Pass");
        assert_eq!(json["preview"][2]["testprep"], "none");
        assert!(json.get("filtered").is_none());
    }
}
