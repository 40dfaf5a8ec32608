use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::dataset::{CategoricalColumn, Dataset, StudentRecord};

/// Accepted values for each filterable column.
///
/// An empty set accepts nothing; there is no "unfiltered" state other than
/// selecting every observed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FilterSelection {
    pub gender: BTreeSet<String>,
    pub test_preparation: BTreeSet<String>,
    pub lunch_type: BTreeSet<String>,
}

impl FilterSelection {
    /// Every observed distinct value selected in every column.
    pub fn all(dataset: &Dataset) -> Self {
        let mut selection = FilterSelection::none();
        for column in CategoricalColumn::ALL {
            selection.select_all(column, dataset);
        }
        selection
    }

    pub fn none() -> Self {
        FilterSelection::default()
    }

    pub fn values(&self, column: CategoricalColumn) -> &BTreeSet<String> {
        match column {
            CategoricalColumn::Gender => &self.gender,
            CategoricalColumn::TestPreparation => &self.test_preparation,
            CategoricalColumn::LunchType => &self.lunch_type,
        }
    }

    fn values_mut(&mut self, column: CategoricalColumn) -> &mut BTreeSet<String> {
        match column {
            CategoricalColumn::Gender => &mut self.gender,
            CategoricalColumn::TestPreparation => &mut self.test_preparation,
            CategoricalColumn::LunchType => &mut self.lunch_type,
        }
    }

    pub fn is_selected(&self, column: CategoricalColumn, value: &str) -> bool {
        self.values(column).contains(value)
    }

    /// Flips one value in or out of a column's set.
    pub fn toggle(&mut self, column: CategoricalColumn, value: &str) {
        let values = self.values_mut(column);
        if !values.remove(value) {
            values.insert(value.to_string());
        }
    }

    pub fn select_all(&mut self, column: CategoricalColumn, dataset: &Dataset) {
        let values = dataset.distinct_values(column);
        self.values_mut(column).extend(values);
    }

    pub fn clear(&mut self, column: CategoricalColumn) {
        self.values_mut(column).clear();
    }

    /// Replaces a column's set with the given values.
    pub fn set<I, S>(&mut self, column: CategoricalColumn, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.values_mut(column) = values.into_iter().map(Into::into).collect();
    }

    pub fn accepts(&self, record: &StudentRecord) -> bool {
        CategoricalColumn::ALL
            .iter()
            .all(|&column| self.is_selected(column, record.category(column)))
    }
}

/// Rows of `dataset` accepted by every column of `selection`, order kept.
pub fn filter(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    let filtered = dataset.select(|record| selection.accepts(record));
    debug!(selected = filtered.len(), total = dataset.len(), "applied filter selection");
    filtered
}
