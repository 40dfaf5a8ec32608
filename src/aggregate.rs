//! Summary statistics over a (usually filtered) dataset.
//!
//! Means over zero rows are `None`. Nothing here reports a zero for an
//! empty input.

use indexmap::IndexMap;
use serde::Serialize;

use crate::dataset::{CategoricalColumn, Dataset, ScoreColumn};

/// Bins per score distribution chart.
pub const DISTRIBUTION_BINS: usize = 30;

/// Rows in the ranking table.
pub const TOP_STUDENTS: usize = 10;

/// Arithmetic mean, or `None` when there was nothing to average.
pub type Mean = Option<f64>;

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn mean<I>(values: I) -> Mean
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn column_mean(dataset: &Dataset, column: ScoreColumn) -> Mean {
    mean(dataset.iter().map(|r| r.score(column)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub count: usize,
    pub math: Mean,
    pub reading: Mean,
    pub writing: Mean,
    pub total: Mean,
}

impl Metrics {
    pub fn mean(&self, column: ScoreColumn) -> Mean {
        match column {
            ScoreColumn::Math => self.math,
            ScoreColumn::Reading => self.reading,
            ScoreColumn::Writing => self.writing,
            ScoreColumn::Total => self.total,
        }
    }
}

pub fn summarize(dataset: &Dataset) -> Metrics {
    Metrics {
        count: dataset.len(),
        math: column_mean(dataset, ScoreColumn::Math),
        reading: column_mean(dataset, ScoreColumn::Reading),
        writing: column_mean(dataset, ScoreColumn::Writing),
        total: column_mean(dataset, ScoreColumn::Total),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    /// Row ids belonging to this group.
    pub rows: Vec<usize>,
    pub means: IndexMap<ScoreColumn, Mean>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverages {
    pub column: CategoricalColumn,
    pub values: Vec<ScoreColumn>,
    /// Keyed by distinct value, in order of first appearance.
    pub groups: IndexMap<String, GroupStats>,
}

/// Partitions `dataset` by `group_column` and averages each value column
/// inside every partition.
pub fn group_average(
    dataset: &Dataset,
    group_column: CategoricalColumn,
    value_columns: &[ScoreColumn],
) -> GroupAverages {
    let mut partitions: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (row, record) in dataset.rows() {
        partitions
            .entry(record.category(group_column).to_string())
            .or_default()
            .push(row);
    }

    let groups = partitions
        .into_iter()
        .map(|(key, rows)| {
            let part = dataset.with_rows(rows.clone());
            let means = value_columns
                .iter()
                .map(|&column| (column, column_mean(&part, column)))
                .collect();
            (key, GroupStats { rows, means })
        })
        .collect();

    GroupAverages {
        column: group_column,
        values: value_columns.to_vec(),
        groups,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: ScoreColumn,
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Lower edge of bin `index`.
    pub fn bin_start(&self, index: usize) -> f64 {
        self.min + self.bin_width() * index as f64
    }
}

/// Equal-width histogram spanning the observed range of `column`.
///
/// The last bin is closed on the right. When every value is the same the
/// range is widened by half a unit on each side. Returns `None` for an
/// empty dataset or when `bins` is zero.
pub fn histogram(dataset: &Dataset, column: ScoreColumn, bins: usize) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let values: Vec<f64> = dataset.iter().map(|r| r.score(column)).collect();
    let (mut min, mut max) = values
        .iter()
        .fold(None, |range: Option<(f64, f64)>, &v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0u64; bins];
    for v in values {
        let index = (((v - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }
    Some(Histogram {
        column,
        min,
        max,
        counts,
    })
}

/// The `n` highest total scores, ties kept in their current order.
pub fn top_n(dataset: &Dataset, n: usize) -> Dataset {
    let mut ranked: Vec<(usize, f64)> = dataset.rows().map(|(row, r)| (row, r.total_score)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    dataset.with_rows(ranked.into_iter().take(n).map(|(row, _)| row).collect())
}
