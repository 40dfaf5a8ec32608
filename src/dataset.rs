use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Source header names, in export order.
pub const COLUMNS: &'static [&'static str] = &[
    "gender",
    "testprep",
    "lunchtype",
    "mathscore",
    "readingscore",
    "writingscore",
    "total_score",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub gender: String,
    #[serde(rename = "testprep")]
    pub test_preparation: String,
    #[serde(rename = "lunchtype")]
    pub lunch_type: String,
    #[serde(rename = "mathscore")]
    pub math_score: f64,
    #[serde(rename = "readingscore")]
    pub reading_score: f64,
    #[serde(rename = "writingscore")]
    pub writing_score: f64,
    pub total_score: f64,
}

impl StudentRecord {
    pub fn category(&self, column: CategoricalColumn) -> &str {
        match column {
            CategoricalColumn::Gender => &self.gender,
            CategoricalColumn::TestPreparation => &self.test_preparation,
            CategoricalColumn::LunchType => &self.lunch_type,
        }
    }

    pub fn score(&self, column: ScoreColumn) -> f64 {
        match column {
            ScoreColumn::Math => self.math_score,
            ScoreColumn::Reading => self.reading_score,
            ScoreColumn::Writing => self.writing_score,
            ScoreColumn::Total => self.total_score,
        }
    }

    /// Field values in `COLUMNS` order, numbers in shortest round-trip form.
    pub fn fields(&self) -> [String; 7] {
        [
            self.gender.clone(),
            self.test_preparation.clone(),
            self.lunch_type.clone(),
            self.math_score.to_string(),
            self.reading_score.to_string(),
            self.writing_score.to_string(),
            self.total_score.to_string(),
        ]
    }
}

/// Columns the dashboard filters and groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalColumn {
    Gender,
    TestPreparation,
    LunchType,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 3] = [
        CategoricalColumn::Gender,
        CategoricalColumn::TestPreparation,
        CategoricalColumn::LunchType,
    ];

    pub fn header(self) -> &'static str {
        match self {
            CategoricalColumn::Gender => "gender",
            CategoricalColumn::TestPreparation => "testprep",
            CategoricalColumn::LunchType => "lunchtype",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoricalColumn::Gender => "Gender",
            CategoricalColumn::TestPreparation => "Test Preparation",
            CategoricalColumn::LunchType => "Lunch Type",
        }
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreColumn {
    Math,
    Reading,
    Writing,
    Total,
}

impl ScoreColumn {
    /// The three per-subject scores; excludes the total.
    pub const SUBJECTS: [ScoreColumn; 3] =
        [ScoreColumn::Math, ScoreColumn::Reading, ScoreColumn::Writing];

    pub fn header(self) -> &'static str {
        match self {
            ScoreColumn::Math => "mathscore",
            ScoreColumn::Reading => "readingscore",
            ScoreColumn::Writing => "writingscore",
            ScoreColumn::Total => "total_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreColumn::Math => "Math",
            ScoreColumn::Reading => "Reading",
            ScoreColumn::Writing => "Writing",
            ScoreColumn::Total => "Total",
        }
    }
}

impl fmt::Display for ScoreColumn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An immutable, ordered view over a shared table of records.
///
/// Every view keeps the positions of its rows in the originally loaded
/// table, so row identity survives filtering and ranking. Deriving a new
/// view never touches the table itself.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: Arc<[StudentRecord]>,
    rows: Vec<usize>,
}

impl Dataset {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        let rows = (0..records.len()).collect();
        Dataset {
            table: records.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        Vec::from(COLUMNS)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StudentRecord> + '_ {
        self.rows.iter().map(move |&row| &self.table[row])
    }

    /// Records paired with their row id in the loaded table.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &StudentRecord)> + '_ {
        self.rows.iter().map(move |&row| (row, &self.table[row]))
    }

    pub fn row_ids(&self) -> &[usize] {
        &self.rows
    }

    /// Keeps the rows matching `predicate`, in their current order.
    pub fn select<P>(&self, mut predicate: P) -> Dataset
    where
        P: FnMut(&StudentRecord) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&row| predicate(&self.table[row]))
            .collect();
        self.with_rows(rows)
    }

    pub fn head(&self, n: usize) -> Dataset {
        self.with_rows(self.rows.iter().copied().take(n).collect())
    }

    /// A view over the same table holding `rows`, in the given order.
    pub(crate) fn with_rows(&self, rows: Vec<usize>) -> Dataset {
        Dataset {
            table: Arc::clone(&self.table),
            rows,
        }
    }

    /// Distinct values of `column`, in order of first appearance.
    pub fn distinct_values(&self, column: CategoricalColumn) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for record in self.iter() {
            let value = record.category(column);
            if !seen.iter().any(|v| v == value) {
                seen.push(value.to_string());
            }
        }
        seen
    }
}

/// Two datasets are equal when they hold the same records in the same order.
impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl FromIterator<StudentRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = StudentRecord>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(gender: &str, prep: &str, lunch: &str, scores: [f64; 3]) -> StudentRecord {
        StudentRecord {
            gender: gender.to_string(),
            test_preparation: prep.to_string(),
            lunch_type: lunch.to_string(),
            math_score: scores[0],
            reading_score: scores[1],
            writing_score: scores[2],
            total_score: scores.iter().sum(),
        }
    }

    pub(crate) fn sample() -> Dataset {
        Dataset::new(vec![
            record("female", "none", "standard", [72.0, 72.0, 74.0]),
            record("female", "completed", "standard", [69.0, 90.0, 88.0]),
            record("male", "none", "free/reduced", [47.0, 57.0, 44.0]),
            record("male", "none", "standard", [76.0, 78.0, 75.0]),
            record("female", "none", "free/reduced", [71.0, 83.0, 78.0]),
            record("male", "completed", "free/reduced", [40.0, 43.0, 39.0]),
        ])
    }

    #[test]
    fn distinct_values_follow_first_appearance() {
        let data = sample();
        assert_eq!(data.distinct_values(CategoricalColumn::Gender), vec!["female", "male"]);
        assert_eq!(
            data.distinct_values(CategoricalColumn::LunchType),
            vec!["standard", "free/reduced"]
        );
    }

    #[test]
    fn select_keeps_row_ids_and_order() {
        let data = sample();
        let males = data.select(|r| r.gender == "male");
        assert_eq!(males.row_ids(), &[2, 3, 5]);
        assert_eq!(males.head(2).row_ids(), &[2, 3]);
        assert_eq!(data.len(), 6);
    }

    #[test]
    fn equality_compares_records_not_row_ids() {
        let data = sample();
        let tail = data.select(|r| r.gender == "male");
        let fresh: Dataset = tail.iter().cloned().collect();
        assert_eq!(tail, fresh);
        assert_ne!(tail.row_ids(), fresh.row_ids());
    }

    #[test]
    fn fields_use_shortest_number_form() {
        let r = record("male", "none", "standard", [70.0, 80.5, 66.0]);
        assert_eq!(r.fields()[3], "70");
        assert_eq!(r.fields()[4], "80.5");
        assert_eq!(r.fields()[6], "216.5");
    }
}
