use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::dataset::{CategoricalColumn, Dataset};
use crate::error::{DashboardError, Result};
use crate::export::ExportOptions;
use crate::filter::FilterSelection;

pub const DEFAULT_DATA_PATH: &str = "data/student_data.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Student performance dashboard
#[derive(Debug, Parser)]
#[command(name = "student_dashboard", version, about)]
pub struct Config {
    /// CSV file of student exam records
    #[arg(long, env = "STUDENT_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Directory the filtered export is written to
    #[arg(long, env = "STUDENT_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Include the derived pass/fail column in exports
    #[arg(long)]
    pub export_result: bool,

    /// Print a report instead of starting the interactive dashboard
    #[arg(long, value_enum)]
    pub report: Option<ReportFormat>,

    /// Genders to keep in report mode (default: all)
    #[arg(long = "gender", value_name = "VALUE")]
    pub genders: Vec<String>,

    /// Test preparation values to keep in report mode (default: all)
    #[arg(long = "test-prep", value_name = "VALUE")]
    pub test_preparations: Vec<String>,

    /// Lunch types to keep in report mode (default: all)
    #[arg(long = "lunch", value_name = "VALUE")]
    pub lunch_types: Vec<String>,

    /// Write logs to this file
    #[arg(long, env = "STUDENT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Debug-level logging for this crate
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            include_result: self.export_result,
        }
    }

    /// Selection given on the command line; columns left unset keep every
    /// observed value. Values must occur in `dataset` (case-sensitive).
    pub fn selection(&self, dataset: &Dataset) -> Result<FilterSelection> {
        let mut selection = FilterSelection::all(dataset);
        for (column, values) in [
            (CategoricalColumn::Gender, &self.genders),
            (CategoricalColumn::TestPreparation, &self.test_preparations),
            (CategoricalColumn::LunchType, &self.lunch_types),
        ] {
            if values.is_empty() {
                continue;
            }
            let allowed = dataset.distinct_values(column);
            if let Some(value) = values.iter().find(|v| !allowed.contains(*v)) {
                return Err(DashboardError::UnknownFilterValue {
                    column,
                    value: value.clone(),
                    allowed,
                });
            }
            selection.set(column, values.iter().cloned());
        }
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["student_dashboard"]);
        assert_eq!(config.data, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.report, None);
        assert!(!config.export_options().include_result);
    }

    #[test]
    fn unset_filters_select_all() {
        let config = Config::parse_from(["student_dashboard", "--gender", "male", "--report", "json"]);
        let data = sample();
        let selection = config.selection(&data).unwrap();
        assert_eq!(config.report, Some(ReportFormat::Json));
        assert_eq!(selection.gender.len(), 1);
        assert_eq!(selection.lunch_type, FilterSelection::all(&data).lunch_type);
    }

    #[test]
    fn repeated_values_accumulate() {
        let config = Config::parse_from([
            "student_dashboard",
            "--lunch",
            "standard",
            "--lunch",
            "free/reduced",
            "--export-result",
        ]);
        assert_eq!(config.lunch_types.len(), 2);
        assert!(config.export_options().include_result);
    }

    #[test]
    fn unknown_filter_value_is_rejected() {
        let config = Config::parse_from(["student_dashboard", "--gender", "Male", "--report", "text"]);
        match config.selection(&sample()) {
            Err(DashboardError::UnknownFilterValue { column, value, allowed }) => {
                assert_eq!(column, CategoricalColumn::Gender);
                assert_eq!(value, "Male");
                assert_eq!(allowed, vec!["female".to_string(), "male".to_string()]);
            }
            other => panic!("expected UnknownFilterValue, got {:?}", other),
        }
    }

    #[test]
    fn cli_selection_is_subset_of_observed_values() {
        let data = sample();
        let config = Config::parse_from(["student_dashboard", "--test-prep", "completed", "--lunch", "standard"]);
        let selection = config.selection(&data).unwrap();
        for column in CategoricalColumn::ALL {
            let observed = data.distinct_values(column);
            assert!(selection.values(column).iter().all(|v| observed.contains(v)));
        }
        assert_eq!(crate::filter::filter(&data, &selection).row_ids(), &[1]);
    }
}
