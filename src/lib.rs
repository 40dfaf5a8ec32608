//! Student performance dashboard.
//!
//! Loads a table of student exam records, narrows it with per-column
//! membership filters and derives the summaries a dashboard shows: metric
//! tiles, pass/fail proportions, score distributions, group comparisons and
//! a top-10 ranking. The filtered table can be exported back to CSV.
//!
//! Every pipeline stage is a pure function of the loaded [`Dataset`] and a
//! [`FilterSelection`]; the loaded table is never mutated.

pub mod aggregate;
pub mod app;
pub mod config;
pub mod csv_reader;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod outcome;
pub mod report;
pub mod terminal;
pub mod ui;

pub use aggregate::{group_average, histogram, summarize, top_n, Metrics};
pub use csv_reader::{read_data, read_data_from};
pub use dashboard::{DashboardView, Session};
pub use dataset::{CategoricalColumn, Dataset, ScoreColumn, StudentRecord};
pub use error::{DashboardError, ExportError, LoadError};
pub use export::{to_csv, write_export, ExportOptions};
pub use filter::{filter, FilterSelection};
pub use outcome::{derive_result, Outcome, OutcomeTally, PASS_THRESHOLD};
