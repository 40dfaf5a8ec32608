use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use tracing::{info, warn};
use tui::widgets::ListState;

use crate::dashboard::Session;
use crate::dataset::{CategoricalColumn, Dataset};
use crate::export::{write_export, ExportOptions};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Overview,
    Distributions,
    Comparisons,
    TopStudents,
    Preview,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::Overview,
        MenuItem::Distributions,
        MenuItem::Comparisons,
        MenuItem::TopStudents,
        MenuItem::Preview,
    ];

    pub fn title(self) -> &'static str {
        match self {
            MenuItem::Overview => "Overview",
            MenuItem::Distributions => "Distributions",
            MenuItem::Comparisons => "Comparisons",
            MenuItem::TopStudents => "Top 10",
            MenuItem::Preview => "Preview",
        }
    }
}

impl From<MenuItem> for usize {
    fn from(input: MenuItem) -> usize {
        match input {
            MenuItem::Overview => 0,
            MenuItem::Distributions => 1,
            MenuItem::Comparisons => 2,
            MenuItem::TopStudents => 3,
            MenuItem::Preview => 4,
        }
    }
}

/// A sidebar multi-select over one column's observed values.
pub struct FilterList {
    pub column: CategoricalColumn,
    pub options: Vec<String>,
    pub state: ListState,
}

impl FilterList {
    fn new(column: CategoricalColumn, dataset: &Dataset) -> Self {
        let options = dataset.distinct_values(column);
        let mut state = ListState::default();
        if !options.is_empty() {
            state.select(Some(0));
        }
        FilterList {
            column,
            options,
            state,
        }
    }

    pub fn cursor(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    fn step(&mut self, forward: bool) {
        let len = self.options.len();
        if len == 0 {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.state.select(Some(next));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    pub session: Session,
    pub filters: Vec<FilterList>,
    pub focus: usize,
    pub active_menu_item: MenuItem,
    pub status: Option<String>,
    pub loaded_at: DateTime<Local>,
    export_dir: PathBuf,
    export_options: ExportOptions,
}

impl App {
    pub fn new(dataset: Arc<Dataset>, export_dir: PathBuf, export_options: ExportOptions) -> Self {
        let filters = CategoricalColumn::ALL
            .iter()
            .map(|&column| FilterList::new(column, &dataset))
            .collect();
        App {
            session: Session::new(dataset),
            filters,
            focus: 0,
            active_menu_item: MenuItem::Overview,
            status: None,
            loaded_at: Local::now(),
            export_dir,
            export_options,
        }
    }

    pub fn focused(&self) -> &FilterList {
        &self.filters[self.focus]
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Tab | KeyCode::Right => self.focus = (self.focus + 1) % self.filters.len(),
            KeyCode::BackTab | KeyCode::Left => {
                self.focus = (self.focus + self.filters.len() - 1) % self.filters.len()
            }
            KeyCode::Down => self.filters[self.focus].step(true),
            KeyCode::Up => self.filters[self.focus].step(false),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_cursor(),
            KeyCode::Char('a') => {
                let column = self.focused().column;
                self.session.update_selection(|s, d| s.select_all(column, d));
            }
            KeyCode::Char('c') => {
                let column = self.focused().column;
                self.session.update_selection(|s, _| s.clear(column));
            }
            KeyCode::Char('h') => self.active_menu_item = MenuItem::Overview,
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.active_menu_item = MenuItem::ALL[index];
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        Action::Continue
    }

    fn toggle_cursor(&mut self) {
        let list = self.focused();
        let column = list.column;
        if let Some(value) = list.cursor().map(str::to_string) {
            self.session.update_selection(|s, _| s.toggle(column, &value));
        }
    }

    fn export(&mut self) {
        let result = {
            let view = self.session.view();
            write_export(&view.filtered, &self.export_dir, self.export_options)
                .map(|path| (path, view.filtered.len()))
        };
        let now = Local::now().format("%H:%M:%S");
        self.status = Some(match result {
            Ok((path, rows)) => {
                info!(rows, "export requested from dashboard");
                format!("Exported {} rows to {} at {}", rows, path.display(), now)
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                format!("Export failed at {}: {}", now, e)
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;
    use crate::export::EXPORT_FILE_NAME;

    fn app() -> App {
        App::new(Arc::new(sample()), PathBuf::from("."), ExportOptions::default())
    }

    #[test]
    fn starts_with_everything_selected() {
        let mut app = app();
        assert_eq!(app.filters.len(), 3);
        assert_eq!(app.focused().cursor(), Some("female"));
        assert_eq!(app.session.view().metrics.count, 6);
    }

    #[test]
    fn space_toggles_value_under_cursor() {
        let mut app = app();
        app.handle_key(KeyCode::Down);
        assert_eq!(app.focused().cursor(), Some("male"));
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.session.view().metrics.count, 3);
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.session.view().metrics.count, 6);
    }

    #[test]
    fn clearing_a_list_empties_the_view() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focused().column, CategoricalColumn::TestPreparation);
        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.session.view().metrics.count, 0);
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.session.view().metrics.count, 6);
    }

    #[test]
    fn focus_and_cursor_wrap() {
        let mut app = app();
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.focused().column, CategoricalColumn::LunchType);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.focused().cursor(), Some("free/reduced"));
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut app = app();
        app.handle_key(KeyCode::Char('4'));
        assert_eq!(app.active_menu_item, MenuItem::TopStudents);
        app.handle_key(KeyCode::Char('h'));
        assert_eq!(app.active_menu_item, MenuItem::Overview);
        assert_eq!(app.handle_key(KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn export_writes_current_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Arc::new(sample()), dir.path().to_path_buf(), ExportOptions::default());
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('e'));
        let text = std::fs::read_to_string(dir.path().join(EXPORT_FILE_NAME)).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(app.status.as_deref().unwrap().starts_with("Exported 3 rows"));
    }

    #[test]
    fn export_failure_is_reported_not_fatal() {
        let mut app = App::new(
            Arc::new(sample()),
            PathBuf::from("/nonexistent/dir/for/export"),
            ExportOptions::default(),
        );
        assert_eq!(app.handle_key(KeyCode::Char('e')), Action::Continue);
        assert!(app.status.as_deref().unwrap().starts_with("Export failed"));
    }
}
