use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{BarChart, Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::aggregate::{round_to, GroupAverages, Histogram};
use crate::app::{App, FilterList, MenuItem};
use crate::dashboard::DashboardView;
use crate::dataset::{Dataset, ScoreColumn, COLUMNS};
use crate::filter::FilterSelection;
use crate::outcome::derive_result;
use crate::report::format_mean;

const NO_DATA: &str = "No data for the current selection";

pub fn draw<B: Backend>(rect: &mut Frame<B>, app: &mut App) {
    let size = rect.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(1)].as_ref())
        .split(size);

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(22), Constraint::Percentage(78)].as_ref())
        .split(chunks[1]);

    rect.render_widget(menu(app.active_menu_item), header_chunks[0]);

    let App {
        session,
        filters,
        focus,
        active_menu_item,
        status,
        loaded_at,
        ..
    } = app;
    let total_rows = session.dataset().len();
    let selection = session.selection().clone();
    let view = session.view();

    let summary = vec![
        Spans::from(Span::styled(
            format!("Students: {} of {}", view.metrics.count, total_rows),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw(format!("Loaded at {}", loaded_at.format("%H:%M:%S")))),
    ];
    let summary_block = Paragraph::new(summary)
        .block(Block::default().title("Dataset").borders(Borders::ALL))
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Center);
    rect.render_widget(summary_block, header_chunks[1]);

    draw_filters(rect, filters, *focus, &selection, body_chunks[0]);

    match active_menu_item {
        MenuItem::Overview => draw_overview(rect, view, body_chunks[1]),
        MenuItem::Distributions => draw_distributions(rect, view, body_chunks[1]),
        MenuItem::Comparisons => draw_comparisons(rect, &view.comparisons, body_chunks[1]),
        MenuItem::TopStudents => {
            draw_table(rect, "Top 10 Students", &view.top_students, body_chunks[1])
        }
        MenuItem::Preview => {
            draw_table(rect, "Filtered Dataset Preview", &view.preview, body_chunks[1])
        }
    }

    let help = status.clone().unwrap_or_else(|| {
        "Tab/←→ list  ↑↓ move  Space toggle  a all  c clear  1-5 tabs  e export  q quit".to_string()
    });
    rect.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn menu(active: MenuItem) -> Tabs<'static> {
    let titles = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Spans::from(vec![
                Span::styled(
                    format!("{}", i + 1),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled(format!(" {}", item.title()), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    Tabs::new(titles)
        .select(active.into())
        .block(Block::default().title("Student Performance").borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw("|"))
}

fn draw_filters<B: Backend>(
    rect: &mut Frame<B>,
    filters: &mut [FilterList],
    focus: usize,
    selection: &FilterSelection,
    area: Rect,
) {
    let constraints: Vec<Constraint> = filters
        .iter()
        .map(|_| Constraint::Ratio(1, filters.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, (list, chunk)) in filters.iter_mut().zip(chunks).enumerate() {
        let items: Vec<ListItem> = list
            .options
            .iter()
            .map(|value| {
                let mark = if selection.is_selected(list.column, value) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}", mark, value))
            })
            .collect();
        let border_style = if i == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let widget = List::new(items)
            .block(
                Block::default()
                    .title(list.column.label())
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        rect.render_stateful_widget(widget, chunk, &mut list.state);
    }
}

fn no_data<B: Backend>(rect: &mut Frame<B>, title: &str, area: Rect) {
    let paragraph = Paragraph::new(NO_DATA)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    rect.render_widget(paragraph, area);
}

fn draw_overview<B: Backend>(rect: &mut Frame<B>, view: &DashboardView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)].as_ref())
        .split(area);
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5].as_ref())
        .split(chunks[0]);

    let metrics = &view.metrics;
    let values = [
        ("Total Students", metrics.count.to_string()),
        ("Avg Math", format_mean(metrics.math)),
        ("Avg Reading", format_mean(metrics.reading)),
        ("Avg Writing", format_mean(metrics.writing)),
        ("Avg Total", format_mean(metrics.total)),
    ];
    for ((title, value), tile) in values.into_iter().zip(tiles) {
        let paragraph = Paragraph::new(Spans::from(Span::styled(
            value,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().title(title).borders(Borders::ALL))
        .alignment(Alignment::Center);
        rect.render_widget(paragraph, tile);
    }

    let title = "Pass vs Fail Distribution";
    if view.outcomes.is_empty() {
        return no_data(rect, title, chunks[1]);
    }
    let labels: Vec<String> = view
        .outcomes
        .buckets
        .iter()
        .map(|b| format!("{} {}%", b.outcome, b.share))
        .collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&view.outcomes.buckets)
        .map(|(label, b)| (label.as_str(), b.count as u64))
        .collect();
    let chart = BarChart::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .data(&data)
        .bar_width(14)
        .bar_gap(4)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    rect.render_widget(chart, chunks[1]);
}

fn draw_distributions<B: Backend>(rect: &mut Frame<B>, view: &DashboardView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 3); 3].as_ref())
        .split(area);
    for ((column, hist), chunk) in view.distributions.iter().zip(chunks) {
        let title = format!("{} Distribution", column.label());
        match hist {
            Some(hist) => draw_histogram(rect, &title, hist, chunk),
            None => no_data(rect, &title, chunk),
        }
    }
}

fn draw_histogram<B: Backend>(rect: &mut Frame<B>, title: &str, hist: &Histogram, area: Rect) {
    let bins = hist.counts.len() as u16;
    let bar_width = (area.width.saturating_sub(2) / bins.max(1)).saturating_sub(1).max(1);
    let data: Vec<(&str, u64)> = hist.counts.iter().map(|&count| ("", count)).collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!("{} [{} – {}]", title, round_to(hist.min, 1), round_to(hist.max, 1)))
                .borders(Borders::ALL),
        )
        .data(&data)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    rect.render_widget(chart, area);
}

fn draw_comparisons<B: Backend>(rect: &mut Frame<B>, comparisons: &[GroupAverages], area: Rect) {
    let constraints: Vec<Constraint> = comparisons
        .iter()
        .map(|_| Constraint::Ratio(1, comparisons.len().max(1) as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (comparison, chunk) in comparisons.iter().zip(chunks) {
        let title = format!("Average Scores by {}", comparison.column.label());
        if comparison.groups.is_empty() {
            no_data(rect, &title, chunk);
            continue;
        }
        let mut bars: Vec<(String, u64)> = Vec::new();
        for (key, stats) in &comparison.groups {
            for column in &comparison.values {
                if let Some(mean) = stats.means.get(column).copied().flatten() {
                    bars.push((format!("{} {}", key, subject_initial(*column)), mean.round() as u64));
                }
            }
        }
        let data: Vec<(&str, u64)> = bars.iter().map(|(label, v)| (label.as_str(), *v)).collect();
        let bar_width = bars.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(3).clamp(3, 16) as u16;
        let chart = BarChart::default()
            .block(Block::default().title(format!("{} (M/R/W)", title)).borders(Borders::ALL))
            .data(&data)
            .max(100)
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Green))
            .value_style(Style::default().fg(Color::Black).bg(Color::Green));
        rect.render_widget(chart, chunk);
    }
}

fn subject_initial(column: ScoreColumn) -> &'static str {
    match column {
        ScoreColumn::Math => "M",
        ScoreColumn::Reading => "R",
        ScoreColumn::Writing => "W",
        ScoreColumn::Total => "T",
    }
}

fn draw_table<B: Backend>(rect: &mut Frame<B>, title: &str, dataset: &Dataset, area: Rect) {
    if dataset.is_empty() {
        return no_data(rect, title, area);
    }
    let header_cells = std::iter::once("#")
        .chain(COLUMNS.iter().copied())
        .chain(std::iter::once("result"))
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).bottom_margin(1);

    let rows = dataset.rows().map(|(row, record)| {
        let mut cells = vec![Cell::from(row.to_string())];
        cells.extend(record.fields().into_iter().map(Cell::from));
        cells.push(Cell::from(derive_result(record).to_string()));
        Row::new(cells)
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(13),
        Constraint::Length(10),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(12),
        Constraint::Length(7),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .widths(&widths)
        .column_spacing(1);
    rect.render_widget(table, area);
}
