use std::io;
use std::process;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event as CEvent, KeyEvent, KeyEventKind},
};
use tracing::{error, info};
use tui::{backend::CrosstermBackend, Terminal};

use student_dashboard::app::{Action, App};
use student_dashboard::config::Config;
use student_dashboard::csv_reader::read_data;
use student_dashboard::dashboard::DashboardView;
use student_dashboard::error::Result;
use student_dashboard::logging::{init_logging, LogTarget};
use student_dashboard::terminal::RawModeGuard;
use student_dashboard::{report, ui};

enum Event<I> {
    Input(I),
    Tick,
}

fn main() {
    let config = Config::parse();
    if let Err(e) = run(config) {
        error!(error = %e, "dashboard stopped");
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(config: Config) -> Result<()> {
    let target = match (&config.log_file, config.report) {
        (Some(path), _) => LogTarget::File(path),
        (None, Some(_)) => LogTarget::Stderr,
        (None, None) => LogTarget::Off,
    };
    init_logging(target, config.verbose)?;
    info!("starting student_dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Loaded once; every view below is derived from this table.
    let dataset = Arc::new(read_data(&config.data)?);

    if let Some(format) = config.report {
        let selection = config.selection(&dataset)?;
        let view = DashboardView::compute(&dataset, &selection);
        println!("{}", report::render(&view, format)?);
        return Ok(());
    }

    let app = App::new(dataset, config.export_dir.clone(), config.export_options());
    run_terminal(app)
}

fn run_terminal(mut app: App) -> Result<()> {
    let _raw = RawModeGuard::enable()?;

    let (tx, rx) = mpsc::channel();
    let tick_rate = Duration::from_millis(200);
    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            match event::poll(timeout) {
                Ok(true) => {
                    if let Ok(CEvent::Key(key)) = event::read() {
                        if tx.send(Event::Input(key)).is_err() {
                            return;
                        }
                    }
                }
                Ok(false) => {}
                Err(_) => return,
            }

            if last_tick.elapsed() >= tick_rate {
                if tx.send(Event::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let outcome = event_loop(&mut terminal, &mut app, &rx);

    terminal.clear()?;
    terminal.show_cursor()?;
    outcome
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mpsc::Receiver<Event<KeyEvent>>,
) -> Result<()> {
    loop {
        terminal.draw(|rect| ui::draw(rect, app))?;

        match rx.recv()? {
            Event::Input(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key.code) == Action::Quit {
                    return Ok(());
                }
            }
            Event::Input(_) | Event::Tick => {}
        }
    }
}
