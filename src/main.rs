mod app;
use app::App;

mod config;
mod ui;

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::{self, Stderr};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::prelude::CrosstermBackend;
use ratatui_image::picker::Picker;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::tmdb::{ImageHost, TmdbClient};
use crate::app::{CurrentScreen, ImageStore};
use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "cinestream")]
#[command(about = "Browse TMDB movies from the terminal", long_about = None)]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write logs; the terminal belongs to the UI
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "cinestream_tui=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if args.log_file.is_some() {
        config.log_file = args.log_file;
    }
    init_logging(&config.log_path())?;

    let client = match config.api_key() {
        Ok(key) => Some(TmdbClient::new(key, &config.api_base_url, config.request_timeout())?),
        Err(e) => {
            warn!(error = %e, "no api key configured");
            None
        }
    };

    // setup terminal
    enable_raw_mode()?;
    let mut stderr = io::stderr(); // This is a special case. Normally using stdout is fine
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let result = match client {
        Some(client) => {
            // The graphics query talks to the terminal, so it runs after setup.
            let images = if config.images {
                let picker = Picker::from_query_stdio().unwrap_or_else(|e| {
                    warn!(error = %e, "terminal graphics query failed, using half blocks");
                    Picker::halfblocks()
                });
                ImageStore::new(picker)
            } else {
                ImageStore::disabled()
            };

            let mut app = App::new(
                Arc::new(client),
                ImageHost::new(&config.image_base_url),
                images,
            );
            info!(api_base = %config.api_base_url, "starting cinestream");
            run_app(&mut terminal, &mut app)
        }
        None => run_missing_key(&mut terminal),
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    app.start();

    loop {
        terminal.draw(|f| ui::ui(f, app))?;
        app.request_images();

        // Check for messages from the worker threads
        app.drain_messages();
        app.throbber.calc_next();

        // Poll for events with a timeout to allow UI updates
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if handle_key(app, key) {
                    return Ok(());
                }
            }
        }
    }
}

/// Applies one key press. Returns `true` when the user asked to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if app.editing_search {
        match key.code {
            KeyCode::Char(c) => app.search_input.push(c),
            KeyCode::Backspace => {
                app.search_input.pop();
            }
            KeyCode::Enter => app.submit_search(),
            KeyCode::Esc => app.editing_search = false,
            _ => {}
        }
        return false;
    }

    match app.current_screen {
        CurrentScreen::GenreMenu => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Char('g') => app.close_genre_menu(),
            KeyCode::Down | KeyCode::Char('j') => app.next_genre(),
            KeyCode::Up | KeyCode::Char('k') => app.previous_genre(),
            KeyCode::Enter => app.choose_genre(),
            _ => {}
        },
        CurrentScreen::Browse => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') | KeyCode::Char('s') => app.editing_search = true,
            KeyCode::Char('g') => app.open_genre_menu(),
            KeyCode::Char(c @ '0'..='6') => {
                if let Some(index) = c.to_digit(10) {
                    app.genre_shortcut(index as usize);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => app.next_row(),
            KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
            KeyCode::Right | KeyCode::Char('l') => app.next_card(),
            KeyCode::Left | KeyCode::Char('h') => app.previous_card(),
            KeyCode::Char(']') => app.scroll_row(true),
            KeyCode::Char('[') => app.scroll_row(false),
            KeyCode::Esc => app.reset_view(),
            _ => {}
        },
    }
    false
}

fn run_missing_key(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(ui::render_missing_api_key)?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Release {
                continue;
            }
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(());
            }
        }
    }
}
