use crate::app::{App, SHORTCUT_GENRES};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const SEARCH_PLACEHOLDER: &str = "Search movies...";

/// Renders the top bar: logo, genre shortcuts and the search box.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14), // Logo
            Constraint::Min(10),    // Genre shortcuts
            Constraint::Length(32), // Search
        ])
        .split(area);

    let logo = Paragraph::new(Span::styled(
        "CineStream",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(logo, chunks[0]);

    let genres = Paragraph::new(genre_shortcuts(app))
        .block(Block::default().borders(Borders::ALL).title(" Genres "));
    frame.render_widget(genres, chunks[1]);

    render_search_box(frame, app, chunks[2]);
}

/// `[0] Popular` followed by the first six genres, the active one highlighted.
fn genre_shortcuts(app: &App) -> Line<'static> {
    let selected = app.view.mode.selected_genre();

    let entry = |key: usize, name: &str, active: bool| {
        let style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!("[{}] {}", key, name), style)
    };

    let mut spans = vec![entry(0, "Popular", selected.is_none())];
    for (i, genre) in app.view.genres.iter().take(SHORTCUT_GENRES).enumerate() {
        spans.push(Span::raw(" "));
        spans.push(entry(i + 1, &genre.name, selected == Some(genre.id)));
    }
    Line::from(spans)
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.editing_search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let text = if app.search_input.is_empty() && !app.editing_search {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else if app.editing_search {
        Span::styled(
            format!("{}_", app.search_input),
            Style::default().fg(Color::White),
        )
    } else {
        Span::styled(app.search_input.clone(), Style::default().fg(Color::White))
    };

    let search = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Search "),
    );
    frame.render_widget(search, area);
}
