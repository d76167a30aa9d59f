use crate::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
};

const ATTRIBUTION: &str = " Data provided by The Movie Database (TMDB) ";

/// Returns the appropriate instruction text based on app state
fn get_instruction_text(app: &App) -> &'static str {
    if app.editing_search {
        return "(Enter) to search, (Backspace) to delete, (Esc) to stop editing";
    }
    match app.current_screen {
        CurrentScreen::GenreMenu => "(↑↓/jk) choose genre, (Enter) select, (Esc) back, (q) quit",
        CurrentScreen::Browse => {
            if app.view.mode.is_searching() || app.view.mode.selected_genre().is_some() {
                "(←→/hl) move, ([ ]) scroll, (/) search, (g) genres, (0-6) shortcuts, (Esc) back, (q) quit"
            } else {
                "(↑↓/jk) rows, (←→/hl) move, ([ ]) scroll, (/) search, (g) genres, (0-6) shortcuts, (q) quit"
            }
        }
    }
}

/// Renders the footer with instructions at the bottom of the screen
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut bottom_block = Block::default()
        .borders(Borders::ALL)
        .title_bottom(
            Line::styled(ATTRIBUTION, Style::default().fg(Color::DarkGray)).right_aligned(),
        );
    if app.view.loading.any() {
        bottom_block = bottom_block.title(Line::styled(
            " Loading... ",
            Style::default().fg(Color::Cyan),
        ));
    }

    let instruction_text = get_instruction_text(app);
    let bottom = Paragraph::new(Text::styled(instruction_text, Style::default()))
        .block(bottom_block);

    frame.render_widget(bottom, area);
}
