use crate::app::tmdb::Movie;
use crate::app::utils::{format_rating, release_year, truncate};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use ratatui_image::{Resize, StatefulImage, protocol::StatefulProtocol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSize {
    Small,
    Medium,
    Large,
}

impl CardSize {
    pub fn width(self) -> u16 {
        match self {
            CardSize::Small => 16,
            CardSize::Medium => 20,
            CardSize::Large => 24,
        }
    }

    pub fn height(self) -> u16 {
        match self {
            CardSize::Small => 10,
            CardSize::Medium => 12,
            CardSize::Large => 14,
        }
    }
}

/// Renders one movie card: poster, title, year and rating badge.
pub fn render_card(
    frame: &mut Frame,
    area: Rect,
    movie: &Movie,
    selected: bool,
    poster: Option<&mut StatefulProtocol>,
) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let badge = Line::from(Span::styled(
        format!("★ {}", format_rating(movie.vote_average)),
        Style::default().fg(Color::Yellow),
    ))
    .right_aligned();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(badge);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 || inner.width == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Poster
            Constraint::Length(1), // Title
            Constraint::Length(1), // Year
        ])
        .split(inner);

    match poster {
        Some(protocol) => {
            let image = StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None));
            frame.render_stateful_widget(image, chunks[0], protocol);
        }
        None => render_poster_placeholder(frame, chunks[0]),
    }

    let title_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let title = Paragraph::new(Span::styled(
        truncate(&movie.title, inner.width as usize),
        title_style,
    ));
    frame.render_widget(title, chunks[1]);

    let year = Paragraph::new(Span::styled(
        release_year(movie),
        Style::default().fg(Color::Gray),
    ));
    frame.render_widget(year, chunks[2]);
}

fn render_poster_placeholder(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(""); (area.height / 2).saturating_sub(1) as usize];
    lines.push(Line::from(Span::styled(
        "No Image",
        Style::default().fg(Color::Gray),
    )));

    let placeholder = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().style(Style::default().bg(Color::Rgb(51, 65, 85))));

    frame.render_widget(placeholder, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::view::tests::movie;
    use ratatui::{Terminal, backend::TestBackend};

    fn rendered(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_card_shows_title_year_rating_and_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(20, 12)).unwrap();
        let mut m = movie(1);
        m.title = "Heat".to_string();
        m.vote_average = 8.4;

        terminal
            .draw(|f| render_card(f, f.area(), &m, false, None))
            .unwrap();

        let text = rendered(&terminal);
        assert!(text.contains("Heat"));
        assert!(text.contains("2024"));
        assert!(text.contains("8.4"));
        assert!(text.contains("No Image"));
    }

    #[test]
    fn test_card_without_date_shows_tba() {
        let mut terminal = Terminal::new(TestBackend::new(16, 10)).unwrap();
        let mut m = movie(2);
        m.release_date = None;

        terminal
            .draw(|f| render_card(f, f.area(), &m, true, None))
            .unwrap();

        assert!(rendered(&terminal).contains("TBA"));
    }

    #[test]
    fn test_sizes_grow() {
        assert!(CardSize::Small.width() < CardSize::Medium.width());
        assert!(CardSize::Medium.width() < CardSize::Large.width());
        assert!(CardSize::Small.height() < CardSize::Large.height());
    }
}
