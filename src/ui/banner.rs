use crate::app::App;
use crate::app::tmdb::Movie;
use crate::app::utils::{display_width, format_rating, group_thousands, long_release_date};
use crate::ui::loading::render_banner_skeleton;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use ratatui_image::{Resize, StatefulImage, protocol::StatefulProtocol};
use tui_big_text::{BigText, PixelSize};

pub const BANNER_HEIGHT: u16 = 16;

/// Quadrant pixels draw each character four columns wide.
const BIG_TEXT_COLUMNS: usize = 4;

/// Renders the featured movie, or a skeleton while it is loading.
pub fn render_banner(frame: &mut Frame, app: &mut App, area: Rect) {
    let movie = match &app.view.banner {
        Some(movie) if !app.view.loading.banner => movie,
        _ => {
            render_banner_skeleton(frame, area, app.view.loading.banner, &mut app.throbber);
            return;
        }
    };

    let outer_block = Block::default()
        .title(" Featured ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let inner_area = outer_block.inner(area);
    frame.render_widget(outer_block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Backdrop
            Constraint::Min(20),        // Details
        ])
        .split(inner_area);

    let url = app.image_host.backdrop_url(movie.backdrop_path.as_deref());
    render_backdrop(frame, chunks[0], app.images.get_mut(&url));
    render_details(frame, chunks[1], movie);
}

fn render_backdrop(frame: &mut Frame, area: Rect, backdrop: Option<&mut StatefulProtocol>) {
    if let Some(protocol) = backdrop {
        let image = StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(None));
        frame.render_stateful_widget(image, area, protocol);
        return;
    }

    let mut placeholder_text = vec![Line::from(""); (area.height / 2).saturating_sub(1) as usize];
    placeholder_text.push(Line::from(Span::styled(
        "No backdrop available",
        Style::default().fg(Color::Gray),
    )));

    let placeholder = Paragraph::new(placeholder_text)
        .alignment(Alignment::Center)
        .block(Block::default().style(Style::default().bg(Color::Rgb(30, 41, 59))));

    frame.render_widget(placeholder, area);
}

fn render_details(frame: &mut Frame, area: Rect, movie: &Movie) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title
            Constraint::Length(1), // Rating
            Constraint::Length(1), // Release date
            Constraint::Length(1),
            Constraint::Min(1), // Overview
        ])
        .split(area);

    render_title(frame, chunks[0], &movie.title);

    let rating = Line::from(vec![
        Span::styled("★ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            format_rating(movie.vote_average),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({} votes)", group_thousands(movie.vote_count)),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(rating), chunks[1]);

    let released = Line::from(vec![
        Span::styled("Released: ", Style::default().fg(Color::Gray)),
        Span::styled(long_release_date(movie), Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(released), chunks[2]);

    let overview = if movie.overview.trim().is_empty() {
        "No overview available."
    } else {
        movie.overview.as_str()
    };
    let overview = Paragraph::new(Span::styled(overview, Style::default().fg(Color::White)))
        .wrap(Wrap { trim: true });
    frame.render_widget(overview, chunks[4]);
}

fn fits_big_text(title: &str, width: u16) -> bool {
    display_width(title).saturating_mul(BIG_TEXT_COLUMNS) <= usize::from(width)
}

/// Big pixel title when it fits, plain bold text otherwise.
fn render_title(frame: &mut Frame, area: Rect, title: &str) {
    let style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    if fits_big_text(title, area.width) {
        let big_text = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(style)
            .lines(vec![title.to_string().into()])
            .build();
        frame.render_widget(big_text, area);
    } else {
        let title = Paragraph::new(Span::styled(title.to_string(), style)).wrap(Wrap { trim: true });
        frame.render_widget(title, area);
    }
}
