use crate::ui::card::CardSize;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

/// Placeholder cards shown while a row is loading.
pub const SKELETON_CARDS: usize = 6;

const SKELETON: Color = Color::Rgb(51, 65, 85);

/// Renders a spinner line followed by a row of skeleton cards.
pub fn render_skeleton_row(
    frame: &mut Frame,
    area: Rect,
    size: CardSize,
    throbber: &mut ThrobberState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let spinner = Throbber::default()
        .label("Loading movies...")
        .style(Style::default().fg(Color::Cyan));
    frame.render_stateful_widget(spinner, chunks[0], throbber);

    let row = chunks[1];
    for i in 0..SKELETON_CARDS {
        let x = row.x + i as u16 * (size.width() + 1);
        if x + size.width() > row.x + row.width {
            break;
        }
        let card = Rect::new(x, row.y, size.width(), size.height().min(row.height));
        render_skeleton_card(frame, card);
    }
}

fn render_skeleton_card(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let poster = Rect::new(inner.x, inner.y, inner.width, inner.height - 2);
    let title = Rect::new(inner.x, inner.y + inner.height - 2, inner.width, 1);
    let subtitle = Rect::new(
        inner.x,
        inner.y + inner.height - 1,
        inner.width * 3 / 4,
        1,
    );

    for bar in [poster, title, subtitle] {
        frame.render_widget(Block::default().style(Style::default().bg(SKELETON)), bar);
    }
}

/// Skeleton for the banner. The spinner only runs while the featured movie is
/// still loading; otherwise the empty frame stays.
pub fn render_banner_skeleton(
    frame: &mut Frame,
    area: Rect,
    loading: bool,
    throbber: &mut ThrobberState,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spinner
            Constraint::Length(1),
            Constraint::Length(3), // Title
            Constraint::Length(1),
            Constraint::Length(1), // Overview
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    if loading {
        let spinner = Throbber::default()
            .label("Loading featured movie...")
            .style(Style::default().fg(Color::Cyan));
        frame.render_stateful_widget(spinner, chunks[0], throbber);
    }

    let bars = [
        (chunks[2], inner.width * 3 / 4),
        (chunks[4], inner.width),
        (chunks[5], inner.width * 5 / 6),
    ];
    for (row, width) in bars {
        let bar = Rect::new(row.x, row.y, width.min(row.width), row.height);
        frame.render_widget(Block::default().style(Style::default().bg(SKELETON)), bar);
    }
}
