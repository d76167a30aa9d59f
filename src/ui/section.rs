use crate::app::tmdb::{ImageHost, Movie};
use crate::app::view::Section;
use crate::app::{ImageStore, RowCursor};
use crate::ui::card::{CardSize, render_card};
use crate::ui::loading::render_skeleton_row;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use throbber_widgets_tui::ThrobberState;

/// Terminals narrower than this get small cards everywhere.
const NARROW_WIDTH: u16 = 80;

pub struct SectionView<'a> {
    pub title: String,
    pub movies: &'a [Movie],
    pub loading: bool,
    pub size: CardSize,
    pub focused: bool,
}

pub fn card_size_for(section: Section, width: u16) -> CardSize {
    if width < NARROW_WIDTH {
        CardSize::Small
    } else if section == Section::Popular {
        CardSize::Large
    } else {
        CardSize::Medium
    }
}

/// Rows are one card tall plus the surrounding border; loading rows need an
/// extra line for the spinner.
pub fn section_height(size: CardSize) -> u16 {
    size.height() + 3
}

/// How many cards of `card_width` fit in `width`, one column apart.
pub fn visible_cards(width: u16, card_width: u16) -> usize {
    ((width + 1) / (card_width + 1)).max(1) as usize
}

fn scroll_controls(can_left: bool, can_right: bool) -> Line<'static> {
    let style = |enabled: bool| {
        if enabled {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    Line::from(vec![
        Span::styled(" ◀ ", style(can_left)),
        Span::styled("▶ ", style(can_right)),
    ])
    .right_aligned()
}

/// Renders a titled, horizontally scrolling row of cards.
pub fn render_section(
    frame: &mut Frame,
    area: Rect,
    view: SectionView<'_>,
    cursor: &mut RowCursor,
    images: &mut ImageStore,
    image_host: &ImageHost,
    throbber: &mut ThrobberState,
) {
    let border_style = if view.focused {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = Line::from(Span::styled(
        format!(" {} ", view.title),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);

    if view.loading {
        frame.render_widget(block, area);
        render_skeleton_row(frame, inner, view.size, throbber);
        return;
    }

    if view.movies.is_empty() {
        let mut lines = vec![Line::from(""); (inner.height / 2) as usize];
        lines.push(Line::from(Span::styled(
            "No movies available",
            Style::default().fg(Color::Gray),
        )));
        let empty = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let total = view.movies.len();
    let visible = visible_cards(inner.width, view.size.width());
    cursor.set_visible(visible, total);

    let block = block.title(scroll_controls(
        cursor.can_scroll_left(),
        cursor.can_scroll_right(total),
    ));
    frame.render_widget(block, area);

    let card_height = view.size.height().min(inner.height);
    for (slot, (index, movie)) in view
        .movies
        .iter()
        .enumerate()
        .skip(cursor.offset)
        .take(visible)
        .enumerate()
    {
        let x = inner.x + slot as u16 * (view.size.width() + 1);
        let width = view.size.width().min(inner.x + inner.width - x);
        let card = Rect::new(x, inner.y, width, card_height);

        let url = image_host.poster_url(movie.poster_path.as_deref());
        let selected = view.focused && index == cursor.selected;
        render_card(frame, card, movie, selected, images.get_mut(&url));
    }
}
