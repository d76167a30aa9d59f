use crate::app::view::Section;
use crate::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use super::banner::{BANNER_HEIGHT, render_banner};
use super::footer::render_footer;
use super::genre_menu::render_genre_menu;
use super::header::render_header;
use super::section::{SectionView, card_size_for, render_section, section_height};

/// Main UI rendering function that orchestrates all UI components
pub fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.current_screen {
        CurrentScreen::GenreMenu => render_genre_menu(frame, app, chunks[1]),
        CurrentScreen::Browse => render_browse(frame, app, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);
}

/// Banner on top while the first row is focused, then as many rows as fit.
fn render_browse(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut rows_area = area;

    if app.view.shows_banner() && app.focused_row == 0 {
        let banner_height = BANNER_HEIGHT.min(area.height / 2);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(banner_height), Constraint::Min(0)])
            .split(area);
        render_banner(frame, app, chunks[0]);
        rows_area = chunks[1];
    }

    let sections = app.view.visible_sections();
    let heights: Vec<u16> = sections
        .iter()
        .map(|section| section_height(card_size_for(*section, rows_area.width)))
        .collect();
    let first = first_visible_row(&heights, app.focused_row, rows_area.height);

    let bottom = rows_area.y + rows_area.height;
    let mut y = rows_area.y;
    for (index, section) in sections.iter().enumerate().skip(first) {
        if y >= bottom {
            break;
        }
        let height = heights[index].min(bottom - y);
        let row = Rect::new(rows_area.x, y, rows_area.width, height);
        render_section_row(frame, app, *section, index == app.focused_row, row);
        y += height;
    }
}

/// Index of the topmost row to draw so the focused row is on screen.
fn first_visible_row(heights: &[u16], focused: usize, available: u16) -> usize {
    let Some(&focused_height) = heights.get(focused) else {
        return 0;
    };

    let mut first = focused;
    let mut used = focused_height;
    while first > 0 && used + heights[first - 1] <= available {
        first -= 1;
        used += heights[first];
    }
    first
}

fn render_section_row(frame: &mut Frame, app: &mut App, section: Section, focused: bool, area: Rect) {
    let view = SectionView {
        title: app.section_title(section),
        movies: app.view.results(section),
        loading: app.view.loading.get(section),
        size: card_size_for(section, area.width),
        focused,
    };
    let cursor = app.cursors.entry(section).or_default();

    render_section(
        frame,
        area,
        view,
        cursor,
        &mut app.images,
        &app.image_host,
        &mut app.throbber,
    );
}
