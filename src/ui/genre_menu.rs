use crate::app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Full genre list; entry 0 returns to the popular view.
pub fn render_genre_menu(frame: &mut Frame, app: &mut App, area: Rect) {
    let active = app.view.mode.selected_genre();

    let mut items = vec![menu_item("Popular", active.is_none())];
    items.extend(
        app.view
            .genres
            .iter()
            .map(|genre| menu_item(&genre.name, active == Some(genre.id))),
    );

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Genres ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.genre_menu);
}

fn menu_item(name: &str, active: bool) -> ListItem<'static> {
    let style = if active {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    ListItem::new(Line::from(Span::styled(name.to_string(), style)))
}
