mod banner;
mod card;
mod footer;
mod genre_menu;
mod header;
mod loading;
mod missing_key;
mod section;
#[allow(clippy::module_inception)]
mod ui;

pub use missing_key::render_missing_api_key;
pub use ui::ui;
