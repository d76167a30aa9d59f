#[allow(clippy::module_inception)]
mod app;
pub mod tmdb;
pub mod utils;
pub mod view;

pub use app::*;
