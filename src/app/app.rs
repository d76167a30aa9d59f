use crate::app::tmdb::{CatalogApi, CatalogError, Genre, GenreId, ImageHost, Movie, MoviePage};
use crate::app::view::{Generation, Section, ViewState};

use image::DynamicImage;
use ratatui::widgets::ListState;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use std::collections::HashMap;
use std::sync::{Arc, mpsc};
use std::thread;
use throbber_widgets_tui::ThrobberState;
use tracing::{debug, error, info, warn};

/// Number of genres reachable with the `1`..`6` shortcuts.
pub const SHORTCUT_GENRES: usize = 6;

/// Results sent from worker threads back to the UI thread.
pub enum CatalogMessage {
    GenresLoaded(Vec<Genre>),
    ListLoaded(Section, Vec<Movie>),
    StartupFailed(CatalogError),
    GenreResults {
        generation: Generation,
        result: Result<MoviePage, CatalogError>,
    },
    SearchResults {
        generation: Generation,
        result: Result<MoviePage, CatalogError>,
    },
    ImageLoaded {
        url: String,
        result: Result<DynamicImage, CatalogError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentScreen {
    Browse,
    GenreMenu,
}

/// Selection and horizontal scroll position of one row of cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCursor {
    pub selected: usize,
    pub offset: usize,
    pub visible: usize,
}

impl RowCursor {
    fn page(&self) -> usize {
        self.visible.max(1)
    }

    fn max_offset(&self, total: usize) -> usize {
        total.saturating_sub(self.page())
    }

    fn keep_selected_visible(&mut self) {
        let page = self.page();
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + page {
            self.offset = self.selected + 1 - page;
        }
    }

    /// Called by the renderer once it knows how many cards fit.
    pub fn set_visible(&mut self, visible: usize, total: usize) {
        self.visible = visible;
        self.selected = self.selected.min(total.saturating_sub(1));
        self.offset = self.offset.min(self.max_offset(total));
        self.keep_selected_visible();
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(total - 1);
        self.keep_selected_visible();
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.keep_selected_visible();
    }

    /// Moves the window one page and drags the selection along.
    pub fn scroll(&mut self, forward: bool, total: usize) {
        let page = self.page();
        self.offset = if forward {
            (self.offset + page).min(self.max_offset(total))
        } else {
            self.offset.saturating_sub(page)
        };
        let last = (self.offset + page).min(total).saturating_sub(1);
        self.selected = self.selected.clamp(self.offset, last.max(self.offset));
    }

    pub fn can_scroll_left(&self) -> bool {
        self.offset > 0
    }

    pub fn can_scroll_right(&self, total: usize) -> bool {
        self.offset + self.page() < total
    }
}

pub enum ImageSlot {
    Loading,
    Ready(StatefulProtocol),
    Failed,
}

/// Upper bound on remembered images. Roughly four screens of cards.
pub const IMAGE_CAPACITY: usize = 128;

/// Decoded posters and backdrops, keyed by URL. Renderers ask for what they
/// draw; unknown URLs are queued and fetched after the frame. Once more than
/// `capacity` URLs are known, the least recently drawn ones are dropped.
pub struct ImageStore {
    picker: Option<Picker>,
    slots: HashMap<String, (ImageSlot, u64)>,
    wanted: Vec<String>,
    capacity: usize,
    tick: u64,
}

impl ImageStore {
    pub fn new(picker: Picker) -> Self {
        Self::with_capacity(Some(picker), IMAGE_CAPACITY)
    }

    /// Never loads anything; every card shows its placeholder.
    pub fn disabled() -> Self {
        Self::with_capacity(None, IMAGE_CAPACITY)
    }

    fn with_capacity(picker: Option<Picker>, capacity: usize) -> Self {
        Self {
            picker,
            slots: HashMap::new(),
            wanted: Vec::new(),
            capacity: capacity.max(1),
            tick: 0,
        }
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut StatefulProtocol> {
        if self.picker.is_none() || !url.starts_with("http") {
            return None;
        }
        self.tick += 1;
        match self.slots.get_mut(url) {
            Some((slot, used)) => {
                *used = self.tick;
                match slot {
                    ImageSlot::Ready(protocol) => Some(protocol),
                    _ => None,
                }
            }
            None => {
                if !self.wanted.iter().any(|w| w == url) {
                    self.wanted.push(url.to_string());
                }
                None
            }
        }
    }

    pub fn take_wanted(&mut self) -> Vec<String> {
        let wanted = std::mem::take(&mut self.wanted);
        for url in &wanted {
            self.insert(url.clone(), ImageSlot::Loading);
        }
        wanted
    }

    fn finish(&mut self, url: String, result: Result<DynamicImage, CatalogError>) {
        // Evicted while downloading; it will be asked for again if still drawn.
        if !self.slots.contains_key(&url) {
            return;
        }
        let slot = match (result, &self.picker) {
            (Ok(image), Some(picker)) => ImageSlot::Ready(picker.new_resize_protocol(image)),
            (Ok(_), None) => ImageSlot::Failed,
            (Err(e), _) => {
                warn!(url = %url, error = %e, "image failed to load");
                ImageSlot::Failed
            }
        };
        self.insert(url, slot);
    }

    fn insert(&mut self, url: String, slot: ImageSlot) {
        self.tick += 1;
        self.slots.insert(url, (slot, self.tick));

        while self.slots.len() > self.capacity {
            let oldest = self
                .slots
                .iter()
                .min_by_key(|(_, (_, used))| *used)
                .map(|(url, _)| url.clone());
            match oldest {
                Some(url) => {
                    self.slots.remove(&url);
                }
                None => break,
            }
        }
    }
}

pub struct App {
    pub view: ViewState,
    pub current_screen: CurrentScreen,
    pub editing_search: bool,
    pub search_input: String,
    pub focused_row: usize,
    pub cursors: HashMap<Section, RowCursor>,
    pub genre_menu: ListState,
    pub images: ImageStore,
    pub image_host: ImageHost,
    pub throbber: ThrobberState,
    pub sender: mpsc::Sender<CatalogMessage>,
    pub receiver: mpsc::Receiver<CatalogMessage>,
    client: Arc<dyn CatalogApi>,
}

impl App {
    pub fn new(client: Arc<dyn CatalogApi>, image_host: ImageHost, images: ImageStore) -> Self {
        let (sender, receiver) = mpsc::channel();
        let mut genre_menu = ListState::default();
        genre_menu.select(Some(0));

        Self {
            view: ViewState::new(),
            current_screen: CurrentScreen::Browse,
            editing_search: false,
            search_input: String::new(),
            focused_row: 0,
            cursors: HashMap::new(),
            genre_menu,
            images,
            image_host,
            throbber: ThrobberState::default(),
            sender,
            receiver,
            client,
        }
    }

    /// Kicks off the one-time startup load on a background thread.
    pub fn start(&mut self) {
        info!("loading initial catalog data");
        let client = Arc::clone(&self.client);
        let sender = self.sender.clone();

        thread::spawn(move || {
            load_initial_data(client.as_ref(), &sender);
        });
    }

    fn spawn_fetch<F>(&self, job: F)
    where
        F: FnOnce(&dyn CatalogApi) -> CatalogMessage + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let sender = self.sender.clone();

        thread::spawn(move || {
            let _ = sender.send(job(client.as_ref()));
        });
    }

    pub fn select_genre(&mut self, genre: Option<GenreId>) {
        self.focused_row = 0;
        self.cursors.remove(&Section::Genre);

        let (Some(generation), Some(id)) = (self.view.begin_genre(genre), genre) else {
            return;
        };

        debug!(genre = id, generation, "loading genre");
        self.spawn_fetch(move |client| CatalogMessage::GenreResults {
            generation,
            result: client.by_genre(id, None),
        });
    }

    pub fn search(&mut self, query: &str) {
        self.focused_row = 0;
        self.cursors.remove(&Section::Search);

        let Some(generation) = self.view.begin_search(query) else {
            return;
        };

        let query = query.trim().to_string();
        debug!(query = %query, generation, "searching");
        self.spawn_fetch(move |client| CatalogMessage::SearchResults {
            generation,
            result: client.search(&query, None),
        });
    }

    /// Sends the locally held query from the top bar.
    pub fn submit_search(&mut self) {
        self.editing_search = false;
        let query = self.search_input.clone();
        self.search(&query);
    }

    /// `0` returns to the default view, `1`..`6` pick the first six genres.
    pub fn genre_shortcut(&mut self, index: usize) {
        if index == 0 {
            self.select_genre(None);
        } else if index <= SHORTCUT_GENRES {
            if let Some(id) = self.view.genres.get(index - 1).map(|g| g.id) {
                self.select_genre(Some(id));
            }
        }
    }

    pub fn reset_view(&mut self) {
        if self.view.mode.is_searching() {
            self.search_input.clear();
            self.search("");
        } else if self.view.mode.selected_genre().is_some() {
            self.select_genre(None);
        }
    }

    pub fn handle_message(&mut self, message: CatalogMessage) {
        match message {
            CatalogMessage::GenresLoaded(genres) => {
                debug!(count = genres.len(), "genres loaded");
                self.view.apply_genres(genres);
            }
            CatalogMessage::ListLoaded(section, movies) => {
                debug!(?section, count = movies.len(), "list loaded");
                self.cursors.remove(&section);
                self.view.apply_startup_list(section, movies);
            }
            CatalogMessage::StartupFailed(e) => {
                error!(error = %e, "error loading initial data");
                self.view.fail_startup();
            }
            CatalogMessage::GenreResults { generation, result } => {
                let movies = result.map(|page| page.results).unwrap_or_else(|e| {
                    error!(error = %e, "error loading genre movies");
                    Vec::new()
                });
                if self.view.finish_genre(generation, movies) {
                    self.cursors.remove(&Section::Genre);
                } else {
                    debug!(generation, "discarding stale genre results");
                }
            }
            CatalogMessage::SearchResults { generation, result } => {
                let movies = result.map(|page| page.results).unwrap_or_else(|e| {
                    error!(error = %e, "error searching movies");
                    Vec::new()
                });
                if self.view.finish_search(generation, movies) {
                    self.cursors.remove(&Section::Search);
                } else {
                    debug!(generation, "discarding stale search results");
                }
            }
            CatalogMessage::ImageLoaded { url, result } => {
                self.images.finish(url, result);
            }
        }
    }

    /// Applies every message that has arrived since the last tick.
    pub fn drain_messages(&mut self) {
        let messages: Vec<CatalogMessage> = self.receiver.try_iter().collect();
        for message in messages {
            self.handle_message(message);
        }
    }

    /// Starts downloads for images the last frame asked for.
    pub fn request_images(&mut self) {
        for url in self.images.take_wanted() {
            self.spawn_fetch(move |client| {
                let result = client.fetch_image(&url);
                CatalogMessage::ImageLoaded { url, result }
            });
        }
    }

    pub fn section_title(&self, section: Section) -> String {
        match section {
            Section::Popular => "Popular Movies".to_string(),
            Section::TopRated => "Top Rated".to_string(),
            Section::NowPlaying => "Now Playing".to_string(),
            Section::Upcoming => "Upcoming".to_string(),
            Section::Genre => format!(
                "{} Movies",
                self.view.selected_genre_name().unwrap_or("Genre")
            ),
            Section::Search => "Search Results".to_string(),
        }
    }

    pub fn focused_section(&self) -> Option<Section> {
        self.view.visible_sections().get(self.focused_row).copied()
    }

    pub fn next_row(&mut self) {
        let rows = self.view.visible_sections().len();
        if rows > 0 {
            self.focused_row = (self.focused_row + 1).min(rows - 1);
        }
    }

    pub fn previous_row(&mut self) {
        self.focused_row = self.focused_row.saturating_sub(1);
    }

    fn with_focused_cursor(&mut self, f: impl FnOnce(&mut RowCursor, usize)) {
        let Some(section) = self.focused_section() else {
            return;
        };
        let total = self.view.results(section).len();
        f(self.cursors.entry(section).or_default(), total);
    }

    pub fn next_card(&mut self) {
        self.with_focused_cursor(|cursor, total| cursor.select_next(total));
    }

    pub fn previous_card(&mut self) {
        self.with_focused_cursor(|cursor, _| cursor.select_previous());
    }

    pub fn scroll_row(&mut self, forward: bool) {
        self.with_focused_cursor(|cursor, total| cursor.scroll(forward, total));
    }

    pub fn open_genre_menu(&mut self) {
        let index = self
            .view
            .mode
            .selected_genre()
            .and_then(|id| self.view.genres.iter().position(|g| g.id == id))
            .map_or(0, |i| i + 1);
        self.genre_menu.select(Some(index));
        self.current_screen = CurrentScreen::GenreMenu;
    }

    pub fn close_genre_menu(&mut self) {
        self.current_screen = CurrentScreen::Browse;
    }

    /// Entry 0 of the menu is "Popular", the rest are genres in order.
    fn genre_menu_len(&self) -> usize {
        self.view.genres.len() + 1
    }

    pub fn next_genre(&mut self) {
        let len = self.genre_menu_len();
        let current = self.genre_menu.selected().unwrap_or(0);
        self.genre_menu.select(Some((current + 1) % len));
    }

    pub fn previous_genre(&mut self) {
        let len = self.genre_menu_len();
        let current = self.genre_menu.selected().unwrap_or(0);
        let previous = if current == 0 { len - 1 } else { current - 1 };
        self.genre_menu.select(Some(previous));
    }

    pub fn choose_genre(&mut self) {
        let genre = match self.genre_menu.selected().unwrap_or(0) {
            0 => None,
            i => self.view.genres.get(i - 1).map(|g| g.id),
        };
        self.current_screen = CurrentScreen::Browse;
        self.select_genre(genre);
    }
}

type ListFetch = fn(&dyn CatalogApi) -> Result<MoviePage, CatalogError>;

/// Genres, then popular (which also picks the banner), then the remaining
/// three lists concurrently. Each list is reported as soon as it lands.
fn load_initial_data(client: &dyn CatalogApi, sender: &mpsc::Sender<CatalogMessage>) {
    match client.genres() {
        Ok(genres) => {
            let _ = sender.send(CatalogMessage::GenresLoaded(genres));
        }
        Err(e) => {
            let _ = sender.send(CatalogMessage::StartupFailed(e));
            return;
        }
    }

    match client.popular(None) {
        Ok(page) => {
            let _ = sender.send(CatalogMessage::ListLoaded(Section::Popular, page.results));
        }
        Err(e) => {
            let _ = sender.send(CatalogMessage::StartupFailed(e));
            return;
        }
    }

    let lists: [(Section, ListFetch); 3] = [
        (Section::TopRated, |c: &dyn CatalogApi| c.top_rated(None)),
        (Section::NowPlaying, |c: &dyn CatalogApi| c.now_playing(None)),
        (Section::Upcoming, |c: &dyn CatalogApi| c.upcoming(None)),
    ];

    thread::scope(|scope| {
        for (section, fetch) in lists {
            let sender = sender.clone();
            scope.spawn(move || {
                let message = match fetch(client) {
                    Ok(page) => CatalogMessage::ListLoaded(section, page.results),
                    Err(e) => CatalogMessage::StartupFailed(e),
                };
                let _ = sender.send(message);
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::view::ViewMode;
    use crate::app::view::tests::movie;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct FakeCatalog {
        calls: Mutex<Vec<String>>,
        popular: Vec<Movie>,
        failing: Vec<&'static str>,
    }

    impl FakeCatalog {
        fn respond(&self, call: String, movies: Vec<Movie>) -> Result<MoviePage, CatalogError> {
            let name = call.split(':').next().unwrap_or_default().to_string();
            self.calls.lock().unwrap().push(call);
            if self.failing.contains(&name.as_str()) {
                return Err(CatalogError::RequestFailed {
                    endpoint: name,
                    status: 500,
                });
            }
            Ok(MoviePage {
                page: 1,
                total_pages: 1,
                total_results: movies.len() as u64,
                results: movies,
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CatalogApi for FakeCatalog {
        fn popular(&self, _page: Option<u32>) -> Result<MoviePage, CatalogError> {
            self.respond("popular".to_string(), self.popular.clone())
        }

        fn top_rated(&self, _page: Option<u32>) -> Result<MoviePage, CatalogError> {
            self.respond("top_rated".to_string(), vec![movie(10)])
        }

        fn now_playing(&self, _page: Option<u32>) -> Result<MoviePage, CatalogError> {
            self.respond("now_playing".to_string(), vec![movie(20)])
        }

        fn upcoming(&self, _page: Option<u32>) -> Result<MoviePage, CatalogError> {
            self.respond("upcoming".to_string(), vec![movie(30)])
        }

        fn by_genre(&self, genre: GenreId, _page: Option<u32>) -> Result<MoviePage, CatalogError> {
            let base = u64::from(genre) * 100;
            self.respond(
                format!("by_genre:{}", genre),
                vec![movie(base + 3), movie(base + 1), movie(base + 2)],
            )
        }

        fn search(&self, query: &str, _page: Option<u32>) -> Result<MoviePage, CatalogError> {
            self.respond(format!("search:{}", query), vec![movie(42)])
        }

        fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
            self.respond("genres".to_string(), Vec::new())?;
            Ok(vec![
                Genre {
                    id: 28,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 35,
                    name: "Comedy".to_string(),
                },
            ])
        }

        fn fetch_image(&self, url: &str) -> Result<DynamicImage, CatalogError> {
            Err(CatalogError::RequestFailed {
                endpoint: url.to_string(),
                status: 404,
            })
        }
    }

    fn app_with(catalog: FakeCatalog) -> (App, Arc<FakeCatalog>) {
        let catalog = Arc::new(catalog);
        let app = App::new(
            catalog.clone(),
            ImageHost::default(),
            ImageStore::disabled(),
        );
        (app, catalog)
    }

    fn pump_until(app: &mut App, done: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(app) {
            assert!(Instant::now() < deadline, "timed out waiting for worker");
            if let Ok(message) = app.receiver.recv_timeout(Duration::from_millis(20)) {
                app.handle_message(message);
            }
        }
    }

    fn settle(app: &mut App) {
        while let Ok(message) = app.receiver.recv_timeout(Duration::from_millis(200)) {
            app.handle_message(message);
        }
    }

    fn ids(app: &App, section: Section) -> Vec<u64> {
        app.view.results(section).iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_startup_loads_every_section_and_banner() {
        let (mut app, catalog) = app_with(FakeCatalog {
            popular: vec![movie(1), movie(2)],
            ..Default::default()
        });

        app.start();
        pump_until(&mut app, |app| !app.view.loading.any());
        settle(&mut app);

        assert_eq!(app.view.banner.as_ref().map(|m| m.id), Some(1));
        assert_eq!(ids(&app, Section::Popular), vec![1, 2]);
        assert_eq!(ids(&app, Section::TopRated), vec![10]);
        assert_eq!(ids(&app, Section::NowPlaying), vec![20]);
        assert_eq!(ids(&app, Section::Upcoming), vec![30]);
        assert_eq!(app.view.genres.len(), 2);

        let calls = catalog.calls();
        assert_eq!(&calls[..2], ["genres", "popular"]);
        assert_eq!(calls.len(), 5);
    }

    #[test]
    fn test_startup_failure_clears_every_flag() {
        let (mut app, _) = app_with(FakeCatalog {
            popular: vec![movie(1)],
            failing: vec!["now_playing"],
            ..Default::default()
        });

        app.start();
        pump_until(&mut app, |app| !app.view.loading.any());
        settle(&mut app);

        assert!(!app.view.loading.any());
        assert_eq!(ids(&app, Section::Popular), vec![1]);
        assert!(ids(&app, Section::NowPlaying).is_empty());
    }

    #[test]
    fn test_genre_list_failure_stops_startup() {
        let (mut app, catalog) = app_with(FakeCatalog {
            failing: vec!["genres"],
            ..Default::default()
        });

        app.start();
        pump_until(&mut app, |app| !app.view.loading.any());
        settle(&mut app);

        assert_eq!(catalog.calls(), vec!["genres"]);
        assert!(app.view.banner.is_none());
        assert!(app.view.genres.is_empty());
    }

    #[test]
    fn test_select_genre_fetches_and_keeps_order() {
        let (mut app, catalog) = app_with(FakeCatalog::default());

        app.select_genre(Some(28));
        assert!(app.view.loading.genre);

        pump_until(&mut app, |app| !app.view.loading.genre);
        assert_eq!(ids(&app, Section::Genre), vec![2803, 2801, 2802]);
        assert_eq!(catalog.calls(), vec!["by_genre:28"]);
    }

    #[test]
    fn test_genre_failure_falls_back_to_empty() {
        let (mut app, _) = app_with(FakeCatalog {
            failing: vec!["by_genre"],
            ..Default::default()
        });

        app.select_genre(Some(28));
        pump_until(&mut app, |app| !app.view.loading.genre);

        assert!(ids(&app, Section::Genre).is_empty());
        assert_eq!(app.view.mode, ViewMode::ByGenre(28));
    }

    #[test]
    fn test_latest_genre_selection_wins() {
        let (mut app, _) = app_with(FakeCatalog::default());

        app.select_genre(Some(28));
        app.select_genre(Some(35));
        pump_until(&mut app, |app| !app.view.loading.genre);
        settle(&mut app);

        assert_eq!(ids(&app, Section::Genre), vec![3503, 3501, 3502]);
    }

    #[test]
    fn test_search_sends_one_request_and_clears_genre() {
        let (mut app, catalog) = app_with(FakeCatalog::default());

        app.select_genre(Some(28));
        pump_until(&mut app, |app| !app.view.loading.genre);

        app.search_input = "star wars".to_string();
        app.submit_search();
        assert_eq!(app.view.mode.selected_genre(), None);
        assert!(app.view.loading.search);

        pump_until(&mut app, |app| !app.view.loading.search);
        assert_eq!(ids(&app, Section::Search), vec![42]);

        let searches: Vec<String> = catalog
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("search:"))
            .collect();
        assert_eq!(searches, vec!["search:star wars"]);
    }

    #[test]
    fn test_empty_search_after_results_sends_nothing() {
        let (mut app, catalog) = app_with(FakeCatalog::default());

        app.search("alien");
        pump_until(&mut app, |app| !app.view.loading.search);
        assert_eq!(ids(&app, Section::Search), vec![42]);

        app.search("");
        assert!(!app.view.mode.is_searching());
        assert!(ids(&app, Section::Search).is_empty());

        settle(&mut app);
        assert_eq!(catalog.calls(), vec!["search:alien"]);
    }

    #[test]
    fn test_genre_shortcuts() {
        let (mut app, _) = app_with(FakeCatalog::default());
        app.view.apply_genres(vec![Genre {
            id: 28,
            name: "Action".to_string(),
        }]);

        app.genre_shortcut(1);
        assert_eq!(app.view.mode, ViewMode::ByGenre(28));

        app.genre_shortcut(5);
        assert_eq!(app.view.mode, ViewMode::ByGenre(28));

        app.genre_shortcut(0);
        assert_eq!(app.view.mode, ViewMode::Default);
    }

    #[test]
    fn test_genre_menu_wraps_and_chooses() {
        let (mut app, _) = app_with(FakeCatalog::default());
        app.view.apply_genres(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 35,
                name: "Comedy".to_string(),
            },
        ]);

        app.open_genre_menu();
        assert_eq!(app.current_screen, CurrentScreen::GenreMenu);
        app.previous_genre();
        assert_eq!(app.genre_menu.selected(), Some(2));

        app.choose_genre();
        assert_eq!(app.current_screen, CurrentScreen::Browse);
        assert_eq!(app.view.mode, ViewMode::ByGenre(35));

        app.open_genre_menu();
        assert_eq!(app.genre_menu.selected(), Some(2));
        app.next_genre();
        app.choose_genre();
        assert_eq!(app.view.mode, ViewMode::Default);
    }

    #[test]
    fn test_reset_view_leaves_search() {
        let (mut app, _) = app_with(FakeCatalog::default());
        app.search_input = "heat".to_string();
        app.submit_search();

        app.reset_view();
        assert_eq!(app.view.mode, ViewMode::Default);
        assert!(app.search_input.is_empty());
    }

    #[test]
    fn test_row_cursor_scrolls_with_selection() {
        let mut cursor = RowCursor::default();
        cursor.set_visible(3, 10);
        assert!(!cursor.can_scroll_left());
        assert!(cursor.can_scroll_right(10));

        for _ in 0..4 {
            cursor.select_next(10);
        }
        assert_eq!(cursor.selected, 4);
        assert_eq!(cursor.offset, 2);
        assert!(cursor.can_scroll_left());

        cursor.scroll(true, 10);
        assert_eq!(cursor.offset, 5);
        assert_eq!(cursor.selected, 5);

        cursor.scroll(true, 10);
        assert_eq!(cursor.offset, 7);
        assert!(!cursor.can_scroll_right(10));

        cursor.scroll(false, 10);
        assert_eq!(cursor.offset, 4);
        assert_eq!(cursor.selected, 6);
    }

    #[test]
    fn test_row_cursor_fits_everything() {
        let mut cursor = RowCursor::default();
        cursor.set_visible(6, 2);
        assert!(!cursor.can_scroll_left());
        assert!(!cursor.can_scroll_right(2));

        cursor.select_next(2);
        cursor.select_next(2);
        assert_eq!(cursor.selected, 1);
        assert_eq!(cursor.offset, 0);
    }

    fn poster(n: usize) -> String {
        format!("https://image.tmdb.org/t/p/w500/poster-{}.jpg", n)
    }

    fn decoded() -> Result<DynamicImage, CatalogError> {
        Ok(DynamicImage::new_rgb8(50, 75))
    }

    #[test]
    fn test_image_store_queues_then_serves() {
        let mut images = ImageStore::new(Picker::halfblocks());
        let url = poster(1);

        assert!(images.get_mut(&url).is_none());
        assert!(images.get_mut(&url).is_none());
        assert_eq!(images.take_wanted(), vec![url.clone()]);
        assert!(images.take_wanted().is_empty());

        // Still downloading: no placeholder re-request.
        assert!(images.get_mut(&url).is_none());
        assert!(images.take_wanted().is_empty());

        images.finish(url.clone(), decoded());
        assert!(images.get_mut(&url).is_some());
    }

    #[test]
    fn test_image_store_failed_download_is_not_retried() {
        let mut images = ImageStore::new(Picker::halfblocks());
        let url = poster(2);

        images.get_mut(&url);
        images.take_wanted();
        images.finish(
            url.clone(),
            Err(CatalogError::RequestFailed {
                endpoint: url.clone(),
                status: 404,
            }),
        );

        assert!(images.get_mut(&url).is_none());
        assert!(images.take_wanted().is_empty());
    }

    #[test]
    fn test_image_store_skips_placeholder_and_disabled() {
        let mut images = ImageStore::new(Picker::halfblocks());
        assert!(images.get_mut(crate::app::tmdb::PLACEHOLDER_IMAGE).is_none());
        assert!(images.take_wanted().is_empty());

        let mut disabled = ImageStore::disabled();
        assert!(disabled.get_mut(&poster(3)).is_none());
        assert!(disabled.take_wanted().is_empty());
    }

    #[test]
    fn test_image_store_stays_bounded_across_result_sets() {
        let mut images = ImageStore::new(Picker::halfblocks());

        for round in 0..50 {
            let urls: Vec<String> = (0..20).map(|i| poster(round * 20 + i)).collect();
            for url in &urls {
                images.get_mut(url);
            }
            for url in images.take_wanted() {
                images.finish(url, decoded());
            }
            assert!(images.slots.len() <= IMAGE_CAPACITY);
        }

        // The most recent result set survives eviction.
        for i in 980..1000 {
            assert!(images.get_mut(&poster(i)).is_some());
        }
        assert!(images.get_mut(&poster(0)).is_none());
    }

    #[test]
    fn test_image_store_evicts_least_recently_drawn() {
        let mut images = ImageStore::with_capacity(Some(Picker::halfblocks()), 2);
        for n in [1, 2] {
            images.get_mut(&poster(n));
        }
        for url in images.take_wanted() {
            images.finish(url, decoded());
        }

        // Drawing poster 1 again makes poster 2 the oldest.
        assert!(images.get_mut(&poster(1)).is_some());
        images.get_mut(&poster(3));
        images.take_wanted();

        assert!(images.slots.contains_key(&poster(1)));
        assert!(!images.slots.contains_key(&poster(2)));
        assert!(images.slots.contains_key(&poster(3)));
    }

    #[test]
    fn test_row_navigation_is_clamped() {
        let (mut app, _) = app_with(FakeCatalog::default());
        app.previous_row();
        assert_eq!(app.focused_row, 0);
        for _ in 0..10 {
            app.next_row();
        }
        assert_eq!(app.focused_row, 3);
        assert_eq!(app.focused_section(), Some(Section::Upcoming));
    }
}
