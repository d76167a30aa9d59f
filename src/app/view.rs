use crate::app::tmdb::{Genre, GenreId, Movie};

/// Which content drives the main area. Filtering by genre and searching are
/// mutually exclusive, so they share one enum.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Default,
    ByGenre(GenreId),
    Searching(String),
}

impl ViewMode {
    pub fn is_searching(&self) -> bool {
        matches!(self, ViewMode::Searching(_))
    }

    pub fn selected_genre(&self) -> Option<GenreId> {
        match self {
            ViewMode::ByGenre(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    Genre,
    Search,
}

impl Section {
    pub const DEFAULT_ROWS: [Section; 4] = [
        Section::Popular,
        Section::TopRated,
        Section::NowPlaying,
        Section::Upcoming,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Loading {
    pub banner: bool,
    pub popular: bool,
    pub top_rated: bool,
    pub now_playing: bool,
    pub upcoming: bool,
    pub genre: bool,
    pub search: bool,
}

impl Loading {
    /// Flags at session start: every default section is pending.
    pub fn startup() -> Self {
        Self {
            banner: true,
            popular: true,
            top_rated: true,
            now_playing: true,
            upcoming: true,
            genre: false,
            search: false,
        }
    }

    pub fn get(&self, section: Section) -> bool {
        match section {
            Section::Popular => self.popular,
            Section::TopRated => self.top_rated,
            Section::NowPlaying => self.now_playing,
            Section::Upcoming => self.upcoming,
            Section::Genre => self.genre,
            Section::Search => self.search,
        }
    }

    pub fn any(&self) -> bool {
        *self != Self::default()
    }
}

pub type Generation = u64;

/// Everything the UI renders from. Only mutated on the UI thread.
#[derive(Debug)]
pub struct ViewState {
    pub mode: ViewMode,
    pub loading: Loading,
    pub genres: Vec<Genre>,
    pub banner: Option<Movie>,
    popular: Vec<Movie>,
    top_rated: Vec<Movie>,
    now_playing: Vec<Movie>,
    upcoming: Vec<Movie>,
    genre_results: Vec<Movie>,
    search_results: Vec<Movie>,
    genre_generation: Generation,
    search_generation: Generation,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            mode: ViewMode::Default,
            loading: Loading::startup(),
            genres: Vec::new(),
            banner: None,
            popular: Vec::new(),
            top_rated: Vec::new(),
            now_playing: Vec::new(),
            upcoming: Vec::new(),
            genre_results: Vec::new(),
            search_results: Vec::new(),
            genre_generation: 0,
            search_generation: 0,
        }
    }

    pub fn results(&self, section: Section) -> &[Movie] {
        match section {
            Section::Popular => &self.popular,
            Section::TopRated => &self.top_rated,
            Section::NowPlaying => &self.now_playing,
            Section::Upcoming => &self.upcoming,
            Section::Genre => &self.genre_results,
            Section::Search => &self.search_results,
        }
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        match self.mode {
            ViewMode::Default => Section::DEFAULT_ROWS.to_vec(),
            ViewMode::ByGenre(_) => vec![Section::Genre],
            ViewMode::Searching(_) => vec![Section::Search],
        }
    }

    pub fn shows_banner(&self) -> bool {
        self.mode == ViewMode::Default
    }

    /// Display name of the selected genre, `None` outside genre mode.
    pub fn selected_genre_name(&self) -> Option<&str> {
        let id = self.mode.selected_genre()?;
        Some(
            self.genres
                .iter()
                .find(|genre| genre.id == id)
                .map_or("Genre", |genre| genre.name.as_str()),
        )
    }

    /// The only way to change the mode. Leaving a mode invalidates its
    /// in-flight request and clears its loading flag.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if !matches!(mode, ViewMode::ByGenre(_)) {
            self.genre_generation += 1;
            self.loading.genre = false;
        }
        if !matches!(mode, ViewMode::Searching(_)) {
            self.search_generation += 1;
            self.loading.search = false;
        }
        self.mode = mode;
    }

    pub fn apply_genres(&mut self, genres: Vec<Genre>) {
        self.genres = genres;
    }

    /// Stores one of the startup lists and clears its loading flag. The first
    /// popular item becomes the banner.
    pub fn apply_startup_list(&mut self, section: Section, movies: Vec<Movie>) {
        match section {
            Section::Popular => {
                if let Some(first) = movies.first() {
                    self.banner = Some(first.clone());
                }
                self.popular = movies;
                self.loading.popular = false;
                self.loading.banner = false;
            }
            Section::TopRated => {
                self.top_rated = movies;
                self.loading.top_rated = false;
            }
            Section::NowPlaying => {
                self.now_playing = movies;
                self.loading.now_playing = false;
            }
            Section::Upcoming => {
                self.upcoming = movies;
                self.loading.upcoming = false;
            }
            Section::Genre | Section::Search => {
                tracing::warn!(?section, "ignoring startup results for a query section");
            }
        }
    }

    /// Forces every loading flag off; loaded lists stay as they are.
    pub fn fail_startup(&mut self) {
        self.loading = Loading::default();
    }

    /// Returns the generation to tag the genre fetch with, or `None` when
    /// returning to the default view (no fetch needed).
    pub fn begin_genre(&mut self, genre: Option<GenreId>) -> Option<Generation> {
        self.search_results.clear();

        match genre {
            None => {
                self.set_mode(ViewMode::Default);
                self.genre_results.clear();
                None
            }
            Some(id) => {
                self.set_mode(ViewMode::ByGenre(id));
                self.genre_generation += 1;
                self.loading.genre = true;
                Some(self.genre_generation)
            }
        }
    }

    /// Applies genre results if `generation` is still current. Returns
    /// whether they were applied.
    pub fn finish_genre(&mut self, generation: Generation, movies: Vec<Movie>) -> bool {
        if generation != self.genre_generation {
            return false;
        }
        self.genre_results = movies;
        self.loading.genre = false;
        true
    }

    /// Returns the generation to tag the search with, or `None` when the
    /// trimmed query is empty, which cancels searching instead.
    pub fn begin_search(&mut self, query: &str) -> Option<Generation> {
        let query = query.trim();

        if query.is_empty() {
            if self.mode.is_searching() {
                self.set_mode(ViewMode::Default);
            }
            self.search_results.clear();
            return None;
        }

        self.set_mode(ViewMode::Searching(query.to_string()));
        self.search_generation += 1;
        self.loading.search = true;
        Some(self.search_generation)
    }

    pub fn finish_search(&mut self, generation: Generation, movies: Vec<Movie>) -> bool {
        if generation != self.search_generation {
            return false;
        }
        self.search_results = movies;
        self.loading.search = false;
        true
    }
}
