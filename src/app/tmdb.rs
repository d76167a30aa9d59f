use std::time::Duration;

use chrono::NaiveDate;
use image::DynamicImage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-movie.jpg";
pub const POSTER_SIZE: &str = "w500";
pub const BACKDROP_SIZE: &str = "w1280";

pub type GenreId = u32;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
}

impl Movie {
    /// Parses `release_date` (`YYYY-MM-DD`), if present and well formed.
    pub fn released_on(&self) -> Option<NaiveDate> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// One page of a list endpoint. Only `results` is required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("request to {endpoint} failed with status {status}")]
    RequestFailed { endpoint: String, status: u16 },
    #[error("failed to decode catalog response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Catalog operations the view coordinator depends on.
///
/// `page` defaults to 1 when `None`.
pub trait CatalogApi: Send + Sync {
    fn popular(&self, page: Option<u32>) -> Result<MoviePage, CatalogError>;
    fn top_rated(&self, page: Option<u32>) -> Result<MoviePage, CatalogError>;
    fn now_playing(&self, page: Option<u32>) -> Result<MoviePage, CatalogError>;
    fn upcoming(&self, page: Option<u32>) -> Result<MoviePage, CatalogError>;
    fn by_genre(&self, genre: GenreId, page: Option<u32>) -> Result<MoviePage, CatalogError>;
    fn search(&self, query: &str, page: Option<u32>) -> Result<MoviePage, CatalogError>;
    fn genres(&self) -> Result<Vec<Genre>, CatalogError>;
    /// Downloads and decodes a poster or backdrop.
    fn fetch_image(&self, url: &str) -> Result<DynamicImage, CatalogError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    ByGenre(GenreId),
    Search(&'a str),
    Genres,
}

impl Endpoint<'_> {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Popular => "/movie/popular",
            Endpoint::TopRated => "/movie/top_rated",
            Endpoint::NowPlaying => "/movie/now_playing",
            Endpoint::Upcoming => "/movie/upcoming",
            Endpoint::ByGenre(_) => "/discover/movie",
            Endpoint::Search(_) => "/search/movie",
            Endpoint::Genres => "/genre/movie/list",
        }
    }

    fn query(&self, page: u32) -> String {
        match self {
            Endpoint::ByGenre(genre) => {
                format!("with_genres={}&page={}&sort_by=popularity.desc", genre, page)
            }
            Endpoint::Search(query) => {
                format!("query={}&page={}", urlencoding::encode(query), page)
            }
            Endpoint::Genres => String::new(),
            _ => format!("page={}", page),
        }
    }
}

/// Builds displayable poster/backdrop URLs. Pure, never touches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHost {
    base: String,
}

impl ImageHost {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn image_url(&self, path: Option<&str>, size: &str) -> String {
        match path {
            Some(path) if !path.is_empty() => format!("{}/{}{}", self.base, size, path),
            _ => PLACEHOLDER_IMAGE.to_string(),
        }
    }

    pub fn poster_url(&self, path: Option<&str>) -> String {
        self.image_url(path, POSTER_SIZE)
    }

    pub fn backdrop_url(&self, path: Option<&str>) -> String {
        self.image_url(path, BACKDROP_SIZE)
    }
}

impl Default for ImageHost {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE)
    }
}

/// Blocking TMDB client. Cheap to clone; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::blocking::Client,
    api_key: String,
    api_base: String,
}

impl TmdbClient {
    /// `timeout` of `None` means requests wait indefinitely.
    pub fn new(
        api_key: &str,
        api_base: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, CatalogError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogError::Network)?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Full request URL, credential included.
    pub fn url(&self, endpoint: Endpoint<'_>, page: u32) -> String {
        let query = endpoint.query(page);
        let separator = if query.is_empty() { "" } else { "&" };
        format!(
            "{}{}?{}{}api_key={}",
            self.api_base,
            endpoint.path(),
            query,
            separator,
            urlencoding::encode(&self.api_key)
        )
    }

    fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint<'_>,
        page: Option<u32>,
    ) -> Result<T, CatalogError> {
        let page = page.unwrap_or(1);
        tracing::debug!(endpoint = endpoint.path(), page, "requesting catalog");

        let response = self
            .http
            .get(self.url(endpoint, page))
            .send()
            .map_err(CatalogError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::RequestFailed {
                endpoint: endpoint.path().to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().map_err(CatalogError::Decode)
    }
}

impl CatalogApi for TmdbClient {
    fn popular(&self, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        self.get(Endpoint::Popular, page)
    }

    fn top_rated(&self, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        self.get(Endpoint::TopRated, page)
    }

    fn now_playing(&self, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        self.get(Endpoint::NowPlaying, page)
    }

    fn upcoming(&self, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        self.get(Endpoint::Upcoming, page)
    }

    fn by_genre(&self, genre: GenreId, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        self.get(Endpoint::ByGenre(genre), page)
    }

    fn search(&self, query: &str, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        self.get(Endpoint::Search(query), page)
    }

    fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let list: GenreList = self.get(Endpoint::Genres, None)?;
        Ok(list.genres)
    }

    fn fetch_image(&self, url: &str) -> Result<DynamicImage, CatalogError> {
        let response = self.http.get(url).send().map_err(CatalogError::Network)?;

        if !response.status().is_success() {
            return Err(CatalogError::RequestFailed {
                endpoint: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().map_err(CatalogError::Network)?;
        Ok(image::load_from_memory(&bytes)?)
    }
}
