use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::{
    entities::{episode, movie, season, tv_series},
    error::{AppError, AppResult},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

/// A series with its seasons and their episodes, both sorted by number.
#[derive(Clone, Debug)]
pub struct SeriesTree {
    pub series: tv_series::Model,
    pub seasons: Vec<SeasonTree>,
}

#[derive(Clone, Debug)]
pub struct SeasonTree {
    pub season: season::Model,
    pub episodes: Vec<episode::Model>,
}

impl SeriesTree {
    pub fn total_episodes(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }
}

// ---- request payloads ----

#[derive(Debug, Deserialize)]
pub struct MoviePayload {
    pub tmdb_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub language: Option<String>,
    pub video_720p: Option<String>,
    pub video_1080p: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesPayload {
    pub tmdb_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodePayload {
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub video_720p: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewMovie {
    pub tmdb_id: i32,
    pub title: String,
    pub description: String,
    pub poster_url: String,
    pub release_date: String,
    pub language: String,
    pub video_720p: String,
    pub video_1080p: String,
}

#[derive(Clone, Debug)]
pub struct NewSeries {
    pub tmdb_id: i32,
    pub title: String,
    pub description: String,
    pub poster_url: String,
    pub release_date: String,
    pub language: String,
}

#[derive(Clone, Debug)]
pub struct NewEpisode {
    pub season_number: i32,
    pub episode_number: i32,
    pub video_720p: String,
}

fn require<T>(value: Option<T>, name: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::missing_field(name))
}

impl MoviePayload {
    pub fn into_new(self) -> AppResult<NewMovie> {
        Ok(NewMovie {
            tmdb_id: require(self.tmdb_id, "tmdb_id")?,
            title: require(self.title, "title")?,
            video_720p: require(self.video_720p, "video_720p")?,
            video_1080p: require(self.video_1080p, "video_1080p")?,
            description: self.description.unwrap_or_default(),
            poster_url: self.poster_url.unwrap_or_default(),
            release_date: self.release_date.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
        })
    }
}

impl SeriesPayload {
    pub fn into_new(self) -> AppResult<NewSeries> {
        Ok(NewSeries {
            tmdb_id: require(self.tmdb_id, "tmdb_id")?,
            title: require(self.title, "title")?,
            description: self.description.unwrap_or_default(),
            poster_url: self.poster_url.unwrap_or_default(),
            release_date: self.release_date.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
        })
    }
}

impl EpisodePayload {
    pub fn into_new(self) -> AppResult<NewEpisode> {
        Ok(NewEpisode {
            season_number: require(self.season_number, "season_number")?,
            episode_number: require(self.episode_number, "episode_number")?,
            video_720p: require(self.video_720p, "video_720p")?,
        })
    }
}

// ---- rendered shapes ----

pub fn iso_timestamp(unix_seconds: i64) -> Option<String> {
    jiff::Timestamp::from_second(unix_seconds).ok().map(|t| t.to_string())
}

#[derive(Debug, Serialize)]
pub struct VideoLinks {
    #[serde(rename = "720p")]
    pub hd: Option<String>,
    #[serde(rename = "1080p")]
    pub full_hd: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MovieItem {
    pub id: i32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub language: Option<String>,
    pub tmdb_id: i32,
    pub video_links: VideoLinks,
    pub created_at: Option<String>,
}

impl MovieItem {
    pub fn untyped(mut self) -> Self {
        self.kind = None;
        self
    }
}

impl From<movie::Model> for MovieItem {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id,
            kind: Some(MediaKind::Movie),
            title: m.title,
            description: m.description,
            poster_url: m.poster_url,
            release_date: m.release_date,
            language: m.language,
            tmdb_id: m.tmdb_id,
            video_links: VideoLinks { hd: m.video_720p, full_hd: m.video_1080p },
            created_at: iso_timestamp(m.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EpisodeItem {
    pub episode_number: i32,
    pub video_720p: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeasonItem {
    pub season_number: i32,
    pub total_episodes: usize,
    pub episodes: Vec<EpisodeItem>,
}

/// Serializes as `{"season_<n>": SeasonItem, ...}` in season order.
#[derive(Debug)]
pub struct SeasonMap(pub Vec<SeasonItem>);

impl Serialize for SeasonMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for season in &self.0 {
            map.serialize_entry(&format!("season_{}", season.season_number), season)?;
        }
        map.end()
    }
}

#[derive(Debug, Serialize)]
pub struct SeriesItem {
    pub id: i32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub language: Option<String>,
    pub total_seasons: usize,
    pub tmdb_id: i32,
    pub seasons: SeasonMap,
    pub created_at: Option<String>,
}

impl SeriesItem {
    pub fn untyped(mut self) -> Self {
        self.kind = None;
        self
    }
}

impl From<SeriesTree> for SeriesItem {
    fn from(tree: SeriesTree) -> Self {
        let total_seasons = tree.seasons.len();
        let seasons = tree
            .seasons
            .into_iter()
            .map(|s| SeasonItem {
                season_number: s.season.season_number,
                total_episodes: s.episodes.len(),
                episodes: s
                    .episodes
                    .into_iter()
                    .map(|e| EpisodeItem {
                        episode_number: e.episode_number,
                        video_720p: e.video_720p,
                    })
                    .collect(),
            })
            .collect();
        let s = tree.series;

        Self {
            id: s.id,
            kind: Some(MediaKind::Tv),
            title: s.title,
            description: s.description,
            poster_url: s.poster_url,
            release_date: s.release_date,
            language: s.language,
            total_seasons,
            tmdb_id: s.tmdb_id,
            seasons: SeasonMap(seasons),
            created_at: iso_timestamp(s.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MediaItem {
    Movie(MovieItem),
    Series(SeriesItem),
}

impl MediaItem {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaItem::Movie(_) => MediaKind::Movie,
            MediaItem::Series(_) => MediaKind::Tv,
        }
    }
}

/// Flat movie row used by the admin listing.
#[derive(Debug, Serialize)]
pub struct AdminMovie {
    pub id: i32,
    pub tmdb_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub language: Option<String>,
    pub video_720p: Option<String>,
    pub video_1080p: Option<String>,
    pub created_at: Option<String>,
}

impl From<movie::Model> for AdminMovie {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id,
            tmdb_id: m.tmdb_id,
            title: m.title,
            description: m.description,
            poster_url: m.poster_url,
            release_date: m.release_date,
            language: m.language,
            video_720p: m.video_720p,
            video_1080p: m.video_1080p,
            created_at: iso_timestamp(m.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeasonSummary {
    pub season_number: i32,
    pub episodes_count: usize,
}

/// Series row with season and episode counts, used by the admin listing.
#[derive(Debug, Serialize)]
pub struct AdminSeries {
    pub id: i32,
    pub tmdb_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub language: Option<String>,
    pub total_seasons: usize,
    pub total_episodes: usize,
    pub seasons: Vec<SeasonSummary>,
    pub created_at: Option<String>,
}

impl From<SeriesTree> for AdminSeries {
    fn from(tree: SeriesTree) -> Self {
        let total_episodes = tree.total_episodes();
        let seasons: Vec<SeasonSummary> = tree
            .seasons
            .iter()
            .map(|s| SeasonSummary {
                season_number: s.season.season_number,
                episodes_count: s.episodes.len(),
            })
            .collect();
        let s = tree.series;

        Self {
            id: s.id,
            tmdb_id: s.tmdb_id,
            title: s.title,
            description: s.description,
            poster_url: s.poster_url,
            release_date: s.release_date,
            language: s.language,
            total_seasons: seasons.len(),
            total_episodes,
            seasons,
            created_at: iso_timestamp(s.created_at),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total_movies: u64,
    pub total_tv_series: u64,
    pub total_seasons: u64,
    pub total_episodes: u64,
    pub unique_movies: u64,
    pub unique_tv_series: u64,
    pub duplicate_movies: u64,
    pub duplicate_tv_series: u64,
}
