use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use crate::{
    entities::{episode, movie, season, tv_series},
    error::AppResult,
    models::{
        CatalogStats, MoviePayload, NewEpisode, NewMovie, NewSeries, SeasonTree, SeriesPayload,
        SeriesTree,
    },
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Listing {
    ById,
    NewestFirst,
}

#[derive(Debug)]
pub enum EpisodeOutcome {
    Added(episode::Model),
    SeriesNotFound,
    AlreadyExists,
}

#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn ping(&self) -> Result<(), sea_orm::DbErr> {
        self.db.ping().await
    }

    // ---- movies ----

    pub async fn movies(&self, listing: Listing) -> AppResult<Vec<movie::Model>> {
        let query = match listing {
            Listing::ById => movie::Entity::find().order_by_asc(movie::Column::Id),
            Listing::NewestFirst => movie::Entity::find()
                .order_by_desc(movie::Column::CreatedAt)
                .order_by_desc(movie::Column::Id),
        };
        Ok(query.all(&self.db).await?)
    }

    pub async fn movie(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn movies_by_tmdb(&self, tmdb_id: i32) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .filter(movie::Column::TmdbId.eq(tmdb_id))
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn count_movie_copies(&self, tmdb_id: i32) -> AppResult<u64> {
        Ok(movie::Entity::find().filter(movie::Column::TmdbId.eq(tmdb_id)).count(&self.db).await?)
    }

    pub async fn insert_movie(&self, new: NewMovie) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            id: Default::default(),
            tmdb_id: Set(new.tmdb_id),
            title: Set(new.title),
            description: Set(Some(new.description)),
            poster_url: Set(Some(new.poster_url)),
            release_date: Set(Some(new.release_date)),
            language: Set(Some(new.language)),
            video_720p: Set(Some(new.video_720p)),
            video_1080p: Set(Some(new.video_1080p)),
            created_at: Set(now_sec()),
        };
        let inserted = model.insert(&self.db).await?;
        debug!(id = inserted.id, tmdb_id = inserted.tmdb_id, "inserted movie");
        Ok(inserted)
    }

    /// Applies the fields present in `patch`. `tmdb_id` is never changed.
    pub async fn update_movie(
        &self,
        id: i32,
        patch: MoviePayload,
    ) -> AppResult<Option<movie::Model>> {
        let Some(existing) = movie::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut am = existing.clone().into_active_model();
        if let Some(title) = patch.title {
            am.title = Set(title);
        }
        set_some(&mut am.description, patch.description);
        set_some(&mut am.poster_url, patch.poster_url);
        set_some(&mut am.release_date, patch.release_date);
        set_some(&mut am.language, patch.language);
        set_some(&mut am.video_720p, patch.video_720p);
        set_some(&mut am.video_1080p, patch.video_1080p);

        if !am.is_changed() {
            return Ok(Some(existing));
        }
        Ok(Some(am.update(&self.db).await?))
    }

    /// Returns the removed row's TMDB id.
    pub async fn delete_movie(&self, id: i32) -> AppResult<Option<i32>> {
        let Some(existing) = movie::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let tmdb_id = existing.tmdb_id;
        existing.delete(&self.db).await?;
        Ok(Some(tmdb_id))
    }

    // ---- series ----

    pub async fn series(&self, listing: Listing) -> AppResult<Vec<SeriesTree>> {
        let query = match listing {
            Listing::ById => tv_series::Entity::find().order_by_asc(tv_series::Column::Id),
            Listing::NewestFirst => tv_series::Entity::find()
                .order_by_desc(tv_series::Column::CreatedAt)
                .order_by_desc(tv_series::Column::Id),
        };
        let rows = query.all(&self.db).await?;
        self.load_trees(rows).await
    }

    pub async fn series_tree(&self, id: i32) -> AppResult<Option<SeriesTree>> {
        let Some(row) = tv_series::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(self.load_trees(vec![row]).await?.pop())
    }

    pub async fn series_by_tmdb(&self, tmdb_id: i32) -> AppResult<Vec<SeriesTree>> {
        let rows = tv_series::Entity::find()
            .filter(tv_series::Column::TmdbId.eq(tmdb_id))
            .order_by_asc(tv_series::Column::Id)
            .all(&self.db)
            .await?;
        self.load_trees(rows).await
    }

    pub async fn count_series_copies(&self, tmdb_id: i32) -> AppResult<u64> {
        Ok(tv_series::Entity::find()
            .filter(tv_series::Column::TmdbId.eq(tmdb_id))
            .count(&self.db)
            .await?)
    }

    pub async fn insert_series(&self, new: NewSeries) -> AppResult<tv_series::Model> {
        let model = tv_series::ActiveModel {
            id: Default::default(),
            tmdb_id: Set(new.tmdb_id),
            title: Set(new.title),
            description: Set(Some(new.description)),
            poster_url: Set(Some(new.poster_url)),
            release_date: Set(Some(new.release_date)),
            language: Set(Some(new.language)),
            created_at: Set(now_sec()),
        };
        let inserted = model.insert(&self.db).await?;
        debug!(id = inserted.id, tmdb_id = inserted.tmdb_id, "inserted tv series");
        Ok(inserted)
    }

    pub async fn update_series(
        &self,
        id: i32,
        patch: SeriesPayload,
    ) -> AppResult<Option<tv_series::Model>> {
        let Some(existing) = tv_series::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut am = existing.clone().into_active_model();
        if let Some(title) = patch.title {
            am.title = Set(title);
        }
        set_some(&mut am.description, patch.description);
        set_some(&mut am.poster_url, patch.poster_url);
        set_some(&mut am.release_date, patch.release_date);
        set_some(&mut am.language, patch.language);

        if !am.is_changed() {
            return Ok(Some(existing));
        }
        Ok(Some(am.update(&self.db).await?))
    }

    /// Removes the series together with its seasons and episodes.
    pub async fn delete_series(&self, id: i32) -> AppResult<Option<i32>> {
        let txn = self.db.begin().await?;

        let Some(existing) = tv_series::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };
        let tmdb_id = existing.tmdb_id;

        let season_ids: Vec<i32> = existing
            .find_related(season::Entity)
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        if !season_ids.is_empty() {
            episode::Entity::delete_many()
                .filter(episode::Column::SeasonId.is_in(season_ids.clone()))
                .exec(&txn)
                .await?;
            season::Entity::delete_many()
                .filter(season::Column::Id.is_in(season_ids))
                .exec(&txn)
                .await?;
        }

        existing.delete(&txn).await?;
        txn.commit().await?;

        Ok(Some(tmdb_id))
    }

    /// Adds an episode, creating its season on first use.
    pub async fn add_episode(&self, series_id: i32, new: NewEpisode) -> AppResult<EpisodeOutcome> {
        let txn = self.db.begin().await?;

        if tv_series::Entity::find_by_id(series_id).one(&txn).await?.is_none() {
            return Ok(EpisodeOutcome::SeriesNotFound);
        }

        let existing_season = season::Entity::find()
            .filter(season::Column::TvSeriesId.eq(series_id))
            .filter(season::Column::SeasonNumber.eq(new.season_number))
            .one(&txn)
            .await?;

        let season = match existing_season {
            Some(season) => season,
            None => {
                debug!(series_id, season_number = new.season_number, "creating season");
                season::ActiveModel {
                    id: Default::default(),
                    tv_series_id: Set(series_id),
                    season_number: Set(new.season_number),
                }
                .insert(&txn)
                .await?
            },
        };

        let duplicate = episode::Entity::find()
            .filter(episode::Column::SeasonId.eq(season.id))
            .filter(episode::Column::EpisodeNumber.eq(new.episode_number))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Ok(EpisodeOutcome::AlreadyExists);
        }

        let episode = episode::ActiveModel {
            id: Default::default(),
            season_id: Set(season.id),
            episode_number: Set(new.episode_number),
            video_720p: Set(Some(new.video_720p)),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(EpisodeOutcome::Added(episode))
    }

    /// Removes one episode. A season left without episodes is removed too.
    pub async fn remove_episode(
        &self,
        series_id: i32,
        season_number: i32,
        episode_number: i32,
    ) -> AppResult<bool> {
        let txn = self.db.begin().await?;

        let Some(season) = season::Entity::find()
            .filter(season::Column::TvSeriesId.eq(series_id))
            .filter(season::Column::SeasonNumber.eq(season_number))
            .one(&txn)
            .await?
        else {
            return Ok(false);
        };

        let removed = episode::Entity::delete_many()
            .filter(episode::Column::SeasonId.eq(season.id))
            .filter(episode::Column::EpisodeNumber.eq(episode_number))
            .exec(&txn)
            .await?
            .rows_affected;
        if removed == 0 {
            return Ok(false);
        }

        let left = episode::Entity::find()
            .filter(episode::Column::SeasonId.eq(season.id))
            .count(&txn)
            .await?;
        if left == 0 {
            season.delete(&txn).await?;
        }

        txn.commit().await?;
        Ok(true)
    }

    // ---- queries ----

    pub async fn search(&self, query: &str) -> AppResult<(Vec<movie::Model>, Vec<SeriesTree>)> {
        let movies = movie::Entity::find()
            .filter(
                Condition::any()
                    .add(movie::Column::Title.contains(query))
                    .add(movie::Column::Description.contains(query))
                    .add(movie::Column::Language.contains(query)),
            )
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;

        let series = tv_series::Entity::find()
            .filter(
                Condition::any()
                    .add(tv_series::Column::Title.contains(query))
                    .add(tv_series::Column::Description.contains(query))
                    .add(tv_series::Column::Language.contains(query)),
            )
            .order_by_asc(tv_series::Column::Id)
            .all(&self.db)
            .await?;

        Ok((movies, self.load_trees(series).await?))
    }

    pub async fn stats(&self) -> AppResult<CatalogStats> {
        let total_movies = movie::Entity::find().count(&self.db).await?;
        let total_tv_series = tv_series::Entity::find().count(&self.db).await?;
        let total_seasons = season::Entity::find().count(&self.db).await?;
        let total_episodes = episode::Entity::find().count(&self.db).await?;

        let unique_movies = movie::Entity::find()
            .select_only()
            .column(movie::Column::TmdbId)
            .distinct()
            .count(&self.db)
            .await?;
        let unique_tv_series = tv_series::Entity::find()
            .select_only()
            .column(tv_series::Column::TmdbId)
            .distinct()
            .count(&self.db)
            .await?;

        Ok(CatalogStats {
            total_movies,
            total_tv_series,
            total_seasons,
            total_episodes,
            unique_movies,
            unique_tv_series,
            duplicate_movies: total_movies.saturating_sub(unique_movies),
            duplicate_tv_series: total_tv_series.saturating_sub(unique_tv_series),
        })
    }

    async fn load_trees(&self, rows: Vec<tv_series::Model>) -> AppResult<Vec<SeriesTree>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let series_ids: Vec<i32> = rows.iter().map(|s| s.id).collect();
        let seasons = season::Entity::find()
            .filter(season::Column::TvSeriesId.is_in(series_ids))
            .order_by_asc(season::Column::SeasonNumber)
            .all(&self.db)
            .await?;

        let season_ids: Vec<i32> = seasons.iter().map(|s| s.id).collect();
        let episodes = if season_ids.is_empty() {
            Vec::new()
        } else {
            episode::Entity::find()
                .filter(episode::Column::SeasonId.is_in(season_ids))
                .order_by_asc(episode::Column::EpisodeNumber)
                .all(&self.db)
                .await?
        };

        let mut episodes_by_season: HashMap<i32, Vec<episode::Model>> = HashMap::new();
        for ep in episodes {
            episodes_by_season.entry(ep.season_id).or_default().push(ep);
        }

        let mut seasons_by_series: HashMap<i32, Vec<SeasonTree>> = HashMap::new();
        for season in seasons {
            let episodes = episodes_by_season.remove(&season.id).unwrap_or_default();
            seasons_by_series
                .entry(season.tv_series_id)
                .or_default()
                .push(SeasonTree { season, episodes });
        }

        Ok(rows
            .into_iter()
            .map(|series| {
                let seasons = seasons_by_series.remove(&series.id).unwrap_or_default();
                SeriesTree { series, seasons }
            })
            .collect())
    }
}

fn set_some(field: &mut sea_orm::ActiveValue<Option<String>>, value: Option<String>) {
    if let Some(value) = value {
        *field = Set(Some(value));
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
