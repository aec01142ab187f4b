use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(integer(Movie::TmdbId))
                    .col(string_len(Movie::Title, 200))
                    .col(text_null(Movie::Description))
                    .col(string_len_null(Movie::PosterUrl, 500))
                    .col(string_len_null(Movie::ReleaseDate, 20))
                    .col(string_len_null(Movie::Language, 50))
                    .col(string_len_null(Movie::Video720p, 500))
                    .col(string_len_null(Movie::Video1080p, 500))
                    .col(big_integer(Movie::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_tmdb_id")
                    .table(Movie::Table)
                    .col(Movie::TmdbId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TvSeries::Table)
                    .if_not_exists()
                    .col(pk_auto(TvSeries::Id))
                    .col(integer(TvSeries::TmdbId))
                    .col(string_len(TvSeries::Title, 200))
                    .col(text_null(TvSeries::Description))
                    .col(string_len_null(TvSeries::PosterUrl, 500))
                    .col(string_len_null(TvSeries::ReleaseDate, 20))
                    .col(string_len_null(TvSeries::Language, 50))
                    .col(big_integer(TvSeries::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tv_series_tmdb_id")
                    .table(TvSeries::Table)
                    .col(TvSeries::TmdbId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Season::Table)
                    .if_not_exists()
                    .col(pk_auto(Season::Id))
                    .col(integer(Season::TvSeriesId))
                    .col(integer(Season::SeasonNumber))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_season_tv_series")
                            .from(Season::Table, Season::TvSeriesId)
                            .to(TvSeries::Table, TvSeries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_season_series_number_unique")
                    .table(Season::Table)
                    .col(Season::TvSeriesId)
                    .col(Season::SeasonNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Episode::Table)
                    .if_not_exists()
                    .col(pk_auto(Episode::Id))
                    .col(integer(Episode::SeasonId))
                    .col(integer(Episode::EpisodeNumber))
                    .col(string_len_null(Episode::Video720p, 500))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_episode_season")
                            .from(Episode::Table, Episode::SeasonId)
                            .to(Season::Table, Season::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_episode_season_number_unique")
                    .table(Episode::Table)
                    .col(Episode::SeasonId)
                    .col(Episode::EpisodeNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Episode::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Season::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(TvSeries::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    TmdbId,
    Title,
    Description,
    PosterUrl,
    ReleaseDate,
    Language,
    #[sea_orm(iden = "video_720p")]
    Video720p,
    #[sea_orm(iden = "video_1080p")]
    Video1080p,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TvSeries {
    Table,
    Id,
    TmdbId,
    Title,
    Description,
    PosterUrl,
    ReleaseDate,
    Language,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Season {
    Table,
    Id,
    TvSeriesId,
    SeasonNumber,
}

#[derive(DeriveIden)]
enum Episode {
    Table,
    Id,
    SeasonId,
    EpisodeNumber,
    #[sea_orm(iden = "video_720p")]
    Video720p,
}
