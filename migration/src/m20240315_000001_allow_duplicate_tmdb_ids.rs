use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_movie_tmdb_id").table(Movie::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop().name("idx_tv_series_tmdb_id").table(TvSeries::Table).to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_tmdb_id_lookup")
                    .table(Movie::Table)
                    .col(Movie::TmdbId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tv_series_tmdb_id_lookup")
                    .table(TvSeries::Table)
                    .col(TvSeries::TmdbId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    // Fails if duplicates were stored in the meantime.
    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_tv_series_tmdb_id_lookup")
                    .table(TvSeries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop().name("idx_movie_tmdb_id_lookup").table(Movie::Table).to_owned(),
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
            .create_index(
                Index::create()
                    .name("idx_tv_series_tmdb_id")
                    .table(TvSeries::Table)
                    .col(TvSeries::TmdbId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    TmdbId,
}

#[derive(DeriveIden)]
enum TvSeries {
    Table,
    TmdbId,
}
