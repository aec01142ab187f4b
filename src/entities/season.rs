use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "season")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tv_series_id: i32,
    pub season_number: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tv_series::Entity",
        from = "Column::TvSeriesId",
        to = "super::tv_series::Column::Id",
        on_delete = "Cascade"
    )]
    TvSeries,
    #[sea_orm(has_many = "super::episode::Entity")]
    Episode,
}

impl Related<super::tv_series::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TvSeries.def()
    }
}

impl Related<super::episode::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
