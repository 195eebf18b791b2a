use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "routes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub gym_id: i64,
    pub color: String,
    pub grade: String,
    /// Stored alongside the grade label so listings can order on an index.
    pub difficulty_rank: i32,
    pub avg_stars: f64,
    pub stars_count: i32,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
