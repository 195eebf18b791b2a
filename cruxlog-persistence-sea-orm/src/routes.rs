use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use cruxlog_domain::{
    ServiceError, ServiceResult,
    gym::GymId,
    route::{Route, RouteId, RouteRepository},
};

use crate::entity::route;

pub struct SqliteRouteRepository {
    db: DatabaseConnection,
}

impl SqliteRouteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_route(model: route::Model) -> Route {
        Route {
            gym_id: model.gym_id,
            color: model.color,
            grade: model.grade,
            avg_stars: model.avg_stars,
            stars_count: model.stars_count.max(0) as u32,
            active: model.active,
        }
    }
}

#[async_trait::async_trait]
impl RouteRepository for SqliteRouteRepository {
    async fn get_route(&self, id: RouteId) -> ServiceResult<Option<Route>> {
        let model = route::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(model.map(Self::model_to_route))
    }

    async fn get_routes_for_gym(&self, gym_id: GymId) -> ServiceResult<Vec<(RouteId, Route)>> {
        let models = route::Entity::find()
            .filter(route::Column::GymId.eq(gym_id))
            .filter(route::Column::Active.eq(true))
            .order_by_asc(route::Column::DifficultyRank)
            .order_by_asc(route::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|m| (m.id, Self::model_to_route(m)))
            .collect())
    }

    async fn create_route(&self, new_route: &Route) -> ServiceResult<RouteId> {
        let model = route::ActiveModel {
            id: Default::default(),
            gym_id: Set(new_route.gym_id),
            color: Set(new_route.color.clone()),
            grade: Set(new_route.grade.clone()),
            difficulty_rank: Set(new_route.difficulty_rank() as i32),
            avg_stars: Set(new_route.avg_stars),
            stars_count: Set(new_route.stars_count as i32),
            active: Set(new_route.active),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(inserted.id)
    }
}
