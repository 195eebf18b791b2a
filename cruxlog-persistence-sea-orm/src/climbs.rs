use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use cruxlog_domain::{
    ServiceError, ServiceResult,
    climb::{Climb, ClimbId, ClimbRecord, ClimbRepository},
    route::Route,
    user::UserId,
};

use crate::{entity::climb, entity::route, map_option_to_string, map_string_to_option};

pub struct SqliteClimbRepository {
    db: DatabaseConnection,
}

impl SqliteClimbRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_climb(model: &climb::Model) -> Climb {
        Climb {
            user_id: model.user_id,
            route_id: model.route_id,
            stars: model.stars.clamp(1, 5) as u8,
            sent: model.sent,
            tries: model.tries.max(1) as u32,
            notes: map_string_to_option(model.notes.clone()),
            points: model.points.max(0) as u32,
            created_at: DateTime::from_timestamp(model.created_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

#[async_trait::async_trait]
impl ClimbRepository for SqliteClimbRepository {
    async fn record_climb(&self, new_climb: &Climb) -> ServiceResult<ClimbId> {
        // The climb row and the route's running star mean must land
        // together; a crash between the two writes would leave the route
        // aggregate counting a climb that was never persisted.
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let inserted = climb::ActiveModel {
            id: Default::default(),
            user_id: Set(new_climb.user_id),
            route_id: Set(new_climb.route_id),
            stars: Set(new_climb.stars as i32),
            sent: Set(new_climb.sent),
            tries: Set(new_climb.tries as i32),
            notes: Set(map_option_to_string(&new_climb.notes)),
            points: Set(new_climb.points as i64),
            created_at: Set(new_climb.created_at.timestamp()),
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let route_model = route::Entity::find_by_id(new_climb.route_id)
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound("Route not found".to_string()))?;

        let (avg_stars, stars_count) = Route::next_stars(
            route_model.avg_stars,
            route_model.stars_count.max(0) as u32,
            new_climb.stars,
        );
        let mut route_model: route::ActiveModel = route_model.into();
        route_model.avg_stars = Set(avg_stars);
        route_model.stars_count = Set(stars_count as i32);
        route_model
            .update(&txn)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(inserted.id)
    }

    async fn get_climbs_for_user(&self, user_id: UserId) -> ServiceResult<Vec<ClimbRecord>> {
        let rows = climb::Entity::find()
            .filter(climb::Column::UserId.eq(user_id))
            .find_also_related(route::Entity)
            .order_by_asc(climb::Column::CreatedAt)
            .order_by_asc(climb::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(climb_model, route_model)| {
                let (color, grade) = route_model
                    .map(|r| (r.color, r.grade))
                    .unwrap_or_default();
                ClimbRecord {
                    id: climb_model.id,
                    climb: Self::model_to_climb(&climb_model),
                    color,
                    grade,
                }
            })
            .collect())
    }
}
