use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use cruxlog_domain::{
    ServiceError, ServiceResult,
    gym::{Gym, GymId, GymRepository},
};

use crate::{entity::gym, map_option_to_string, map_string_to_option};

pub struct SqliteGymRepository {
    db: DatabaseConnection,
}

impl SqliteGymRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_gym(model: gym::Model) -> Gym {
        Gym {
            name: model.name,
            location: map_string_to_option(model.location),
        }
    }
}

#[async_trait::async_trait]
impl GymRepository for SqliteGymRepository {
    async fn get_gym(&self, id: GymId) -> ServiceResult<Option<Gym>> {
        let model = gym::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(model.map(Self::model_to_gym))
    }

    async fn get_gyms(&self) -> ServiceResult<Vec<(GymId, Gym)>> {
        let models = gym::Entity::find()
            .order_by_asc(gym::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|m| (m.id, Self::model_to_gym(m)))
            .collect())
    }

    async fn create_gym(&self, new_gym: &Gym) -> ServiceResult<GymId> {
        let model = gym::ActiveModel {
            id: Default::default(),
            name: Set(new_gym.name.clone()),
            location: Set(map_option_to_string(&new_gym.location)),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(inserted.id)
    }
}
