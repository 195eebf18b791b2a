use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use cruxlog_domain::{
    ServiceError, ServiceResult,
    user::{ProfileUpdate, User, UserId, UserRepository, Username},
};

use crate::{entity::user, map_option_to_string, map_string_to_option};

pub struct SqliteUserRepository {
    db: DatabaseConnection,
}

impl SqliteUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: user::Model) -> User {
        User {
            username: model.username,
            email: model.email,
            password_hash: model.password,
            name: map_string_to_option(model.name),
            gym_id: model.gym_id,
            member_since: DateTime::from_timestamp(model.member_since, 0)
                .unwrap_or_else(Utc::now),
        }
    }
}

#[async_trait::async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get_user_by_id(&self, id: UserId) -> ServiceResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(model.map(Self::model_to_user))
    }

    async fn get_user_by_name(&self, name: &str) -> ServiceResult<Option<(UserId, User)>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(model.map(|m| (m.id, Self::model_to_user(m))))
    }

    async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<(UserId, User)>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(model.map(|m| (m.id, Self::model_to_user(m))))
    }

    async fn create_user(&self, new_user: &User) -> ServiceResult<UserId> {
        let model = user::ActiveModel {
            id: Default::default(),
            username: Set(new_user.username.clone()),
            email: Set(new_user.email.clone()),
            password: Set(new_user.password_hash.clone()),
            name: Set(map_option_to_string(&new_user.name)),
            gym_id: Set(new_user.gym_id),
            member_since: Set(new_user.member_since.timestamp()),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(inserted.id)
    }

    async fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> ServiceResult<()> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let mut model: user::ActiveModel = model.into();
        if let Some(username) = &update.username {
            model.username = Set(username.clone());
        }
        if let Some(name) = &update.name {
            model.name = Set(name.clone());
        }
        if let Some(gym_id) = update.gym_id {
            model.gym_id = Set(Some(gym_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn get_usernames(&self) -> ServiceResult<Vec<Username>> {
        let names = user::Entity::find()
            .select_only()
            .column(user::Column::Username)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(names)
    }

    async fn get_all_users(&self) -> ServiceResult<Vec<(UserId, User)>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|m| (m.id, Self::model_to_user(m)))
            .collect())
    }
}
