use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use cruxlog_domain::{
    ServiceError, ServiceResult,
    feedback::{Feedback, FeedbackId, FeedbackRepository},
};

use crate::entity::feedback;

pub struct SqliteFeedbackRepository {
    db: DatabaseConnection,
}

impl SqliteFeedbackRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl FeedbackRepository for SqliteFeedbackRepository {
    async fn create_feedback(&self, new_feedback: &Feedback) -> ServiceResult<FeedbackId> {
        let model = feedback::ActiveModel {
            id: Default::default(),
            user_id: Set(new_feedback.user_id),
            message: Set(new_feedback.message.clone()),
            created_at: Set(new_feedback.created_at.timestamp()),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(inserted.id)
    }
}
