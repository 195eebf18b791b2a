use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;

use crate::{
    ServiceError, ServiceResult,
    user::{ArcUserService, UserId},
};

pub type FeedbackId = i64;

const MAX_FEEDBACK_LEN: usize = 2000;

#[derive(Clone, Debug)]
pub struct Feedback {
    pub user_id: Option<UserId>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

pub type ArcFeedbackRepository = Arc<Box<dyn FeedbackRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait FeedbackRepository {
    async fn create_feedback(&self, feedback: &Feedback) -> ServiceResult<FeedbackId>;
}

pub type ArcFeedbackService = Arc<Box<dyn FeedbackService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait FeedbackService {
    async fn submit(&self, username: Option<&str>, message: &str) -> ServiceResult<FeedbackId>;
}

pub struct FeedbackServiceImpl {
    feedback_repository: ArcFeedbackRepository,
    user_service: ArcUserService,
}

impl FeedbackServiceImpl {
    pub fn new(feedback_repository: ArcFeedbackRepository, user_service: ArcUserService) -> Self {
        Self {
            feedback_repository,
            user_service,
        }
    }
}

#[async_trait::async_trait]
impl FeedbackService for FeedbackServiceImpl {
    async fn submit(&self, username: Option<&str>, message: &str) -> ServiceResult<FeedbackId> {
        let message = message.trim();
        if message.is_empty() {
            return ServiceError::bad_request("Feedback message cannot be empty");
        }
        if message.len() > MAX_FEEDBACK_LEN {
            return ServiceError::bad_request("Feedback message is too long");
        }
        let user_id = match username {
            Some(name) => Some(self.user_service.fetch_user(name).await?.0),
            None => None,
        };
        let id = self
            .feedback_repository
            .create_feedback(&Feedback {
                user_id,
                message: message.to_string(),
                created_at: Utc::now(),
            })
            .await?;
        info!(
            "Feedback {} submitted by {}",
            id,
            username.unwrap_or("anonymous")
        );
        Ok(id)
    }
}
