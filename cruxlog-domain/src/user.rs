use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::info;
use rustrict::CensorStr;

use crate::{
    ServiceError, ServiceResult,
    gym::{ArcGymRepository, GymId},
    messages::MessageKind,
    util::validate_email,
};

pub type Username = String;
pub type UserId = i64;

#[derive(Clone, Debug)]
pub struct User {
    pub username: Username,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub gym_id: Option<GymId>,
    pub member_since: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Registration {
    pub username: Username,
    pub email: String,
    pub password: String,
    pub gym_id: Option<GymId>,
}

#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub username: Option<Username>,
    pub name: Option<String>,
    pub gym_id: Option<GymId>,
}

pub type ArcUserRepository = Arc<Box<dyn UserRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait UserRepository {
    async fn get_user_by_id(&self, id: UserId) -> ServiceResult<Option<User>>;
    async fn get_user_by_name(&self, name: &str) -> ServiceResult<Option<(UserId, User)>>;
    async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<(UserId, User)>>;
    async fn create_user(&self, user: &User) -> ServiceResult<UserId>;
    async fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> ServiceResult<()>;
    async fn get_usernames(&self) -> ServiceResult<Vec<Username>>;
    async fn get_all_users(&self) -> ServiceResult<Vec<(UserId, User)>>;
}

pub type ArcUserService = Arc<Box<dyn UserService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait UserService {
    async fn load_taken_usernames(&self) -> ServiceResult<()>;
    async fn fetch_user(&self, username: &str) -> ServiceResult<(UserId, User)>;
    async fn try_register(&self, registration: &Registration) -> ServiceResult<()>;
    async fn try_login(&self, username: &str, password: &str) -> ServiceResult<Username>;
    async fn update_profile(&self, username: &str, update: ProfileUpdate) -> ServiceResult<()>;
}

pub struct UserServiceImpl {
    user_repository: ArcUserRepository,
    gym_repository: ArcGymRepository,
    user_cache: Arc<moka::sync::Cache<Username, (UserId, User)>>,
    taken_usernames: Arc<DashMap<Username, ()>>,
}

impl UserServiceImpl {
    pub fn new(user_repository: ArcUserRepository, gym_repository: ArcGymRepository) -> Self {
        Self {
            user_repository,
            gym_repository,
            user_cache: Arc::new(moka::sync::Cache::builder().max_capacity(1000).build()),
            taken_usernames: Arc::new(DashMap::new()),
        }
    }

    /// Normalized form used for uniqueness: two names that read the same on
    /// a leaderboard must not both be registrable.
    fn uniquify_username(username: &str) -> Username {
        username
            .to_ascii_lowercase()
            .replace("_", "")
            .replace("i", "1")
            .replace("l", "1")
            .replace("o", "0")
    }

    fn try_take_username(&self, username: &str) -> ServiceResult<()> {
        let unique_username = Self::uniquify_username(username);
        if self.taken_usernames.contains_key(&unique_username) {
            return ServiceError::conflict(MessageKind::UsernameTaken.text());
        }
        self.taken_usernames.insert(unique_username, ());
        Ok(())
    }

    fn validate_username(username: &str) -> ServiceResult<()> {
        if username.len() < 3 || username.len() > 15 {
            return ServiceError::bad_request("Username must be between 3 and 15 characters");
        }
        if username
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_alphabetic())
        {
            return ServiceError::bad_request("Username must start with a letter");
        }
        if username
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && c != '_')
        {
            return ServiceError::bad_request(MessageKind::UsernameInvalid.text());
        }
        if username.is_inappropriate() {
            return ServiceError::bad_request("Username contains inappropriate content");
        }
        Ok(())
    }

    async fn validate_gym(&self, gym_id: GymId) -> ServiceResult<()> {
        if self.gym_repository.get_gym(gym_id).await?.is_none() {
            return ServiceError::not_found(MessageKind::GymNotFound.text());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserService for UserServiceImpl {
    async fn load_taken_usernames(&self) -> ServiceResult<()> {
        let usernames = self.user_repository.get_usernames().await?;
        for username in usernames {
            self.taken_usernames
                .insert(Self::uniquify_username(&username), ());
        }
        Ok(())
    }

    async fn fetch_user(&self, username: &str) -> ServiceResult<(UserId, User)> {
        let username = username.to_string();
        if let Some(user) = self.user_cache.get(&username) {
            return Ok(user);
        }
        match self.user_repository.get_user_by_name(&username).await? {
            Some(found) => {
                self.user_cache.insert(username, found.clone());
                Ok(found)
            }
            None => ServiceError::not_found("User not found"),
        }
    }

    async fn try_register(&self, registration: &Registration) -> ServiceResult<()> {
        Self::validate_username(&registration.username)?;
        let email = validate_email(&registration.email)?;
        if let Some(gym_id) = registration.gym_id {
            self.validate_gym(gym_id).await?;
        }
        if self
            .user_repository
            .get_user_by_email(&email)
            .await?
            .is_some()
        {
            return ServiceError::conflict(MessageKind::EmailTaken.text());
        }
        self.try_take_username(&registration.username)?;

        let password_hash = bcrypt::hash(&registration.password, bcrypt::DEFAULT_COST)
            .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))?;
        self.user_repository
            .create_user(&User {
                username: registration.username.clone(),
                email,
                password_hash,
                name: None,
                gym_id: registration.gym_id,
                member_since: Utc::now(),
            })
            .await?;
        info!("Registered user {}", registration.username);
        Ok(())
    }

    async fn try_login(&self, username: &str, password: &str) -> ServiceResult<Username> {
        let (_, user) = match self.fetch_user(username).await {
            Ok(found) => found,
            Err(ServiceError::NotFound(_)) => {
                return ServiceError::unauthorized(MessageKind::LoginFailed.text());
            }
            Err(e) => return Err(e),
        };
        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| ServiceError::Internal(format!("Failed to verify password: {}", e)))?;
        if !valid {
            info!("Failed login attempt for user {}", username);
            return ServiceError::unauthorized(MessageKind::LoginFailed.text());
        }
        Ok(user.username)
    }

    async fn update_profile(&self, username: &str, update: ProfileUpdate) -> ServiceResult<()> {
        let (id, _) = self.fetch_user(username).await?;
        if let Some(new_username) = &update.username
            && new_username != username
        {
            Self::validate_username(new_username)?;
            self.try_take_username(new_username)?;
        }
        if let Some(gym_id) = update.gym_id {
            self.validate_gym(gym_id).await?;
        }
        self.user_repository.update_profile(id, &update).await?;
        self.user_cache.invalidate(&username.to_string());
        if let Some(new_username) = &update.username {
            self.user_cache.invalidate(new_username);
        }
        info!("Updated profile for user {}", username);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockUserRepository {
    pub users: DashMap<UserId, User>,
    next_id: std::sync::atomic::AtomicI64,
}

impl MockUserRepository {
    pub fn add_user(&self, username: &str) -> UserId {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        self.users.insert(
            id,
            User {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: String::new(),
                name: None,
                gym_id: None,
                member_since: Utc::now(),
            },
        );
        id
    }
}

#[async_trait::async_trait]
impl UserRepository for MockUserRepository {
    async fn get_user_by_id(&self, id: UserId) -> ServiceResult<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn get_user_by_name(&self, name: &str) -> ServiceResult<Option<(UserId, User)>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().username == name)
            .map(|entry| (*entry.key(), entry.value().clone())))
    }

    async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<(UserId, User)>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().email == email)
            .map(|entry| (*entry.key(), entry.value().clone())))
    }

    async fn create_user(&self, user: &User) -> ServiceResult<UserId> {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        self.users.insert(id, user.clone());
        Ok(id)
    }

    async fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> ServiceResult<()> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return ServiceError::not_found("User not found");
        };
        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(name) = &update.name {
            user.name = Some(name.clone());
        }
        if let Some(gym_id) = update.gym_id {
            user.gym_id = Some(gym_id);
        }
        Ok(())
    }

    async fn get_usernames(&self) -> ServiceResult<Vec<Username>> {
        Ok(self
            .users
            .iter()
            .map(|entry| entry.value().username.clone())
            .collect())
    }

    async fn get_all_users(&self) -> ServiceResult<Vec<(UserId, User)>> {
        let mut users: Vec<(UserId, User)> = self
            .users
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        users.sort_by_key(|(id, _)| *id);
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gym::MockGymRepository;

    fn service() -> (UserServiceImpl, Arc<MockUserRepository>) {
        let user_repo = Arc::new(MockUserRepository::default());
        let gym_repo: ArcGymRepository = Arc::new(Box::new(MockGymRepository::default()));
        let repo_for_service: ArcUserRepository = {
            let user_repo = user_repo.clone();
            Arc::new(Box::new(ForwardingUserRepository(user_repo)))
        };
        (UserServiceImpl::new(repo_for_service, gym_repo), user_repo)
    }

    struct ForwardingUserRepository(Arc<MockUserRepository>);

    #[async_trait::async_trait]
    impl UserRepository for ForwardingUserRepository {
        async fn get_user_by_id(&self, id: UserId) -> ServiceResult<Option<User>> {
            self.0.get_user_by_id(id).await
        }
        async fn get_user_by_name(&self, name: &str) -> ServiceResult<Option<(UserId, User)>> {
            self.0.get_user_by_name(name).await
        }
        async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<(UserId, User)>> {
            self.0.get_user_by_email(email).await
        }
        async fn create_user(&self, user: &User) -> ServiceResult<UserId> {
            self.0.create_user(user).await
        }
        async fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> ServiceResult<()> {
            self.0.update_profile(id, update).await
        }
        async fn get_usernames(&self) -> ServiceResult<Vec<Username>> {
            self.0.get_usernames().await
        }
        async fn get_all_users(&self) -> ServiceResult<Vec<(UserId, User)>> {
            self.0.get_all_users().await
        }
    }

    #[test]
    fn test_validate_username() {
        assert!(UserServiceImpl::validate_username("alex").is_ok());
        assert!(UserServiceImpl::validate_username("alex_honnold").is_ok());
        assert!(UserServiceImpl::validate_username("ab").is_err());
        assert!(UserServiceImpl::validate_username("1alex").is_err());
        assert!(UserServiceImpl::validate_username("al ex").is_err());
        assert!(UserServiceImpl::validate_username("averyveryverylongname").is_err());
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let (service, _) = service();
        service
            .try_register(&Registration {
                username: "lynn".into(),
                email: "lynn@example.com".into(),
                password: "nosecret".into(),
                gym_id: None,
            })
            .await
            .unwrap();

        assert_eq!(
            service.try_login("lynn", "nosecret").await.ok(),
            Some("lynn".to_string())
        );
        assert!(matches!(
            service.try_login("lynn", "wrong").await,
            Err(ServiceError::Unauthorized(..))
        ));
        assert!(matches!(
            service.try_login("nobody", "nosecret").await,
            Err(ServiceError::Unauthorized(..))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_confusable_username() {
        let (service, _) = service();
        service
            .try_register(&Registration {
                username: "lynn_hill".into(),
                email: "lynn@example.com".into(),
                password: "nosecret".into(),
                gym_id: None,
            })
            .await
            .unwrap();

        let result = service
            .try_register(&Registration {
                username: "Lynn_Hi11".into(),
                email: "other@example.com".into(),
                password: "nosecret".into(),
                gym_id: None,
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Conflict(..))));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let (service, _) = service();
        service
            .try_register(&Registration {
                username: "adam".into(),
                email: "shared@example.com".into(),
                password: "nosecret".into(),
                gym_id: None,
            })
            .await
            .unwrap();

        let result = service
            .try_register(&Registration {
                username: "ondra".into(),
                email: "shared@example.com".into(),
                password: "nosecret".into(),
                gym_id: None,
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Conflict(..))));
    }

    #[tokio::test]
    async fn test_update_profile_invalidates_cache() {
        let (service, repo) = service();
        let id = repo.add_user("tommy");
        let _ = service.fetch_user("tommy").await.unwrap();

        service
            .update_profile(
                "tommy",
                ProfileUpdate {
                    username: None,
                    name: Some("Tommy C".into()),
                    gym_id: None,
                },
            )
            .await
            .unwrap();

        let (fetched_id, user) = service.fetch_user("tommy").await.unwrap();
        assert_eq!(fetched_id, id);
        assert_eq!(user.name.as_deref(), Some("Tommy C"));
    }
}
