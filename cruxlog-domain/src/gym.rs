use std::sync::Arc;

use dashmap::DashMap;

use crate::ServiceResult;

pub type GymId = i64;

#[derive(Clone, Debug)]
pub struct Gym {
    pub name: String,
    pub location: Option<String>,
}

pub type ArcGymRepository = Arc<Box<dyn GymRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait GymRepository {
    async fn get_gym(&self, id: GymId) -> ServiceResult<Option<Gym>>;
    async fn get_gyms(&self) -> ServiceResult<Vec<(GymId, Gym)>>;
    async fn create_gym(&self, gym: &Gym) -> ServiceResult<GymId>;
}

#[derive(Default)]
pub struct MockGymRepository {
    gyms: DashMap<GymId, Gym>,
    next_id: std::sync::atomic::AtomicI64,
}

impl MockGymRepository {
    pub fn with_gym(name: &str) -> (Self, GymId) {
        let repo = Self::default();
        repo.gyms.insert(
            1,
            Gym {
                name: name.to_string(),
                location: None,
            },
        );
        repo.next_id.store(1, std::sync::atomic::Ordering::SeqCst);
        (repo, 1)
    }
}

#[async_trait::async_trait]
impl GymRepository for MockGymRepository {
    async fn get_gym(&self, id: GymId) -> ServiceResult<Option<Gym>> {
        Ok(self.gyms.get(&id).map(|entry| entry.value().clone()))
    }

    async fn get_gyms(&self) -> ServiceResult<Vec<(GymId, Gym)>> {
        let mut gyms: Vec<(GymId, Gym)> = self
            .gyms
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        gyms.sort_by_key(|(id, _)| *id);
        Ok(gyms)
    }

    async fn create_gym(&self, gym: &Gym) -> ServiceResult<GymId> {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        self.gyms.insert(id, gym.clone());
        Ok(id)
    }
}
