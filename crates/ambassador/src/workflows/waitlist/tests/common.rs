use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::waitlist::domain::{ApplicantId, ApplicantIntake, ApplicantRecord};
use crate::workflows::waitlist::repository::{
    ApplicantRepository, PointsUpdate, RepositoryError,
};
use crate::workflows::waitlist::{waitlist_router, WaitlistConfig, WaitlistService};

pub(super) const SEED: u64 = 7;

pub(super) fn waitlist_config() -> WaitlistConfig {
    WaitlistConfig {
        jitter_seed: Some(SEED),
        referral_bonus: 10.0,
    }
}

pub(super) fn intake(name: &str, email: &str) -> ApplicantIntake {
    ApplicantIntake {
        full_name: name.to_string(),
        email: email.to_string(),
        school: Some("Iowa State University".to_string()),
        ambassador_type: Some("campus".to_string()),
        referred_by: None,
    }
}

pub(super) fn referred_intake(name: &str, email: &str, referrer: &ApplicantId) -> ApplicantIntake {
    ApplicantIntake {
        referred_by: Some(referrer.clone()),
        ..intake(name, email)
    }
}

pub(super) fn build_service() -> (WaitlistService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = WaitlistService::new(repository.clone(), waitlist_config());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicantId, ApplicantRecord>>>,
    pub(super) point_writes: Arc<Mutex<Vec<PointsUpdate>>>,
}

impl MemoryRepository {
    pub(super) fn point_writes(&self) -> Vec<PointsUpdate> {
        self.point_writes
            .lock()
            .expect("repository mutex poisoned")
            .clone()
    }
}

impl ApplicantRepository for MemoryRepository {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.applicant_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.applicant_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().find(|record| record.email == email).cloned())
    }

    fn record_points(
        &self,
        id: &ApplicantId,
        update: PointsUpdate,
    ) -> Result<ApplicantRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        update.apply_to(record);
        self.point_writes
            .lock()
            .expect("repository mutex poisoned")
            .push(update);
        Ok(record.clone())
    }

    fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Reads succeed but every points write fails, as a read replica would.
pub(super) struct ReadOnlyRepository(pub(super) MemoryRepository);

impl ApplicantRepository for ReadOnlyRepository {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        self.0.insert(record)
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        self.0.fetch(id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<ApplicantRecord>, RepositoryError> {
        self.0.find_by_email(email)
    }

    fn record_points(
        &self,
        _id: &ApplicantId,
        _update: PointsUpdate,
    ) -> Result<ApplicantRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        self.0.list()
    }
}

/// Delays every email lookup so concurrent intakes overlap inside the duplicate check.
/// The wrapped store only enforces unique ids, like a table without an email index.
pub(super) struct SlowLookupRepository(pub(super) MemoryRepository);

impl ApplicantRepository for SlowLookupRepository {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        self.0.insert(record)
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        self.0.fetch(id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<ApplicantRecord>, RepositoryError> {
        std::thread::sleep(std::time::Duration::from_millis(50));
        self.0.find_by_email(email)
    }

    fn record_points(
        &self,
        id: &ApplicantId,
        update: PointsUpdate,
    ) -> Result<ApplicantRecord, RepositoryError> {
        self.0.record_points(id, update)
    }

    fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        self.0.list()
    }
}

pub(super) struct UnavailableRepository;

impl ApplicantRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_points(
        &self,
        _id: &ApplicantId,
        _update: PointsUpdate,
    ) -> Result<ApplicantRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: WaitlistService<MemoryRepository>) -> axum::Router {
    waitlist_router(Arc::new(service))
}
