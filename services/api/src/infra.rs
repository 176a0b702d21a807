use ambassador::workflows::waitlist::{
    ApplicantId, ApplicantRecord, ApplicantRepository, PointsUpdate, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local applicant store used until a hosted database adapter is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicantRepository {
    records: Arc<Mutex<HashMap<ApplicantId, ApplicantRecord>>>,
}

impl InMemoryApplicantRepository {
    fn records(&self) -> MutexGuard<'_, HashMap<ApplicantId, ApplicantRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ApplicantRepository for InMemoryApplicantRepository {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        let mut guard = self.records();
        let taken = guard.contains_key(&record.applicant_id)
            || guard.values().any(|existing| existing.email == record.email);
        if taken {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.applicant_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Ok(self.records().get(id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Ok(self
            .records()
            .values()
            .find(|record| record.email == email)
            .cloned())
    }

    fn record_points(
        &self,
        id: &ApplicantId,
        update: PointsUpdate,
    ) -> Result<ApplicantRecord, RepositoryError> {
        let mut guard = self.records();
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        update.apply_to(record);
        Ok(record.clone())
    }

    fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        Ok(self.records().values().cloned().collect())
    }
}
