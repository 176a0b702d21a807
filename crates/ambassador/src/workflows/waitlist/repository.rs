use chrono::{DateTime, Utc};

use super::domain::{ApplicantId, ApplicantRecord};
use super::scorer::{position_with_jitter, WaitlistPosition};

/// A point total paired with the position scored from it.
///
/// Built only inside the workflow, always scoring the exact total it carries, so a repository
/// never receives a position that drifted from its points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsUpdate {
    points: f64,
    waitlist_position: WaitlistPosition,
    updated_at: DateTime<Utc>,
}

impl PointsUpdate {
    pub(crate) fn scored(points: f64, jitter: i8, updated_at: DateTime<Utc>) -> Self {
        let points = effective_stored_points(points);
        Self {
            points,
            waitlist_position: position_with_jitter(points, jitter),
            updated_at,
        }
    }

    pub fn points(&self) -> f64 {
        self.points
    }

    pub fn waitlist_position(&self) -> WaitlistPosition {
        self.waitlist_position
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Write both derived fields onto a record in one step.
    pub fn apply_to(&self, record: &mut ApplicantRecord) {
        record.points = self.points;
        record.waitlist_position = self.waitlist_position;
        record.updated_at = self.updated_at;
    }
}

/// Stored totals keep anything above the scoring ceiling but never go below zero.
fn effective_stored_points(points: f64) -> f64 {
    if points.is_nan() {
        0.0
    } else {
        points.max(0.0)
    }
}

/// Storage abstraction so the waitlist service can be exercised in isolation.
pub trait ApplicantRepository: Send + Sync {
    /// Store a new applicant; an existing id or email is a `Conflict`.
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError>;
    fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<ApplicantRecord>, RepositoryError>;
    /// Persist a new point total and its position as a single write.
    fn record_points(
        &self,
        id: &ApplicantId,
        update: PointsUpdate,
    ) -> Result<ApplicantRecord, RepositoryError>;
    fn list(&self) -> Result<Vec<ApplicantRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
