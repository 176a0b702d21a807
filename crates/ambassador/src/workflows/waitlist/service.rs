use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::config::{WaitlistConfig, DEFAULT_STANDINGS_LIMIT, MAX_STANDINGS_LIMIT};
use super::domain::{
    ApplicantId, ApplicantIntake, ApplicantRecord, IntakeError, ValidatedIntake,
};
use super::repository::{ApplicantRepository, PointsUpdate, RepositoryError};
use super::scorer::draw_jitter;

/// Service owning the jitter source and every write path that touches points.
pub struct WaitlistService<R> {
    repository: Arc<R>,
    rng: Mutex<ChaCha8Rng>,
    // Serializes read-modify-write cycles on point totals.
    points_lock: Mutex<()>,
    // Keeps the duplicate-email check and the insert together.
    intake_lock: Mutex<()>,
    sequence: AtomicU64,
    referral_bonus: f64,
}

impl<R> WaitlistService<R>
where
    R: ApplicantRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: WaitlistConfig) -> Self {
        let rng = match config.jitter_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        Self {
            repository,
            rng: Mutex::new(rng),
            points_lock: Mutex::new(()),
            intake_lock: Mutex::new(()),
            sequence: AtomicU64::new(1),
            referral_bonus: config.referral_bonus.max(0.0),
        }
    }

    fn next_applicant_id(&self) -> ApplicantId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        ApplicantId(format!("amb-{id:06}"))
    }

    fn jitter(&self) -> i8 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw_jitter(&mut *rng)
    }

    fn score(&self, points: f64) -> PointsUpdate {
        let jitter = self.jitter();
        let update = PointsUpdate::scored(points, jitter, Utc::now());
        debug!(
            points = update.points(),
            jitter,
            position = update.waitlist_position().get(),
            "scored waitlist position"
        );
        update
    }

    /// Register a new applicant at zero points and credit their referrer, if known.
    ///
    /// Once the applicant is stored the call succeeds; a failed referral credit is logged
    /// rather than reported, so callers never see an error for a write that happened.
    pub fn submit(
        &self,
        intake: ApplicantIntake,
    ) -> Result<ApplicantRecord, WaitlistServiceError> {
        let intake = intake.validate()?;
        let stored = self.insert_unique(intake)?;

        if let Some(referrer) = stored.referred_by.clone() {
            self.credit_referrer(&referrer);
        }

        Ok(stored)
    }

    fn insert_unique(
        &self,
        intake: ValidatedIntake,
    ) -> Result<ApplicantRecord, WaitlistServiceError> {
        let _guard = self
            .intake_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.repository.find_by_email(&intake.email)?.is_some() {
            return Err(WaitlistServiceError::DuplicateEmail(intake.email));
        }

        let scored = self.score(0.0);
        let now = scored.updated_at();
        let record = ApplicantRecord {
            applicant_id: self.next_applicant_id(),
            full_name: intake.full_name,
            email: intake.email,
            school: intake.school,
            ambassador_type: intake.ambassador_type,
            referred_by: intake.referred_by,
            points: scored.points(),
            waitlist_position: scored.waitlist_position(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        info!(
            applicant_id = %stored.applicant_id,
            position = stored.waitlist_position.get(),
            "applicant joined waitlist"
        );
        Ok(stored)
    }

    fn credit_referrer(&self, referrer: &ApplicantId) {
        if self.referral_bonus == 0.0 {
            return;
        }

        match self.add_points(referrer, self.referral_bonus) {
            Ok(record) => {
                info!(
                    applicant_id = %referrer,
                    points = record.points,
                    "referral bonus credited"
                );
            }
            Err(WaitlistServiceError::Repository(RepositoryError::NotFound)) => {
                warn!(applicant_id = %referrer, "referrer not found, skipping bonus");
            }
            Err(err) => {
                warn!(applicant_id = %referrer, error = %err, "referral bonus not credited");
            }
        }
    }

    /// Replace an applicant's point total and rescore their position.
    pub fn set_points(
        &self,
        applicant_id: &ApplicantId,
        points: f64,
    ) -> Result<ApplicantRecord, WaitlistServiceError> {
        ensure_finite(points)?;
        let _guard = self
            .points_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        self.repository
            .fetch(applicant_id)?
            .ok_or(RepositoryError::NotFound)?;
        self.persist(applicant_id, points)
    }

    /// Add `delta` to the stored total (never dropping below zero) and rescore.
    pub fn add_points(
        &self,
        applicant_id: &ApplicantId,
        delta: f64,
    ) -> Result<ApplicantRecord, WaitlistServiceError> {
        ensure_finite(delta)?;
        let _guard = self
            .points_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current = self
            .repository
            .fetch(applicant_id)?
            .ok_or(RepositoryError::NotFound)?;
        let total = current.points + delta;
        ensure_finite(total)?;
        self.persist(applicant_id, total)
    }

    fn persist(
        &self,
        applicant_id: &ApplicantId,
        points: f64,
    ) -> Result<ApplicantRecord, WaitlistServiceError> {
        let update = self.score(points);
        let record = self.repository.record_points(applicant_id, update)?;
        info!(
            applicant_id = %applicant_id,
            points = record.points,
            position = record.waitlist_position.get(),
            "applicant points updated"
        );
        Ok(record)
    }

    /// Fetch an applicant for portal responses.
    pub fn get(&self, applicant_id: &ApplicantId) -> Result<ApplicantRecord, WaitlistServiceError> {
        let record = self
            .repository
            .fetch(applicant_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Applicants ordered front to back: position, then points descending, then id.
    pub fn standings(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ApplicantRecord>, WaitlistServiceError> {
        let limit = limit
            .unwrap_or(DEFAULT_STANDINGS_LIMIT)
            .min(MAX_STANDINGS_LIMIT);

        let mut records = self.repository.list()?;
        records.sort_by(|a, b| {
            a.waitlist_position
                .cmp(&b.waitlist_position)
                .then_with(|| b.points.total_cmp(&a.points))
                .then_with(|| a.applicant_id.cmp(&b.applicant_id))
        });
        records.truncate(limit);
        Ok(records)
    }
}

fn ensure_finite(value: f64) -> Result<(), WaitlistServiceError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(WaitlistServiceError::InvalidPoints(value))
    }
}

/// Error raised by the waitlist service.
#[derive(Debug, thiserror::Error)]
pub enum WaitlistServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("an applicant with email {0} already exists")]
    DuplicateEmail(String),
    #[error("points must be a finite number, got {0}")]
    InvalidPoints(f64),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
