//! Waitlist scoring and the applicant points workflow.
//!
//! Every path that changes an applicant's points goes through [`WaitlistService`], which
//! rescores the position and hands both values to the repository in one
//! [`ApplicantRepository::record_points`] call.

pub mod config;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scorer;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::{
    WaitlistConfig, DEFAULT_REFERRAL_BONUS, DEFAULT_STANDINGS_LIMIT, MAX_STANDINGS_LIMIT,
};
pub use domain::{
    ApplicantId, ApplicantIntake, ApplicantRecord, ApplicantStatusView, IntakeError,
};
pub use repository::{ApplicantRepository, PointsUpdate, RepositoryError};
pub use router::{waitlist_router, AddPointsRequest, SetPointsRequest, StandingsResponse};
pub use scorer::{
    base_position, compute_position, draw_jitter, effective_points, position_with_jitter,
    ScoreBreakdown, WaitlistPosition, JITTER_SPREAD, MAX_POSITION, MAX_SCORE, MIN_POSITION,
};
pub use service::{WaitlistService, WaitlistServiceError};
