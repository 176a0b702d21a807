use serde::{Deserialize, Serialize};

pub const DEFAULT_REFERRAL_BONUS: f64 = 10.0;
pub const DEFAULT_STANDINGS_LIMIT: usize = 50;
pub const MAX_STANDINGS_LIMIT: usize = 500;

/// Tuning knobs for the waitlist workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistConfig {
    /// Fixed seed for the jitter generator; `None` seeds from the operating system.
    pub jitter_seed: Option<u64>,
    /// Points credited to an existing applicant each time a new applicant names them.
    pub referral_bonus: f64,
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            jitter_seed: None,
            referral_bonus: DEFAULT_REFERRAL_BONUS,
        }
    }
}
