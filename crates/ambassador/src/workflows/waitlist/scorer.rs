use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Point total at which an applicant reaches the front of the waitlist.
pub const MAX_SCORE: f64 = 175.0;
pub const MIN_POSITION: u8 = 1;
pub const MAX_POSITION: u8 = 100;
/// Largest jitter magnitude applied to a base position.
pub const JITTER_SPREAD: i8 = 2;

/// Display rank in `[MIN_POSITION, MAX_POSITION]`; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaitlistPosition(u8);

impl WaitlistPosition {
    pub const FRONT: Self = Self(MIN_POSITION);
    pub const BACK: Self = Self(MAX_POSITION);

    pub const fn get(self) -> u8 {
        self.0
    }

    fn clamped(raw: i32) -> Self {
        Self(raw.clamp(i32::from(MIN_POSITION), i32::from(MAX_POSITION)) as u8)
    }
}

impl fmt::Display for WaitlistPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Clamp a raw point total into `[0, MAX_SCORE]`. `NaN` counts as no points.
pub fn effective_points(points: f64) -> f64 {
    if points.is_nan() {
        return 0.0;
    }
    points.clamp(0.0, MAX_SCORE)
}

/// Position before jitter: an inverted linear scale over the clamped point total,
/// rounded half-up.
pub fn base_position(points: f64) -> WaitlistPosition {
    let normalized = effective_points(points) / MAX_SCORE;
    let span = f64::from(MAX_POSITION - MIN_POSITION);
    let raw = (f64::from(MAX_POSITION) - normalized * span).round();
    WaitlistPosition::clamped(raw as i32)
}

/// Score with a caller-chosen jitter. Jitter outside `±JITTER_SPREAD` is clamped first.
pub fn position_with_jitter(points: f64, jitter: i8) -> WaitlistPosition {
    let jitter = jitter.clamp(-JITTER_SPREAD, JITTER_SPREAD);
    let base = i32::from(base_position(points).get());
    WaitlistPosition::clamped(base + i32::from(jitter))
}

/// Draw one jitter value uniformly from `-JITTER_SPREAD..=JITTER_SPREAD`.
pub fn draw_jitter<R>(rng: &mut R) -> i8
where
    R: Rng + ?Sized,
{
    rng.random_range(-JITTER_SPREAD..=JITTER_SPREAD)
}

/// Map a point total to a waitlist position, consuming exactly one draw from `rng`.
pub fn compute_position<R>(points: f64, rng: &mut R) -> WaitlistPosition
where
    R: Rng + ?Sized,
{
    position_with_jitter(points, draw_jitter(rng))
}

/// Result of a single scoring pass, kept together so callers can log or display both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub base: WaitlistPosition,
    pub jitter: i8,
    pub position: WaitlistPosition,
}

impl ScoreBreakdown {
    pub fn compute<R>(points: f64, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::with_jitter(points, draw_jitter(rng))
    }

    pub fn with_jitter(points: f64, jitter: i8) -> Self {
        let jitter = jitter.clamp(-JITTER_SPREAD, JITTER_SPREAD);
        Self {
            base: base_position(points),
            jitter,
            position: position_with_jitter(points, jitter),
        }
    }
}
