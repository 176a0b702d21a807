//! Ambassador program waitlist: position scoring plus the applicant points workflow that
//! keeps the cached position in step with the stored point total.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
