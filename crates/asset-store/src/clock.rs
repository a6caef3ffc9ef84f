//! Time source for audit timestamps

use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Source of "now"
pub trait Clock: Debug + Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
