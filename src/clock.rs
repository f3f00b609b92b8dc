use chrono::{DateTime, Utc};

/// Time source injected into the attempt state machine and evaluator.
/// The server clock is authoritative for expiry; client-reported elapsed
/// time is advisory only.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
