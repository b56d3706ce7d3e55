mod entry;
pub mod validation;

pub use entry::{Entry, EntryPatch, NewEntry};
pub use validation::ValidationError;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the millisecond precision entries are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
