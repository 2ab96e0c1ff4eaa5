pub mod experience;
pub mod message;
pub mod project;
pub mod project_tag;
pub mod skill;
pub mod tag;
pub mod user;

use chrono::{NaiveDateTime, SubsecRound, Utc};

/// Creation timestamp in UTC, truncated to the store's microsecond precision.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}
