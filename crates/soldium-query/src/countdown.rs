// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Countdown {
    Remaining(TimeRemaining),
    BurnInProgress,
}

impl Countdown {
    #[must_use]
    pub const fn is_burn_in_progress(&self) -> bool {
        matches!(self, Self::BurnInProgress)
    }
}

/// Splits `target - now` into naive day/hour/minute/second buckets by integer
/// division of the millisecond delta. Sub-second remainders are dropped.
#[must_use]
pub fn time_remaining(now: DateTime<Utc>, target: DateTime<Utc>) -> Countdown {
    let delta = (target - now).num_milliseconds();
    if delta <= 0 {
        return Countdown::BurnInProgress;
    }
    Countdown::Remaining(TimeRemaining {
        days: delta / MS_PER_DAY,
        hours: (delta % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (delta % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (delta % MS_PER_MINUTE) / MS_PER_SECOND,
    })
}
