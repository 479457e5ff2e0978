#![forbid(unsafe_code)]
//! Pure projections shared by the user dashboard and the admin console.
//!
//! Nothing here touches a store: every function takes the current in-memory
//! entry set and recomputes from scratch.

mod countdown;
mod filters;
mod ordering;
mod stats;

pub use countdown::{time_remaining, Countdown, TimeRemaining};
pub use filters::StatusFilter;
pub use ordering::{sort_newest_first, Created};
pub use stats::ReviewStats;

pub const CRATE_NAME: &str = "soldium-query";
