// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use soldium_model::{EntryStatus, PresaleEntry};

/// Admin aggregates. Never persisted; always derived from the live entry set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total: usize,
    pub pending: usize,
    pub verified: usize,
    pub rejected: usize,
    /// Sum of `sol_amount` over verified entries only.
    pub total_sol: f64,
    /// Sum of `sodm_amount` over verified entries only.
    pub total_sodm: f64,
}

impl ReviewStats {
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a PresaleEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut acc, entry| {
            acc.total += 1;
            match entry.status {
                EntryStatus::Pending => acc.pending += 1,
                EntryStatus::Verified => {
                    acc.verified += 1;
                    acc.total_sol += entry.sol_amount;
                    acc.total_sodm += entry.sodm_amount;
                }
                EntryStatus::Rejected => acc.rejected += 1,
                _ => {}
            }
            acc
        })
    }
}
