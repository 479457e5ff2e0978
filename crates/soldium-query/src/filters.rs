// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use soldium_model::{EntryStatus, PresaleEntry};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// View-only partition of the admin entry list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Verified,
    Rejected,
}

impl StatusFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn admits(self, status: EntryStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == EntryStatus::Pending,
            Self::Verified => status == EntryStatus::Verified,
            Self::Rejected => status == EntryStatus::Rejected,
        }
    }

    /// Borrowed subset in input order; the underlying list is untouched.
    #[must_use]
    pub fn apply(self, entries: &[PresaleEntry]) -> Vec<&PresaleEntry> {
        entries.iter().filter(|e| self.admits(e.status)).collect()
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!(
                "unknown status filter `{other}`; expected all|pending|verified|rejected"
            )),
        }
    }
}
