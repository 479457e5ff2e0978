// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use soldium_core::{EntryId, UserId};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_REJECTION_REASON: &str = "Payment could not be verified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum EntryStatus {
    Pending,
    Verified,
    Rejected,
}

impl EntryStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl Display for EntryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown entry status `{other}`")),
        }
    }
}

/// Validated submission bound to its owner, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryDraft {
    pub user_id: UserId,
    pub user_email: String,
    pub payment_reference: String,
    pub solana_wallet: String,
    pub sol_amount: f64,
    pub sodm_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresaleEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub user_email: String,
    pub payment_reference: String,
    pub solana_wallet: String,
    pub sol_amount: f64,
    /// Frozen at submission; never recomputed from a later rate.
    pub sodm_amount: f64,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
    /// Resolution time for both verification and rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EntryTransition {
    Verify,
    Reject {
        #[serde(default)]
        reason: Option<String>,
    },
}

impl EntryTransition {
    #[must_use]
    pub fn reject(reason: Option<&str>) -> Self {
        Self::Reject {
            reason: reason.map(ToString::to_string),
        }
    }

    #[must_use]
    pub const fn target(&self) -> EntryStatus {
        match self {
            Self::Verify => EntryStatus::Verified,
            Self::Reject { .. } => EntryStatus::Rejected,
        }
    }

    /// Operator reason with blanks collapsed to the default message.
    #[must_use]
    pub fn effective_reason(&self) -> Option<String> {
        match self {
            Self::Verify => None,
            Self::Reject { reason } => Some(
                reason
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .unwrap_or(DEFAULT_REJECTION_REASON)
                    .to_string(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    NotPending { id: EntryId, status: EntryStatus },
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPending { id, status } => {
                write!(f, "entry {id} is {status}; only pending entries can be resolved")
            }
        }
    }
}

impl std::error::Error for TransitionError {}

impl PresaleEntry {
    #[must_use]
    pub fn from_draft(id: EntryId, draft: EntryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            user_email: draft.user_email,
            payment_reference: draft.payment_reference,
            solana_wallet: draft.solana_wallet,
            sol_amount: draft.sol_amount,
            sodm_amount: draft.sodm_amount,
            status: EntryStatus::Pending,
            created_at,
            verified_at: None,
            rejection_reason: None,
        }
    }

    /// Resolves a pending entry. Terminal entries are left untouched.
    pub fn apply(
        &mut self,
        transition: &EntryTransition,
        resolved_at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if self.status != EntryStatus::Pending {
            return Err(TransitionError::NotPending {
                id: self.id.clone(),
                status: self.status,
            });
        }
        self.status = transition.target();
        self.verified_at = Some(resolved_at);
        self.rejection_reason = transition.effective_reason();
        Ok(())
    }

    /// Checks the document-level invariants of a stored entry.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.sol_amount.is_finite() && self.sol_amount > 0.0) {
            return Err(format!("entry {} has non-positive sol_amount", self.id));
        }
        if !(self.sodm_amount.is_finite() && self.sodm_amount > 0.0) {
            return Err(format!("entry {} has non-positive sodm_amount", self.id));
        }
        match (self.status, &self.verified_at, &self.rejection_reason) {
            (EntryStatus::Pending, None, None) => Ok(()),
            (EntryStatus::Verified, Some(_), None) => Ok(()),
            (EntryStatus::Rejected, Some(_), Some(_)) => Ok(()),
            (status, _, _) => Err(format!(
                "entry {} has resolution fields inconsistent with status {status}",
                self.id
            )),
        }
    }
}
