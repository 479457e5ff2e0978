// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use soldium_core::UserId;
use soldium_model::{ExplorerLinks, PartnershipInquiry, PresaleEntry, SubmissionForm, UserAccount};
use soldium_query::{Countdown, ReviewStats, StatusFilter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignUpRequestDto {
    pub email: String,
    pub password: String,
}

pub type SignInRequestDto = SignUpRequestDto;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetPasswordRequestDto {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetPasswordResponseDto {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionDto {
    pub token: String,
    pub user_id: UserId,
    pub email: String,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeResponseDto {
    pub user_id: UserId,
    pub account: UserAccount,
}

/// Contribution form body. `sol_amount` is accepted as text or as a JSON
/// number and validated as text either way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitEntryRequestDto {
    #[serde(default)]
    pub payment_reference: String,
    #[serde(default)]
    pub solana_wallet: String,
    #[serde(default)]
    pub sol_amount: Value,
}

impl SubmitEntryRequestDto {
    #[must_use]
    pub fn into_form(self) -> SubmissionForm {
        let amount = match self.sol_amount {
            Value::String(text) => text,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        SubmissionForm {
            payment_reference: self.payment_reference,
            solana_wallet: self.solana_wallet,
            sol_amount: amount,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RejectRequestDto {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryDto {
    #[serde(flatten)]
    pub entry: PresaleEntry,
    pub explorer: ExplorerLinks,
}

impl From<PresaleEntry> for EntryDto {
    fn from(entry: PresaleEntry) -> Self {
        let explorer = ExplorerLinks::for_entry(&entry);
        Self { entry, explorer }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntriesResponseDto {
    pub entries: Vec<EntryDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminEntriesResponseDto {
    pub filter: StatusFilter,
    pub stats: ReviewStats,
    pub entries: Vec<EntryDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountdownResponseDto {
    pub now: DateTime<Utc>,
    pub next_burn_date: DateTime<Utc>,
    pub burn_amount: String,
    pub burn_interval: String,
    pub countdown: Countdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InquiriesResponseDto {
    pub inquiries: Vec<PartnershipInquiry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionDto {
    pub name: String,
    pub version: String,
    pub api_version: String,
}
