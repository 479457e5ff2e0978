// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use soldium_core::{EntryId, UserId};
use soldium_model::{
    EntryDraft, EntryTransition, InquiryDraft, PartnershipInquiry, PresaleEntry, TransitionError,
    UserAccount, COUNTDOWN_SETTINGS_KEY,
};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::subscription::Subscription;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Validation,
    Conflict,
    Unavailable,
    Io,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation_error",
            Self::Conflict => "conflict",
            Self::Unavailable => "unavailable",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn entry_not_found(id: &EntryId) -> Self {
        Self::new(StoreErrorCode::NotFound, format!("presale entry {id} not found"))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<TransitionError> for StoreError {
    fn from(value: TransitionError) -> Self {
        Self::new(StoreErrorCode::Conflict, value.to_string())
    }
}

/// Live-query filter over `presale_entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryScope {
    All,
    Owner(UserId),
}

impl EntryScope {
    #[must_use]
    pub fn matches(&self, entry: &PresaleEntry) -> bool {
        match self {
            Self::All => true,
            Self::Owner(user) => entry.user_id == *user,
        }
    }

    #[must_use]
    pub fn select(&self, entries: &[PresaleEntry]) -> Vec<PresaleEntry> {
        entries.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

/// Key of a document in the `settings` collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingKey(String);

impl SettingKey {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self(key.to_string())
    }

    #[must_use]
    pub fn countdown() -> Self {
        Self::new(COUNTDOWN_SETTINGS_KEY)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SettingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingRecord {
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}

/// Receives the full scoped snapshot once on subscribe and after every commit.
pub type EntryListener = Arc<dyn Fn(&[PresaleEntry]) + Send + Sync>;

/// Receives the current document (or `None`) once on subscribe and after every save.
pub type SettingListener = Arc<dyn Fn(Option<&SettingRecord>) + Send + Sync>;

/// Durable, subscribable collections backing the presale workflow.
///
/// Listeners run on the committing thread, in commit order, and must not
/// call back into the same store. `list_entries` returns documents in storage order; callers
/// sort for display.
pub trait DocumentStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Persists a new pending entry with a store-assigned id and timestamp.
    fn insert_entry(&self, draft: EntryDraft) -> Result<PresaleEntry, StoreError>;
    fn get_entry(&self, id: &EntryId) -> Result<PresaleEntry, StoreError>;
    /// Applies a status transition atomically; a non-pending entry yields
    /// `Conflict` and is left untouched.
    fn transition_entry(
        &self,
        id: &EntryId,
        transition: &EntryTransition,
    ) -> Result<PresaleEntry, StoreError>;
    fn list_entries(&self, scope: &EntryScope) -> Result<Vec<PresaleEntry>, StoreError>;
    fn subscribe_entries(
        &self,
        scope: EntryScope,
        listener: EntryListener,
    ) -> Result<Subscription, StoreError>;

    fn get_setting(&self, key: &SettingKey) -> Result<Option<SettingRecord>, StoreError>;
    /// Overwrites the whole document and stamps `updated_at`.
    fn put_setting(&self, key: &SettingKey, value: Value) -> Result<SettingRecord, StoreError>;
    fn subscribe_setting(
        &self,
        key: SettingKey,
        listener: SettingListener,
    ) -> Result<Subscription, StoreError>;

    fn put_account(&self, user: &UserId, account: &UserAccount) -> Result<(), StoreError>;
    fn get_account(&self, user: &UserId) -> Result<Option<UserAccount>, StoreError>;

    fn insert_inquiry(&self, draft: InquiryDraft) -> Result<PartnershipInquiry, StoreError>;
    fn list_inquiries(&self) -> Result<Vec<PartnershipInquiry>, StoreError>;
}
