// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use soldium_core::{Clock, EntryId, InquiryId, SystemClock, UserId};
use soldium_model::{
    EntryDraft, EntryTransition, InquiryDraft, PartnershipInquiry, PresaleEntry, UserAccount,
};

use crate::backend::{
    DocumentStore, EntryListener, EntryScope, SettingKey, SettingListener, SettingRecord,
    StoreError, StoreErrorCode,
};
use crate::subscription::{Notifier, Subscription};

#[derive(Default)]
struct Collections {
    entries: Vec<PresaleEntry>,
    users: BTreeMap<UserId, UserAccount>,
    inquiries: Vec<PartnershipInquiry>,
    settings: BTreeMap<SettingKey, SettingRecord>,
}

/// Process-local document store. Used as the default development backend and
/// as the fake behind workflow tests.
pub struct InMemoryStore {
    data: Mutex<Collections>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    offline: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: Mutex::new(Collections::default()),
            notifier: Notifier::new(),
            clock,
            offline: AtomicBool::new(false),
        }
    }

    /// Simulates an unreachable backend: every call fails with `Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::new(
                StoreErrorCode::Unavailable,
                "memory store is offline",
            ));
        }
        self.data
            .lock()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "memory store lock poisoned"))
    }
}

impl DocumentStore for InMemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    fn insert_entry(&self, draft: EntryDraft) -> Result<PresaleEntry, StoreError> {
        let (entry, delivery) = {
            let mut data = self.lock()?;
            let entry = PresaleEntry::from_draft(EntryId::generate(), draft, self.clock.now());
            entry
                .validate()
                .map_err(|detail| StoreError::new(StoreErrorCode::Validation, detail))?;
            data.entries.push(entry.clone());
            let batch = self.notifier.entries_changed(&data.entries);
            (entry, self.notifier.prepare(batch))
        };
        delivery.run();
        Ok(entry)
    }

    fn get_entry(&self, id: &EntryId) -> Result<PresaleEntry, StoreError> {
        self.lock()?
            .entries
            .iter()
            .find(|e| e.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::entry_not_found(id))
    }

    fn transition_entry(
        &self,
        id: &EntryId,
        transition: &EntryTransition,
    ) -> Result<PresaleEntry, StoreError> {
        let (entry, delivery) = {
            let mut data = self.lock()?;
            let resolved_at = self.clock.now();
            let slot = data
                .entries
                .iter_mut()
                .find(|e| e.id == *id)
                .ok_or_else(|| StoreError::entry_not_found(id))?;
            slot.apply(transition, resolved_at)?;
            let entry = slot.clone();
            let batch = self.notifier.entries_changed(&data.entries);
            (entry, self.notifier.prepare(batch))
        };
        delivery.run();
        Ok(entry)
    }

    fn list_entries(&self, scope: &EntryScope) -> Result<Vec<PresaleEntry>, StoreError> {
        Ok(scope.select(&self.lock()?.entries))
    }

    fn subscribe_entries(
        &self,
        scope: EntryScope,
        listener: EntryListener,
    ) -> Result<Subscription, StoreError> {
        let (subscription, delivery) = {
            let data = self.lock()?;
            let (subscription, batch) =
                self.notifier
                    .register_entries(scope, listener, &data.entries);
            (subscription, self.notifier.prepare(batch))
        };
        delivery.run();
        Ok(subscription)
    }

    fn get_setting(&self, key: &SettingKey) -> Result<Option<SettingRecord>, StoreError> {
        Ok(self.lock()?.settings.get(key).cloned())
    }

    fn put_setting(&self, key: &SettingKey, value: Value) -> Result<SettingRecord, StoreError> {
        let (record, delivery) = {
            let mut data = self.lock()?;
            let record = SettingRecord {
                value,
                updated_at: self.clock.now(),
            };
            data.settings.insert(key.clone(), record.clone());
            let batch = self.notifier.setting_changed(key, &record);
            (record, self.notifier.prepare(batch))
        };
        delivery.run();
        Ok(record)
    }

    fn subscribe_setting(
        &self,
        key: SettingKey,
        listener: SettingListener,
    ) -> Result<Subscription, StoreError> {
        let (subscription, delivery) = {
            let data = self.lock()?;
            let current = data.settings.get(&key).cloned();
            let (subscription, batch) =
                self.notifier
                    .register_setting(key, listener, current.as_ref());
            (subscription, self.notifier.prepare(batch))
        };
        delivery.run();
        Ok(subscription)
    }

    fn put_account(&self, user: &UserId, account: &UserAccount) -> Result<(), StoreError> {
        self.lock()?.users.insert(user.clone(), account.clone());
        Ok(())
    }

    fn get_account(&self, user: &UserId) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.lock()?.users.get(user).cloned())
    }

    fn insert_inquiry(&self, draft: InquiryDraft) -> Result<PartnershipInquiry, StoreError> {
        let mut data = self.lock()?;
        let inquiry =
            PartnershipInquiry::from_draft(InquiryId::generate(), draft, self.clock.now());
        data.inquiries.push(inquiry.clone());
        Ok(inquiry)
    }

    fn list_inquiries(&self) -> Result<Vec<PartnershipInquiry>, StoreError> {
        Ok(self.lock()?.inquiries.clone())
    }
}
