// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use soldium_api::convert::admin_entries_response;
use soldium_api::AdminEntriesResponseDto;
use soldium_core::EntryId;
use soldium_model::{
    CountdownSettings, CountdownSettingsForm, EntryTransition, PresaleEntry,
};
use soldium_query::{ReviewStats, StatusFilter};
use soldium_store::{DocumentStore, EntryScope, SettingKey, StoreError};
use tracing::{debug, info};

use super::live_view::LiveEntries;
use super::{run_store, ServiceError, AUDIT_TARGET};

/// Admin side of the workflow: one unscoped live view shared by every admin
/// request, status transitions, and the countdown settings document.
pub struct ReviewConsole {
    store: Arc<dyn DocumentStore>,
    entries: LiveEntries,
}

impl ReviewConsole {
    pub fn open(store: Arc<dyn DocumentStore>) -> Result<Self, StoreError> {
        let entries = LiveEntries::open(store.as_ref(), EntryScope::All)?;
        Ok(Self { store, entries })
    }

    #[must_use]
    pub fn live(&self) -> &LiveEntries {
        &self.entries
    }

    #[must_use]
    pub fn entries(&self, filter: StatusFilter) -> AdminEntriesResponseDto {
        admin_entries_response(self.entries.snapshot().as_ref().clone(), filter)
    }

    #[must_use]
    pub fn stats(&self) -> ReviewStats {
        self.entries.stats()
    }

    pub async fn verify(&self, id: EntryId) -> Result<PresaleEntry, ServiceError> {
        self.transition(id, EntryTransition::Verify).await
    }

    /// A blank or missing reason falls back to the default rejection reason.
    pub async fn reject(
        &self,
        id: EntryId,
        reason: Option<&str>,
    ) -> Result<PresaleEntry, ServiceError> {
        self.transition(id, EntryTransition::reject(reason)).await
    }

    async fn transition(
        &self,
        id: EntryId,
        transition: EntryTransition,
    ) -> Result<PresaleEntry, ServiceError> {
        let action = transition.target();
        let entry = run_store(&self.store, move |store| {
            store.transition_entry(&id, &transition)
        })
        .await?;
        info!(
            target: AUDIT_TARGET,
            event = "entry_resolved",
            entry_id = %entry.id,
            status = %action,
            rejection_reason = entry.rejection_reason.as_deref().unwrap_or(""),
            "presale entry resolved"
        );
        Ok(entry)
    }

    /// Stored countdown settings, or the defaults when nothing was saved yet.
    pub async fn load_settings(&self) -> Result<CountdownSettings, ServiceError> {
        let record = run_store(&self.store, |store| {
            store.get_setting(&SettingKey::countdown())
        })
        .await?;
        Ok(record.map_or_else(CountdownSettings::default, |r| {
            CountdownSettings::from_document(&r.value, Some(r.updated_at))
        }))
    }

    /// Overwrites the whole settings document.
    pub async fn save_settings(
        &self,
        form: CountdownSettingsForm,
    ) -> Result<CountdownSettings, ServiceError> {
        let settings = form.validate().map_err(|e| {
            debug!(field = %e.field, "countdown settings rejected");
            e
        })?;
        let document = settings.to_document();
        let record = run_store(&self.store, move |store| {
            store.put_setting(&SettingKey::countdown(), document)
        })
        .await?;
        let saved = CountdownSettings::from_document(&record.value, Some(record.updated_at));
        info!(
            target: AUDIT_TARGET,
            event = "settings_saved",
            next_burn_date = %saved.next_burn_date,
            "countdown settings saved"
        );
        Ok(saved)
    }
}
