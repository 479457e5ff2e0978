// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use soldium_model::{PresaleEntry, PresaleTerms, SubmissionForm};
use soldium_store::{DocumentStore, EntryScope};
use tracing::{debug, info};

use super::accounts::Caller;
use super::live_view::LiveEntries;
use super::{run_store, ServiceError, AUDIT_TARGET};

/// Entry intake for signed-in members, plus their own-entries view.
pub struct SubmissionDesk {
    store: Arc<dyn DocumentStore>,
    terms: PresaleTerms,
}

impl SubmissionDesk {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, terms: PresaleTerms) -> Self {
        Self { store, terms }
    }

    #[must_use]
    pub fn terms(&self) -> &PresaleTerms {
        &self.terms
    }

    /// Validates the form and writes a pending entry. Nothing is written when
    /// any field is rejected.
    pub async fn submit(
        &self,
        caller: &Caller,
        form: SubmissionForm,
    ) -> Result<PresaleEntry, ServiceError> {
        if caller.is_admin() {
            return Err(ServiceError::Forbidden(
                "Admin accounts cannot submit presale entries",
            ));
        }
        let draft = form
            .validate()
            .and_then(|validated| {
                validated.into_draft(caller.user_id().clone(), &caller.session.email, &self.terms)
            })
            .map_err(|e| {
                debug!(field = %e.field, user_id = %caller.user_id(), "submission rejected");
                e
            })?;
        let entry = run_store(&self.store, move |store| store.insert_entry(draft)).await?;
        info!(
            target: AUDIT_TARGET,
            event = "entry_submitted",
            entry_id = %entry.id,
            user_id = %entry.user_id,
            sol_amount = entry.sol_amount,
            sodm_amount = entry.sodm_amount,
            "presale entry submitted"
        );
        Ok(entry)
    }

    /// Point-in-time read of the caller's entries, in storage order.
    pub async fn own_entries(&self, caller: &Caller) -> Result<Vec<PresaleEntry>, ServiceError> {
        let scope = EntryScope::Owner(caller.user_id().clone());
        Ok(run_store(&self.store, move |store| store.list_entries(&scope)).await?)
    }

    /// Live view over the caller's entries only.
    pub async fn watch_own(&self, caller: &Caller) -> Result<LiveEntries, ServiceError> {
        let scope = EntryScope::Owner(caller.user_id().clone());
        Ok(run_store(&self.store, move |store| LiveEntries::open(store, scope)).await?)
    }
}
