// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use soldium_model::PresaleEntry;
use soldium_query::{sort_newest_first, ReviewStats, StatusFilter};
use soldium_store::{DocumentStore, EntryScope, StoreError, Subscription};
use tokio::sync::watch;

pub type EntrySnapshot = Arc<Vec<PresaleEntry>>;

/// Live, newest-first view over a scope of `presale_entries`.
///
/// The store pushes every committed change into a watch channel; readers only
/// ever see whole snapshots. Dropping the view ends the subscription.
pub struct LiveEntries {
    scope: EntryScope,
    rx: watch::Receiver<EntrySnapshot>,
    _subscription: Subscription,
}

impl LiveEntries {
    pub fn open(store: &dyn DocumentStore, scope: EntryScope) -> Result<Self, StoreError> {
        let (tx, rx) = watch::channel::<EntrySnapshot>(Arc::new(Vec::new()));
        let subscription = store.subscribe_entries(
            scope.clone(),
            Arc::new(move |entries: &[PresaleEntry]| {
                let mut sorted = entries.to_vec();
                sort_newest_first(&mut sorted);
                tx.send_replace(Arc::new(sorted));
            }),
        )?;
        Ok(Self {
            scope,
            rx,
            _subscription: subscription,
        })
    }

    #[must_use]
    pub fn scope(&self) -> &EntryScope {
        &self.scope
    }

    #[must_use]
    pub fn snapshot(&self) -> EntrySnapshot {
        Arc::clone(&self.rx.borrow())
    }

    /// Aggregates recomputed from the current snapshot.
    #[must_use]
    pub fn stats(&self) -> ReviewStats {
        ReviewStats::from_entries(self.snapshot().iter())
    }

    #[must_use]
    pub fn filtered(&self, filter: StatusFilter) -> Vec<PresaleEntry> {
        self.snapshot()
            .iter()
            .filter(|e| filter.admits(e.status))
            .cloned()
            .collect()
    }

    /// Independent receiver that observes every later snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<EntrySnapshot> {
        self.rx.clone()
    }
}
