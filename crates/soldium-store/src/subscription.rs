// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use soldium_model::PresaleEntry;

use crate::backend::{EntryListener, EntryScope, SettingKey, SettingListener, SettingRecord};

type Slots<S, L> = Mutex<BTreeMap<u64, (S, L)>>;

/// Live-query registration; the listener is removed when this is dropped.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

struct ListenerHub<S, L> {
    next_id: AtomicU64,
    slots: Arc<Slots<S, L>>,
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S, L> ListenerHub<S, L>
where
    S: Clone + Send + 'static,
    L: Clone + Send + 'static,
{
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            slots: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    fn register(&self, scope: S, listener: L) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        relock(&self.slots).insert(id, (scope, listener));
        let slots: Weak<Slots<S, L>> = Arc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = slots.upgrade() {
                relock(&slots).remove(&id);
            }
        })
    }

    fn targets(&self) -> Vec<(S, L)> {
        relock(&self.slots).values().cloned().collect()
    }

    fn len(&self) -> usize {
        relock(&self.slots).len()
    }
}

pub(crate) enum Batch {
    Entries(Vec<(EntryListener, Vec<PresaleEntry>)>),
    Setting(Vec<(SettingListener, Option<SettingRecord>)>),
}

/// Listener calls held behind the delivery lock so that commits are observed
/// in the order they happened.
pub(crate) struct Delivery<'a> {
    _order: MutexGuard<'a, ()>,
    batch: Batch,
}

impl Delivery<'_> {
    pub(crate) fn run(self) {
        match &self.batch {
            Batch::Entries(calls) => {
                for (listener, snapshot) in calls {
                    listener(snapshot);
                }
            }
            Batch::Setting(calls) => {
                for (listener, record) in calls {
                    listener(record.as_ref());
                }
            }
        }
    }
}

/// Subscriber registry shared by the store backends.
///
/// Backends build a batch while holding their data lock, take the delivery
/// lock with [`Notifier::prepare`], release the data lock, then run the batch.
pub(crate) struct Notifier {
    entries: ListenerHub<EntryScope, EntryListener>,
    settings: ListenerHub<SettingKey, SettingListener>,
    delivery: Mutex<()>,
}

impl Notifier {
    pub(crate) fn new() -> Self {
        Self {
            entries: ListenerHub::new(),
            settings: ListenerHub::new(),
            delivery: Mutex::new(()),
        }
    }

    pub(crate) fn register_entries(
        &self,
        scope: EntryScope,
        listener: EntryListener,
        current: &[PresaleEntry],
    ) -> (Subscription, Batch) {
        let snapshot = scope.select(current);
        let subscription = self.entries.register(scope, Arc::clone(&listener));
        (subscription, Batch::Entries(vec![(listener, snapshot)]))
    }

    pub(crate) fn register_setting(
        &self,
        key: SettingKey,
        listener: SettingListener,
        current: Option<&SettingRecord>,
    ) -> (Subscription, Batch) {
        let subscription = self.settings.register(key, Arc::clone(&listener));
        (
            subscription,
            Batch::Setting(vec![(listener, current.cloned())]),
        )
    }

    pub(crate) fn has_entry_listeners(&self) -> bool {
        self.entries.len() > 0
    }

    pub(crate) fn entries_changed(&self, all: &[PresaleEntry]) -> Batch {
        Batch::Entries(
            self.entries
                .targets()
                .into_iter()
                .map(|(scope, listener)| (listener, scope.select(all)))
                .collect(),
        )
    }

    pub(crate) fn setting_changed(&self, key: &SettingKey, record: &SettingRecord) -> Batch {
        Batch::Setting(
            self.settings
                .targets()
                .into_iter()
                .filter(|(k, _)| k == key)
                .map(|(_, listener)| (listener, Some(record.clone())))
                .collect(),
        )
    }

    pub(crate) fn prepare(&self, batch: Batch) -> Delivery<'_> {
        Delivery {
            _order: relock(&self.delivery),
            batch,
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.entries.len() + self.settings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn dropping_subscription_removes_listener() {
        let notifier = Notifier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let listener: EntryListener = Arc::new(move |_: &[PresaleEntry]| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let (sub, initial) = notifier.register_entries(EntryScope::All, listener, &[]);
        notifier.prepare(initial).run();
        assert_eq!(notifier.subscriber_count(), 1);

        drop(sub);
        assert_eq!(notifier.subscriber_count(), 0);
        notifier.prepare(notifier.entries_changed(&[])).run();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_unsubscribe_is_equivalent_to_drop() {
        let notifier = Notifier::new();
        let listener: SettingListener = Arc::new(|_: Option<&SettingRecord>| {});
        let (sub, _) = notifier.register_setting(SettingKey::countdown(), listener, None);
        sub.unsubscribe();
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
