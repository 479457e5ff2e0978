// SPDX-License-Identifier: Apache-2.0

use serde_json::json;
use soldium_core::UserId;
use soldium_model::{EntryDraft, EntryStatus, EntryTransition, PresaleEntry};
use soldium_store::{
    DocumentStore, EntryScope, InMemoryStore, SettingKey, SettingRecord, SqliteStore,
};
use std::sync::{Arc, Mutex};

fn draft(user: &str) -> EntryDraft {
    EntryDraft {
        user_id: UserId::new(user).expect("user id"),
        user_email: format!("{user}@example.com"),
        payment_reference: "sig".to_string(),
        solana_wallet: "9".repeat(40),
        sol_amount: 1.0,
        sodm_amount: 200_000.0,
    }
}

type Seen = Arc<Mutex<Vec<Vec<PresaleEntry>>>>;

fn recorder() -> (Seen, soldium_store::EntryListener) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (
        seen,
        Arc::new(move |entries: &[PresaleEntry]| {
            sink.lock().expect("lock").push(entries.to_vec());
        }),
    )
}

fn exercise(store: &dyn DocumentStore) {
    let (admin_seen, admin_listener) = recorder();
    let (user_seen, user_listener) = recorder();
    let admin = store
        .subscribe_entries(EntryScope::All, admin_listener)
        .expect("subscribe all");
    let user = store
        .subscribe_entries(
            EntryScope::Owner(UserId::new("alice").expect("id")),
            user_listener,
        )
        .expect("subscribe owner");

    let entry = store.insert_entry(draft("alice")).expect("insert");
    store.insert_entry(draft("bob")).expect("insert");
    store
        .transition_entry(&entry.id, &EntryTransition::Verify)
        .expect("verify");

    {
        let admin_seen = admin_seen.lock().expect("lock");
        let counts: Vec<usize> = admin_seen.iter().map(Vec::len).collect();
        assert_eq!(counts, vec![0, 1, 2, 2], "{}", store.backend_tag());
        let last = admin_seen.last().expect("last");
        assert!(last
            .iter()
            .any(|e| e.id == entry.id && e.status == EntryStatus::Verified));
    }
    {
        let user_seen = user_seen.lock().expect("lock");
        let last = user_seen.last().expect("last");
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].status, EntryStatus::Verified);
        assert!(user_seen.iter().flatten().all(|e| e.user_id.as_str() == "alice"));
    }

    drop(admin);
    user.unsubscribe();
    let before = admin_seen.lock().expect("lock").len();
    store.insert_entry(draft("alice")).expect("insert");
    assert_eq!(admin_seen.lock().expect("lock").len(), before);
}

#[test]
fn memory_store_delivers_scoped_snapshots_in_commit_order() {
    let store = InMemoryStore::new();
    exercise(&store);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn sqlite_store_delivers_scoped_snapshots_in_commit_order() {
    let store = SqliteStore::open_in_memory().expect("open");
    exercise(&store);
}

#[test]
fn setting_listeners_see_current_value_then_each_save() {
    let store = InMemoryStore::new();
    let seen: Arc<Mutex<Vec<Option<SettingRecord>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = store
        .subscribe_setting(
            SettingKey::countdown(),
            Arc::new(move |record: Option<&SettingRecord>| sink.lock().expect("lock").push(record.cloned())),
        )
        .expect("subscribe");

    store
        .put_setting(&SettingKey::new("other"), json!({"x": 1}))
        .expect("put other");
    store
        .put_setting(&SettingKey::countdown(), json!({"burn_interval": "7 days"}))
        .expect("put countdown");

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 2);
    assert!(seen[0].is_none());
    assert_eq!(
        seen[1].as_ref().expect("record").value["burn_interval"],
        "7 days"
    );
}
