// SPDX-License-Identifier: Apache-2.0

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use soldium_core::{Clock, EntryId, FixedClock, UserId};
use soldium_model::{
    EntryDraft, EntryStatus, EntryTransition, InquiryForm, UserAccount, DEFAULT_REJECTION_REASON,
};
use soldium_store::{
    DocumentStore, EntryScope, InMemoryStore, SettingKey, SqliteStore, StoreErrorCode,
};
use std::sync::Arc;
use tempfile::tempdir;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap(),
    ))
}

fn draft(user: &str, sol: f64) -> EntryDraft {
    EntryDraft {
        user_id: UserId::new(user).expect("user id"),
        user_email: format!("{user}@example.com"),
        payment_reference: format!("sig-{user}-{sol}"),
        solana_wallet: "7".repeat(44),
        sol_amount: sol,
        sodm_amount: sol * 200_000.0,
    }
}

fn backends(clock: &Arc<FixedClock>) -> Vec<(Box<dyn DocumentStore>, tempfile::TempDir)> {
    let dir = tempdir().expect("tempdir");
    let sqlite = SqliteStore::open_with_clock(&dir.path().join("soldium.db"), clock.clone())
        .expect("open sqlite");
    vec![
        (
            Box::new(InMemoryStore::with_clock(clock.clone())) as Box<dyn DocumentStore>,
            tempdir().expect("tempdir"),
        ),
        (Box::new(sqlite), dir),
    ]
}

#[test]
fn insert_assigns_id_and_server_timestamp() {
    let clock = clock();
    for (store, _dir) in backends(&clock) {
        let entry = store.insert_entry(draft("alice", 2.0)).expect("insert");
        assert_eq!(entry.status, EntryStatus::Pending, "{}", store.backend_tag());
        assert_eq!(entry.created_at, clock.now());
        assert_eq!(entry.sodm_amount, 400_000.0);
        let loaded = store.get_entry(&entry.id).expect("get");
        assert_eq!(loaded, entry, "{}", store.backend_tag());
    }
}

#[test]
fn owner_scope_only_sees_own_entries() {
    let clock = clock();
    for (store, _dir) in backends(&clock) {
        store.insert_entry(draft("alice", 1.0)).expect("insert");
        store.insert_entry(draft("bob", 2.0)).expect("insert");
        store.insert_entry(draft("alice", 3.0)).expect("insert");

        let alice = store
            .list_entries(&EntryScope::Owner(UserId::new("alice").expect("id")))
            .expect("list");
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|e| e.user_id.as_str() == "alice"));
        assert_eq!(store.list_entries(&EntryScope::All).expect("list").len(), 3);
    }
}

#[test]
fn transitions_apply_once_and_then_conflict() {
    let clock = clock();
    for (store, _dir) in backends(&clock) {
        let a = store.insert_entry(draft("alice", 1.0)).expect("insert");
        let b = store.insert_entry(draft("alice", 1.0)).expect("insert");
        clock.advance(Duration::minutes(10));

        let verified = store
            .transition_entry(&a.id, &EntryTransition::Verify)
            .expect("verify");
        assert_eq!(verified.status, EntryStatus::Verified);
        assert_eq!(verified.verified_at, Some(clock.now()));
        assert!(verified.rejection_reason.is_none());

        let rejected = store
            .transition_entry(&b.id, &EntryTransition::reject(Some("  ")))
            .expect("reject");
        assert_eq!(
            rejected.rejection_reason.as_deref(),
            Some(DEFAULT_REJECTION_REASON)
        );

        let err = store
            .transition_entry(&a.id, &EntryTransition::reject(Some("late")))
            .expect_err("terminal");
        assert_eq!(err.code, StoreErrorCode::Conflict, "{}", store.backend_tag());
        let still = store.get_entry(&a.id).expect("get");
        assert_eq!(still.status, EntryStatus::Verified);
        assert!(still.rejection_reason.is_none());
    }
}

#[test]
fn non_finite_allocations_never_reach_storage() {
    let clock = clock();
    for (store, _dir) in backends(&clock) {
        let mut overflowing = draft("mallory", 1e304);
        overflowing.sodm_amount = overflowing.sol_amount * 200_000.0;
        let err = store.insert_entry(overflowing).expect_err("refused");
        assert_eq!(err.code, StoreErrorCode::Validation, "{}", store.backend_tag());

        store.insert_entry(draft("alice", 1.0)).expect("insert");
        let all = store.list_entries(&EntryScope::All).expect("unscoped read");
        assert_eq!(all.len(), 1, "{}", store.backend_tag());
    }
}

#[test]
fn unknown_entry_is_not_found() {
    let clock = clock();
    for (store, _dir) in backends(&clock) {
        let missing = EntryId::new("missing").expect("id");
        assert_eq!(
            store.get_entry(&missing).expect_err("missing").code,
            StoreErrorCode::NotFound
        );
        assert_eq!(
            store
                .transition_entry(&missing, &EntryTransition::Verify)
                .expect_err("missing")
                .code,
            StoreErrorCode::NotFound
        );
    }
}

#[test]
fn settings_are_overwritten_wholesale() {
    let clock = clock();
    for (store, _dir) in backends(&clock) {
        let key = SettingKey::countdown();
        assert!(store.get_setting(&key).expect("get").is_none());

        store
            .put_setting(&key, json!({"next_burn_date": "2026-03-01T00:00:00Z", "burn_amount": "1"}))
            .expect("put");
        clock.advance(Duration::seconds(30));
        let second = store
            .put_setting(&key, json!({"next_burn_date": "2026-04-01T00:00:00Z"}))
            .expect("put");

        let loaded = store.get_setting(&key).expect("get").expect("present");
        assert_eq!(loaded, second);
        assert!(loaded.value.get("burn_amount").is_none());
        assert_eq!(loaded.updated_at, clock.now());
    }
}

#[test]
fn accounts_and_inquiries_persist() {
    let clock = clock();
    for (store, _dir) in backends(&clock) {
        let user = UserId::new("carol").expect("id");
        store
            .put_account(&user, &UserAccount::member("carol@example.com", clock.now()))
            .expect("put account");
        let account = store.get_account(&user).expect("get").expect("present");
        assert!(!account.is_admin);

        let draft = InquiryForm {
            name: "Carol".to_string(),
            email: "carol@example.com".to_string(),
            telegram: "@carol".to_string(),
            project_name: "Relay".to_string(),
            description: "Bridge".to_string(),
            package: String::new(),
        }
        .validate()
        .expect("valid inquiry");
        let stored = store.insert_inquiry(draft).expect("insert inquiry");
        assert_eq!(store.list_inquiries().expect("list"), vec![stored]);
    }
}

#[test]
fn sqlite_store_survives_reopen_and_grants_admin_out_of_band() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("soldium.db");
    let user = UserId::new("dave").expect("id");
    let id = {
        let store = SqliteStore::open(&path).expect("open");
        store
            .put_account(&user, &UserAccount::member("dave@example.com", Utc::now()))
            .expect("account");
        store.insert_entry(draft("dave", 0.5)).expect("insert").id
    };

    let store = SqliteStore::open(&path).expect("reopen");
    assert_eq!(store.get_entry(&id).expect("get").sol_amount, 0.5);
    let granted = store.set_admin(&user, true).expect("grant");
    assert!(granted.is_admin);
    assert_eq!(
        store
            .set_admin(&UserId::new("nobody").expect("id"), true)
            .expect_err("missing user")
            .code,
        StoreErrorCode::NotFound
    );
}

#[test]
fn offline_memory_store_writes_nothing() {
    let store = InMemoryStore::new();
    store.set_offline(true);
    assert_eq!(
        store.insert_entry(draft("erin", 1.0)).expect_err("offline").code,
        StoreErrorCode::Unavailable
    );
    store.set_offline(false);
    assert!(store.list_entries(&EntryScope::All).expect("list").is_empty());
}
