// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use soldium_core::{Clock, EntryId, InquiryId, SystemClock, UserId};
use soldium_model::{
    EntryDraft, EntryStatus, EntryTransition, InquiryDraft, PartnershipInquiry, PresaleEntry,
    UserAccount,
};
use tracing::warn;

use crate::backend::{
    DocumentStore, EntryListener, EntryScope, SettingKey, SettingListener, SettingRecord,
    StoreError, StoreErrorCode,
};
use crate::subscription::{Batch, Notifier, Subscription};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS presale_entries (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    user_id TEXT NOT NULL,
    user_email TEXT NOT NULL,
    payment_reference TEXT NOT NULL,
    solana_wallet TEXT NOT NULL,
    sol_amount REAL NOT NULL CHECK (sol_amount > 0),
    sodm_amount REAL NOT NULL CHECK (sodm_amount > 0),
    status TEXT NOT NULL CHECK (status IN ('pending','verified','rejected')),
    created_at TEXT NOT NULL,
    verified_at TEXT,
    rejection_reason TEXT
);
CREATE INDEX IF NOT EXISTS presale_entries_user ON presale_entries(user_id);
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS partnership_inquiries (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    document TEXT NOT NULL
);
";

const ENTRY_COLUMNS: &str = "id, user_id, user_email, payment_reference, solana_wallet, \
     sol_amount, sodm_amount, status, created_at, verified_at, rejection_reason";

/// Durable document store on a single SQLite file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

fn sql_err(e: rusqlite::Error) -> StoreError {
    let code = match &e {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                StoreErrorCode::Unavailable
            }
            rusqlite::ErrorCode::CannotOpen | rusqlite::ErrorCode::SystemIoFailure => {
                StoreErrorCode::Io
            }
            _ => StoreErrorCode::Internal,
        },
        _ => StoreErrorCode::Internal,
    };
    StoreError::new(code, e.to_string())
}

fn corrupt(detail: impl std::fmt::Display) -> StoreError {
    StoreError::new(StoreErrorCode::Internal, format!("corrupt document: {detail}"))
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(corrupt)
}

struct EntryRow {
    id: String,
    user_id: String,
    user_email: String,
    payment_reference: String,
    solana_wallet: String,
    sol_amount: f64,
    sodm_amount: f64,
    status: String,
    created_at: String,
    verified_at: Option<String>,
    rejection_reason: Option<String>,
}

impl EntryRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            user_email: row.get(2)?,
            payment_reference: row.get(3)?,
            solana_wallet: row.get(4)?,
            sol_amount: row.get(5)?,
            sodm_amount: row.get(6)?,
            status: row.get(7)?,
            created_at: row.get(8)?,
            verified_at: row.get(9)?,
            rejection_reason: row.get(10)?,
        })
    }

    fn into_entry(self) -> Result<PresaleEntry, StoreError> {
        let entry = PresaleEntry {
            id: EntryId::new(self.id).map_err(corrupt)?,
            user_id: UserId::new(self.user_id).map_err(corrupt)?,
            user_email: self.user_email,
            payment_reference: self.payment_reference,
            solana_wallet: self.solana_wallet,
            sol_amount: self.sol_amount,
            sodm_amount: self.sodm_amount,
            status: self.status.parse::<EntryStatus>().map_err(corrupt)?,
            created_at: parse_timestamp(&self.created_at)?,
            verified_at: self
                .verified_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            rejection_reason: self.rejection_reason,
        };
        entry.validate().map_err(corrupt)?;
        Ok(entry)
    }
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with_clock(path, Arc::new(SystemClock))
    }

    pub fn open_with_clock(path: &Path, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(sql_err)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;")
            .map_err(sql_err)?;
        Self::from_connection(conn, clock)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(sql_err)?;
        Self::from_connection(conn, Arc::new(SystemClock))
    }

    fn from_connection(conn: Connection, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(sql_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
            notifier: Notifier::new(),
            clock,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "sqlite connection lock poisoned"))
    }

    /// Flips the out-of-band admin flag of an existing `users` document.
    pub fn set_admin(&self, user: &UserId, is_admin: bool) -> Result<UserAccount, StoreError> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE users SET is_admin = ?1 WHERE user_id = ?2",
                params![is_admin, user.as_str()],
            )
            .map_err(sql_err)?;
        if changed == 0 {
            return Err(StoreError::new(
                StoreErrorCode::NotFound,
                format!("user {user} not found"),
            ));
        }
        read_account(&conn, user)?.ok_or_else(|| {
            StoreError::new(StoreErrorCode::NotFound, format!("user {user} not found"))
        })
    }
}

fn read_entries(conn: &Connection, scope: &EntryScope) -> Result<Vec<PresaleEntry>, StoreError> {
    let rows = match scope {
        EntryScope::All => {
            let mut stmt = conn
                .prepare(&format!("SELECT {ENTRY_COLUMNS} FROM presale_entries ORDER BY seq"))
                .map_err(sql_err)?;
            let rows = stmt
                .query_map([], EntryRow::read)
                .map_err(sql_err)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(sql_err)?;
            rows
        }
        EntryScope::Owner(user) => {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM presale_entries WHERE user_id = ?1 ORDER BY seq"
                ))
                .map_err(sql_err)?;
            let rows = stmt
                .query_map(params![user.as_str()], EntryRow::read)
                .map_err(sql_err)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(sql_err)?;
            rows
        }
    };
    rows.into_iter().map(EntryRow::into_entry).collect()
}

fn read_entry(conn: &Connection, id: &EntryId) -> Result<Option<PresaleEntry>, StoreError> {
    conn.query_row(
        &format!("SELECT {ENTRY_COLUMNS} FROM presale_entries WHERE id = ?1"),
        params![id.as_str()],
        EntryRow::read,
    )
    .optional()
    .map_err(sql_err)?
    .map(EntryRow::into_entry)
    .transpose()
}

fn read_setting(conn: &Connection, key: &SettingKey) -> Result<Option<SettingRecord>, StoreError> {
    let raw = conn
        .query_row(
            "SELECT value, updated_at FROM settings WHERE key = ?1",
            params![key.as_str()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()
        .map_err(sql_err)?;
    raw.map(|(value, updated_at)| {
        Ok(SettingRecord {
            value: serde_json::from_str(&value).map_err(corrupt)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    })
    .transpose()
}

fn read_account(conn: &Connection, user: &UserId) -> Result<Option<UserAccount>, StoreError> {
    let raw = conn
        .query_row(
            "SELECT email, is_admin, created_at FROM users WHERE user_id = ?1",
            params![user.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()
        .map_err(sql_err)?;
    raw.map(|(email, is_admin, created_at)| {
        Ok(UserAccount {
            email,
            is_admin,
            created_at: parse_timestamp(&created_at)?,
        })
    })
    .transpose()
}

impl SqliteStore {
    /// Listener batch for a write that is already committed. A failed re-read
    /// skips delivery instead of failing the write.
    fn entries_delivery(&self, conn: &Connection) -> Batch {
        if !self.notifier.has_entry_listeners() {
            return Batch::Entries(Vec::new());
        }
        match read_entries(conn, &EntryScope::All) {
            Ok(all) => self.notifier.entries_changed(&all),
            Err(err) => {
                warn!(error = %err, "entry listeners not notified after commit");
                Batch::Entries(Vec::new())
            }
        }
    }
}

impl DocumentStore for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    fn insert_entry(&self, draft: EntryDraft) -> Result<PresaleEntry, StoreError> {
        let (entry, delivery) = {
            let conn = self.lock()?;
            let entry = PresaleEntry::from_draft(EntryId::generate(), draft, self.clock.now());
            entry
                .validate()
                .map_err(|detail| StoreError::new(StoreErrorCode::Validation, detail))?;
            conn.execute(
                &format!(
                    "INSERT INTO presale_entries ({ENTRY_COLUMNS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, NULL)"
                ),
                params![
                    entry.id.as_str(),
                    entry.user_id.as_str(),
                    entry.user_email,
                    entry.payment_reference,
                    entry.solana_wallet,
                    entry.sol_amount,
                    entry.sodm_amount,
                    entry.status.as_str(),
                    timestamp(&entry.created_at),
                ],
            )
            .map_err(sql_err)?;
            let batch = self.entries_delivery(&conn);
            (entry, self.notifier.prepare(batch))
        };
        delivery.run();
        Ok(entry)
    }

    fn get_entry(&self, id: &EntryId) -> Result<PresaleEntry, StoreError> {
        read_entry(&*self.lock()?, id)?.ok_or_else(|| StoreError::entry_not_found(id))
    }

    fn transition_entry(
        &self,
        id: &EntryId,
        transition: &EntryTransition,
    ) -> Result<PresaleEntry, StoreError> {
        let (entry, delivery) = {
            let conn = self.lock()?;
            let mut entry = read_entry(&conn, id)?.ok_or_else(|| StoreError::entry_not_found(id))?;
            entry.apply(transition, self.clock.now())?;
            let changed = conn
                .execute(
                    "UPDATE presale_entries \
                     SET status = ?1, verified_at = ?2, rejection_reason = ?3 \
                     WHERE id = ?4 AND status = 'pending'",
                    params![
                        entry.status.as_str(),
                        entry.verified_at.as_ref().map(timestamp),
                        entry.rejection_reason,
                        id.as_str(),
                    ],
                )
                .map_err(sql_err)?;
            if changed == 0 {
                warn!(entry_id = %id, "pending precondition lost between read and update");
                return Err(StoreError::new(
                    StoreErrorCode::Conflict,
                    format!("entry {id} is no longer pending"),
                ));
            }
            let batch = self.entries_delivery(&conn);
            (entry, self.notifier.prepare(batch))
        };
        delivery.run();
        Ok(entry)
    }

    fn list_entries(&self, scope: &EntryScope) -> Result<Vec<PresaleEntry>, StoreError> {
        read_entries(&*self.lock()?, scope)
    }

    fn subscribe_entries(
        &self,
        scope: EntryScope,
        listener: EntryListener,
    ) -> Result<Subscription, StoreError> {
        let (subscription, delivery) = {
            let conn = self.lock()?;
            let current = read_entries(&conn, &scope)?;
            let (subscription, batch) = self.notifier.register_entries(scope, listener, &current);
            (subscription, self.notifier.prepare(batch))
        };
        delivery.run();
        Ok(subscription)
    }

    fn get_setting(&self, key: &SettingKey) -> Result<Option<SettingRecord>, StoreError> {
        read_setting(&*self.lock()?, key)
    }

    fn put_setting(&self, key: &SettingKey, value: Value) -> Result<SettingRecord, StoreError> {
        let (record, delivery) = {
            let conn = self.lock()?;
            let record = SettingRecord {
                value,
                updated_at: self.clock.now(),
            };
            let encoded = serde_json::to_string(&record.value)
                .map_err(|e| StoreError::new(StoreErrorCode::Validation, e.to_string()))?;
            conn.execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key.as_str(), encoded, timestamp(&record.updated_at)],
            )
            .map_err(sql_err)?;
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
            let conn = self.lock()?;
            let current = read_setting(&conn, &key)?;
            let (subscription, batch) =
                self.notifier
                    .register_setting(key, listener, current.as_ref());
            (subscription, self.notifier.prepare(batch))
        };
        delivery.run();
        Ok(subscription)
    }

    fn put_account(&self, user: &UserId, account: &UserAccount) -> Result<(), StoreError> {
        self.lock()?
            .execute(
                "INSERT INTO users (user_id, email, is_admin, created_at) VALUES (?1, ?2, ?3, ?4) \
                 ON CONFLICT(user_id) DO UPDATE SET email = excluded.email, \
                 is_admin = excluded.is_admin, created_at = excluded.created_at",
                params![
                    user.as_str(),
                    account.email,
                    account.is_admin,
                    timestamp(&account.created_at)
                ],
            )
            .map_err(sql_err)?;
        Ok(())
    }

    fn get_account(&self, user: &UserId) -> Result<Option<UserAccount>, StoreError> {
        read_account(&*self.lock()?, user)
    }

    fn insert_inquiry(&self, draft: InquiryDraft) -> Result<PartnershipInquiry, StoreError> {
        let conn = self.lock()?;
        let inquiry =
            PartnershipInquiry::from_draft(InquiryId::generate(), draft, self.clock.now());
        let document = serde_json::to_string(&inquiry)
            .map_err(|e| StoreError::new(StoreErrorCode::Validation, e.to_string()))?;
        conn.execute(
            "INSERT INTO partnership_inquiries (id, document) VALUES (?1, ?2)",
            params![inquiry.id.as_str(), document],
        )
        .map_err(sql_err)?;
        Ok(inquiry)
    }

    fn list_inquiries(&self) -> Result<Vec<PartnershipInquiry>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT document FROM partnership_inquiries ORDER BY seq")
            .map_err(sql_err)?;
        let docs = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(sql_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sql_err)?;
        docs.iter()
            .map(|doc| serde_json::from_str(doc).map_err(corrupt))
            .collect()
    }
}
