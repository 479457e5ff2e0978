#![forbid(unsafe_code)]

mod backend;
mod memory;
mod sqlite;
mod subscription;

pub use backend::{
    DocumentStore, EntryListener, EntryScope, SettingKey, SettingListener, SettingRecord,
    StoreError, StoreErrorCode,
};
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use subscription::Subscription;

pub const CRATE_NAME: &str = "soldium-store";
