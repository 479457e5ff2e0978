// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use chrono::Utc;
use serde_json::{json, Value};
use soldium_api::convert::{admin_entries_response, countdown_response};
use soldium_core::{UserId, ENV_SOLDIUM_STORE};
use soldium_model::{parse_burn_date, CountdownSettings};
use soldium_query::{ReviewStats, StatusFilter};
use soldium_store::{DocumentStore, EntryScope, SettingKey, SqliteStore, StoreError, StoreErrorCode};

use crate::{CliError, OutputMode};

fn store_error(err: StoreError) -> CliError {
    match err.code {
        StoreErrorCode::NotFound => CliError {
            exit_code: soldium_core::ExitCode::Validation,
            machine: soldium_core::MachineError::new("not_found", &err.message),
        },
        StoreErrorCode::Unavailable | StoreErrorCode::Io => CliError::dependency(err.to_string()),
        _ => CliError::internal(err.to_string()),
    }
}

/// `--store` wins; otherwise `SOLDIUM_STORE` must name a sqlite store.
pub(crate) fn resolve_store_path(
    flag: Option<PathBuf>,
    env_value: Option<String>,
) -> Result<PathBuf, CliError> {
    if let Some(path) = flag {
        return Ok(path);
    }
    let raw = env_value.unwrap_or_default();
    let raw = raw.trim();
    match raw.strip_prefix("sqlite:") {
        Some(path) if !path.trim().is_empty() => Ok(PathBuf::from(path.trim())),
        _ if raw.is_empty() => Err(CliError::usage(
            "no store configured; pass --store <path> or set SOLDIUM_STORE=sqlite:<path>",
        )),
        _ => Err(CliError::usage(
            "SOLDIUM_STORE must be sqlite:<path> for operator commands",
        )),
    }
}

pub(crate) fn open_store(flag: Option<PathBuf>) -> Result<SqliteStore, CliError> {
    let path = resolve_store_path(flag, std::env::var(ENV_SOLDIUM_STORE).ok())?;
    if !path.exists() {
        return Err(CliError::dependency(format!(
            "store file {} does not exist",
            path.display()
        )));
    }
    SqliteStore::open(&path).map_err(store_error)
}

fn emit(payload: &Value, mode: OutputMode) -> Result<(), CliError> {
    let text = if mode.json {
        serde_json::to_string(payload)
    } else {
        serde_json::to_string_pretty(payload)
    }
    .map_err(|e| CliError::internal(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::internal(e.to_string()))
}

pub(crate) fn version(mode: OutputMode) -> Result<(), CliError> {
    emit(
        &json!({
            "name": "soldium",
            "version": env!("CARGO_PKG_VERSION"),
            "api_version": soldium_api::API_VERSION,
        }),
        mode,
    )
}

pub(crate) fn set_admin(
    store: &SqliteStore,
    user_id: &str,
    is_admin: bool,
    mode: OutputMode,
) -> Result<(), CliError> {
    let user = UserId::new(user_id).map_err(|e| CliError::validation(&e.to_string()))?;
    let account = store.set_admin(&user, is_admin).map_err(store_error)?;
    emit(
        &json!({
            "user_id": user.as_str(),
            "email": account.email,
            "is_admin": account.is_admin,
        }),
        mode,
    )
}

pub(crate) fn list_entries(
    store: &SqliteStore,
    filter: StatusFilter,
    mode: OutputMode,
) -> Result<(), CliError> {
    let entries = store.list_entries(&EntryScope::All).map_err(store_error)?;
    emit(&to_value(&admin_entries_response(entries, filter))?, mode)
}

pub(crate) fn entry_stats(store: &SqliteStore, mode: OutputMode) -> Result<(), CliError> {
    let entries = store.list_entries(&EntryScope::All).map_err(store_error)?;
    emit(&to_value(&ReviewStats::from_entries(&entries))?, mode)
}

fn load_settings(store: &SqliteStore) -> Result<CountdownSettings, CliError> {
    let record = store
        .get_setting(&SettingKey::countdown())
        .map_err(store_error)?;
    Ok(record.map_or_else(CountdownSettings::default, |r| {
        CountdownSettings::from_document(&r.value, Some(r.updated_at))
    }))
}

pub(crate) fn show_settings(store: &SqliteStore, mode: OutputMode) -> Result<(), CliError> {
    emit(&to_value(&load_settings(store)?)?, mode)
}

pub(crate) fn countdown(
    store: &SqliteStore,
    at: Option<&str>,
    mode: OutputMode,
) -> Result<(), CliError> {
    let now = match at {
        Some(raw) => parse_burn_date(raw)
            .ok_or_else(|| CliError::validation("--at must be an ISO-8601 timestamp"))?,
        None => Utc::now(),
    };
    let settings = load_settings(store)?;
    emit(&to_value(&countdown_response(&settings, now))?, mode)
}
