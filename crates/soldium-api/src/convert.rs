use crate::dto::{AdminEntriesResponseDto, CountdownResponseDto, EntriesResponseDto, EntryDto};
use crate::errors::{ApiError, ApiErrorCode};
use chrono::{DateTime, Utc};
use serde_json::json;
use soldium_model::{AuthError, AuthOperation, CountdownSettings, PresaleEntry, ValidationError};
use soldium_query::{sort_newest_first, time_remaining, ReviewStats, StatusFilter};

impl From<&ValidationError> for ApiError {
    fn from(value: &ValidationError) -> Self {
        ApiError::validation_failed(&value.field, &value.message)
    }
}

#[must_use]
pub fn auth_error(error: &AuthError, operation: AuthOperation) -> ApiError {
    let code = match error {
        AuthError::InvalidCredential => ApiErrorCode::InvalidCredential,
        AuthError::EmailAlreadyInUse => ApiErrorCode::EmailAlreadyInUse,
        AuthError::WeakPassword => ApiErrorCode::WeakPassword,
        AuthError::InvalidSession => ApiErrorCode::Unauthenticated,
        _ => ApiErrorCode::AuthFailed,
    };
    ApiError::new(code, error.user_message(operation), json!({}), "req-unknown")
}

/// Owner view: newest first, every entry with its explorer links.
#[must_use]
pub fn entries_response(mut entries: Vec<PresaleEntry>) -> EntriesResponseDto {
    sort_newest_first(&mut entries);
    EntriesResponseDto {
        entries: entries.into_iter().map(EntryDto::from).collect(),
    }
}

/// Admin view: aggregates over the full set, entries narrowed by `filter`.
#[must_use]
pub fn admin_entries_response(
    mut entries: Vec<PresaleEntry>,
    filter: StatusFilter,
) -> AdminEntriesResponseDto {
    sort_newest_first(&mut entries);
    let stats = ReviewStats::from_entries(&entries);
    AdminEntriesResponseDto {
        filter,
        stats,
        entries: entries
            .into_iter()
            .filter(|e| filter.admits(e.status))
            .map(EntryDto::from)
            .collect(),
    }
}

#[must_use]
pub fn countdown_response(settings: &CountdownSettings, now: DateTime<Utc>) -> CountdownResponseDto {
    CountdownResponseDto {
        now,
        next_burn_date: settings.next_burn_date,
        burn_amount: settings.burn_amount.clone(),
        burn_interval: settings.burn_interval.clone(),
        countdown: time_remaining(now, settings.next_burn_date),
    }
}
