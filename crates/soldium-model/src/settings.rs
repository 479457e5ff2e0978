// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::validation::ValidationError;

/// Well-known key of the singleton countdown configuration.
pub const COUNTDOWN_SETTINGS_KEY: &str = "countdown";

pub const DEFAULT_BURN_DATE: &str = "2026-02-23T00:00:00Z";
pub const DEFAULT_BURN_AMOUNT: &str = "25,000,000 SODM";
pub const DEFAULT_BURN_INTERVAL: &str = "15 days";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountdownSettings {
    pub next_burn_date: DateTime<Utc>,
    pub burn_amount: String,
    pub burn_interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            next_burn_date: default_burn_date(),
            burn_amount: DEFAULT_BURN_AMOUNT.to_string(),
            burn_interval: DEFAULT_BURN_INTERVAL.to_string(),
            updated_at: None,
        }
    }
}

fn default_burn_date() -> DateTime<Utc> {
    parse_burn_date(DEFAULT_BURN_DATE).unwrap_or_default()
}

impl CountdownSettings {
    /// Stored shape of the settings document; `updated_at` is kept by the
    /// store beside the value.
    #[must_use]
    pub fn to_document(&self) -> Value {
        json!({
            "next_burn_date": self.next_burn_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            "burn_amount": self.burn_amount,
            "burn_interval": self.burn_interval,
        })
    }

    /// Reads a stored document, falling back to the defaults field by field
    /// for anything missing, blank or unparsable.
    #[must_use]
    pub fn from_document(value: &Value, updated_at: Option<DateTime<Utc>>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };
        Self {
            next_burn_date: text("next_burn_date")
                .and_then(parse_burn_date)
                .unwrap_or(defaults.next_burn_date),
            burn_amount: text("burn_amount")
                .map(ToString::to_string)
                .unwrap_or(defaults.burn_amount),
            burn_interval: text("burn_interval")
                .map(ToString::to_string)
                .unwrap_or(defaults.burn_interval),
            updated_at,
        }
    }
}

/// Admin form for the countdown; only the date is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountdownSettingsForm {
    #[serde(default)]
    pub next_burn_date: String,
    #[serde(default)]
    pub burn_amount: String,
    #[serde(default)]
    pub burn_interval: String,
}

impl CountdownSettingsForm {
    pub fn validate(&self) -> Result<CountdownSettings, ValidationError> {
        let raw = self.next_burn_date.trim();
        if raw.is_empty() {
            return Err(ValidationError::new(
                "next_burn_date",
                "Next burn date is required",
            ));
        }
        let next_burn_date = parse_burn_date(raw).ok_or_else(|| {
            ValidationError::new("next_burn_date", "Next burn date must be an ISO-8601 timestamp")
        })?;
        Ok(CountdownSettings {
            next_burn_date,
            burn_amount: self.burn_amount.trim().to_string(),
            burn_interval: self.burn_interval.trim().to_string(),
            updated_at: None,
        })
    }
}

/// Accepts RFC 3339 timestamps, or zone-less `YYYY-MM-DDTHH:MM[:SS]` read as UTC.
#[must_use]
pub fn parse_burn_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
