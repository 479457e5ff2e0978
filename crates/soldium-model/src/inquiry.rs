// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use soldium_core::InquiryId;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnershipPackage {
    Starter,
    Professional,
    Enterprise,
}

impl PartnershipPackage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }
}

impl FromStr for PartnershipPackage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starter" => Ok(Self::Starter),
            "professional" => Ok(Self::Professional),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(format!("unknown partnership package `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    Pending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InquiryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telegram: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub package: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InquiryDraft {
    pub name: String,
    pub email: String,
    pub telegram: String,
    pub project_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PartnershipPackage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartnershipInquiry {
    pub id: InquiryId,
    pub name: String,
    pub email: String,
    pub telegram: String,
    pub project_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PartnershipPackage>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

impl PartnershipInquiry {
    #[must_use]
    pub fn from_draft(id: InquiryId, draft: InquiryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            telegram: draft.telegram,
            project_name: draft.project_name,
            description: draft.description,
            package: draft.package,
            status: InquiryStatus::Pending,
            created_at,
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

fn required(field: &str, value: &str, message: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new(field, message));
    }
    Ok(value.to_string())
}

impl InquiryForm {
    pub fn validate(&self) -> Result<InquiryDraft, ValidationError> {
        let name = required("name", &self.name, "Full name is required")?;
        let email = required("email", &self.email, "Email address is required")?;
        if !looks_like_email(&email) {
            return Err(ValidationError::new("email", "Email address is invalid"));
        }
        let telegram = required("telegram", &self.telegram, "Telegram username is required")?;
        let project_name = required("project_name", &self.project_name, "Project name is required")?;
        let description = required(
            "description",
            &self.description,
            "Project description is required",
        )?;
        let package = match self.package.trim() {
            "" => None,
            raw => Some(
                raw.parse::<PartnershipPackage>()
                    .map_err(|_| ValidationError::new("package", "Unknown package"))?,
            ),
        };
        Ok(InquiryDraft {
            name,
            email,
            telegram,
            project_name,
            description,
            package,
        })
    }
}
