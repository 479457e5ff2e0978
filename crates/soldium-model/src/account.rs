// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const MIN_PASSWORD_LEN: usize = 6;

/// `users` document. `is_admin` is only ever set out-of-band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAccount {
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    #[must_use]
    pub fn member(email: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            email: email.to_string(),
            is_admin: false,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    SignIn,
    SignUp,
    SignOut,
    ResetPassword,
}

/// Identity provider failures, reduced to what the UI may learn.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    InvalidCredential,
    EmailAlreadyInUse,
    WeakPassword,
    InvalidSession,
    Failure(String),
}

impl AuthError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "invalid_credential",
            Self::EmailAlreadyInUse => "email_already_in_use",
            Self::WeakPassword => "weak_password",
            Self::InvalidSession => "invalid_session",
            Self::Failure(_) => "failure",
        }
    }

    /// Fixed user-facing message; provider detail never leaks through here.
    #[must_use]
    pub fn user_message(&self, operation: AuthOperation) -> &'static str {
        match self {
            Self::InvalidCredential => "Invalid email or password",
            Self::EmailAlreadyInUse => "Email already in use",
            Self::WeakPassword => "Password is too weak",
            Self::InvalidSession => "Please sign in to continue",
            Self::Failure(_) => match operation {
                AuthOperation::SignIn => "Failed to sign in. Please try again.",
                AuthOperation::SignUp => "Failed to create account. Please try again.",
                AuthOperation::SignOut => "Failed to sign out. Please try again.",
                AuthOperation::ResetPassword => {
                    "Failed to send reset email. Please check your email address."
                }
            },
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failure(detail) => write!(f, "failure: {detail}"),
            other => f.write_str(other.code()),
        }
    }
}

impl std::error::Error for AuthError {}
