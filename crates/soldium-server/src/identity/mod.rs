// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use soldium_core::{Clock, UserId};
use soldium_model::{AuthError, MIN_PASSWORD_LEN};
use tokio::sync::Mutex;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Bearer session issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Email/password identity boundary. Implementations report failures only
/// through the fixed [`AuthError`] set.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;
    async fn reset_password(&self, email: &str) -> Result<(), AuthError>;
    async fn resolve(&self, token: &str) -> Result<Session, AuthError>;
    /// Removes an account whose sign-up could not be completed, together with
    /// its sessions.
    async fn withdraw(&self, session: &Session) -> Result<(), AuthError>;
}

/// Oldest reset requests are dropped beyond this many.
pub const RESET_OUTBOX_CAP: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRequest {
    pub email: String,
    pub requested_at: DateTime<Utc>,
}

struct Credential {
    user_id: UserId,
    email: String,
    salt: [u8; 16],
    digest: Vec<u8>,
}

#[derive(Default)]
struct Registry {
    by_email: HashMap<String, Credential>,
    sessions: HashMap<String, Session>,
    reset_outbox: Vec<PasswordResetRequest>,
}

/// In-process provider for development and tests. Passwords are kept as
/// HMAC-SHA256(pepper, salt || password); nothing survives a restart.
pub struct LocalIdentityProvider {
    pepper: Vec<u8>,
    session_ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    registry: Mutex<Registry>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

impl LocalIdentityProvider {
    #[must_use]
    pub fn new(pepper: &str, session_ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            pepper: pepper.as_bytes().to_vec(),
            session_ttl: chrono::Duration::from_std(session_ttl)
                .unwrap_or_else(|_| chrono::Duration::days(1)),
            clock,
            registry: Mutex::new(Registry::default()),
        }
    }

    fn mac(&self, salt: &[u8], password: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.pepper)
            .map_err(|e| AuthError::Failure(e.to_string()))?;
        mac.update(salt);
        mac.update(password.as_bytes());
        Ok(mac)
    }

    fn open_session(
        &self,
        registry: &mut Registry,
        user_id: &UserId,
        email: &str,
    ) -> Result<Session, AuthError> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.session_ttl)
            .ok_or_else(|| AuthError::Failure("session expiry out of range".to_string()))?;
        registry.sessions.retain(|_, s| s.expires_at > now);
        let session = Session {
            token: uuid::Uuid::new_v4().simple().to_string(),
            user_id: user_id.clone(),
            email: email.to_string(),
            expires_at,
        };
        registry
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    /// Reset requests recorded so far; no mail is sent by this provider.
    pub async fn reset_requests(&self) -> Vec<PasswordResetRequest> {
        self.registry.lock().await.reset_outbox.clone()
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let key = normalize_email(email);
        if !plausible_email(&key) {
            return Err(AuthError::Failure(format!("invalid email `{key}`")));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let mut registry = self.registry.lock().await;
        if registry.by_email.contains_key(&key) {
            return Err(AuthError::EmailAlreadyInUse);
        }
        let salt = *uuid::Uuid::new_v4().as_bytes();
        let digest = self.mac(&salt, password)?.finalize().into_bytes().to_vec();
        let user_id = UserId::generate();
        let session = self.open_session(&mut registry, &user_id, &key)?;
        registry.by_email.insert(
            key.clone(),
            Credential {
                user_id: user_id.clone(),
                email: key.clone(),
                salt,
                digest,
            },
        );
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let key = normalize_email(email);
        let mut registry = self.registry.lock().await;
        let (user_id, stored_email) = {
            let credential = registry
                .by_email
                .get(&key)
                .ok_or(AuthError::InvalidCredential)?;
            self.mac(&credential.salt, password)?
                .verify_slice(&credential.digest)
                .map_err(|_| AuthError::InvalidCredential)?;
            (credential.user_id.clone(), credential.email.clone())
        };
        self.open_session(&mut registry, &user_id, &stored_email)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.registry
            .lock()
            .await
            .sessions
            .remove(token)
            .map(|_| ())
            .ok_or(AuthError::InvalidSession)
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let key = normalize_email(email);
        let mut registry = self.registry.lock().await;
        if !registry.by_email.contains_key(&key) {
            return Err(AuthError::Failure(format!("no account for `{key}`")));
        }
        debug!(email = %key, "password reset requested");
        if registry.reset_outbox.len() >= RESET_OUTBOX_CAP {
            let overflow = registry.reset_outbox.len() + 1 - RESET_OUTBOX_CAP;
            registry.reset_outbox.drain(..overflow);
        }
        registry.reset_outbox.push(PasswordResetRequest {
            email: key,
            requested_at: self.clock.now(),
        });
        Ok(())
    }

    async fn resolve(&self, token: &str) -> Result<Session, AuthError> {
        let mut registry = self.registry.lock().await;
        let session = registry
            .sessions
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidSession)?;
        if session.expires_at <= self.clock.now() {
            registry.sessions.remove(token);
            return Err(AuthError::InvalidSession);
        }
        Ok(session)
    }

    async fn withdraw(&self, session: &Session) -> Result<(), AuthError> {
        let mut registry = self.registry.lock().await;
        let key = normalize_email(&session.email);
        let owned = registry
            .by_email
            .get(&key)
            .is_some_and(|c| c.user_id == session.user_id);
        if owned {
            registry.by_email.remove(&key);
        }
        registry.sessions.retain(|_, s| s.user_id != session.user_id);
        Ok(())
    }
}
