// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use soldium_api::SessionDto;
use soldium_core::{Clock, UserId};
use soldium_model::{AuthError, AuthOperation, UserAccount};
use soldium_store::DocumentStore;
use tracing::{info, warn};

use super::{run_store, ServiceError, AUDIT_TARGET};
use crate::identity::{IdentityProvider, Session};

/// Authenticated principal of one request. `account` is read fresh from the
/// store, so admin grants take effect without a new session.
#[derive(Debug, Clone)]
pub struct Caller {
    pub session: Session,
    pub account: Option<UserAccount>,
}

impl Caller {
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.session.user_id
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.account.as_ref().is_some_and(|a| a.is_admin)
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("Admin access required"))
        }
    }
}

pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

fn session_dto(session: Session, is_admin: bool) -> SessionDto {
    SessionDto {
        token: session.token,
        user_id: session.user_id,
        email: session.email,
        is_admin,
        expires_at: session.expires_at,
    }
}

impl AccountService {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identity,
            store,
            clock,
        }
    }

    /// Creates the credential and provisions the matching `users` document
    /// with `is_admin = false`. The credential is withdrawn again when the
    /// document cannot be written.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SessionDto, ServiceError> {
        let session = self
            .identity
            .sign_up(email, password)
            .await
            .map_err(|e| ServiceError::Auth(e, AuthOperation::SignUp))?;
        let account = UserAccount::member(&session.email, self.clock.now());
        let user_id = session.user_id.clone();
        if let Err(err) =
            run_store(&self.store, move |store| store.put_account(&user_id, &account)).await
        {
            if let Err(rollback) = self.identity.withdraw(&session).await {
                warn!(user_id = %session.user_id, error = %rollback, "sign-up rollback failed");
            }
            return Err(err.into());
        }
        info!(
            target: AUDIT_TARGET,
            event = "account_provisioned",
            user_id = %session.user_id,
            "account provisioned"
        );
        Ok(session_dto(session, false))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionDto, ServiceError> {
        let session = self
            .identity
            .sign_in(email, password)
            .await
            .map_err(|e| ServiceError::Auth(e, AuthOperation::SignIn))?;
        let account = self.account_of(&session.user_id).await?;
        let is_admin = account.is_some_and(|a| a.is_admin);
        Ok(session_dto(session, is_admin))
    }

    pub async fn sign_out(&self, token: Option<&str>) -> Result<(), ServiceError> {
        let token = token.ok_or(ServiceError::Unauthenticated)?;
        match self.identity.sign_out(token).await {
            Ok(()) => Ok(()),
            Err(AuthError::InvalidSession) => Err(ServiceError::Unauthenticated),
            Err(e) => Err(ServiceError::Auth(e, AuthOperation::SignOut)),
        }
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), ServiceError> {
        self.identity
            .reset_password(email)
            .await
            .map_err(|e| ServiceError::Auth(e, AuthOperation::ResetPassword))
    }

    /// Resolves the bearer token and loads the caller's `users` document.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<Caller, ServiceError> {
        let token = token.ok_or(ServiceError::Unauthenticated)?;
        let session = self
            .identity
            .resolve(token)
            .await
            .map_err(|_| ServiceError::Unauthenticated)?;
        let account = self.account_of(&session.user_id).await?;
        Ok(Caller { session, account })
    }

    async fn account_of(&self, user: &UserId) -> Result<Option<UserAccount>, ServiceError> {
        let user = user.clone();
        Ok(run_store(&self.store, move |store| store.get_account(&user)).await?)
    }
}
