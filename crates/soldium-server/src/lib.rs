#![forbid(unsafe_code)]
//! HTTP service for presale submissions, admin review, partnership inquiries
//! and the burn countdown.

use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use soldium_core::Clock;
use soldium_store::{DocumentStore, StoreError};

pub mod config;
mod http;
pub mod identity;
mod middleware;
pub mod services;

pub use config::{ServerConfig, StoreBackendSpec};
pub use http::request_tracing::RequestTrace;
pub use identity::{IdentityProvider, LocalIdentityProvider, Session};
pub use services::accounts::{AccountService, Caller};
pub use services::countdown::CountdownBoard;
pub use services::live_view::{EntrySnapshot, LiveEntries};
pub use services::partnership::PartnershipDesk;
pub use services::review::ReviewConsole;
pub use services::submission::SubmissionDesk;
pub use services::{ServiceError, AUDIT_TARGET};

pub const CRATE_NAME: &str = "soldium-server";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub clock: Arc<dyn Clock>,
    pub accounts: Arc<AccountService>,
    pub submissions: Arc<SubmissionDesk>,
    pub review: Arc<ReviewConsole>,
    pub partnerships: Arc<PartnershipDesk>,
    pub countdown: Arc<CountdownBoard>,
    pub ready: Arc<AtomicBool>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    /// Wires the services over one store. Must be called inside a Tokio
    /// runtime: the countdown ticker is spawned here.
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let review = ReviewConsole::open(Arc::clone(&store))?;
        let countdown =
            CountdownBoard::start(store.as_ref(), Arc::clone(&clock), config.countdown_tick)?;
        Ok(Self {
            accounts: Arc::new(AccountService::new(
                identity,
                Arc::clone(&store),
                Arc::clone(&clock),
            )),
            submissions: Arc::new(SubmissionDesk::new(
                Arc::clone(&store),
                config.terms.clone(),
            )),
            review: Arc::new(review),
            partnerships: Arc::new(PartnershipDesk::new(Arc::clone(&store))),
            countdown: Arc::new(countdown),
            ready: Arc::new(AtomicBool::new(true)),
            request_id_seed: Arc::new(AtomicU64::new(1)),
            config: Arc::new(config),
            store,
            clock,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    Router::new()
        .route("/healthz", get(http::public::healthz_handler))
        .route("/readyz", get(http::public::readyz_handler))
        .route("/v1/version", get(http::public::version_handler))
        .route("/v1/presale/terms", get(http::public::terms_handler))
        .route("/v1/presale/quote", get(http::public::quote_handler))
        .route("/v1/countdown", get(http::public::countdown_handler))
        .route(
            "/v1/partnership-inquiries",
            post(http::public::submit_inquiry_handler),
        )
        .route("/v1/auth/sign-up", post(http::auth::sign_up_handler))
        .route("/v1/auth/sign-in", post(http::auth::sign_in_handler))
        .route("/v1/auth/sign-out", post(http::auth::sign_out_handler))
        .route(
            "/v1/auth/reset-password",
            post(http::auth::reset_password_handler),
        )
        .route("/v1/me", get(http::auth::me_handler))
        .route(
            "/v1/entries",
            get(http::entries::own_entries_handler).post(http::entries::submit_entry_handler),
        )
        .route(
            "/v1/admin/entries",
            get(http::admin::admin_entries_handler),
        )
        .route("/v1/admin/stats", get(http::admin::admin_stats_handler))
        .route(
            "/v1/admin/entries/:id/verify",
            post(http::admin::verify_entry_handler),
        )
        .route(
            "/v1/admin/entries/:id/reject",
            post(http::admin::reject_entry_handler),
        )
        .route(
            "/v1/admin/settings/countdown",
            get(http::admin::load_settings_handler).put(http::admin::save_settings_handler),
        )
        .route(
            "/v1/admin/partnership-inquiries",
            get(http::admin::list_inquiries_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
