#![forbid(unsafe_code)]
//! Presale domain model.
//!
//! ```compile_fail
//! use soldium_model::EntryStatus;
//!
//! fn exhaustive_match(s: EntryStatus) -> &'static str {
//!     match s {
//!         EntryStatus::Pending => "p",
//!         EntryStatus::Verified => "v",
//!         EntryStatus::Rejected => "r",
//!     }
//! }
//! ```

mod account;
mod entry;
mod explorer;
mod inquiry;
mod settings;
mod submission;
mod terms;
mod validation;

pub use account::{AuthError, AuthOperation, UserAccount, MIN_PASSWORD_LEN};
pub use entry::{
    EntryDraft, EntryStatus, EntryTransition, PresaleEntry, TransitionError,
    DEFAULT_REJECTION_REASON,
};
pub use explorer::{account_url, transaction_url, ExplorerLinks, EXPLORER_BASE_URL};
pub use inquiry::{InquiryDraft, InquiryForm, InquiryStatus, PartnershipInquiry, PartnershipPackage};
pub use settings::{
    parse_burn_date, CountdownSettings, CountdownSettingsForm, COUNTDOWN_SETTINGS_KEY,
    DEFAULT_BURN_AMOUNT, DEFAULT_BURN_DATE, DEFAULT_BURN_INTERVAL,
};
pub use submission::{SubmissionForm, ValidatedSubmission, WALLET_MAX_LEN, WALLET_MIN_LEN};
pub use terms::{
    PresaleTerms, Quote, QuoteCurrency, DEFAULT_PRESALE_PRICE_USD, DEFAULT_PRESALE_RATE, DEFAULT_PRESALE_WALLET,
};
pub use validation::ValidationError;

pub const CRATE_NAME: &str = "soldium-model";
