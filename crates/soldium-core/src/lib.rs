#![forbid(unsafe_code)]

mod errors;
mod ports;
mod types;

pub use errors::{Error, ExitCode, MachineError, Result};
pub use ports::clock::{Clock, FixedClock, SystemClock};
pub use types::ids::{EntryId, InquiryId, UserId, ID_MAX_LEN};

pub const CRATE_NAME: &str = "soldium-core";

pub const ENV_SOLDIUM_LOG_JSON: &str = "SOLDIUM_LOG_JSON";
pub const ENV_SOLDIUM_STORE: &str = "SOLDIUM_STORE";
pub const ENV_SOLDIUM_PRESALE_RATE: &str = "SOLDIUM_PRESALE_RATE";
pub const ENV_SOLDIUM_PRESALE_PRICE_USD: &str = "SOLDIUM_PRESALE_PRICE_USD";
pub const ENV_SOLDIUM_PRESALE_WALLET: &str = "SOLDIUM_PRESALE_WALLET";
