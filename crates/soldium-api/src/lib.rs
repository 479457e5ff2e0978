#![forbid(unsafe_code)]

pub mod convert;
pub mod dto;
pub mod error_mapping;
mod errors;
mod openapi;
pub mod params;

pub use dto::{
    AdminEntriesResponseDto, CountdownResponseDto, EntriesResponseDto, EntryDto,
    InquiriesResponseDto, MeResponseDto, RejectRequestDto, ResetPasswordRequestDto,
    ResetPasswordResponseDto, SessionDto, SignInRequestDto, SignUpRequestDto,
    SubmitEntryRequestDto, VersionDto,
};
pub use errors::{ApiError, ApiErrorCode, ApiErrorEnvelope, GENERIC_FAILURE_MESSAGE};
pub use openapi::openapi_v1_spec;

pub const CRATE_NAME: &str = "soldium-api";
pub const API_VERSION: &str = "v1";
