//! Error handling and exit codes.

use mpnum_codec::CodecError;
use mpnum_core::{ApproxError, ContextError};
use mpnum_memory::PoolError;

use crate::settings::SettingsError;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error, such as an unparsable value.
    pub const ERROR_GENERIC: i32 = 1;
    /// An enabled context trap fired.
    pub const ERROR_TRAP: i32 = 2;
    /// Malformed encoded input.
    pub const ERROR_FORMAT: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}

/// Exit code for an error returned by [`crate::app::run`].
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<ContextError>() {
                Some(context_code(e))
            } else if let Some(e) = cause.downcast_ref::<ApproxError>() {
                match e {
                    ApproxError::Context(inner) => Some(context_code(inner)),
                    _ => Some(exit_codes::ERROR_GENERIC),
                }
            } else if cause.is::<CodecError>() || cause.is::<hex::FromHexError>() {
                Some(exit_codes::ERROR_FORMAT)
            } else if cause.is::<SettingsError>() || cause.is::<PoolError>() {
                Some(exit_codes::ERROR_CONFIG)
            } else {
                None
            }
        })
        .unwrap_or(exit_codes::ERROR_GENERIC)
}

fn context_code(err: &ContextError) -> i32 {
    match err {
        e if e.is_trap() => exit_codes::ERROR_TRAP,
        ContextError::Parse(_) => exit_codes::ERROR_GENERIC,
        _ => exit_codes::ERROR_CONFIG,
    }
}
