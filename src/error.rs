// Errors that carry a meaning for the caller of the CLI. Everything else
// travels as a plain `anyhow::Error` and ends up as a generic failure.

use crate::service::ServiceError;
use thiserror::Error;

pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const AUTH: u8 = 3;
}

#[derive(Debug, Error)]
pub enum CliError {
    /// Bad arguments the parser could not catch (unknown category, missing
    /// input in a non-interactive run).
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),
}

impl CliError {
    pub fn not_logged_in() -> Self {
        CliError::Auth("Not logged in. Run `anylist auth` or set ANYLIST_EMAIL and ANYLIST_PASSWORD.".into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => exit_codes::USAGE,
            CliError::Auth(_) => exit_codes::AUTH,
            CliError::NotFound(_) => exit_codes::FAILURE,
        }
    }
}

/// Exit code for an error coming out of command dispatch. The first typed
/// error found in the chain decides.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<ServiceError>() {
            return match e {
                ServiceError::Auth(_) | ServiceError::NotLoggedIn => exit_codes::AUTH,
                _ => exit_codes::FAILURE,
            };
        }
    }
    exit_codes::FAILURE
}
