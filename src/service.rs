// Seam between the CLI and whatever actually talks to the shopping service.
// The real implementation lives in `api`; tests plug in an in-memory one.

use crate::config::Credentials;
use crate::models::{Item, NewItem, ShoppingList};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service rejected the email/password pair.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {status} - {body}")]
    Api { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Operations the CLI needs from the remote service.
pub trait ShoppingService {
    fn login(&mut self, credentials: &Credentials) -> Result<(), ServiceError>;

    /// Drops the authenticated session. Must be safe to call on a client
    /// that never logged in.
    fn teardown(&mut self);

    fn lists(&self) -> Result<Vec<ShoppingList>, ServiceError>;

    fn add_item(&self, list_id: &str, item: &NewItem) -> Result<Item, ServiceError>;

    fn save_item(&self, list_id: &str, item: &Item) -> Result<(), ServiceError>;

    fn remove_item(&self, list_id: &str, item_id: &str) -> Result<(), ServiceError>;
}

/// An authenticated service handle. Logging in happens in `open`, teardown
/// when the session goes out of scope, so one invocation holds exactly one
/// session.
pub struct Session<S: ShoppingService> {
    service: S,
}

impl<S: ShoppingService> Session<S> {
    pub fn open(mut service: S, credentials: &Credentials) -> Result<Self, ServiceError> {
        tracing::debug!(email = %credentials.email, "opening session");
        service.login(credentials)?;
        Ok(Session { service })
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S: ShoppingService> Drop for Session<S> {
    fn drop(&mut self) {
        tracing::debug!("tearing down session");
        self.service.teardown();
    }
}
