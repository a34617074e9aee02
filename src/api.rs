// API client module: a small blocking HTTP client for the AnyList service.
// Every call is synchronous; one invocation of the CLI performs a handful of
// requests one after another.

use crate::config::Credentials;
use crate::models::{Item, NewItem, ShoppingList};
use crate::service::{ServiceError, ShoppingService};
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.anylist.com";
pub const BASE_URL_VAR: &str = "ANYLIST_API_URL";

/// Holds a reqwest blocking client, the service base URL and the access
/// token once logged in.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

/// Login form payload.
#[derive(Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response from the token endpoint. The user id is kept as a raw JSON value
/// since the service has returned it both as a string and a number.
#[derive(Deserialize, Debug)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
}

impl ApiClient {
    /// Create an ApiClient pointed at `ANYLIST_API_URL`, or the public
    /// service when the variable is unset.
    pub fn from_env() -> Result<Self, ServiceError> {
        let base_url = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(&base_url)
    }

    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_builder(base_url, Client::builder())
    }

    fn with_builder(base_url: &str, builder: ClientBuilder) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url).map_err(|e| ServiceError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(base_url.to_string()));
        }
        let client = builder
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("anylist-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ApiClient { client, base_url, token: None })
    }

    /// Base URL with `segments` appended. Each segment is percent-encoded on
    /// its own, so ids containing `/`, `?` or `#` stay inside their segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn items_url(&self, list_id: &str) -> Result<Url, ServiceError> {
        self.endpoint(&["data", "shopping-lists", list_id, "items"])
    }

    fn item_url(&self, list_id: &str, item_id: &str) -> Result<Url, ServiceError> {
        self.endpoint(&["data", "shopping-lists", list_id, "items", item_id])
    }

    /// Attaches the bearer token; calling this before login is a bug in the
    /// caller, reported as `NotLoggedIn`.
    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, ServiceError> {
        let token = self.token.as_deref().ok_or(ServiceError::NotLoggedIn)?;
        Ok(req.bearer_auth(token))
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, ServiceError> {
        let res = req.send()?;
        let status = res.status();
        tracing::debug!(url = %res.url(), status = status.as_u16(), "response");
        if status == StatusCode::UNAUTHORIZED {
            return Err(ServiceError::Auth("session rejected by server".into()));
        }
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(ServiceError::Api { status: status.as_u16(), body });
        }
        Ok(res)
    }
}

impl ShoppingService for ApiClient {
    fn login(&mut self, credentials: &Credentials) -> Result<(), ServiceError> {
        let form = AuthRequest { email: &credentials.email, password: &credentials.password };
        let res = self.client.post(self.endpoint(&["auth", "token"])?).form(&form).send()?;
        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ServiceError::Auth("invalid email or password".into()));
        }
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(ServiceError::Api { status: status.as_u16(), body });
        }
        let resp: AuthResponse = res.json()?;
        tracing::debug!(user_id = ?resp.user_id, "logged in");
        self.token = Some(resp.access_token);
        Ok(())
    }

    fn teardown(&mut self) {
        self.token = None;
    }

    fn lists(&self) -> Result<Vec<ShoppingList>, ServiceError> {
        let req = self.authed(self.client.get(self.endpoint(&["data", "shopping-lists"])?))?;
        Ok(self.send(req)?.json()?)
    }

    fn add_item(&self, list_id: &str, item: &NewItem) -> Result<Item, ServiceError> {
        let req = self.authed(self.client.post(self.items_url(list_id)?).json(item))?;
        Ok(self.send(req)?.json()?)
    }

    fn save_item(&self, list_id: &str, item: &Item) -> Result<(), ServiceError> {
        let url = self.item_url(list_id, &item.identifier)?;
        let req = self.authed(self.client.put(url).json(item))?;
        self.send(req)?;
        Ok(())
    }

    fn remove_item(&self, list_id: &str, item_id: &str) -> Result<(), ServiceError> {
        let url = self.item_url(list_id, item_id)?;
        let req = self.authed(self.client.delete(url))?;
        self.send(req)?;
        Ok(())
    }
}
