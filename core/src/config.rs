//! Client endpoint configuration.
//!
//! An `Endpoint` is fixed when the client is built and never changes, so one
//! client can be shared by any number of concurrent callers.

use crate::error::{Error, Result};

/// Environment variable holding the base URL for [`Endpoint::from_env`].
pub const URL_ENV: &str = "RPC_URL";

/// Environment variable holding the optional bearer token.
pub const AUTH_TOKEN_ENV: &str = "RPC_AUTH_TOKEN";

/// Where calls go and how they authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    auth_token: Option<String>,
}

impl Endpoint {
    /// Trailing slashes on `base_url` are stripped.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    /// Attach a bearer token. A blank token is the same as no token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.auth_token = if token.trim().is_empty() { None } else { Some(token) };
        self
    }

    /// Read `RPC_URL` and `RPC_AUTH_TOKEN` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup(URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{URL_ENV} is not set")))?;
        let endpoint = Self::new(url.trim());
        Ok(match lookup(AUTH_TOKEN_ENV) {
            Some(token) => endpoint.with_auth_token(token),
            None => endpoint,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// `{base_url}/{method}`.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    /// Headers sent with every call.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = &self.auth_token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }
}
