//! Client for the ExchangeRate-API pair endpoints.
//!
//! ```no_run
//! # async fn demo() -> Result<(), xrate::Error> {
//! use xrate::{Client, Currency};
//!
//! let client = Client::builder().api_key("my-key").build()?;
//! let rate = client.rate(&Currency::from("USD"), &Currency::from("EUR")).await?;
//! # Ok(())
//! # }
//! ```

use super::api_error::{Response, response_api_error};
use crate::core::currency::{Amount, Currency, CurrencyRateProvider, Rate};
use crate::error::Error;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Request, Url};
use std::env::VarError;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

pub const SCHEME: &str = "https";
pub const HOST: &str = "v6.exchangerate-api.com";
pub const VERSION: &str = "v6";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Environment variable holding the API key when none is configured.
pub const API_KEY_VAR: &str = "EXCHANGE_RATE_API_KEY";

const USER_AGENT: &str = concat!("xrate/", env!("CARGO_PKG_VERSION"));

/// Settings for a [`Client`]. Setters override the defaults in call order.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: Option<String>,
    api_key_var: String,
    base_url: String,
    timeout: Duration,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        ClientBuilder {
            api_key: None,
            api_key_var: API_KEY_VAR.to_string(),
            base_url: format!("{SCHEME}://{HOST}/{VERSION}"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Environment variable read for the key when no explicit key is set.
    pub fn api_key_var(mut self, name: impl Into<String>) -> Self {
        self.api_key_var = name.into();
        self
    }

    /// Versioned endpoint, e.g. `https://v6.exchangerate-api.com/v6`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves the configuration. A missing or empty key is not an error here;
    /// the service rejects it with `invalid-key` on the first call.
    pub fn build(self) -> Result<Client, Error> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => match std::env::var(&self.api_key_var) {
                Ok(key) => key,
                Err(VarError::NotPresent) => String::new(),
                Err(VarError::NotUnicode(_)) => {
                    debug!(
                        var = %self.api_key_var,
                        "API key variable is not valid UTF-8, ignoring"
                    );
                    String::new()
                }
            },
        };
        let base_url = Url::parse(&self.base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?;

        debug!(
            base_url = %base_url,
            timeout = ?self.timeout,
            has_key = !api_key.is_empty(),
            "Created exchange rate client"
        );

        Ok(Client {
            http,
            base_url,
            api_key,
            timeout: self.timeout,
        })
    }
}

/// Handle to the API. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl Client {
    /// Client with the default endpoint and the key from `EXCHANGE_RATE_API_KEY`.
    pub fn new() -> Result<Self, Error> {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Exchange rate from `base` to `target`.
    #[instrument(name = "ExchangeRate", skip_all, fields(base = %base, target = %target))]
    pub async fn rate(&self, base: &Currency, target: &Currency) -> Result<Rate, Error> {
        let response = self.get(&Self::pair_path(base, target)).await?;
        debug!(rate = response.rate, "Received rate");
        Ok(response.rate)
    }

    /// `amount` of `base` converted to `target`.
    #[instrument(
        name = "ExchangeAmount",
        skip_all,
        fields(base = %base, target = %target, amount = amount)
    )]
    pub async fn amount(
        &self,
        base: &Currency,
        target: &Currency,
        amount: Amount,
    ) -> Result<Amount, Error> {
        let response = self.get(&Self::amount_path(base, target, amount)).await?;
        debug!(amount = response.amount, "Received converted amount");
        Ok(response.amount)
    }

    /// Same as [`Client::rate`], giving up with [`Error::Cancelled`] at `deadline`.
    pub async fn rate_until(
        &self,
        deadline: Instant,
        base: &Currency,
        target: &Currency,
    ) -> Result<Rate, Error> {
        tokio::time::timeout_at(deadline, self.rate(base, target))
            .await
            .map_err(|_| Error::Cancelled)?
    }

    /// Same as [`Client::amount`], giving up with [`Error::Cancelled`] at `deadline`.
    pub async fn amount_until(
        &self,
        deadline: Instant,
        base: &Currency,
        target: &Currency,
        amount: Amount,
    ) -> Result<Amount, Error> {
        tokio::time::timeout_at(deadline, self.amount(base, target, amount))
            .await
            .map_err(|_| Error::Cancelled)?
    }

    pub fn pair_path(base: &Currency, target: &Currency) -> String {
        format!("/pair/{base}/{target}")
    }

    pub fn amount_path(base: &Currency, target: &Currency, amount: Amount) -> String {
        format!("/pair/{base}/{target}/{amount:.6}")
    }

    /// Builds the authenticated GET for `path`, relative to the versioned base.
    pub fn request(&self, path: &str) -> Result<Request, Error> {
        validate_path(path)?;
        let full_path = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        let url = self.base_url.join(&full_path)?;

        let request = self.http.get(url).bearer_auth(&self.api_key).build()?;
        Ok(request)
    }

    async fn get(&self, path: &str) -> Result<Response, Error> {
        let request = self.request(path)?;
        debug!(url = %request.url(), "Requesting exchange rate data");

        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!(%status, "Received exchange rate response");

        if !status.is_success() {
            // Error bodies usually still carry an error-type tag.
            let body = response.bytes().await.unwrap_or_default();
            let api = serde_json::from_slice::<Response>(&body)
                .ok()
                .and_then(|r| response_api_error(&r).err());
            return Err(Error::Status { status, api });
        }

        let body = response.bytes().await?;
        let decoded: Response = serde_json::from_slice(&body)?;
        response_api_error(&decoded)?;

        Ok(decoded)
    }
}

/// Rejects control characters and `%` not followed by two hex digits, both of
/// which `Url::join` would otherwise strip or pass through silently.
fn validate_path(path: &str) -> Result<(), Error> {
    if path.chars().any(char::is_control) {
        return Err(Error::InvalidPath(path.to_string()));
    }

    let bytes = path.as_bytes();
    for (i, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(Error::InvalidPath(path.to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl CurrencyRateProvider for Client {
    async fn get_rate(&self, from: &str, to: &str) -> anyhow::Result<f64> {
        self.rate(&Currency::from(from), &Currency::from(to))
            .await
            .with_context(|| format!("Failed to fetch rate for currency pair: {from}/{to}"))
    }
}
