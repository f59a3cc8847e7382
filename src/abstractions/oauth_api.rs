use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use log::{info, warn};
use reqwest::Client;
use reqwest::header::COOKIE;

use crate::constants::{OAUTH_RETRIES, OAUTH_RETRY_DELAY};
use crate::models::OAuthResponse;

#[cfg(test)]
use mockall::automock;

/// Exchanges credentials with the API.
///
/// Both operations run under the same bounded-retry policy: a fixed number
/// of attempts with a fixed delay in between, the first success wins, and
/// exhaustion surfaces the last captured error. Missing configuration
/// fails fast before any network call.
#[cfg_attr(test, automock)]
pub trait OAuthApi: Send + Sync + 'static {
    async fn exchange_code(&self, code: &str) -> Result<OAuthResponse>;
    async fn refresh_session(&self, token: &str) -> Result<OAuthResponse>;
}

pub struct DefaultOAuthApi {
    client: Client,
    api_url: String,
    retries: u32,
    retry_delay: Duration,
}

impl OAuthApi for DefaultOAuthApi {
    async fn exchange_code(&self, code: &str) -> Result<OAuthResponse> {
        if self.api_url.is_empty() {
            bail!("API URL is not set in settings. Please set it and try again.");
        }

        let url = format!("{}/oauth/{}", self.api_url, code);
        let mut last_error = None;

        for attempt in 1..=self.retries {
            if attempt > 1 {
                tokio::time::sleep(self.retry_delay).await;
                info!("retrying code exchange, attempt {attempt}");
            }

            match self.try_exchange(&url).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    warn!("code exchange failed: {err:?}");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("Failed to register with API")))
    }

    async fn refresh_session(&self, token: &str) -> Result<OAuthResponse> {
        if token.is_empty() {
            bail!("No session token to refresh.");
        }

        if self.api_url.is_empty() {
            bail!("API URL is not set in settings. Please set it and try again.");
        }

        let url = format!("{}/oauth/login", self.api_url);
        let mut last_error = None;

        for attempt in 1..=self.retries {
            if attempt > 1 {
                tokio::time::sleep(self.retry_delay).await;
                info!("retrying session refresh, attempt {attempt}");
            }

            match self.try_refresh(&url, token).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    warn!("session refresh failed: {err:?}");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("Failed to refresh session with API")))
    }
}

impl DefaultOAuthApi {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            retries: OAUTH_RETRIES,
            retry_delay: OAUTH_RETRY_DELAY,
        }
    }

    pub fn with_policy(mut self, retries: u32, retry_delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = retry_delay;
        self
    }

    async fn try_exchange(&self, url: &str) -> Result<OAuthResponse> {
        let response = self
            .client
            .post(url)
            .send()
            .await?
            .error_for_status()?
            .json::<OAuthResponse>()
            .await?;

        Ok(response)
    }

    async fn try_refresh(&self, url: &str, token: &str) -> Result<OAuthResponse> {
        let response = self
            .client
            .get(url)
            .header(COOKIE, format!("session={token}"))
            .send()
            .await?
            .error_for_status()?
            .json::<OAuthResponse>()
            .await?;

        Ok(response)
    }
}
