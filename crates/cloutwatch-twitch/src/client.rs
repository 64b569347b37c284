//! HTTP client for the three upstream Twitch endpoints.
//!
//! Wraps `reqwest` with typed response deserialization, credential handling,
//! and a flat transport-wide retry policy. Base URLs are overridable so tests
//! can point the client at a mock server.

use std::time::Duration;

use reqwest::{header, Client, Url};

use crate::error::TwitchError;
use crate::retry::retry_with_backoff;
use crate::types::{ChannelDetail, ChatRoster, ChattersResponse, HelixUser, HelixUsersResponse};

const DEFAULT_TMI_BASE_URL: &str = "https://tmi.twitch.tv";
const DEFAULT_HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";
const DEFAULT_KRAKEN_BASE_URL: &str = "https://api.twitch.tv/kraken";

/// Accept header selecting the legacy v5 channel representation.
const KRAKEN_ACCEPT: &str = "application/vnd.twitchtv.v5+json";

/// Upstream ceiling on logins per Helix `users` request.
pub const MAX_LOGINS_PER_REQUEST: usize = 100;

/// Bearer token and client identifier for the authenticated endpoints.
///
/// Supplied externally at startup; acquiring or refreshing the token is a
/// collaborator concern, not this client's.
#[derive(Clone)]
pub struct Credentials {
    pub bearer_token: String,
    pub client_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("bearer_token", &"[redacted]")
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Flat retry budget applied to every outbound call.
///
/// `max_retries` is the number of additional attempts after the first
/// failure; `backoff_base_ms` seeds the exponential back-off schedule.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_base_ms: 1_000,
        }
    }
}

/// Client for the chatters roster, Helix `users`, and legacy v5 `channels`
/// endpoints.
///
/// Use [`TwitchClient::new`] for production or
/// [`TwitchClient::with_base_urls`] to point at mock servers in tests.
pub struct TwitchClient {
    client: Client,
    credentials: Credentials,
    retry: RetryPolicy,
    detail_timeout: Duration,
    tmi_base: String,
    users_endpoint: Url,
    kraken_base: String,
}

impl TwitchClient {
    /// Creates a client pointed at the production Twitch hosts.
    ///
    /// # Errors
    ///
    /// Returns [`TwitchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: Credentials,
        retry: RetryPolicy,
        detail_timeout_ms: u64,
    ) -> Result<Self, TwitchError> {
        Self::with_base_urls(
            credentials,
            retry,
            detail_timeout_ms,
            DEFAULT_TMI_BASE_URL,
            DEFAULT_HELIX_BASE_URL,
            DEFAULT_KRAKEN_BASE_URL,
        )
    }

    /// Creates a client with custom base URLs (for testing with wiremock).
    ///
    /// Only the per-account detail calls carry an explicit timeout
    /// (`detail_timeout_ms`); roster and identity lookups rely on the
    /// transport's connect timeout alone.
    ///
    /// # Errors
    ///
    /// Returns [`TwitchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TwitchError::InvalidBaseUrl`] if a base
    /// URL does not parse.
    pub fn with_base_urls(
        credentials: Credentials,
        retry: RetryPolicy,
        detail_timeout_ms: u64,
        tmi_base: &str,
        helix_base: &str,
        kraken_base: &str,
    ) -> Result<Self, TwitchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cloutwatch/0.1 (chat-follower-lookup)")
            .build()?;

        let tmi_base = normalize_base(tmi_base)?;
        let kraken_base = normalize_base(kraken_base)?;
        let users_endpoint = Url::parse(&format!("{}/users", normalize_base(helix_base)?))
            .map_err(|_| TwitchError::InvalidBaseUrl(helix_base.to_owned()))?;

        Ok(Self {
            client,
            credentials,
            retry,
            detail_timeout: Duration::from_millis(detail_timeout_ms),
            tmi_base,
            users_endpoint,
            kraken_base,
        })
    }

    /// Fetches the current chat roster for `channel`.
    ///
    /// The channel name is lower-cased before URL construction; the roster
    /// endpoint is unauthenticated.
    ///
    /// # Errors
    ///
    /// - [`TwitchError::UnexpectedStatus`] on a non-2xx response.
    /// - [`TwitchError::Http`] on network failure.
    /// - [`TwitchError::Deserialize`] if the body does not match the roster
    ///   shape.
    pub async fn fetch_roster(&self, channel: &str) -> Result<ChatRoster, TwitchError> {
        let url = self.roster_url(channel);
        let raw: ChattersResponse =
            retry_with_backoff(self.retry.max_retries, self.retry.backoff_base_ms, || {
                let url = url.clone();
                async move {
                    let response = self.client.get(&url).send().await?;
                    read_json(response, &url).await
                }
            })
            .await?;
        Ok(ChatRoster::from(raw))
    }

    /// Resolves a batch of logins to accounts via the Helix `users` endpoint.
    ///
    /// `logins` must not exceed [`MAX_LOGINS_PER_REQUEST`]; callers own the
    /// chunking. Unresolvable logins are absent from the returned list.
    ///
    /// # Errors
    ///
    /// - [`TwitchError::UnexpectedStatus`] on a non-2xx response (including
    ///   401/403 for bad credentials).
    /// - [`TwitchError::Http`] on network failure.
    /// - [`TwitchError::Deserialize`] if the body does not match the Helix
    ///   envelope.
    pub async fn resolve_users(&self, logins: &[String]) -> Result<Vec<HelixUser>, TwitchError> {
        let url = self.users_url(logins);
        let envelope: HelixUsersResponse =
            retry_with_backoff(self.retry.max_retries, self.retry.backoff_base_ms, || {
                let url = url.clone();
                async move {
                    let response = self
                        .client
                        .get(url.clone())
                        .bearer_auth(&self.credentials.bearer_token)
                        .header("Client-Id", &self.credentials.client_id)
                        .send()
                        .await?;
                    read_json(response, url.as_str()).await
                }
            })
            .await?;
        Ok(envelope.data)
    }

    /// Fetches follower detail for one account from the legacy v5 `channels`
    /// endpoint, bounded by the configured per-request timeout.
    ///
    /// # Errors
    ///
    /// - [`TwitchError::Http`] on network failure or timeout.
    /// - [`TwitchError::UnexpectedStatus`] on a non-2xx response.
    /// - [`TwitchError::Deserialize`] if the body does not match the channel
    ///   shape.
    pub async fn fetch_channel_detail(&self, id: &str) -> Result<ChannelDetail, TwitchError> {
        let url = self.channel_url(id);
        retry_with_backoff(self.retry.max_retries, self.retry.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .timeout(self.detail_timeout)
                    .header(header::ACCEPT, KRAKEN_ACCEPT)
                    .header("Client-ID", &self.credentials.client_id)
                    .send()
                    .await?;
                read_json(response, &url).await
            }
        })
        .await
    }

    fn roster_url(&self, channel: &str) -> String {
        format!(
            "{}/group/user/{}/chatters",
            self.tmi_base,
            channel.to_lowercase()
        )
    }

    /// Builds the Helix `users` URL with one `login` query pair per entry,
    /// percent-encoded via [`Url::query_pairs_mut`].
    fn users_url(&self, logins: &[String]) -> Url {
        let mut url = self.users_endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for login in logins {
                pairs.append_pair("login", login);
            }
        }
        url
    }

    fn channel_url(&self, id: &str) -> String {
        format!("{}/channels/{}", self.kraken_base, id)
    }
}

/// Strips any trailing slash and validates the base parses as a URL.
fn normalize_base(base: &str) -> Result<String, TwitchError> {
    let trimmed = base.trim_end_matches('/');
    Url::parse(trimmed).map_err(|_| TwitchError::InvalidBaseUrl(base.to_owned()))?;
    Ok(trimmed.to_owned())
}

/// Asserts a 2xx status and parses the response body as JSON.
async fn read_json<T>(response: reqwest::Response, url: &str) -> Result<T, TwitchError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(TwitchError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| TwitchError::Deserialize {
        context: url.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
