//! Metabase API client implementation.
//!
//! Thin wrapper over the handful of read endpoints the reports need: session
//! login, permission group listing, group membership detail, and the two
//! collection endpoints used by the hierarchy walker. Every authenticated
//! call carries the session token in the `X-Metabase-Session` header.

use crate::model::{Collection, CollectionItem, CollectionItemList, Group, GroupDetail, Member};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, error, trace};

/// Header carrying the session token on authenticated calls
pub const SESSION_HEADER: &str = "X-Metabase-Session";

const USER_AGENT: &str = "mbexport";

/// Error emitted by the Metabase API client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("authentication failed: HTTP {status}: {body}")]
    AuthenticationFailed { status: StatusCode, body: String },
    #[error("unexpected response from server: HTTP {status} for {url}: {body}")]
    UnexpectedStatus {
        status: StatusCode,
        url: String,
        body: String,
    },
    #[error("no active session; log in first")]
    NotLoggedIn,
}

/// Read access to permission groups and their members
pub trait GroupSource {
    fn list_groups(&self) -> impl Future<Output = Result<Vec<Group>, ApiError>>;
    fn list_group_members(
        &self,
        group_id: u64,
    ) -> impl Future<Output = Result<Vec<Member>, ApiError>>;
}

/// Read access to the collection tree
pub trait CollectionSource {
    /// Base URL of the instance, used to build item links
    fn base_url(&self) -> &str;
    fn collection(
        &self,
        collection_id: &str,
    ) -> impl Future<Output = Result<Collection, ApiError>>;
    fn collection_items(
        &self,
        collection_id: &str,
    ) -> impl Future<Output = Result<Vec<CollectionItem>, ApiError>>;
}

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
}

pub struct MetabaseApiClient {
    base_url: String,
    client: reqwest::Client,
    session_token: Option<String>,
}

impl MetabaseApiClient {
    pub fn new(base_url: &str) -> Result<MetabaseApiClient, ApiError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(MetabaseApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session_token: None,
        })
    }

    /// Exchange credentials for a session token.
    ///
    /// One attempt only; a non-2xx response or a body without the session id
    /// fails the whole run.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        let url = format!("{}/api/session", self.base_url);
        debug!("Authenticating against {}...", url);

        let request = SessionRequest { username, password };
        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = read_body(response).await;
            error!("Login request failed with status {}: {}", status, body);
            return Err(ApiError::AuthenticationFailed { status, body });
        }

        let body = response.text().await?;
        let session: SessionResponse = match serde_json::from_str(&body) {
            Ok(session) => session,
            Err(e) => {
                error!("Login response lacks a session id: {}", e);
                return Err(ApiError::AuthenticationFailed { status, body });
            }
        };

        debug!("Authentication successful, session established");
        self.session_token = Some(session.id);

        Ok(())
    }

    /// Execute an authenticated GET and deserialize the JSON response
    async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let token = self.session_token.as_ref().ok_or(ApiError::NotLoggedIn)?;
        let url = format!("{}{}", self.base_url, path);
        trace!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(SESSION_HEADER, token)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = read_body(response).await;
            error!("Request to {} failed with status {}: {}", url, status, body);
            return Err(ApiError::UnexpectedStatus { status, url, body });
        }

        let body = response.text().await?;
        match serde_json::from_str::<T>(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                error!(
                    "Failed to deserialize response from {}: {}. Raw response: {}",
                    url, e, body
                );
                Err(ApiError::JsonError(e))
            }
        }
    }
}

impl GroupSource for MetabaseApiClient {
    async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        self.get_json("/api/permissions/group").await
    }

    async fn list_group_members(&self, group_id: u64) -> Result<Vec<Member>, ApiError> {
        let detail: GroupDetail = self
            .get_json(&format!("/api/permissions/group/{}", group_id))
            .await?;
        Ok(detail.members)
    }
}

impl CollectionSource for MetabaseApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn collection(&self, collection_id: &str) -> Result<Collection, ApiError> {
        self.get_json(&format!("/api/collection/{}", collection_id))
            .await
    }

    async fn collection_items(&self, collection_id: &str) -> Result<Vec<CollectionItem>, ApiError> {
        let listing: CollectionItemList = self
            .get_json(&format!("/api/collection/{}/items", collection_id))
            .await?;
        Ok(listing.data)
    }
}

/// Drain a response body for diagnostics, tolerating read failures
async fn read_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read error response body: {}", e);
            String::from("<unreadable response body>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = MetabaseApiClient::new("https://metabase.example.com/").unwrap();
        assert_eq!(client.base_url(), "https://metabase.example.com");
    }

    #[tokio::test]
    async fn test_requests_require_login() {
        let client = MetabaseApiClient::new("https://metabase.example.com").unwrap();
        let result = client.list_groups().await;
        assert!(matches!(result, Err(ApiError::NotLoggedIn)));
    }
}
