// This file is part of the terraform-provider-ionoscloud project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::poller::Readiness;

/// Maximum length of an error body kept in an error message
const MAX_ERROR_BODY_LENGTH: usize = 300;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("resource not found ({url})")]
    NotFound { url: String },
    #[error("request to {url} failed with status {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
    #[error("failed to send request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request body for {url}: {source}")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid url `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("the provider has not been configured")]
    Unconfigured,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
}

/// Object as returned by every IONOS product API
#[derive(Debug, Clone, Deserialize)]
pub struct Entity<P> {
    pub id: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub properties: P,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub state: Option<String>,
    /// VPN gateways report `status` instead of `state`
    pub status: Option<String>,
    pub status_message: Option<String>,
    pub public_key: Option<String>,
    pub created_date: Option<String>,
    pub last_modified_date: Option<String>,
}

impl Metadata {
    pub fn current_state(&self) -> Option<&str> {
        self.state.as_deref().or(self.status.as_deref())
    }

    pub fn readiness(&self, ready: &[&str]) -> Readiness {
        Readiness::classify(self.current_state(), ready)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<P> {
    pub properties: P,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    messages: Vec<ErrorMessage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorMessage {
    error_code: Option<String>,
    message: Option<String>,
}

/// Extract the human message from an IONOS error body, falling back to the raw (truncated) body
fn error_message(body: &str) -> String {
    let messages = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.messages)
        .unwrap_or_default();
    let extracted = messages
        .into_iter()
        .filter_map(|m| match (m.error_code, m.message) {
            (Some(code), Some(message)) => Some(format!("[{code}] {message}")),
            (None, Some(message)) => Some(message),
            _ => None,
        })
        .collect::<Vec<_>>();
    if !extracted.is_empty() {
        return extracted.join("; ");
    }
    if body.len() > MAX_ERROR_BODY_LENGTH {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated]", &body[..end])
    } else {
        body.to_owned()
    }
}

/// HTTP transport shared by the product clients
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: &str, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|source| ApiError::Url {
            url: raw.clone(),
            source,
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<(String, String), ApiError> {
        let url = self.url(path, query)?;
        let url_text = url.to_string();
        tracing::debug!("{method} {url_text}");

        let mut request = self.http.request(method, url);
        request = match &self.credentials {
            Credentials::Token(token) => request.bearer_auth(token),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        };
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url_text.clone(),
            source,
        })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                url: url_text.clone(),
                source,
            })?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { url: url_text });
        }
        if !status.is_success() {
            let message = error_message(&text);
            tracing::warn!("{url_text} answered {status}: {message}");
            return Err(ApiError::Status {
                url: url_text,
                status: status.as_u16(),
                message,
            });
        }
        Ok((url_text, text))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let (url, text) = self.send(method, path, query, body).await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode { url, source })
    }

    fn encode<B: Serialize>(&self, path: &str, body: &B) -> Result<serde_json::Value, ApiError> {
        serde_json::to_value(body).map_err(|source| ApiError::Encode {
            url: format!("{}/{}", self.base_url, path),
            source,
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.send_json(Method::GET, path, query, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = self.encode(path, body)?;
        self.send_json(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = self.encode(path, body)?;
        self.send_json(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = self.encode(path, body)?;
        self.send_json(Method::PATCH, path, &[], Some(body)).await
    }

    /// Delete the object at `path`, the response body is ignored
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_extracted() {
        let body = r#"{"httpStatus":422,"messages":[{"errorCode":"200","message":"[VDC-1-1] invalid cidr"}]}"#;
        assert_eq!(error_message(body), "[200] [VDC-1-1] invalid cidr");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");

        let long = "x".repeat(1000);
        assert!(error_message(&long).ends_with("[truncated]"));
    }

    #[test]
    fn urls_are_joined_without_double_slashes() {
        let client = ApiClient::new(
            reqwest::Client::new(),
            "https://api.ionos.com/databases/postgresql/",
            Credentials::Token("token".into()),
        );
        let url = client.url("/clusters/abc", &[("depth", "1")]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.ionos.com/databases/postgresql/clusters/abc?depth=1"
        );
    }

    #[test]
    fn unserializable_bodies_are_encode_errors() {
        let client = ApiClient::new(
            reqwest::Client::new(),
            "https://api.ionos.com/dataplatform",
            Credentials::Token("token".into()),
        );
        let body = std::collections::BTreeMap::from([((1, 2), "tuple keys are not json")]);
        let err = client.encode("clusters", &body).unwrap_err();
        assert!(matches!(err, ApiError::Encode { .. }));
        assert!(err
            .to_string()
            .starts_with("failed to encode request body for https://api.ionos.com/dataplatform/clusters"));
    }

    #[test]
    fn metadata_prefers_state_over_status() {
        let metadata = Metadata {
            state: Some("BUSY".into()),
            status: Some("AVAILABLE".into()),
            ..Default::default()
        };
        assert_eq!(metadata.current_state(), Some("BUSY"));
    }
}
