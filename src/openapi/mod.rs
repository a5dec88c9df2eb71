//! Minimal signed client for Alibaba Cloud RPC-style OpenAPI endpoints.
//!
//! Every call is a GET against a service endpoint with the common
//! parameters, a per-request nonce and timestamp, and an HMAC-SHA1
//! `Signature` over the canonicalized query. Responses are JSON.

pub mod page;
pub mod sign;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use miette::Diagnostic;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::credentials::Credentials;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, Diagnostic)]
pub enum OpenApiError {
    #[error("{action} request failed")]
    Transport {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{action} timed out after {seconds}s")]
    Timeout { action: String, seconds: u64 },

    #[error("{action} rejected: {code}: {message} (request {request_id})")]
    Api {
        action: String,
        code: String,
        message: String,
        request_id: String,
    },

    #[error("unexpected {action} response body")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Error body shape shared by every OpenAPI service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ApiFailure {
    code: String,
    message: String,
    request_id: String,
}

pub struct OpenApiClient {
    http: Client,
    endpoint: String,
    api_version: &'static str,
    credentials: Credentials,
    timeout: Duration,
}

impl OpenApiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_version: &'static str,
        credentials: Credentials,
    ) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            api_version,
            credentials,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Call `action` with the given request-specific parameters and decode
    /// the JSON response body into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Vec<(String, String)>,
    ) -> Result<T, OpenApiError> {
        let url = self.signed_url(action, params);
        debug!(action, endpoint = %self.endpoint, "calling OpenAPI");

        let sent = tokio::time::timeout(self.timeout, self.http.get(&url).send()).await;
        let response = match sent {
            Ok(Ok(response)) => response,
            Ok(Err(source)) => {
                return Err(OpenApiError::Transport {
                    action: action.to_string(),
                    source,
                });
            }
            Err(_) => {
                return Err(OpenApiError::Timeout {
                    action: action.to_string(),
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| OpenApiError::Transport {
                action: action.to_string(),
                source,
            })?;

        if !status.is_success() {
            let failure = serde_json::from_str::<ApiFailure>(&body).unwrap_or_default();
            let code = if failure.code.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                failure.code
            };
            warn!(action, %code, "OpenAPI call rejected");
            return Err(OpenApiError::Api {
                action: action.to_string(),
                code,
                message: failure.message,
                request_id: failure.request_id,
            });
        }

        serde_json::from_str(&body).map_err(|source| OpenApiError::Decode {
            action: action.to_string(),
            source,
        })
    }

    fn signed_url(&self, action: &str, params: Vec<(String, String)>) -> String {
        let mut query: BTreeMap<String, String> = BTreeMap::new();
        query.insert("Action".into(), action.into());
        query.insert("Version".into(), self.api_version.into());
        query.insert("Format".into(), "JSON".into());
        query.insert("AccessKeyId".into(), self.credentials.access_key_id.clone());
        query.insert("SignatureMethod".into(), "HMAC-SHA1".into());
        query.insert("SignatureVersion".into(), "1.0".into());
        query.insert("SignatureNonce".into(), Uuid::new_v4().to_string());
        query.insert(
            "Timestamp".into(),
            Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        );
        query.extend(params);

        let canonical = sign::canonical_query_string(&query);
        let signature = sign::signature("GET", &canonical, &self.credentials.access_key_secret);

        format!(
            "https://{}/?{}&Signature={}",
            self.endpoint,
            canonical,
            sign::percent_encode(&signature)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenApiClient {
        OpenApiClient::new(
            "ecs.cn-hangzhou.aliyuncs.com",
            "2014-05-26",
            Credentials {
                access_key_id: "testid".into(),
                access_key_secret: "testsecret".into(),
            },
        )
    }

    #[test]
    fn signed_url_carries_common_parameters_and_signature() {
        let url = client().signed_url(
            "DescribeRegions",
            vec![("RegionId".into(), "cn-hangzhou".into())],
        );

        assert!(url.starts_with("https://ecs.cn-hangzhou.aliyuncs.com/?"));
        assert!(url.contains("Action=DescribeRegions"));
        assert!(url.contains("Version=2014-05-26"));
        assert!(url.contains("AccessKeyId=testid"));
        assert!(url.contains("SignatureMethod=HMAC-SHA1"));
        assert!(url.contains("RegionId=cn-hangzhou"));
        assert!(url.contains("&Signature="));
    }

    #[test]
    fn request_parameters_override_nothing_but_sort_into_place() {
        let url = client().signed_url("DescribeDisks", vec![("DiskIds".into(), r#"["d-1"]"#.into())]);

        // Canonical order puts DiskIds before SignatureMethod.
        let disk_ids = url.find("DiskIds=").expect("DiskIds present");
        let method = url.find("SignatureMethod=").expect("SignatureMethod present");
        assert!(disk_ids < method);
    }

    #[test]
    fn api_failure_body_decodes_with_partial_fields() {
        let failure: ApiFailure =
            serde_json::from_str(r#"{"Code":"InvalidAccessKeyId.NotFound","RequestId":"X-1"}"#)
                .expect("failure body must decode");

        assert_eq!(failure.code, "InvalidAccessKeyId.NotFound");
        assert_eq!(failure.message, "");
        assert_eq!(failure.request_id, "X-1");
    }
}
