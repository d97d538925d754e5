/// Backend Client: the single point of entry for every call to the résumé backend.
///
/// The persistence, PDF parsing and analysis services all live behind one base URL and
/// answer either with a bare JSON value or with a `{success, data}` envelope. This module
/// owns the HTTP client, retries, and envelope unwrapping so the service adapters only
/// deal with typed payloads.
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    #[error("Malformed backend response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Backend unavailable after {attempts} attempts")]
    Unavailable { attempts: u32 },
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Api { status: 404, .. })
    }
}

/// Whether a request may be sent again after an ambiguous failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    /// Safe to repeat: retried on transport errors, 429 and 5xx.
    Idempotent,
    /// May have side effects: retried only when the backend certainly did not act
    /// (connection refused, 429).
    Once,
}

#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the (possibly enveloped) JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let url = self.url(path);
        let response = self
            .send(Retry::Idempotent, || Ok(self.client.get(&url)))
            .await?;
        decode(response).await
    }

    /// POST a JSON body to `path` and decode the (possibly enveloped) JSON reply.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self
            .send(Retry::Once, || Ok(self.client.post(&url).json(body)))
            .await?;
        decode(response).await
    }

    /// POST one file as multipart field `field`.
    pub async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        mime: &str,
        bytes: Bytes,
    ) -> Result<T, ServiceError> {
        let url = self.url(path);
        let response = self
            .send(Retry::Once, || {
                // A multipart form is consumed by the request, so build one per attempt.
                let part = reqwest::multipart::Part::stream(bytes.clone())
                    .file_name(file_name.to_string())
                    .mime_str(mime)?;
                let form = reqwest::multipart::Form::new().part(field.to_string(), part);
                Ok(self.client.post(&url).multipart(form))
            })
            .await?;
        decode(response).await
    }

    /// Sends the request built by `build`, retrying with exponential backoff: 500ms, 1s.
    async fn send(
        &self,
        retry: Retry,
        build: impl Fn() -> Result<RequestBuilder, ServiceError>,
    ) -> Result<Response, ServiceError> {
        let mut last_error: Option<ServiceError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = Duration::from_millis(BACKOFF_BASE_MS * (1 << (attempt - 1)));
                warn!(
                    "Backend call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match build()?.send().await {
                Ok(r) => r,
                Err(e) => {
                    let again = retry == Retry::Idempotent || e.is_connect();
                    if !again {
                        return Err(ServiceError::Http(e));
                    }
                    last_error = Some(ServiceError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            let transient = status == StatusCode::TOO_MANY_REQUESTS
                || (retry == Retry::Idempotent && status.is_server_error());

            if transient {
                let body = response.text().await.unwrap_or_default();
                warn!("Backend returned {}: {}", status, body);
                last_error = Some(ServiceError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ServiceError::Api {
                    status: status.as_u16(),
                    message: error_message(&body),
                });
            }

            debug!("Backend call succeeded with {}", status);
            return Ok(response);
        }

        Err(last_error.unwrap_or(ServiceError::Unavailable {
            attempts: MAX_ATTEMPTS,
        }))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let value: Value = response.json().await?;
    let payload = unwrap_envelope(value)?;
    Ok(serde_json::from_value(payload)?)
}

/// Strips a `{success, data}` envelope. Bare values pass through unchanged.
pub fn unwrap_envelope(value: Value) -> Result<Value, ServiceError> {
    let Value::Object(mut map) = value else {
        return Ok(value);
    };
    let Some(success) = map.get("success").and_then(Value::as_bool) else {
        return Ok(Value::Object(map));
    };
    if !success {
        let message = map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        return Err(ServiceError::Rejected(message));
    }
    Ok(map.remove("data").unwrap_or(Value::Object(map)))
}

/// Pulls `message` out of a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_takes_data() {
        let value = json!({"success": true, "data": {"resumeId": "r1"}});
        assert_eq!(unwrap_envelope(value).unwrap(), json!({"resumeId": "r1"}));
    }

    #[test]
    fn test_unwrap_envelope_passes_bare_values() {
        let value = json!({"resumeName": "CV"});
        assert_eq!(unwrap_envelope(value.clone()).unwrap(), value);
        assert_eq!(unwrap_envelope(json!([1, 2])).unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_unwrap_envelope_reports_rejection() {
        let err = unwrap_envelope(json!({"success": false, "message": "quota exceeded"}))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(m) if m == "quota exceeded"));
    }

    #[test]
    fn test_error_message_prefers_json_field() {
        assert_eq!(error_message(r#"{"message":"nope"}"#), "nope");
        assert_eq!(error_message("plain text"), "plain text");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ServiceClient::new("http://localhost:5000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/resumes/1"), "http://localhost:5000/api/resumes/1");
    }
}
