use crate::core::error::{AskError, single_line};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// How the API key is attached to a request.
#[derive(Debug, Clone)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// The raw key in a named header, e.g. `x-api-key`
    Header(String),
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth: AuthScheme,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        client: Client,
        base_url: String,
        auth: AuthScheme,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        api_key: &str,
        payload: &T,
    ) -> Result<Response, AskError> {
        let url = self.url(path);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        request = match &self.auth {
            AuthScheme::Bearer => request.header("Authorization", format!("Bearer {}", api_key)),
            AuthScheme::Header(name) => request.header(name.as_str(), api_key),
        };

        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        tracing::debug!(url = %url, "sending request");
        let response = request.json(payload).send().await?;
        tracing::debug!(url = %url, status = %response.status(), "response received");
        Ok(response)
    }

    /// Reads the body and decodes it as `T`, turning error statuses and
    /// unexpected shapes into [`AskError::Provider`].
    pub async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, AskError> {
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "provider returned an error status");
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        let body = response.text().await?;

        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::warn!(error = %e, "unexpected response body");
            AskError::malformed_response(status.as_u16())
        })
    }
}

/// Builds the error for a non-2xx response.
///
/// The message is taken from the JSON body when it has one, falling back to
/// the status line. Authentication failures are reworded so the fix is obvious.
pub fn error_from_body(status: StatusCode, body: &str) -> AskError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| extract_error_message(&value))
        .unwrap_or_else(|| status_line(status));

    let message = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("invalid API key ({})", single_line(&message))
        }
        _ => message,
    };

    AskError::provider(status.as_u16(), message)
}

fn extract_error_message(value: &Value) -> Option<String> {
    value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
