use log::warn;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::{RemoteFailure, ToolError};

/// Shared authenticated handle to the GitHub REST API.
///
/// Constructed once at startup and injected by reference into every
/// operation service. All transport and status failures are normalized
/// into `RemoteFailure` here so callers never sniff error shapes.
pub struct GitHubClient {
    http: Client,
    api_url: String,
    api_version: String,
    auth: HeaderValue,
}

impl GitHubClient {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_str(&cfg.user_agent)?);
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .use_rustls_tls()
            .build()?;
        let auth = HeaderValue::from_str(&format!("Bearer {}", cfg.token))?;
        Ok(Self {
            http,
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            api_version: cfg.api_version.clone(),
            auth,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ToolError> {
        let req = self
            .request(reqwest::Method::GET, path)
            .query(query);
        self.send_json(req).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ToolError> {
        let req = self.request(reqwest::Method::POST, path).json(body);
        self.send_json(req).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ToolError> {
        let req = self.request(reqwest::Method::PUT, path).json(body);
        self.send_json(req).await
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        self.http
            .request(method, url)
            .header(AUTHORIZATION, self.auth.clone())
            .header("X-GitHub-Api-Version", &self.api_version)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ToolError> {
        let res = req.send().await.map_err(|e| {
            ToolError::remote(RemoteFailure {
                status: None,
                message: e.to_string(),
            })
        })?;
        let status = res.status();
        if status.is_success() {
            return res
                .json::<T>()
                .await
                .map_err(|e| ToolError::unknown(format!("Invalid response body: {}", e)));
        }
        let text = res.text().await.unwrap_or_default();
        let message = extract_message(&text);
        warn!("GitHub API returned {}: {}", status, message);
        Err(ToolError::remote(RemoteFailure {
            status: Some(status.as_u16()),
            message,
        }))
    }
}

/// Pull the `message` field out of a GitHub error body, falling back to the
/// raw text when the body is not the usual `{"message": ...}` shape.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

/// Percent-encode one URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Percent-encode a repository file path, keeping `/` separators.
pub fn encode_file_path(path: &str) -> String {
    path.split('/')
        .map(encode_path_segment)
        .collect::<Vec<_>>()
        .join("/")
}
