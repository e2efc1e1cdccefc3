use base64::Engine;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{non_empty, parse_input};
use crate::config::RetryPolicy;
use crate::error::ToolError;
use crate::github::{encode_file_path, encode_path_segment, GitHubClient};
use crate::retry::with_retry;

#[derive(Debug, Deserialize)]
pub struct GetFileContentInput {
    pub owner: String,
    pub repo: String,
    pub path: String,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrUpdateFileInput {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub message: String,
    pub content: String,
    pub branch: Option<String>,
    pub sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EntryPayload {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: i64,
    download_url: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EntryItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: i64,
    download_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct FileItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: i64,
    download_url: Option<String>,
    content: Option<String>,
}

/// GitHub transports file bodies as base64 with embedded newlines; strip
/// whitespace before decoding.
fn decode_content(encoded: &str) -> Result<String, ToolError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ToolError::unknown(format!("Failed to decode file content: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn encode_content(raw: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(raw.as_bytes())
}

fn contents_path(owner: &str, repo: &str, path: &str) -> String {
    format!(
        "/repos/{}/{}/contents/{}",
        encode_path_segment(owner),
        encode_path_segment(repo),
        encode_file_path(path)
    )
}

/// The contents endpoint returns either a directory listing (array) or a
/// single entry; the single-entry case carries decodable text only when the
/// entry is a file.
pub async fn get_file_content(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: GetFileContentInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    non_empty("path", &input.path)?;
    debug!("get_file_content {}/{}:{}", input.owner, input.repo, input.path);

    let path = contents_path(&input.owner, &input.repo, &input.path);
    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(git_ref) = &input.git_ref {
        query.push(("ref", git_ref.clone()));
    }
    let payload: Value = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &query)
    })
    .await?;

    if payload.is_array() {
        let entries: Vec<EntryPayload> = serde_json::from_value(payload)
            .map_err(|e| ToolError::unknown(format!("Invalid response body: {}", e)))?;
        let items: Vec<EntryItem> = entries
            .into_iter()
            .map(|e| EntryItem {
                name: e.name,
                path: e.path,
                kind: e.kind,
                size: e.size,
                download_url: e.download_url,
            })
            .collect();
        return Ok(serde_json::to_value(items)?);
    }

    let entry: EntryPayload = serde_json::from_value(payload)
        .map_err(|e| ToolError::unknown(format!("Invalid response body: {}", e)))?;
    let content = match (&entry.kind[..], &entry.content) {
        ("file", Some(encoded)) => Some(decode_content(encoded)?),
        _ => None,
    };
    let item = FileItem {
        name: entry.name,
        path: entry.path,
        kind: entry.kind,
        size: entry.size,
        download_url: entry.download_url,
        content,
    };
    Ok(serde_json::to_value(item)?)
}

#[derive(Debug, Serialize)]
struct PutContentBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentPayload {
    content: Option<PutContentEntry>,
    commit: PutCommit,
}

#[derive(Debug, Deserialize)]
struct PutContentEntry {
    path: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PutCommit {
    sha: String,
    html_url: Option<String>,
}

/// Not retried: a replayed PUT could commit twice. A missing `sha` on an
/// update is left for the remote API to reject.
pub async fn create_or_update_file(
    client: &GitHubClient,
    args: Value,
) -> Result<Value, ToolError> {
    let input: CreateOrUpdateFileInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    non_empty("path", &input.path)?;
    non_empty("message", &input.message)?;
    debug!(
        "create_or_update_file {}/{}:{}",
        input.owner, input.repo, input.path
    );

    let path = contents_path(&input.owner, &input.repo, &input.path);
    let body = PutContentBody {
        message: &input.message,
        content: encode_content(&input.content),
        branch: input.branch.as_deref(),
        sha: input.sha.as_deref(),
    };
    let payload: PutContentPayload = client.put_json(&path, &body).await?;

    let (content_path, content_sha) = match payload.content {
        Some(entry) => (entry.path, Some(entry.sha)),
        None => (input.path.clone(), None),
    };
    Ok(serde_json::json!({
        "path": content_path,
        "sha": content_sha,
        "commit": {
            "sha": payload.commit.sha,
            "url": payload.commit.html_url,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_with_embedded_newlines() {
        // "hello world\n" as GitHub would transport it
        let encoded = "aGVsbG8g\nd29ybGQK\n";
        assert_eq!(decode_content(encoded).unwrap(), "hello world\n");
    }

    #[test]
    fn invalid_base64_is_an_unknown_error() {
        let err = decode_content("not!!valid@@base64").unwrap_err();
        assert!(matches!(err, ToolError::Unknown { .. }));
    }

    #[test]
    fn content_encoding_roundtrip() {
        let raw = "fn main() {}\n";
        assert_eq!(decode_content(&encode_content(raw)).unwrap(), raw);
    }
}
