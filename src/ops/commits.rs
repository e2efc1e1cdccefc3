use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{non_empty, page_params, parse_input};
use crate::config::RetryPolicy;
use crate::error::ToolError;
use crate::github::{encode_path_segment, GitHubClient};
use crate::retry::with_retry;

#[derive(Debug, Deserialize)]
pub struct ListCommitsInput {
    pub owner: String,
    pub repo: String,
    pub sha: Option<String>,
    pub path: Option<String>,
    pub author: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetCommitInput {
    pub owner: String,
    pub repo: String,
    #[serde(rename = "ref")]
    pub commit_ref: String,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    name: Option<String>,
    email: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitDetails {
    message: String,
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitStats {
    additions: i64,
    deletions: i64,
    total: i64,
}

#[derive(Debug, Deserialize)]
struct CommitFile {
    filename: String,
    status: String,
    additions: i64,
    deletions: i64,
    changes: i64,
}

#[derive(Debug, Deserialize)]
struct CommitPayload {
    sha: String,
    commit: CommitDetails,
    html_url: String,
    stats: Option<CommitStats>,
    files: Option<Vec<CommitFile>>,
}

#[derive(Debug, Serialize)]
pub struct CommitListItem {
    pub sha: String,
    pub message: String,
    pub author: Option<String>,
    pub date: Option<String>,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CommitFileItem {
    pub filename: String,
    pub status: String,
    pub additions: i64,
    pub deletions: i64,
    pub changes: i64,
}

#[derive(Debug, Serialize)]
pub struct CommitStatsItem {
    pub additions: i64,
    pub deletions: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct CommitDetail {
    pub sha: String,
    pub message: String,
    pub author: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub url: String,
    pub stats: Option<CommitStatsItem>,
    pub files: Vec<CommitFileItem>,
}

fn commits_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}/commits",
        encode_path_segment(owner),
        encode_path_segment(repo)
    )
}

pub async fn list_commits(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: ListCommitsInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    let (per_page, page) = page_params(input.per_page, input.page)?;
    debug!("list_commits {}/{}", input.owner, input.repo);

    let mut query = vec![
        ("per_page", per_page.to_string()),
        ("page", page.to_string()),
    ];
    for (key, value) in [
        ("sha", &input.sha),
        ("path", &input.path),
        ("author", &input.author),
        ("since", &input.since),
        ("until", &input.until),
    ] {
        if let Some(v) = value {
            query.push((key, v.clone()));
        }
    }
    let path = commits_path(&input.owner, &input.repo);
    let payload: Vec<CommitPayload> = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &query)
    })
    .await?;

    let items: Vec<CommitListItem> = payload
        .into_iter()
        .map(|c| {
            let author = c.commit.author;
            CommitListItem {
                sha: c.sha,
                message: c.commit.message,
                author: author.as_ref().and_then(|a| a.name.clone()),
                date: author.and_then(|a| a.date),
                url: c.html_url,
            }
        })
        .collect();
    Ok(serde_json::to_value(items)?)
}

pub async fn get_commit(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: GetCommitInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    non_empty("ref", &input.commit_ref)?;
    debug!(
        "get_commit {}/{}@{}",
        input.owner, input.repo, input.commit_ref
    );

    let path = format!(
        "{}/{}",
        commits_path(&input.owner, &input.repo),
        encode_path_segment(&input.commit_ref)
    );
    let c: CommitPayload = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &[])
    })
    .await?;

    let author = c.commit.author;
    let detail = CommitDetail {
        sha: c.sha,
        message: c.commit.message,
        author: author.as_ref().and_then(|a| a.name.clone()),
        email: author.as_ref().and_then(|a| a.email.clone()),
        date: author.and_then(|a| a.date),
        url: c.html_url,
        stats: c.stats.map(|s| CommitStatsItem {
            additions: s.additions,
            deletions: s.deletions,
            total: s.total,
        }),
        files: c
            .files
            .unwrap_or_default()
            .into_iter()
            .map(|f| CommitFileItem {
                filename: f.filename,
                status: f.status,
                additions: f.additions,
                deletions: f.deletions,
                changes: f.changes,
            })
            .collect(),
    };
    Ok(serde_json::to_value(detail)?)
}
