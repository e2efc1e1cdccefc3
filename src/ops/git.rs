use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{non_empty, parse_input};
use crate::config::RetryPolicy;
use crate::error::ToolError;
use crate::github::{encode_path_segment, GitHubClient};
use crate::retry::with_retry;

/// Ceiling for per-file patch text in compare output; longer patches are
/// truncated with an ellipsis marker to bound response size.
const PATCH_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct CompareBranchesInput {
    pub owner: String,
    pub repo: String,
    pub base: String,
    pub head: String,
}

#[derive(Debug, Deserialize)]
pub struct MergeBranchesInput {
    pub owner: String,
    pub repo: String,
    pub base: String,
    pub head: String,
    pub commit_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitAuthor {
    name: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitCommit {
    message: String,
    author: Option<GitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitNode {
    sha: String,
    commit: GitCommit,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComparedFile {
    filename: String,
    status: String,
    additions: i64,
    deletions: i64,
    changes: i64,
    patch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComparePayload {
    status: String,
    ahead_by: i64,
    behind_by: i64,
    total_commits: i64,
    base_commit: CommitNode,
    merge_base_commit: CommitNode,
    commits: Vec<CommitNode>,
    files: Option<Vec<ComparedFile>>,
}

#[derive(Debug, Serialize)]
struct CommitSummary {
    sha: String,
    message: String,
    author: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommitSummaryWithUrl {
    sha: String,
    message: String,
    author: Option<String>,
    date: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ComparedFileItem {
    filename: String,
    status: String,
    additions: i64,
    deletions: i64,
    changes: i64,
    patch: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompareResult {
    status: String,
    ahead_by: i64,
    behind_by: i64,
    total_commits: i64,
    base_commit: CommitSummary,
    merge_base_commit: CommitSummary,
    commits: Vec<CommitSummaryWithUrl>,
    files: Vec<ComparedFileItem>,
}

fn summarize(node: CommitNode) -> CommitSummary {
    let author = node.commit.author;
    CommitSummary {
        sha: node.sha,
        message: node.commit.message,
        author: author.as_ref().and_then(|a| a.name.clone()),
        date: author.and_then(|a| a.date),
    }
}

fn summarize_with_url(node: CommitNode) -> CommitSummaryWithUrl {
    let author = node.commit.author;
    CommitSummaryWithUrl {
        sha: node.sha,
        message: node.commit.message,
        author: author.as_ref().and_then(|a| a.name.clone()),
        date: author.and_then(|a| a.date),
        url: node.html_url,
    }
}

fn truncate_patch(patch: String) -> String {
    if patch.chars().count() <= PATCH_LIMIT {
        return patch;
    }
    let mut truncated: String = patch.chars().take(PATCH_LIMIT).collect();
    truncated.push_str("...");
    truncated
}

pub async fn compare_branches(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: CompareBranchesInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    non_empty("base", &input.base)?;
    non_empty("head", &input.head)?;
    debug!(
        "compare_branches {}/{}: {}...{}",
        input.owner, input.repo, input.base, input.head
    );

    let path = format!(
        "/repos/{}/{}/compare/{}...{}",
        encode_path_segment(&input.owner),
        encode_path_segment(&input.repo),
        encode_path_segment(&input.base),
        encode_path_segment(&input.head)
    );
    let payload: ComparePayload = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &[])
    })
    .await?;

    let result = CompareResult {
        status: payload.status,
        ahead_by: payload.ahead_by,
        behind_by: payload.behind_by,
        total_commits: payload.total_commits,
        base_commit: summarize(payload.base_commit),
        merge_base_commit: summarize(payload.merge_base_commit),
        commits: payload.commits.into_iter().map(summarize_with_url).collect(),
        files: payload
            .files
            .unwrap_or_default()
            .into_iter()
            .map(|f| ComparedFileItem {
                filename: f.filename,
                status: f.status,
                additions: f.additions,
                deletions: f.deletions,
                changes: f.changes,
                patch: f.patch.map(truncate_patch),
            })
            .collect(),
    };
    Ok(serde_json::to_value(result)?)
}

#[derive(Debug, Deserialize)]
struct MergePayload {
    sha: String,
    commit: GitCommit,
    html_url: Option<String>,
    parents: Option<Vec<MergeParent>>,
}

#[derive(Debug, Deserialize)]
struct MergeParent {
    sha: String,
    html_url: Option<String>,
}

/// Best-effort enrichment of merge failures: the status code remains
/// classification ground truth, but known upstream message substrings get a
/// clearer operation-specific text.
fn remap_merge_error(err: ToolError, base: &str, head: &str) -> ToolError {
    match err {
        ToolError::Remote { failure, .. } => {
            let message = &failure.message;
            let remapped = if message.contains("merge conflict") {
                format!("Merge conflict detected: {}", message)
            } else if message.contains("Nothing to merge") {
                format!("Nothing to merge: {} is already merged into {}", head, base)
            } else if message.contains("Base does not exist") {
                format!("Base branch '{}' does not exist", base)
            } else if message.contains("Head does not exist") {
                format!("Head branch '{}' does not exist", head)
            } else {
                format!("Error merging branches: {}", message)
            };
            ToolError::remote_remapped(failure, remapped)
        }
        other => other,
    }
}

/// Not retried: merging is not idempotent.
pub async fn merge_branches(client: &GitHubClient, args: Value) -> Result<Value, ToolError> {
    let input: MergeBranchesInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    non_empty("base", &input.base)?;
    non_empty("head", &input.head)?;
    debug!(
        "merge_branches {}/{}: {} into {}",
        input.owner, input.repo, input.head, input.base
    );

    let path = format!(
        "/repos/{}/{}/merges",
        encode_path_segment(&input.owner),
        encode_path_segment(&input.repo)
    );
    let commit_message = input
        .commit_message
        .clone()
        .unwrap_or_else(|| format!("Merge {} into {}", input.head, input.base));
    let body = serde_json::json!({
        "base": input.base,
        "head": input.head,
        "commit_message": commit_message,
    });
    let merged: MergePayload = client
        .post_json(&path, &body)
        .await
        .map_err(|e| remap_merge_error(e, &input.base, &input.head))?;

    let author = merged.commit.author;
    Ok(serde_json::json!({
        "sha": merged.sha,
        "merged": true,
        "message": merged.commit.message,
        "author": author.as_ref().and_then(|a| a.name.clone()),
        "date": author.and_then(|a| a.date),
        "url": merged.html_url,
        "parents": merged
            .parents
            .unwrap_or_default()
            .into_iter()
            .map(|p| serde_json::json!({"sha": p.sha, "url": p.html_url}))
            .collect::<Vec<_>>(),
    }))
}
