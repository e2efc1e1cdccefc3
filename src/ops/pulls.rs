use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::issues::IssueState;
use super::{non_empty, page_params, parse_input, positive, Direction};
use crate::config::RetryPolicy;
use crate::error::ToolError;
use crate::github::{encode_path_segment, GitHubClient};
use crate::retry::with_retry;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullSort {
    Created,
    Updated,
    Popularity,
    #[serde(rename = "long-running")]
    LongRunning,
}

impl PullSort {
    fn as_str(self) -> &'static str {
        match self {
            PullSort::Created => "created",
            PullSort::Updated => "updated",
            PullSort::Popularity => "popularity",
            PullSort::LongRunning => "long-running",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePullRequestInput {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: Option<String>,
    pub draft: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListPullRequestsInput {
    pub owner: String,
    pub repo: String,
    pub state: Option<IssueState>,
    pub head: Option<String>,
    pub base: Option<String>,
    pub sort: Option<PullSort>,
    pub direction: Option<Direction>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetPullRequestInput {
    pub owner: String,
    pub repo: String,
    pub pull_number: i64,
}

#[derive(Debug, Serialize)]
struct CreatePullRequestBody<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    login: String,
}

#[derive(Debug, Deserialize)]
struct PullPayload {
    number: i64,
    title: String,
    body: Option<String>,
    state: String,
    html_url: String,
    head: BranchRef,
    base: BranchRef,
    created_at: Option<String>,
    updated_at: Option<String>,
    user: Option<UserRef>,
    mergeable: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PullListItem {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub url: String,
    pub head: String,
    pub base: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PullDetail {
    pub number: i64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub url: String,
    pub head: String,
    pub base: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub user: Option<String>,
    pub mergeable: Option<bool>,
}

fn pulls_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}/pulls",
        encode_path_segment(owner),
        encode_path_segment(repo)
    )
}

/// Not retried: PR creation is not idempotent.
pub async fn create_pull_request(client: &GitHubClient, args: Value) -> Result<Value, ToolError> {
    let input: CreatePullRequestInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    non_empty("title", &input.title)?;
    non_empty("head", &input.head)?;
    non_empty("base", &input.base)?;
    debug!(
        "create_pull_request {}/{}: {} -> {}",
        input.owner, input.repo, input.head, input.base
    );

    let body = CreatePullRequestBody {
        title: &input.title,
        head: &input.head,
        base: &input.base,
        body: input.body.as_deref(),
        draft: input.draft.unwrap_or(false),
    };
    let created: PullPayload = client
        .post_json(&pulls_path(&input.owner, &input.repo), &body)
        .await?;
    Ok(serde_json::json!({
        "number": created.number,
        "title": created.title,
        "state": created.state,
        "url": created.html_url,
        "head": created.head.name,
        "base": created.base.name,
    }))
}

pub async fn list_pull_requests(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: ListPullRequestsInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    let (per_page, page) = page_params(input.per_page, input.page)?;
    let state = input.state.unwrap_or(IssueState::Open);
    let sort = input.sort.unwrap_or(PullSort::Created);
    let direction = input.direction.unwrap_or(Direction::Desc);
    debug!("list_pull_requests {}/{}", input.owner, input.repo);

    let mut query = vec![
        ("state", state.as_str().to_string()),
        ("sort", sort.as_str().to_string()),
        ("direction", direction.as_str().to_string()),
        ("per_page", per_page.to_string()),
        ("page", page.to_string()),
    ];
    if let Some(head) = &input.head {
        query.push(("head", head.clone()));
    }
    if let Some(base) = &input.base {
        query.push(("base", base.clone()));
    }
    let path = pulls_path(&input.owner, &input.repo);
    let payload: Vec<PullPayload> = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &query)
    })
    .await?;

    let items: Vec<PullListItem> = payload
        .into_iter()
        .map(|pr| PullListItem {
            number: pr.number,
            title: pr.title,
            state: pr.state,
            url: pr.html_url,
            head: pr.head.name,
            base: pr.base.name,
            created_at: pr.created_at,
            updated_at: pr.updated_at,
            user: pr.user.map(|u| u.login),
        })
        .collect();
    Ok(serde_json::to_value(items)?)
}

pub async fn get_pull_request(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: GetPullRequestInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    positive("pull_number", input.pull_number)?;
    debug!(
        "get_pull_request {}/{}#{}",
        input.owner, input.repo, input.pull_number
    );

    let path = format!(
        "{}/{}",
        pulls_path(&input.owner, &input.repo),
        input.pull_number
    );
    let pr: PullPayload = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &[])
    })
    .await?;

    let detail = PullDetail {
        number: pr.number,
        title: pr.title,
        body: pr.body,
        state: pr.state,
        url: pr.html_url,
        head: pr.head.name,
        base: pr.base.name,
        created_at: pr.created_at,
        updated_at: pr.updated_at,
        user: pr.user.map(|u| u.login),
        mergeable: pr.mergeable,
    };
    Ok(serde_json::to_value(detail)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_sort_literals() {
        let sort: PullSort = serde_json::from_str("\"long-running\"").unwrap();
        assert_eq!(sort.as_str(), "long-running");
        assert!(serde_json::from_str::<PullSort>("\"oldest\"").is_err());
    }
}
