use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{non_empty, page_params, parse_input, positive, Direction};
use crate::config::RetryPolicy;
use crate::error::ToolError;
use crate::github::{encode_path_segment, GitHubClient};
use crate::retry::with_retry;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
    All,
}

impl IssueState {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSort {
    Created,
    Updated,
    Comments,
}

impl IssueSort {
    fn as_str(self) -> &'static str {
        match self {
            IssueSort::Created => "created",
            IssueSort::Updated => "updated",
            IssueSort::Comments => "comments",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateIssueInput {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub body: Option<String>,
    pub labels: Option<Vec<String>>,
    pub assignees: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ListIssuesInput {
    pub owner: String,
    pub repo: String,
    pub state: Option<IssueState>,
    pub labels: Option<String>,
    pub sort: Option<IssueSort>,
    pub direction: Option<Direction>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetIssueInput {
    pub owner: String,
    pub repo: String,
    pub issue_number: i64,
}

#[derive(Debug, Serialize)]
struct CreateIssueBody<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignees: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    login: String,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    id: i64,
    number: i64,
    title: String,
    body: Option<String>,
    state: String,
    html_url: String,
    created_at: Option<String>,
    updated_at: Option<String>,
    user: Option<UserRef>,
    labels: Option<Vec<Value>>,
    assignees: Option<Vec<UserRef>>,
}

#[derive(Debug, Serialize)]
pub struct IssueListItem {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub url: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub user: Option<String>,
    pub labels: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct IssueDetail {
    pub number: i64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub url: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub user: Option<String>,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
}

/// GitHub returns labels either as plain strings or as objects with a
/// `name`; flatten both to names.
fn flatten_labels(labels: Option<Vec<Value>>) -> Vec<String> {
    labels
        .unwrap_or_default()
        .into_iter()
        .filter_map(|label| match label {
            Value::String(s) => Some(s),
            Value::Object(map) => map
                .get("name")
                .and_then(|n| n.as_str())
                .map(String::from),
            _ => None,
        })
        .collect()
}

fn issues_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}/issues",
        encode_path_segment(owner),
        encode_path_segment(repo)
    )
}

/// Not retried: issue creation is not idempotent.
pub async fn create_issue(client: &GitHubClient, args: Value) -> Result<Value, ToolError> {
    let input: CreateIssueInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    non_empty("title", &input.title)?;
    debug!("create_issue {}/{}", input.owner, input.repo);

    let body = CreateIssueBody {
        title: &input.title,
        body: input.body.as_deref(),
        labels: input.labels.as_deref(),
        assignees: input.assignees.as_deref(),
    };
    let created: IssuePayload = client
        .post_json(&issues_path(&input.owner, &input.repo), &body)
        .await?;
    Ok(serde_json::json!({
        "issue_id": created.id,
        "number": created.number,
        "url": created.html_url,
        "title": created.title,
        "state": created.state,
    }))
}

pub async fn list_issues(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: ListIssuesInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    let (per_page, page) = page_params(input.per_page, input.page)?;
    let state = input.state.unwrap_or(IssueState::Open);
    let sort = input.sort.unwrap_or(IssueSort::Created);
    let direction = input.direction.unwrap_or(Direction::Desc);
    debug!("list_issues {}/{} state={}", input.owner, input.repo, state.as_str());

    let mut query = vec![
        ("state", state.as_str().to_string()),
        ("sort", sort.as_str().to_string()),
        ("direction", direction.as_str().to_string()),
        ("per_page", per_page.to_string()),
        ("page", page.to_string()),
    ];
    if let Some(labels) = &input.labels {
        query.push(("labels", labels.clone()));
    }
    let path = issues_path(&input.owner, &input.repo);
    let payload: Vec<IssuePayload> = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &query)
    })
    .await?;

    let items: Vec<IssueListItem> = payload
        .into_iter()
        .map(|issue| IssueListItem {
            number: issue.number,
            title: issue.title,
            state: issue.state,
            url: issue.html_url,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
            user: issue.user.map(|u| u.login),
            labels: flatten_labels(issue.labels),
        })
        .collect();
    Ok(serde_json::to_value(items)?)
}

pub async fn get_issue(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: GetIssueInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    positive("issue_number", input.issue_number)?;
    debug!(
        "get_issue {}/{}#{}",
        input.owner, input.repo, input.issue_number
    );

    let path = format!(
        "{}/{}",
        issues_path(&input.owner, &input.repo),
        input.issue_number
    );
    let issue: IssuePayload = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &[])
    })
    .await?;

    let detail = IssueDetail {
        number: issue.number,
        title: issue.title,
        body: issue.body,
        state: issue.state,
        url: issue.html_url,
        created_at: issue.created_at,
        updated_at: issue.updated_at,
        user: issue.user.map(|u| u.login),
        labels: flatten_labels(issue.labels),
        assignees: issue
            .assignees
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.login)
            .collect(),
    };
    Ok(serde_json::to_value(detail)?)
}
