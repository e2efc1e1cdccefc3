use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{non_empty, page_params, parse_input, Direction};
use crate::config::RetryPolicy;
use crate::error::ToolError;
use crate::github::GitHubClient;
use crate::retry::with_retry;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoSearchSort {
    Stars,
    Forks,
    #[serde(rename = "help-wanted-issues")]
    HelpWantedIssues,
    Updated,
}

impl RepoSearchSort {
    fn as_str(self) -> &'static str {
        match self {
            RepoSearchSort::Stars => "stars",
            RepoSearchSort::Forks => "forks",
            RepoSearchSort::HelpWantedIssues => "help-wanted-issues",
            RepoSearchSort::Updated => "updated",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum IssueSearchSort {
    #[serde(rename = "comments")]
    Comments,
    #[serde(rename = "reactions")]
    Reactions,
    #[serde(rename = "reactions-+1")]
    ReactionsPlusOne,
    #[serde(rename = "reactions--1")]
    ReactionsMinusOne,
    #[serde(rename = "reactions-smile")]
    ReactionsSmile,
    #[serde(rename = "reactions-thinking_face")]
    ReactionsThinkingFace,
    #[serde(rename = "reactions-heart")]
    ReactionsHeart,
    #[serde(rename = "reactions-tada")]
    ReactionsTada,
    #[serde(rename = "interactions")]
    Interactions,
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "updated")]
    Updated,
}

impl IssueSearchSort {
    fn as_str(self) -> &'static str {
        match self {
            IssueSearchSort::Comments => "comments",
            IssueSearchSort::Reactions => "reactions",
            IssueSearchSort::ReactionsPlusOne => "reactions-+1",
            IssueSearchSort::ReactionsMinusOne => "reactions--1",
            IssueSearchSort::ReactionsSmile => "reactions-smile",
            IssueSearchSort::ReactionsThinkingFace => "reactions-thinking_face",
            IssueSearchSort::ReactionsHeart => "reactions-heart",
            IssueSearchSort::ReactionsTada => "reactions-tada",
            IssueSearchSort::Interactions => "interactions",
            IssueSearchSort::Created => "created",
            IssueSearchSort::Updated => "updated",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchReposInput {
    pub q: String,
    pub sort: Option<RepoSearchSort>,
    pub order: Option<Direction>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchIssuesInput {
    pub q: String,
    pub sort: Option<IssueSearchSort>,
    pub order: Option<Direction>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchPayload<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RepoHit {
    full_name: String,
    description: Option<String>,
    stargazers_count: i64,
    forks_count: i64,
    language: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    html_url: String,
}

#[derive(Debug, Serialize)]
pub struct RepoSearchItem {
    pub name: String,
    pub description: Option<String>,
    pub stars: i64,
    pub forks: i64,
    pub language: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    login: String,
}

#[derive(Debug, Deserialize)]
struct IssueHit {
    number: i64,
    title: String,
    state: String,
    html_url: String,
    created_at: Option<String>,
    updated_at: Option<String>,
    user: Option<UserRef>,
    repository_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IssueSearchItem {
    pub number: i64,
    pub title: String,
    pub state: String,
    pub url: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub user: Option<String>,
    pub repository_url: Option<String>,
}

pub async fn search_repos(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: SearchReposInput = parse_input(args)?;
    non_empty("q", &input.q)?;
    let (per_page, page) = page_params(input.per_page, input.page)?;
    let order = input.order.unwrap_or(Direction::Desc);
    debug!("search_repos q={}", input.q);

    let mut query = vec![
        ("q", input.q.clone()),
        ("order", order.as_str().to_string()),
        ("per_page", per_page.to_string()),
        ("page", page.to_string()),
    ];
    if let Some(sort) = input.sort {
        query.push(("sort", sort.as_str().to_string()));
    }
    let payload: SearchPayload<RepoHit> = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json("/search/repositories", &query)
    })
    .await?;

    let items: Vec<RepoSearchItem> = payload
        .items
        .into_iter()
        .map(|r| RepoSearchItem {
            name: r.full_name,
            description: r.description,
            stars: r.stargazers_count,
            forks: r.forks_count,
            language: r.language,
            created_at: r.created_at,
            updated_at: r.updated_at,
            html_url: r.html_url,
        })
        .collect();
    Ok(serde_json::to_value(items)?)
}

pub async fn search_issues(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: SearchIssuesInput = parse_input(args)?;
    non_empty("q", &input.q)?;
    let (per_page, page) = page_params(input.per_page, input.page)?;
    let order = input.order.unwrap_or(Direction::Desc);
    debug!("search_issues q={}", input.q);

    let mut query = vec![
        ("q", input.q.clone()),
        ("order", order.as_str().to_string()),
        ("per_page", per_page.to_string()),
        ("page", page.to_string()),
    ];
    if let Some(sort) = input.sort {
        query.push(("sort", sort.as_str().to_string()));
    }
    let payload: SearchPayload<IssueHit> = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json("/search/issues", &query)
    })
    .await?;

    let items: Vec<IssueSearchItem> = payload
        .items
        .into_iter()
        .map(|i| IssueSearchItem {
            number: i.number,
            title: i.title,
            state: i.state,
            url: i.html_url,
            created_at: i.created_at,
            updated_at: i.updated_at,
            user: i.user.map(|u| u.login),
            repository_url: i.repository_url,
        })
        .collect();
    Ok(serde_json::to_value(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_search_sort_literals() {
        let sort: IssueSearchSort = serde_json::from_str("\"reactions-+1\"").unwrap();
        assert_eq!(sort.as_str(), "reactions-+1");
        assert!(serde_json::from_str::<IssueSearchSort>("\"stars\"").is_err());
    }
}
