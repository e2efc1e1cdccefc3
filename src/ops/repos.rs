use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{non_empty, page_params, parse_input, Direction};
use crate::config::RetryPolicy;
use crate::error::ToolError;
use crate::github::{encode_path_segment, GitHubClient};
use crate::retry::with_retry;

#[derive(Debug, Deserialize)]
pub struct GetRepoInfoInput {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    All,
    Owner,
    Public,
    Private,
    Member,
}

impl RepoType {
    fn as_str(self) -> &'static str {
        match self {
            RepoType::All => "all",
            RepoType::Owner => "owner",
            RepoType::Public => "public",
            RepoType::Private => "private",
            RepoType::Member => "member",
        }
    }

    /// The per-user listing endpoint only accepts all|owner|member.
    fn for_user_listing(self) -> &'static str {
        match self {
            RepoType::All | RepoType::Public | RepoType::Private => "all",
            RepoType::Owner => "owner",
            RepoType::Member => "member",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoSort {
    Created,
    Updated,
    Pushed,
    FullName,
}

impl RepoSort {
    fn as_str(self) -> &'static str {
        match self {
            RepoSort::Created => "created",
            RepoSort::Updated => "updated",
            RepoSort::Pushed => "pushed",
            RepoSort::FullName => "full_name",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListReposInput {
    pub username: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<RepoType>,
    pub sort: Option<RepoSort>,
    pub direction: Option<Direction>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBranchInput {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub base_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoPayload {
    full_name: String,
    description: Option<String>,
    stargazers_count: i64,
    forks_count: i64,
    language: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    clone_url: Option<String>,
    html_url: String,
}

/// Fixed projection for get_repo_info; the field set never varies with the
/// upstream payload.
#[derive(Debug, Serialize)]
pub struct RepoInfo {
    pub name: String,
    pub description: Option<String>,
    pub stars: i64,
    pub forks: i64,
    pub language: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub clone_url: Option<String>,
    pub html_url: String,
}

#[derive(Debug, Serialize)]
pub struct RepoListItem {
    pub name: String,
    pub description: Option<String>,
    pub stars: i64,
    pub forks: i64,
    pub language: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub html_url: String,
}

fn project_repo(p: RepoPayload) -> RepoInfo {
    RepoInfo {
        name: p.full_name,
        description: p.description,
        stars: p.stargazers_count,
        forks: p.forks_count,
        language: p.language,
        created_at: p.created_at,
        updated_at: p.updated_at,
        clone_url: p.clone_url,
        html_url: p.html_url,
    }
}

fn project_repo_item(p: RepoPayload) -> RepoListItem {
    RepoListItem {
        name: p.full_name,
        description: p.description,
        stars: p.stargazers_count,
        forks: p.forks_count,
        language: p.language,
        created_at: p.created_at,
        updated_at: p.updated_at,
        html_url: p.html_url,
    }
}

fn repo_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}",
        encode_path_segment(owner),
        encode_path_segment(repo)
    )
}

pub async fn get_repo_info(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: GetRepoInfoInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    debug!("get_repo_info {}/{}", input.owner, input.repo);
    let path = repo_path(&input.owner, &input.repo);
    let payload: RepoPayload = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &[])
    })
    .await?;
    Ok(serde_json::to_value(project_repo(payload))?)
}

pub async fn list_repos(
    client: &GitHubClient,
    retry: RetryPolicy,
    args: Value,
) -> Result<Value, ToolError> {
    let input: ListReposInput = parse_input(args)?;
    let (per_page, page) = page_params(input.per_page, input.page)?;
    let kind = input.kind.unwrap_or(RepoType::All);
    let sort = input.sort.unwrap_or(RepoSort::Updated);
    let direction = input.direction.unwrap_or(Direction::Desc);

    let (path, type_param) = match &input.username {
        Some(username) => {
            non_empty("username", username)?;
            (
                format!("/users/{}/repos", encode_path_segment(username)),
                kind.for_user_listing(),
            )
        }
        None => ("/user/repos".to_string(), kind.as_str()),
    };
    debug!("list_repos {} (type={})", path, type_param);
    let query = [
        ("type", type_param.to_string()),
        ("sort", sort.as_str().to_string()),
        ("direction", direction.as_str().to_string()),
        ("per_page", per_page.to_string()),
        ("page", page.to_string()),
    ];
    let payload: Vec<RepoPayload> = with_retry(retry.max_retries, retry.base_delay, || {
        client.get_json(&path, &query)
    })
    .await?;
    let items: Vec<RepoListItem> = payload.into_iter().map(project_repo_item).collect();
    Ok(serde_json::to_value(items)?)
}

#[derive(Debug, Deserialize)]
struct BranchPayload {
    commit: BranchCommit,
}

#[derive(Debug, Deserialize)]
struct BranchCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    url: String,
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

/// Two-step branch creation: resolve the base branch head, then create the
/// ref at that SHA. The ref call never runs unless the lookup succeeded, so
/// a failure leaves no partial state behind. Not retried: ref creation is
/// not idempotent.
pub async fn create_branch(client: &GitHubClient, args: Value) -> Result<Value, ToolError> {
    let input: CreateBranchInput = parse_input(args)?;
    non_empty("owner", &input.owner)?;
    non_empty("repo", &input.repo)?;
    non_empty("branch", &input.branch)?;
    let base = input.base_branch.as_deref().unwrap_or("main");
    non_empty("base_branch", base)?;
    debug!(
        "create_branch {}/{}: {} from {}",
        input.owner, input.repo, input.branch, base
    );

    let branch_path = format!(
        "{}/branches/{}",
        repo_path(&input.owner, &input.repo),
        encode_path_segment(base)
    );
    let base_payload: BranchPayload = client.get_json(&branch_path, &[]).await?;

    let refs_path = format!("{}/git/refs", repo_path(&input.owner, &input.repo));
    let body = json!({
        "ref": format!("refs/heads/{}", input.branch),
        "sha": base_payload.commit.sha,
    });
    let created: RefPayload = client.post_json(&refs_path, &body).await?;

    Ok(json!({
        "ref": created.git_ref,
        "sha": created.object.sha,
        "url": created.url,
        "branch_name": input.branch,
        "base_branch": base,
    }))
}
