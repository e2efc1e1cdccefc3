use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

fn descriptor(name: &str, description: &str, schema: serde_json::Value) -> ToolDescriptor {
    ToolDescriptor {
        name: name.into(),
        description: description.into(),
        input_schema: schema,
    }
}

/// Static discovery metadata, one entry per operation. Fixed at build time.
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        descriptor(
            "get_repo_info",
            "Get information about a GitHub repository",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string", "description": "Repository owner (username or organization)"},
                    "repo": {"type": "string", "description": "Repository name"}
                },
                "required": ["owner", "repo"]
            }),
        ),
        descriptor(
            "list_repos",
            "List repositories for a user or organization",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "username": {"type": "string", "description": "Username to list repos for (optional, defaults to authenticated user)"},
                    "type": {"type": "string", "enum": ["all", "owner", "public", "private", "member"], "default": "all"},
                    "sort": {"type": "string", "enum": ["created", "updated", "pushed", "full_name"], "default": "updated"},
                    "direction": {"type": "string", "enum": ["asc", "desc"], "default": "desc"},
                    "per_page": {"type": "integer", "description": "Results per page (1-100)", "default": 30},
                    "page": {"type": "integer", "default": 1}
                }
            }),
        ),
        descriptor(
            "create_branch",
            "Create a new branch in a repository",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "branch": {"type": "string", "description": "Name of the new branch to create"},
                    "base_branch": {"type": "string", "description": "Base branch to create from", "default": "main"}
                },
                "required": ["owner", "repo", "branch"]
            }),
        ),
        descriptor(
            "create_issue",
            "Create a new issue",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "title": {"type": "string"},
                    "body": {"type": "string"},
                    "labels": {"type": "array", "items": {"type": "string"}},
                    "assignees": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["owner", "repo", "title"]
            }),
        ),
        descriptor(
            "list_issues",
            "List issues in a repository",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "state": {"type": "string", "enum": ["open", "closed", "all"], "default": "open"},
                    "labels": {"type": "string", "description": "Comma-separated label names"},
                    "sort": {"type": "string", "enum": ["created", "updated", "comments"], "default": "created"},
                    "direction": {"type": "string", "enum": ["asc", "desc"], "default": "desc"},
                    "per_page": {"type": "integer", "default": 30},
                    "page": {"type": "integer", "default": 1}
                },
                "required": ["owner", "repo"]
            }),
        ),
        descriptor(
            "get_issue",
            "Get a single issue by number",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "issue_number": {"type": "integer"}
                },
                "required": ["owner", "repo", "issue_number"]
            }),
        ),
        descriptor(
            "create_pull_request",
            "Create a new pull request",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "title": {"type": "string"},
                    "head": {"type": "string", "description": "Branch with the changes"},
                    "base": {"type": "string", "description": "Branch to merge into"},
                    "body": {"type": "string"},
                    "draft": {"type": "boolean", "default": false}
                },
                "required": ["owner", "repo", "title", "head", "base"]
            }),
        ),
        descriptor(
            "list_pull_requests",
            "List pull requests",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "state": {"type": "string", "enum": ["open", "closed", "all"], "default": "open"},
                    "head": {"type": "string"},
                    "base": {"type": "string"},
                    "sort": {"type": "string", "enum": ["created", "updated", "popularity", "long-running"], "default": "created"},
                    "direction": {"type": "string", "enum": ["asc", "desc"], "default": "desc"},
                    "per_page": {"type": "integer", "default": 30},
                    "page": {"type": "integer", "default": 1}
                },
                "required": ["owner", "repo"]
            }),
        ),
        descriptor(
            "get_pull_request",
            "Get a single pull request by number",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "pull_number": {"type": "integer"}
                },
                "required": ["owner", "repo", "pull_number"]
            }),
        ),
        descriptor(
            "list_commits",
            "List commits in a repository",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "sha": {"type": "string", "description": "SHA or branch to start listing commits from"},
                    "path": {"type": "string", "description": "Only commits containing this file path"},
                    "author": {"type": "string", "description": "GitHub login or email address"},
                    "since": {"type": "string", "description": "Only commits after this date (ISO 8601)"},
                    "until": {"type": "string", "description": "Only commits before this date (ISO 8601)"},
                    "per_page": {"type": "integer", "default": 30},
                    "page": {"type": "integer", "default": 1}
                },
                "required": ["owner", "repo"]
            }),
        ),
        descriptor(
            "get_commit",
            "Get details of a specific commit",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "ref": {"type": "string", "description": "SHA, branch, or tag name"}
                },
                "required": ["owner", "repo", "ref"]
            }),
        ),
        descriptor(
            "compare_branches",
            "Compare two branches and show differences",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "base": {"type": "string", "description": "Base branch name"},
                    "head": {"type": "string", "description": "Head branch name to compare against base"}
                },
                "required": ["owner", "repo", "base", "head"]
            }),
        ),
        descriptor(
            "merge_branches",
            "Merge one branch into another",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "base": {"type": "string", "description": "Base branch to merge into"},
                    "head": {"type": "string", "description": "Head branch to merge from"},
                    "commit_message": {"type": "string", "description": "Commit message for the merge (optional)"}
                },
                "required": ["owner", "repo", "base", "head"]
            }),
        ),
        descriptor(
            "get_file_content",
            "Get the contents of a file or directory",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "path": {"type": "string", "description": "File or directory path"},
                    "ref": {"type": "string", "description": "Branch, tag, or commit SHA"}
                },
                "required": ["owner", "repo", "path"]
            }),
        ),
        descriptor(
            "create_or_update_file",
            "Create or update a file in a repository",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "path": {"type": "string"},
                    "message": {"type": "string", "description": "Commit message"},
                    "content": {"type": "string", "description": "File content"},
                    "branch": {"type": "string"},
                    "sha": {"type": "string", "description": "SHA of the file to update (required for updates)"}
                },
                "required": ["owner", "repo", "path", "message", "content"]
            }),
        ),
        descriptor(
            "search_repos",
            "Search for repositories",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "q": {"type": "string", "description": "Search query"},
                    "sort": {"type": "string", "enum": ["stars", "forks", "help-wanted-issues", "updated"]},
                    "order": {"type": "string", "enum": ["asc", "desc"], "default": "desc"},
                    "per_page": {"type": "integer", "default": 30},
                    "page": {"type": "integer", "default": 1}
                },
                "required": ["q"]
            }),
        ),
        descriptor(
            "search_issues",
            "Search for issues and pull requests",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "q": {"type": "string", "description": "Search query"},
                    "sort": {"type": "string", "enum": ["comments", "reactions", "reactions-+1", "reactions--1", "reactions-smile", "reactions-thinking_face", "reactions-heart", "reactions-tada", "interactions", "created", "updated"]},
                    "order": {"type": "string", "enum": ["asc", "desc"], "default": "desc"},
                    "per_page": {"type": "integer", "default": 30},
                    "page": {"type": "integer", "default": 1}
                },
                "required": ["q"]
            }),
        ),
    ]
}
