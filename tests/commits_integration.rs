use assert_cmd::Command;
use httpmock::prelude::*;

fn call_tool(
    server: &MockServer,
    name: &str,
    arguments: serde_json::Value,
) -> anyhow::Result<serde_json::Value> {
    let mut cmd = Command::cargo_bin("github-tools-mcp")?;
    cmd.env("GITHUB_TOKEN", "test-token");
    cmd.env("GITHUB_API_URL", server.base_url());
    cmd.env("MAX_RETRIES", "1");
    let request = serde_json::json!({
        "jsonrpc": "2.0", "method": "tools/call", "id": 1,
        "params": {"name": name, "arguments": arguments}
    });
    let assert = cmd
        .arg("--log-level")
        .arg("warn")
        .write_stdin(format!("{}\n", serde_json::to_string(&request)?))
        .assert();
    let out = String::from_utf8(assert.get_output().stdout.clone())?;
    Ok(serde_json::from_str(out.trim())?)
}

fn tool_text(response: &serde_json::Value) -> &str {
    response["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_default()
}

#[test]
fn list_commits_forwards_all_filters() -> anyhow::Result<()> {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/commits")
            .query_param("sha", "develop")
            .query_param("path", "src/lib.rs")
            .query_param("author", "alice")
            .query_param("since", "2024-01-01T00:00:00Z")
            .query_param("until", "2024-06-01T00:00:00Z")
            .query_param("per_page", "10")
            .query_param("page", "3");
        then.status(200).json_body(serde_json::json!([{
            "sha": "abc123",
            "commit": {
                "message": "Fix parser edge case",
                "author": {"name": "alice", "date": "2024-03-01T00:00:00Z"}
            },
            "html_url": "https://github.com/acme/widgets/commit/abc123"
        }]));
    });

    let response = call_tool(
        &server,
        "list_commits",
        serde_json::json!({
            "owner": "acme", "repo": "widgets",
            "sha": "develop", "path": "src/lib.rs", "author": "alice",
            "since": "2024-01-01T00:00:00Z", "until": "2024-06-01T00:00:00Z",
            "per_page": 10, "page": 3
        }),
    )?;
    listing.assert();

    let body: serde_json::Value = serde_json::from_str(tool_text(&response))?;
    assert_eq!(body[0]["sha"], "abc123");
    assert_eq!(body[0]["message"], "Fix parser edge case");
    assert_eq!(body[0]["author"], "alice");
    assert_eq!(body[0]["date"], "2024-03-01T00:00:00Z");
    Ok(())
}

#[test]
fn get_commit_projects_stats_and_files() -> anyhow::Result<()> {
    let server = MockServer::start();
    let commit = server.mock(|when, then| {
        when.method(GET).path("/repos/acme/widgets/commits/abc123");
        then.status(200).json_body(serde_json::json!({
            "sha": "abc123",
            "commit": {
                "message": "Add retry bound",
                "author": {
                    "name": "alice",
                    "email": "alice@example.com",
                    "date": "2024-03-01T00:00:00Z"
                }
            },
            "html_url": "https://github.com/acme/widgets/commit/abc123",
            "stats": {"additions": 12, "deletions": 4, "total": 16},
            "files": [{
                "filename": "src/retry.rs",
                "status": "modified",
                "additions": 12,
                "deletions": 4,
                "changes": 16,
                "patch": "@@ -1 +1 @@"
            }]
        }));
    });

    let response = call_tool(
        &server,
        "get_commit",
        serde_json::json!({"owner": "acme", "repo": "widgets", "ref": "abc123"}),
    )?;
    commit.assert();

    let body: serde_json::Value = serde_json::from_str(tool_text(&response))?;
    assert_eq!(body["sha"], "abc123");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["stats"]["total"], 16);
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["filename"], "src/retry.rs");
    assert_eq!(files[0]["changes"], 16);
    assert!(files[0].get("patch").is_none());
    Ok(())
}

#[test]
fn get_commit_tolerates_missing_stats() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/acme/widgets/commits/main");
        then.status(200).json_body(serde_json::json!({
            "sha": "def456",
            "commit": {"message": "Initial commit", "author": null},
            "html_url": "https://github.com/acme/widgets/commit/def456"
        }));
    });

    let response = call_tool(
        &server,
        "get_commit",
        serde_json::json!({"owner": "acme", "repo": "widgets", "ref": "main"}),
    )?;

    let body: serde_json::Value = serde_json::from_str(tool_text(&response))?;
    assert_eq!(body["sha"], "def456");
    assert_eq!(body["stats"], serde_json::Value::Null);
    assert_eq!(body["files"], serde_json::json!([]));
    assert_eq!(body["author"], serde_json::Value::Null);
    Ok(())
}

#[test]
fn empty_commit_ref_is_rejected_locally() -> anyhow::Result<()> {
    let server = MockServer::start();
    let remote = server.mock(|when, then| {
        when.path_matches(httpmock::Regex::new(".*").unwrap());
        then.status(200).json_body(serde_json::json!({}));
    });

    let response = call_tool(
        &server,
        "get_commit",
        serde_json::json!({"owner": "acme", "repo": "widgets", "ref": " "}),
    )?;
    assert_eq!(remote.hits(), 0);
    assert_eq!(response["result"]["isError"], true);
    assert!(tool_text(&response).contains("ref"));
    Ok(())
}
