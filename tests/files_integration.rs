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
fn single_file_content_is_decoded() -> anyhow::Result<()> {
    let server = MockServer::start();
    let contents = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/widgets/contents/src/main.rs")
            .query_param("ref", "main");
        then.status(200).json_body(serde_json::json!({
            "name": "main.rs",
            "path": "src/main.rs",
            "type": "file",
            "size": 13,
            "download_url": "https://raw.githubusercontent.com/acme/widgets/main/src/main.rs",
            // "fn main() {}\n" split across lines the way GitHub returns it
            "content": "Zm4gbWFpbigp\nIHt9Cg==\n"
        }));
    });

    let response = call_tool(
        &server,
        "get_file_content",
        serde_json::json!({
            "owner": "acme", "repo": "widgets", "path": "src/main.rs", "ref": "main"
        }),
    )?;
    contents.assert();

    let body: serde_json::Value = serde_json::from_str(tool_text(&response))?;
    assert_eq!(body["type"], "file");
    assert_eq!(body["content"], "fn main() {}\n");
    Ok(())
}

#[test]
fn directory_listing_has_no_content_field() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/acme/widgets/contents/src");
        then.status(200).json_body(serde_json::json!([
            {
                "name": "main.rs",
                "path": "src/main.rs",
                "type": "file",
                "size": 13,
                "download_url": "https://raw.githubusercontent.com/acme/widgets/main/src/main.rs"
            },
            {
                "name": "ops",
                "path": "src/ops",
                "type": "dir",
                "size": 0,
                "download_url": null
            }
        ]));
    });

    let response = call_tool(
        &server,
        "get_file_content",
        serde_json::json!({"owner": "acme", "repo": "widgets", "path": "src"}),
    )?;

    let body: serde_json::Value = serde_json::from_str(tool_text(&response))?;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "main.rs");
    assert_eq!(entries[1]["type"], "dir");
    assert!(entries[0].get("content").is_none());
    Ok(())
}

#[test]
fn submodule_entry_is_returned_without_decoding() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/acme/widgets/contents/vendor");
        then.status(200).json_body(serde_json::json!({
            "name": "vendor",
            "path": "vendor",
            "type": "submodule",
            "size": 0,
            "download_url": null
        }));
    });

    let response = call_tool(
        &server,
        "get_file_content",
        serde_json::json!({"owner": "acme", "repo": "widgets", "path": "vendor"}),
    )?;

    let body: serde_json::Value = serde_json::from_str(tool_text(&response))?;
    assert_eq!(body["type"], "submodule");
    assert_eq!(body["content"], serde_json::Value::Null);
    Ok(())
}

#[test]
fn create_file_sends_base64_payload() -> anyhow::Result<()> {
    let server = MockServer::start();
    let put = server.mock(|when, then| {
        when.method(PUT)
            .path("/repos/acme/widgets/contents/docs/README.md")
            .json_body_partial(r#"{"message": "add readme", "content": "aGVsbG8=", "branch": "main"}"#);
        then.status(201).json_body(serde_json::json!({
            "content": {"path": "docs/README.md", "sha": "file1"},
            "commit": {
                "sha": "commit1",
                "html_url": "https://github.com/acme/widgets/commit/commit1"
            }
        }));
    });

    let response = call_tool(
        &server,
        "create_or_update_file",
        serde_json::json!({
            "owner": "acme", "repo": "widgets",
            "path": "docs/README.md",
            "message": "add readme",
            "content": "hello",
            "branch": "main"
        }),
    )?;
    put.assert();

    let body: serde_json::Value = serde_json::from_str(tool_text(&response))?;
    assert_eq!(body["path"], "docs/README.md");
    assert_eq!(body["sha"], "file1");
    assert_eq!(body["commit"]["sha"], "commit1");
    Ok(())
}
