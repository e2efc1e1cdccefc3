use std::io::{self, BufRead, Write};
use std::time::Instant;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::ToolError;
use crate::github::GitHubClient;
use crate::mcp;
use crate::ops;
use crate::rate::RateLimiter;
use crate::tools::{tool_descriptors, PROTOCOL_VERSION};

// Minimal JSON-RPC 2.0 types
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Id {
    Str(String),
    Num(i64),
    Null,
}

#[derive(Debug, Serialize, Deserialize)]
struct Request {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    id: Option<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Response {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: Option<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

fn rpc_error(id: Option<Id>, code: i64, message: &str, data: Option<Value>) -> Response {
    Response {
        jsonrpc: "2.0".into(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.into(),
            data,
        }),
        id,
    }
}

fn rpc_ok(id: Option<Id>, result: Value) -> Response {
    Response {
        jsonrpc: "2.0".into(),
        result: Some(result),
        error: None,
        id,
    }
}

struct ServerContext {
    config: Config,
    client: GitHubClient,
    limiter: RateLimiter,
}

pub async fn run_stdio_server(config: Config) -> anyhow::Result<()> {
    info!(
        "Starting github-tools-mcp stdio server; protocol={}",
        PROTOCOL_VERSION
    );
    let client = GitHubClient::new(&config)?;
    let limiter = RateLimiter::new(config.rate_limit);
    let ctx = ServerContext {
        config,
        client,
        limiter,
    };

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let req: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                write_response(&rpc_error(
                    None,
                    -32700,
                    &format!("Parse error: {}", e),
                    None,
                ))?;
                continue;
            }
        };
        debug!("Received method={}", req.method);
        let resp = dispatch(&ctx, req).await;
        write_response(&resp)?;
    }
    Ok(())
}

fn write_response(resp: &Response) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let payload = serde_json::to_string(resp)?;
    writeln!(out, "{}", payload)?;
    out.flush()?;
    Ok(())
}

async fn dispatch(ctx: &ServerContext, req: Request) -> Response {
    match req.method.as_str() {
        "initialize" => handle_initialize(req.id),
        "tools/list" => handle_tools_list(req.id),
        "tools/call" => handle_tools_call(ctx, req.id, req.params).await,
        "ping" => rpc_ok(req.id, serde_json::json!({"message": "pong"})),
        other => rpc_error(req.id, -32601, &format!("Method not found: {}", other), None),
    }
}

fn handle_initialize(id: Option<Id>) -> Response {
    rpc_ok(
        id,
        serde_json::json!({
            "server": {
                "name": "github-tools-mcp",
                "version": env!("CARGO_PKG_VERSION"),
                "protocol": PROTOCOL_VERSION,
            }
        }),
    )
}

fn handle_tools_list(id: Option<Id>) -> Response {
    let tools = tool_descriptors();
    rpc_ok(id, serde_json::json!({ "tools": tools }))
}

#[derive(Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

async fn handle_tools_call(ctx: &ServerContext, id: Option<Id>, params: Value) -> Response {
    let parsed: Result<ToolCallParams, _> = serde_json::from_value(params);
    let Ok(call) = parsed else {
        return rpc_error(id, -32602, "Invalid params", None);
    };
    if !ctx.limiter.try_acquire() {
        warn!("Rate limit exceeded; rejecting tool {}", call.name);
        return rpc_ok(id, mcp::error_text("Rate limit exceeded"));
    }
    let started = Instant::now();
    info!("Tool request: {}", call.name);
    match invoke_tool(ctx, &call.name, call.arguments).await {
        Ok(result) => {
            info!(
                "Tool completed: {} ({}ms)",
                call.name,
                started.elapsed().as_millis()
            );
            rpc_ok(id, mcp::success(&result))
        }
        Err(e) => {
            error!("Tool failed: {}: {}", call.name, e);
            rpc_ok(id, mcp::failure(&e))
        }
    }
}

// Every failure path must come back as a ToolError so the envelope stays
// total; nothing here may panic across the dispatch boundary.
async fn invoke_tool(ctx: &ServerContext, name: &str, args: Value) -> Result<Value, ToolError> {
    let client = &ctx.client;
    let retry = ctx.config.retry;
    match name {
        "get_repo_info" => ops::repos::get_repo_info(client, retry, args).await,
        "list_repos" => ops::repos::list_repos(client, retry, args).await,
        "create_branch" => ops::repos::create_branch(client, args).await,
        "create_issue" => ops::issues::create_issue(client, args).await,
        "list_issues" => ops::issues::list_issues(client, retry, args).await,
        "get_issue" => ops::issues::get_issue(client, retry, args).await,
        "create_pull_request" => ops::pulls::create_pull_request(client, args).await,
        "list_pull_requests" => ops::pulls::list_pull_requests(client, retry, args).await,
        "get_pull_request" => ops::pulls::get_pull_request(client, retry, args).await,
        "list_commits" => ops::commits::list_commits(client, retry, args).await,
        "get_commit" => ops::commits::get_commit(client, retry, args).await,
        "compare_branches" => ops::git::compare_branches(client, retry, args).await,
        "merge_branches" => ops::git::merge_branches(client, args).await,
        "get_file_content" => ops::files::get_file_content(client, retry, args).await,
        "create_or_update_file" => ops::files::create_or_update_file(client, args).await,
        "search_repos" => ops::search::search_repos(client, retry, args).await,
        "search_issues" => ops::search::search_issues(client, retry, args).await,
        other => Err(ToolError::unknown(format!("Unknown tool: {}", other))),
    }
}
