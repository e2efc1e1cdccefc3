use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("github-tools-mcp")
        .about("GitHub tools MCP server (stdio JSON-RPC)")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .help("Override log level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
}

/// Initialize env_logger. Precedence: CLI flag, then RUST_LOG, then LOG_LEVEL,
/// then "info".
pub fn init_logging(level: Option<&str>) {
    if let Some(lvl) = level {
        std::env::set_var("RUST_LOG", lvl);
    } else if std::env::var("RUST_LOG").is_err() {
        if let Ok(lvl) = std::env::var("LOG_LEVEL") {
            std::env::set_var("RUST_LOG", lvl);
        } else {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
