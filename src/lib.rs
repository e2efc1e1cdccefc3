pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod mcp;
pub mod ops;
pub mod rate;
pub mod retry;
pub mod server;
pub mod tools;
