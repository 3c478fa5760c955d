pub mod config;
pub mod llm_client;
pub mod prompts;
pub mod remote;
pub mod repl;
pub mod server;
pub mod session;
