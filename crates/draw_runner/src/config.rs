use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, ValueEnum};
use draw_commands::{CanvasConfig, ExtractOrder};

use crate::remote::DEFAULT_DRAW_URL;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Draw into an in-process raster canvas.
    #[default]
    Local,
    /// Forward drawing calls to a drawing service.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Order {
    #[default]
    Operation,
    Position,
}

impl From<Order> for ExtractOrder {
    fn from(o: Order) -> Self {
        match o {
            Order::Operation => ExtractOrder::ByOperation,
            Order::Position => ExtractOrder::ByPosition,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub ollama_url: String,
    pub model: String,
    pub draw_url: String,
    pub mode: Mode,
    pub canvas: CanvasConfig,
    pub llm_timeout: Duration,
    pub draw_timeout: Duration,
    pub order: ExtractOrder,
    /// Local mode: written on exit.
    pub output: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            draw_url: DEFAULT_DRAW_URL.to_string(),
            mode: Mode::Local,
            canvas: CanvasConfig::default(),
            llm_timeout: Duration::from_secs(30),
            draw_timeout: Duration::from_secs(10),
            order: ExtractOrder::ByOperation,
            output: None,
        }
    }
}

/// Options shared by every subcommand; each falls back to an environment variable.
#[derive(Debug, Clone, Args)]
pub struct RunnerArgs {
    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    pub ollama_url: String,
    #[arg(long, env = "OLLAMA_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
    #[arg(long, env = "DRAW_API_URL", default_value = DEFAULT_DRAW_URL)]
    pub draw_url: String,
    #[arg(long, env = "DRAW_MODE", value_enum, default_value_t = Mode::Local)]
    pub mode: Mode,
    #[arg(long, env = "CANVAS_WIDTH", default_value_t = 800)]
    pub width: u32,
    #[arg(long, env = "CANVAS_HEIGHT", default_value_t = 600)]
    pub height: u32,
    #[arg(long, env = "CANVAS_BACKGROUND", default_value = "#ffffff")]
    pub background: String,
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value_t = 30)]
    pub llm_timeout_secs: u64,
    #[arg(long, env = "DRAW_TIMEOUT_SECS", default_value_t = 10)]
    pub draw_timeout_secs: u64,
    #[arg(long, value_enum, default_value_t = Order::Operation)]
    pub order: Order,
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl From<RunnerArgs> for RunnerConfig {
    fn from(a: RunnerArgs) -> Self {
        Self {
            ollama_url: a.ollama_url,
            model: a.model,
            draw_url: a.draw_url,
            mode: a.mode,
            canvas: CanvasConfig {
                width: a.width,
                height: a.height,
                background: a.background,
            },
            llm_timeout: Duration::from_secs(a.llm_timeout_secs),
            draw_timeout: Duration::from_secs(a.draw_timeout_secs),
            order: a.order.into(),
            output: a.output,
        }
    }
}
