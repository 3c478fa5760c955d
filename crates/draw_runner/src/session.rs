use draw_commands::command::literal;
use draw_commands::{
    execute, execute_all, CommandResult, CommandTable, DrawError, DrawingTarget, ExportOutcome,
    RunSummary,
};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::config::RunnerConfig;
use crate::llm_client::{LlmClient, LlmError, LlmRequest};
use crate::prompts::drawing_prompt;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("language model unavailable: {0}")]
    Llm(#[from] LlmError),
    #[error("drawing target unavailable: {0}")]
    Draw(#[from] DrawError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptOutcome {
    pub response: String,
    #[serde(flatten)]
    pub summary: RunSummary,
}

/// Prompt → model → extract → dispatch, against one drawing target.
pub struct DrawSession<T: DrawingTarget> {
    llm: LlmClient,
    target: T,
    table: CommandTable,
    cfg: RunnerConfig,
}

impl<T: DrawingTarget> DrawSession<T> {
    pub fn new(llm: LlmClient, target: T, cfg: RunnerConfig) -> Self {
        let table = CommandTable::default().with_order(cfg.order);
        Self {
            llm,
            target,
            table,
            cfg,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.cfg
    }

    /// Both the model server and the drawing target must answer before a session starts.
    pub fn check_connections(&mut self) -> Result<(), RunnerError> {
        self.llm.ping()?;
        info!("[session] model server reachable");
        self.target.execute_raw("ping()")?;
        info!("[session] drawing target reachable");
        Ok(())
    }

    /// Dispatch every `api.*` call in `text`; with none, the first literal command is tried.
    pub fn process_text(&mut self, text: &str) -> RunSummary {
        let mut cmds = self.table.extract(text);
        if cmds.is_empty() {
            if let Some(cmd) = literal::find_literal(text) {
                info!("[session] no api calls, using literal {cmd}");
                cmds.push(cmd);
            }
        }
        let summary = execute_all(&cmds, &mut self.target);
        info!(
            "[session] total={} ok={}",
            summary.total_commands, summary.successful_commands
        );
        summary
    }

    pub fn process_prompt(&mut self, user_input: &str) -> Result<PromptOutcome, LlmError> {
        let prompt = drawing_prompt(user_input, self.cfg.canvas.width, self.cfg.canvas.height);
        let resp = self.llm.complete(LlmRequest {
            prompt,
            timeout: self.cfg.llm_timeout,
        })?;
        let summary = self.process_text(&resp.content);
        Ok(PromptOutcome {
            response: resp.content,
            summary,
        })
    }

    pub fn run_literal(&mut self, line: &str) -> CommandResult {
        let line = line.trim();
        if literal::is_ping(line) {
            return match self.target.execute_raw(line) {
                Ok(()) => CommandResult {
                    command: line.to_string(),
                    success: true,
                    error: None,
                    export: None,
                },
                Err(e) => failed(line, e),
            };
        }
        match literal::parse_literal(line) {
            Ok(cmd) => execute(&cmd, &mut self.target),
            Err(e) => {
                warn!("[session] rejected {line}: {e}");
                failed(line, e)
            }
        }
    }

    /// Exports to the configured output file, if any.
    pub fn finish(&mut self) -> Result<Option<ExportOutcome>, DrawError> {
        let Some(path) = self.cfg.output.clone() else {
            return Ok(None);
        };
        let name = path.to_string_lossy();
        self.target.export(Some(&name)).map(Some)
    }
}

fn failed(command: &str, e: DrawError) -> CommandResult {
    CommandResult {
        command: command.to_string(),
        success: false,
        error: Some(e.to_string()),
        export: None,
    }
}
