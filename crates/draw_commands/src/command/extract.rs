use log::{debug, warn};
use regex::Regex;

use super::{ArgShape, CommandSpec, ExtractedCommand, COMMAND_SPECS};

/// Object name the model is told to call methods on (`api.draw_line(...)`).
pub const DEFAULT_RECEIVER: &str = "api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractOrder {
    /// All matches of the first operation, then the second, ... (table order).
    #[default]
    ByOperation,
    /// Global order of appearance in the text.
    ByPosition,
}

struct Matcher {
    spec: CommandSpec,
    re: Regex,
}

pub struct CommandTable {
    receiver: String,
    order: ExtractOrder,
    matchers: Vec<Matcher>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new(DEFAULT_RECEIVER)
    }
}

impl CommandTable {
    pub fn new(receiver: &str) -> Self {
        let mut matchers = Vec::with_capacity(COMMAND_SPECS.len());
        for spec in COMMAND_SPECS {
            let pat = build_pattern(receiver, spec);
            match Regex::new(&pat) {
                Ok(re) => matchers.push(Matcher { spec: *spec, re }),
                Err(e) => warn!("[extract] skipping {}: bad pattern {pat:?}: {e}", spec.operation),
            }
        }
        Self {
            receiver: receiver.to_string(),
            order: ExtractOrder::default(),
            matchers,
        }
    }

    pub fn with_order(mut self, order: ExtractOrder) -> Self {
        self.order = order;
        self
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn order(&self) -> ExtractOrder {
        self.order
    }

    pub fn extract(&self, text: &str) -> Vec<ExtractedCommand> {
        self.extract_ordered(text, self.order)
    }

    pub fn extract_ordered(&self, text: &str, order: ExtractOrder) -> Vec<ExtractedCommand> {
        let mut out = Vec::new();
        for m in &self.matchers {
            for caps in m.re.captures_iter(text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                // `foo.clear()` is a call on some other object.
                if caps.name("recv").is_none() && text[..whole.start()].ends_with('.') {
                    continue;
                }
                let raw_args = caps
                    .name("args")
                    .map(|a| a.as_str().to_string())
                    .unwrap_or_default();
                out.push(ExtractedCommand {
                    operation: m.spec.operation,
                    raw_args,
                    offset: whole.start(),
                });
            }
        }
        if order == ExtractOrder::ByPosition {
            out.sort_by_key(|c| c.offset);
        }
        debug!("[extract] found {} commands", out.len());
        out
    }

    /// Earliest command in the text, if any.
    pub fn find_first(&self, text: &str) -> Option<ExtractedCommand> {
        self.extract_ordered(text, ExtractOrder::ByPosition)
            .into_iter()
            .next()
    }
}

fn build_pattern(receiver: &str, spec: &CommandSpec) -> String {
    let recv = if receiver.is_empty() {
        // Never matches: a NUL cannot precede a call in model text.
        r"\x00".to_string()
    } else {
        format!(r"\b{}\.", regex::escape(receiver))
    };
    let args = match spec.args {
        ArgShape::Required => r"\((?P<args>[^)]+)\)",
        ArgShape::Optional => r"\((?P<args>[^)]*)\)",
        ArgShape::Empty => r"\(\)",
        ArgShape::Quoted => r#"\((?P<args>"[^"]*"|[^)]+)\)"#,
    };
    format!(r"(?P<recv>{recv})?\b{}{args}", spec.operation.name())
}
