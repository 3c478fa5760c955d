//! The short command grammar typed at the prompt or posted to `/api/execute`:
//! `draw(line,10,10,50,50)`, `setColor(#ff0000)`, `clear()`, ...

use std::sync::OnceLock;

use regex::Regex;

use crate::error::DrawError;

use super::{ExtractedCommand, Operation};

static LITERAL_LINE: OnceLock<Option<Regex>> = OnceLock::new();
static CALL: OnceLock<Option<Regex>> = OnceLock::new();
static DRAW_ARGS: OnceLock<Option<Regex>> = OnceLock::new();
static EMBEDDED_CALL: OnceLock<Option<Regex>> = OnceLock::new();

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Result<&'static Regex, DrawError> {
    cached(cell, pattern).ok_or_else(|| DrawError::ParseError(format!("bad pattern {pattern:?}")))
}

pub fn looks_like_literal(line: &str) -> bool {
    cached(&LITERAL_LINE, r"^[A-Za-z_]+\([^)]*\)$").is_some_and(|re| re.is_match(line.trim()))
}

pub fn is_ping(command: &str) -> bool {
    command.trim().eq_ignore_ascii_case("ping()")
}

pub fn parse_literal(line: &str) -> Result<ExtractedCommand, DrawError> {
    let line = line.trim();
    let call = compiled(&CALL, r"(?s)^([A-Za-z_]+)\((.*)\)$")?;
    let caps = call
        .captures(line)
        .ok_or_else(|| DrawError::MalformedCommand(line.to_string()))?;
    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let params = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    let (operation, raw_args) = match name {
        "draw" => {
            let draw = compiled(&DRAW_ARGS, r"(?s)^\s*([A-Za-z]+)\s*,(.*)$")?;
            let dc = draw.captures(params).ok_or_else(|| {
                DrawError::MalformedCommand(format!("draw needs a shape and arguments: {line}"))
            })?;
            let shape = dc.get(1).map(|m| m.as_str()).unwrap_or_default();
            let rest = dc.get(2).map(|m| m.as_str()).unwrap_or_default();
            let op = match shape.to_ascii_lowercase().as_str() {
                "line" => Operation::DrawLine,
                "circle" => Operation::DrawCircle,
                "rect" | "rectangle" => Operation::DrawRectangle,
                "text" => Operation::DrawText,
                other => {
                    return Err(DrawError::UnsupportedOperation(format!("draw type {other}")))
                }
            };
            (op, rest)
        }
        "setColor" => (Operation::SetColor, params),
        "setLineWidth" => (Operation::SetLineWidth, params),
        other => match Operation::from_name(other) {
            Some(op) => (op, params),
            None => return Err(DrawError::UnsupportedOperation(other.to_string())),
        },
    };
    Ok(ExtractedCommand::new(operation, raw_args.trim()))
}

/// First literal command in free text: whole-line calls win over embedded ones.
pub fn find_literal(text: &str) -> Option<ExtractedCommand> {
    for line in text.lines() {
        if looks_like_literal(line) {
            if let Ok(cmd) = parse_literal(line) {
                return Some(cmd);
            }
        }
    }
    let embedded = cached(&EMBEDDED_CALL, r"[A-Za-z_]+\([^)]*\)")?;
    let found = embedded
        .find_iter(text)
        .find_map(|m| parse_literal(m.as_str()).ok());
    found
}
