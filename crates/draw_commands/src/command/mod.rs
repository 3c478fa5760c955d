mod args;
mod extract;
pub mod literal;
mod value;

pub use args::parse_args;
pub use extract::{CommandTable, ExtractOrder, DEFAULT_RECEIVER};
pub use value::Value;

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    DrawLine,
    DrawCircle,
    DrawRectangle,
    DrawText,
    Export,
    Clear,
    SetColor,
    SetLineWidth,
    #[serde(rename = "execute_command")]
    ExecuteRaw,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::DrawLine => "draw_line",
            Operation::DrawCircle => "draw_circle",
            Operation::DrawRectangle => "draw_rectangle",
            Operation::DrawText => "draw_text",
            Operation::Export => "export",
            Operation::Clear => "clear",
            Operation::SetColor => "set_color",
            Operation::SetLineWidth => "set_line_width",
            Operation::ExecuteRaw => "execute_command",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name {
            "draw_line" => Operation::DrawLine,
            "draw_circle" => Operation::DrawCircle,
            "draw_rectangle" => Operation::DrawRectangle,
            "draw_text" => Operation::DrawText,
            "export" => Operation::Export,
            "clear" => Operation::Clear,
            "set_color" => Operation::SetColor,
            "set_line_width" => Operation::SetLineWidth,
            "execute_command" | "execute" => Operation::ExecuteRaw,
            _ => return None,
        };
        Some(op)
    }

    pub fn spec(self) -> &'static CommandSpec {
        // COMMAND_SPECS is declared in variant order.
        &COMMAND_SPECS[self as usize]
    }

    pub fn min_args(self) -> usize {
        self.spec().min_args
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the parenthesised part of a call is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// `name(<at least one char>)`
    Required,
    /// `name(<anything, possibly empty>)`
    Optional,
    /// `name()`
    Empty,
    /// Like `Required`, but one double-quoted argument may contain `)`.
    Quoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub operation: Operation,
    pub min_args: usize,
    pub args: ArgShape,
}

/// Declaration order is also the default extraction order.
pub const COMMAND_SPECS: &[CommandSpec] = &[
    CommandSpec {
        operation: Operation::DrawLine,
        min_args: 4,
        args: ArgShape::Required,
    },
    CommandSpec {
        operation: Operation::DrawCircle,
        min_args: 3,
        args: ArgShape::Required,
    },
    CommandSpec {
        operation: Operation::DrawRectangle,
        min_args: 4,
        args: ArgShape::Required,
    },
    CommandSpec {
        operation: Operation::DrawText,
        min_args: 3,
        args: ArgShape::Required,
    },
    CommandSpec {
        operation: Operation::Export,
        min_args: 0,
        args: ArgShape::Optional,
    },
    CommandSpec {
        operation: Operation::Clear,
        min_args: 0,
        args: ArgShape::Empty,
    },
    CommandSpec {
        operation: Operation::SetColor,
        min_args: 1,
        args: ArgShape::Required,
    },
    CommandSpec {
        operation: Operation::SetLineWidth,
        min_args: 1,
        args: ArgShape::Required,
    },
    CommandSpec {
        operation: Operation::ExecuteRaw,
        min_args: 1,
        args: ArgShape::Quoted,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCommand {
    pub operation: Operation,
    pub raw_args: String,
    /// Byte offset of the match in the scanned text (0 for literal commands).
    pub offset: usize,
}

impl ExtractedCommand {
    pub fn new(operation: Operation, raw_args: impl Into<String>) -> Self {
        Self {
            operation,
            raw_args: raw_args.into(),
            offset: 0,
        }
    }
}

impl fmt::Display for ExtractedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation.name(), self.raw_args)
    }
}
