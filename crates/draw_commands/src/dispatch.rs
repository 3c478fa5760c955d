use log::{info, warn};
use serde::Serialize;

use crate::command::{parse_args, ArgShape, ExtractedCommand, Operation, Value};
use crate::error::DrawError;
use crate::target::{DrawingTarget, ExportOutcome, Point, Stroke, DEFAULT_FONT_SIZE};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub command: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportOutcome>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_commands: usize,
    pub successful_commands: usize,
    pub commands: Vec<CommandResult>,
}

impl RunSummary {
    pub fn from_results(commands: Vec<CommandResult>) -> Self {
        Self {
            total_commands: commands.len(),
            successful_commands: commands.iter().filter(|r| r.success).count(),
            commands,
        }
    }

    pub fn failed_commands(&self) -> usize {
        self.total_commands - self.successful_commands
    }
}

/// Run one command; any failure becomes an unsuccessful result.
pub fn execute<T: DrawingTarget + ?Sized>(cmd: &ExtractedCommand, target: &mut T) -> CommandResult {
    let command = cmd.to_string();
    info!("[dispatch] {command}");
    match try_execute(cmd, target) {
        Ok(export) => CommandResult {
            command,
            success: true,
            error: None,
            export,
        },
        Err(e) => {
            warn!("[dispatch] failed {command}: {e}");
            CommandResult {
                command,
                success: false,
                error: Some(e.to_string()),
                export: None,
            }
        }
    }
}

/// Every command is attempted, in order, whatever happened to the previous one.
pub fn execute_all<T: DrawingTarget + ?Sized>(
    cmds: &[ExtractedCommand],
    target: &mut T,
) -> RunSummary {
    let results = cmds.iter().map(|c| execute(c, target)).collect();
    RunSummary::from_results(results)
}

pub fn try_execute<T: DrawingTarget + ?Sized>(
    cmd: &ExtractedCommand,
    target: &mut T,
) -> Result<Option<ExportOutcome>, DrawError> {
    let op = cmd.operation;
    let values = if op.spec().args == ArgShape::Empty {
        Vec::new()
    } else {
        parse_args(&cmd.raw_args)?
    };
    if values.len() < op.min_args() {
        return Err(DrawError::InsufficientArguments {
            operation: op.name().to_string(),
            expected: op.min_args(),
            got: values.len(),
        });
    }
    let args = Args { op, values: &values };

    match op {
        Operation::DrawLine => {
            let from = Point::new(args.number(0)?, args.number(1)?);
            let to = Point::new(args.number(2)?, args.number(3)?);
            let stroke = args.stroke(4, target)?;
            target.draw_line(from, to, &stroke)?;
        }
        Operation::DrawCircle => {
            let center = Point::new(args.number(0)?, args.number(1)?);
            let radius = args.number(2)?;
            let stroke = args.stroke(3, target)?;
            target.draw_circle(center, radius, &stroke)?;
        }
        Operation::DrawRectangle => {
            let origin = Point::new(args.number(0)?, args.number(1)?);
            let (w, h) = (args.number(2)?, args.number(3)?);
            let stroke = args.stroke(4, target)?;
            target.draw_rectangle(origin, w, h, &stroke)?;
        }
        Operation::DrawText => {
            let at = Point::new(args.number(0)?, args.number(1)?);
            let text = args.required(2)?.as_text()?;
            let color = match args.optional(3) {
                Some(v) => v.as_color()?,
                None => target.state().current_color.clone(),
            };
            let font_size = match args.optional(4) {
                Some(v) => v.as_number()?,
                None => DEFAULT_FONT_SIZE,
            };
            target.draw_text(at, &text, &color, font_size)?;
        }
        Operation::Export => {
            let filename = args.optional(0).map(Value::as_text).transpose()?;
            return target.export(filename.as_deref()).map(Some);
        }
        Operation::Clear => target.clear()?,
        Operation::SetColor => {
            let color = args.required(0)?.as_color()?;
            target.set_color(&color)?;
        }
        Operation::SetLineWidth => {
            let width = args.number(0)?;
            target.set_line_width(width)?;
        }
        Operation::ExecuteRaw => {
            let command = args.required(0)?.as_text()?;
            target.execute_raw(&command)?;
        }
    }
    Ok(None)
}

struct Args<'a> {
    op: Operation,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    /// Missing and `None` arguments are the same thing.
    fn optional(&self, i: usize) -> Option<&'a Value> {
        self.values.get(i).filter(|v| !v.is_null())
    }

    fn required(&self, i: usize) -> Result<&'a Value, DrawError> {
        self.optional(i).ok_or_else(|| {
            DrawError::ParseError(format!("{}: argument {} is missing", self.op, i + 1))
        })
    }

    fn number(&self, i: usize) -> Result<f64, DrawError> {
        self.required(i)?.as_number()
    }

    fn stroke<T: DrawingTarget + ?Sized>(&self, first: usize, target: &T) -> Result<Stroke, DrawError> {
        let state = target.state();
        let color = match self.optional(first) {
            Some(v) => v.as_color()?,
            None => state.current_color.clone(),
        };
        let width = match self.optional(first + 1) {
            Some(v) => v.as_number()?,
            None => state.current_line_width,
        };
        Ok(Stroke::new(color, width))
    }
}
