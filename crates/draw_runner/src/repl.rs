use std::io::{BufRead, Write};

use draw_commands::command::literal::looks_like_literal;
use draw_commands::{CommandResult, DrawingTarget, ExportOutcome, RunSummary};

use crate::prompts::help_text;
use crate::session::DrawSession;

const BANNER: &str = "===== draw_runner =====\n\
Describe a drawing or type a command directly.\n\
Type 'help' for commands, 'exit' to quit.\n\
=======================";

pub fn run_interactive<T, R, W>(
    session: &mut DrawSession<T>,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    T: DrawingTarget,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{BANNER}")?;
    let mut lines = input.lines();
    loop {
        write!(output, "\n> ")?;
        output.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.eq_ignore_ascii_case("help") {
            writeln!(output, "{}", help_text())?;
            continue;
        }

        if looks_like_literal(line) {
            let result = session.run_literal(line);
            writeln!(output, "{}", describe(&result))?;
            continue;
        }

        writeln!(output, "asking the model...")?;
        match session.process_prompt(line) {
            Ok(outcome) => {
                writeln!(output, "model: {}", outcome.response.trim())?;
                write_summary(&mut output, &outcome.summary)?;
            }
            Err(e) => writeln!(output, "error: {e}")?,
        }
    }
    writeln!(output, "bye")?;
    Ok(())
}

fn write_summary<W: Write>(output: &mut W, summary: &RunSummary) -> std::io::Result<()> {
    if summary.total_commands == 0 {
        return writeln!(output, "no drawing commands found");
    }
    for result in &summary.commands {
        writeln!(output, "{}", describe(result))?;
    }
    writeln!(
        output,
        "{}/{} commands succeeded",
        summary.successful_commands, summary.total_commands
    )
}

fn describe(result: &CommandResult) -> String {
    if !result.success {
        let reason = result.error.as_deref().unwrap_or("failed");
        return format!("fail {}: {reason}", result.command);
    }
    match &result.export {
        Some(ExportOutcome::Saved(path)) => format!("ok {} -> {}", result.command, path.display()),
        Some(ExportOutcome::Sent(name)) => format!("ok {} -> {name}", result.command),
        Some(ExportOutcome::Encoded(data)) => {
            format!("ok {} ({} bytes encoded)", result.command, data.len())
        }
        None => format!("ok {}", result.command),
    }
}
