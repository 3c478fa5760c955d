pub mod canvas;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod target;

pub use canvas::{CanvasConfig, RasterCanvas};
pub use command::{CommandTable, ExtractOrder, ExtractedCommand, Operation, Value};
pub use dispatch::{execute, execute_all, try_execute, CommandResult, RunSummary};
pub use error::DrawError;
pub use target::{DrawingState, DrawingTarget, ExportOutcome};
