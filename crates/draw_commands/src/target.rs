use std::path::PathBuf;

use serde::Serialize;

use crate::error::DrawError;

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_LINE_WIDTH: f64 = 5.0;
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// Defaults applied when a command omits its color or stroke width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawingState {
    pub current_color: String,
    pub current_line_width: f64,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            current_color: DEFAULT_COLOR.to_string(),
            current_line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Written to a local file.
    Saved(PathBuf),
    /// Base64 PNG (raster) or data URL (remote).
    Encoded(String),
    /// Filename handed to a remote service.
    Sent(String),
}

/// Something that can receive drawing primitives: a local raster or a remote service.
pub trait DrawingTarget {
    fn state(&self) -> &DrawingState;

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), DrawError>;

    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke)
        -> Result<(), DrawError>;

    fn draw_rectangle(
        &mut self,
        origin: Point,
        width: f64,
        height: f64,
        stroke: &Stroke,
    ) -> Result<(), DrawError>;

    fn draw_text(
        &mut self,
        at: Point,
        text: &str,
        color: &str,
        font_size: f64,
    ) -> Result<(), DrawError>;

    fn export(&mut self, filename: Option<&str>) -> Result<ExportOutcome, DrawError>;

    fn clear(&mut self) -> Result<(), DrawError>;

    fn set_color(&mut self, color: &str) -> Result<(), DrawError>;

    fn set_line_width(&mut self, width: f64) -> Result<(), DrawError>;

    fn execute_raw(&mut self, command: &str) -> Result<(), DrawError>;
}
