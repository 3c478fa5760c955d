mod color;
mod font;
mod raster;

pub use color::Color;
pub use font::scale_for;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use image::{ImageFormat, RgbImage};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::command::literal;
use crate::dispatch::try_execute;
use crate::error::DrawError;
use crate::target::{DrawingState, DrawingTarget, ExportOutcome, Point, Stroke};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: "#ffffff".to_string(),
        }
    }
}

/// Largest pixel buffer a canvas may allocate, in bytes.
pub const MAX_CANVAS_BYTES: u64 = 1 << 28;

/// In-memory RGB canvas.
pub struct RasterCanvas {
    cfg: CanvasConfig,
    background: Color,
    image: RgbImage,
    state: DrawingState,
}

impl RasterCanvas {
    pub fn new(cfg: CanvasConfig) -> Result<Self, DrawError> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(DrawError::ParseError(format!(
                "canvas size must be positive, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        let bytes = cfg.width as u64 * cfg.height as u64 * 3;
        if bytes > MAX_CANVAS_BYTES {
            return Err(DrawError::ParseError(format!(
                "canvas {}x{} needs {bytes} bytes, limit is {MAX_CANVAS_BYTES}",
                cfg.width, cfg.height
            )));
        }
        let background = Color::parse(&cfg.background)?;
        let image = RgbImage::from_pixel(cfg.width, cfg.height, background.into());
        Ok(Self {
            cfg,
            background,
            image,
            state: DrawingState::default(),
        })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.cfg
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Color::rgb(p[0], p[1], p[2]))
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, DrawError> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| DrawError::Render(e.to_string()))?;
        Ok(buf.into_inner())
    }

    pub fn to_base64_png(&self) -> Result<String, DrawError> {
        let png = self.encode_png()?;
        Ok(base64::engine::general_purpose::STANDARD.encode(png))
    }

    pub fn data_url(&self) -> Result<String, DrawError> {
        Ok(format!("data:image/png;base64,{}", self.to_base64_png()?))
    }

    /// Format follows the extension; unknown or missing extensions get PNG.
    pub fn save(&self, path: &Path) -> Result<PathBuf, DrawError> {
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
        self.image
            .save_with_format(path, format)
            .map_err(|e| DrawError::Io(format!("{}: {e}", path.display())))?;
        info!("[canvas] saved {}", path.display());
        Ok(path.to_path_buf())
    }

    fn color(&self, literal: &str) -> Result<Color, DrawError> {
        Color::parse(literal)
    }
}

fn finite(values: &[f64]) -> Result<(), DrawError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(DrawError::ParseError("coordinates must be finite".into()))
    }
}

impl DrawingTarget for RasterCanvas {
    fn state(&self) -> &DrawingState {
        &self.state
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), DrawError> {
        finite(&[from.x, from.y, to.x, to.y, stroke.width])?;
        let color = self.color(&stroke.color)?;
        raster::line(&mut self.image, (from.x, from.y), (to.x, to.y), stroke.width, color.into());
        Ok(())
    }

    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) -> Result<(), DrawError> {
        finite(&[center.x, center.y, radius, stroke.width])?;
        if radius < 0.0 {
            return Err(DrawError::Render(format!("negative radius {radius}")));
        }
        let color = self.color(&stroke.color)?;
        raster::ring(&mut self.image, (center.x, center.y), radius, stroke.width, color.into());
        Ok(())
    }

    fn draw_rectangle(
        &mut self,
        origin: Point,
        width: f64,
        height: f64,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        finite(&[origin.x, origin.y, width, height, stroke.width])?;
        let color = self.color(&stroke.color)?;
        raster::frame(
            &mut self.image,
            (origin.x, origin.y),
            (width, height),
            stroke.width,
            color.into(),
        );
        Ok(())
    }

    fn draw_text(
        &mut self,
        at: Point,
        text: &str,
        color: &str,
        font_size: f64,
    ) -> Result<(), DrawError> {
        finite(&[at.x, at.y])?;
        let color = self.color(color)?;
        let drawn = font::draw(&mut self.image, (at.x, at.y), text, font_size, color.into());
        let total = text.chars().filter(|c| *c != '\n').count();
        if drawn < total {
            debug!("[canvas] no bitmap glyph for {} of {total} chars", total - drawn);
        }
        Ok(())
    }

    fn export(&mut self, filename: Option<&str>) -> Result<ExportOutcome, DrawError> {
        match filename {
            Some(name) if !name.trim().is_empty() => {
                self.save(Path::new(name.trim())).map(ExportOutcome::Saved)
            }
            _ => self.to_base64_png().map(ExportOutcome::Encoded),
        }
    }

    fn clear(&mut self) -> Result<(), DrawError> {
        // Pixels only; the current color and line width survive a clear.
        self.image = RgbImage::from_pixel(self.cfg.width, self.cfg.height, self.background.into());
        Ok(())
    }

    fn set_color(&mut self, color: &str) -> Result<(), DrawError> {
        self.color(color)?;
        self.state.current_color = color.to_string();
        Ok(())
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), DrawError> {
        if !width.is_finite() || width < 0.0 {
            return Err(DrawError::ParseError(format!("invalid line width {width}")));
        }
        self.state.current_line_width = width;
        Ok(())
    }

    fn execute_raw(&mut self, command: &str) -> Result<(), DrawError> {
        if literal::is_ping(command) {
            return Ok(());
        }
        let cmd = literal::parse_literal(command)?;
        try_execute(&cmd, self)?;
        Ok(())
    }
}
