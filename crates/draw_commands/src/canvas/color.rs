//! Color literals: `#rgb`, `#rrggbb`, `#rrggbbaa` and a table of names.

use image::Rgb;

use crate::error::DrawError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("lime", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("aqua", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("fuchsia", Color::rgb(255, 0, 255)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("silver", Color::rgb(192, 192, 192)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("olive", Color::rgb(128, 128, 0)),
    ("navy", Color::rgb(0, 0, 128)),
    ("teal", Color::rgb(0, 128, 128)),
    ("purple", Color::rgb(128, 0, 128)),
    ("orange", Color::rgb(255, 165, 0)),
    ("pink", Color::rgb(255, 192, 203)),
    ("brown", Color::rgb(165, 42, 42)),
    ("gold", Color::rgb(255, 215, 0)),
    ("黑色", Color::rgb(0, 0, 0)),
    ("白色", Color::rgb(255, 255, 255)),
    ("红色", Color::rgb(255, 0, 0)),
    ("绿色", Color::rgb(0, 128, 0)),
    ("蓝色", Color::rgb(0, 0, 255)),
    ("黄色", Color::rgb(255, 255, 0)),
    ("青色", Color::rgb(0, 255, 255)),
    ("紫色", Color::rgb(128, 0, 128)),
    ("橙色", Color::rgb(255, 165, 0)),
    ("灰色", Color::rgb(128, 128, 128)),
    ("粉色", Color::rgb(255, 192, 203)),
    ("棕色", Color::rgb(165, 42, 42)),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse(literal: &str) -> Result<Self, DrawError> {
        let s = literal.trim().trim_matches(|c| c == '"' || c == '\'');
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| DrawError::ParseError(format!("bad color {literal:?}")));
        }
        let lower = s.to_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, c)| *c)
            .ok_or_else(|| DrawError::ParseError(format!("unknown color {literal:?}")))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for Rgb<u8> {
    fn from(c: Color) -> Self {
        Rgb([c.r, c.g, c.b])
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, ch) in hex.chars().enumerate() {
                let v = ch.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(Color::rgb(out[0], out[1], out[2]))
        }
        // Alpha is accepted and dropped: the canvas is opaque RGB.
        6 | 8 => Some(Color::rgb(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)),
        _ => None,
    }
}
