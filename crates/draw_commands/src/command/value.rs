use std::fmt;

use serde::Serialize;

use crate::error::DrawError;

#[derive(Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Color(String),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::Str(v) => write!(f, "Str({:?})", v),
            Value::Color(v) => write!(f, "Color({v})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) | Value::Color(v) => write!(f, "{v}"),
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Color(_) => "color",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Result<f64, DrawError> {
        match self {
            Value::Int(i) => Ok(*i as f64),
            Value::Float(v) => Ok(*v),
            _ => Err(DrawError::ParseError(format!(
                "expected number, got {} {}",
                self.type_name(),
                self
            ))),
        }
    }

    /// Text slots accept anything printable except null.
    pub fn as_text(&self) -> Result<String, DrawError> {
        match self {
            Value::Null => Err(DrawError::ParseError("expected text, got null".into())),
            Value::Str(s) | Value::Color(s) => Ok(s.clone()),
            Value::Int(_) | Value::Float(_) => Ok(self.to_string()),
        }
    }

    /// Colors may arrive as `#rrggbb` literals or as (possibly quoted) names.
    pub fn as_color(&self) -> Result<String, DrawError> {
        match self {
            Value::Color(s) => Ok(s.clone()),
            Value::Str(s) => {
                let trimmed = strip_quotes(s.trim());
                if trimmed.is_empty() {
                    return Err(DrawError::ParseError("empty color".into()));
                }
                Ok(trimmed.to_string())
            }
            _ => Err(DrawError::ParseError(format!(
                "expected color, got {} {}",
                self.type_name(),
                self
            ))),
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
