use crate::error::DrawError;

use super::value::Value;

const MARK: char = '\u{0}';

/// Split a raw argument string into typed values.
///
/// Double-quoted substrings are masked before splitting on `,` so commas inside
/// drawn text survive, then restored (quotes included) before coercion.
pub fn parse_args(raw: &str) -> Result<Vec<Value>, DrawError> {
    if raw.contains(MARK) {
        return Err(DrawError::ParseError("NUL byte in arguments".into()));
    }
    if raw.matches('"').count() % 2 != 0 {
        return Err(DrawError::ParseError(format!("unbalanced quotes in {raw:?}")));
    }

    let mut quoted: Vec<&str> = Vec::new();
    let mut masked = String::with_capacity(raw.len());
    for (i, segment) in raw.split('"').enumerate() {
        if i % 2 == 0 {
            masked.push_str(segment);
        } else {
            masked.push_str(&placeholder(quoted.len()));
            quoted.push(segment);
        }
    }

    let mut out = Vec::new();
    for token in masked.split(',') {
        let mut token = token.trim().to_string();
        for (i, val) in quoted.iter().enumerate() {
            let ph = placeholder(i);
            if token.contains(&ph) {
                token = token.replace(&ph, &format!("\"{val}\""));
            }
        }
        out.push(coerce(&token));
    }
    Ok(out)
}

fn placeholder(i: usize) -> String {
    format!("{MARK}{i}{MARK}")
}

fn coerce(token: &str) -> Value {
    if token.is_empty() || token.eq_ignore_ascii_case("none") {
        return Value::Null;
    }
    if token.starts_with('#') {
        return Value::Color(token.to_string());
    }
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        return Value::Str(token[1..token.len() - 1].to_string());
    }
    if is_numeric(token) {
        if token.contains('.') {
            if let Ok(v) = token.parse::<f64>() {
                return Value::Float(v);
            }
        } else if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        } else if let Ok(v) = token.parse::<f64>() {
            // Too large for i64.
            return Value::Float(v);
        }
    }
    Value::Str(token.to_string())
}

fn is_numeric(token: &str) -> bool {
    let mut dots = 0usize;
    let mut digits = 0usize;
    for ch in token.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}
