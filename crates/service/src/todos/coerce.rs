use serde_json::Value;

use crate::errors::ServiceError;

/// Truthy literals are `true`, `"true"`, `1` and `"1"`; everything else is false.
pub fn to_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true" || s == "1",
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Integer prefix parse of a path id: leading whitespace, optional sign, then
/// at least one digit; trailing garbage after the digits is ignored.
pub fn parse_id(raw: &str) -> Result<i64, ServiceError> {
    let invalid = || ServiceError::InvalidId(raw.to_string());
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return Err(invalid());
    }
    let magnitude: i64 = rest[..len].parse().map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Textual form of a title value, trimmed. Scalars are stringified; arrays and
/// objects are rejected.
pub fn title_text(value: &Value) -> Result<String, ServiceError> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => {
            return Err(ServiceError::validation("field \"title\" must be text"))
        }
    };
    Ok(text)
}
