//! Typed-cast dispatch: turn the raw right-hand side of an override into a
//! JSON value according to a [`ValueKind`].
//!
//! One function handles every kind. Boolean parsing is case-insensitive and
//! accepts `true`/`1` and `false`/`0`. Floats must be finite because JSON has
//! no representation for `NaN` or infinities.

use serde_json::{Number, Value};

use crate::error::ClapscriptError;
use crate::types::ValueKind;

const TRUE_VALUES: [&str; 2] = ["true", "1"];
const FALSE_VALUES: [&str; 2] = ["false", "0"];

/// Cast `raw` to a typed value of the given kind.
pub fn cast_value(kind: ValueKind, raw: &str) -> Result<Value, ClapscriptError> {
    let invalid = |reason: String| ClapscriptError::InvalidValue {
        kind,
        raw: raw.to_string(),
        reason,
    };

    match kind {
        ValueKind::String => Ok(Value::String(raw.to_string())),
        ValueKind::Boolean => {
            let lowered = raw.to_lowercase();
            if TRUE_VALUES.contains(&lowered.as_str()) {
                Ok(Value::Bool(true))
            } else if FALSE_VALUES.contains(&lowered.as_str()) {
                Ok(Value::Bool(false))
            } else {
                Err(invalid("expected one of true, false, 1, 0".into()))
            }
        }
        ValueKind::Integer => {
            if let Ok(i) = raw.parse::<i64>() {
                return Ok(Value::from(i));
            }
            raw.parse::<u64>()
                .map(Value::from)
                .map_err(|e| invalid(e.to_string()))
        }
        ValueKind::Float => {
            let f = raw.parse::<f64>().map_err(|e| invalid(e.to_string()))?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| invalid("not a finite number".into()))
        }
        ValueKind::Json => serde_json::from_str(raw).map_err(|e| invalid(e.to_string())),
    }
}

impl ValueKind {
    /// Cast `raw` to this kind. See [`cast_value`].
    pub fn cast(self, raw: &str) -> Result<Value, ClapscriptError> {
        cast_value(self, raw)
    }
}
