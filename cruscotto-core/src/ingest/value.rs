use serde_json::Value;

/// Parse an observation value from a JSON string or number.
///
/// Empty strings, the `"."` placeholder used for missing observations,
/// non-numeric text and non-finite numbers yield `None`. Zero is a valid value.
#[must_use]
pub fn parse_value(raw: &Value) -> Option<f64> {
    let v = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == "." {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    v.is_finite().then_some(v)
}
