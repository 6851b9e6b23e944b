use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use validator::ValidationError;

/// Score field that accepts numbers and numeric strings. Anything else reads
/// as `None` rather than failing the request.
pub fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(score_from_json))
}

pub fn score_from_json(value: &JsonValue) -> Option<f64> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        JsonValue::Null => return None,
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(value = %value, "ignoring non-numeric score input");
    }
    parsed.filter(|v| v.is_finite())
}

pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "lenient_score")]
        score: Option<f64>,
    }

    fn parse(body: JsonValue) -> Option<f64> {
        serde_json::from_value::<Payload>(body).unwrap().score
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse(json!({ "score": 87.5 })), Some(87.5));
        assert_eq!(parse(json!({ "score": " 42 " })), Some(42.0));
    }

    #[test]
    fn garbage_becomes_absent() {
        assert_eq!(parse(json!({ "score": "excellent" })), None);
        assert_eq!(parse(json!({ "score": [1, 2] })), None);
        assert_eq!(parse(json!({ "score": null })), None);
        assert_eq!(parse(json!({})), None);
    }

    #[test]
    fn blank_strings_fail_non_blank() {
        assert!(non_blank("  ").is_err());
        assert!(non_blank("Go").is_ok());
    }
}
