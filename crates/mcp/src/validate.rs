//! Parameter validation and coercion against a tool's schema.
//!
//! Undeclared fields are ignored: they are dropped from the validated set
//! and never reach a backend adapter. A required string that is empty or
//! only whitespace counts as missing.

use crate::protocol::json_type_name;
use atlasgate_core::{ParamSpec, ParamType, ToolError, ToolResult, ToolSpec};
use serde_json::{Map, Value};

/// Parameters that passed validation, coerced to their declared types and
/// with defaults filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedParams {
    values: Map<String, Value>,
}

impl ValidatedParams {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    /// A string parameter the schema declares as required. Blank values are
    /// treated as missing.
    pub fn require_str(&self, name: &str) -> ToolResult<&str> {
        self.str(name)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ToolError::validation(format!("missing required field(s): {}", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Check `raw` against `spec`.
///
/// Every missing required field and every coercion failure is collected and
/// reported in one `ValidationError`.
pub fn validate(spec: &ToolSpec, raw: &Map<String, Value>) -> ToolResult<ValidatedParams> {
    let mut values = Map::new();
    let mut missing = Vec::new();
    let mut invalid = Vec::new();

    for param in &spec.parameters {
        match raw.get(&param.name).filter(|v| !v.is_null()) {
            Some(value) => match coerce(param, value) {
                Ok(coerced) if param.required && is_blank(&coerced) => {
                    missing.push(param.name.as_str())
                }
                Ok(coerced) => {
                    values.insert(param.name.clone(), coerced);
                }
                Err(problem) => invalid.push(problem),
            },
            None if param.required => missing.push(param.name.as_str()),
            None => {
                if !param.default.is_null() {
                    values.insert(param.name.clone(), param.default.clone());
                }
            }
        }
    }

    for field in raw.keys().filter(|k| spec.get_param(k).is_none()) {
        tracing::debug!(tool = %spec.name, field = %field, "Ignoring undeclared parameter");
    }

    if missing.is_empty() && invalid.is_empty() {
        return Ok(ValidatedParams { values });
    }

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("missing required field(s): {}", missing.join(", ")));
    }
    problems.extend(invalid);

    Err(ToolError::validation(format!(
        "Invalid parameters for `{}`: {}",
        spec.name,
        problems.join("; ")
    )))
}

fn is_blank(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.trim().is_empty())
}

fn coerce(param: &ParamSpec, value: &Value) -> Result<Value, String> {
    let coerced = match param.param_type {
        ParamType::String => match value {
            Value::String(s) => Some(Value::String(s.clone())),
            Value::Number(n) => Some(Value::String(n.to_string())),
            Value::Bool(b) => Some(Value::String(b.to_string())),
            _ => None,
        },
        ParamType::Integer => coerce_integer(value).map(Value::from),
        ParamType::Float => match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|f| f.is_finite())
        .map(Value::from),
        ParamType::Boolean => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
            _ => None,
        },
    };

    let coerced = coerced.ok_or_else(|| {
        format!(
            "field `{}` expected {}, got {}",
            param.name,
            param.param_type,
            json_type_name(value)
        )
    })?;

    if let Some(n) = coerced.as_i64() {
        let below = param.minimum.is_some_and(|min| n < min);
        let above = param.maximum.is_some_and(|max| n > max);
        if below || above {
            return Err(format!(
                "field `{}` must be between {} and {}, got {}",
                param.name,
                param.minimum.map_or("-inf".to_string(), |m| m.to_string()),
                param.maximum.map_or("inf".to_string(), |m| m.to_string()),
                n
            ));
        }
    }

    Ok(coerced)
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlasgate_core::ErrorKind;
    use serde_json::json;

    fn create_issue_spec() -> ToolSpec {
        ToolSpec::new("jira_create_issue", "Create a new Jira issue")
            .param(ParamSpec::required("project_key", ParamType::String, "Project key"))
            .param(ParamSpec::required("summary", ParamType::String, "Issue summary"))
            .param(ParamSpec::optional("issue_type", ParamType::String, "Issue type").with_default("Task"))
            .param(ParamSpec::optional("description", ParamType::String, "Description").with_default(""))
    }

    fn typed_spec() -> ToolSpec {
        ToolSpec::new("typed", "All parameter types")
            .param(ParamSpec::optional("count", ParamType::Integer, "count").with_range(1, 100))
            .param(ParamSpec::optional("ratio", ParamType::Float, "ratio"))
            .param(ParamSpec::optional("flag", ParamType::Boolean, "flag"))
            .param(ParamSpec::optional("id", ParamType::String, "id"))
    }

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults_substituted() {
        let params = validate(
            &create_issue_spec(),
            &raw(json!({"project_key": "PROJ", "summary": "Fix login"})),
        )
        .unwrap();

        assert_eq!(params.str("project_key"), Some("PROJ"));
        assert_eq!(params.str("issue_type"), Some("Task"));
        assert_eq!(params.str("description"), Some(""));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_reports_all_missing_fields() {
        let err = validate(&create_issue_spec(), &Map::new()).unwrap_err();

        assert_eq!(err.kind, ErrorKind::ValidationError);
        assert!(err.message.contains("project_key"));
        assert!(err.message.contains("summary"));
        assert!(err.message.contains("missing required field(s): project_key, summary"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let err = validate(
            &create_issue_spec(),
            &raw(json!({"project_key": null, "summary": "x"})),
        )
        .unwrap_err();
        assert!(err.message.contains("project_key"));

        let params = validate(
            &create_issue_spec(),
            &raw(json!({"project_key": "P", "summary": "x", "issue_type": null})),
        )
        .unwrap();
        assert_eq!(params.str("issue_type"), Some("Task"));
    }

    #[test]
    fn test_undeclared_fields_are_dropped() {
        let params = validate(
            &create_issue_spec(),
            &raw(json!({"project_key": "PROJ", "summary": "x", "assignee": "bob"})),
        )
        .unwrap();

        assert!(!params.contains("assignee"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_integer_coercion() {
        let spec = typed_spec();
        assert_eq!(validate(&spec, &raw(json!({"count": 5}))).unwrap().int("count"), Some(5));
        assert_eq!(validate(&spec, &raw(json!({"count": "7"}))).unwrap().int("count"), Some(7));
        assert_eq!(validate(&spec, &raw(json!({"count": 3.0}))).unwrap().int("count"), Some(3));

        let err = validate(&spec, &raw(json!({"count": 2.5}))).unwrap_err();
        assert!(err.message.contains("field `count` expected integer, got float"));

        let err = validate(&spec, &raw(json!({"count": "ten"}))).unwrap_err();
        assert!(err.message.contains("expected integer, got string"));
    }

    #[test]
    fn test_integer_range() {
        let err = validate(&typed_spec(), &raw(json!({"count": 500}))).unwrap_err();
        assert!(err.message.contains("between 1 and 100, got 500"));

        let err = validate(&typed_spec(), &raw(json!({"count": 0}))).unwrap_err();
        assert!(err.message.contains("got 0"));
    }

    #[test]
    fn test_float_boolean_string_coercion() {
        let params = validate(
            &typed_spec(),
            &raw(json!({"ratio": "0.5", "flag": "TRUE", "id": 12345})),
        )
        .unwrap();

        assert_eq!(params.get("ratio").and_then(Value::as_f64), Some(0.5));
        assert_eq!(params.bool("flag"), Some(true));
        assert_eq!(params.str("id"), Some("12345"));

        let params = validate(&typed_spec(), &raw(json!({"ratio": 2, "flag": false}))).unwrap();
        assert_eq!(params.get("ratio").and_then(Value::as_f64), Some(2.0));
        assert_eq!(params.bool("flag"), Some(false));
    }

    #[test]
    fn test_collects_missing_and_invalid_together() {
        let spec = create_issue_spec()
            .param(ParamSpec::optional("max_results", ParamType::Integer, "max"));
        let err = validate(
            &spec,
            &raw(json!({"summary": ["not", "a", "string"], "max_results": "many"})),
        )
        .unwrap_err();

        assert!(err.message.contains("missing required field(s): project_key"));
        assert!(err.message.contains("field `summary` expected string, got array"));
        assert!(err.message.contains("field `max_results` expected integer, got string"));
    }

    #[test]
    fn test_boolean_rejects_numbers() {
        let err = validate(&typed_spec(), &raw(json!({"flag": 1}))).unwrap_err();
        assert!(err.message.contains("field `flag` expected boolean, got integer"));
    }

    #[test]
    fn test_blank_required_strings_are_missing() {
        let err = validate(
            &create_issue_spec(),
            &raw(json!({"project_key": "", "summary": "   "})),
        )
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::ValidationError);
        assert!(err.message.contains("missing required field(s): project_key, summary"));

        // Optional strings may still be empty.
        let params = validate(
            &create_issue_spec(),
            &raw(json!({"project_key": "P", "summary": "s", "description": ""})),
        )
        .unwrap();
        assert_eq!(params.str("description"), Some(""));
    }

    #[test]
    fn test_require_str() {
        let params = validate(&create_issue_spec(), &raw(json!({"project_key": "P", "summary": "s"}))).unwrap();
        assert_eq!(params.require_str("summary").unwrap(), "s");
        assert_eq!(
            params.require_str("absent").unwrap_err().kind,
            ErrorKind::ValidationError
        );
        assert!(params.require_str("description").is_err());
    }
}
