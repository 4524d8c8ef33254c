// Wire types for the HTTP/JSON discovery-and-invoke protocol

use atlasgate_core::{ErrorKind, ToolError, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one invocation: a structured payload or a normalized error.
pub type InvokeResult = Result<Value, ToolError>;

/// Body of `POST /mcp/v1/invoke`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub name: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl InvokeRequest {
    pub fn new(name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Structural decode of an invoke body.
    ///
    /// Every structural problem is reported in a single `ValidationError`.
    /// A missing or `null` `parameters` field is read as an empty object.
    pub fn from_value(body: Value) -> ToolResult<Self> {
        let mut object = match body {
            Value::Object(object) => object,
            other => {
                return Err(ToolError::validation(format!(
                    "Request body must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let mut problems = Vec::new();

        let name = match object.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => Some(name),
            Some(Value::String(_)) => {
                problems.push("field `name` must not be empty".to_string());
                None
            }
            Some(other) => {
                problems.push(format!(
                    "field `name` must be a string, got {}",
                    json_type_name(&other)
                ));
                None
            }
            None => {
                problems.push("missing field `name`".to_string());
                None
            }
        };

        let parameters = match object.remove("parameters") {
            Some(Value::Object(parameters)) => parameters,
            None | Some(Value::Null) => Map::new(),
            Some(other) => {
                problems.push(format!(
                    "field `parameters` must be an object, got {}",
                    json_type_name(&other)
                ));
                Map::new()
            }
        };

        match name {
            Some(name) if problems.is_empty() => Ok(Self { name, parameters }),
            _ => Err(ToolError::validation(format!(
                "Malformed invoke request: {}",
                problems.join("; ")
            ))),
        }
    }
}

/// Success body of `POST /mcp/v1/invoke`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub result: Value,
}

/// Failure body shared by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<ToolError> for ErrorBody {
    fn from(err: ToolError) -> Self {
        Self {
            error: ErrorInfo {
                kind: err.kind,
                message: err.message,
            },
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
