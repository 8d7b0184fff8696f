//! Input validation for the tasks module.
//!
//! Bodies arrive as untyped JSON and leave as a typed DTO or a list of
//! [`Issue`]s. Values are type-checked but never coerced, and keys outside
//! the schema are rejected.

use serde::Serialize;
use serde_json::{Map, Value};

/// Keys accepted by both the create and the update schema.
const TASK_FIELDS: &[&str] = &["title", "completed"];

/// One validation failure, addressed by the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Field name, or empty for the body itself.
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Issue {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validated body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskDto {
    pub title: String,
    pub completed: Option<bool>,
}

/// Validated body of `PATCH /tasks/{id}`. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskDto {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTaskDto {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

pub fn parse_create(input: &Value) -> Result<CreateTaskDto, Vec<Issue>> {
    let mut issues = Vec::new();
    let Some(fields) = object(input, &mut issues) else {
        return Err(issues);
    };
    reject_unknown_keys(fields, &mut issues);

    let title = match fields.get("title") {
        Some(value) => title_field(value, &mut issues),
        None => {
            issues.push(Issue::new("title", "Required"));
            None
        }
    };
    let completed = fields
        .get("completed")
        .and_then(|value| boolean_field("completed", value, &mut issues));

    match title {
        Some(title) if issues.is_empty() => Ok(CreateTaskDto { title, completed }),
        _ => Err(issues),
    }
}

pub fn parse_update(input: &Value) -> Result<UpdateTaskDto, Vec<Issue>> {
    let mut issues = Vec::new();
    let Some(fields) = object(input, &mut issues) else {
        return Err(issues);
    };
    reject_unknown_keys(fields, &mut issues);

    let title = fields
        .get("title")
        .and_then(|value| title_field(value, &mut issues));
    let completed = fields
        .get("completed")
        .and_then(|value| boolean_field("completed", value, &mut issues));

    if issues.is_empty() {
        Ok(UpdateTaskDto { title, completed })
    } else {
        Err(issues)
    }
}

fn object<'a>(input: &'a Value, issues: &mut Vec<Issue>) -> Option<&'a Map<String, Value>> {
    match input {
        Value::Object(fields) => Some(fields),
        other => {
            issues.push(type_mismatch("", "object", other));
            None
        }
    }
}

fn reject_unknown_keys(fields: &Map<String, Value>, issues: &mut Vec<Issue>) {
    issues.extend(
        fields
            .keys()
            .filter(|key| !TASK_FIELDS.contains(&key.as_str()))
            .map(|key| Issue::new(key.as_str(), "Unrecognized key")),
    );
}

fn title_field(value: &Value, issues: &mut Vec<Issue>) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => {
            issues.push(Issue::new("title", "Title must not be empty"));
            None
        }
        Value::String(s) => Some(s.clone()),
        other => {
            issues.push(type_mismatch("title", "string", other));
            None
        }
    }
}

fn boolean_field(path: &str, value: &Value, issues: &mut Vec<Issue>) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        other => {
            issues.push(type_mismatch(path, "boolean", other));
            None
        }
    }
}

fn type_mismatch(path: &str, expected: &str, received: &Value) -> Issue {
    Issue::new(
        path,
        format!("Expected {expected}, received {}", kind(received)),
    )
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
