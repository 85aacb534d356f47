//! Executable specification records

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Declared or inferred value type of an input/output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    String,
    Integer,
    Float,
    Boolean,
    List,
    Map,
    Unknown,
}

impl ValueType {
    /// Representative example value
    #[must_use]
    pub fn example(self) -> Value {
        match self {
            ValueType::String => Value::from("example"),
            ValueType::Integer => Value::from(3),
            ValueType::Float => Value::from(0.5),
            ValueType::Boolean => Value::Bool(true),
            ValueType::List => Value::from(vec![1, 2, 3]),
            ValueType::Map => serde_json::json!({ "key": "value" }),
            ValueType::Unknown => Value::from("sample"),
        }
    }

    /// Boundary value (empty, zero, false)
    #[must_use]
    pub fn boundary(self) -> Value {
        match self {
            ValueType::String => Value::from(""),
            ValueType::Integer => Value::from(0),
            ValueType::Float => Value::from(0.0),
            ValueType::Boolean => Value::Bool(false),
            ValueType::List => Value::Array(Vec::new()),
            ValueType::Map => Value::Object(serde_json::Map::new()),
            ValueType::Unknown => Value::Null,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Boolean => "boolean",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Input or output contract entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub description: String,
    pub example: Value,
}

/// One transcribed pseudocode line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    /// Normalized pseudocode text
    pub description: String,
    /// Target-language rendering of the line
    pub code: String,
    /// Block nesting depth (0 = top level)
    pub depth: usize,
}

/// Input/expected-output pair for checking an implementation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationFixture {
    pub id: String,
    /// Input values keyed by input name
    pub input: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<Value>,
    /// Set when the caller must supply the expected output
    pub requires_expected_output: bool,
    pub description: String,
}

/// Test contract derived from one algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableSpecification {
    pub id: String,
    pub title: String,
    pub description: String,
    pub inputs: Vec<IoSpec>,
    pub outputs: Vec<IoSpec>,
    pub steps: Vec<Step>,
    pub source_concept_ids: Vec<String>,
    pub verification_fixtures: Vec<VerificationFixture>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ExecutableSpecification {
    /// Find fixture by ID
    #[inline]
    #[must_use]
    pub fn fixture(&self, id: &str) -> Option<&VerificationFixture> {
        self.verification_fixtures.iter().find(|f| f.id == id)
    }
}
