//! Declarative parameter schemas and validated arguments.
//!
//! Every operation declares its parameters as a list of [`ParamSpec`]. Raw
//! JSON arguments from the calling agent are checked against that list by
//! [`validate`], which fills defaults and yields typed [`Args`]. The same
//! list renders to a JSON Schema for `tools/list`.

use schemars::{Schema, SchemaGenerator, json_schema};
use serde_json::{Map, Value, json};

use crate::error::{Result, SourceBridgeError};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Value kind accepted by a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    /// One of a fixed set of string values.
    Enum(&'static [&'static str]),
    /// Array of strings.
    StringList,
    /// Array of strings, each from a fixed set.
    EnumList(&'static [&'static str]),
    /// Free-form JSON object.
    Object,
}

/// A single named, typed, optionally-defaulted parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter name as seen by the caller.
    pub name: &'static str,
    /// What this parameter controls.
    pub description: &'static str,
    /// Accepted value kind.
    pub kind: ParamKind,
    /// Whether the caller must provide it.
    pub required: bool,
    /// Value used when the caller omits it.
    pub default: Option<Value>,
    /// Inclusive lower bound for numeric kinds.
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numeric kinds.
    pub maximum: Option<f64>,
}

impl ParamSpec {
    fn new(name: &'static str, description: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            description,
            kind,
            required: false,
            default: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, ParamKind::String)
    }

    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, ParamKind::Integer)
    }

    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, ParamKind::Number)
    }

    pub fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, ParamKind::Boolean)
    }

    pub fn enumeration(
        name: &'static str,
        description: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        Self::new(name, description, ParamKind::Enum(values))
    }

    pub fn string_list(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, ParamKind::StringList)
    }

    pub fn enum_list(
        name: &'static str,
        description: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        Self::new(name, description, ParamKind::EnumList(values))
    }

    pub fn object(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, ParamKind::Object)
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the value used when the caller omits the parameter.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set an inclusive numeric range.
    pub fn range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Render this parameter as a JSON Schema property.
    ///
    /// Scalar and list shapes come from the `JsonSchema` impl of the Rust
    /// type the kind maps onto; enum values, bounds and the default are
    /// layered on.
    pub fn json_schema(&self, generator: &mut SchemaGenerator) -> Schema {
        let mut schema = match &self.kind {
            ParamKind::String | ParamKind::Enum(_) => generator.subschema_for::<String>(),
            ParamKind::Integer => generator.subschema_for::<i64>(),
            ParamKind::Number => generator.subschema_for::<f64>(),
            ParamKind::Boolean => generator.subschema_for::<bool>(),
            ParamKind::StringList | ParamKind::EnumList(_) => {
                generator.subschema_for::<Vec<String>>()
            }
            ParamKind::Object => json_schema!({ "type": "object" }),
        };

        match &self.kind {
            ParamKind::Enum(values) => {
                schema.insert("enum".into(), json!(values));
            }
            ParamKind::EnumList(values) => {
                schema.insert("items".into(), json!({ "type": "string", "enum": values }));
            }
            _ => {}
        }
        schema.insert("description".into(), Value::String(self.description.into()));
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.clone());
        }
        if let Some(min) = self.minimum {
            schema.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.maximum {
            schema.insert("maximum".into(), json!(max));
        }
        schema
    }
}

/// Render a full parameter list as a JSON Schema object.
pub fn input_schema(specs: &[ParamSpec]) -> Schema {
    let mut generator = SchemaGenerator::default();
    let properties: Map<String, Value> = specs
        .iter()
        .map(|s| (s.name.to_string(), s.json_schema(&mut generator).to_value()))
        .collect();
    let required: Vec<&str> = specs.iter().filter(|s| s.required).map(|s| s.name).collect();

    json_schema!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check raw arguments against `specs`, filling defaults.
///
/// `null` counts as absent. Unknown arguments are dropped.
pub fn validate(specs: &[ParamSpec], raw: &Map<String, Value>) -> Result<Args> {
    let mut values = Map::new();

    for spec in specs {
        match raw.get(spec.name).filter(|v| !v.is_null()) {
            Some(value) => {
                check_kind(spec, value)?;
                values.insert(spec.name.to_string(), value.clone());
            }
            None => {
                if let Some(default) = &spec.default {
                    values.insert(spec.name.to_string(), default.clone());
                } else if spec.required {
                    return Err(SourceBridgeError::validation(format!(
                        "missing required parameter '{}'",
                        spec.name
                    )));
                }
            }
        }
    }

    for key in raw.keys() {
        if !specs.iter().any(|s| s.name == key) {
            tracing::debug!(param = %key, "ignoring unknown parameter");
        }
    }

    Ok(Args { values })
}

fn check_kind(spec: &ParamSpec, value: &Value) -> Result<()> {
    let name = spec.name;
    let mismatch = |expected: &str| {
        SourceBridgeError::validation(format!("parameter '{name}' must be {expected}"))
    };

    match &spec.kind {
        ParamKind::String => {
            value.as_str().ok_or_else(|| mismatch("a string"))?;
        }
        ParamKind::Boolean => {
            value.as_bool().ok_or_else(|| mismatch("a boolean"))?;
        }
        ParamKind::Integer => {
            let n = value
                .as_f64()
                .filter(|n| n.fract() == 0.0)
                .ok_or_else(|| mismatch("an integer"))?;
            check_range(spec, n)?;
        }
        ParamKind::Number => {
            let n = value.as_f64().ok_or_else(|| mismatch("a number"))?;
            check_range(spec, n)?;
        }
        ParamKind::Enum(allowed) => {
            let s = value.as_str().ok_or_else(|| mismatch("a string"))?;
            check_member(name, allowed, s)?;
        }
        ParamKind::StringList => {
            let items = value.as_array().ok_or_else(|| mismatch("an array of strings"))?;
            if items.iter().any(|v| !v.is_string()) {
                return Err(mismatch("an array of strings"));
            }
        }
        ParamKind::EnumList(allowed) => {
            let items = value.as_array().ok_or_else(|| mismatch("an array of strings"))?;
            for item in items {
                let s = item.as_str().ok_or_else(|| mismatch("an array of strings"))?;
                check_member(name, allowed, s)?;
            }
        }
        ParamKind::Object => {
            value.as_object().ok_or_else(|| mismatch("an object"))?;
        }
    }
    Ok(())
}

fn check_range(spec: &ParamSpec, n: f64) -> Result<()> {
    let below = spec.minimum.is_some_and(|min| n < min);
    let above = spec.maximum.is_some_and(|max| n > max);
    if below || above {
        return Err(SourceBridgeError::validation(format!(
            "parameter '{}' = {n} is outside [{}, {}]",
            spec.name,
            spec.minimum.map_or("-inf".into(), |v| v.to_string()),
            spec.maximum.map_or("inf".into(), |v| v.to_string()),
        )));
    }
    Ok(())
}

fn check_member(name: &str, allowed: &[&str], s: &str) -> Result<()> {
    if allowed.contains(&s) {
        Ok(())
    } else {
        Err(SourceBridgeError::validation(format!(
            "parameter '{name}' must be one of [{}], got '{s}'",
            allowed.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

/// Validated arguments for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Args {
    values: Map<String, Value>,
}

impl Args {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument (builder style, used by tests and internal callers).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Raw value, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// Whether a non-null value is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn opt_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// A required string.
    pub fn str(&self, name: &str) -> Result<&str> {
        self.opt_str(name).ok_or_else(|| {
            SourceBridgeError::validation(format!("missing required parameter '{name}'"))
        })
    }

    pub fn opt_u32(&self, name: &str) -> Option<u32> {
        self.get(name)
            .and_then(Value::as_f64)
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .map(|n| n.min(u32::MAX as f64) as u32)
    }

    pub fn opt_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn opt_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// A boolean flag, `false` when absent.
    pub fn flag(&self, name: &str) -> bool {
        self.opt_bool(name).unwrap_or(false)
    }

    /// A string list, empty when absent.
    pub fn str_list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn opt_object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.get(name).and_then(Value::as_object)
    }
}
