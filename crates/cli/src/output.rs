use argspec::{ParsedArgs, Schema, Value};
use serde_json::{Map, Value as Json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    /// `--format` is restricted to `text` and `json` by the schema.
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "text" => Self::Text,
            "json" => Self::Json,
            other => unreachable!("--format restricted to text|json, got {other}"),
        }
    }
}

fn text_value(value: &Value<'_>) -> String {
    match value {
        Value::Flag(b) => b.to_string(),
        Value::Single(s) => format!("{s:?}"),
        Value::Tuple(v) | Value::Captured(v) => format!("{v:?}"),
    }
}

fn json_value(value: &Value<'_>) -> Json {
    match value {
        Value::Flag(b) => Json::Bool(*b),
        Value::Single(s) => Json::String(s.to_string()),
        Value::Tuple(v) | Value::Captured(v) => {
            Json::Array(v.iter().map(|s| Json::String(s.to_string())).collect())
        }
    }
}

/// One `name = value` line per slot, in declaration order.
pub fn text(parsed: &ParsedArgs<'_>) -> String {
    parsed
        .iter()
        .map(|(name, value)| format!("{name} = {}\n", text_value(value)))
        .collect()
}

pub fn json(parsed: &ParsedArgs<'_>) -> Json {
    let map: Map<String, Json> = parsed
        .iter()
        .map(|(name, value)| (name.to_string(), json_value(value)))
        .collect();
    Json::Object(map)
}

pub fn render(parsed: &ParsedArgs<'_>, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Text => text(parsed),
        Format::Json => format!("{}\n", serde_json::to_string_pretty(&json(parsed))?),
    })
}

/// `name: kind` per slot of the synthesized shape.
pub fn shape(schema: &Schema) -> String {
    schema
        .shape()
        .slots()
        .iter()
        .map(|slot| format!("{}: {}\n", slot.name, slot.kind))
        .collect()
}
