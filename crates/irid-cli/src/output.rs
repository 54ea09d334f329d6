//! Output formatting

use serde::Serialize;
use serde_json::{Map, Value};

/// Output builder for formatted CLI output
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            message: None,
        }
    }

    /// Create an output whose JSON fields are taken from a serializable struct
    pub fn from_serialize<T: Serialize>(json_mode: bool, value: &T) -> Result<Self, serde_json::Error> {
        let mut output = Self::new(json_mode);
        match serde_json::to_value(value)? {
            Value::Object(fields) => output.fields = fields,
            other => {
                output.fields.insert("result".to_string(), other);
            }
        }
        Ok(output)
    }

    /// Add a string field to the output
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a boolean field to the output
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Render without printing
    pub fn render(&self) -> Option<String> {
        if self.json_mode {
            Some(serde_json::to_string_pretty(&Value::Object(self.fields.clone())).unwrap_or_default())
        } else {
            self.message.clone()
        }
    }

    /// Print the output
    pub fn print(self) {
        if let Some(text) = self.render() {
            println!("{}", text);
        }
    }
}
