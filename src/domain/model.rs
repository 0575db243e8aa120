use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One trainer row. Keys keep the column order of the source CSV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Replaces the value in place when `field` already exists, otherwise appends it.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(field.into(), value)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<Record>,
    pub passthrough_columns: Vec<String>,
}
