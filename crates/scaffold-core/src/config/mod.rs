//! Stage state records and environment-derived defaults
//!
//! [`Config`] is the flat, partial record that flows through the pipeline:
//! every module reads the keys it owns and returns the keys it resolved.

pub mod choices;
pub mod user_agent;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use choices::{Ide, PackageManager};
pub use user_agent::detect_package_manager;

/// A partial configuration record (insertion ordered)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`; nulls count as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Deserialize a structured value (lists of entries and the like)
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.get(key)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder form of [`Config::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` only when the caller has not supplied it
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        if !self.contains(key) {
            self.set(key, value);
        }
    }

    /// Set `key` to `value` when it is `Some`; `None` leaves the record alone
    pub fn with_opt<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Shallow merge; keys carrying a value in `other` win, nulls never erase
    pub fn merge(mut self, other: Config) -> Config {
        for (key, value) in other.0 {
            if !value.is_null() {
                self.0.insert(key, value);
            }
        }
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Value::is_null)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Config {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Config {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
