use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Identifier of a notification, stable across polls for the same message.
///
/// Integers decode as [`RecordId::Number`] when they fit an `i64`, otherwise as
/// [`RecordId::Unsigned`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Unsigned(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Unsigned(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// Origin context of a notification.
///
/// Anything outside the known set lands in [`Category::Other`] with the raw value kept for
/// logging. A missing or null category is [`Category::Portfolio`], the server side default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Portfolio,
    Internal,
    Platform,
    System,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Portfolio => "portfolio",
            Category::Internal => "internal",
            Category::Platform => "platform",
            Category::System => "system",
            Category::Other(raw) => raw,
        }
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        match raw {
            "portfolio" => Category::Portfolio,
            "internal" => Category::Internal,
            "platform" => Category::Platform,
            "system" => Category::System,
            other => Category::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Category::default(),
            Value::String(raw) => Category::from(raw.as_str()),
            other => Category::Other(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: RecordId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<RecordId>,

    #[serde(default)]
    pub category: Category,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
}

impl NotificationRecord {
    pub fn new(id: impl Into<RecordId>, category: Category) -> Self {
        Self {
            id: id.into(),
            thread_id: None,
            category,
            name: String::new(),
            message: String::new(),
            time: String::new(),
        }
    }

    pub fn with_sender(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.name = name.into();
        self.message = message.into();
        self
    }

    /// Root of the conversation this record belongs to.
    pub fn thread(&self) -> &RecordId {
        self.thread_id.as_ref().unwrap_or(&self.id)
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
