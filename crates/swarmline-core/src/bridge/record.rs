//! Log record classification
//!
//! Turns assembled payloads into [`LogRecord`]s: structured JSON documents
//! contribute message/level/timestamp fields, free text gets its severity
//! inferred from tokens.

use super::assemble::Payload;
use super::severity::Severity;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which subprocess stream a record came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    /// Default severity for lines carrying no level information
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::Stdout => Severity::Info,
            Self::Stderr => Severity::Warning,
        }
    }
}

/// A classified log line or structured document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Name of the originating process
    pub source: String,
    pub stream: StreamKind,
    pub severity: Severity,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub message: String,
    /// Structured fields left over after extracting message/level/timestamp
    pub fields: Option<Value>,
}

/// Keys checked, in order, for the human-readable message of a document
const MESSAGE_KEYS: &[&str] = &["message", "msg", "event", "text"];
/// Keys checked, in order, for the severity of a document
const LEVEL_KEYS: &[&str] = &["level", "levelname", "severity"];
/// Keys treated as the record timestamp and stripped from residual fields
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time", "asctime", "ts"];

/// Classify one payload from `source`/`stream` into a record
pub fn classify(source: &str, stream: StreamKind, payload: Payload) -> LogRecord {
    match payload {
        Payload::Text(line) => LogRecord {
            source: source.to_string(),
            stream,
            severity: Severity::infer(&line).unwrap_or_else(|| stream.default_severity()),
            timestamp: chrono::Utc::now(),
            message: line,
            fields: None,
        },
        Payload::Json(value) => classify_json(source, stream, value),
    }
}

fn classify_json(source: &str, stream: StreamKind, value: Value) -> LogRecord {
    let mut object = match value {
        Value::Object(map) => map,
        // Non-object documents carry no known fields; render the whole thing
        other => {
            return LogRecord {
                source: source.to_string(),
                stream,
                severity: stream.default_severity(),
                timestamp: chrono::Utc::now(),
                message: String::new(),
                fields: Some(other),
            }
        }
    };

    // Keys are only consumed when their value actually parses; anything
    // unrecognized stays in the residual fields
    let severity = LEVEL_KEYS
        .iter()
        .find_map(|k| {
            let parsed = object.get(*k).and_then(Severity::from_value)?;
            object.remove(*k);
            Some(parsed)
        })
        .unwrap_or_else(|| stream.default_severity());

    let message = MESSAGE_KEYS
        .iter()
        .find_map(|k| match object.remove(*k) {
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
            None => None,
        })
        .unwrap_or_default();

    let timestamp = TIMESTAMP_KEYS
        .iter()
        .find_map(|k| {
            let parsed = object.get(*k).and_then(parse_timestamp)?;
            object.remove(*k);
            Some(parsed)
        })
        .unwrap_or_else(chrono::Utc::now);

    let fields = if object.is_empty() {
        None
    } else {
        Some(Value::Object(object))
    };

    LogRecord {
        source: source.to_string(),
        stream,
        severity,
        timestamp,
        message,
        fields,
    }
}

fn parse_timestamp(value: &Value) -> Option<chrono::DateTime<chrono::Utc>> {
    match value {
        Value::String(s) => s
            .parse::<chrono::DateTime<chrono::Utc>>()
            .ok()
            .or_else(|| {
                chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(n) => {
            let secs = n.as_f64()?;
            chrono::DateTime::from_timestamp(secs as i64, 0)
        }
        _ => None,
    }
}
