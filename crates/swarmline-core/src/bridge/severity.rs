//! Severity parsing and free-text inference

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Word-bounded severity tokens as they appear in free-form log lines
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(CRITICAL|FATAL|ERROR|ERR|WARNING|WARN|INFO|DEBUG|TRACE)\b")
        .unwrap()
});

/// Markers that indicate a failure even without an explicit level token
static FAILURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\btraceback\b|\bpanicked\b|\bexception\b|\bstack trace\b").unwrap()
});

/// Log record severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Fixed-width label for console alignment
    pub fn label(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Parse a structured level name, accepting common aliases
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "TRACE" | "DEBUG" => Some(Self::Debug),
            "INFO" | "NOTICE" => Some(Self::Info),
            "WARN" | "WARNING" => Some(Self::Warning),
            "ERR" | "ERROR" => Some(Self::Error),
            "CRITICAL" | "FATAL" | "PANIC" => Some(Self::Critical),
            _ => None,
        }
    }

    /// Parse a structured level value: a name string or a numeric level
    /// (Python logging convention: 10/20/30/40/50)
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Self::from_name(s),
            serde_json::Value::Number(n) => {
                let n = n.as_f64()?;
                Some(match n as i64 {
                    i64::MIN..=19 => Self::Debug,
                    20..=29 => Self::Info,
                    30..=39 => Self::Warning,
                    40..=49 => Self::Error,
                    _ => Self::Critical,
                })
            }
            _ => None,
        }
    }

    /// Infer severity from a free-form line by scanning for level tokens and
    /// failure markers. Returns `None` when nothing matches.
    pub fn infer(text: &str) -> Option<Self> {
        if let Some(m) = TOKEN_RE.find(text) {
            return Self::from_name(m.as_str());
        }
        if FAILURE_RE.is_match(text) {
            return Some(Self::Error);
        }
        None
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(Severity::from_name("warn"), Some(Severity::Warning));
        assert_eq!(Severity::from_name("ERR"), Some(Severity::Error));
        assert_eq!(Severity::from_name("fatal"), Some(Severity::Critical));
        assert_eq!(Severity::from_name("trace"), Some(Severity::Debug));
        assert_eq!(Severity::from_name("verbose"), None);
    }

    #[test]
    fn test_from_value_numeric() {
        assert_eq!(
            Severity::from_value(&serde_json::json!(10)),
            Some(Severity::Debug)
        );
        assert_eq!(
            Severity::from_value(&serde_json::json!(20)),
            Some(Severity::Info)
        );
        assert_eq!(
            Severity::from_value(&serde_json::json!(30)),
            Some(Severity::Warning)
        );
        assert_eq!(
            Severity::from_value(&serde_json::json!(40)),
            Some(Severity::Error)
        );
        assert_eq!(
            Severity::from_value(&serde_json::json!(50)),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn test_from_value_non_level() {
        assert_eq!(Severity::from_value(&serde_json::json!(null)), None);
        assert_eq!(Severity::from_value(&serde_json::json!(["a"])), None);
    }

    #[test]
    fn test_infer_tokens() {
        assert_eq!(
            Severity::infer("2024-01-01 ERROR something broke"),
            Some(Severity::Error)
        );
        assert_eq!(
            Severity::infer("[WARN] disk space low"),
            Some(Severity::Warning)
        );
        assert_eq!(Severity::infer("all systems nominal"), None);
    }

    #[test]
    fn test_infer_requires_word_boundary() {
        // Token embedded in a longer word does not count
        assert_eq!(Severity::infer("0 ERRORS reported"), None);
        assert_eq!(Severity::infer("INFOGRAPHIC rendered"), None);
    }

    #[test]
    fn test_infer_failure_markers() {
        assert_eq!(
            Severity::infer("Traceback (most recent call last):"),
            Some(Severity::Error)
        );
        assert_eq!(
            Severity::infer("thread 'main' panicked at src/main.rs:1:1"),
            Some(Severity::Error)
        );
    }
}
