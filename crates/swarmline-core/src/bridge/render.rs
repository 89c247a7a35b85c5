//! Console rendering for classified records

use super::record::{LogRecord, StreamKind};
use super::severity::Severity;
use owo_colors::OwoColorize;

/// Renders records as single console lines, optionally colorized
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    show_source: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            color: true,
            show_source: true,
        }
    }

    /// Disable ANSI colors (non-TTY output)
    pub fn plain() -> Self {
        Self {
            color: false,
            show_source: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_source(mut self, show_source: bool) -> Self {
        self.show_source = show_source;
        self
    }

    /// Render a record to a string, without a trailing newline
    pub fn render(&self, record: &LogRecord) -> String {
        let mut out = String::new();

        let time = record.timestamp.format("%H:%M:%S%.3f").to_string();
        if self.color {
            out.push_str(&format!("{} ", time.dimmed()));
        } else {
            out.push_str(&time);
            out.push(' ');
        }

        if self.show_source {
            let tag = format!("[{}]", record.source);
            if self.color {
                let tag = match record.stream {
                    StreamKind::Stdout => tag.cyan().to_string(),
                    StreamKind::Stderr => tag.magenta().to_string(),
                };
                out.push_str(&tag);
            } else {
                out.push_str(&tag);
            }
            out.push(' ');
        }

        let label = format!("{:<8}", record.severity.label());
        if self.color {
            let label = match record.severity {
                Severity::Debug => label.dimmed().to_string(),
                Severity::Info => label.green().to_string(),
                Severity::Warning => label.yellow().to_string(),
                Severity::Error => label.red().to_string(),
                Severity::Critical => label.red().bold().to_string(),
            };
            out.push_str(&label);
        } else {
            out.push_str(&label);
        }
        out.push(' ');

        out.push_str(&record.message);

        if let Some(fields) = &record.fields {
            let pretty = serde_json::to_string_pretty(fields)
                .unwrap_or_else(|_| fields.to_string());
            for line in pretty.lines() {
                out.push('\n');
                out.push_str("    ");
                if self.color {
                    out.push_str(&line.dimmed().to_string());
                } else {
                    out.push_str(line);
                }
            }
        }

        out
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::assemble::Payload;
    use super::super::record::classify;

    fn record(payload: Payload) -> LogRecord {
        classify("server", StreamKind::Stdout, payload)
    }

    #[test]
    fn test_plain_render_layout() {
        let rec = record(Payload::Text("INFO ready".to_string()));
        let line = Renderer::plain().render(&rec);

        assert!(line.contains("[server]"));
        assert!(line.contains("INFO"));
        assert!(line.ends_with("INFO ready"));
        // No ANSI escapes in plain mode
        assert!(!line.contains('\u{1b}'));
    }

    #[test]
    fn test_colored_render_has_ansi() {
        let rec = record(Payload::Text("ERROR boom".to_string()));
        let line = Renderer::new().render(&rec);
        assert!(line.contains('\u{1b}'));
    }

    #[test]
    fn test_fields_rendered_indented() {
        let rec = record(Payload::Json(serde_json::json!({
            "message": "request",
            "status": 200,
        })));
        let line = Renderer::plain().render(&rec);
        let mut lines = line.lines();

        assert!(lines.next().unwrap().ends_with("request"));
        assert!(lines.all(|l| l.starts_with("    ")));
        assert!(line.contains("\"status\": 200"));
    }

    #[test]
    fn test_source_suppressed() {
        let rec = record(Payload::Text("hi".to_string()));
        let line = Renderer::plain().with_source(false).render(&rec);
        assert!(!line.contains("[server]"));
    }
}
