//! Multi-line JSON payload assembly
//!
//! Subprocesses frequently pretty-print JSON across several lines. The
//! assembler recognizes an opening `{` line, tracks brace depth (ignoring
//! braces inside JSON strings) until the document closes, then parses the
//! whole buffer. Anything that fails to parse degrades back to plain text
//! lines; malformed input never produces an error.

use tracing::trace;

/// Upper bound on a buffered document before giving up and flushing as text
const MAX_BUFFER_BYTES: usize = 64 * 1024;
const MAX_BUFFER_LINES: usize = 256;

/// One unit of output from the assembler
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A plain text line, passed through unchanged
    Text(String),
    /// A complete parsed JSON document
    Json(serde_json::Value),
}

/// Per-stream accumulator turning raw lines into payloads
#[derive(Debug, Default)]
pub struct JsonAssembler {
    buffer: Vec<String>,
    depth: i32,
    in_string: bool,
    escaped: bool,
}

impl JsonAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    fn buffering(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Feed one raw line (without trailing newline). Returns zero or more
    /// payloads: nothing while a document is still open, one `Json` when it
    /// closes, or the buffered lines as `Text` when assembly fails.
    pub fn push(&mut self, line: &str) -> Vec<Payload> {
        if !self.buffering() {
            let trimmed = line.trim_start();
            if !trimmed.starts_with('{') {
                return vec![Payload::Text(line.to_string())];
            }

            // Fast path: the whole document on one line
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(line) {
                return vec![Payload::Json(value)];
            }

            self.track(line);
            if self.depth <= 0 {
                // Balanced but unparseable, e.g. `{not json}` - plain text
                self.reset();
                return vec![Payload::Text(line.to_string())];
            }
            self.buffer.push(line.to_string());
            return Vec::new();
        }

        self.track(line);
        self.buffer.push(line.to_string());

        if self.depth <= 0 {
            let text = self.buffer.join("\n");
            let out = match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(value) => vec![Payload::Json(value)],
                Err(e) => {
                    trace!("Buffered document failed to parse: {}", e);
                    self.drain_as_text()
                }
            };
            self.reset();
            return out;
        }

        let buffered: usize = self.buffer.iter().map(String::len).sum();
        if buffered > MAX_BUFFER_BYTES || self.buffer.len() > MAX_BUFFER_LINES {
            trace!("Buffered document exceeded cap, flushing as text");
            let out = self.drain_as_text();
            self.reset();
            return out;
        }

        Vec::new()
    }

    /// Flush any partial buffer as text. Call when the stream closes.
    pub fn finish(&mut self) -> Vec<Payload> {
        let out = self.drain_as_text();
        self.reset();
        out
    }

    fn drain_as_text(&mut self) -> Vec<Payload> {
        self.buffer.drain(..).map(Payload::Text).collect()
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.depth = 0;
        self.in_string = false;
        self.escaped = false;
    }

    /// Update brace depth, skipping braces inside JSON strings
    fn track(&mut self, line: &str) {
        for c in line.chars() {
            if self.escaped {
                self.escaped = false;
                continue;
            }
            match c {
                '\\' if self.in_string => self.escaped = true,
                '"' => self.in_string = !self.in_string,
                '{' if !self.in_string => self.depth += 1,
                '}' if !self.in_string => self.depth -= 1,
                _ => {}
            }
        }
        // Strings do not span lines in well-formed output
        self.in_string = false;
        self.escaped = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_passthrough() {
        let mut asm = JsonAssembler::new();
        assert_eq!(
            asm.push("starting server on port 8080"),
            vec![Payload::Text("starting server on port 8080".to_string())]
        );
    }

    #[test]
    fn test_single_line_json() {
        let mut asm = JsonAssembler::new();
        let out = asm.push(r#"{"level": "info", "message": "ready"}"#);
        assert_eq!(
            out,
            vec![Payload::Json(
                serde_json::json!({"level": "info", "message": "ready"})
            )]
        );
    }

    #[test]
    fn test_multi_line_json() {
        let mut asm = JsonAssembler::new();
        assert!(asm.push("{").is_empty());
        assert!(asm.push(r#"  "message": "hello","#).is_empty());
        assert!(asm.push(r#"  "level": "warning""#).is_empty());
        let out = asm.push("}");
        assert_eq!(
            out,
            vec![Payload::Json(
                serde_json::json!({"message": "hello", "level": "warning"})
            )]
        );
    }

    #[test]
    fn test_nested_braces() {
        let mut asm = JsonAssembler::new();
        assert!(asm.push(r#"{"#).is_empty());
        assert!(asm.push(r#"  "outer": {"inner": 1},"#).is_empty());
        assert!(asm.push(r#"  "ok": true"#).is_empty());
        let out = asm.push("}");
        assert_eq!(
            out,
            vec![Payload::Json(
                serde_json::json!({"outer": {"inner": 1}, "ok": true})
            )]
        );
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let mut asm = JsonAssembler::new();
        assert!(asm.push("{").is_empty());
        assert!(asm.push(r#"  "message": "weird } brace { soup","#).is_empty());
        assert!(asm.push(r#"  "level": "info""#).is_empty());
        let out = asm.push("}");
        assert!(matches!(out.as_slice(), [Payload::Json(_)]));
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let mut asm = JsonAssembler::new();
        assert!(asm.push("{").is_empty());
        assert!(asm.push(r#"  "message": "she said \"hi}\"""#).is_empty());
        let out = asm.push("}");
        assert!(matches!(out.as_slice(), [Payload::Json(_)]));
    }

    #[test]
    fn test_balanced_but_unparseable() {
        let mut asm = JsonAssembler::new();
        let out = asm.push("{not actually json}");
        assert_eq!(out, vec![Payload::Text("{not actually json}".to_string())]);
        // Assembler is clean afterwards
        assert_eq!(
            asm.push("next line"),
            vec![Payload::Text("next line".to_string())]
        );
    }

    #[test]
    fn test_unbalanced_document_flushes_on_close() {
        let mut asm = JsonAssembler::new();
        assert!(asm.push("{").is_empty());
        assert!(asm.push(r#"  "message": "never closed""#).is_empty());
        let out = asm.finish();
        assert_eq!(
            out,
            vec![
                Payload::Text("{".to_string()),
                Payload::Text(r#"  "message": "never closed""#.to_string()),
            ]
        );
    }

    #[test]
    fn test_oversized_buffer_degrades_to_text() {
        let mut asm = JsonAssembler::new();
        assert!(asm.push("{").is_empty());
        let mut flushed = Vec::new();
        for i in 0..1000 {
            flushed = asm.push(&format!(r#"  "k{}": "v","#, i));
            if !flushed.is_empty() {
                break;
            }
        }
        assert!(!flushed.is_empty());
        assert!(matches!(flushed[0], Payload::Text(_)));
    }

    #[test]
    fn test_interleaved_text_and_json() {
        let mut asm = JsonAssembler::new();
        assert_eq!(
            asm.push("plain before"),
            vec![Payload::Text("plain before".to_string())]
        );
        assert!(asm.push("{").is_empty());
        assert!(matches!(
            asm.push(r#"  "a": 1}"#).as_slice(),
            [Payload::Json(_)]
        ));
        assert_eq!(
            asm.push("plain after"),
            vec![Payload::Text("plain after".to_string())]
        );
    }
}
