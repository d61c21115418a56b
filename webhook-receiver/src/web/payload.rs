//! Diagnostic helpers for logging inbound payloads.
//!
//! Nothing here influences the response; it only shapes what gets logged.

use std::fmt;

use serde::de::IgnoredAny;

const KIB: f64 = 1024.0;
const INDENT: &str = "    ";

/// Body size rendered in bytes, KB or MB depending on magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSize(pub usize);

impl fmt::Display for PayloadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kb = self.0 as f64 / KIB;
        let mb = kb / KIB;

        if mb >= 1.0 {
            write!(f, "{:.2} MB", mb)
        } else if kb >= 1.0 {
            write!(f, "{:.2} KB", kb)
        } else {
            write!(f, "{} bytes", self.0)
        }
    }
}

/// Re-indent a JSON document with four spaces.
///
/// Only whitespace between tokens changes: number text, key order and
/// duplicate keys are logged exactly as received. Returns `None` when the
/// body is not a single valid JSON value.
pub fn pretty_json(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<IgnoredAny>(body).ok()?;
    let text = std::str::from_utf8(body).ok()?;
    Some(reindent(text))
}

fn reindent(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            ' ' | '\t' | '\n' | '\r' => {}
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                while chars.peek().is_some_and(|n| n.is_ascii_whitespace()) {
                    chars.next();
                }
                // Empty containers stay on one line.
                let close = if c == '{' { '}' } else { ']' };
                if chars.peek() == Some(&close) {
                    chars.next();
                    out.push(close);
                } else {
                    depth += 1;
                    newline(&mut out, depth);
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            _ => out.push(c),
        }
    }

    out
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
