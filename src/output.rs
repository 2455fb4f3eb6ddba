//! Dual-mode CLI output: human-readable colored lines, or a single JSON
//! object per invocation, selected by the global `--json` flag.

use colored::*;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: &str) {
        if self.json {
            self.emit(true, json!({}), None);
        } else {
            println!("{} {}", "✓".green(), message);
        }
    }

    pub fn success_with_data(&self, message: &str, data: Value) {
        if self.json {
            self.emit(true, data, None);
        } else {
            println!("{} {}", "✓".green(), message);
        }
    }

    pub fn error(&self, code: &str, message: &str) {
        if self.json {
            self.emit(false, json!({}), Some((code, message)));
        } else {
            eprintln!("{} {}", "✗".red(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{} {}", "ℹ".cyan(), message);
        }
    }

    fn emit(&self, ok: bool, data: Value, err: Option<(&str, &str)>) {
        let mut obj = serde_json::Map::new();
        obj.insert("ok".to_string(), json!(ok));
        obj.insert("data".to_string(), data);
        if let Some((code, message)) = err {
            obj.insert("error".to_string(), json!(code));
            obj.insert("message".to_string(), json!(message));
        }
        println!("{}", Value::Object(obj));
    }

    /// Render any serializable payload as JSON, or hand it to `human` for the
    /// plain-text rendering, depending on the selected mode.
    pub fn render<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) {
        if self.json {
            match serde_json::to_string(value) {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("{} failed to render JSON: {}", "✗".red(), e),
            }
        } else {
            human(value);
        }
    }
}
