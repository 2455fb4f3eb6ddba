//! Wire protocol: newline-delimited JSON request/response framing between the
//! CLI client and the daemon.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A client request: a command name plus a string-keyed parameter bag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    pub command: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl Request {
    pub fn new(command: impl Into<String>) -> Self {
        Request {
            command: command.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A daemon response. `error`/`message` are omitted from the rendered form
/// when `ok` is true, matching the wire contract; decoders treat a missing
/// field as an empty string via `#[serde(default)]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Response {
    pub ok: bool,
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Response {
    pub fn ok() -> Self {
        Response {
            ok: true,
            data: HashMap::new(),
            error: String::new(),
            message: String::new(),
        }
    }

    pub fn ok_with_data(data: HashMap<String, serde_json::Value>) -> Self {
        Response {
            ok: true,
            data,
            error: String::new(),
            message: String::new(),
        }
    }

    pub fn err(code: &str, message: impl Into<String>) -> Self {
        Response {
            ok: false,
            data: HashMap::new(),
            error: code.to_string(),
            message: message.into(),
        }
    }
}

/// Encode a message as one line of JSON terminated by `\n`.
pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    Ok(line)
}

/// Decode one line of JSON (without its trailing newline) into a message.
pub fn decode<T: for<'de> Deserialize<'de>>(line: &str) -> serde_json::Result<T> {
    serde_json::from_str(line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_roundtrips() {
        let req = Request::new("add").with_param("key", "k").with_param("value", "v");
        let encoded = encode(&req).unwrap();
        assert!(encoded.ends_with('\n'));
        let decoded: Request = decode(&encoded).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn success_response_omits_error_and_message() {
        let resp = Response::ok();
        let encoded = encode(&resp).unwrap();
        assert!(!encoded.contains("error"));
        assert!(!encoded.contains("message"));
        let decoded: Response = decode(&encoded).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn error_response_roundtrips() {
        let resp = Response::err("locked", "stash is locked");
        let encoded = encode(&resp).unwrap();
        let decoded: Response = decode(&encoded).unwrap();
        assert_eq!(decoded, resp);
    }
}
