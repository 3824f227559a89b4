use fab_core::command::CommandOutput;
use serde::Deserialize;
use serde_json::{json, Value};

/// Envelope the platform CLI prints for `fab api` calls.
#[derive(Debug, Deserialize)]
struct Envelope {
    status_code: Option<u16>,
    #[serde(default)]
    text: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// `None` when the output was empty or could not be parsed.
    pub status_code: Option<u16>,
    /// Parsed response payload, `Null` when absent.
    pub body: Value,
    pub raw_stdout: String,
    pub raw_stderr: String,
    pub exit_code: Option<i32>,
}

impl ApiResponse {
    /// Interpret captured CLI output. Never fails: unusable output produces a
    /// response with no status code and a `Null` body.
    pub fn from_output(output: CommandOutput) -> Self {
        let envelope = if output.stdout.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Envelope>(output.stdout.trim()).ok()
        };

        let (status_code, body) = match envelope {
            Some(env) => (env.status_code, normalize_text(env.text)),
            None => (None, Value::Null),
        };

        Self {
            status_code,
            body,
            raw_stdout: output.stdout,
            raw_stderr: output.stderr,
            exit_code: output.exit_code,
        }
    }

    /// A well-formed response with the given status and payload.
    pub fn json(status_code: u16, body: Value) -> Self {
        let raw = json!({ "status_code": status_code, "text": body }).to_string();
        Self {
            status_code: Some(status_code),
            body,
            raw_stdout: raw,
            raw_stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// A well-formed response with no payload.
    pub fn status(status_code: u16) -> Self {
        Self::json(status_code, Value::Null)
    }

    /// Nothing at all on stdout.
    pub fn blank() -> Self {
        Self {
            status_code: None,
            body: Value::Null,
            raw_stdout: String::new(),
            raw_stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// Non-empty output that is not a valid envelope.
    pub fn unparseable(raw: impl Into<String>) -> Self {
        Self {
            status_code: None,
            body: Value::Null,
            raw_stdout: raw.into(),
            raw_stderr: String::new(),
            exit_code: Some(1),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.raw_stdout.trim().is_empty()
    }

    pub fn is_parsed(&self) -> bool {
        self.status_code.is_some()
    }

    pub fn status_in(&self, accepted: &[u16]) -> bool {
        self.status_code.is_some_and(|code| accepted.contains(&code))
    }

    /// A string field of the payload.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(Value::as_str)
    }

    /// Status code for log lines.
    pub fn status_label(&self) -> String {
        match self.status_code {
            Some(code) => code.to_string(),
            None => "none".to_string(),
        }
    }
}

/// Some endpoints return the payload as a JSON string; parse it when possible.
fn normalize_text(text: Value) -> Value {
    match text {
        Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
        other => other,
    }
}
