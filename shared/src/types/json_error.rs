use serde::{Deserialize, Serialize};

/// Error body the backend attaches to every non-2xx response.
///
/// `detail` is either a plain string or, on validation failures, a
/// structured value; it is normalised to text for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn detail_text(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
