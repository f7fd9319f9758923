//! Response envelope shared by every admin API endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server reply of the form `{ "code": <int>, "result": <any> }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Envelope {
    /// Zero on success, an application error code otherwise.
    pub code: i64,

    #[serde(default)]
    pub result: Value,
}

impl Envelope {
    pub fn success(result: Value) -> Self {
        Self { code: 0, result }
    }

    pub fn failure(code: i64, result: Value) -> Self {
        Self { code, result }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}
