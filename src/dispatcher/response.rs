use serde::{Deserialize, Serialize};

use crate::utils::RelayError;

/// Outcome reported back to the transport for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

impl From<&RelayError> for Response {
    fn from(err: &RelayError) -> Self {
        let body = match err {
            RelayError::UnknownEvent(_) => "Invalid route".to_string(),
            other => other.to_string(),
        };
        Self {
            status_code: err.status_code(),
            body,
        }
    }
}
