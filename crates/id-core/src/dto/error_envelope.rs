use serde::{Deserialize, Serialize};

/// Uniform RPC-facing failure shape. Every internal error is re-expressed
/// as this envelope before leaving the service boundary.
///
/// Status values: 400 client-input/credential errors, 401 token failures,
/// 500 infrastructure failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: u16,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}
