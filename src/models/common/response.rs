use serde::{Deserialize, Serialize};

// Response envelope used by every Athena endpoint. Consumed, not owned:
// this crate only ever deserializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload of a successful envelope.
    ///
    /// A failed envelope yields its server-provided `message` (when present)
    /// as the error text, falling back to `fallback`.
    pub fn into_data(self, fallback: &str) -> crate::errors::Result<T> {
        if !self.success {
            let reason = self.message.unwrap_or_else(|| fallback.to_string());
            return Err(crate::errors::GradebookError::server_rejected(reason));
        }
        self.data
            .ok_or_else(|| crate::errors::GradebookError::server_rejected(fallback))
    }

    /// Check the envelope's success flag, ignoring any payload. Used by
    /// writes whose response body carries nothing the client needs.
    pub fn ensure_success(self, fallback: &str) -> crate::errors::Result<()> {
        if !self.success {
            let reason = self.message.unwrap_or_else(|| fallback.to_string());
            return Err(crate::errors::GradebookError::server_rejected(reason));
        }
        Ok(())
    }
}
