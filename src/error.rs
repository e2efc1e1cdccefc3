use thiserror::Error;

/// Normalized remote failure, produced by the GitHub client adapter.
///
/// `status` is None when the request never produced an HTTP response
/// (connect error, timeout). `message` is the upstream error body's
/// `message` field when available, raw body text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl RemoteFailure {
    /// Status-derived presentation message. The status code is ground
    /// truth for classification; operation services may layer a clearer
    /// message on top (see `ToolError::Remote::remapped`).
    pub fn classified(&self) -> String {
        match self.status {
            Some(401) => "Unauthorized - check your GitHub token".to_string(),
            Some(403) => "Access forbidden - check your GitHub token permissions".to_string(),
            Some(404) => "Resource not found".to_string(),
            Some(s) if (400..500).contains(&s) => format!("Client error: {}", self.message),
            Some(s) if s >= 500 => format!("GitHub API server error: {}", self.message),
            _ => format!("GitHub API error: {}", self.message),
        }
    }
}

/// The complete failure taxonomy for a tool invocation.
///
/// - `Validation`: bad caller input; never reached the network, never retried.
/// - `Remote`: the hosting API responded with an error status or the network
///   call itself failed.
/// - `Unknown`: catch-all for failures outside the other two classes.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{message}")]
    Validation { message: String },
    #[error("{}", remote_message(.failure, .remapped))]
    Remote {
        failure: RemoteFailure,
        /// Optional operation-specific message enrichment, e.g. the
        /// merge-conflict remapping in merge_branches.
        remapped: Option<String>,
    },
    #[error("{message}")]
    Unknown { message: String },
}

fn remote_message(failure: &RemoteFailure, remapped: &Option<String>) -> String {
    match remapped {
        Some(m) => m.clone(),
        None => failure.classified(),
    }
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation {
            message: message.into(),
        }
    }

    pub fn remote(failure: RemoteFailure) -> Self {
        ToolError::Remote {
            failure,
            remapped: None,
        }
    }

    pub fn remote_remapped(failure: RemoteFailure, message: impl Into<String>) -> Self {
        ToolError::Remote {
            failure,
            remapped: Some(message.into()),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        ToolError::Unknown {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::unknown(format!("Serialization error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(status: Option<u16>, message: &str) -> RemoteFailure {
        RemoteFailure {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn status_classification_matrix() {
        assert_eq!(
            failure(Some(401), "bad creds").classified(),
            "Unauthorized - check your GitHub token"
        );
        assert_eq!(
            failure(Some(403), "nope").classified(),
            "Access forbidden - check your GitHub token permissions"
        );
        assert_eq!(failure(Some(404), "Not Found").classified(), "Resource not found");
        assert_eq!(
            failure(Some(422), "Validation Failed").classified(),
            "Client error: Validation Failed"
        );
        assert_eq!(
            failure(Some(502), "bad gateway").classified(),
            "GitHub API server error: bad gateway"
        );
        assert_eq!(
            failure(None, "connection refused").classified(),
            "GitHub API error: connection refused"
        );
    }

    #[test]
    fn remapped_message_wins() {
        let err = ToolError::remote_remapped(
            failure(Some(404), "Base does not exist"),
            "Base branch 'main' does not exist",
        );
        assert_eq!(err.to_string(), "Base branch 'main' does not exist");
    }

    #[test]
    fn plain_remote_uses_classification() {
        let err = ToolError::remote(failure(Some(404), "Not Found"));
        assert_eq!(err.to_string(), "Resource not found");
    }
}
