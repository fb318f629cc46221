use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncErrorKind {
    MalformedConfig,
    IdentifierSource,
    PortExhausted,
    BackupWrite,
    ConfigWrite,
    InvalidParams,
    Internal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncError {
    pub kind: SyncErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub retryable: bool,
}

impl SyncError {
    pub fn new(kind: SyncErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
            retryable: matches!(kind, SyncErrorKind::IdentifierSource),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn malformed_config(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::MalformedConfig, "MALFORMED_CONFIG", message).with_hint(
            "The existing SSH config could not be tokenized. Fix the file by hand; nothing was written.",
        )
    }

    pub fn identifier_source(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::IdentifierSource, "IDENTIFIER_SOURCE", message).with_hint(
            "The workspace inventory service could not be reached. No entries were pruned or written.",
        )
    }

    pub fn port_exhausted(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::PortExhausted, "PORT_EXHAUSTED", message)
    }

    pub fn backup_write(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::BackupWrite, "BACKUP_WRITE", message)
            .with_hint("Check disk space and permissions on the config directory.")
    }

    pub fn config_write(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::ConfigWrite, "CONFIG_WRITE", message)
            .with_hint("Check disk space and permissions on the config directory.")
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::Internal, "INTERNAL", message)
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for SyncError {}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::internal(err.to_string())
    }
}
