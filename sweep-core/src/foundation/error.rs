use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    PreparationFailed,
    EmptySweep,
    MixedDestinations,
    SignerUnavailable,
    AppSigningFailed,
    HardwareSignatureMissing,
    UnknownCandidate,
    DuplicateHardwareSignature,
    RemoteConnectivity,
    RemoteRejected,
    BroadcastRejected,
    InvalidStateTransition,
    CandidateLimitExceeded,
    TransactionTooLarge,
    StorageError,
    SerializationError,
    ConfigError,
    EncodingError,
    Message,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
pub enum SweepError {
    #[error("sweep preparation failed: {details}")]
    PreparationFailed { details: String },

    #[error("preparer returned a sweep with no candidates")]
    EmptySweep,

    #[error("candidate destinations disagree: expected {expected}, found {found}")]
    MixedDestinations { expected: String, found: String },

    #[error("app signer unavailable for keyset {keyset}: {details}")]
    SignerUnavailable { keyset: String, details: String },

    #[error("app signing failed for keyset {keyset}: {details}")]
    AppSigningFailed { keyset: String, details: String },

    #[error("no hardware signature supplied for candidate {candidate_id}")]
    HardwareSignatureMissing { candidate_id: String },

    #[error("signed data does not match any hardware candidate: {candidate_id}")]
    UnknownCandidate { candidate_id: String },

    #[error("hardware signature supplied twice for candidate {candidate_id}")]
    DuplicateHardwareSignature { candidate_id: String },

    #[error("co-signing service unreachable: {details}")]
    RemoteConnectivity { details: String },

    #[error("co-signing service rejected the transaction: {reason}")]
    RemoteRejected { reason: String },

    #[error("broadcast rejected: {details}")]
    BroadcastRejected { details: String },

    #[error("invalid sweep state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("candidate count {count} exceeds maximum {max}")]
    CandidateLimitExceeded { count: usize, max: usize },

    #[error("transaction blob of {size} bytes exceeds maximum {max}")]
    TransactionTooLarge { size: usize, max: usize },

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, SweepError>;

impl SweepError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SweepError::PreparationFailed { .. } => ErrorCode::PreparationFailed,
            SweepError::EmptySweep => ErrorCode::EmptySweep,
            SweepError::MixedDestinations { .. } => ErrorCode::MixedDestinations,
            SweepError::SignerUnavailable { .. } => ErrorCode::SignerUnavailable,
            SweepError::AppSigningFailed { .. } => ErrorCode::AppSigningFailed,
            SweepError::HardwareSignatureMissing { .. } => ErrorCode::HardwareSignatureMissing,
            SweepError::UnknownCandidate { .. } => ErrorCode::UnknownCandidate,
            SweepError::DuplicateHardwareSignature { .. } => ErrorCode::DuplicateHardwareSignature,
            SweepError::RemoteConnectivity { .. } => ErrorCode::RemoteConnectivity,
            SweepError::RemoteRejected { .. } => ErrorCode::RemoteRejected,
            SweepError::BroadcastRejected { .. } => ErrorCode::BroadcastRejected,
            SweepError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
            SweepError::CandidateLimitExceeded { .. } => ErrorCode::CandidateLimitExceeded,
            SweepError::TransactionTooLarge { .. } => ErrorCode::TransactionTooLarge,
            SweepError::StorageError { .. } => ErrorCode::StorageError,
            SweepError::SerializationError { .. } => ErrorCode::SerializationError,
            SweepError::ConfigError(_) => ErrorCode::ConfigError,
            SweepError::EncodingError(_) => ErrorCode::EncodingError,
            SweepError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    /// True for failures the caller is expected to resolve by retrying the
    /// whole sweep from preparation, as opposed to API misuse.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            SweepError::InvalidStateTransition { .. }
                | SweepError::UnknownCandidate { .. }
                | SweepError::DuplicateHardwareSignature { .. }
                | SweepError::HardwareSignatureMissing { .. }
                | SweepError::ConfigError(_)
        )
    }

    pub fn preparation(details: impl Into<String>) -> Self {
        SweepError::PreparationFailed { details: details.into() }
    }

    pub fn signer_unavailable(keyset: impl Into<String>, details: impl Into<String>) -> Self {
        SweepError::SignerUnavailable { keyset: keyset.into(), details: details.into() }
    }

    pub fn app_signing(keyset: impl Into<String>, details: impl Into<String>) -> Self {
        SweepError::AppSigningFailed { keyset: keyset.into(), details: details.into() }
    }

    pub fn storage(operation: impl Into<String>, details: impl Into<String>) -> Self {
        SweepError::StorageError { operation: operation.into(), details: details.into() }
    }
}

impl From<io::Error> for SweepError {
    fn from(err: io::Error) -> Self {
        SweepError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        SweepError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<hex::FromHexError> for SweepError {
    fn from(err: hex::FromHexError) -> Self {
        SweepError::EncodingError(format!("hex decode error: {}", err))
    }
}

impl From<figment::Error> for SweepError {
    fn from(err: figment::Error) -> Self {
        SweepError::ConfigError(err.to_string())
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `SweepError` variants at the call site to preserve context.
