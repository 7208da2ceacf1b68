//! Structured error types for the invocation pipeline.
//!
//! Every failure is local to one operator action: the caller narrates it
//! and the session stays in its previous state.

use thiserror::Error;

use crate::types::FieldKind;

/// Result alias used throughout the console.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsoleError {
    /// Document is not a usable IDL
    #[error("Invalid interface definition: {reason}")]
    InvalidInterfaceDefinition { reason: String },

    /// No instruction with this exact name
    #[error("Instruction '{name}' not found in IDL")]
    InstructionNotFound { name: String },

    #[error("Missing value for argument '{name}'")]
    MissingArgument { name: String },

    #[error("Missing address for account '{name}'")]
    MissingAccount { name: String },

    #[error("Invalid address for '{name}': '{value}'")]
    InvalidAddress { name: String, value: String },

    #[error("Invalid {type_name} literal '{value}'")]
    InvalidNumericLiteral { type_name: String, value: String },

    #[error("Unknown {kind} field '{name}'")]
    UnknownField { kind: FieldKind, name: String },

    /// Type the encoder cannot build from text
    #[error("Unsupported type for '{name}': {type_name}")]
    UnsupportedType { name: String, type_name: String },

    #[error("Cannot encode '{name}': {message}")]
    Encoding { name: String, message: String },

    #[error("No IDL loaded")]
    NoIdlLoaded,

    #[error("No instruction selected")]
    NoInstructionSelected,

    #[error("A submission is already in flight")]
    SubmissionInProgress,

    /// Neither configuration nor the IDL names the target program
    #[error("Program id unknown: set one in configuration or use an IDL with an address")]
    ProgramIdUnknown,

    #[error("Failed to load IDL from {source_name}: {message}")]
    IdlLoad { source_name: String, message: String },

    /// Passed through from the signer untouched
    #[error(transparent)]
    Signer(#[from] SignerError),
}

impl ConsoleError {
    pub fn invalid_idl(reason: impl Into<String>) -> Self {
        ConsoleError::InvalidInterfaceDefinition { reason: reason.into() }
    }

    pub fn invalid_numeric(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        ConsoleError::InvalidNumericLiteral {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    /// Numeric code for scripted callers.
    pub fn error_code(&self) -> u32 {
        match self {
            ConsoleError::InvalidInterfaceDefinition { .. } => 1000,
            ConsoleError::InstructionNotFound { .. } => 1001,
            ConsoleError::MissingArgument { .. } => 1002,
            ConsoleError::MissingAccount { .. } => 1003,
            ConsoleError::InvalidAddress { .. } => 1004,
            ConsoleError::InvalidNumericLiteral { .. } => 1005,
            ConsoleError::UnknownField { .. } => 1006,
            ConsoleError::UnsupportedType { .. } => 1007,
            ConsoleError::Encoding { .. } => 1008,
            ConsoleError::NoIdlLoaded => 1009,
            ConsoleError::NoInstructionSelected => 1010,
            ConsoleError::SubmissionInProgress => 1011,
            ConsoleError::ProgramIdUnknown => 1012,
            ConsoleError::IdlLoad { .. } => 1013,
            ConsoleError::Signer(e) => e.error_code(),
        }
    }
}

/// Errors reported by the signer collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignerError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Signing rejected: {0}")]
    Rejected(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Simulation failed: {0}")]
    Simulation(String),
}

impl SignerError {
    pub fn error_code(&self) -> u32 {
        match self {
            SignerError::NotConnected => 2000,
            SignerError::Rejected(_) => 2001,
            SignerError::InsufficientFunds(_) => 2002,
            SignerError::Network(_) => 2003,
            SignerError::Rpc(_) => 2004,
            SignerError::Simulation(_) => 2005,
        }
    }
}
