//! Error types for the suitetalk client.
//!
//! This module provides a unified error type with explicit variants for
//! configuration, transport, remote status, protocol and input validation
//! failures. Callers branch on the variant; none of them is retried
//! internally.

use thiserror::Error;

use crate::status::{StatusDetail, StatusFailure};

/// The unified error type for suitetalk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration. Fatal at client construction.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network or RPC-layer failure, propagated as the transport reported it.
    #[error("transport fault: {0}")]
    Transport(#[from] TransportError),

    /// The remote service answered with `isSuccess = false`.
    #[error(transparent)]
    Status(#[from] StatusFailure),

    /// A response violated the paging or response contract.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (malformed record, bad URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A search session was used again after it failed.
    #[error("search session has failed and cannot be resumed")]
    SessionFailed,
}

impl Error {
    /// Returns the remote status failure, if this error carries one.
    pub fn status_failure(&self) -> Option<&StatusFailure> {
        match self {
            Error::Status(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns the first status detail with the given code.
    ///
    /// Always `None` for errors that did not come from a remote status.
    pub fn contains_code(&self, code: &str) -> Option<&StatusDetail> {
        self.status_failure()?.contains_code(code)
    }

    /// Check if this error is a transport fault.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required key is absent or empty.
    #[error("config key missing: {key}")]
    Missing { key: &'static str },

    /// A key is present but its value cannot be used.
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Transport-level errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Non-success HTTP status without a fault body.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The remote endpoint raised an RPC fault.
    #[error("remote fault [{code}]: {message}")]
    Fault { code: String, message: String },

    /// The response body could not be decoded.
    #[error("undecodable response: {message}")]
    Decode { message: String },
}

/// Violations of the response contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A successful search response carried no search id.
    #[error("search response is missing its searchId")]
    MissingSearchId,

    /// A follow-up page belongs to a different search.
    #[error("searchId mismatch: expected {expected}, received {actual}")]
    SearchIdMismatch { expected: String, actual: String },

    /// The remote returned a page other than the one requested.
    #[error("page index mismatch: requested {requested}, received {received}")]
    PageIndexMismatch { requested: u32, received: u32 },

    /// Totals changed between pages of one search.
    #[error("{field} changed between pages: was {expected}, now {actual}")]
    CursorDrift {
        field: &'static str,
        expected: u64,
        actual: u64,
    },

    /// The response body does not match the operation's schema.
    #[error("malformed {operation} response: {reason}")]
    MalformedResponse { operation: String, reason: String },
}

/// Input validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    /// Invalid record payload.
    #[error("invalid record: {reason}")]
    Record { reason: String },

    /// Invalid service URL.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
