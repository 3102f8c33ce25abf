//! # Client-Side Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where Client Errors End Up                           │
//! │                                                                         │
//! │  ClientError ──► Action::RequestFailed ──► 3s notification             │
//! │  ScanError ────► Scanner::error (shown inline, scanning stops)         │
//! │  ExportError ──► returned to the caller of export::write_csv           │
//! │  CartError ────► returned to the POS screen                            │
//! │                                                                         │
//! │  Nothing here retries.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Failure talking to the item API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure, timeout, or an undecodable body.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    ///
    /// `message` is the server's `error` text when the body carried one.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
}

impl ClientError {
    /// True when the server answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Failure writing a CSV export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Camera or decoder failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The frame held no readable code. Scanning continues.
    #[error("No barcode in frame")]
    NoCode,

    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    /// The frame stream ended before a code was read.
    #[error("Camera stream ended")]
    StreamEnded,
}

impl ScanError {
    /// Transient errors are skipped while scanning.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScanError::NoCode)
    }
}

/// POS cart operation on an item that is not in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Item {0} is not in the cart")]
    NotInCart(i64),
}
