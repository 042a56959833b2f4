//! Stream errors

use thiserror::Error;

/// Errors that can end a record stream
///
/// Framing itself never fails; the only failure is the byte source going away.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
