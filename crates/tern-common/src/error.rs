//! Decoding errors for string construction.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for string construction.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors raised while decoding modified UTF-8 into a managed string.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before the requested number of UTF-16 units was decoded,
    /// or in the middle of a multi-byte sequence.
    #[error("modified UTF-8 input truncated at byte {offset}")]
    #[diagnostic(
        code(tern::decode::truncated),
        help("the declared UTF-16 length is larger than the encoded data")
    )]
    Truncated { offset: usize },

    /// A byte that cannot start a sequence (`0x80..=0xBF` or `0xF0..`).
    #[error("invalid lead byte {byte:#04x} at byte {offset}")]
    #[diagnostic(code(tern::decode::lead_byte))]
    InvalidLeadByte { byte: u8, offset: usize },

    /// A byte inside a multi-byte sequence that is not `10xxxxxx`.
    #[error("invalid continuation byte {byte:#04x} at byte {offset}")]
    #[diagnostic(code(tern::decode::continuation))]
    InvalidContinuation { byte: u8, offset: usize },
}
