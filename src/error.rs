use thiserror::Error;

/// Errors reported by bit cursors and their file-backed conveniences.
#[derive(Error, Debug)]
pub enum BitError {
    /// An error propagated from the underlying byte stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The access mode string could not be parsed or grants no capability.
    #[error("invalid access mode: {0}")]
    InvalidMode(String),

    /// A read was attempted on a cursor without the read capability.
    #[error("cursor is not readable")]
    NotReadable,

    /// A write was attempted on a cursor without the write capability.
    #[error("cursor is not writable")]
    NotWritable,

    /// A position snapshot with an out-of-range component was rejected.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// The cursor is in the sticky fault state (a seek underflowed the
    /// start of the medium) and must be cleared before further use.
    #[error("cursor fault: position underflowed the start of the stream")]
    CursorFault,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BitError>;
