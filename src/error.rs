use std::io;

use thiserror::Error;

/// Errors raised while packing native records into a base64 payload.
///
/// Every variant is fatal to the write in progress. An empty write is not an
/// error anywhere in this crate.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("empty type descriptor")]
    EmptyDescriptor,

    #[error("type '{0}' is not supported")]
    UnsupportedType(char),

    #[error("repeat count must be greater than zero")]
    ZeroRepeat,

    #[error("repeat count '{0}' is too large")]
    RepeatOverflow(String),

    #[error("type descriptor '{0}' describes a record too large to address")]
    RecordTooLarge(String),

    #[error("unexpected trailing input in type descriptor: '{0}'")]
    TrailingInput(String),

    #[error("type descriptor '{descriptor}' does not fit in a {width}-byte header")]
    HeaderTooLong { descriptor: String, width: usize },

    #[error("'dt' does not match: expected '{expected}', found '{found}'")]
    DescriptorMismatch { expected: String, found: String },

    #[error("{len} bytes is not a whole number of {record_size}-byte records")]
    PartialRecord { len: usize, record_size: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PackError>;
