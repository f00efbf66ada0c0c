//! Error types for the ETF codec.

/// Errors raised while packing a term into ETF bytes.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("integer magnitude of {magnitude_bytes} bytes exceeds the 8-byte big-integer limit")]
    IntegerOutOfRange { magnitude_bytes: usize },

    #[error("atom of {len} bytes exceeds the 65535-byte limit")]
    AtomTooLarge { len: usize },

    #[error("string of {len} bytes exceeds the 65535-byte limit")]
    StringTooLarge { len: usize },

    #[error("binary of {len} bytes exceeds the 2147483647-byte limit")]
    BinaryTooLarge { len: usize },

    #[error("container of {len} elements exceeds the 4294967295-element limit")]
    TooManyElements { len: usize },

    #[error("text cannot be encoded as {encoding}")]
    TextEncodeFailed { encoding: &'static str },
}

/// Errors raised while unpacking ETF bytes into a term.
///
/// Offsets point at the byte where the defect was observed, counted from
/// the start of the active input (the inflated payload, inside a
/// compressed envelope).
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("bad version byte 0x{byte:02X}, expected 0x83")]
    BadVersion { byte: u8 },

    #[error("unknown tag 0x{tag:02X} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("input ended at offset {offset}, {needed} more bytes needed")]
    UnexpectedEnd { offset: usize, needed: usize },

    #[error("big integer of {len} magnitude bytes at offset {offset} exceeds the 8-byte limit")]
    BigIntegerTooLarge { len: usize, offset: usize },

    #[error("bad big-integer sign byte 0x{sign:02X} at offset {offset}")]
    MalformedBigInt { sign: u8, offset: usize },

    #[error("unparsable float literal at offset {offset}")]
    MalformedFloat { offset: usize },

    #[error("list at offset {offset} is not terminated by a nil tail")]
    MissingListTail { offset: usize },

    #[error("bad compressed payload: {reason}")]
    BadCompressedPayload { reason: String },

    #[error("bytes at offset {offset} are not valid {encoding}")]
    TextDecodeFailed { encoding: &'static str, offset: usize },

    #[error("term nesting exceeds {limit} levels")]
    DepthExceeded { limit: usize },
}
