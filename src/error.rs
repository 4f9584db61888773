//! error - typed errors of the marker codec and segment layer.
//!
//! Classes:
//! - FormatError     - the bytes do not describe a marker (short buffer, bad type, bad length),
//!                     or a writer was asked to lay out a marker that cannot exist.
//! - CorruptionError - the marker is well-formed but its CRC-32 does not match.
//! - OrderError      - a producer tried to append a marker with a lower tick.
//!
//! MarkerError wraps all three; the recovery layer decides on truncate/abort via
//! is_format()/is_corruption().

use thiserror::Error;

/// Malformed or truncated marker bytes. Fatal to the record, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("marker buffer too short: {len} bytes, need at least {need}")]
    Truncated { len: usize, need: usize },

    #[error("unknown marker type {0}")]
    UnknownType(u8),

    #[error("declared marker length {declared} inconsistent with {available} available bytes (header {header})")]
    LengthMismatch {
        declared: u64,
        available: usize,
        header: usize,
    },

    #[error("payload of {len} bytes too short for {marker}: need {need}")]
    PayloadTooShort {
        marker: &'static str,
        len: usize,
        need: usize,
    },

    #[error("value {value} does not fit into {width} byte(s)")]
    NumberOverflow { value: u64, width: usize },

    #[error("numeric field of {len} byte(s) does not fit 1..={max}")]
    FieldWidth { len: usize, max: usize },

    #[error("destination buffer too small: {len} bytes, need {need}")]
    BufferTooSmall { len: usize, need: usize },

    #[error("marker of {declared} bytes exceeds the {limit} byte limit")]
    TooLarge { declared: u64, limit: u64 },

    #[error("{marker} markers do not use the {layout} payload layout")]
    WrongLayout {
        marker: &'static str,
        layout: &'static str,
    },
}

/// Stored CRC-32 differs from the recomputed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("marker crc mismatch (stored={stored:#010x}, computed={computed:#010x})")]
pub struct CorruptionError {
    pub stored: u32,
    pub computed: u32,
}

/// Violations of the producer-side ordering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("tick regression: {tick} after {previous}")]
    TickRegression { previous: u64, tick: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Corruption(#[from] CorruptionError),

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl MarkerError {
    #[inline]
    pub fn is_format(&self) -> bool {
        matches!(self, MarkerError::Format(_))
    }

    #[inline]
    pub fn is_corruption(&self) -> bool {
        matches!(self, MarkerError::Corruption(_))
    }
}

pub type Result<T, E = MarkerError> = std::result::Result<T, E>;
