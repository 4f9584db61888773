//! marker/header - on-disk header layout and size calculators.
//!
//! Layout (big-endian):
//!   [0]       type (low 7 bits) | EXTENDED_FLAG (high bit)
//!   [1..4)    length u24        (short form; zero in extended form)
//!   [4..8)    crc32 u32         (CRC-32 over the marker with this field zeroed)
//!   [8..16)   tick u64
//!   [16..24)  length u64        (extended form only)
//! Payload starts right after the header (16 or 24).

use super::types::MarkerType;

pub const HEADER_SIZE: usize = 16;
pub const EXTENDED_HEADER_SIZE: usize = 24;

/// Smallest valid marker: a bare short header.
pub const MIN_MARKER_SIZE: usize = HEADER_SIZE;

pub const EXTENDED_FLAG: u8 = 0x80;
pub const TYPE_MASK: u8 = 0x7F;

pub const OFF_TYPE: usize = 0;
pub const OFF_LENGTH: usize = 1;
pub const LENGTH_WIDTH: usize = 3;
pub const OFF_CRC: usize = 4;
pub const CRC_WIDTH: usize = 4;
pub const OFF_TICK: usize = 8;
pub const TICK_WIDTH: usize = 8;
pub const OFF_EXT_LENGTH: usize = 16;
pub const EXT_LENGTH_WIDTH: usize = 8;

/// Total lengths at or above this need the extended form.
pub const EMBEDDED_LENGTH_LIMIT: u64 = 1 << 24;

/// Markers inside a segment start on this boundary.
pub const MARKER_ALIGNMENT: u64 = 8;

/// Header size for a marker whose body (everything after the header) is `body_len` bytes.
#[inline]
pub fn calculate_header_length(body_len: u64) -> usize {
    if body_len.saturating_add(HEADER_SIZE as u64) < EMBEDDED_LENGTH_LIMIT {
        HEADER_SIZE
    } else {
        EXTENDED_HEADER_SIZE
    }
}

/// Total marker length for `marker_type` carrying `payload_len` opaque bytes
/// after its fixed fields. None when the total does not fit a u64.
#[inline]
pub fn calculate_marker_length(marker_type: MarkerType, payload_len: u64) -> Option<u64> {
    let body = (marker_type.static_length() as u64).checked_add(payload_len)?;
    (calculate_header_length(body) as u64).checked_add(body)
}

/// Round up to the next marker boundary.
#[inline]
pub fn aligned_length(len: u64) -> u64 {
    (len + (MARKER_ALIGNMENT - 1)) & !(MARKER_ALIGNMENT - 1)
}
