//! marker/view - read-only view over one marker in a caller-owned buffer.
//!
//! parse() checks the header (size, type, declared length, minimal payload for the
//! type) but not the CRC: verify()/parse_verified() do that. A parsed Marker borrows
//! exactly `declared_length` bytes, never copies and never allocates.

use crate::error::{CorruptionError, FormatError, MarkerError};
use crate::hash::{crc32_block, crc32_finalize, crc32_initial, IEEE_TABLE};

use super::header::{
    aligned_length, CRC_WIDTH, EXTENDED_FLAG, EXTENDED_HEADER_SIZE, EXT_LENGTH_WIDTH, HEADER_SIZE,
    LENGTH_WIDTH, MIN_MARKER_SIZE, OFF_CRC, OFF_EXT_LENGTH, OFF_LENGTH, OFF_TICK, OFF_TYPE,
    TICK_WIDTH, TYPE_MASK,
};
use super::number::{read_field, write_number};
use super::types::MarkerType;

#[derive(Debug, Clone, Copy)]
pub struct Marker<'a> {
    bytes: &'a [u8],
    marker_type: MarkerType,
    header_len: usize,
}

/// Header size and declared length of the marker at the start of `buf`.
/// Checks that the header fits and the declared length fits into `buf`.
pub(crate) fn read_length_fields(buf: &[u8]) -> Result<(usize, usize), FormatError> {
    if buf.len() < MIN_MARKER_SIZE {
        return Err(FormatError::Truncated {
            len: buf.len(),
            need: MIN_MARKER_SIZE,
        });
    }
    let extended = buf[OFF_TYPE] & EXTENDED_FLAG != 0;
    let header_len = if extended {
        EXTENDED_HEADER_SIZE
    } else {
        HEADER_SIZE
    };
    if buf.len() < header_len {
        return Err(FormatError::Truncated {
            len: buf.len(),
            need: header_len,
        });
    }
    let declared: u64 = if extended {
        read_field(&buf[OFF_EXT_LENGTH..OFF_EXT_LENGTH + EXT_LENGTH_WIDTH])
    } else {
        read_field(&buf[OFF_LENGTH..OFF_LENGTH + LENGTH_WIDTH])
    };
    if declared < header_len as u64 || declared > buf.len() as u64 {
        return Err(FormatError::LengthMismatch {
            declared,
            available: buf.len(),
            header: header_len,
        });
    }
    Ok((header_len, declared as usize))
}

impl<'a> Marker<'a> {
    /// Parse the marker at the start of `buffer`. Trailing bytes past the declared
    /// length (padding, following markers) are ignored.
    pub fn parse(buffer: &'a [u8]) -> Result<Self, FormatError> {
        let (header_len, declared) = read_length_fields(buffer)?;
        let marker_type = MarkerType::from_code(buffer[OFF_TYPE] & TYPE_MASK)?;

        let payload_len = declared - header_len;
        let need = marker_type.min_payload_length();
        if payload_len < need {
            return Err(FormatError::PayloadTooShort {
                marker: marker_type.name(),
                len: payload_len,
                need,
            });
        }

        Ok(Marker {
            bytes: &buffer[..declared],
            marker_type,
            header_len,
        })
    }

    /// parse() followed by the CRC check.
    pub fn parse_verified(buffer: &'a [u8]) -> Result<Self, MarkerError> {
        let m = Marker::parse(buffer)?;
        m.verify()?;
        Ok(m)
    }

    #[inline]
    pub fn marker_type(&self) -> MarkerType {
        self.marker_type
    }

    /// 16 or 24.
    #[inline]
    pub fn header_length(&self) -> usize {
        self.header_len
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.header_len == EXTENDED_HEADER_SIZE
    }

    #[inline]
    pub fn declared_length(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Declared length rounded up to the segment alignment.
    #[inline]
    pub fn aligned_length(&self) -> u64 {
        aligned_length(self.declared_length())
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        read_field(&self.bytes[OFF_TICK..OFF_TICK + TICK_WIDTH])
    }

    #[inline]
    pub fn persisted_crc(&self) -> u32 {
        read_field(&self.bytes[OFF_CRC..OFF_CRC + CRC_WIDTH])
    }

    /// CRC-32 of the marker with its CRC field taken as zero. Hashes around the
    /// field instead of copying the buffer.
    pub fn recompute_crc(&self) -> u32 {
        let mut v = crc32_initial();
        v = crc32_block(&IEEE_TABLE, v, &self.bytes[..OFF_CRC]);
        v = crc32_block(&IEEE_TABLE, v, &[0u8; CRC_WIDTH]);
        v = crc32_block(&IEEE_TABLE, v, &self.bytes[OFF_CRC + CRC_WIDTH..]);
        crc32_finalize(v)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.persisted_crc() == self.recompute_crc()
    }

    pub fn verify(&self) -> Result<(), CorruptionError> {
        let stored = self.persisted_crc();
        let computed = self.recompute_crc();
        if stored != computed {
            return Err(CorruptionError { stored, computed });
        }
        Ok(())
    }

    #[inline]
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[self.header_len..]
    }

    /// The whole marker (header + payload).
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Zero the CRC field, CRC the whole marker and store the result. Returns the CRC.
///
/// Only the first `declared_length` bytes of `buffer` are covered.
pub fn store_crc(buffer: &mut [u8]) -> Result<u32, FormatError> {
    let (_, declared) = read_length_fields(buffer)?;
    let marker = &mut buffer[..declared];
    marker[OFF_CRC..OFF_CRC + CRC_WIDTH].fill(0);
    let crc = crc32_finalize(crc32_block(&IEEE_TABLE, crc32_initial(), marker));
    write_number(&mut marker[OFF_CRC..], crc, CRC_WIDTH)?;
    Ok(crc)
}
