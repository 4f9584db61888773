//! marker/writer - building markers in caller-owned buffers.
//!
//! Two levels:
//! - MarkerWriter: stamps type/length/tick, hands out the payload for filling,
//!   finish() stores the CRC.
//! - MarkerRecord: typed description of one marker (document, transaction, ...),
//!   writes itself through a MarkerWriter.
//!
//! Tick order is the producer's responsibility (see segment::SegmentWriter);
//! nothing here compares ticks.

use crate::error::FormatError;

use super::body::{
    DOCUMENT_OFF_TRANSACTION_ID, DOCUMENT_OFF_VALUE, DOCUMENT_OFF_VERSION,
    PREFACE_OFF_COLLECTION_ID, PREFACE_OFF_DATABASE_ID, STRUCTURAL_OFF_VALUE,
    STRUCTURAL_OFF_VERSION, TRANSACTION_OFF_TRANSACTION_ID,
};
use super::header::{
    calculate_header_length, EXTENDED_FLAG, EXTENDED_HEADER_SIZE, EXT_LENGTH_WIDTH, LENGTH_WIDTH,
    OFF_EXT_LENGTH, OFF_LENGTH, OFF_TICK, OFF_TYPE, TICK_WIDTH,
};
use super::number::write_number;
use super::types::{BodyLayout, MarkerType};
use super::view::store_crc;

pub struct MarkerWriter<'a> {
    buf: &'a mut [u8],
    header_len: usize,
}

impl<'a> MarkerWriter<'a> {
    /// Stamp the header of a `marker_type` marker with `payload_len` payload bytes
    /// (fixed fields included) at the start of `buffer`. The CRC field is zero until finish().
    pub fn new(
        buffer: &'a mut [u8],
        marker_type: MarkerType,
        tick: u64,
        payload_len: u64,
    ) -> Result<Self, FormatError> {
        let need = marker_type.min_payload_length();
        if payload_len < need as u64 {
            return Err(FormatError::PayloadTooShort {
                marker: marker_type.name(),
                len: payload_len as usize,
                need,
            });
        }

        let header_len = calculate_header_length(payload_len);
        let total = header_len as u64 + payload_len;
        if total > buffer.len() as u64 {
            return Err(FormatError::BufferTooSmall {
                len: buffer.len(),
                need: usize::try_from(total).unwrap_or(usize::MAX),
            });
        }
        let buf = &mut buffer[..total as usize];
        buf[..header_len].fill(0);

        if header_len == EXTENDED_HEADER_SIZE {
            buf[OFF_TYPE] = marker_type.code() | EXTENDED_FLAG;
            write_number(&mut buf[OFF_EXT_LENGTH..], total, EXT_LENGTH_WIDTH)?;
        } else {
            buf[OFF_TYPE] = marker_type.code();
            write_number(&mut buf[OFF_LENGTH..], total, LENGTH_WIDTH)?;
        }
        write_number(&mut buf[OFF_TICK..], tick, TICK_WIDTH)?;

        Ok(MarkerWriter { buf, header_len })
    }

    #[inline]
    pub fn header_length(&self) -> usize {
        self.header_len
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.header_len..]
    }

    /// Big-endian u64 at payload offset `off`.
    pub fn put_u64(&mut self, off: usize, value: u64) -> Result<(), FormatError> {
        let p = self.payload_mut();
        let end = off.saturating_add(8);
        if end > p.len() {
            return Err(FormatError::BufferTooSmall { len: p.len(), need: end });
        }
        write_number(&mut p[off..end], value, 8)
    }

    pub fn put_u8(&mut self, off: usize, value: u8) -> Result<(), FormatError> {
        let p = self.payload_mut();
        if off >= p.len() {
            return Err(FormatError::BufferTooSmall { len: p.len(), need: off + 1 });
        }
        p[off] = value;
        Ok(())
    }

    pub fn put_bytes(&mut self, off: usize, bytes: &[u8]) -> Result<(), FormatError> {
        let p = self.payload_mut();
        let end = off.saturating_add(bytes.len());
        if end > p.len() {
            return Err(FormatError::BufferTooSmall { len: p.len(), need: end });
        }
        p[off..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Store the CRC. Returns the marker's total length.
    pub fn finish(self) -> Result<usize, FormatError> {
        store_crc(self.buf)?;
        Ok(self.buf.len())
    }
}

/// Typed description of one marker. Values are borrowed; the record is written
/// straight into the destination buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRecord<'v> {
    Meta {
        marker_type: MarkerType,
    },
    Preface {
        database_id: u64,
        collection_id: u64,
    },
    Document {
        marker_type: MarkerType,
        transaction_id: u64,
        version: u8,
        value: &'v [u8],
    },
    Transaction {
        marker_type: MarkerType,
        transaction_id: u64,
    },
    Structural {
        marker_type: MarkerType,
        version: u8,
        value: &'v [u8],
    },
}

fn layout_name(layout: BodyLayout) -> &'static str {
    match layout {
        BodyLayout::Meta => "meta",
        BodyLayout::Preface => "preface",
        BodyLayout::Document => "document",
        BodyLayout::Transaction => "transaction",
        BodyLayout::Structural => "structural",
    }
}

impl<'v> MarkerRecord<'v> {
    pub fn document(transaction_id: u64, version: u8, value: &'v [u8]) -> Self {
        MarkerRecord::Document {
            marker_type: MarkerType::Document,
            transaction_id,
            version,
            value,
        }
    }

    pub fn deletion(transaction_id: u64, version: u8, key: &'v [u8]) -> Self {
        MarkerRecord::Document {
            marker_type: MarkerType::DocumentDeletion,
            transaction_id,
            version,
            value: key,
        }
    }

    pub fn marker_type(&self) -> MarkerType {
        match *self {
            MarkerRecord::Meta { marker_type }
            | MarkerRecord::Document { marker_type, .. }
            | MarkerRecord::Transaction { marker_type, .. }
            | MarkerRecord::Structural { marker_type, .. } => marker_type,
            MarkerRecord::Preface { .. } => MarkerType::DocumentPreface,
        }
    }

    fn layout(&self) -> BodyLayout {
        match self {
            MarkerRecord::Meta { .. } => BodyLayout::Meta,
            MarkerRecord::Preface { .. } => BodyLayout::Preface,
            MarkerRecord::Document { .. } => BodyLayout::Document,
            MarkerRecord::Transaction { .. } => BodyLayout::Transaction,
            MarkerRecord::Structural { .. } => BodyLayout::Structural,
        }
    }

    /// Payload bytes, fixed fields included.
    pub fn payload_len(&self) -> u64 {
        match self {
            MarkerRecord::Meta { .. } => 0,
            MarkerRecord::Preface { .. } => 16,
            MarkerRecord::Document { value, .. } => DOCUMENT_OFF_VALUE as u64 + value.len() as u64,
            MarkerRecord::Transaction { .. } => 8,
            MarkerRecord::Structural { value, .. } => {
                STRUCTURAL_OFF_VALUE as u64 + value.len() as u64
            }
        }
    }

    /// Total encoded size (header + payload), unaligned.
    pub fn encoded_len(&self) -> u64 {
        let payload = self.payload_len();
        calculate_header_length(payload) as u64 + payload
    }

    /// Write the record at the start of `buffer` and stamp its CRC.
    /// Returns the marker's total length.
    pub fn write(&self, buffer: &mut [u8], tick: u64) -> Result<usize, FormatError> {
        let marker_type = self.marker_type();
        if marker_type.layout() != self.layout() {
            return Err(FormatError::WrongLayout {
                marker: marker_type.name(),
                layout: layout_name(self.layout()),
            });
        }

        let mut w = MarkerWriter::new(buffer, marker_type, tick, self.payload_len())?;
        match *self {
            MarkerRecord::Meta { .. } => {}
            MarkerRecord::Preface {
                database_id,
                collection_id,
            } => {
                w.put_u64(PREFACE_OFF_DATABASE_ID, database_id)?;
                w.put_u64(PREFACE_OFF_COLLECTION_ID, collection_id)?;
            }
            MarkerRecord::Document {
                transaction_id,
                version,
                value,
                ..
            } => {
                w.put_u64(DOCUMENT_OFF_TRANSACTION_ID, transaction_id)?;
                w.put_u8(DOCUMENT_OFF_VERSION, version)?;
                w.put_bytes(DOCUMENT_OFF_VALUE, value)?;
            }
            MarkerRecord::Transaction { transaction_id, .. } => {
                w.put_u64(TRANSACTION_OFF_TRANSACTION_ID, transaction_id)?;
            }
            MarkerRecord::Structural { version, value, .. } => {
                w.put_u8(STRUCTURAL_OFF_VERSION, version)?;
                w.put_bytes(STRUCTURAL_OFF_VALUE, value)?;
            }
        }
        w.finish()
    }

    /// Encode into a fresh buffer of exactly encoded_len() bytes.
    pub fn to_vec(&self, tick: u64) -> Result<Vec<u8>, FormatError> {
        let len = usize::try_from(self.encoded_len()).map_err(|_| FormatError::NumberOverflow {
            value: self.encoded_len(),
            width: std::mem::size_of::<usize>(),
        })?;
        let mut buf = vec![0u8; len];
        self.write(&mut buf, tick)?;
        Ok(buf)
    }
}
