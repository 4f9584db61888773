//! segment/writer - building a segment in memory.

use log::debug;

use crate::error::{MarkerError, OrderError};
use crate::marker::{aligned_length, MarkerRecord};

#[derive(Debug, Default)]
pub struct SegmentWriter {
    buf: Vec<u8>,
    last_tick: Option<u64>,
    markers: u64,
}

impl SegmentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        SegmentWriter {
            buf: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Append `record` stamped with `tick`. Returns the marker's offset.
    ///
    /// Ticks must not decrease; a lower tick is refused with OrderError and the
    /// segment stays unchanged (same on encode errors).
    pub fn append(&mut self, record: &MarkerRecord<'_>, tick: u64) -> Result<u64, MarkerError> {
        if let Some(previous) = self.last_tick {
            if tick < previous {
                return Err(OrderError::TickRegression { previous, tick }.into());
            }
        }

        let off = self.buf.len();
        let len = record.encoded_len();
        let padded = aligned_length(len) as usize;
        self.buf.resize(off + padded, 0);

        if let Err(e) = record.write(&mut self.buf[off..], tick) {
            self.buf.truncate(off);
            return Err(e.into());
        }

        debug!(
            "segment append: off={} type={} tick={} len={} (padded {})",
            off,
            record.marker_type(),
            tick,
            len,
            padded
        );
        self.last_tick = Some(tick);
        self.markers += 1;
        Ok(off as u64)
    }

    #[inline]
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    #[inline]
    pub fn marker_count(&self) -> u64 {
        self.markers
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
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{Marker, MarkerType};

    #[test]
    fn offsets_are_aligned() {
        let mut w = SegmentWriter::new();
        let a = w.append(&MarkerRecord::document(1, 1, b"abc"), 1).unwrap();
        let b = w
            .append(
                &MarkerRecord::Transaction {
                    marker_type: MarkerType::TransactionCommit,
                    transaction_id: 1,
                },
                2,
            )
            .unwrap();
        assert_eq!(a, 0);
        // 16 + 8 + 1 + 3 = 28 -> 32
        assert_eq!(b, 32);
        assert_eq!(w.len(), 32 + 24);
        assert_eq!(&w.as_bytes()[28..32], &[0, 0, 0, 0]);
        assert_eq!(Marker::parse_verified(&w.as_bytes()[32..]).unwrap().tick(), 2);
    }

    #[test]
    fn tick_regression_refused() {
        let mut w = SegmentWriter::new();
        let meta = MarkerRecord::Meta { marker_type: MarkerType::Header };
        w.append(&meta, 10).unwrap();
        w.append(&meta, 10).unwrap();
        let before = w.len();
        let err = w.append(&meta, 9).unwrap_err();
        assert_eq!(
            err,
            MarkerError::Order(OrderError::TickRegression { previous: 10, tick: 9 })
        );
        assert_eq!(w.len(), before);
        assert_eq!(w.marker_count(), 2);
        assert_eq!(w.last_tick(), Some(10));
    }

    #[test]
    fn failed_encode_leaves_segment_unchanged() {
        let mut w = SegmentWriter::new();
        let bad = MarkerRecord::Meta { marker_type: MarkerType::Document };
        assert!(w.append(&bad, 1).unwrap_err().is_format());
        assert!(w.is_empty());
        assert_eq!(w.last_tick(), None);
    }
}
