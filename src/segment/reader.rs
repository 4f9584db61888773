//! segment/reader - sequential marker iteration over a segment buffer.
//!
//! Yields (offset, Marker) for each well-formed marker. Ends with:
//! - None, end() == Some(SegmentEnd::EndOfBuffer | SegmentEnd::Unwritten) on a clean end;
//! - one Some(Err(..)) on a malformed/corrupt marker, then None, end() == Some(SegmentEnd::Error).
//!
//! Ticks are not checked here (see scan.rs).

use crate::config::MarklogConfig;
use crate::error::{FormatError, MarkerError};
use crate::marker::Marker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEnd {
    /// Consumed the whole buffer.
    EndOfBuffer,
    /// Hit a zero type byte: the rest was never written.
    Unwritten,
    /// Stopped on an error (already yielded).
    Error,
}

pub struct SegmentIter<'a> {
    buf: &'a [u8],
    pos: usize,
    verify_crc: bool,
    max_marker_size: u64,
    end: Option<SegmentEnd>,
}

impl<'a> SegmentIter<'a> {
    pub fn new(buf: &'a [u8], cfg: &MarklogConfig) -> Self {
        SegmentIter {
            buf,
            pos: 0,
            verify_crc: cfg.verify_crc,
            max_marker_size: cfg.max_marker_size,
            end: None,
        }
    }

    /// Offset of the next marker to read (after an error: of the bad marker).
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    #[inline]
    pub fn end(&self) -> Option<SegmentEnd> {
        self.end
    }

    fn read_at(&self, pos: usize) -> Result<Marker<'a>, MarkerError> {
        let buf: &'a [u8] = self.buf;
        let m = Marker::parse(&buf[pos..])?;
        if m.declared_length() > self.max_marker_size {
            return Err(FormatError::TooLarge {
                declared: m.declared_length(),
                limit: self.max_marker_size,
            }
            .into());
        }
        if self.verify_crc {
            m.verify()?;
        }
        Ok(m)
    }
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = Result<(u64, Marker<'a>), MarkerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end.is_some() {
            return None;
        }
        if self.pos >= self.buf.len() {
            self.end = Some(SegmentEnd::EndOfBuffer);
            return None;
        }
        if self.buf[self.pos] == 0 {
            self.end = Some(SegmentEnd::Unwritten);
            return None;
        }

        match self.read_at(self.pos) {
            Ok(m) => {
                let off = self.pos as u64;
                // The last marker of a buffer may end without its padding.
                let next = (self.pos as u64).saturating_add(m.aligned_length());
                self.pos = next.min(self.buf.len() as u64) as usize;
                Some(Ok((off, m)))
            }
            Err(e) => {
                self.end = Some(SegmentEnd::Error);
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{MarkerRecord, MarkerType};
    use crate::segment::SegmentWriter;

    fn two_markers() -> Vec<u8> {
        let mut w = SegmentWriter::new();
        w.append(&MarkerRecord::Meta { marker_type: MarkerType::Header }, 1)
            .unwrap();
        w.append(&MarkerRecord::document(4, 1, b"payload"), 2).unwrap();
        w.into_inner()
    }

    #[test]
    fn iterates_to_end_of_buffer() {
        let buf = two_markers();
        let cfg = MarklogConfig::default();
        let mut it = SegmentIter::new(&buf, &cfg);
        let offs: Vec<u64> = it.by_ref().map(|r| r.unwrap().0).collect();
        assert_eq!(offs, vec![0, 16]);
        assert_eq!(it.end(), Some(SegmentEnd::EndOfBuffer));
    }

    #[test]
    fn zero_tail_is_unwritten() {
        let mut buf = two_markers();
        buf.resize(buf.len() + 128, 0);
        let cfg = MarklogConfig::default();
        let mut it = SegmentIter::new(&buf, &cfg);
        assert_eq!(it.by_ref().count(), 2);
        assert_eq!(it.end(), Some(SegmentEnd::Unwritten));
        assert_eq!(it.position(), 16 + 32);
    }

    #[test]
    fn corruption_yields_one_error_then_stops() {
        let mut buf = two_markers();
        let last = buf.len() - 1;
        buf[last] ^= 0x01; // inside the document value
        let cfg = MarklogConfig::default();
        let mut it = SegmentIter::new(&buf, &cfg);
        assert!(it.next().unwrap().is_ok());
        let err = it.next().unwrap().unwrap_err();
        assert!(err.is_corruption());
        assert!(it.next().is_none());
        assert_eq!(it.end(), Some(SegmentEnd::Error));
        assert_eq!(it.position(), 16);

        // Without CRC checks the marker is accepted.
        let lax = MarklogConfig::default().with_verify_crc(false);
        assert_eq!(SegmentIter::new(&buf, &lax).filter(|r| r.is_ok()).count(), 2);
    }

    #[test]
    fn oversize_marker_rejected() {
        let buf = two_markers();
        let cfg = MarklogConfig::default().with_max_marker_size(20);
        let results: Vec<_> = SegmentIter::new(&buf, &cfg).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(MarkerError::Format(FormatError::TooLarge { declared: 32, limit: 20 }))
        ));
    }
}
