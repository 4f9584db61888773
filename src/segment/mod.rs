//! segment - a run of markers laid out back to back in one buffer.
//!
//! - writer.rs - SegmentWriter: appends 8-byte aligned markers, enforces non-decreasing ticks.
//! - reader.rs - SegmentIter: walks markers with header/CRC validation.
//! - scan.rs   - scan_segment: recovery pass (stop reason, truncation point, tick report).
//!
//! Segment layout:
//!   [marker][zero pad to 8][marker][zero pad to 8]...[unwritten zeros]
//! A zero type byte at a marker boundary marks the end of written data.

pub mod reader;
pub mod scan;
pub mod writer;

pub use reader::{SegmentEnd, SegmentIter};
pub use scan::{scan_segment, ScanReport, StopReason, TickIssue};
pub use writer::SegmentWriter;
