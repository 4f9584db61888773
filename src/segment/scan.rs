//! segment/scan - recovery pass over a segment.
//!
//! Walks the segment with SegmentIter and reports:
//! - how many markers of each type were accepted and the last tick;
//! - where and why the walk stopped;
//! - valid_end: offset right after the last accepted marker (aligned), i.e. where a
//!   recovering writer would truncate;
//! - tick regressions (a tick lower than its predecessor). Reported only, unless
//!   cfg.strict_ticks, where the first one stops the scan before the offending marker.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use crate::config::MarklogConfig;
use crate::error::MarkerError;
use crate::marker::Marker;

use super::reader::{SegmentEnd, SegmentIter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    EndOfBuffer,
    Unwritten,
    Format { error: String },
    Corruption { stored: u32, computed: u32 },
    TickRegression { previous: u64, tick: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickIssue {
    pub offset: u64,
    pub previous: u64,
    pub tick: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub markers: u64,
    pub per_type: BTreeMap<String, u64>,
    pub last_tick: Option<u64>,
    pub valid_end: u64,
    pub stop_offset: u64,
    pub stop: StopReason,
    pub tick_issues: Vec<TickIssue>,
}

impl ScanReport {
    /// True when the walk ended without hitting bad data.
    pub fn is_clean(&self) -> bool {
        matches!(self.stop, StopReason::EndOfBuffer | StopReason::Unwritten)
            && self.tick_issues.is_empty()
    }
}

/// Scan `buf`, calling `visit(offset, marker)` for each accepted marker.
pub fn scan_segment<F>(buf: &[u8], cfg: &MarklogConfig, mut visit: F) -> ScanReport
where
    F: FnMut(u64, &Marker<'_>),
{
    let mut it = SegmentIter::new(buf, cfg);
    let mut markers = 0u64;
    let mut per_type: BTreeMap<String, u64> = BTreeMap::new();
    let mut last_tick: Option<u64> = None;
    let mut valid_end = 0u64;
    let mut tick_issues = Vec::new();
    let mut stop: Option<(u64, StopReason)> = None;

    while let Some(item) = it.next() {
        let (off, m) = match item {
            Ok(x) => x,
            Err(e) => {
                let reason = match &e {
                    MarkerError::Corruption(c) => StopReason::Corruption {
                        stored: c.stored,
                        computed: c.computed,
                    },
                    other => StopReason::Format {
                        error: other.to_string(),
                    },
                };
                warn!("segment scan: stop at off={}: {}", it.position(), e);
                stop = Some((it.position(), reason));
                break;
            }
        };

        let tick = m.tick();
        if let Some(previous) = last_tick {
            if tick < previous {
                warn!(
                    "segment scan: tick regression at off={} ({} after {})",
                    off, tick, previous
                );
                tick_issues.push(TickIssue {
                    offset: off,
                    previous,
                    tick,
                });
                if cfg.strict_ticks {
                    stop = Some((off, StopReason::TickRegression { previous, tick }));
                    break;
                }
            }
        }

        visit(off, &m);
        markers += 1;
        *per_type.entry(m.marker_type().name().to_string()).or_insert(0) += 1;
        last_tick = Some(last_tick.map_or(tick, |t| t.max(tick)));
        valid_end = it.position();
    }

    let (stop_offset, stop) = match stop {
        Some(s) => s,
        None => {
            let reason = match it.end() {
                Some(SegmentEnd::Unwritten) => StopReason::Unwritten,
                _ => StopReason::EndOfBuffer,
            };
            (it.position(), reason)
        }
    };

    debug!(
        "segment scan: {} marker(s), valid_end={}, stop={:?} at {}",
        markers, valid_end, stop, stop_offset
    );

    ScanReport {
        markers,
        per_type,
        last_tick,
        valid_end,
        stop_offset,
        stop,
        tick_issues,
    }
}
