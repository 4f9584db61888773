use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use marklog::marker::{MarkerRecord, MarkerType};
use marklog::segment::{scan_segment, SegmentWriter, StopReason, TickIssue};
use marklog::{MarkerBody, MarklogConfig};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A small transaction: header, begin, preface, two documents, a deletion, commit.
fn build_segment() -> Result<(Vec<u8>, Vec<u64>)> {
    let mut w = SegmentWriter::new();
    let mut offs = Vec::new();
    offs.push(w.append(&MarkerRecord::Meta { marker_type: MarkerType::Header }, 1)?);
    offs.push(w.append(
        &MarkerRecord::Transaction {
            marker_type: MarkerType::TransactionBegin,
            transaction_id: 500,
        },
        2,
    )?);
    offs.push(w.append(
        &MarkerRecord::Preface {
            database_id: 1,
            collection_id: 77,
        },
        2,
    )?);
    offs.push(w.append(&MarkerRecord::document(500, 1, b"{\"a\":1}"), 3)?);
    offs.push(w.append(&MarkerRecord::document(500, 1, b"{\"b\":2}"), 4)?);
    offs.push(w.append(&MarkerRecord::deletion(500, 1, b"a"), 5)?);
    offs.push(w.append(
        &MarkerRecord::Transaction {
            marker_type: MarkerType::TransactionCommit,
            transaction_id: 500,
        },
        6,
    )?);
    Ok((w.into_inner(), offs))
}

/// Overwrite the tick of the marker at `off` (and restamp its CRC).
fn set_tick(buf: &mut [u8], off: usize, tick: u64) -> Result<()> {
    buf[off + 8..off + 16].copy_from_slice(&tick.to_be_bytes());
    marklog::store_crc(&mut buf[off..])?;
    Ok(())
}

#[test]
fn clean_segment_scans_to_end() -> Result<()> {
    let (buf, offs) = build_segment()?;
    let cfg = MarklogConfig::default();

    let mut seen = Vec::new();
    let report = scan_segment(&buf, &cfg, |off, m| {
        seen.push(off);
        if let MarkerBody::Preface(p) = m.body() {
            assert_eq!(p.collection_id(), 77);
        }
    });

    assert_eq!(seen, offs);
    assert_eq!(report.markers, 7);
    assert_eq!(report.last_tick, Some(6));
    assert_eq!(report.stop, StopReason::EndOfBuffer);
    assert_eq!(report.valid_end, buf.len() as u64);
    assert_eq!(report.per_type.get("document"), Some(&2));
    assert_eq!(report.per_type.get("document-deletion"), Some(&1));
    assert!(report.is_clean());
    Ok(())
}

#[test]
fn preallocated_tail_is_unwritten() -> Result<()> {
    let (mut buf, _) = build_segment()?;
    let used = buf.len() as u64;
    buf.resize(buf.len() + 4096, 0);

    let report = scan_segment(&buf, &MarklogConfig::default(), |_, _| {});
    assert_eq!(report.markers, 7);
    assert_eq!(report.stop, StopReason::Unwritten);
    assert_eq!(report.valid_end, used);
    assert_eq!(report.stop_offset, used);
    Ok(())
}

#[test]
fn corrupt_marker_sets_truncation_point() -> Result<()> {
    let (mut buf, offs) = build_segment()?;
    // flip a value byte of the second document
    let doc2 = offs[4] as usize;
    buf[doc2 + 16 + 9] ^= 0x20;

    let report = scan_segment(&buf, &MarklogConfig::default(), |_, _| {});
    assert_eq!(report.markers, 4);
    assert_eq!(report.valid_end, offs[4]);
    assert_eq!(report.stop_offset, offs[4]);
    assert!(matches!(report.stop, StopReason::Corruption { .. }));
    assert!(!report.is_clean());

    // CRC checks off: the damaged marker passes
    let lax = MarklogConfig::default().with_verify_crc(false);
    assert_eq!(scan_segment(&buf, &lax, |_, _| {}).markers, 7);
    Ok(())
}

#[test]
fn torn_tail_is_format_error() -> Result<()> {
    let (buf, offs) = build_segment()?;
    // cut in the middle of the commit marker
    let cut = &buf[..offs[6] as usize + 10];

    let report = scan_segment(cut, &MarklogConfig::default(), |_, _| {});
    assert_eq!(report.markers, 6);
    assert_eq!(report.valid_end, offs[6]);
    assert!(matches!(report.stop, StopReason::Format { .. }));
    Ok(())
}

#[test]
fn tick_regressions_reported_or_fatal() -> Result<()> {
    let (mut buf, offs) = build_segment()?;
    // second document goes back in time
    set_tick(&mut buf, offs[4] as usize, 1)?;

    let report = scan_segment(&buf, &MarklogConfig::default(), |_, _| {});
    assert_eq!(report.markers, 7);
    assert_eq!(
        report.tick_issues,
        vec![TickIssue {
            offset: offs[4],
            previous: 3,
            tick: 1
        }]
    );
    assert_eq!(report.stop, StopReason::EndOfBuffer);
    assert!(!report.is_clean());

    let strict = MarklogConfig::default().with_strict_ticks(true);
    let report = scan_segment(&buf, &strict, |_, _| {});
    assert_eq!(report.markers, 4);
    assert_eq!(report.valid_end, offs[4]);
    assert_eq!(
        report.stop,
        StopReason::TickRegression {
            previous: 3,
            tick: 1
        }
    );
    Ok(())
}

#[test]
fn report_serializes_to_json() -> Result<()> {
    let (buf, _) = build_segment()?;
    let report = scan_segment(&buf, &MarklogConfig::default(), |_, _| {});
    let v: serde_json::Value = serde_json::to_value(&report)?;
    assert_eq!(v["markers"], 7);
    assert_eq!(v["stop"]["kind"], "end_of_buffer");
    Ok(())
}

#[test]
fn segment_file_roundtrip() -> Result<()> {
    let root = unique_root("segment");
    fs::create_dir_all(&root)?;
    let path = root.join("segment-000001.log");

    let (buf, _) = build_segment()?;
    fs::write(&path, &buf)?;
    let back = fs::read(&path)?;

    let report = scan_segment(&back, &MarklogConfig::default(), |_, _| {});
    assert_eq!(report.markers, 7);
    assert!(report.is_clean());

    let _ = fs::remove_dir_all(&root);
    Ok(())
}

// ---------- helpers ----------

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("marklog-{prefix}-{pid}-{t}-{id}"))
}
