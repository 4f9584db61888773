use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use marklog::{Marker, MarkerBody, MarklogConfig, SegmentIter};

#[derive(Serialize)]
struct DumpEntry {
    offset: u64,
    #[serde(rename = "type")]
    marker_type: String,
    tick: u64,
    length: u64,
    header: usize,
    crc: String,
    crc_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    collection_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value_len: Option<usize>,
}

fn entry(offset: u64, m: &Marker<'_>) -> DumpEntry {
    let mut e = DumpEntry {
        offset,
        marker_type: m.marker_type().to_string(),
        tick: m.tick(),
        length: m.declared_length(),
        header: m.header_length(),
        crc: format!("{:08x}", m.persisted_crc()),
        crc_ok: m.is_valid(),
        database_id: None,
        collection_id: None,
        transaction_id: None,
        version: None,
        value_len: None,
    };
    match m.body() {
        MarkerBody::Meta(_) => {}
        MarkerBody::Preface(p) => {
            e.database_id = Some(p.database_id());
            e.collection_id = Some(p.collection_id());
        }
        MarkerBody::Document(d) => {
            e.transaction_id = Some(d.transaction_id());
            e.version = Some(d.version());
            e.value_len = Some(d.value().len());
        }
        MarkerBody::Transaction(t) => {
            e.transaction_id = Some(t.transaction_id());
        }
        MarkerBody::Structural(s) => {
            e.version = Some(s.version());
            e.value_len = Some(s.value().len());
        }
    }
    e
}

pub fn exec(path: PathBuf, limit: Option<usize>, json: bool) -> Result<()> {
    // Dump shows CRC status per marker instead of stopping on the first mismatch.
    let cfg = MarklogConfig::from_env().with_verify_crc(false);
    let bytes = std::fs::read(&path).with_context(|| format!("read segment {}", path.display()))?;

    let mut out = Vec::new();
    for item in SegmentIter::new(&bytes, &cfg).take(limit.unwrap_or(usize::MAX)) {
        match item {
            Ok((off, m)) => out.push(entry(off, &m)),
            Err(e) => {
                eprintln!("stop: {}", e);
                break;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&out).context("serialize dump")?);
        return Ok(());
    }

    for e in &out {
        let mut line = format!(
            "{:>10}  {:<22} tick={} len={} hdr={} crc={}{}",
            e.offset,
            e.marker_type,
            e.tick,
            e.length,
            e.header,
            e.crc,
            if e.crc_ok { "" } else { " (MISMATCH)" }
        );
        if let (Some(db), Some(cid)) = (e.database_id, e.collection_id) {
            line.push_str(&format!(" db={} cid={}", db, cid));
        }
        if let Some(tid) = e.transaction_id {
            line.push_str(&format!(" tid={}", tid));
        }
        if let Some(v) = e.version {
            line.push_str(&format!(" v={}", v));
        }
        if let Some(n) = e.value_len {
            line.push_str(&format!(" value={}B", n));
        }
        println!("{}", line);
    }
    println!("{} marker(s)", out.len());
    Ok(())
}
