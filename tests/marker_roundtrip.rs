use anyhow::Result;

use marklog::marker::{
    calculate_marker_length, read_number, write_number, DocumentView, PrefaceView,
    StructuralView, TransactionView,
};
use marklog::{store_crc, Marker, MarkerBody, MarkerError, MarkerRecord, MarkerType, TypedView};

/// End-to-end: document body marker, tick 42, tid 7, version 1, value "hi".
#[test]
fn document_marker_end_to_end() -> Result<()> {
    let mut buf = vec![0u8; 64];
    let len = MarkerRecord::document(7, 1, b"hi").write(&mut buf, 42)?;
    assert_eq!(Some(len as u64), calculate_marker_length(MarkerType::Document, 3));

    let m = Marker::parse(&buf)?;
    assert_eq!(m.marker_type(), MarkerType::Document);
    assert_eq!(m.tick(), 42);
    assert_eq!(m.header_length(), 16);
    assert_eq!(m.persisted_crc(), m.recompute_crc());

    let d = DocumentView::from_marker(m).expect("document layout");
    assert_eq!(d.transaction_id(), 7);
    assert_eq!(d.version(), 1);
    assert_eq!(d.value(), b"hi");
    Ok(())
}

/// Every type, several payload sizes: type, tick, fields and payload bytes survive.
#[test]
fn roundtrip_all_types() -> Result<()> {
    let mut rng = oorandom::Rand64::new(0xC0FFEE);
    for t in MarkerType::ALL {
        for value_len in [0usize, 1, 7, 300] {
            let value: Vec<u8> = (0..value_len).map(|_| rng.rand_u64() as u8).collect();
            let tick = rng.rand_u64() >> 1;
            let id_a = rng.rand_u64();
            let id_b = rng.rand_u64();

            let rec = match t.layout() {
                marklog::marker::BodyLayout::Meta => MarkerRecord::Meta { marker_type: t },
                marklog::marker::BodyLayout::Preface => MarkerRecord::Preface {
                    database_id: id_a,
                    collection_id: id_b,
                },
                marklog::marker::BodyLayout::Document => MarkerRecord::Document {
                    marker_type: t,
                    transaction_id: id_a,
                    version: 3,
                    value: &value,
                },
                marklog::marker::BodyLayout::Transaction => MarkerRecord::Transaction {
                    marker_type: t,
                    transaction_id: id_a,
                },
                marklog::marker::BodyLayout::Structural => MarkerRecord::Structural {
                    marker_type: t,
                    version: 2,
                    value: &value,
                },
            };

            let buf = rec.to_vec(tick)?;
            let m = Marker::parse_verified(&buf)?;
            assert_eq!(m.marker_type(), t);
            assert_eq!(m.tick(), tick);
            assert_eq!(m.declared_length(), buf.len() as u64);
            assert!(m.header_length() == 16 || m.header_length() == 24);
            assert_eq!(m.header_length() == 24, buf[0] & 0x80 != 0);

            match m.body() {
                MarkerBody::Meta(inner) => assert!(inner.payload().is_empty()),
                MarkerBody::Preface(p) => {
                    assert_eq!(p.database_id(), id_a);
                    assert_eq!(p.collection_id(), id_b);
                }
                MarkerBody::Document(d) => {
                    assert_eq!(d.transaction_id(), id_a);
                    assert_eq!(d.version(), 3);
                    assert_eq!(d.value(), &value[..]);
                    assert_eq!(d.is_deletion(), t == MarkerType::DocumentDeletion);
                }
                MarkerBody::Transaction(x) => assert_eq!(x.transaction_id(), id_a),
                MarkerBody::Structural(s) => {
                    assert_eq!(s.version(), 2);
                    assert_eq!(s.value(), &value[..]);
                }
            }
        }
    }
    Ok(())
}

/// A marker at the 2^24 boundary switches to the 24-byte header; length lives at
/// offset 16 and the tick at 8 stays intact.
#[test]
fn extended_length_roundtrip_keeps_tick() -> Result<()> {
    let value = vec![0x5Au8; 1 << 24];
    let tick = 0x1122_3344_5566_7788u64;
    let rec = MarkerRecord::Structural {
        marker_type: MarkerType::CollectionProperties,
        version: 1,
        value: &value,
    };
    let buf = rec.to_vec(tick)?;

    let m = Marker::parse_verified(&buf)?;
    assert!(m.is_extended());
    assert_eq!(m.header_length(), 24);
    assert_eq!(buf[0] & 0x80, 0x80);
    assert_eq!(m.declared_length(), 24 + 1 + (1u64 << 24));
    assert_eq!(read_number::<u64>(&buf[16..24])?, m.declared_length());
    assert_eq!(&buf[1..4], &[0, 0, 0]);
    assert_eq!(m.tick(), tick);

    let s = StructuralView::from_marker(m).expect("structural");
    assert_eq!(s.value().len(), 1 << 24);
    assert!(s.value().iter().all(|&b| b == 0x5A));
    Ok(())
}

/// Just below the limit the short header is still used.
#[test]
fn largest_short_header_marker() -> Result<()> {
    // 16 header + 1 version + value = 2^24 - 1
    let value = vec![1u8; (1 << 24) - 18];
    let rec = MarkerRecord::Structural {
        marker_type: MarkerType::IndexCreate,
        version: 1,
        value: &value,
    };
    let buf = rec.to_vec(5)?;
    let m = Marker::parse_verified(&buf)?;
    assert_eq!(m.header_length(), 16);
    assert_eq!(m.declared_length(), (1 << 24) - 1);
    assert_eq!(read_number::<u32>(&buf[1..4])?, (1 << 24) - 1);
    Ok(())
}

/// Random single-bit flips outside the CRC field are always caught.
#[test]
fn random_bit_flips_detected() -> Result<()> {
    let mut rng = oorandom::Rand32::new(7);
    let value: Vec<u8> = (0..200).map(|_| rng.rand_u32() as u8).collect();
    let buf = MarkerRecord::deletion(99, 1, &value).to_vec(1000)?;

    for _ in 0..2000 {
        let byte = rng.rand_range(0..buf.len() as u32) as usize;
        if (4..8).contains(&byte) {
            continue;
        }
        let bit = rng.rand_range(0..8);
        let mut bad = buf.clone();
        bad[byte] ^= 1 << bit;
        match Marker::parse_verified(&bad) {
            Err(MarkerError::Corruption(c)) => assert_ne!(c.stored, c.computed),
            Err(MarkerError::Format(_)) => {} // header no longer readable
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("flip at byte {} bit {} not detected", byte, bit),
        }
    }
    Ok(())
}

/// store_crc (whole buffer, zeroed field) and recompute_crc (hash around the field)
/// agree, whatever the field held before.
#[test]
fn store_and_recompute_agree() -> Result<()> {
    let mut buf = MarkerRecord::Preface {
        database_id: 1,
        collection_id: 2,
    }
    .to_vec(3)?;
    let before = Marker::parse(&buf)?.persisted_crc();

    write_number(&mut buf[4..8], 0xFFFF_FFFFu32, 4)?;
    assert!(!Marker::parse(&buf)?.is_valid());
    assert_eq!(Marker::parse(&buf)?.recompute_crc(), before);

    let stored = store_crc(&mut buf)?;
    assert_eq!(stored, before);
    let m = Marker::parse(&buf)?;
    assert_eq!(m.recompute_crc(), stored);
    assert!(PrefaceView::from_marker(m).is_some());
    assert!(TransactionView::from_marker(m).is_none());
    Ok(())
}
