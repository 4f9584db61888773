// Hashing/checksum primitives
pub mod hash;   // src/hash/{mod,fnv,crc32}.rs

// Marker codec (header, CRC, typed views, writer)
pub mod marker; // src/marker/{mod,types,header,number,view,body,writer}.rs

// Segments of markers: writer, iterator, recovery scan
pub mod segment; // src/segment/{mod,writer,reader,scan}.rs

// In-memory Bloom filter (double hashing xxh64 + FNV-1a)
pub mod bloom;  // src/bloom/{mod,math}.rs

pub mod config;
pub mod error;

// Convenience re-exports
pub use bloom::{expected_error_rate, optimal_hash_count, BloomFilter};
pub use config::MarklogConfig;
pub use error::{CorruptionError, FormatError, MarkerError, OrderError};
pub use hash::{crc32, fast_hash, fnv1a, fnv1a_hash};
pub use marker::{
    store_crc, Marker, MarkerBody, MarkerRecord, MarkerType, MarkerWriter, TypedView,
};
pub use segment::{scan_segment, ScanReport, SegmentIter, SegmentWriter, StopReason};
