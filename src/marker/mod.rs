//! marker - self-describing, CRC-checked log records.
//!
//! Submodules:
//! - types.rs  - MarkerType codes, groups, per-type payload layout and static lengths.
//! - header.rs - header layout constants, header/marker length calculators, alignment.
//! - number.rs - big-endian fixed-width read/write used for every numeric field.
//! - view.rs   - Marker (parse, header accessors, CRC recompute/verify) and store_crc.
//! - body.rs   - typed payload views (TypedView, MarkerBody dispatch).
//! - writer.rs - MarkerWriter and MarkerRecord (typed encoding).
//!
//! Layout: see header.rs.

pub mod body;
pub mod header;
pub mod number;
pub mod types;
pub mod view;
pub mod writer;

pub use body::{
    DocumentView, MarkerBody, PrefaceView, StructuralView, TransactionView, TypedView,
};
pub use header::{
    aligned_length, calculate_header_length, calculate_marker_length, EXTENDED_HEADER_SIZE,
    HEADER_SIZE, MARKER_ALIGNMENT, MIN_MARKER_SIZE,
};
pub use number::{read_number, write_number, FixedWidth};
pub use types::{BodyLayout, MarkerGroup, MarkerType};
pub use view::{store_crc, Marker};
pub use writer::{MarkerRecord, MarkerWriter};
