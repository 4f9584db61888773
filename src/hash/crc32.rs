//! hash/crc32 - table-driven CRC-32 (IEEE 802.3, polynomial 0x04C11DB7, reflected).
//!
//! Block API:
//!   let mut v = crc32_initial();            // 0xFFFFFFFF
//!   v = crc32_block(&table, v, part1);
//!   v = crc32_block(&table, v, part2);
//!   let crc = crc32_finalize(v);            // v ^ 0xFFFFFFFF
//!
//! The lookup table is an immutable value built by a `const fn`. IEEE_TABLE is
//! evaluated at compile time, so there is no runtime initialisation gate to race on.

/// Normal form of the IEEE polynomial.
pub const CRC32_POLY: u32 = 0x04C1_1DB7;

/// Bit-reflected form, used by the byte-wise table.
pub const CRC32_POLY_REFLECTED: u32 = CRC32_POLY.reverse_bits();

/// 256-entry lookup table for byte-wise CRC-32 updates.
#[derive(Clone)]
pub struct Crc32Table([u32; 256]);

impl Crc32Table {
    /// Build the reflected table for the IEEE polynomial.
    pub const fn ieee() -> Self {
        let mut table = [0u32; 256];
        let mut i = 0usize;
        while i < 256 {
            let mut c = i as u32;
            let mut bit = 0;
            while bit < 8 {
                c = if c & 1 != 0 {
                    (c >> 1) ^ CRC32_POLY_REFLECTED
                } else {
                    c >> 1
                };
                bit += 1;
            }
            table[i] = c;
            i += 1;
        }
        Crc32Table(table)
    }

    #[inline]
    pub fn entry(&self, idx: u8) -> u32 {
        self.0[idx as usize]
    }
}

impl std::fmt::Debug for Crc32Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Crc32Table(poly={:#010x})", CRC32_POLY)
    }
}

/// Shared IEEE table.
pub static IEEE_TABLE: Crc32Table = Crc32Table::ieee();

#[inline]
pub const fn crc32_initial() -> u32 {
    0xFFFF_FFFF
}

#[inline]
pub const fn crc32_finalize(value: u32) -> u32 {
    value ^ 0xFFFF_FFFF
}

/// Fold `bytes` into a running CRC value.
#[inline]
pub fn crc32_block(table: &Crc32Table, seed: u32, bytes: &[u8]) -> u32 {
    let mut value = seed;
    for &b in bytes {
        value = (value >> 8) ^ table.entry((value as u8) ^ b);
    }
    value
}

/// One-shot CRC-32 of `bytes` with the shared table.
#[inline]
pub fn crc32(bytes: &[u8]) -> u32 {
    crc32_finalize(crc32_block(&IEEE_TABLE, crc32_initial(), bytes))
}
