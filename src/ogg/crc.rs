// Optional page checksum verification
//
// Ogg uses CRC-32 with polynomial 0x04c11db7, zero initial value, no bit reflection
// and no final xor, computed over the whole page with the CRC field zeroed.
// Page decoding never calls into this module; the demuxer runs it as a separate
// pass when `StreamConfig::verify_crc` is set.

use crate::error::{Error, Result};
use crate::ogg::page::PageHeader;
use crate::ogg::OGG_CRC_OFFSET;
use crate::utils::io::{read_bytes, ByteReader};

const CRC_POLY: u32 = 0x04c1_1db7;

static CRC_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut r = (i as u32) << 24;
        let mut bit = 0;
        while bit < 8 {
            r = if r & 0x8000_0000 != 0 { (r << 1) ^ CRC_POLY } else { r << 1 };
            bit += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
}

/// Continue a running checksum over `bytes`.
pub fn update(crc: u32, bytes: &[u8]) -> u32 {
    bytes.iter().fold(crc, |crc, &b| {
        (crc << 8) ^ CRC_TABLE[(((crc >> 24) as u8) ^ b) as usize]
    })
}

/// Checksum of a complete page image whose CRC field is already zeroed.
pub fn checksum(bytes: &[u8]) -> u32 {
    update(0, bytes)
}

/// Re-read the page described by `header` and compare its checksum to the stored one.
pub fn verify_page<R: ByteReader + ?Sized>(reader: &mut R, header: &PageHeader) -> Result<()> {
    let mut pos = header.offset;
    let mut image = read_bytes(reader, &mut pos, header.page_len() as usize)?;
    image[OGG_CRC_OFFSET..OGG_CRC_OFFSET + 4].fill(0);

    let actual = checksum(&image);
    if actual != header.crc {
        tracing::warn!(
            offset = header.offset,
            sequence = header.sequence_number,
            "page checksum mismatch"
        );
        return Err(Error::CrcMismatch { expected: header.crc, actual });
    }
    Ok(())
}
