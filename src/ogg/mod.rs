// Ogg physical bitstream support
//
// OGG Page Layout:
// - OGG Page Header (27 bytes)
//   - Capture Pattern: "OggS" (4 bytes)
//   - Version: 0 (1 byte)
//   - Header Type: 1=continuation, 2=bos, 4=eos (1 byte)
//   - Granule Position (8 bytes, signed, -1 = no packet ends here)
//   - Bitstream Serial Number (4 bytes)
//   - Page Sequence Number (4 bytes)
//   - CRC Checksum (4 bytes)
//   - Number of Page Segments (1 byte, 1..=255)
//   - Segment Table (variable)
// - Segment payload bytes
//
// A packet is split into 255-byte lacing values plus one final value below 255.
// A packet whose last lacing value on a page is 255 continues on the next page.

pub mod crc;
pub mod page;
pub mod stream;

pub use page::{Page, PageHeader, Segment};
pub use stream::{Demuxer, Packet};

// OGG signature
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

/// Size of the fixed part of a page header, before the lacing table.
pub const OGG_PAGE_HEADER_SIZE: usize = 27;

// OGG page header types
pub const OGG_HEADER_TYPE_CONTINUATION: u8 = 0x01;
pub const OGG_HEADER_TYPE_BOS: u8 = 0x02; // Beginning of Stream
pub const OGG_HEADER_TYPE_EOS: u8 = 0x04; // End of Stream

/// Byte offset of the CRC field inside the page header.
pub(crate) const OGG_CRC_OFFSET: usize = 22;

/// Lacing value that continues the current segment.
pub(crate) const OGG_LACING_CONTINUE: u8 = 255;
