use serde::Serialize;

use crate::error::{Error, Result};
use crate::ogg::{
    OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_CONTINUATION, OGG_HEADER_TYPE_EOS, OGG_LACING_CONTINUE,
    OGG_PAGE_HEADER_SIZE, OGG_SIGNATURE,
};
use crate::utils::io::{read_bytes, read_le_i64, read_le_u32, read_u8, ByteReader};

/// Contiguous byte range of one packet's payload inside a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Absolute offset of the first payload byte.
    pub offset: u64,
    /// Payload length in bytes.
    pub len: u32,
    /// False when this is the last range seen so far of a packet that continues
    /// on a later page.
    pub complete: bool,
}

impl Segment {
    /// Offset one past the last payload byte.
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.len)
    }
}

/// OGG Page Header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeader {
    /// Absolute offset of the capture pattern.
    pub offset: u64,
    pub version: u8,
    pub header_type: u8,
    /// Raw granule position; negative means no packet completes on this page.
    pub granule_position: i64,
    pub serial_number: u32,
    pub sequence_number: u32,
    /// Stored checksum. Not verified by decoding.
    pub crc: u32,
    pub segment_table: Vec<u8>,
}

impl PageHeader {
    pub fn segment_count(&self) -> usize {
        self.segment_table.len()
    }

    /// Fixed header plus lacing table.
    pub fn header_len(&self) -> u64 {
        (OGG_PAGE_HEADER_SIZE + self.segment_table.len()) as u64
    }

    /// Calculate total page data size from segment table
    pub fn body_len(&self) -> u64 {
        self.segment_table.iter().map(|&x| u64::from(x)).sum()
    }

    pub fn page_len(&self) -> u64 {
        self.header_len() + self.body_len()
    }

    pub fn is_continuation(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_CONTINUATION != 0
    }

    /// Check if this is the beginning of a stream
    pub fn is_bos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_BOS != 0
    }

    pub fn is_eos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_EOS != 0
    }

    /// Granule position of the last packet completed on this page, if any.
    pub fn granule(&self) -> Option<i64> {
        (self.granule_position >= 0).then_some(self.granule_position)
    }

    /// Re-encode the header and lacing table exactly as they appear on the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header_len() as usize);
        out.extend_from_slice(OGG_SIGNATURE);
        out.push(self.version);
        out.push(self.header_type);
        out.extend_from_slice(&self.granule_position.to_le_bytes());
        out.extend_from_slice(&self.serial_number.to_le_bytes());
        out.extend_from_slice(&self.sequence_number.to_le_bytes());
        out.extend_from_slice(&self.crc.to_le_bytes());
        out.push(self.segment_table.len() as u8);
        out.extend_from_slice(&self.segment_table);
        out
    }
}

/// One decoded physical page.
#[derive(Debug, Clone)]
pub struct Page {
    pub header: PageHeader,
    /// Packet ranges in page order.
    pub segments: Vec<Segment>,
    /// The final lacing value is below 255, so the last packet on this page ends here.
    pub completes_packet: bool,
}

impl Page {
    /// Decode the page starting at `*pos`, advancing `*pos` past its payload.
    ///
    /// `*pos` is left untouched when decoding fails.
    pub fn read<R: ByteReader + ?Sized>(reader: &mut R, pos: &mut u64) -> Result<Self> {
        let offset = *pos;
        let mut cursor = offset;

        let mut capture = [0u8; 4];
        reader.read_at(cursor, &mut capture)?;
        if &capture != OGG_SIGNATURE {
            tracing::warn!(offset, "missing OggS capture pattern");
            return Err(Error::format(format!("missing capture pattern at offset {}", offset)));
        }
        cursor += 4;

        let version = read_u8(reader, &mut cursor)?;
        let header_type = read_u8(reader, &mut cursor)?;
        let granule_position = read_le_i64(reader, &mut cursor)?;
        let serial_number = read_le_u32(reader, &mut cursor)?;
        let sequence_number = read_le_u32(reader, &mut cursor)?;
        let crc = read_le_u32(reader, &mut cursor)?;

        let segment_count = read_u8(reader, &mut cursor)?;
        if segment_count == 0 {
            tracing::warn!(offset, "page has no segments");
            return Err(Error::format(format!("zero segment count in page at offset {}", offset)));
        }

        let segment_table = read_bytes(reader, &mut cursor, usize::from(segment_count))?;
        let (segments, completes_packet) = segments_from_lacing(&segment_table, cursor);

        let header = PageHeader {
            offset,
            version,
            header_type,
            granule_position,
            serial_number,
            sequence_number,
            crc,
            segment_table,
        };
        *pos = offset + header.page_len();

        tracing::trace!(
            offset,
            sequence = header.sequence_number,
            granule = header.granule_position,
            segments = segments.len(),
            completes_packet,
            "decoded page"
        );

        Ok(Page { header, segments, completes_packet })
    }

    /// Offset one past the page payload.
    pub fn end(&self) -> u64 {
        self.header.offset + self.header.page_len()
    }
}

/// Decode one physical page at `*pos`. See [`Page::read`].
pub fn decode_page<R: ByteReader + ?Sized>(reader: &mut R, pos: &mut u64) -> Result<Page> {
    Page::read(reader, pos)
}

/// Group lacing values into packet ranges laid out from `body_start`.
///
/// Returns the ranges and whether the final range completes its packet.
pub fn segments_from_lacing(lacing: &[u8], body_start: u64) -> (Vec<Segment>, bool) {
    let mut lengths: Vec<u32> = Vec::new();
    let mut open = false;

    for &value in lacing {
        if !open {
            lengths.push(0);
            open = true;
        }
        if let Some(len) = lengths.last_mut() {
            *len += u32::from(value);
        }
        if value != OGG_LACING_CONTINUE {
            open = false;
        }
    }

    // `open` is still set only when the last lacing value was 255.
    let completes_packet = !open && !lacing.is_empty();
    let count = lengths.len();

    let mut offset = body_start;
    let segments = lengths
        .into_iter()
        .enumerate()
        .map(|(i, len)| {
            let segment = Segment { offset, len, complete: i + 1 < count || completes_packet };
            offset += u64::from(len);
            segment
        })
        .collect();

    (segments, completes_packet)
}
