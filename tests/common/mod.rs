//! Synthetic Ogg page builder shared by the integration tests.

#![allow(dead_code)]

pub const CONTINUATION: u8 = 0x01;
pub const BOS: u8 = 0x02;
pub const EOS: u8 = 0x04;

pub const SERIAL: u32 = 0x5EED_0001;

/// One page to encode.
#[derive(Debug, Clone)]
pub struct PageSpec {
    pub header_type: u8,
    pub granule: i64,
    pub serial: u32,
    pub sequence: u32,
    pub lacing: Vec<u8>,
    pub body: Vec<u8>,
}

impl PageSpec {
    pub fn new(header_type: u8, granule: i64, lacing: &[u8]) -> Self {
        let body_len: usize = lacing.iter().map(|&v| v as usize).sum();
        PageSpec {
            header_type,
            granule,
            serial: SERIAL,
            sequence: 0,
            lacing: lacing.to_vec(),
            body: (0..body_len).map(|i| i as u8).collect(),
        }
    }

    /// Page whose body is exactly `packets`, each terminated on this page.
    pub fn with_packets(header_type: u8, granule: i64, packets: &[&[u8]]) -> Self {
        let mut lacing = Vec::new();
        let mut body = Vec::new();
        for packet in packets {
            lacing.extend(lace(packet.len(), true));
            body.extend_from_slice(packet);
        }
        PageSpec {
            header_type,
            granule,
            serial: SERIAL,
            sequence: 0,
            lacing,
            body,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"OggS");
        out.push(0);
        out.push(self.header_type);
        out.extend_from_slice(&self.granule.to_le_bytes());
        out.extend_from_slice(&self.serial.to_le_bytes());
        out.extend_from_slice(&self.sequence.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.push(self.lacing.len() as u8);
        out.extend_from_slice(&self.lacing);
        out.extend_from_slice(&self.body);
        out
    }
}

/// Lacing values for `len` payload bytes. When `len` is a multiple of 255 and
/// `terminate` is false, the closing zero is left out so the packet stays open.
pub fn lace(len: usize, terminate: bool) -> Vec<u8> {
    let mut out = vec![255u8; len / 255];
    if terminate || len % 255 != 0 {
        out.push((len % 255) as u8);
    }
    out
}

/// Concatenate pages, numbering their sequence fields in order.
pub fn stream(pages: &[PageSpec]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, page) in pages.iter().enumerate() {
        let mut page = page.clone();
        page.sequence = i as u32;
        out.extend(page.encode());
    }
    out
}

/// 30-byte identification header packet, which yields a 58-byte first page.
pub fn ident_packet() -> Vec<u8> {
    let mut packet = b"\x01vorbis".to_vec();
    packet.extend_from_slice(&0u32.to_le_bytes()); // vorbis version
    packet.push(2); // channels
    packet.extend_from_slice(&44_100u32.to_le_bytes());
    packet.extend_from_slice(&0i32.to_le_bytes());
    packet.extend_from_slice(&128_000i32.to_le_bytes());
    packet.extend_from_slice(&0i32.to_le_bytes());
    packet.push(0xB8); // block sizes
    packet.push(1); // framing
    assert_eq!(packet.len(), 30);
    packet
}

pub fn comment_packet(vendor: &str, comments: &[&str]) -> Vec<u8> {
    let mut packet = b"\x03vorbis".to_vec();
    packet.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    packet.extend_from_slice(vendor.as_bytes());
    packet.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for c in comments {
        packet.extend_from_slice(&(c.len() as u32).to_le_bytes());
        packet.extend_from_slice(c.as_bytes());
    }
    packet.push(1);
    packet
}

pub fn setup_packet(len: usize) -> Vec<u8> {
    let mut packet = b"\x05vorbis".to_vec();
    packet.extend((0..len.saturating_sub(7)).map(|i| (i * 7) as u8));
    packet
}

/// A minimal valid Vorbis stream: identification page, one page with comment and
/// setup headers, then two audio pages.
pub fn vorbis_stream() -> Vec<u8> {
    let ident = ident_packet();
    let comment = comment_packet("test vendor", &["TITLE=Silence", "ARTIST=Nobody"]);
    let setup = setup_packet(40);
    stream(&[
        PageSpec::with_packets(BOS, 0, &[ident.as_slice()]),
        PageSpec::with_packets(0, 0, &[comment.as_slice(), setup.as_slice()]),
        PageSpec::with_packets(0, 1024, &[&[0xA1u8; 10][..], &[0xA2u8; 20][..]]),
        PageSpec::with_packets(EOS, 2048, &[&[0xA3u8; 5][..]]),
    ])
}
