// Vorbis header bootstrap
//
// Vorbis Structure (Ogg encapsulation):
// 1. Identification Header: alone on the first page, BOS set, granule 0,
//    which makes the first page exactly 58 bytes long
// 2. Comment Header: starts on the second page, may span several pages
// 3. Setup Header: follows the comment header and finishes its page
// 4. Audio packets start on a fresh page
//
// Every header packet starts with its type byte followed by "vorbis".

pub mod comment;

pub use comment::{VorbisComment, VorbisFields};

use crate::config::StreamConfig;
use crate::error::{Error, Result};
use crate::ogg::page::Page;
use crate::ogg::stream::{Demuxer, Packet};
use crate::utils::io::ByteReader;

pub const VORBIS_SIGNATURE: &[u8; 6] = b"vorbis";

/// Length of the type byte plus signature that opens every header packet.
pub const VORBIS_PREAMBLE_LEN: usize = 7;

/// Size of a first page holding only a well-formed identification header.
pub const VORBIS_IDENT_PAGE_SIZE: u64 = 58;

/// Header packet type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Identification = 0x01,
    Comment = 0x03,
    Setup = 0x05,
}

impl HeaderKind {
    fn name(self) -> &'static str {
        match self {
            HeaderKind::Identification => "identification",
            HeaderKind::Comment => "comment",
            HeaderKind::Setup => "setup",
        }
    }

    fn preamble(self) -> [u8; VORBIS_PREAMBLE_LEN] {
        let mut out = [0u8; VORBIS_PREAMBLE_LEN];
        out[0] = self as u8;
        out[1..].copy_from_slice(VORBIS_SIGNATURE);
        out
    }
}

/// The three mandatory header packets.
#[derive(Debug, Clone)]
pub struct VorbisHeaders {
    pub identification: Packet,
    pub comment: Packet,
    pub setup: Packet,
}

/// A Vorbis logical bitstream whose header packets have been validated.
///
/// Packets handed out by this type are audio packets.
#[derive(Debug)]
pub struct VorbisStream<R> {
    demuxer: Demuxer<R>,
    headers: VorbisHeaders,
}

impl<R: ByteReader> VorbisStream<R> {
    /// Open a stream at offset 0 and validate its header packets.
    pub fn open(reader: R) -> Result<Self> {
        Self::open_with_config(reader, StreamConfig::default())
    }

    pub fn open_with_config(reader: R, config: StreamConfig) -> Result<Self> {
        let mut demuxer = Demuxer::with_config(reader, config);
        let headers = read_headers(&mut demuxer)?;
        Ok(VorbisStream { demuxer, headers })
    }

    pub fn headers(&self) -> &VorbisHeaders {
        &self.headers
    }

    /// Parse the comment header packet.
    pub fn comment(&mut self) -> Result<VorbisComment> {
        let data = self.demuxer.read_packet(&self.headers.comment)?;
        VorbisComment::parse(&data[VORBIS_PREAMBLE_LEN..])
    }

    pub fn read_next_page(&mut self) -> Result<Page> {
        self.demuxer.read_next_page()
    }

    pub fn try_take_packet(&mut self) -> Option<Packet> {
        self.demuxer.try_take_packet()
    }

    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        self.demuxer.next_packet()
    }

    pub fn read_packet(&mut self, packet: &Packet) -> Result<Vec<u8>> {
        self.demuxer.read_packet(packet)
    }

    pub fn demuxer(&self) -> &Demuxer<R> {
        &self.demuxer
    }

    pub fn into_inner(self) -> R {
        self.demuxer.into_inner()
    }
}

/// Read and validate the identification, comment and setup packets.
pub fn read_headers<R: ByteReader>(demuxer: &mut Demuxer<R>) -> Result<VorbisHeaders> {
    let page = demuxer.read_next_page()?;
    let header = &page.header;
    if !header.is_bos() {
        return Err(invalid("first page lacks the beginning-of-stream flag"));
    }
    if header.is_eos() {
        return Err(invalid("first page has the end-of-stream flag"));
    }
    if !page.completes_packet {
        return Err(invalid("identification packet does not finish on the first page"));
    }
    if header.granule_position != 0 {
        return Err(invalid("first page granule position is not zero"));
    }
    if demuxer.position() != VORBIS_IDENT_PAGE_SIZE {
        return Err(invalid(format!(
            "first page is {} bytes, expected {}",
            demuxer.position(),
            VORBIS_IDENT_PAGE_SIZE
        )));
    }

    let identification = demuxer
        .try_take_packet()
        .ok_or_else(|| invalid("identification packet missing from the first page"))?;
    check_preamble(demuxer, &identification, HeaderKind::Identification)?;
    if demuxer.pending() != 0 {
        return Err(invalid("first page carries more than the identification packet"));
    }

    let comment = loop {
        demuxer.read_next_page()?;
        if let Some(packet) = demuxer.try_take_packet() {
            break packet;
        }
    };
    check_preamble(demuxer, &comment, HeaderKind::Comment)?;

    let setup = loop {
        if let Some(packet) = demuxer.try_take_packet() {
            break packet;
        }
        demuxer.read_next_page()?;
    };
    check_preamble(demuxer, &setup, HeaderKind::Setup)?;

    if demuxer.pending() != 0 {
        return Err(invalid("audio data shares a page with the setup header"));
    }

    tracing::debug!(
        serial = ?demuxer.serial(),
        comment_len = comment.len(),
        setup_len = setup.len(),
        audio_offset = demuxer.position(),
        "vorbis headers validated"
    );

    Ok(VorbisHeaders { identification, comment, setup })
}

fn check_preamble<R: ByteReader>(
    demuxer: &mut Demuxer<R>,
    packet: &Packet,
    kind: HeaderKind,
) -> Result<()> {
    let prefix = demuxer.read_packet_prefix(packet, VORBIS_PREAMBLE_LEN)?;
    if prefix != kind.preamble() {
        return Err(invalid(format!("{} header has a bad preamble", kind.name())));
    }
    tracing::debug!(kind = kind.name(), len = packet.len(), "header packet");
    Ok(())
}

fn invalid(msg: impl Into<String>) -> Error {
    let msg = msg.into();
    tracing::warn!("{}", msg);
    Error::FormatInvalid(msg)
}
