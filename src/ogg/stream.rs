// Packet reassembly over a sequence of pages
//
// The demuxer pulls pages on demand and keeps a FIFO of packets that are not yet
// handed to the caller. Only the newest packet in the queue may be incomplete.
// A page's granule position belongs to the last packet completed on that page.

use std::collections::VecDeque;

use serde::Serialize;

use crate::config::{SerialPolicy, StreamConfig};
use crate::error::{Error, Result};
use crate::ogg::crc;
use crate::ogg::page::{Page, PageHeader, Segment};
use crate::utils::io::ByteReader;

/// Logical codec packet, possibly assembled from several pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Packet {
    segments: Vec<Segment>,
    granule_position: Option<i64>,
}

impl Packet {
    fn starting_with(segment: Segment) -> Self {
        Packet { segments: vec![segment], granule_position: None }
    }

    /// Payload ranges in stream order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Granule position assigned by the page this packet completed on, if that
    /// page carried one.
    pub fn granule_position(&self) -> Option<i64> {
        self.granule_position
    }

    /// True once the final payload range has been seen.
    pub fn is_complete(&self) -> bool {
        self.segments.last().is_some_and(|s| s.complete)
    }

    /// Total payload length across all ranges.
    pub fn len(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.len)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn last_segment_mut(&mut self) -> Option<&mut Segment> {
        self.segments.last_mut()
    }
}

/// Demultiplexes one logical bitstream out of an Ogg physical bitstream.
#[derive(Debug)]
pub struct Demuxer<R> {
    reader: R,
    config: StreamConfig,
    pos: u64,
    packets: VecDeque<Packet>,
    serial: Option<u32>,
    eos_seen: bool,
}

impl<R: ByteReader> Demuxer<R> {
    /// Start demuxing at offset 0. No header validation is performed here.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, StreamConfig::default())
    }

    pub fn with_config(reader: R, config: StreamConfig) -> Self {
        Demuxer {
            reader,
            config,
            pos: 0,
            packets: VecDeque::new(),
            serial: None,
            eos_seen: false,
        }
    }

    /// Next unread byte offset.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Number of packets waiting in the queue, complete or not.
    pub fn pending(&self) -> usize {
        self.packets.len()
    }

    /// Serial number of the logical bitstream, once the first page is read.
    pub fn serial(&self) -> Option<u32> {
        self.serial
    }

    /// True after a page carrying the end-of-stream flag has been ingested.
    pub fn eos_seen(&self) -> bool {
        self.eos_seen
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decode the next page and merge its segments into the packet queue.
    ///
    /// Returns the page just consumed.
    pub fn read_next_page(&mut self) -> Result<Page> {
        let page_start = self.pos;
        let mut pos = self.pos;
        let page = Page::read(&mut self.reader, &mut pos)?;

        if self.config.verify_crc {
            crc::verify_page(&mut self.reader, &page.header)?;
        }
        self.check_serial(&page.header)?;

        // The cursor only moves once the page is known to be usable.
        self.pos = pos;

        let header = &page.header;
        let mut segments = page.segments.iter().copied();

        if header.is_continuation() {
            let Some(first) = segments.next() else {
                return Err(Error::format("continued page has no segments"));
            };
            self.continue_packet(first, page_start)?;
        } else if self.packets.back().is_some_and(|p| !p.is_complete()) {
            tracing::warn!(offset = page_start, "expected a continued page");
            return Err(Error::format(format!(
                "page at offset {} does not continue the open packet",
                page_start
            )));
        }

        for segment in segments {
            self.packets.push_back(Packet::starting_with(segment));
        }

        if header.is_eos() {
            self.eos_seen = true;
        }

        self.resolve_granule(header, page_start)?;

        tracing::debug!(
            offset = page_start,
            sequence = header.sequence_number,
            pending = self.packets.len(),
            "ingested page"
        );
        Ok(page)
    }

    /// Remove and return the oldest packet if it is complete.
    ///
    /// Leaves the queue untouched when the oldest packet is still open.
    pub fn try_take_packet(&mut self) -> Option<Packet> {
        if !self.packets.front()?.is_complete() {
            return None;
        }
        self.packets.pop_front()
    }

    /// Pull pages until a packet is ready.
    ///
    /// Returns `Ok(None)` once the end-of-stream page has been read and every
    /// packet has been handed out.
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        loop {
            if let Some(packet) = self.try_take_packet() {
                return Ok(Some(packet));
            }
            if self.eos_seen {
                if self.packets.is_empty() {
                    return Ok(None);
                }
                return Err(Error::format("stream ended inside a packet"));
            }
            self.read_next_page()?;
        }
    }

    /// Read the whole payload of `packet`.
    pub fn read_packet(&mut self, packet: &Packet) -> Result<Vec<u8>> {
        self.read_packet_prefix(packet, usize::MAX)
    }

    /// Read up to `limit` leading payload bytes of `packet`.
    pub fn read_packet_prefix(&mut self, packet: &Packet, limit: usize) -> Result<Vec<u8>> {
        let total = usize::try_from(packet.len()).unwrap_or(usize::MAX).min(limit);
        let mut data = vec![0u8; total];
        let mut filled = 0;

        for segment in packet.segments() {
            if filled == total {
                break;
            }
            let take = (segment.len as usize).min(total - filled);
            self.reader
                .read_at(segment.offset, &mut data[filled..filled + take])?;
            filled += take;
        }

        Ok(data)
    }

    fn check_serial(&mut self, header: &PageHeader) -> Result<()> {
        match self.serial {
            None => self.serial = Some(header.serial_number),
            Some(expected)
                if expected != header.serial_number
                    && self.config.serial_policy == SerialPolicy::Strict =>
            {
                tracing::warn!(
                    expected,
                    found = header.serial_number,
                    offset = header.offset,
                    "page from another logical bitstream"
                );
                return Err(Error::format(format!(
                    "serial number {:#010x} does not match stream {:#010x}",
                    header.serial_number, expected
                )));
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn continue_packet(&mut self, first: Segment, page_start: u64) -> Result<()> {
        let Some(packet) = self.packets.back_mut() else {
            tracing::warn!(offset = page_start, "continued page with no open packet");
            return Err(Error::format(format!(
                "page at offset {} continues a packet but none is pending",
                page_start
            )));
        };
        match packet.last_segment_mut() {
            Some(last) if !last.complete => last.complete = true,
            _ => {
                tracing::warn!(offset = page_start, "continued page after a completed packet");
                return Err(Error::format(format!(
                    "page at offset {} continues a packet that already ended",
                    page_start
                )));
            }
        }
        packet.segments.push(first);
        Ok(())
    }

    fn resolve_granule(&mut self, header: &PageHeader, page_start: u64) -> Result<()> {
        let Some(granule) = header.granule() else {
            // No packet may finish on a page without a granule position.
            if self.packets.back().is_some_and(|p| p.is_complete()) {
                tracing::warn!(offset = page_start, "packet completed on page without granule");
                return Err(Error::format(format!(
                    "page at offset {} completes a packet but has no granule position",
                    page_start
                )));
            }
            return Ok(());
        };

        let newest_complete = self.packets.iter_mut().rev().find(|p| p.is_complete());
        match newest_complete {
            Some(packet)
                if packet.segments.last().is_some_and(|s| s.offset > page_start) =>
            {
                debug_assert!(packet.granule_position.is_none());
                packet.granule_position = Some(granule);
                tracing::debug!(offset = page_start, granule, "assigned granule position");
                Ok(())
            }
            _ => {
                tracing::warn!(offset = page_start, granule, "no packet completes on page");
                Err(Error::format(format!(
                    "page at offset {} has granule {} but completes no packet",
                    page_start, granule
                )))
            }
        }
    }
}
