// CLI command implementations
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use oggdemux::{Demuxer, Packet, Page, SeekReader, StreamConfig, VorbisStream};

use crate::cli::OutputFormatter;

type FileReader = SeekReader<BufReader<File>>;

/// Build stream options from an optional JSON file and command-line flags.
pub fn load_stream_config(path: Option<&Path>, verify_crc: bool) -> Result<StreamConfig> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            StreamConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => StreamConfig::default(),
    };
    config.verify_crc |= verify_crc;
    Ok(config)
}

fn open_reader(path: &Path) -> Result<FileReader> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(SeekReader::new(BufReader::new(file)))
}

#[derive(Serialize)]
struct PageRecord<'a> {
    file: &'a str,
    offset: u64,
    sequence: u32,
    serial: u32,
    granule: i64,
    continuation: bool,
    bos: bool,
    eos: bool,
    segments: usize,
    packets_started: usize,
    completes_packet: bool,
    length: u64,
}

impl<'a> PageRecord<'a> {
    fn new(file: &'a str, page: &Page) -> Self {
        let header = &page.header;
        PageRecord {
            file,
            offset: header.offset,
            sequence: header.sequence_number,
            serial: header.serial_number,
            granule: header.granule_position,
            continuation: header.is_continuation(),
            bos: header.is_bos(),
            eos: header.is_eos(),
            segments: header.segment_count(),
            packets_started: page.segments.len() - usize::from(header.is_continuation()),
            completes_packet: page.completes_packet,
            length: header.page_len(),
        }
    }
}

#[derive(Serialize)]
struct PacketRecord<'a> {
    file: &'a str,
    index: usize,
    kind: &'a str,
    offset: u64,
    length: u64,
    pages: usize,
    granule: Option<i64>,
}

impl<'a> PacketRecord<'a> {
    fn new(file: &'a str, index: usize, kind: &'a str, packet: &Packet) -> Self {
        PacketRecord {
            file,
            index,
            kind,
            offset: packet.segments().first().map_or(0, |s| s.offset),
            length: packet.len(),
            pages: packet.segments().len(),
            granule: packet.granule_position(),
        }
    }
}

#[derive(Serialize)]
struct TagsRecord<'a> {
    file: &'a str,
    vendor: String,
    comments: BTreeMap<String, Vec<String>>,
}

/// List page headers until the end-of-stream page
pub fn command_pages(
    files: &[std::path::PathBuf],
    config: &StreamConfig,
    formatter: &OutputFormatter,
) -> bool {
    run_each(files, formatter, |path, name, out| {
        let mut demuxer = Demuxer::with_config(open_reader(path)?, config.clone());
        let mut count = 0usize;
        while !demuxer.eos_seen() {
            let page = demuxer.read_next_page()?;
            formatter.output(&PageRecord::new(name, &page), &mut *out)?;
            count += 1;
        }
        formatter.print_info(&format!("{}: {} pages", name, count));
        Ok(())
    })
}

/// Validate headers and list packets
pub fn command_packets(
    files: &[std::path::PathBuf],
    limit: Option<usize>,
    config: &StreamConfig,
    formatter: &OutputFormatter,
) -> bool {
    run_each(files, formatter, |path, name, out| {
        let mut stream = VorbisStream::open_with_config(open_reader(path)?, config.clone())?;

        let headers = stream.headers();
        let header_packets = [
            ("identification", &headers.identification),
            ("comment", &headers.comment),
            ("setup", &headers.setup),
        ];
        for (index, (kind, packet)) in header_packets.iter().enumerate() {
            formatter.output(&PacketRecord::new(name, index, kind, packet), &mut *out)?;
        }

        let mut audio = 0usize;
        while limit.map_or(true, |limit| audio < limit) {
            let Some(packet) = stream.next_packet()? else {
                break;
            };
            formatter.output(&PacketRecord::new(name, audio + 3, "audio", &packet), &mut *out)?;
            audio += 1;
        }
        formatter.print_info(&format!("{}: {} audio packets", name, audio));
        Ok(())
    })
}

/// Print the Vorbis comment header
pub fn command_tags(
    files: &[std::path::PathBuf],
    config: &StreamConfig,
    formatter: &OutputFormatter,
) -> bool {
    run_each(files, formatter, |path, name, out| {
        let mut stream = VorbisStream::open_with_config(open_reader(path)?, config.clone())?;
        let comment = stream.comment()?;

        let mut comments: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, value) in comment.comments {
            comments.entry(field.to_ascii_uppercase()).or_default().push(value);
        }
        formatter.output(&TagsRecord { file: name, vendor: comment.vendor, comments }, &mut *out)?;
        Ok(())
    })
}

/// Run `f` for every file, reporting failures without stopping. Returns true if all succeeded.
fn run_each<F>(files: &[std::path::PathBuf], formatter: &OutputFormatter, mut f: F) -> bool
where
    F: FnMut(&Path, &str, &mut dyn Write) -> Result<()>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut ok = true;

    for path in files {
        let name = path.display().to_string();
        if let Err(e) = f(path, &name, &mut out) {
            formatter.print_error(&format!("{}: {:#}", name, e));
            ok = false;
        }
    }

    ok
}
