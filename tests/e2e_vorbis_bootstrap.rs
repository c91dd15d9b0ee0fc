//! End-to-end header validation and packet delivery over synthetic streams.

mod common;

use common::*;
use oggdemux::{Demuxer, Error, SeekReader, StreamConfig, VorbisStream};
use std::io::Cursor;

fn expect_format_error<T: std::fmt::Debug>(result: oggdemux::Result<T>) {
    match result {
        Err(Error::FormatInvalid(_)) => {}
        other => panic!("expected FormatInvalid, got {:?}", other),
    }
}

#[test]
fn identification_page_is_58_bytes() {
    let data = stream(&[PageSpec::with_packets(BOS, 0, &[ident_packet().as_slice()])]);
    assert_eq!(data.len(), 58);

    let mut demuxer = Demuxer::new(data);
    let page = demuxer.read_next_page().unwrap();
    assert!(page.header.is_bos());
    assert!(!page.header.is_eos());
    assert!(page.completes_packet);
    assert_eq!(page.header.granule_position, 0);
    assert_eq!(demuxer.position(), 58);

    let ident = demuxer.try_take_packet().unwrap();
    assert_eq!(ident.len(), 30);
    assert_eq!(ident.granule_position(), Some(0));
    let prefix = demuxer.read_packet_prefix(&ident, 7).unwrap();
    assert_eq!(prefix, b"\x01vorbis");
    assert_eq!(demuxer.pending(), 0);
}

#[test]
fn opens_valid_stream_and_delivers_audio_packets() {
    let mut stream = VorbisStream::open(vorbis_stream()).unwrap();

    let headers = stream.headers();
    assert_eq!(headers.identification.len(), 30);
    assert_eq!(headers.setup.len(), 40);
    assert_eq!(headers.setup.granule_position(), Some(0));
    assert_eq!(headers.comment.granule_position(), None);

    let mut audio = Vec::new();
    while let Some(packet) = stream.next_packet().unwrap() {
        let payload = stream.read_packet(&packet).unwrap();
        audio.push((payload, packet.granule_position()));
    }
    assert_eq!(
        audio,
        vec![
            (vec![0xA1; 10], None),
            (vec![0xA2; 20], Some(1024)),
            (vec![0xA3; 5], Some(2048)),
        ]
    );
    assert!(stream.demuxer().eos_seen());
}

#[test]
fn comment_header_is_parsed() {
    let mut stream = VorbisStream::open(vorbis_stream()).unwrap();
    let comment = stream.comment().unwrap();
    assert_eq!(comment.vendor, "test vendor");
    assert_eq!(comment.get("title").map(String::as_str), Some("Silence"));
    assert_eq!(comment.get("ARTIST").map(String::as_str), Some("Nobody"));
}

#[test]
fn works_over_seekable_source() {
    let reader = SeekReader::new(Cursor::new(vorbis_stream()));
    let mut stream = VorbisStream::open(reader).unwrap();
    let mut count = 0;
    while stream.next_packet().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn comment_spanning_pages_is_reassembled() {
    let ident = ident_packet();
    let long_tag = format!("DESCRIPTION={}", "x".repeat(600));
    let comment = comment_packet("spanning", &[long_tag.as_str()]);
    let setup = setup_packet(12);

    // Split the comment after 510 bytes so it continues on the next page.
    let (head, tail) = comment.split_at(510);
    let tail_page = PageSpec::with_packets(CONTINUATION, 0, &[tail, setup.as_slice()]);

    let data = stream(&[
        PageSpec::with_packets(BOS, 0, &[ident.as_slice()]),
        PageSpec { lacing: lace(head.len(), false), body: head.to_vec(), ..PageSpec::new(0, -1, &[]) },
        tail_page,
        PageSpec::with_packets(EOS, 64, &[&[1u8, 2, 3][..]]),
    ]);

    let mut stream = VorbisStream::open(data).unwrap();
    assert_eq!(stream.headers().comment.len(), comment.len() as u64);
    assert_eq!(stream.headers().comment.segments().len(), 2);
    assert_eq!(stream.comment().unwrap().get("description").map(|v| v.len()), Some(600));

    let audio = stream.next_packet().unwrap().unwrap();
    assert_eq!(audio.granule_position(), Some(64));
    assert!(stream.next_packet().unwrap().is_none());
}

#[test]
fn missing_bos_fails_before_any_packet() {
    let mut data = vorbis_stream();
    data[5] &= !BOS;
    expect_format_error(VorbisStream::open(data));
}

#[test]
fn eos_on_first_page_fails() {
    let mut data = vorbis_stream();
    data[5] |= EOS;
    expect_format_error(VorbisStream::open(data));
}

#[test]
fn nonzero_first_granule_fails() {
    let mut data = vorbis_stream();
    data[6] = 1;
    expect_format_error(VorbisStream::open(data));
}

#[test]
fn oversized_first_page_fails() {
    let mut ident = ident_packet();
    ident.push(0);
    let data = stream(&[PageSpec::with_packets(BOS, 0, &[ident.as_slice()])]);
    expect_format_error(VorbisStream::open(data));
}

#[test]
fn bad_identification_preamble_fails() {
    let mut data = vorbis_stream();
    // First payload byte of the identification packet.
    data[28] = 0x02;
    expect_format_error(VorbisStream::open(data));
}

#[test]
fn bad_comment_preamble_fails() {
    let ident = ident_packet();
    let setup = setup_packet(20);
    let data = stream(&[
        PageSpec::with_packets(BOS, 0, &[ident.as_slice()]),
        PageSpec::with_packets(0, 0, &[b"\x03vorbiX".as_slice(), setup.as_slice()]),
    ]);
    expect_format_error(VorbisStream::open(data));
}

#[test]
fn bad_setup_preamble_fails() {
    let ident = ident_packet();
    let comment = comment_packet("v", &[]);
    let data = stream(&[
        PageSpec::with_packets(BOS, 0, &[ident.as_slice()]),
        PageSpec::with_packets(0, 0, &[comment.as_slice(), b"\x01vorbis".as_slice()]),
    ]);
    expect_format_error(VorbisStream::open(data));
}

#[test]
fn header_packet_shorter_than_preamble_fails() {
    let ident = ident_packet();
    let data = stream(&[
        PageSpec::with_packets(BOS, 0, &[ident.as_slice()]),
        PageSpec::with_packets(0, 0, &[b"\x03vor".as_slice()]),
    ]);
    expect_format_error(VorbisStream::open(data));
}

#[test]
fn audio_sharing_setup_page_fails() {
    let ident = ident_packet();
    let comment = comment_packet("v", &[]);
    let setup = setup_packet(20);
    let data = stream(&[
        PageSpec::with_packets(BOS, 0, &[ident.as_slice()]),
        PageSpec::with_packets(0, 0, &[comment.as_slice(), setup.as_slice(), &[9u8; 4][..]]),
    ]);
    expect_format_error(VorbisStream::open(data));
}

#[test]
fn truncated_headers_are_io_errors() {
    let data = vorbis_stream();
    let cut = data[..70].to_vec();
    match VorbisStream::open(cut) {
        Err(Error::Io(_)) => {}
        other => panic!("expected Io, got {:?}", other),
    }
}

#[test]
fn foreign_serial_in_headers_is_rejected_unless_ignored() {
    let ident = ident_packet();
    let comment = comment_packet("v", &[]);
    let setup = setup_packet(20);
    let mut second = PageSpec::with_packets(0, 0, &[comment.as_slice(), setup.as_slice()]);
    second.serial = SERIAL + 1;
    let data = stream(&[PageSpec::with_packets(BOS, 0, &[ident.as_slice()]), second]);

    expect_format_error(VorbisStream::open(data.clone()));

    let config = StreamConfig { serial_policy: oggdemux::SerialPolicy::Ignore, ..Default::default() };
    assert!(VorbisStream::open_with_config(data, config).is_ok());
}

#[test]
fn try_take_on_open_packet_is_idempotent() {
    let data = stream(&[
        PageSpec::with_packets(BOS, 0, &[ident_packet().as_slice()]),
        PageSpec::new(0, -1, &[255, 255]),
    ]);
    let mut demuxer = Demuxer::new(data);
    demuxer.read_next_page().unwrap();
    demuxer.try_take_packet().unwrap();
    demuxer.read_next_page().unwrap();

    let position = demuxer.position();
    for _ in 0..3 {
        assert!(demuxer.try_take_packet().is_none());
        assert_eq!(demuxer.pending(), 1);
        assert_eq!(demuxer.position(), position);
    }
}
