//! oggdemux - Ogg page parsing and Vorbis packet reassembly
//!
//! Pages are decoded on demand from a positional [`ByteReader`]. Packets that span
//! pages are stitched back together and labelled with the granule position of the
//! page they finish on. [`VorbisStream`] additionally validates the identification,
//! comment and setup headers before handing out audio packets.
//!
//! ```no_run
//! use oggdemux::{SeekReader, VorbisStream};
//!
//! # fn main() -> oggdemux::Result<()> {
//! let file = std::io::BufReader::new(std::fs::File::open("track.ogg")?);
//! let mut stream = VorbisStream::open(SeekReader::new(file))?;
//! while let Some(packet) = stream.next_packet()? {
//!     println!("{} bytes, granule {:?}", packet.len(), packet.granule_position());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod ogg;
pub mod utils;
pub mod vorbis;

pub use config::{SerialPolicy, StreamConfig};
pub use error::{Error, Result};
pub use ogg::page::decode_page;
pub use ogg::{Demuxer, Packet, Page, PageHeader, Segment};
pub use utils::io::{ByteReader, SeekReader};
pub use vorbis::{VorbisComment, VorbisHeaders, VorbisStream};
