// Vorbis comment header body
//
// Layout after the 7-byte packet preamble (0x03 "vorbis"):
// - vendor length (u32 LE) + vendor string
// - comment count (u32 LE)
// - per comment: length (u32 LE) + "FIELD=value"
// - framing bit (ignored)

use encoding_rs::UTF_8;
use serde::Serialize;

use crate::error::{Error, Result};

/// Vorbis comment structure
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct VorbisComment {
    pub vendor: String,
    pub comments: Vec<(String, String)>,
}

impl VorbisComment {
    /// Parse the comment body, i.e. the comment packet without its preamble.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut body = Body { data, pos: 0 };

        let vendor_length = body.read_u32()? as usize;
        let vendor = decode(body.take(vendor_length)?);

        let comment_count = body.read_u32()? as usize;
        // Each comment needs at least its 4-byte length prefix.
        if comment_count > body.remaining() / 4 {
            return Err(Error::format(format!(
                "comment count {} exceeds header size",
                comment_count
            )));
        }

        let mut comments = Vec::with_capacity(comment_count);
        for _ in 0..comment_count {
            let comment_length = body.read_u32()? as usize;
            let comment = decode(body.take(comment_length)?);

            // Parse comment (format: FIELD=value)
            if let Some((field, value)) = comment.split_once('=') {
                comments.push((field.to_string(), value.to_string()));
            }
        }

        Ok(VorbisComment { vendor, comments })
    }

    /// Get a comment value by field name
    pub fn get(&self, field: &str) -> Option<&String> {
        self.comments
            .iter()
            .find(|(f, _)| f.eq_ignore_ascii_case(field))
            .map(|(_, v)| v)
    }
}

/// Common Vorbis comment field names
pub struct VorbisFields;
impl VorbisFields {
    pub const TITLE: &'static str = "TITLE";
    pub const ARTIST: &'static str = "ARTIST";
    pub const ALBUM: &'static str = "ALBUM";
    pub const DATE: &'static str = "DATE";
    pub const TRACKNUMBER: &'static str = "TRACKNUMBER";
    pub const GENRE: &'static str = "GENRE";
}

fn decode(bytes: &[u8]) -> String {
    UTF_8.decode_without_bom_handling(bytes).0.into_owned()
}

struct Body<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Body<'a> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::format("comment header truncated"));
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
