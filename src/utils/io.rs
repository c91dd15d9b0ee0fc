// Positional byte source and little-endian integer helpers
//
// Every read either fills the whole buffer or fails. There is no partial read and
// no implicit seek state on the caller's side: offsets are always absolute.

use std::io::{self, Read, Seek, SeekFrom};

/// Random-access byte source the page decoder reads from.
pub trait ByteReader {
    /// Fill `buf` with the bytes starting at absolute offset `pos`.
    ///
    /// Must fail (typically with `UnexpectedEof`) rather than return fewer bytes.
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> io::Result<()>;
}

impl<T: ByteReader + ?Sized> ByteReader for &mut T {
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_at(pos, buf)
    }
}

impl ByteReader for &[u8] {
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> io::Result<()> {
        read_slice_at(*self, pos, buf)
    }
}

impl ByteReader for Vec<u8> {
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> io::Result<()> {
        read_slice_at(self.as_slice(), pos, buf)
    }
}

fn read_slice_at(data: &[u8], pos: u64, buf: &mut [u8]) -> io::Result<()> {
    let start = usize::try_from(pos).map_err(|_| out_of_range(pos, buf.len()))?;
    let end = start
        .checked_add(buf.len())
        .filter(|&end| end <= data.len())
        .ok_or_else(|| out_of_range(pos, buf.len()))?;
    buf.copy_from_slice(&data[start..end]);
    Ok(())
}

fn out_of_range(pos: u64, len: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("read of {} bytes at offset {} past end of source", len, pos),
    )
}

/// Adapts any `Read + Seek` source (a `File`, a `BufReader`, a `Cursor`) to `ByteReader`.
#[derive(Debug)]
pub struct SeekReader<R> {
    inner: R,
}

impl<R: Read + Seek> SeekReader<R> {
    pub fn new(inner: R) -> Self {
        SeekReader { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteReader for SeekReader<R> {
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        self.inner.read_exact(buf)
    }
}

/// Read one byte at `*pos` and advance.
pub fn read_u8<R: ByteReader + ?Sized>(reader: &mut R, pos: &mut u64) -> io::Result<u8> {
    let mut buffer = [0u8; 1];
    reader.read_at(*pos, &mut buffer)?;
    *pos += 1;
    Ok(buffer[0])
}

/// Read little-endian 32-bit integer at `*pos` and advance.
pub fn read_le_u32<R: ByteReader + ?Sized>(reader: &mut R, pos: &mut u64) -> io::Result<u32> {
    let mut buffer = [0u8; 4];
    reader.read_at(*pos, &mut buffer)?;
    *pos += 4;
    Ok(u32::from_le_bytes(buffer))
}

/// Read little-endian signed 64-bit integer at `*pos` and advance.
pub fn read_le_i64<R: ByteReader + ?Sized>(reader: &mut R, pos: &mut u64) -> io::Result<i64> {
    let mut buffer = [0u8; 8];
    reader.read_at(*pos, &mut buffer)?;
    *pos += 8;
    Ok(i64::from_le_bytes(buffer))
}

/// Read `len` bytes at `*pos` and advance.
pub fn read_bytes<R: ByteReader + ?Sized>(
    reader: &mut R,
    pos: &mut u64,
    len: usize,
) -> io::Result<Vec<u8>> {
    let mut buffer = vec![0u8; len];
    reader.read_at(*pos, &mut buffer)?;
    *pos += len as u64;
    Ok(buffer)
}
