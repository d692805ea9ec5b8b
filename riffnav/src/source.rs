//! Pluggable byte source abstraction (`spec.md` §4.A) and the two
//! built-in adapters (`spec.md` §4.H).

use std::io::{Read, Seek, SeekFrom};

/// A source of bytes the navigator can read from and seek within.
///
/// Deliberately narrower than [`std::io::Read`] + [`std::io::Seek`]:
/// `read` never fails (a short read just means end-of-source) and
/// `seek` never fails (an out-of-range target simply makes the next
/// read short). This mirrors the two-function-pointer seam `spec.md`
/// §4.A and §9 specify, so a caller can back the navigator with a
/// file, a memory buffer, or anything else without the navigator ever
/// needing to know which.
pub trait ByteSource {
    /// Reads up to `dst.len()` bytes at the current logical position
    /// and advances it. Returns the number of bytes actually read;
    /// fewer than requested signals end-of-source.
    fn read(&mut self, dst: &mut [u8]) -> usize;

    /// Moves the logical position to `pos` and returns the position
    /// actually seeked to.
    fn seek(&mut self, pos: u64) -> u64;

    /// Total size of the source in bytes, or `0` if unknown.
    fn size(&self) -> u64;
}

/// Wraps any `Read + Seek` (typically a buffered [`std::fs::File`]).
///
/// The stream's position at construction time becomes the navigator's
/// logical zero, so RIFF data embedded inside a larger file (e.g. a
/// container format carrying a WAVE payload) can be navigated without
/// the caller pre-splitting the file.
#[derive(Debug)]
pub struct FileSource<R> {
    inner: R,
    base: u64,
    size: u64,
}

impl<R: Read + Seek> FileSource<R> {
    /// Wraps `inner`, treating its current position as offset zero.
    ///
    /// `size` is the total length of the RIFF stream from that zero
    /// point (`0` if unknown); pass the file's remaining length when
    /// known to enable the stricter cross-checks `spec.md` §4.D's
    /// `open` performs.
    pub fn new(mut inner: R, size: u64) -> std::io::Result<Self> {
        let base = inner.stream_position()?;
        Ok(FileSource { inner, base, size })
    }
}

impl<R: Read + Seek> ByteSource for FileSource<R> {
    fn read(&mut self, dst: &mut [u8]) -> usize {
        let mut total = 0;
        while total < dst.len() {
            match self.inner.read(&mut dst[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(_) => break,
            }
        }
        total
    }

    fn seek(&mut self, pos: u64) -> u64 {
        match self.inner.seek(SeekFrom::Start(self.base + pos)) {
            Ok(abs) => abs - self.base,
            Err(_) => pos,
        }
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// Wraps an in-memory byte buffer.
///
/// `seek` is pure bookkeeping — there is nothing that can fail — and a
/// target beyond the buffer simply makes the next `read` return `0`.
#[derive(Debug)]
pub struct MemorySource<B> {
    data: B,
    pos: usize,
}

impl<B: AsRef<[u8]>> MemorySource<B> {
    /// Wraps `data`, positioned at offset zero.
    pub fn new(data: B) -> Self {
        MemorySource { data, pos: 0 }
    }
}

impl<B: AsRef<[u8]>> ByteSource for MemorySource<B> {
    fn read(&mut self, dst: &mut [u8]) -> usize {
        let bytes = self.data.as_ref();
        if self.pos >= bytes.len() {
            return 0;
        }
        let available = &bytes[self.pos..];
        let n = dst.len().min(available.len());
        dst[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        n
    }

    fn seek(&mut self, pos: u64) -> u64 {
        self.pos = pos.min(usize::MAX as u64) as usize;
        pos
    }

    fn size(&self) -> u64 {
        self.data.as_ref().len() as u64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn memory_source_short_read_at_end() {
        let mut src = MemorySource::new(vec![1u8, 2, 3, 4]);
        let mut buf = [0u8; 4];
        assert_eq!(src.read(&mut buf), 4);
        assert_eq!(src.read(&mut buf), 0);
    }

    #[test]
    fn memory_source_seek_past_end_yields_short_read() {
        let mut src = MemorySource::new(vec![1u8, 2, 3, 4]);
        src.seek(100);
        let mut buf = [0u8; 4];
        assert_eq!(src.read(&mut buf), 0);
    }

    #[test]
    fn memory_source_reports_size() {
        let src = MemorySource::new(vec![0u8; 10]);
        assert_eq!(src.size(), 10);
    }

    #[test]
    fn file_source_embeds_logical_zero() {
        use std::io::Cursor;
        let mut cursor = Cursor::new(vec![0xAAu8, 0xBB, 1, 2, 3, 4]);
        cursor.seek(SeekFrom::Start(2)).unwrap();
        let mut src = FileSource::new(cursor, 4).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(src.read(&mut buf), 4);
        assert_eq!(buf, [1, 2, 3, 4]);
    }
}
