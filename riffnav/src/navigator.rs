//! The navigator: the core state machine (`spec.md` §4.D).

use tracing::instrument;

use crate::error::{ErrorCode, Result, RiffError};
use crate::header::{read_u32_le, ListFrame, CHUNK_HEADER_LEN, OUTER_HEADER_LEN};
use crate::source::{ByteSource, FileSource, MemorySource};
use crate::stack::{LevelStack, DEFAULT_CAPACITY};
use crate::FourCC;

const RIFF_ID: [u8; 4] = *b"RIFF";
const LIST_ID: [u8; 4] = *b"LIST";
const BW64_ID: [u8; 4] = *b"BW64";
const DS64_ID: [u8; 4] = *b"ds64";

pub(crate) fn is_list_id(id: FourCC) -> bool {
    id.matches(&RIFF_ID) || id.matches(&LIST_ID) || id.matches(&BW64_ID)
}

/// A replaceable diagnostic sink, invoked for critical errors and for
/// [`ErrorCode::Exdat`] (`spec.md` §7/§9). Install `None` to silence it.
pub type DiagnosticHook = Box<dyn FnMut(&RiffError) + Send>;

fn default_diagnostic_hook() -> DiagnosticHook {
    Box::new(|err: &RiffError| tracing::warn!("{err}"))
}

/// A navigable handle over a RIFF or BW64 chunk tree.
///
/// Maintains "current chunk" plus a stack of enclosing list chunks
/// (`spec.md` §3) and translates every navigation call into bounded
/// reads and seeks against the wrapped [`ByteSource`]. See the module
/// docs for the full operation catalogue.
pub struct Navigator<S> {
    source: S,
    file_size: u64,

    pos: u64,

    cl: ListFrame,

    c_id: FourCC,
    c_size: u64,
    c_pos_start: u64,
    c_pos: u64,
    pad: u8,

    stack: LevelStack,
    diagnostic: Option<DiagnosticHook>,
    last_warning: Option<ErrorCode>,
}

impl<S: core::fmt::Debug> core::fmt::Debug for Navigator<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Navigator")
            .field("source", &self.source)
            .field("file_size", &self.file_size)
            .field("pos", &self.pos)
            .field("cl", &self.cl)
            .field("c_id", &self.c_id)
            .field("c_size", &self.c_size)
            .field("c_pos_start", &self.c_pos_start)
            .field("c_pos", &self.c_pos)
            .field("pad", &self.pad)
            .field("depth", &self.stack.depth())
            .field("last_warning", &self.last_warning)
            .finish()
    }
}

impl Navigator<MemorySource<Vec<u8>>> {
    /// Opens a handle over an owned in-memory buffer.
    pub fn open_mem(data: Vec<u8>) -> Result<Self> {
        let size = data.len() as u64;
        Self::open(MemorySource::new(data), size, DEFAULT_CAPACITY)
    }
}

impl<R: std::io::Read + std::io::Seek> Navigator<FileSource<R>> {
    /// Opens a handle over a file (or any `Read + Seek`), whose current
    /// position becomes the navigator's logical zero.
    pub fn open_file(reader: R, size: u64) -> Result<Self> {
        let source = FileSource::new(reader, size).map_err(|err| {
            RiffError::new(ErrorCode::Access).with_message(err.to_string())
        })?;
        Self::open(source, size, DEFAULT_CAPACITY)
    }
}

impl<S: ByteSource> Navigator<S> {
    /// Opens a handle over any caller-supplied [`ByteSource`].
    pub fn open_custom(source: S) -> Result<Self> {
        let size = source.size();
        Self::open(source, size, DEFAULT_CAPACITY)
    }

    /// As [`open_custom`](Self::open_custom), but pre-sizing the level
    /// stack for deeply nested input instead of the default capacity.
    pub fn with_capacity(source: S, initial_stack_capacity: usize) -> Result<Self> {
        let size = source.size();
        Self::open(source, size, initial_stack_capacity)
    }

    #[instrument(skip(source), level = "trace")]
    fn open(mut source: S, file_size: u64, stack_capacity: usize) -> Result<Self> {
        let mut hdr = [0u8; OUTER_HEADER_LEN as usize];
        if source.read(&mut hdr) != hdr.len() {
            return Err(RiffError::new(ErrorCode::Eof).at(0));
        }
        let outer_id = FourCC::from_bytes(&hdr[0..4]);
        let declared_size = read_u32_le(&hdr[4..8]);
        let outer_type = FourCC::from_bytes(&hdr[8..12]);

        let accepts_bw64 = cfg!(feature = "bw64") && outer_id.matches(&BW64_ID);
        if !(outer_id.matches(&RIFF_ID) || accepts_bw64) {
            return Err(RiffError::new(ErrorCode::Illid).at(0).with_id(outer_id));
        }
        if !outer_type.is_printable() {
            return Err(RiffError::new(ErrorCode::Illid)
                .at(8)
                .with_id(outer_type));
        }

        let cl = ListFrame {
            id: outer_id,
            size: u64::from(declared_size),
            list_type: outer_type,
            pos_start: 0,
        };

        let mut nav = Navigator {
            source,
            file_size,
            pos: OUTER_HEADER_LEN,
            cl,
            c_id: FourCC(*b"\0\0\0\0"),
            c_size: 0,
            c_pos_start: OUTER_HEADER_LEN,
            c_pos: 0,
            pad: 0,
            stack: LevelStack::with_capacity(stack_capacity),
            diagnostic: Some(default_diagnostic_hook()),
            last_warning: None,
        };

        nav.read_chunk_header_at(OUTER_HEADER_LEN)?;

        #[cfg(feature = "bw64")]
        if declared_size == 0xFFFF_FFFF && nav.c_id.matches(&DS64_ID) {
            nav.apply_ds64_override()?;
        }

        let expected_total = nav.cl.size + CHUNK_HEADER_LEN;
        if file_size > 0 && file_size != expected_total {
            if file_size > expected_total {
                let warn = RiffError::new(ErrorCode::Exdat).at(expected_total);
                nav.record_warning(warn);
            } else {
                return Err(RiffError::new(ErrorCode::Eof).at(file_size));
            }
        }

        Ok(nav)
    }

    #[cfg(feature = "bw64")]
    fn apply_ds64_override(&mut self) -> Result<()> {
        if self.c_size < 8 {
            return Err(RiffError::new(ErrorCode::Icsize)
                .at(self.c_pos_start)
                .with_id(self.c_id));
        }
        let mut buf = [0u8; 8];
        let n = self.source.read(&mut buf);
        if n != buf.len() {
            return Err(RiffError::new(ErrorCode::Eof).at(self.pos));
        }
        self.pos += 8;
        let low = u64::from(read_u32_le(&buf[0..4]));
        let high = u64::from(read_u32_le(&buf[4..8]));
        self.cl.size = low | (high << 32);

        // The peek above is transparent to the caller: reposition at the
        // ds64 chunk's own data start, as if nothing had been consumed.
        self.pos = self.c_pos_start + CHUNK_HEADER_LEN;
        self.c_pos = 0;
        Ok(())
    }

    fn record_warning(&mut self, err: RiffError) {
        self.last_warning = Some(err.code);
        if let Some(hook) = self.diagnostic.as_mut() {
            hook(&err);
        }
    }

    fn record_critical(&mut self, err: &RiffError) {
        if let Some(hook) = self.diagnostic.as_mut() {
            hook(err);
        }
    }

    /// Reads an 8-byte chunk header (id + size) at absolute position
    /// `at`, installs it as the current chunk, and cross-checks it
    /// against the current list frame and the known file size
    /// (`spec.md` §4.B).
    fn read_chunk_header_at(&mut self, at: u64) -> Result<()> {
        if self.source.seek(at) != at {
            let err = RiffError::new(ErrorCode::Eof).at(at);
            self.record_critical(&err);
            return Err(err);
        }
        let mut hdr = [0u8; CHUNK_HEADER_LEN as usize];
        if self.source.read(&mut hdr) != hdr.len() {
            let err = RiffError::new(ErrorCode::Eof).at(at);
            self.record_critical(&err);
            return Err(err);
        }
        let id = FourCC::from_bytes(&hdr[0..4]);
        if !id.is_printable() {
            let err = RiffError::new(ErrorCode::Illid).at(at).with_id(id);
            self.record_critical(&err);
            return Err(err);
        }
        let size = u64::from(read_u32_le(&hdr[4..8]));
        let pad = (size & 1) as u8;

        if at + CHUNK_HEADER_LEN + size + u64::from(pad) > self.cl.end() {
            let err = RiffError::new(ErrorCode::Icsize).at(at).with_id(id);
            self.record_critical(&err);
            return Err(err);
        }
        if self.file_size > 0 && at + CHUNK_HEADER_LEN + size > self.file_size {
            let err = RiffError::new(ErrorCode::Eof).at(at).with_id(id);
            self.record_critical(&err);
            return Err(err);
        }

        self.c_id = id;
        self.c_size = size;
        self.c_pos_start = at;
        self.c_pos = 0;
        self.pad = pad;
        self.pos = at + CHUNK_HEADER_LEN;
        Ok(())
    }

    // -- introspection -----------------------------------------------

    /// The current chunk's id.
    #[must_use]
    pub fn chunk_id(&self) -> FourCC {
        self.c_id
    }

    /// The current chunk's declared data size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> u64 {
        self.c_size
    }

    /// The current offset into the current chunk's data (`0..=chunk_size()`).
    #[must_use]
    pub fn chunk_pos(&self) -> u64 {
        self.c_pos
    }

    /// The enclosing list chunk's id.
    #[must_use]
    pub fn list_id(&self) -> FourCC {
        self.cl.id
    }

    /// The enclosing list chunk's declared data size.
    #[must_use]
    pub fn list_size(&self) -> u64 {
        self.cl.size
    }

    /// The enclosing list chunk's sub-type (form type).
    #[must_use]
    pub fn list_type(&self) -> FourCC {
        self.cl.list_type
    }

    /// Current nesting depth; `0` means the current list frame is the
    /// file's outer RIFF/BW64 chunk.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// The stack of list frames enclosing the current level, outermost
    /// first. Does not include the current level itself — see
    /// [`list_id`](Self::list_id) and friends for that.
    #[must_use]
    pub fn levels(&self) -> &[ListFrame] {
        self.stack.as_slice()
    }

    /// The non-fatal warning (currently only ever [`ErrorCode::Exdat`])
    /// recorded by the most recently completed call to
    /// [`seek_next_chunk`](Self::seek_next_chunk) (directly, or via
    /// [`level_validate`](Self::level_validate),
    /// [`file_validate`](Self::file_validate),
    /// [`count_chunks_in_level`](Self::count_chunks_in_level), or
    /// [`count_chunks_in_level_with_id`](Self::count_chunks_in_level_with_id)),
    /// if any. Cleared at the start of every such call, so it never
    /// echoes a warning from an earlier, unrelated call.
    #[must_use]
    pub fn last_warning(&self) -> Option<ErrorCode> {
        self.last_warning
    }

    /// Installs a replacement diagnostic sink, or `None` to silence it
    /// entirely (`spec.md` §9: "implementations MUST allow disabling it
    /// entirely").
    pub fn set_diagnostic_hook(&mut self, hook: Option<DiagnosticHook>) {
        self.diagnostic = hook;
    }

    // -- navigation ----------------------------------------------------

    /// Reads up to `dst.len()` bytes from the current chunk's data,
    /// clamped to what remains (`c_size - c_pos`). Never exposes the
    /// pad byte. Returns the number of bytes actually read.
    pub fn read_in_chunk(&mut self, dst: &mut [u8]) -> usize {
        let remaining = self.c_size - self.c_pos;
        let want = (dst.len() as u64).min(remaining) as usize;
        if want == 0 {
            return 0;
        }
        let n = self.source.read(&mut dst[..want]);
        self.pos += n as u64;
        self.c_pos += n as u64;
        n
    }

    /// Seeks within the current chunk's data to `offset`
    /// (`0..=chunk_size()` inclusive; seeking exactly to `chunk_size()`
    /// is legal and the next read returns `0`).
    pub fn seek_in_chunk(&mut self, offset: u64) -> Result<()> {
        if offset > self.c_size {
            return Err(RiffError::new(ErrorCode::Eoc).at(self.pos));
        }
        self.pos = self.c_pos_start + CHUNK_HEADER_LEN + offset;
        self.c_pos = offset;
        self.source.seek(self.pos);
        Ok(())
    }

    /// Seeks to the current chunk's data offset `0`.
    pub fn seek_chunk_start(&mut self) {
        self.pos = self.c_pos_start + CHUNK_HEADER_LEN;
        self.c_pos = 0;
        self.source.seek(self.pos);
    }

    /// Advances to the next sibling chunk in the current level.
    ///
    /// Returns [`ErrorCode::Eocl`] when the level is exhausted exactly
    /// at its declared boundary, or [`ErrorCode::Exdat`] (non-fatal)
    /// when between 1 and 7 stray trailing bytes remain — too few for
    /// another header, but not a clean boundary either.
    ///
    /// Clears [`last_warning`](Self::last_warning) at the start of the
    /// call, so a clean call always leaves it `None` rather than
    /// echoing a warning from some earlier call.
    #[instrument(skip(self), level = "trace")]
    pub fn seek_next_chunk(&mut self) -> Result<()> {
        self.last_warning = None;
        let next = self.c_pos_start + CHUNK_HEADER_LEN + self.c_size + u64::from(self.pad);
        let list_end = self.cl.end();
        if next + CHUNK_HEADER_LEN > list_end {
            let remaining = list_end.saturating_sub(next);
            if remaining == 0 {
                return Err(RiffError::new(ErrorCode::Eocl).at(next));
            }
            let warn = RiffError::new(ErrorCode::Exdat).at(next);
            self.record_warning(warn.clone());
            return Err(warn);
        }
        self.read_chunk_header_at(next)
    }

    /// Seeks to and reads the header of the current level's first
    /// chunk (just past the list's 4-byte sub-type).
    pub fn seek_level_start(&mut self) -> Result<()> {
        self.read_chunk_header_at(self.cl.data_start())
    }

    /// Returns to the outermost (depth `0`) level and its first chunk,
    /// discarding all intermediate frames.
    #[instrument(skip(self), level = "trace")]
    pub fn rewind(&mut self) -> Result<()> {
        if let Some(outer) = self.stack.first() {
            self.cl = outer;
            self.stack.clear();
        }
        self.seek_level_start()
    }

    /// Steps into the current chunk's sublist, making its children the
    /// new current level. Legal only when [`chunk_id`](Self::chunk_id)
    /// is `"RIFF"`, `"LIST"`, or `"BW64"` and the chunk is at least 4
    /// bytes (room for the sub-type).
    #[instrument(skip(self), level = "trace")]
    pub fn seek_level_sub(&mut self) -> Result<()> {
        if !is_list_id(self.c_id) {
            return Err(RiffError::new(ErrorCode::Illid)
                .at(self.c_pos_start)
                .with_id(self.c_id));
        }
        if self.c_size < 4 {
            return Err(RiffError::new(ErrorCode::Icsize)
                .at(self.c_pos_start)
                .with_id(self.c_id));
        }
        if self.c_pos != 0 {
            self.seek_chunk_start();
        }

        let mut buf = [0u8; 4];
        if self.source.read(&mut buf) != 4 {
            return Err(RiffError::new(ErrorCode::Eof).at(self.pos));
        }
        self.pos += 4;
        self.c_pos += 4;
        let sub_type = FourCC::from_bytes(&buf);
        if !sub_type.is_printable() {
            return Err(RiffError::new(ErrorCode::Illid)
                .at(self.pos - 4)
                .with_id(sub_type));
        }

        let entered = ListFrame {
            id: self.c_id,
            size: self.c_size,
            list_type: sub_type,
            pos_start: self.c_pos_start,
        };
        self.stack.push(self.cl);
        self.cl = entered;

        self.read_chunk_header_at(self.cl.data_start())
    }

    /// Steps back out to the parent level. Returns `true` if a level
    /// was popped, `false` if already at depth `0` — `spec.md` §4.D
    /// calls this a "non-critical already-at-top indicator" rather
    /// than an error, so it is modeled as a plain boolean here instead
    /// of inventing an error code.
    ///
    /// Position is deliberately left unchanged: the caller is now
    /// notionally inside the parent's data, just past the sublist they
    /// exited.
    #[instrument(skip(self), level = "trace")]
    pub fn level_parent(&mut self) -> Result<bool> {
        let Some(parent) = self.stack.pop() else {
            return Ok(false);
        };
        let exited = self.cl;
        self.cl = parent;
        self.c_id = exited.id;
        self.c_size = exited.size;
        self.c_pos_start = exited.pos_start;
        self.pad = (self.c_size & 1) as u8;
        self.c_pos = self
            .pos
            .saturating_sub(self.c_pos_start + CHUNK_HEADER_LEN);
        Ok(true)
    }

    /// `level_parent` then [`seek_chunk_start`](Self::seek_chunk_start).
    pub fn seek_level_parent_start(&mut self) -> Result<bool> {
        let popped = self.level_parent()?;
        if popped {
            self.seek_chunk_start();
        }
        Ok(popped)
    }

    /// `level_parent` then [`seek_next_chunk`](Self::seek_next_chunk).
    pub fn seek_level_parent_next(&mut self) -> Result<bool> {
        let popped = self.level_parent()?;
        if popped {
            self.seek_next_chunk()?;
        }
        Ok(popped)
    }
}
