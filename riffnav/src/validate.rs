//! Structural validation (`spec.md` §4.E).

use crate::error::{ErrorCode, Result};
use crate::navigator::{is_list_id, Navigator};
use crate::source::ByteSource;

impl<S: ByteSource> Navigator<S> {
    /// Walks every chunk in the current level, surfacing the first
    /// critical error. A clean end of level ([`ErrorCode::Eocl`]) or a
    /// badly padded one ([`ErrorCode::Exdat`]) both count as success.
    pub fn level_validate(&mut self) -> Result<()> {
        self.seek_level_start()?;
        loop {
            match self.seek_next_chunk() {
                Ok(()) => continue,
                Err(err) if !err.is_critical() => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    /// Walks the whole tree depth-first from the top, stepping into
    /// every list chunk and back out, returning the first critical
    /// error encountered anywhere.
    pub fn file_validate(&mut self) -> Result<()> {
        self.rewind()?;
        self.validate_level()
    }

    fn validate_level(&mut self) -> Result<()> {
        loop {
            if is_list_id(self.chunk_id()) {
                self.seek_level_sub()?;
                self.validate_level()?;
                self.level_parent()?;
            }
            match self.seek_next_chunk() {
                Ok(()) => continue,
                Err(err) if !err.is_critical() => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::testing::hex_to_bytes;
    use crate::Navigator;

    #[test]
    fn validates_two_sibling_chunks() {
        // RIFF 32 WAVE / fmt  4 <4 bytes> / data 8 <8 bytes>
        let data = hex_to_bytes(
            "52494646 20000000 57415645 \
             666D7420 04000000 01020304 \
             64617461 08000000 1112131415161718",
        );
        let mut nav = Navigator::open_mem(data).unwrap();
        nav.level_validate().unwrap();
    }

    #[test]
    fn file_validate_descends_into_nested_list() {
        // RIFF 36 AVI_ / LIST 24 hdrl / avih 12 <12 bytes>
        let data = hex_to_bytes(
            "52494646 24000000 41564920 \
             4C495354 18000000 68647220 \
             61766968 0C000000 000102030405060708090A0B",
        );
        let mut nav = Navigator::open_mem(data).unwrap();
        nav.file_validate().unwrap();
    }

    #[test]
    fn detects_size_exceeding_parent() {
        // RIFF 20 XXXX / oops 9999 (declared size larger than remaining space)
        let data = hex_to_bytes("52494646 14000000 58585858 6F6F7073 0F270000");
        let err = Navigator::open_mem(data).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::Icsize);
    }
}
