//! Chunk counting (`spec.md` §4.F).

use crate::error::{ErrorCode, Result};
use crate::navigator::Navigator;
use crate::source::ByteSource;
use crate::FourCC;

impl<S: ByteSource> Navigator<S> {
    /// Counts the chunks in the current level. Returns `-1` on any
    /// critical error; a badly padded level-end ([`ErrorCode::Exdat`])
    /// is non-fatal and the count up to that point is still returned
    /// (also recorded in [`last_warning`](Self::last_warning)).
    pub fn count_chunks_in_level(&mut self) -> i64 {
        self.count_in_level(None)
    }

    /// As [`count_chunks_in_level`](Self::count_chunks_in_level), but
    /// tallying only chunks whose id matches `id`.
    pub fn count_chunks_in_level_with_id(&mut self, id: FourCC) -> i64 {
        self.count_in_level(Some(id))
    }

    fn count_in_level(&mut self, filter: Option<FourCC>) -> i64 {
        if self.seek_level_start().is_err() {
            return -1;
        }
        let mut count: i64 = 0;
        loop {
            let matches_filter = match filter {
                None => true,
                Some(want) => want.matches(&self.chunk_id().0),
            };
            if matches_filter {
                count += 1;
            }
            match self.seek_next_chunk() {
                Ok(()) => continue,
                Err(err) if err.code == ErrorCode::Eocl || err.code == ErrorCode::Exdat => {
                    return count
                }
                Err(_) => return -1,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::testing::hex_to_bytes;
    use crate::{FourCC, Navigator};

    fn two_chunk_wave() -> Vec<u8> {
        hex_to_bytes(
            "52494646 20000000 57415645 \
             666D7420 04000000 01020304 \
             64617461 08000000 1112131415161718",
        )
    }

    #[test]
    fn counts_all_chunks_in_level() {
        let mut nav = Navigator::open_mem(two_chunk_wave()).unwrap();
        assert_eq!(nav.count_chunks_in_level(), 2);
    }

    #[test]
    fn counts_only_matching_id() {
        let mut nav = Navigator::open_mem(two_chunk_wave()).unwrap();
        assert_eq!(
            nav.count_chunks_in_level_with_id(FourCC(*b"data")),
            1
        );
        assert_eq!(
            nav.count_chunks_in_level_with_id(FourCC(*b"JUNK")),
            0
        );
    }
}
