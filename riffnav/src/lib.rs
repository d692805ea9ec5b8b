//! A navigable reader for RIFF and BW64 chunk containers.
//!
//! RIFF files — the shape underneath WAV, AVI, DLS, ANI, and Standard
//! MIDI Files, among others — are trees of tagged, length-prefixed
//! chunks. This crate does not know or care what any particular chunk
//! *means*; it only lets a caller walk the tree, read bytes out of
//! whichever chunk is "current", validate structural integrity, and
//! get back precise errors with file positions when something doesn't
//! add up.
//!
//! The entry point is [`Navigator`], opened over a [`ByteSource`] —
//! either the bundled [`FileSource`]/[`MemorySource`] adapters or a
//! caller-supplied implementation:
//!
//! ```
//! use riffnav::Navigator;
//!
//! # fn build_fixture() -> Vec<u8> {
//! #     let mut v = Vec::new();
//! #     v.extend_from_slice(b"RIFF");
//! #     v.extend_from_slice(&28u32.to_le_bytes());
//! #     v.extend_from_slice(b"WAVE");
//! #     v.extend_from_slice(b"fmt ");
//! #     v.extend_from_slice(&4u32.to_le_bytes());
//! #     v.extend_from_slice(&[1, 2, 3, 4]);
//! #     v.extend_from_slice(b"data");
//! #     v.extend_from_slice(&8u32.to_le_bytes());
//! #     v.extend_from_slice(&[0; 8]);
//! #     v
//! # }
//! let data = build_fixture();
//! let mut nav = Navigator::open_mem(data)?;
//! assert_eq!(nav.chunk_id().to_string(), "fmt ");
//! nav.seek_next_chunk()?;
//! assert_eq!(nav.chunk_id().to_string(), "data");
//! # Ok::<(), riffnav::RiffError>(())
//! ```

mod count;
mod error;
mod fourcc;
mod header;
mod navigator;
mod source;
mod stack;
pub(crate) mod testing;
mod validate;

pub use error::{ErrorCode, Result, RiffError};
pub use fourcc::FourCC;
pub use header::ListFrame;
pub use navigator::{DiagnosticHook, Navigator};
pub use source::{ByteSource, FileSource, MemorySource};
