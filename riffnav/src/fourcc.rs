//! Four-byte chunk and form-type identifiers.

use core::fmt::{Debug, Display, Formatter};

/// A RIFF "FourCC": exactly four bytes, conventionally printable ASCII.
///
/// Used for chunk ids (`"RIFF"`, `"LIST"`, `"fmt "`, ...) and list
/// sub-types (`"WAVE"`, `"INFO"`, ...). Equality and hashing are
/// byte-exact; nothing normalizes trailing space padding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Build a `FourCC` from a byte slice of the correct length.
    pub(crate) fn from_bytes(b: &[u8]) -> Self {
        let mut id = [0u8; 4];
        id.copy_from_slice(&b[..4]);
        FourCC(id)
    }

    /// True if every byte is in the printable ASCII range `[0x20, 0x7E]`.
    ///
    /// This is the check `spec.md` §3 invariant 5 and the `ILLID` error
    /// require: ids are allowed to contain trailing spaces (`"fmt "`)
    /// but not control characters or high-bit bytes.
    pub fn is_printable(&self) -> bool {
        self.0.iter().all(|&b| (0x20..=0x7E).contains(&b))
    }

    /// Compare against a `&[u8; 4]` literal, e.g. `id == b"RIFF"`.
    pub fn matches(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(value: &[u8; 4]) -> Self {
        FourCC(*value)
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(value: [u8; 4]) -> Self {
        FourCC(value)
    }
}

impl Display for FourCC {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl Debug for FourCC {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "FourCC(*b\"{self}\"={:?})", &self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_and_debug() {
        let f = FourCC(*b"fmt ");
        assert_eq!(f.to_string(), "fmt ");
        assert_eq!(format!("{f:?}"), r#"FourCC(*b"fmt "=[102, 109, 116, 32])"#);
    }

    #[test]
    fn printable() {
        assert!(FourCC(*b"RIFF").is_printable());
        assert!(FourCC(*b"fmt ").is_printable());
        assert!(!FourCC([0x00, b'I', b'D', b' ']).is_printable());
        assert!(!FourCC([0x7F, b'I', b'D', b' ']).is_printable());
    }

    #[test]
    fn matches_literal() {
        let f = FourCC(*b"LIST");
        assert!(f.matches(b"LIST"));
        assert!(!f.matches(b"RIFF"));
    }
}
