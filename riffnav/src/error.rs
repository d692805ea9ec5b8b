//! Error taxonomy (`spec.md` §7) and its stringifier.

use core::fmt::{self, Display, Formatter};
use std::error;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::FourCC;

/// Enumerated error codes, in the order and numbering `spec.md` §7
/// specifies. Codes `>= ErrorCode::Illid` are critical: the handle's
/// state is undefined afterward and it should be reopened or dropped.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum ErrorCode {
    /// Success.
    None = 0,
    /// Attempt to read/seek past the current chunk's data.
    Eoc = 1,
    /// No more chunks in this level.
    Eocl = 2,
    /// Non-conforming trailing bytes at a level or file end; ignored.
    Exdat = 3,
    /// A FourCC contained non-printable bytes, or the outer id was wrong.
    Illid = 4,
    /// A declared chunk size exceeds its parent or the file.
    Icsize = 5,
    /// The byte source ended before the declared structure did.
    Eof = 6,
    /// Reserved for byte-source access failures.
    Access = 7,
    /// The handle is null/unopened (not applicable to a safe Rust API,
    /// retained so the taxonomy matches `spec.md` exactly).
    InvalidHandle = 8,
}

impl ErrorCode {
    /// Whether this code leaves navigator state undefined (`spec.md` §7).
    #[must_use]
    pub fn is_critical(self) -> bool {
        (self as u8) >= (ErrorCode::Illid as u8)
    }

    /// Fixed, code-only message text (the "stringifier" from `spec.md` §4.G).
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::None => "success",
            ErrorCode::Eoc => "attempt to read/seek past current chunk data",
            ErrorCode::Eocl => "no more chunks in this level",
            ErrorCode::Exdat => "non-conforming trailing bytes, ignored",
            ErrorCode::Illid => "illegal or unexpected chunk id",
            ErrorCode::Icsize => "chunk size exceeds its parent or the file",
            ErrorCode::Eof => "byte source ended before declared structure did",
            ErrorCode::Access => "byte source access failure",
            ErrorCode::InvalidHandle => "handle is unopened or invalid",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// An error returned by a [`Navigator`](crate::Navigator) operation.
///
/// Carries the file position involved (when known) and, for id-related
/// errors, the offending [`FourCC`], so callers can report precise
/// locations per `spec.md` §1's "report precise errors with file
/// positions".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiffError {
    /// The taxonomy code.
    pub code: ErrorCode,
    /// Absolute byte position the error was detected at, if applicable.
    pub pos: Option<u64>,
    /// The offending chunk/list id, if the error concerns one.
    pub id: Option<FourCC>,
    /// Free-text detail beyond the code's fixed message, e.g. the
    /// underlying I/O error text for [`ErrorCode::Access`].
    pub message: Option<String>,
}

impl RiffError {
    pub(crate) fn new(code: ErrorCode) -> Self {
        RiffError {
            code,
            pos: None,
            id: None,
            message: None,
        }
    }

    pub(crate) fn at(mut self, pos: u64) -> Self {
        self.pos = Some(pos);
        self
    }

    pub(crate) fn with_id(mut self, id: FourCC) -> Self {
        self.id = Some(id);
        self
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether this error leaves navigator state undefined.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.code.is_critical()
    }
}

impl Display for RiffError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code.message())?;
        if let Some(id) = self.id {
            write!(f, " (id={id:?})")?;
        }
        if let Some(pos) = self.pos {
            write!(f, " at byte {pos}")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl error::Error for RiffError {}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, RiffError>;
