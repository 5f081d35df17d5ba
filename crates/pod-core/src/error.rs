//! Error kinds shared by the decode and schema-parse layers.

use core::fmt;

use crate::Kind;

#[cfg(feature = "std")]
use thiserror::Error;

/// Errors produced while decoding a header/value or schema-parsing an object.
///
/// This is deliberately smaller than the full surface of failures a codec
/// could report: the cheap, hot-path `is_<kind>`/`get_<kind>` accessors never
/// construct one of these — they return `Option`/`bool` per §7's "accessors
/// never abort" policy. `PodError` is reserved for the places the spec calls
/// out as needing a causally distinct result: decoding a header at all, and
/// the structured parser's missing-key / wrong-object-type outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum PodError {
    /// Fewer bytes were available than the value's header/body declares.
    #[cfg_attr(feature = "std", error("malformed pod: need {needed} bytes, have {available}"))]
    Malformed {
        /// Bytes required to decode the header or declared body.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// A type id outside the closed [`Kind`] set.
    #[cfg_attr(feature = "std", error("unknown pod type id {0}"))]
    UnknownKind(u32),

    /// A string value's body does not end in a NUL byte.
    #[cfg_attr(feature = "std", error("string value is not NUL-terminated"))]
    UnterminatedString,

    /// A typed accessor's predicate failed: wrong type id or too-small body.
    #[cfg_attr(feature = "std", error("kind mismatch: expected {expected:?}, found {found:?} (body {body_size} bytes)"))]
    KindMismatch {
        /// The kind the caller expected.
        expected: Kind,
        /// The kind actually present.
        found: Kind,
        /// The actual body size.
        body_size: u32,
    },

    /// A required property key was absent from an object during schema parse.
    #[cfg_attr(feature = "std", error("missing required property key {0}"))]
    MissingKey(u32),

    /// An object's declared type id did not match the template's expectation.
    #[cfg_attr(feature = "std", error("wrong object type: expected {expected}, found {found}"))]
    WrongObjectType {
        /// The type id the template required.
        expected: u32,
        /// The type id actually present on the object.
        found: u32,
    },

    /// `pop()` called with no matching open frame.
    #[cfg_attr(feature = "std", error("no open frame to close"))]
    NoOpenFrame,

    /// `prop()`/`control()` called while not inside the matching frame kind.
    #[cfg_attr(feature = "std", error("prop()/control() called outside its matching frame"))]
    NotInFrame,
}

#[cfg(not(feature = "std"))]
impl fmt::Display for PodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodError::Malformed { needed, available } => {
                write!(f, "malformed pod: need {needed} bytes, have {available}")
            }
            PodError::UnknownKind(raw) => write!(f, "unknown pod type id {raw}"),
            PodError::UnterminatedString => write!(f, "string value is not NUL-terminated"),
            PodError::KindMismatch { expected, found, body_size } => write!(
                f,
                "kind mismatch: expected {expected:?}, found {found:?} (body {body_size} bytes)"
            ),
            PodError::MissingKey(key) => write!(f, "missing required property key {key}"),
            PodError::WrongObjectType { expected, found } => {
                write!(f, "wrong object type: expected {expected}, found {found}")
            }
            PodError::NoOpenFrame => write!(f, "no open frame to close"),
            PodError::NotInFrame => write!(f, "prop()/control() called outside its matching frame"),
        }
    }
}

/// Convenience alias for results carrying a [`PodError`].
pub type PodResult<T> = Result<T, PodError>;
