//! The closed catalogue of POD value kinds.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A POD value's type id.
///
/// This is a closed set: every value on the wire carries one of these in its
/// header, and no other type ids are valid. Unknown type ids decode to
/// [`crate::PodError::UnknownKind`] rather than a catch-all variant, so a
/// reader never silently treats foreign data as a compatible kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum Kind {
    /// Absent/null sentinel. Zero body size.
    None = 0,
    /// `0` or `1`, stored in a 4-byte body.
    Bool = 1,
    /// Opaque unsigned enum identifier.
    Id = 2,
    /// Signed 32-bit integer.
    Int = 3,
    /// Signed 64-bit integer.
    Long = 4,
    /// IEEE-754 single precision.
    Float = 5,
    /// IEEE-754 double precision.
    Double = 6,
    /// UTF-8, NUL-terminated; `body_size` includes the terminator.
    String = 7,
    /// Opaque bytes, no terminator.
    Bytes = 8,
    /// `{u32 width, u32 height}`.
    Rectangle = 9,
    /// `{u32 num, u32 denom}`.
    Fraction = 10,
    /// Packed bits.
    Bitmap = 11,
    /// `{u32 type_tag, u32 pad, u64 address}`; process-local only.
    Pointer = 12,
    /// Index into a side-channel descriptor table.
    Fd = 13,
    /// Body prefix `{u32 child_size, u32 child_type}` then packed children.
    Array = 14,
    /// Body prefix `{u32 choice_kind, u32 flags, u32 child_size, u32 child_type}` then packed children.
    Choice = 15,
    /// Sequence of heterogeneous 8-byte-aligned child values.
    Struct = 16,
    /// Body prefix `{u32 object_type, u32 object_id}` then `Property` records.
    Object = 17,
    /// Body prefix `{u32 unit, u32 pad}` then `Control` records.
    Sequence = 18,
}

impl Kind {
    /// The minimum body size accepted by this kind's predicate.
    ///
    /// `is_<kind>` holds iff the type id matches *and* the body is at least
    /// this many bytes; a larger body is tolerated (this is what lets
    /// [`crate::round_up_8`]-padded and fixated values read back correctly).
    #[must_use]
    pub const fn min_body_size(self) -> u32 {
        match self {
            Kind::None | Kind::String | Kind::Bytes | Kind::Bitmap | Kind::Struct => 0,
            Kind::Bool | Kind::Id | Kind::Int | Kind::Float => 4,
            Kind::Long | Kind::Double | Kind::Rectangle | Kind::Fraction | Kind::Fd => 8,
            Kind::Array | Kind::Object | Kind::Sequence => 8,
            Kind::Pointer => 16,
            Kind::Choice => 16,
        }
    }

    /// Decode a raw type id, failing on anything outside the closed set.
    #[must_use]
    pub const fn from_u32(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Kind::None,
            1 => Kind::Bool,
            2 => Kind::Id,
            3 => Kind::Int,
            4 => Kind::Long,
            5 => Kind::Float,
            6 => Kind::Double,
            7 => Kind::String,
            8 => Kind::Bytes,
            9 => Kind::Rectangle,
            10 => Kind::Fraction,
            11 => Kind::Bitmap,
            12 => Kind::Pointer,
            13 => Kind::Fd,
            14 => Kind::Array,
            15 => Kind::Choice,
            16 => Kind::Struct,
            17 => Kind::Object,
            18 => Kind::Sequence,
            _ => return None,
        })
    }

    /// The raw wire type id.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
