//! The universal 8-byte value header and alignment helpers.

use crate::{Kind, PodError};

/// Size in bytes of a value header: `{u32 body_size; u32 type_id}`.
pub const HEADER_SIZE: usize = 8;

/// Round `n` up to the next multiple of 8.
#[must_use]
pub const fn round_up_8(n: usize) -> usize {
    (n + 7) & !7
}

/// The 8 bytes preceding every POD value's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of body bytes following this header (not counting padding).
    pub body_size: u32,
    /// The value's type id.
    pub kind: Kind,
}

impl Header {
    /// Total encoded size of the value this header describes, `8 + body_size`.
    #[must_use]
    pub const fn total_size(self) -> usize {
        HEADER_SIZE + self.body_size as usize
    }

    /// Total size including trailing alignment padding to the next 8-byte
    /// boundary; this is the step [`crate::iter`] advances by between siblings.
    #[must_use]
    pub const fn padded_size(self) -> usize {
        round_up_8(self.total_size())
    }

    /// Encode this header as its 8-byte wire form.
    #[must_use]
    pub fn encode(self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.body_size.to_ne_bytes());
        out[4..8].copy_from_slice(&self.kind.to_u32().to_ne_bytes());
        out
    }

    /// Decode a header from the front of `bytes`.
    ///
    /// # Errors
    /// Returns [`PodError::Malformed`] if fewer than [`HEADER_SIZE`] bytes are
    /// available, and [`PodError::UnknownKind`] if the type id is outside the
    /// closed set.
    pub fn decode(bytes: &[u8]) -> Result<Self, PodError> {
        if bytes.len() < HEADER_SIZE {
            return Err(PodError::Malformed {
                needed: HEADER_SIZE,
                available: bytes.len(),
            });
        }
        let body_size = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let raw_kind = u32::from_ne_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let kind = Kind::from_u32(raw_kind).ok_or(PodError::UnknownKind(raw_kind))?;
        Ok(Self { body_size, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_up_8_is_idempotent_on_multiples() {
        for n in [0, 8, 16, 536] {
            assert_eq!(round_up_8(n), n);
        }
        assert_eq!(round_up_8(1), 8);
        assert_eq!(round_up_8(9), 16);
        assert_eq!(round_up_8(17), 24);
    }

    #[test]
    fn header_round_trips() {
        let h = Header { body_size: 4, kind: Kind::Bool };
        let bytes = h.encode();
        assert_eq!(bytes.len(), HEADER_SIZE);
        let decoded = Header::decode(&bytes).unwrap();
        assert_eq!(decoded, h);
    }

    #[test]
    fn header_is_exactly_8_bytes_on_wire() {
        let h = Header { body_size: 0, kind: Kind::None };
        assert_eq!(h.encode().len(), 8);
    }

    #[test]
    fn decode_rejects_truncated_input() {
        assert!(matches!(
            Header::decode(&[0u8; 4]),
            Err(PodError::Malformed { needed: 8, available: 4 })
        ));
    }
}
