//! `Rectangle` and `Fraction` body layouts.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `{u32 width, u32 height}`, the body of a `Rectangle` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    /// Width in whatever unit the consumer assigns.
    pub width: u32,
    /// Height in whatever unit the consumer assigns.
    pub height: u32,
}

impl Rectangle {
    /// Construct a rectangle.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Encode to the 8-byte wire body.
    #[must_use]
    pub fn encode(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[0..4].copy_from_slice(&self.width.to_ne_bytes());
        out[4..8].copy_from_slice(&self.height.to_ne_bytes());
        out
    }

    /// Decode from the first 8 bytes of `body`.
    #[must_use]
    pub fn decode(body: &[u8]) -> Option<Self> {
        if body.len() < 8 {
            return None;
        }
        let width = u32::from_ne_bytes([body[0], body[1], body[2], body[3]]);
        let height = u32::from_ne_bytes([body[4], body[5], body[6], body[7]]);
        Some(Self { width, height })
    }
}

/// `{u32 num, u32 denom}`, the body of a `Fraction` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fraction {
    /// Numerator.
    pub num: u32,
    /// Denominator.
    pub denom: u32,
}

impl Fraction {
    /// Construct a fraction.
    #[must_use]
    pub const fn new(num: u32, denom: u32) -> Self {
        Self { num, denom }
    }

    /// Encode to the 8-byte wire body.
    #[must_use]
    pub fn encode(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[0..4].copy_from_slice(&self.num.to_ne_bytes());
        out[4..8].copy_from_slice(&self.denom.to_ne_bytes());
        out
    }

    /// Decode from the first 8 bytes of `body`.
    #[must_use]
    pub fn decode(body: &[u8]) -> Option<Self> {
        if body.len() < 8 {
            return None;
        }
        let num = u32::from_ne_bytes([body[0], body[1], body[2], body[3]]);
        let denom = u32::from_ne_bytes([body[4], body[5], body[6], body[7]]);
        Some(Self { num, denom })
    }
}

/// `{u32 type_tag, u32 pad, u64 address}`, the body of a `Pointer` value.
///
/// `address` is a process-local value with no meaning outside the process
/// that produced it; transporting a buffer containing a `Pointer` across a
/// process boundary requires out-of-band translation by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointerValue {
    /// Identifies what kind of pointer this is (schema-defined).
    pub type_tag: u32,
    /// The process-local address.
    pub address: u64,
}

impl PointerValue {
    /// Construct a pointer value.
    #[must_use]
    pub const fn new(type_tag: u32, address: u64) -> Self {
        Self { type_tag, address }
    }

    /// Encode to the 16-byte wire body.
    #[must_use]
    pub fn encode(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[0..4].copy_from_slice(&self.type_tag.to_ne_bytes());
        out[8..16].copy_from_slice(&self.address.to_ne_bytes());
        out
    }

    /// Decode from the first 16 bytes of `body`.
    #[must_use]
    pub fn decode(body: &[u8]) -> Option<Self> {
        if body.len() < 16 {
            return None;
        }
        let type_tag = u32::from_ne_bytes([body[0], body[1], body[2], body[3]]);
        let address =
            u64::from_ne_bytes(body[8..16].try_into().expect("slice is exactly 8 bytes"));
        Some(Self { type_tag, address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_round_trips() {
        let r = Rectangle::new(320, 240);
        assert_eq!(Rectangle::decode(&r.encode()), Some(r));
    }

    #[test]
    fn fraction_round_trips() {
        let f = Fraction::new(25, 1);
        assert_eq!(Fraction::decode(&f.encode()), Some(f));
    }

    #[test]
    fn pointer_round_trips() {
        let p = PointerValue::new(7, 0xDEAD_BEEF_CAFE);
        assert_eq!(PointerValue::decode(&p.encode()), Some(p));
    }
}
