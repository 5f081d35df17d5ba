//! Borrowed, non-owning view over a single decoded POD value and its
//! structured containers.

use pod_core::{ChoiceKind, Fraction, Header, Kind, PodError, PodResult, PointerValue, HEADER_SIZE};

/// A decoded POD value: a [`Kind`] plus a borrowed body slice.
///
/// A `Pod` never owns or copies bytes; it borrows from whatever buffer it was
/// decoded out of. Two flavors of `Pod` exist in practice, both represented
/// identically here: a *headed* value decoded from `{header}{body}` bytes via
/// [`Pod::from_bytes`], and a *header-less* array/choice child reconstructed
/// by [`ArrayRef`]/[`ChoiceRef`] from a shared declared type and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pod<'a> {
    kind: Kind,
    body: &'a [u8],
}

impl<'a> Pod<'a> {
    /// Wrap a kind and body directly, bypassing header decoding. Used to
    /// reconstruct header-less array/choice children.
    #[must_use]
    pub(crate) const fn from_parts(kind: Kind, body: &'a [u8]) -> Self {
        Self { kind, body }
    }

    /// Decode a single value from the front of `bytes`: an 8-byte header
    /// followed by exactly `body_size` bytes. `bytes` may contain trailing
    /// sibling data or padding; only the declared prefix is consumed.
    ///
    /// # Errors
    /// [`PodError::Malformed`] if the header or the declared body does not
    /// fit in `bytes`.
    pub fn from_bytes(bytes: &'a [u8]) -> PodResult<Self> {
        let header = Header::decode(bytes)?;
        let body_size = header.body_size as usize;
        let body = bytes.get(HEADER_SIZE..HEADER_SIZE + body_size).ok_or(
            PodError::Malformed { needed: HEADER_SIZE + body_size, available: bytes.len() },
        )?;
        Ok(Self { kind: header.kind, body })
    }

    /// This value's type id.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// This value's body bytes (never includes the 8-byte header or padding).
    #[must_use]
    pub const fn body(&self) -> &'a [u8] {
        self.body
    }

    /// Total on-wire size of this value *as a headed value*: `8 + body_size`.
    /// Not meaningful for header-less array/choice children.
    #[must_use]
    pub const fn total_size(&self) -> usize {
        HEADER_SIZE + self.body.len()
    }

    fn predicate(&self, kind: Kind) -> bool {
        self.kind == kind && self.body.len() as u32 >= kind.min_body_size()
    }

    /// True iff this value is `None`.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.predicate(Kind::None)
    }

    /// True iff this value is a well-formed `Bool`.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        self.predicate(Kind::Bool)
    }

    /// Read this value as a `Bool`, or `None` if the predicate fails.
    #[must_use]
    pub fn get_bool(&self) -> Option<bool> {
        self.is_bool().then(|| u32::from_ne_bytes(self.body[0..4].try_into().unwrap()) != 0)
    }

    /// True iff this value is a well-formed `Id`.
    #[must_use]
    pub fn is_id(&self) -> bool {
        self.predicate(Kind::Id)
    }

    /// Read this value as an `Id`.
    #[must_use]
    pub fn get_id(&self) -> Option<u32> {
        self.is_id().then(|| u32::from_ne_bytes(self.body[0..4].try_into().unwrap()))
    }

    /// True iff this value is a well-formed `Int`.
    #[must_use]
    pub fn is_int(&self) -> bool {
        self.predicate(Kind::Int)
    }

    /// Read this value as an `Int`.
    #[must_use]
    pub fn get_int(&self) -> Option<i32> {
        self.is_int().then(|| i32::from_ne_bytes(self.body[0..4].try_into().unwrap()))
    }

    /// True iff this value is a well-formed `Long`.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.predicate(Kind::Long)
    }

    /// Read this value as a `Long`.
    #[must_use]
    pub fn get_long(&self) -> Option<i64> {
        self.is_long().then(|| i64::from_ne_bytes(self.body[0..8].try_into().unwrap()))
    }

    /// True iff this value is a well-formed `Float`.
    #[must_use]
    pub fn is_float(&self) -> bool {
        self.predicate(Kind::Float)
    }

    /// Read this value as a `Float`.
    #[must_use]
    pub fn get_float(&self) -> Option<f32> {
        self.is_float().then(|| f32::from_ne_bytes(self.body[0..4].try_into().unwrap()))
    }

    /// True iff this value is a well-formed `Double`.
    #[must_use]
    pub fn is_double(&self) -> bool {
        self.predicate(Kind::Double)
    }

    /// Read this value as a `Double`.
    #[must_use]
    pub fn get_double(&self) -> Option<f64> {
        self.is_double().then(|| f64::from_ne_bytes(self.body[0..8].try_into().unwrap()))
    }

    /// True iff this value is a well-formed `String` (type id matches and the
    /// body ends in a NUL byte).
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.kind == Kind::String && self.body.last() == Some(&0)
    }

    /// Read this value as a `String`, stripping the trailing NUL.
    #[must_use]
    pub fn get_string(&self) -> Option<&'a str> {
        if !self.is_string() {
            return None;
        }
        core::str::from_utf8(&self.body[..self.body.len() - 1]).ok()
    }

    /// True iff this value is a well-formed `Bytes`.
    #[must_use]
    pub fn is_bytes(&self) -> bool {
        self.predicate(Kind::Bytes)
    }

    /// Read this value as raw `Bytes`.
    #[must_use]
    pub fn get_bytes(&self) -> Option<&'a [u8]> {
        self.is_bytes().then_some(self.body)
    }

    /// True iff this value is a well-formed `Rectangle`.
    #[must_use]
    pub fn is_rectangle(&self) -> bool {
        self.predicate(Kind::Rectangle)
    }

    /// Read this value as a `Rectangle`.
    #[must_use]
    pub fn get_rectangle(&self) -> Option<pod_core::Rectangle> {
        self.is_rectangle().then(|| pod_core::Rectangle::decode(self.body)).flatten()
    }

    /// True iff this value is a well-formed `Fraction`.
    #[must_use]
    pub fn is_fraction(&self) -> bool {
        self.predicate(Kind::Fraction)
    }

    /// Read this value as a `Fraction`.
    #[must_use]
    pub fn get_fraction(&self) -> Option<Fraction> {
        self.is_fraction().then(|| Fraction::decode(self.body)).flatten()
    }

    /// True iff this value is a well-formed `Bitmap`.
    #[must_use]
    pub fn is_bitmap(&self) -> bool {
        self.predicate(Kind::Bitmap)
    }

    /// Read this value as packed `Bitmap` bits.
    #[must_use]
    pub fn get_bitmap(&self) -> Option<&'a [u8]> {
        self.is_bitmap().then_some(self.body)
    }

    /// True iff this value is a well-formed `Pointer`.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        self.predicate(Kind::Pointer)
    }

    /// Read this value as a `Pointer`. The address is process-local; see
    /// [`pod_core::PointerValue`].
    #[must_use]
    pub fn get_pointer(&self) -> Option<PointerValue> {
        self.is_pointer().then(|| PointerValue::decode(self.body)).flatten()
    }

    /// True iff this value is a well-formed `Fd`.
    #[must_use]
    pub fn is_fd(&self) -> bool {
        self.predicate(Kind::Fd)
    }

    /// Read this value as an `Fd` table index.
    #[must_use]
    pub fn get_fd(&self) -> Option<i64> {
        self.is_fd().then(|| i64::from_ne_bytes(self.body[0..8].try_into().unwrap()))
    }

    /// True iff this value is a well-formed `Array`.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.predicate(Kind::Array)
    }

    /// View this value as an `Array`.
    #[must_use]
    pub fn as_array(&self) -> Option<ArrayRef<'a>> {
        self.is_array().then(|| ArrayRef { body: self.body })
    }

    /// True iff this value is a well-formed `Choice`.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        self.predicate(Kind::Choice)
    }

    /// View this value as a `Choice`.
    #[must_use]
    pub fn as_choice(&self) -> Option<ChoiceRef<'a>> {
        self.is_choice().then(|| ChoiceRef { body: self.body })
    }

    /// True iff this value is a `Struct`.
    #[must_use]
    pub fn is_struct(&self) -> bool {
        self.predicate(Kind::Struct)
    }

    /// View this value as a `Struct`.
    #[must_use]
    pub fn as_struct(&self) -> Option<StructRef<'a>> {
        self.is_struct().then(|| StructRef { body: self.body })
    }

    /// True iff this value is a well-formed `Object`.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.predicate(Kind::Object)
    }

    /// View this value as an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<ObjectRef<'a>> {
        self.is_object().then(|| ObjectRef { body: self.body })
    }

    /// True iff this value is a well-formed `Sequence`.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.predicate(Kind::Sequence)
    }

    /// View this value as a `Sequence`.
    #[must_use]
    pub fn as_sequence(&self) -> Option<SequenceRef<'a>> {
        self.is_sequence().then(|| SequenceRef { body: self.body })
    }
}

/// An `Array` value: a homogeneous run of header-less children.
#[derive(Debug, Clone, Copy)]
pub struct ArrayRef<'a> {
    body: &'a [u8],
}

impl<'a> ArrayRef<'a> {
    /// The declared per-child size.
    #[must_use]
    pub fn child_size(&self) -> u32 {
        u32::from_ne_bytes(self.body[0..4].try_into().unwrap())
    }

    /// The declared per-child type.
    #[must_use]
    pub fn child_type(&self) -> Option<Kind> {
        Kind::from_u32(u32::from_ne_bytes(self.body[4..8].try_into().unwrap()))
    }

    /// Number of children, `(body_size - 8) / child_size`.
    #[must_use]
    pub fn len(&self) -> usize {
        let child_size = self.child_size() as usize;
        if child_size == 0 {
            return 0;
        }
        (self.body.len() - 8) / child_size
    }

    /// True iff this array has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the children as reconstructed header-less [`Pod`] values.
    #[must_use]
    pub fn children(&self) -> ChildValues<'a> {
        ChildValues {
            data: &self.body[8..],
            child_size: self.child_size() as usize,
            child_type: self.child_type(),
        }
    }
}

/// A `Choice` value: a `choice_kind`, flags, and a homogeneous run of children
/// (the first of which is the default).
#[derive(Debug, Clone, Copy)]
pub struct ChoiceRef<'a> {
    body: &'a [u8],
}

impl<'a> ChoiceRef<'a> {
    /// How the children constrain one another.
    #[must_use]
    pub fn choice_kind(&self) -> Option<ChoiceKind> {
        ChoiceKind::from_u32(u32::from_ne_bytes(self.body[0..4].try_into().unwrap()))
    }

    /// Reserved flags field.
    #[must_use]
    pub fn flags(&self) -> u32 {
        u32::from_ne_bytes(self.body[4..8].try_into().unwrap())
    }

    /// The declared per-child size.
    #[must_use]
    pub fn child_size(&self) -> u32 {
        u32::from_ne_bytes(self.body[8..12].try_into().unwrap())
    }

    /// The declared per-child type.
    #[must_use]
    pub fn child_type(&self) -> Option<Kind> {
        Kind::from_u32(u32::from_ne_bytes(self.body[12..16].try_into().unwrap()))
    }

    /// Number of children, including the default (first) one.
    #[must_use]
    pub fn len(&self) -> usize {
        let child_size = self.child_size() as usize;
        if child_size == 0 {
            return 0;
        }
        (self.body.len() - 16) / child_size
    }

    /// True iff this choice has no children (malformed in practice, but not
    /// our job to assert here).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the children as reconstructed header-less [`Pod`] values; the
    /// first yielded value is the default.
    #[must_use]
    pub fn children(&self) -> ChildValues<'a> {
        ChildValues {
            data: &self.body[16..],
            child_size: self.child_size() as usize,
            child_type: self.child_type(),
        }
    }

    /// The default (first) child, if any.
    #[must_use]
    pub fn default_child(&self) -> Option<Pod<'a>> {
        self.children().next()
    }
}

/// Iterator over header-less `Array`/`Choice` children.
pub struct ChildValues<'a> {
    data: &'a [u8],
    child_size: usize,
    child_type: Option<Kind>,
}

impl<'a> Iterator for ChildValues<'a> {
    type Item = Pod<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.child_type?;
        if self.child_size == 0 || self.data.len() < self.child_size {
            return None;
        }
        let (head, rest) = self.data.split_at(self.child_size);
        self.data = rest;
        Some(Pod::from_parts(kind, head))
    }
}

/// A `Struct` value: heterogeneous, fully-headed children in sequence.
#[derive(Debug, Clone, Copy)]
pub struct StructRef<'a> {
    body: &'a [u8],
}

impl<'a> StructRef<'a> {
    /// Iterate the struct's fields in order.
    #[must_use]
    pub fn fields(&self) -> StructFields<'a> {
        StructFields { data: self.body }
    }
}

/// Iterator over a [`StructRef`]'s fields.
pub struct StructFields<'a> {
    data: &'a [u8],
}

impl<'a> Iterator for StructFields<'a> {
    type Item = Pod<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let pod = Pod::from_bytes(self.data).ok()?;
        let step = Header { body_size: pod.body.len() as u32, kind: pod.kind }.padded_size();
        if step == 0 || step > self.data.len() {
            self.data = &[];
            return None;
        }
        self.data = &self.data[step..];
        Some(pod)
    }
}

/// A single `key, flags, value` record inside an [`ObjectRef`].
#[derive(Debug, Clone, Copy)]
pub struct PropertyRef<'a> {
    /// Property key, namespaced by the enclosing object's schema.
    pub key: u32,
    /// Reserved per-property flags.
    pub flags: u32,
    /// The property's value.
    pub value: Pod<'a>,
}

/// An `Object` value: a typed, keyed bag of [`PropertyRef`] records.
#[derive(Debug, Clone, Copy)]
pub struct ObjectRef<'a> {
    body: &'a [u8],
}

impl<'a> ObjectRef<'a> {
    /// The object's schema type id.
    #[must_use]
    pub fn object_type(&self) -> u32 {
        u32::from_ne_bytes(self.body[0..4].try_into().unwrap())
    }

    /// The object's schema-defined id (often a sub-kind within `object_type`).
    #[must_use]
    pub fn object_id(&self) -> u32 {
        u32::from_ne_bytes(self.body[4..8].try_into().unwrap())
    }

    /// Iterate the object's properties in wire order.
    #[must_use]
    pub fn properties(&self) -> Properties<'a> {
        Properties { data: &self.body[8..] }
    }

    /// Linear scan for the first property with the given key.
    #[must_use]
    pub fn find_property(&self, key: u32) -> Option<PropertyRef<'a>> {
        self.properties().find(|p| p.key == key)
    }

    /// Resume scanning for `key` after a previously found property, allowing
    /// callers to collect every property sharing a (non-unique) key.
    #[must_use]
    pub fn find_property_after(&self, key: u32, after: PropertyRef<'a>) -> Option<PropertyRef<'a>> {
        let mut seen_after = false;
        for candidate in self.properties() {
            if !seen_after {
                if candidate.value.body.as_ptr() == after.value.body.as_ptr() {
                    seen_after = true;
                }
                continue;
            }
            if candidate.key == key {
                return Some(candidate);
            }
        }
        None
    }
}

/// Iterator over an [`ObjectRef`]'s properties.
pub struct Properties<'a> {
    data: &'a [u8],
}

impl<'a> Iterator for Properties<'a> {
    type Item = PropertyRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < 8 {
            return None;
        }
        let key = u32::from_ne_bytes(self.data[0..4].try_into().unwrap());
        let flags = u32::from_ne_bytes(self.data[4..8].try_into().unwrap());
        let value = Pod::from_bytes(&self.data[8..]).ok()?;
        let step = 8 + Header { body_size: value.body.len() as u32, kind: value.kind }.padded_size();
        if step > self.data.len() {
            self.data = &[];
            return None;
        }
        self.data = &self.data[step..];
        Some(PropertyRef { key, flags, value })
    }
}

/// A single `offset, type, value` record inside a [`SequenceRef`].
#[derive(Debug, Clone, Copy)]
pub struct ControlRef<'a> {
    /// Monotonically non-decreasing timestamp in the sequence's unit.
    pub offset: u32,
    /// The control's schema-defined type.
    pub control_type: u32,
    /// The control's value.
    pub value: Pod<'a>,
}

/// A `Sequence` value: a timed list of [`ControlRef`] records.
#[derive(Debug, Clone, Copy)]
pub struct SequenceRef<'a> {
    body: &'a [u8],
}

impl<'a> SequenceRef<'a> {
    /// The sequence's time unit (schema-defined).
    #[must_use]
    pub fn unit(&self) -> u32 {
        u32::from_ne_bytes(self.body[0..4].try_into().unwrap())
    }

    /// Iterate the sequence's controls in wire (time) order.
    #[must_use]
    pub fn controls(&self) -> Controls<'a> {
        Controls { data: &self.body[8..] }
    }
}

/// Iterator over a [`SequenceRef`]'s controls.
pub struct Controls<'a> {
    data: &'a [u8],
}

impl<'a> Iterator for Controls<'a> {
    type Item = ControlRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < 8 {
            return None;
        }
        let offset = u32::from_ne_bytes(self.data[0..4].try_into().unwrap());
        let control_type = u32::from_ne_bytes(self.data[4..8].try_into().unwrap());
        let value = Pod::from_bytes(&self.data[8..]).ok()?;
        let step = 8 + Header { body_size: value.body.len() as u32, kind: value.kind }.padded_size();
        if step > self.data.len() {
            self.data = &[];
            return None;
        }
        self.data = &self.data[step..];
        Some(ControlRef { offset, control_type, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Builder;

    #[test]
    fn bool_round_trips() {
        let mut buf = [0u8; 16];
        let mut b = Builder::new(&mut buf);
        b.bool_(true);
        let pod = Pod::from_bytes(&buf).unwrap();
        assert!(pod.is_bool());
        assert_eq!(pod.get_bool(), Some(true));
        assert_eq!(pod.get_int(), None);
    }

    #[test]
    fn string_requires_nul_terminator() {
        let body = *b"abc"; // no NUL
        let pod = Pod::from_parts(Kind::String, &body);
        assert!(!pod.is_string());
        assert_eq!(pod.get_string(), None);
    }
}
