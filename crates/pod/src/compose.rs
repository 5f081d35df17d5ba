//! Variadic compose façade: the write-side counterpart of [`crate::parser`],
//! emitting an `Object` from a template of `(key, ComposeValue)` entries
//! through a [`Builder`].

use pod_core::{ChoiceKind, Fraction, PodResult, PointerValue, Rectangle};

use crate::{builder::Builder, value::Pod};

/// Homogeneous children for a `Choice` or `Array` composed value, grouped by
/// wire kind so the builder can emit them with the right scalar primitive
/// (§4.5: "realize the dialect as ordinary values ... rather than
/// preprocessor glue").
pub enum ChoiceValues<'a> {
    /// `Id` children.
    Id(&'a [u32]),
    /// `Int` children.
    Int(&'a [i32]),
    /// `Long` children.
    Long(&'a [i64]),
    /// `Float` children.
    Float(&'a [f32]),
    /// `Double` children.
    Double(&'a [f64]),
    /// `Rectangle` children.
    Rectangle(&'a [Rectangle]),
    /// `Fraction` children.
    Fraction(&'a [Fraction]),
}

impl ChoiceValues<'_> {
    fn emit_all(&self, b: &mut Builder<'_>) {
        match self {
            ChoiceValues::Id(vs) => vs.iter().for_each(|&v| { b.id(v); }),
            ChoiceValues::Int(vs) => vs.iter().for_each(|&v| { b.int(v); }),
            ChoiceValues::Long(vs) => vs.iter().for_each(|&v| { b.long(v); }),
            ChoiceValues::Float(vs) => vs.iter().for_each(|&v| { b.float(v); }),
            ChoiceValues::Double(vs) => vs.iter().for_each(|&v| { b.double(v); }),
            ChoiceValues::Rectangle(vs) => vs.iter().for_each(|&v| { b.rectangle(v); }),
            ChoiceValues::Fraction(vs) => vs.iter().for_each(|&v| { b.fraction(v); }),
        }
    }
}

/// A single value to emit through the compose façade: either a plain scalar,
/// a `Choice`/`Array` built from literal children, or a raw already-encoded
/// [`Pod`] fragment re-embedded verbatim.
pub enum ComposeValue<'a> {
    /// Emit `None`.
    None,
    /// Emit a `Bool`.
    Bool(bool),
    /// Emit an `Id`.
    Id(u32),
    /// Emit an `Int`.
    Int(i32),
    /// Emit a `Long`.
    Long(i64),
    /// Emit a `Float`.
    Float(f32),
    /// Emit a `Double`.
    Double(f64),
    /// Emit a `String`.
    String(&'a str),
    /// Emit opaque `Bytes`.
    Bytes(&'a [u8]),
    /// Emit a `Rectangle`.
    Rectangle(Rectangle),
    /// Emit a `Fraction`.
    Fraction(Fraction),
    /// Emit an `Fd` table index.
    Fd(i64),
    /// Emit a `Pointer`.
    Pointer(PointerValue),
    /// Emit a `Choice`: the first value in `values` is the default.
    Choice {
        /// How the children constrain one another.
        kind: ChoiceKind,
        /// Reserved flags field.
        flags: u32,
        /// The choice's children, first is default.
        values: ChoiceValues<'a>,
    },
    /// Emit an `Array` of homogeneous children.
    Array(ChoiceValues<'a>),
    /// Re-embed an already-decoded [`Pod`] fragment verbatim.
    Pod(Pod<'a>),
}

impl<'a> ComposeValue<'a> {
    fn emit(&self, b: &mut Builder<'_>) {
        match self {
            ComposeValue::None => {
                b.none();
            }
            ComposeValue::Bool(v) => {
                b.bool_(*v);
            }
            ComposeValue::Id(v) => {
                b.id(*v);
            }
            ComposeValue::Int(v) => {
                b.int(*v);
            }
            ComposeValue::Long(v) => {
                b.long(*v);
            }
            ComposeValue::Float(v) => {
                b.float(*v);
            }
            ComposeValue::Double(v) => {
                b.double(*v);
            }
            ComposeValue::String(v) => {
                b.string(v);
            }
            ComposeValue::Bytes(v) => {
                b.bytes(v);
            }
            ComposeValue::Rectangle(v) => {
                b.rectangle(*v);
            }
            ComposeValue::Fraction(v) => {
                b.fraction(*v);
            }
            ComposeValue::Fd(v) => {
                b.fd(*v);
            }
            ComposeValue::Pointer(v) => {
                b.pointer(*v);
            }
            ComposeValue::Choice { kind, flags, values } => {
                b.push_choice(*kind, *flags);
                values.emit_all(b);
                let _ = b.pop();
            }
            ComposeValue::Array(values) => {
                b.push_array();
                values.emit_all(b);
                let _ = b.pop();
            }
            ComposeValue::Pod(pod) => {
                b.pod_raw(pod.kind(), pod.body());
            }
        }
    }
}

/// A single `key, value` entry in a compose template.
pub struct ComposeField<'a> {
    /// Property key, namespaced by the object's schema.
    pub key: u32,
    /// Reserved per-property flags.
    pub flags: u32,
    /// The property's value.
    pub value: ComposeValue<'a>,
}

impl<'a> ComposeField<'a> {
    /// Construct a field with flags `0`, the common case.
    #[must_use]
    pub const fn new(key: u32, value: ComposeValue<'a>) -> Self {
        Self { key, flags: 0, value }
    }

    /// Convenience literal constructors — one per scalar kind, flags `0` —
    /// forming the "convenience literal-builder" layer over the data-driven
    /// [`ComposeValue`] enum (§9: "both a convenience literal-builder and a
    /// data-driven form are required").
    #[must_use]
    pub const fn bool_(key: u32, value: bool) -> Self {
        Self::new(key, ComposeValue::Bool(value))
    }

    /// See [`ComposeField::bool_`].
    #[must_use]
    pub const fn id(key: u32, value: u32) -> Self {
        Self::new(key, ComposeValue::Id(value))
    }

    /// See [`ComposeField::bool_`].
    #[must_use]
    pub const fn int(key: u32, value: i32) -> Self {
        Self::new(key, ComposeValue::Int(value))
    }

    /// See [`ComposeField::bool_`].
    #[must_use]
    pub const fn long(key: u32, value: i64) -> Self {
        Self::new(key, ComposeValue::Long(value))
    }

    /// See [`ComposeField::bool_`].
    #[must_use]
    pub const fn float(key: u32, value: f32) -> Self {
        Self::new(key, ComposeValue::Float(value))
    }

    /// See [`ComposeField::bool_`].
    #[must_use]
    pub const fn double(key: u32, value: f64) -> Self {
        Self::new(key, ComposeValue::Double(value))
    }

    /// See [`ComposeField::bool_`].
    #[must_use]
    pub const fn string(key: u32, value: &'a str) -> Self {
        Self::new(key, ComposeValue::String(value))
    }

    /// See [`ComposeField::bool_`].
    #[must_use]
    pub const fn bytes(key: u32, value: &'a [u8]) -> Self {
        Self::new(key, ComposeValue::Bytes(value))
    }

    /// See [`ComposeField::bool_`].
    #[must_use]
    pub const fn rectangle(key: u32, value: Rectangle) -> Self {
        Self::new(key, ComposeValue::Rectangle(value))
    }

    /// See [`ComposeField::bool_`].
    #[must_use]
    pub const fn fraction(key: u32, value: Fraction) -> Self {
        Self::new(key, ComposeValue::Fraction(value))
    }

    /// A `Range`-kind `Choice` over `{default, min, max}`.
    #[must_use]
    pub const fn choice_range(key: u32, values: ChoiceValues<'a>) -> Self {
        Self::new(key, ComposeValue::Choice { kind: ChoiceKind::Range, flags: 0, values })
    }

    /// An `Enum`-kind `Choice` over `{default, alternatives...}`.
    #[must_use]
    pub const fn choice_enum(key: u32, values: ChoiceValues<'a>) -> Self {
        Self::new(key, ComposeValue::Choice { kind: ChoiceKind::Enum, flags: 0, values })
    }
}

/// Emit a complete `Object` through `builder`: the outer `push_object`,
/// then one `prop`/value pair per field in order, then `pop`.
///
/// This is the compose counterpart of [`crate::parser::parse_object`],
/// sharing the same template dialect (§4.3: "the compose counterpart takes
/// the same template dialect and emits directly through the builder").
///
/// # Errors
/// Propagates [`pod_core::PodError::NotInFrame`] only if called with a
/// builder that is already mid-frame in a way that makes `prop()` illegal;
/// in ordinary use (a builder with no open frames) this cannot fail.
pub fn compose_object(
    builder: &mut Builder<'_>,
    object_type: u32,
    object_id: u32,
    fields: &[ComposeField<'_>],
) -> PodResult<usize> {
    builder.push_object(object_type, object_id);
    for field in fields {
        builder.prop(field.key, field.flags)?;
        field.value.emit(builder);
    }
    builder.pop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Builder;
    use pretty_assertions::assert_eq;

    #[test]
    fn composes_and_reparses_scalars() {
        let mut buf = [0u8; 256];
        {
            let mut b = Builder::new(&mut buf);
            compose_object(
                &mut b,
                1,
                0,
                &[
                    ComposeField::bool_(1, true),
                    ComposeField::int(2, 21),
                    ComposeField::string(3, "test123"),
                ],
            )
            .unwrap();
        }
        let pod = Pod::from_bytes(&buf).unwrap();
        let object = pod.as_object().unwrap();
        assert_eq!(object.find_property(1).unwrap().value.get_bool(), Some(true));
        assert_eq!(object.find_property(2).unwrap().value.get_int(), Some(21));
        assert_eq!(object.find_property(3).unwrap().value.get_string(), Some("test123"));
    }

    #[test]
    fn composes_an_enum_choice_with_default_first() {
        let mut buf = [0u8; 256];
        {
            let mut b = Builder::new(&mut buf);
            compose_object(
                &mut b,
                1,
                0,
                &[ComposeField::choice_enum(10, ChoiceValues::Id(&[100, 100, 200]))],
            )
            .unwrap();
        }
        let pod = Pod::from_bytes(&buf).unwrap();
        let object = pod.as_object().unwrap();
        let prop = object.find_property(10).unwrap();
        let choice = prop.value.as_choice().unwrap();
        assert_eq!(choice.len(), 3);
        assert_eq!(choice.default_child().unwrap().get_id(), Some(100));
    }

    #[test]
    fn re_embeds_a_raw_pod_fragment() {
        let mut inner_buf = [0u8; 16];
        {
            let mut ib = Builder::new(&mut inner_buf);
            ib.int(77);
        }
        let inner = Pod::from_bytes(&inner_buf).unwrap();

        let mut buf = [0u8; 64];
        {
            let mut b = Builder::new(&mut buf);
            compose_object(&mut b, 1, 0, &[ComposeField::new(14, ComposeValue::Pod(inner))])
                .unwrap();
        }
        let pod = Pod::from_bytes(&buf).unwrap();
        let object = pod.as_object().unwrap();
        assert_eq!(object.find_property(14).unwrap().value.get_int(), Some(77));
    }
}
