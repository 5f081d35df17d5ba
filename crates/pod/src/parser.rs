//! Schema-directed structured parser: extract properties from an `Object`
//! against a template of `(key, descriptor)` pairs.

use pod_core::{Fraction, Kind, PodError, PodResult, PointerValue, Rectangle};

use crate::value::{ArrayRef, ObjectRef, Pod, PropertyRef};

/// Property key that matches any property whose value satisfies the
/// descriptor's kind, independent of the property's own key (§4.3).
pub const ANY_KEY: u32 = 0;

/// Where an extracted value is written back to, one variant per [`Kind`]
/// the façade supports plus the two raw pass-through forms (`Pod`,
/// `PodChoice`). Each wraps a `&mut Option<T>` so a failed/absent/optional
/// match simply leaves the caller's slot untouched, mirroring "accessors
/// never abort, outputs untouched on failure" (§7).
pub enum Target<'a, 'out> {
    /// Bind a `Bool`.
    Bool(&'out mut Option<bool>),
    /// Bind an `Id`.
    Id(&'out mut Option<u32>),
    /// Bind an `Int`.
    Int(&'out mut Option<i32>),
    /// Bind a `Long`.
    Long(&'out mut Option<i64>),
    /// Bind a `Float`.
    Float(&'out mut Option<f32>),
    /// Bind a `Double`.
    Double(&'out mut Option<f64>),
    /// Bind a `String`, borrowed from the source buffer.
    String(&'out mut Option<&'a str>),
    /// Bind opaque `Bytes`, borrowed from the source buffer.
    Bytes(&'out mut Option<&'a [u8]>),
    /// Bind a `Rectangle`.
    Rectangle(&'out mut Option<Rectangle>),
    /// Bind a `Fraction`.
    Fraction(&'out mut Option<Fraction>),
    /// Bind an `Fd` table index.
    Fd(&'out mut Option<i64>),
    /// Bind a `Pointer`.
    Pointer(&'out mut Option<PointerValue>),
    /// Bind a borrowed view over an `Array`.
    Array(&'out mut Option<ArrayRef<'a>>),
    /// Bind a borrowed pointer to the raw value, whatever its kind —
    /// matches a property of *any* kind with no predicate check beyond "the
    /// key is present" (§4.3's pod-out descriptor).
    Pod(&'out mut Option<Pod<'a>>),
    /// Bind a borrowed pointer to the raw value, requiring it to be a
    /// `Choice` (used when the caller wants the alternatives rather than a
    /// fixated scalar).
    PodChoice(&'out mut Option<Pod<'a>>),
    /// Bind a borrowed pointer to the raw value, requiring it to be an
    /// `Object` (nested sub-object extraction).
    PodObject(&'out mut Option<Pod<'a>>),
}

impl<'a> Target<'a, '_> {
    /// Attempt to bind `value` into this target. Returns `true` iff the
    /// value's kind satisfied the target and the slot was written.
    fn bind(&mut self, value: Pod<'a>) -> bool {
        match self {
            Target::Bool(slot) => value.get_bool().map(|v| **slot = Some(v)).is_some(),
            Target::Id(slot) => value.get_id().map(|v| **slot = Some(v)).is_some(),
            Target::Int(slot) => value.get_int().map(|v| **slot = Some(v)).is_some(),
            Target::Long(slot) => value.get_long().map(|v| **slot = Some(v)).is_some(),
            Target::Float(slot) => value.get_float().map(|v| **slot = Some(v)).is_some(),
            Target::Double(slot) => value.get_double().map(|v| **slot = Some(v)).is_some(),
            Target::String(slot) => value.get_string().map(|v| **slot = Some(v)).is_some(),
            Target::Bytes(slot) => value.get_bytes().map(|v| **slot = Some(v)).is_some(),
            Target::Rectangle(slot) => value.get_rectangle().map(|v| **slot = Some(v)).is_some(),
            Target::Fraction(slot) => value.get_fraction().map(|v| **slot = Some(v)).is_some(),
            Target::Fd(slot) => value.get_fd().map(|v| **slot = Some(v)).is_some(),
            Target::Pointer(slot) => value.get_pointer().map(|v| **slot = Some(v)).is_some(),
            Target::Array(slot) => value.as_array().map(|v| **slot = Some(v)).is_some(),
            Target::Pod(slot) => {
                **slot = Some(value);
                true
            }
            Target::PodChoice(slot) => {
                if value.is_choice() {
                    **slot = Some(value);
                    true
                } else {
                    false
                }
            }
            Target::PodObject(slot) => {
                if value.is_object() {
                    **slot = Some(value);
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// A single `(key, Target)` entry in an extraction template, with an
/// `optional` flag (§4.3: "a descriptor may be flagged optional").
pub struct Field<'a, 'out> {
    /// Property key to match, or [`ANY_KEY`] to match any key whose value
    /// satisfies the target's kind.
    pub key: u32,
    /// If absent, the target is left untouched and the field does not count
    /// towards the bound total, instead of failing the whole parse.
    pub optional: bool,
    /// Where to write the bound value.
    pub target: Target<'a, 'out>,
}

impl<'a, 'out> Field<'a, 'out> {
    /// Construct a required field.
    #[must_use]
    pub const fn new(key: u32, target: Target<'a, 'out>) -> Self {
        Self { key, optional: false, target }
    }

    /// Construct an optional field.
    #[must_use]
    pub const fn optional(key: u32, target: Target<'a, 'out>) -> Self {
        Self { key, optional: true, target }
    }
}

/// Find the first property in `object` matching `field.key` (or any
/// property, for [`ANY_KEY`]) whose value satisfies `field.target`'s kind.
///
/// `claimed` only constrains [`ANY_KEY`] fields, so that several wildcard
/// fields in the same template claim distinct properties instead of all
/// racing for the same first match. Explicit-key fields ignore `claimed`
/// entirely: per §8 scenario F, a single property is allowed to satisfy more
/// than one compatible descriptor sharing its key in the same call (e.g. a
/// kind-specific descriptor and a catch-all `Pod` descriptor both binding
/// the same property).
fn find_match<'a>(
    object: &ObjectRef<'a>,
    field: &mut Field<'a, '_>,
    claimed: &mut [bool],
) -> bool {
    let wildcard = field.key == ANY_KEY;
    for (index, prop) in object.properties().enumerate() {
        if wildcard && claimed[index] {
            continue;
        }
        let key_matches = wildcard || prop.key == field.key;
        if !key_matches {
            continue;
        }
        if try_bind(field, prop) {
            if wildcard {
                claimed[index] = true;
            }
            return true;
        }
    }
    false
}

fn try_bind<'a>(field: &mut Field<'a, '_>, prop: PropertyRef<'a>) -> bool {
    field.target.bind(prop.value)
}

/// Walk `object`'s properties against `fields`, writing matches into each
/// field's target.
///
/// # Errors
/// [`PodError::WrongObjectType`] if `object_type` doesn't match
/// `expected_type`; [`PodError::MissingKey`] if a non-optional field's key
/// has no satisfying property.
///
/// # Returns
/// The number of fields successfully bound (a field that matched zero or
/// more than one property still contributes at most one count per field;
/// see §8 scenario F for why a single property can satisfy two distinct
/// fields in the same call).
pub fn parse_object<'a>(
    pod: &Pod<'a>,
    expected_type: u32,
    fields: &mut [Field<'a, '_>],
) -> PodResult<usize> {
    let object = pod.as_object().ok_or(PodError::KindMismatch {
        expected: Kind::Object,
        found: pod.kind(),
        body_size: pod.body().len() as u32,
    })?;
    if object.object_type() != expected_type {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            expected = expected_type,
            found = object.object_type(),
            "object type mismatch during schema parse"
        );
        return Err(PodError::WrongObjectType { expected: expected_type, found: object.object_type() });
    }

    let property_count = object.properties().count();
    let mut claimed = alloc_vec_bool(property_count);
    let mut bound = 0usize;
    for field in fields.iter_mut() {
        if find_match(&object, field, &mut claimed) {
            bound += 1;
        } else if !field.optional {
            return Err(PodError::MissingKey(field.key));
        }
    }
    Ok(bound)
}

#[cfg(feature = "std")]
fn alloc_vec_bool(len: usize) -> std::vec::Vec<bool> {
    std::vec![false; len]
}

#[cfg(not(feature = "std"))]
fn alloc_vec_bool(len: usize) -> alloc::vec::Vec<bool> {
    alloc::vec![false; len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Builder;
    use pretty_assertions::assert_eq;

    fn build_props_object(buf: &mut [u8]) -> usize {
        let mut b = Builder::new(buf);
        b.push_object(1, 0);
        b.prop(1, 0).unwrap();
        b.bool_(true);
        b.prop(2, 0).unwrap();
        b.id(7);
        b.prop(3, 0).unwrap();
        b.int(21);
        b.prop(4, 0).unwrap();
        b.string("test123");
        b.pop().unwrap();
        b.offset()
    }

    #[test]
    fn strict_required_key_missing_fails() {
        let mut buf = [0u8; 128];
        let len = build_props_object(&mut buf);
        let pod = Pod::from_bytes(&buf[..len]).unwrap();

        let mut missing = None;
        let mut fields = [Field::new(99, Target::Int(&mut missing))];
        let err = parse_object(&pod, 1, &mut fields).unwrap_err();
        assert_eq!(err, PodError::MissingKey(99));
    }

    #[test]
    fn optional_missing_key_leaves_output_untouched_and_excludes_count() {
        let mut buf = [0u8; 128];
        let len = build_props_object(&mut buf);
        let pod = Pod::from_bytes(&buf[..len]).unwrap();

        let mut present = None;
        let mut absent = Some(999i32);
        let mut fields =
            [Field::new(3, Target::Int(&mut present)), Field::optional(99, Target::Int(&mut absent))];
        let count = parse_object(&pod, 1, &mut fields).unwrap();
        assert_eq!(count, 1);
        assert_eq!(present, Some(21));
        assert_eq!(absent, Some(999)); // untouched
    }

    #[test]
    fn wrong_object_type_fails_before_scanning_properties() {
        let mut buf = [0u8; 128];
        let len = build_props_object(&mut buf);
        let pod = Pod::from_bytes(&buf[..len]).unwrap();

        let err = parse_object(&pod, 2, &mut []).unwrap_err();
        assert_eq!(err, PodError::WrongObjectType { expected: 2, found: 1 });
    }

    #[test]
    fn wildcard_key_matches_any_satisfying_property() {
        let mut buf = [0u8; 128];
        let len = build_props_object(&mut buf);
        let pod = Pod::from_bytes(&buf[..len]).unwrap();

        let mut any_bool = None;
        let mut fields = [Field::new(ANY_KEY, Target::Bool(&mut any_bool))];
        let count = parse_object(&pod, 1, &mut fields).unwrap();
        assert_eq!(count, 1);
        assert_eq!(any_bool, Some(true));
    }

    #[test]
    fn pod_target_matches_any_kind_alongside_a_kind_specific_target() {
        let mut buf = [0u8; 128];
        let len = build_props_object(&mut buf);
        let pod = Pod::from_bytes(&buf[..len]).unwrap();

        let mut as_int = None;
        let mut as_pod = None;
        let mut fields = [
            Field::optional(3, Target::Int(&mut as_int)),
            Field::optional(3, Target::Pod(&mut as_pod)),
        ];
        let count = parse_object(&pod, 1, &mut fields).unwrap();
        assert_eq!(count, 2);
        assert_eq!(as_int, Some(21));
        assert!(as_pod.unwrap().get_int() == Some(21));
    }
}
