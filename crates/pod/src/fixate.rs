//! Collapsing `Choice` values to their default, in place.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use pod_core::{Header, Kind, HEADER_SIZE};

/// Walk a POD tree rooted at `bytes[..]` (a single headed value) and rewrite
/// every `Choice` it contains, recursively through `Object` property values,
/// `Struct` fields and `Sequence` control values, to its default (first)
/// child as a plain value.
///
/// A `Choice` whose `choice_kind` is [`pod_core::ChoiceKind::None`] already
/// carries a single child and is left as a single-valued choice (per §4.4);
/// this function does not special-case it further, since rewriting its
/// single child in place is a no-op either way.
///
/// This resolves Open Question 1 (see DESIGN.md) by leaving enclosing body
/// sizes untouched: a `Choice`'s own 8-byte header is rewritten so its
/// `type_id` becomes the default child's type and its `body_size` is left at
/// the *original* choice body size (not shrunk), the default child's bytes
/// are copied over the vacated 16-byte choice body-prefix, and the remaining
/// slack bytes are zeroed. Because every `is_<kind>`/`get_<kind>` predicate
/// accepts a body size greater than or equal to the kind's minimum, the
/// rewritten value reads back correctly as a plain value of the child's
/// kind, and sibling offsets computed from the unchanged outer body size are
/// undisturbed.
///
/// Operates on already-validated, well-formed input; behavior on malformed
/// input (truncated headers, bad type ids) is simply "do nothing further to
/// this subtree" rather than a panic.
pub fn fixate(bytes: &mut [u8]) {
    fixate_value(bytes);
}

/// Fixate a fully-headed value: decode its header, then dispatch on kind.
fn fixate_value(bytes: &mut [u8]) {
    let Ok(header) = Header::decode(bytes) else { return };
    let body_size = header.body_size as usize;
    if bytes.len() < HEADER_SIZE + body_size {
        return;
    }
    fixate_body(header.kind, bytes, body_size);
}

/// Fixate a fully-headed value given its already-decoded kind and body
/// bounds (`bytes` starts at the 8-byte header).
fn fixate_body(kind: Kind, bytes: &mut [u8], body_size: usize) {
    match kind {
        Kind::Choice => fixate_choice(bytes, body_size),
        Kind::Object => fixate_object(&mut bytes[HEADER_SIZE..HEADER_SIZE + body_size]),
        Kind::Struct => fixate_struct(&mut bytes[HEADER_SIZE..HEADER_SIZE + body_size]),
        Kind::Sequence => fixate_sequence(&mut bytes[HEADER_SIZE..HEADER_SIZE + body_size]),
        _ => {}
    }
}

/// Fixate a header-less `Choice` child in place, given its declared kind and
/// size (no 8-byte header precedes it on the wire — only `Object`, `Struct`
/// and `Sequence` children are meaningfully recursed into here; a `Choice`
/// or scalar child needs no further rewriting of its own bytes).
fn fixate_headless_child(kind: Kind, child: &mut [u8]) {
    match kind {
        Kind::Object => fixate_object(child),
        Kind::Struct => fixate_struct(child),
        Kind::Sequence => fixate_sequence(child),
        _ => {}
    }
}

/// Rewrite a `Choice`'s header and body in place to its default child.
/// `bytes` starts at the choice's own 8-byte header.
fn fixate_choice(bytes: &mut [u8], body_size: usize) {
    if body_size < 16 {
        return;
    }
    let prefix = &bytes[HEADER_SIZE..HEADER_SIZE + 16];
    let child_size = u32::from_ne_bytes(prefix[8..12].try_into().unwrap()) as usize;
    let Some(child_type_raw) = prefix[12..16].try_into().ok().map(u32::from_ne_bytes) else {
        return;
    };
    let Some(child_type) = Kind::from_u32(child_type_raw) else { return };
    if child_size == 0 || 16 + child_size > body_size {
        return;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(?child_type, child_size, "fixating choice to default");

    // The default child is header-less on the wire; recursively fixate it
    // in its original slot before relocating its bytes, so an Object/Struct/
    // Sequence nested as a choice alternative still collapses correctly.
    let children_start = HEADER_SIZE + 16;
    fixate_headless_child(child_type, &mut bytes[children_start..children_start + child_size]);

    let new_header = Header { body_size: body_size as u32, kind: child_type }.encode();
    bytes[0..HEADER_SIZE].copy_from_slice(&new_header);

    let default_child: Vec<u8> = bytes[children_start..children_start + child_size].to_vec();
    bytes[HEADER_SIZE..HEADER_SIZE + child_size].copy_from_slice(&default_child);
    let body_end = HEADER_SIZE + body_size;
    for b in &mut bytes[HEADER_SIZE + child_size..body_end] {
        *b = 0;
    }
}

fn fixate_object(body: &mut [u8]) {
    if body.len() < 8 {
        return;
    }
    let mut offset = 8;
    while offset + 8 <= body.len() {
        let value_start = offset + 8;
        let Ok(header) = Header::decode(&body[value_start..]) else { break };
        let value_total = HEADER_SIZE + header.body_size as usize;
        if value_start + value_total > body.len() {
            break;
        }
        fixate_value(&mut body[value_start..value_start + value_total]);
        let step = 8 + pod_core::round_up_8(value_total);
        if step == 0 || offset + step > body.len() {
            break;
        }
        offset += step;
    }
}

fn fixate_struct(body: &mut [u8]) {
    let mut offset = 0;
    while offset + HEADER_SIZE <= body.len() {
        let Ok(header) = Header::decode(&body[offset..]) else { break };
        let total = HEADER_SIZE + header.body_size as usize;
        if offset + total > body.len() {
            break;
        }
        fixate_value(&mut body[offset..offset + total]);
        let step = pod_core::round_up_8(total);
        if step == 0 || offset + step > body.len() {
            break;
        }
        offset += step;
    }
}

fn fixate_sequence(body: &mut [u8]) {
    if body.len() < 8 {
        return;
    }
    let mut offset = 8;
    while offset + 8 <= body.len() {
        let value_start = offset + 8;
        let Ok(header) = Header::decode(&body[value_start..]) else { break };
        let value_total = HEADER_SIZE + header.body_size as usize;
        if value_start + value_total > body.len() {
            break;
        }
        fixate_value(&mut body[value_start..value_start + value_total]);
        let step = 8 + pod_core::round_up_8(value_total);
        if step == 0 || offset + step > body.len() {
            break;
        }
        offset += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value::Pod, Builder, ChoiceKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn fixates_choice_property_to_its_default() {
        let mut buf = [0u8; 128];
        let written = {
            let mut b = Builder::new(&mut buf);
            b.push_object(1, 0);
            b.prop(10, 0).unwrap();
            b.push_choice(ChoiceKind::Enum, 0);
            b.id(100); // default
            b.id(100);
            b.id(200);
            b.pop().unwrap();
            b.pop().unwrap();
            b.offset()
        };

        fixate(&mut buf[..written]);

        let pod = Pod::from_bytes(&buf[..written]).unwrap();
        let object = pod.as_object().unwrap();
        let prop = object.find_property(10).unwrap();
        assert!(!prop.value.is_choice());
        assert_eq!(prop.value.get_id(), Some(100));
    }

    #[test]
    fn enclosing_object_body_size_is_unchanged_after_fixate() {
        let mut buf = [0u8; 128];
        let written = {
            let mut b = Builder::new(&mut buf);
            b.push_object(1, 0);
            b.prop(10, 0).unwrap();
            b.push_choice(ChoiceKind::Range, 0);
            b.rectangle(pod_core::Rectangle::new(320, 242));
            b.rectangle(pod_core::Rectangle::new(1, 1));
            b.rectangle(pod_core::Rectangle::new(i32::MAX as u32, i32::MAX as u32));
            b.pop().unwrap();
            b.pop().unwrap();
            b.offset()
        };
        let before = Pod::from_bytes(&buf[..written]).unwrap().body().len();

        fixate(&mut buf[..written]);

        let after = Pod::from_bytes(&buf[..written]).unwrap().body().len();
        assert_eq!(before, after);

        let pod = Pod::from_bytes(&buf[..written]).unwrap();
        let object = pod.as_object().unwrap();
        let prop = object.find_property(10).unwrap();
        assert_eq!(prop.value.get_rectangle(), Some(pod_core::Rectangle::new(320, 242)));
    }

    #[test]
    fn choice_kind_none_is_left_as_single_valued_choice_value() {
        let mut buf = [0u8; 64];
        let written = {
            let mut b = Builder::new(&mut buf);
            b.push_choice(ChoiceKind::None, 0);
            b.int(7);
            b.pop().unwrap();
            b.offset()
        };

        fixate(&mut buf[..written]);

        let pod = Pod::from_bytes(&buf[..written]).unwrap();
        assert_eq!(pod.get_int(), Some(7));
    }
}
