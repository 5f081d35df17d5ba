//! `pod` — iterator, streaming builder, schema-directed parser and the
//! variadic compose/extract façade for the POD binary value codec.
//!
//! This crate sits on top of [`pod_core`]'s closed value-kind vocabulary and
//! universal 8-byte header; everything here touches a caller-owned byte
//! buffer, which `pod-core` deliberately does not. Five pieces, leaves first:
//!
//! - [`value`] — [`Pod`], a borrowed, non-owning view over one decoded value,
//!   plus the typed `is_<kind>`/`get_<kind>` accessors and the structured
//!   container views ([`ArrayRef`], [`ChoiceRef`], [`StructRef`],
//!   [`ObjectRef`], [`SequenceRef`]).
//! - [`iter`] — [`PodIter`], forward traversal over consecutive sibling
//!   values, and the `is_inside` containment check.
//! - [`builder`] — [`Builder`], a streaming writer with push/pop framing for
//!   arrays, choices, structs, objects and sequences.
//! - [`fixate`] — collapsing every `Choice` in a tree to its default.
//! - [`parser`]/[`compose`] — the schema-directed extract and compose
//!   façade, keyed by object properties.
//!
//! Features:
//! - `std` (default): `pod-core/std` plus ordinary `std::vec::Vec` for the
//!   builder's frame stack.
//! - `alloc`: always implied by `std`; the no_std+alloc configuration needs
//!   it directly for the same `Vec`.
//! - `serde` (optional): re-derives on the plain descriptive types.
//! - `tracing` (optional, default-on): instruments overflow, malformed input
//!   and fixation at `trace`/`debug` level. The codec behaves identically
//!   with the feature off.

#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub use pod_core::{
    round_up_8, ChoiceKind, Fraction, Header, Kind, PodError, PodResult, PointerValue, Rectangle,
    HEADER_SIZE,
};

mod builder;
mod compose;
mod fixate;
mod iter;
mod parser;
mod value;

pub use builder::Builder;
pub use compose::{compose_object, ChoiceValues, ComposeField, ComposeValue};
pub use fixate::fixate;
pub use iter::{is_inside, PodIter};
pub use parser::{parse_object, Field, Target, ANY_KEY};
pub use value::{
    ArrayRef, ChildValues, ChoiceRef, ControlRef, Controls, ObjectRef, Pod, Properties,
    PropertyRef, SequenceRef, StructFields, StructRef,
};

/// Convenient re-exports for importing the whole public surface in one line.
pub mod prelude {
    pub use crate::{
        compose_object, fixate, is_inside, parse_object, ArrayRef, Builder, ChildValues,
        ChoiceKind, ChoiceRef, ChoiceValues, ComposeField, ComposeValue, ControlRef, Controls,
        Field, Fraction, Header, Kind, ObjectRef, Pod, PodError, PodIter, PodResult, PointerValue,
        Properties, PropertyRef, Rectangle, SequenceRef, StructFields, StructRef, Target,
        HEADER_SIZE, ANY_KEY,
    };
}
