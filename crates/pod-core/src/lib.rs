//! pod-core — value kinds, universal header, and error types for the POD
//! binary codec.
//!
//! This crate carries no traversal logic and no buffer access: it is the
//! closed vocabulary ([`Kind`], [`ChoiceKind`]), the 8-byte [`Header`] every
//! value begins with, the small fixed-layout bodies ([`Rectangle`],
//! [`Fraction`], [`PointerValue`]), and the [`PodError`] kinds shared by the
//! decode and schema-parse layers in the `pod` crate above it.
//!
//! Features:
//! - `std` (default): enables `std::error::Error` for [`PodError`] via `thiserror`.
//! - `serde`: derives `Serialize`/`Deserialize` on the plain descriptive types.

#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

mod choice;
mod error;
mod geometry;
mod header;
mod kind;

pub use choice::ChoiceKind;
pub use error::{PodError, PodResult};
pub use geometry::{Fraction, PointerValue, Rectangle};
pub use header::{round_up_8, Header, HEADER_SIZE};
pub use kind::Kind;

/// Convenient re-exports for importing the core vocabulary in one line.
pub mod prelude {
    pub use crate::{
        round_up_8, ChoiceKind, Fraction, Header, Kind, PodError, PodResult, PointerValue,
        Rectangle, HEADER_SIZE,
    };
}
