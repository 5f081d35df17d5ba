//! Streaming writer over a caller-provided byte buffer.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use bitflags::bitflags;
use pod_core::{ChoiceKind, Fraction, Header, Kind, PodError, PodResult, PointerValue, Rectangle};

bitflags! {
    /// Builder state flags, a subset of which is active at any moment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct BuilderFlags: u32 {
        /// Scalar emits inside the current frame append header-less bodies.
        const IN_ARRAY_BODY = 1 << 0;
        /// The next scalar/frame emitted in the current Array/Choice frame is
        /// the first child, whose size/type become the frame's template.
        const FIRST_CHILD    = 1 << 1;
        /// The current frame is an Object; `prop()` is legal.
        const IN_OBJECT      = 1 << 2;
        /// A `prop()`/`control()` call has staged a key/offset awaiting the
        /// value that follows it.
        const AWAIT_HEADER   = 1 << 3;
        /// The current frame is a Sequence; `control()` is legal.
        const IN_SEQUENCE    = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Array,
    Choice,
    Struct,
    Object,
    Sequence,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: FrameKind,
    start: usize,
    parent_flags: BuilderFlags,
    /// Captured from the first child of an Array/Choice frame: `(child_size, child_type)`.
    child_template: Option<(u32, Kind)>,
}

/// A streaming POD writer bound to a caller-owned `&mut [u8]`.
///
/// The builder never allocates the output buffer itself (§3.5/§5: "no hidden
/// allocator"). Its frame stack — tracking which containers are still open —
/// is a `Vec<Frame>` rather than the fixed-depth array the original used:
/// idiomatic Rust reaches for a growable stack here rather than hand-rolling
/// a bounded one (see DESIGN.md).
///
/// Writing past the buffer's capacity is non-fatal: the builder keeps
/// advancing its logical offset so [`Builder::required_size`] reports the
/// size a second pass would need, but no byte beyond `buf.len()` is ever
/// touched. Query [`Builder::overflowed`] to detect this.
pub struct Builder<'b> {
    buf: &'b mut [u8],
    offset: usize,
    flags: BuilderFlags,
    frames: Vec<Frame>,
    overflowed: bool,
}

impl<'b> Builder<'b> {
    /// Create a builder writing into `buf` from offset 0.
    #[must_use]
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, offset: 0, flags: BuilderFlags::empty(), frames: Vec::new(), overflowed: false }
    }

    /// The current logical write offset (may exceed `buf.len()` after an
    /// overflowing write).
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// True iff any write so far was suppressed for exceeding buffer capacity.
    #[must_use]
    pub const fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// The total size a buffer would need to hold everything written so far
    /// without truncation. Equal to [`Builder::offset`]; exposed under its
    /// own name so call sites reading for a resize-and-retry loop read
    /// clearly.
    #[must_use]
    pub const fn required_size(&self) -> usize {
        self.offset
    }

    fn write_at(&mut self, at: usize, bytes: &[u8]) {
        match self.buf.get_mut(at..at + bytes.len()) {
            Some(dst) => dst.copy_from_slice(bytes),
            None => {
                self.overflowed = true;
                #[cfg(feature = "tracing")]
                tracing::debug!(at, len = bytes.len(), capacity = self.buf.len(), "pod builder overflow");
            }
        }
    }

    fn pad_to_8(&mut self) {
        let padded = pod_core::round_up_8(self.offset);
        let pad = padded - self.offset;
        if pad > 0 {
            let zeros = [0u8; 8];
            self.write_at(self.offset, &zeros[..pad]);
            self.offset = padded;
        }
    }

    fn consume_await_header(&mut self) {
        self.flags.remove(BuilderFlags::AWAIT_HEADER);
    }

    fn emit_scalar(&mut self, kind: Kind, body: &[u8]) -> usize {
        // Array/Choice children are header-less and packed tight against one
        // another at their exact `child_size` stride (§3.2); only the frame
        // itself pads to 8 on entry (`push_frame`) and the *next* sibling
        // outside the frame pads again on its own entry. Padding a child here
        // too would desynchronize `ArrayRef`/`ChoiceRef`'s fixed-stride
        // iteration from the declared `child_size`.
        if self.flags.contains(BuilderFlags::IN_ARRAY_BODY) {
            let start = self.offset;
            if self.flags.contains(BuilderFlags::FIRST_CHILD) {
                if let Some(frame) = self.frames.last_mut() {
                    frame.child_template = Some((body.len() as u32, kind));
                }
                self.flags.remove(BuilderFlags::FIRST_CHILD);
            }
            self.write_at(self.offset, body);
            self.offset += body.len();
            start
        } else {
            self.pad_to_8();
            let start = self.offset;
            self.consume_await_header();
            let header = Header { body_size: body.len() as u32, kind }.encode();
            self.write_at(self.offset, &header);
            self.offset += header.len();
            self.write_at(self.offset, body);
            self.offset += body.len();
            start
        }
    }

    /// Emit a `None` value.
    pub fn none(&mut self) -> usize {
        self.emit_scalar(Kind::None, &[])
    }

    /// Emit a `Bool`.
    pub fn bool_(&mut self, value: bool) -> usize {
        self.emit_scalar(Kind::Bool, &u32::from(value).to_ne_bytes())
    }

    /// Emit an `Id`.
    pub fn id(&mut self, value: u32) -> usize {
        self.emit_scalar(Kind::Id, &value.to_ne_bytes())
    }

    /// Emit an `Int`.
    pub fn int(&mut self, value: i32) -> usize {
        self.emit_scalar(Kind::Int, &value.to_ne_bytes())
    }

    /// Emit a `Long`.
    pub fn long(&mut self, value: i64) -> usize {
        self.emit_scalar(Kind::Long, &value.to_ne_bytes())
    }

    /// Emit a `Float`.
    pub fn float(&mut self, value: f32) -> usize {
        self.emit_scalar(Kind::Float, &value.to_ne_bytes())
    }

    /// Emit a `Double`.
    pub fn double(&mut self, value: f64) -> usize {
        self.emit_scalar(Kind::Double, &value.to_ne_bytes())
    }

    /// Emit a `String`, appending the required NUL terminator.
    pub fn string(&mut self, value: &str) -> usize {
        self.pad_to_8();
        let start = self.offset;
        self.consume_await_header();
        let body_size = value.len() + 1;
        let header = Header { body_size: body_size as u32, kind: Kind::String }.encode();
        self.write_at(self.offset, &header);
        self.offset += header.len();
        self.write_at(self.offset, value.as_bytes());
        self.offset += value.len();
        self.write_at(self.offset, &[0u8]);
        self.offset += 1;
        start
    }

    /// Emit opaque `Bytes`.
    pub fn bytes(&mut self, value: &[u8]) -> usize {
        self.emit_scalar(Kind::Bytes, value)
    }

    /// Emit packed `Bitmap` bits. Layout-identical to [`Builder::bytes`] —
    /// a `Bitmap` has no terminator or length prefix beyond the universal
    /// header, it's simply opaque bits under a different type id (§3.2).
    pub fn bitmap(&mut self, bits: &[u8]) -> usize {
        self.emit_scalar(Kind::Bitmap, bits)
    }

    /// Emit a `Rectangle`.
    pub fn rectangle(&mut self, value: Rectangle) -> usize {
        self.emit_scalar(Kind::Rectangle, &value.encode())
    }

    /// Emit a `Fraction`.
    pub fn fraction(&mut self, value: Fraction) -> usize {
        self.emit_scalar(Kind::Fraction, &value.encode())
    }

    /// Emit a `Pointer`. See [`PointerValue`] for the process-local caveat.
    pub fn pointer(&mut self, value: PointerValue) -> usize {
        self.emit_scalar(Kind::Pointer, &value.encode())
    }

    /// Emit an `Fd` table index.
    pub fn fd(&mut self, value: i64) -> usize {
        self.emit_scalar(Kind::Fd, &value.to_ne_bytes())
    }

    /// Embed a complete, already-encoded value (header + body) verbatim,
    /// e.g. a borrowed [`crate::value::Pod`] re-emitted into a new buffer.
    pub fn pod_raw(&mut self, kind: Kind, body: &[u8]) -> usize {
        self.emit_scalar(kind, body)
    }

    fn push_frame(&mut self, kind: FrameKind, header_kind: Kind, prefix: &[u8], new_flags: BuilderFlags) -> usize {
        self.pad_to_8();
        self.consume_await_header();
        let start = self.offset;
        let header = Header { body_size: 0, kind: header_kind }.encode();
        self.write_at(self.offset, &header);
        self.offset += header.len();
        self.write_at(self.offset, prefix);
        self.offset += prefix.len();
        self.frames.push(Frame { kind, start, parent_flags: self.flags, child_template: None });
        self.flags = new_flags;
        start
    }

    /// Push an `Array` frame. Children are emitted with the plain scalar
    /// primitives; the first child's size/type become the array's template.
    pub fn push_array(&mut self) -> usize {
        self.push_frame(
            FrameKind::Array,
            Kind::Array,
            &0u32.to_ne_bytes().repeat(2),
            BuilderFlags::IN_ARRAY_BODY | BuilderFlags::FIRST_CHILD,
        )
    }

    /// Push a `Choice` frame. The first emitted child is the default.
    pub fn push_choice(&mut self, choice_kind: ChoiceKind, flags: u32) -> usize {
        let mut prefix = [0u8; 16];
        prefix[0..4].copy_from_slice(&choice_kind.to_u32().to_ne_bytes());
        prefix[4..8].copy_from_slice(&flags.to_ne_bytes());
        self.push_frame(
            FrameKind::Choice,
            Kind::Choice,
            &prefix,
            BuilderFlags::IN_ARRAY_BODY | BuilderFlags::FIRST_CHILD,
        )
    }

    /// Push a `Struct` frame. Children are plain, heterogeneous, fully-headed
    /// values.
    pub fn push_struct(&mut self) -> usize {
        self.push_frame(FrameKind::Struct, Kind::Struct, &[], BuilderFlags::empty())
    }

    /// Push an `Object` frame. `prop()` becomes legal until `pop()`.
    pub fn push_object(&mut self, object_type: u32, object_id: u32) -> usize {
        let mut prefix = [0u8; 8];
        prefix[0..4].copy_from_slice(&object_type.to_ne_bytes());
        prefix[4..8].copy_from_slice(&object_id.to_ne_bytes());
        self.push_frame(FrameKind::Object, Kind::Object, &prefix, BuilderFlags::IN_OBJECT)
    }

    /// Push a `Sequence` frame. `control()` becomes legal until `pop()`.
    pub fn push_sequence(&mut self, unit: u32) -> usize {
        let mut prefix = [0u8; 8];
        prefix[0..4].copy_from_slice(&unit.to_ne_bytes());
        self.push_frame(FrameKind::Sequence, Kind::Sequence, &prefix, BuilderFlags::IN_SEQUENCE)
    }

    /// Stage a property key inside the current `Object` frame; the very next
    /// scalar or pushed frame becomes this property's value.
    ///
    /// Pads to 8 bytes first so the record's own `{key,flags}` starts
    /// 8-aligned and the value immediately follows it with no interior gap —
    /// `Properties::next` strides by `8 + round_up_8(value total)` from the
    /// record start and has no other way to find the value.
    ///
    /// # Errors
    /// [`PodError::NotInFrame`] if the current frame is not an `Object`.
    pub fn prop(&mut self, key: u32, flags: u32) -> PodResult<()> {
        if !self.flags.contains(BuilderFlags::IN_OBJECT) {
            return Err(PodError::NotInFrame);
        }
        self.pad_to_8();
        self.write_at(self.offset, &key.to_ne_bytes());
        self.offset += 4;
        self.write_at(self.offset, &flags.to_ne_bytes());
        self.offset += 4;
        self.flags.insert(BuilderFlags::AWAIT_HEADER);
        Ok(())
    }

    /// Stage a control record's `(offset, type)` header inside the current
    /// `Sequence` frame; the very next scalar or pushed frame becomes this
    /// control's value.
    ///
    /// Pads to 8 bytes first for the same reason as [`Builder::prop`]:
    /// `Controls::next` strides from the record start assuming the value
    /// follows `{offset,type}` directly.
    ///
    /// # Errors
    /// [`PodError::NotInFrame`] if the current frame is not a `Sequence`.
    pub fn control(&mut self, offset: u32, control_type: u32) -> PodResult<()> {
        if !self.flags.contains(BuilderFlags::IN_SEQUENCE) {
            return Err(PodError::NotInFrame);
        }
        self.pad_to_8();
        self.write_at(self.offset, &offset.to_ne_bytes());
        self.offset += 4;
        self.write_at(self.offset, &control_type.to_ne_bytes());
        self.offset += 4;
        self.flags.insert(BuilderFlags::AWAIT_HEADER);
        Ok(())
    }

    /// Close the top frame, back-patching its header body-size and, for
    /// Array/Choice, the `(child_size, child_type)` prefix captured from the
    /// first child. Returns the frame's start offset.
    ///
    /// # Errors
    /// [`PodError::NoOpenFrame`] if no frame is open.
    pub fn pop(&mut self) -> PodResult<usize> {
        let frame = self.frames.pop().ok_or(PodError::NoOpenFrame)?;
        let body_size = (self.offset - (frame.start + pod_core::HEADER_SIZE)) as u32;
        let header_kind = match frame.kind {
            FrameKind::Array => Kind::Array,
            FrameKind::Choice => Kind::Choice,
            FrameKind::Struct => Kind::Struct,
            FrameKind::Object => Kind::Object,
            FrameKind::Sequence => Kind::Sequence,
        };
        let header = Header { body_size, kind: header_kind }.encode();
        self.write_at(frame.start, &header);

        if let Some((child_size, child_type)) = frame.child_template {
            let prefix_offset = match frame.kind {
                FrameKind::Array => frame.start + pod_core::HEADER_SIZE,
                FrameKind::Choice => frame.start + pod_core::HEADER_SIZE + 8,
                _ => unreachable!("child_template only recorded for Array/Choice frames"),
            };
            let mut prefix = [0u8; 8];
            prefix[0..4].copy_from_slice(&child_size.to_ne_bytes());
            prefix[4..8].copy_from_slice(&child_type.to_u32().to_ne_bytes());
            self.write_at(prefix_offset, &prefix);
        }

        self.flags = frame.parent_flags;
        Ok(frame.start)
    }

    /// Convenience: emit a complete `Array` of `Int` children in one call.
    pub fn array_int(&mut self, values: &[i32]) -> PodResult<usize> {
        let start = self.push_array();
        for &v in values {
            self.int(v);
        }
        self.pop()?;
        Ok(start)
    }

    /// Convenience: emit a complete `Array` of `Long` children in one call.
    pub fn array_long(&mut self, values: &[i64]) -> PodResult<usize> {
        let start = self.push_array();
        for &v in values {
            self.long(v);
        }
        self.pop()?;
        Ok(start)
    }
}
