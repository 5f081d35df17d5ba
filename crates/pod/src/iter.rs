//! Top-level traversal over a contiguous buffer of sibling values.

use pod_core::Header;

use crate::value::Pod;

/// Forward iterator over consecutive, fully-headed POD values packed (with
/// 8-byte alignment padding) inside a region, such as a builder's finished
/// output or a `Struct`'s body.
///
/// Stops as soon as a header fails to decode or would run past the end of
/// the region — this is the "not-inside" sentinel described in §4.1: no
/// panics, iteration simply ends.
pub struct PodIter<'a> {
    region: &'a [u8],
    offset: usize,
}

impl<'a> PodIter<'a> {
    /// Start iterating `region` from its first byte.
    #[must_use]
    pub const fn new(region: &'a [u8]) -> Self {
        Self { region, offset: 0 }
    }

    /// The byte offset the next call to `next()` will read from.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for PodIter<'a> {
    type Item = Pod<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.region.get(self.offset..)?;
        let pod = Pod::from_bytes(remaining).ok()?;
        let step = Header { body_size: pod.body().len() as u32, kind: pod.kind() }.padded_size();
        if step == 0 || self.offset + step > self.region.len() {
            return None;
        }
        self.offset += step;
        Some(pod)
    }
}

/// Report whether `candidate` is a value that lies fully inside `region`,
/// i.e. both its (implicit) 8-byte header and its body are within bounds.
///
/// This only gives a meaningful answer for a `candidate` that was itself
/// decoded from a subslice of `region` (as every accessor and iterator in
/// this crate produces); it compares borrowed-slice address ranges rather
/// than performing a fresh bounds recomputation, matching the "containment
/// check" primitive described in §4.1.
#[must_use]
pub fn is_inside(region: &[u8], candidate: &Pod<'_>) -> bool {
    let region_start = region.as_ptr() as usize;
    let region_end = region_start + region.len();
    let body_start = candidate.body().as_ptr() as usize;
    let body_end = body_start + candidate.body().len();
    let header_start = body_start.wrapping_sub(pod_core::HEADER_SIZE);
    header_start >= region_start && body_end <= region_end && body_end >= body_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Builder;

    #[test]
    fn iterates_every_emitted_value() {
        let mut buf = [0u8; 64];
        let mut b = Builder::new(&mut buf);
        b.none();
        b.bool_(true);
        b.int(21);
        let written = b.offset();

        let values: Vec<_> = PodIter::new(&buf[..written]).collect();
        assert_eq!(values.len(), 3);
        assert!(values[0].is_none());
        assert_eq!(values[1].get_bool(), Some(true));
        assert_eq!(values[2].get_int(), Some(21));
    }

    #[test]
    fn candidate_from_same_buffer_is_inside() {
        let mut buf = [0u8; 32];
        let mut b = Builder::new(&mut buf);
        b.int(7);
        let written = b.offset();
        let region = &buf[..written];
        let pod = PodIter::new(region).next().unwrap();
        assert!(is_inside(region, &pod));
    }
}
