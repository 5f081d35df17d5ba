//! Property-based tests for the universal invariants in spec §8: header
//! sizing, scalar round-tripping, alignment, and array homogeneity. Unit
//! tests elsewhere pin exact byte offsets for fixed scenarios; these
//! generate arbitrary inputs to catch regressions the fixed scenarios
//! wouldn't happen to exercise.

use pod::{Builder, Fraction, PointerValue, Pod, Rectangle};
use proptest::collection::vec;
use proptest::prelude::*;

proptest! {
    /// Property 2 (round trip scalars): every scalar kind reads back
    /// bit-exact after a single builder emit.
    #[test]
    fn int_round_trips(v in any::<i32>()) {
        let mut buf = [0u8; 16];
        let mut b = Builder::new(&mut buf);
        b.int(v);
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_int(), Some(v));
    }

    #[test]
    fn long_round_trips(v in any::<i64>()) {
        let mut buf = [0u8; 16];
        let mut b = Builder::new(&mut buf);
        b.long(v);
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_long(), Some(v));
    }

    #[test]
    fn bool_round_trips(v in any::<bool>()) {
        let mut buf = [0u8; 16];
        let mut b = Builder::new(&mut buf);
        b.bool_(v);
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_bool(), Some(v));
    }

    #[test]
    fn id_round_trips(v in any::<u32>()) {
        let mut buf = [0u8; 16];
        let mut b = Builder::new(&mut buf);
        b.id(v);
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_id(), Some(v));
    }

    #[test]
    fn fd_round_trips(v in any::<i64>()) {
        let mut buf = [0u8; 16];
        let mut b = Builder::new(&mut buf);
        b.fd(v);
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_fd(), Some(v));
    }

    #[test]
    fn float_round_trips(v in -1.0e6_f32..1.0e6_f32) {
        let mut buf = [0u8; 16];
        let mut b = Builder::new(&mut buf);
        b.float(v);
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_float(), Some(v));
    }

    #[test]
    fn double_round_trips(v in -1.0e12_f64..1.0e12_f64) {
        let mut buf = [0u8; 24];
        let mut b = Builder::new(&mut buf);
        b.double(v);
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_double(), Some(v));
    }

    #[test]
    fn string_round_trips(s in "[\\PC]{0,64}") {
        let mut buf = [0u8; 512];
        let mut b = Builder::new(&mut buf);
        b.string(&s);
        let written = b.offset();
        let pod = Pod::from_bytes(&buf[..written]).unwrap();
        prop_assert_eq!(pod.get_string(), Some(s.as_str()));
    }

    #[test]
    fn bytes_round_trip(data in vec(any::<u8>(), 0..64)) {
        let mut buf = [0u8; 256];
        let mut b = Builder::new(&mut buf);
        b.bytes(&data);
        let written = b.offset();
        let pod = Pod::from_bytes(&buf[..written]).unwrap();
        prop_assert_eq!(pod.get_bytes(), Some(data.as_slice()));
    }

    #[test]
    fn rectangle_round_trips(width in any::<u32>(), height in any::<u32>()) {
        let mut buf = [0u8; 16];
        let mut b = Builder::new(&mut buf);
        b.rectangle(Rectangle::new(width, height));
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_rectangle(), Some(Rectangle::new(width, height)));
    }

    #[test]
    fn fraction_round_trips(num in any::<u32>(), denom in any::<u32>()) {
        let mut buf = [0u8; 16];
        let mut b = Builder::new(&mut buf);
        b.fraction(Fraction::new(num, denom));
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_fraction(), Some(Fraction::new(num, denom)));
    }

    #[test]
    fn pointer_round_trips(type_tag in any::<u32>(), address in any::<u64>()) {
        let mut buf = [0u8; 24];
        let mut b = Builder::new(&mut buf);
        b.pointer(PointerValue::new(type_tag, address));
        let pod = Pod::from_bytes(&buf).unwrap();
        prop_assert_eq!(pod.get_pointer(), Some(PointerValue::new(type_tag, address)));
    }

    /// Property 3 (alignment) and property 1 (header invariants): an
    /// arbitrary run of `Int` scalars, each read back through `PodIter`,
    /// lands at an offset that is a multiple of 8 and carries
    /// `total_size == 8 + body_size`.
    #[test]
    fn sequential_scalars_stay_8_byte_aligned(values in vec(any::<i32>(), 0..32)) {
        let mut buf = [0u8; 2048];
        let mut b = Builder::new(&mut buf);
        for &v in &values {
            b.int(v);
        }
        let written = b.offset();
        prop_assert!(!b.overflowed());

        let mut offset = 0usize;
        let mut seen = Vec::new();
        let mut iter = pod::PodIter::new(&buf[..written]);
        while let Some(pod) = iter.next() {
            prop_assert_eq!(offset % 8, 0);
            prop_assert_eq!(pod.total_size(), 8 + pod.body().len());
            seen.push(pod.get_int().unwrap());
            offset = iter.offset();
        }
        prop_assert_eq!(seen, values);
    }

    /// Property 4 (array homogeneity): an arbitrary-length `Array` of `Int`
    /// children round-trips exactly, and the iterator yields precisely
    /// `(body_size - prefix) / child_size` children.
    #[test]
    fn array_of_int_round_trips_and_is_homogeneous(values in vec(any::<i32>(), 0..64)) {
        let mut buf = [0u8; 4096];
        let mut b = Builder::new(&mut buf);
        b.array_int(&values).unwrap();
        let written = b.offset();

        let pod = Pod::from_bytes(&buf[..written]).unwrap();
        let array = pod.as_array().unwrap();
        prop_assert_eq!(array.len(), values.len());
        let round_tripped: Vec<i32> = array.children().map(|c| c.get_int().unwrap()).collect();
        prop_assert_eq!(round_tripped, values);
    }
}
