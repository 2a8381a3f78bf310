use bitbloom::{Error, MembershipFilter, PackedBitSet};

/// Route `debug` logs to the test output, once per test binary.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn test_hello_world() {
    init_tracing();

    let mut f = MembershipFilter::new(10_000, 0.01).unwrap();
    f.put("hello");
    f.put("world");

    assert!(f.may_contain("hello"));
    assert!(f.may_contain("world"));
    assert!((f.expected_fpp() - 0.01).abs() < 1e-4);
}

#[test]
fn test_no_false_negatives() {
    const N: usize = 10_000;
    init_tracing();

    let mut f = MembershipFilter::new(N, 0.01).unwrap();
    for i in 0..N {
        f.put(&format!("item-{i}"));
    }

    for i in 0..N {
        assert!(f.may_contain(&format!("item-{i}")), "false negative for item-{i}");
    }

    // Holding its design capacity, roughly half the bits are set.
    let load = f.load_factor();
    assert!((0.45..0.55).contains(&load), "load factor {load}");
}

#[test]
fn test_false_positive_rate_converges() {
    const N: usize = 200_000;
    const LOOKUPS: usize = 400_000;
    init_tracing();

    let mut f = MembershipFilter::new(N, 0.01).unwrap();
    for i in 0..N {
        f.put(&format!("member-{i}"));
    }

    let false_positives = (0..LOOKUPS)
        .filter(|i| f.may_contain(&format!("absent-{i}")))
        .count();

    let measured = false_positives as f64 / LOOKUPS as f64;
    let expected = f.expected_fpp();
    let relative = (measured - expected).abs() / expected;

    assert!(
        relative < 0.05,
        "measured fpp {measured} is {:.1}% away from the modelled {expected}",
        relative * 100.0
    );
}

#[test]
fn test_merge_keeps_both_sides() {
    const N: usize = 5_000;
    init_tracing();

    let mut evens = MembershipFilter::new(2 * N, 0.01).unwrap();
    let mut odds = MembershipFilter::new(2 * N, 0.01).unwrap();

    for i in 0..N {
        evens.put(&(2 * i));
        odds.put(&(2 * i + 1));
    }

    let odds_before = odds.clone();
    evens.merge(&odds).unwrap();

    for i in 0..2 * N {
        assert!(evens.may_contain(&i), "{i} lost in merge");
    }
    assert_eq!(odds, odds_before);
}

#[test]
fn test_merge_incompatible() {
    let mut f = MembershipFilter::new(10_000, 0.01).unwrap();
    let bad_k = MembershipFilter::new(100_000, 0.03).unwrap();
    let bad_m = MembershipFilter::new(100_000, 0.01).unwrap();

    assert!(matches!(f.merge(&bad_k), Err(Error::IncompatibleFilter(_))));
    assert!(matches!(f.merge(&bad_m), Err(Error::IncompatibleFilter(_))));

    assert!(!f.is_compatible(&f));
    assert!(!f.is_compatible(&[0, 0, 0]));

    // Equal bit lengths are not enough when the projector counts differ.
    let mut seven = MembershipFilter::new(1_000, 0.01).unwrap();
    let four = MembershipFilter::new(1_501, 0.0465).unwrap();
    assert_eq!(seven.num_bits(), four.num_bits());
    assert_ne!(seven.num_hashes(), four.num_hashes());
    assert!(!seven.is_compatible(&four));
    assert!(matches!(seven.merge(&four), Err(Error::IncompatibleFilter(_))));
}

#[test]
fn test_bitset_scenario() {
    let mut b = PackedBitSet::new(10).unwrap();
    assert_eq!(b.storage_units(), 2);
    let bits: bitbloom::BitIter<'_> = b.iter();
    assert_eq!(bits.len(), 10);
    assert!(b.iter().all(|bit| !bit));

    b.set(2).unwrap();
    b.set(5).unwrap();
    assert!(b.get(2).unwrap());
    assert!(b.get(5).unwrap());
    assert!(!b.get(0).unwrap());

    assert_eq!(b.set(15), Err(Error::IndexOutOfRange { index: 15, len: 10 }));
    assert!(matches!(PackedBitSet::new(0), Err(Error::InvalidArgument(_))));
}
