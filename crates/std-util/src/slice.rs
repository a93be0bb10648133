#[macro_export]
macro_rules! assert_empty {
    ($e:expr) => {{
        let items = &$e;
        assert!(items.is_empty(), "expected empty; actual={:?}", items);
    }};
}

/// Asserts every item of an iterable is distinct.
#[macro_export]
macro_rules! assert_unique {
    ($e:expr) => {{
        let mut seen = std::collections::HashSet::new();
        for item in $e {
            assert!(seen.insert(item.clone()), "duplicate item: {:?}", item);
        }
    }};
}
