use rand::Rng;
use std::collections::BTreeSet;
use treap_sort::sort::{heap_sort_by_key, treap_sort_by_key, treap_sort_with_seed};
use treap_sort::treap::{Error, TreapMultiset, TreapSet};

const NUM_OF_OPERATIONS: usize = 10_000;

fn rng() -> rand::XorShiftRng {
    rand::SeedableRng::from_seed([1, 1, 1, 1])
}

#[test]
fn int_test_multiset() {
    let mut rng = rng();
    let mut multiset = TreapMultiset::with_seed([2, 2, 2, 2]);
    let mut expected = Vec::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let value = rng.gen_range(0, 1000u32);
        multiset.insert(value);
        let index = match expected.binary_search(&value) {
            Ok(index) | Err(index) => index,
        };
        expected.insert(index, value);
    }

    assert!(multiset.is_valid());
    assert_eq!(multiset.len(), expected.len());
    assert_eq!(
        multiset.iter().collect::<Vec<&u32>>(),
        expected.iter().collect::<Vec<&u32>>(),
    );

    for _ in 0..NUM_OF_OPERATIONS / 2 {
        let value = rng.gen_range(0, 1000u32);
        let count = expected.iter().filter(|v| **v == value).count();
        assert_eq!(multiset.count(&value), count);
        match expected.binary_search(&value) {
            Ok(index) => {
                expected.remove(index);
                assert_eq!(multiset.remove(&value), Ok(value));
            },
            Err(_) => assert_eq!(multiset.remove(&value), Err(Error::NotFound)),
        }
    }

    assert!(multiset.is_valid());
    assert_eq!(multiset.into_iter().collect::<Vec<u32>>(), expected);
}

#[test]
fn int_test_multiset_pop() {
    let mut rng = rng();
    let mut multiset = TreapMultiset::new();
    let mut expected = Vec::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let value = rng.gen::<u32>();
        multiset.insert(value);
        expected.push(value);
    }
    expected.sort();

    while !expected.is_empty() {
        if rng.gen::<bool>() {
            assert_eq!(multiset.pop_min(), Ok(expected.remove(0)));
        } else {
            assert_eq!(multiset.pop_max(), expected.pop().ok_or(Error::Empty));
        }
    }
    assert_eq!(multiset.pop_min(), Err(Error::Empty));
    assert!(multiset.is_empty());
}

#[test]
fn int_test_set() {
    let mut rng = rng();
    let mut set = TreapSet::new();
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let value = rng.gen_range(0, 1000u32);
        if rng.gen_range(0, 3) == 0 {
            assert_eq!(set.remove(&value).is_ok(), expected.remove(&value));
        } else {
            assert_eq!(set.insert(value), expected.insert(value));
        }
    }

    assert!(set.is_valid());
    assert_eq!(set.len(), expected.len());
    assert_eq!(set.min().ok(), expected.iter().next());
    assert_eq!(set.max().ok(), expected.iter().next_back());
    assert_eq!(
        set.iter().collect::<Vec<&u32>>(),
        expected.iter().collect::<Vec<&u32>>(),
    );
}

#[test]
fn int_test_set_operations() {
    let mut rng = rng();
    let mut left_values = BTreeSet::new();
    let mut right_values = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        left_values.insert(rng.gen_range(0, 5000u32));
        right_values.insert(rng.gen_range(0, 5000u32));
    }

    let left: TreapSet<u32> = left_values.iter().cloned().collect();
    let right: TreapSet<u32> = right_values.iter().cloned().collect();

    let check = |actual: TreapSet<u32>, expected: Vec<u32>| {
        assert!(actual.is_valid());
        assert_eq!(actual.into_iter().collect::<Vec<u32>>(), expected);
    };

    check(&left | &right, left_values.union(&right_values).cloned().collect());
    check(
        &left & &right,
        left_values.intersection(&right_values).cloned().collect(),
    );
    check(
        &left - &right,
        left_values.difference(&right_values).cloned().collect(),
    );
    check(
        &left ^ &right,
        left_values
            .symmetric_difference(&right_values)
            .cloned()
            .collect(),
    );

    assert_eq!(left.is_disjoint(&right), left_values.is_disjoint(&right_values));
    assert!((&left & &right).is_subset(&left));
    assert!((&left | &right).is_superset(&right));
}

#[test]
fn int_test_multiset_sum() {
    let mut rng = rng();
    let mut left_values = Vec::new();
    let mut right_values = Vec::new();

    for _ in 0..NUM_OF_OPERATIONS {
        left_values.push(rng.gen_range(0, 100u32));
        right_values.push(rng.gen_range(0, 100u32));
    }

    let left: TreapMultiset<u32> = left_values.iter().cloned().collect();
    let right: TreapMultiset<u32> = right_values.iter().cloned().collect();
    let sum = left + right;

    let mut expected = left_values;
    expected.extend(right_values);
    expected.sort();

    assert!(sum.is_valid());
    assert_eq!(sum.into_iter().collect::<Vec<u32>>(), expected);
}

#[test]
fn int_test_sorts() {
    let mut rng = rng();
    let mut items = Vec::new();

    for i in 0..NUM_OF_OPERATIONS {
        items.push((rng.gen_range(0, 100u32), i));
    }

    let mut expected = items.clone();
    expected.sort_by_key(|item| item.0);
    assert_eq!(
        heap_sort_by_key(items.clone(), |item| item.0, false).collect::<Vec<_>>(),
        expected,
    );
    assert_eq!(
        treap_sort_by_key(items.clone(), |item| item.0, false).collect::<Vec<_>>(),
        expected,
    );

    let mut reversed = items.clone();
    reversed.sort_by_key(|item| std::cmp::Reverse(item.0));
    assert_eq!(
        heap_sort_by_key(items.clone(), |item| item.0, true).collect::<Vec<_>>(),
        reversed,
    );
    assert_eq!(
        treap_sort_by_key(items.clone(), |item| item.0, true).collect::<Vec<_>>(),
        reversed,
    );

    let values = items.iter().map(|item| item.0).collect::<Vec<u32>>();
    let mut sorted = values.clone();
    sorted.sort();
    assert_eq!(
        treap_sort_with_seed(values, false, [3, 3, 3, 3]).collect::<Vec<u32>>(),
        sorted,
    );
}
