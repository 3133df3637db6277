use bivec::{BiVec, Error};

fn filled(values: &[i64]) -> BiVec<i64> {
    let v = BiVec::<i64>::with_capacity(0);
    for &x in values {
        v.push(x).unwrap();
    }
    v
}

fn contents(v: &BiVec<i64>) -> Vec<i64> {
    (0..v.size()).map(|i| v.get_at(i).unwrap()).collect()
}

#[test]
fn sort_then_search() {
    let v = filled(&[5, 2, 8, 1, 9, 3]);
    v.sort(i64::cmp);
    assert_eq!(contents(&v), [1, 2, 3, 5, 8, 9]);
    assert_eq!(v.bsearch(&8, i64::cmp), Ok(4));
    assert_eq!(v.bsearch(&4, i64::cmp), Err(3));
}

#[test]
fn sort_is_idempotent() {
    let v = filled(&[3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5]);
    v.sort(i64::cmp);
    let once = contents(&v);
    v.sort(i64::cmp);
    assert_eq!(contents(&v), once);
}

#[test]
fn sort_handles_duplicates_and_reverse_order() {
    let input: Vec<i64> = (0..512).map(|i| (511 - i) % 7).collect();
    let v = filled(&input);
    v.sort(i64::cmp);
    let mut expect = input.clone();
    expect.sort_unstable();
    assert_eq!(contents(&v), expect);
}

#[test]
fn search_finds_every_sorted_element() {
    let input: Vec<i64> = (0..300).map(|i| i * 3).collect();
    let v = filled(&input);
    v.sort(i64::cmp);
    for (i, key) in input.iter().enumerate() {
        assert_eq!(v.bsearch(key, i64::cmp), Ok(i));
    }
    // misses report the ordered insertion point
    assert_eq!(v.bsearch(&-5, i64::cmp), Err(0));
    assert_eq!(v.bsearch(&4, i64::cmp), Err(2));
    assert_eq!(v.bsearch(&10_000, i64::cmp), Err(300));
}

#[test]
fn search_on_empty_reports_front_insertion() {
    let v = BiVec::<i64>::with_capacity(4);
    assert_eq!(v.bsearch(&1, i64::cmp), Err(0));
}

#[test]
fn add_ordered_maintains_order() {
    let v = BiVec::<i64>::with_capacity(4);
    for x in [5, 1, 4, 2, 3, 9, 0, 7, 8, 6] {
        v.add_ordered(x, i64::cmp).unwrap();
    }
    assert_eq!(contents(&v), [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn add_ordered_many_with_duplicates() {
    let v = BiVec::<i64>::with_capacity(8);
    // deterministic pseudo-random inserts, duplicate-heavy
    let mut x: i64 = 17;
    let mut expect = Vec::new();
    for _ in 0..400 {
        x = (x * 1103515245 + 12345) % 97;
        v.add_ordered(x, i64::cmp).unwrap();
        expect.push(x);
    }
    expect.sort_unstable();
    assert_eq!(contents(&v), expect);
}

#[test]
fn swap_exchanges_elements() {
    let v = filled(&[1, 2, 3]);
    v.swap(0, 2).unwrap();
    assert_eq!(contents(&v), [3, 2, 1]);
    v.swap(1, 1).unwrap();
    assert_eq!(contents(&v), [3, 2, 1]);
    assert_eq!(v.swap(0, 3), Err(Error::OutOfBounds));
}

#[test]
fn swap_range_exchanges_blocks() {
    let v = filled(&[0, 1, 2, 3, 4, 5, 6, 7]);
    v.swap_range(0, 2, 4).unwrap();
    assert_eq!(contents(&v), [4, 5, 6, 3, 0, 1, 2, 7]);
    // overlapping ranges are refused
    assert_eq!(v.swap_range(0, 3, 2), Err(Error::OutOfBounds));
    assert_eq!(v.swap_range(0, 2, 6), Err(Error::OutOfBounds));
}

#[test]
fn rotate_left_then_right_is_identity() {
    let before = [1, 2, 3, 4, 5, 6, 7];
    let v = filled(&before);
    for k in 0..=before.len() {
        v.rotate_left(k).unwrap();
        v.rotate_right(k).unwrap();
        assert_eq!(contents(&v), before, "k = {}", k);
    }
}

#[test]
fn rotate_left_moves_head_to_tail() {
    let v = filled(&[1, 2, 3, 4, 5]);
    v.rotate_left(2).unwrap();
    assert_eq!(contents(&v), [3, 4, 5, 1, 2]);
    v.rotate_left(1).unwrap();
    assert_eq!(contents(&v), [4, 5, 1, 2, 3]);
    assert_eq!(v.rotate_left(6), Err(Error::OutOfBounds));
}

#[test]
fn rotate_right_moves_tail_to_head() {
    let v = filled(&[1, 2, 3, 4, 5]);
    v.rotate_right(2).unwrap();
    assert_eq!(contents(&v), [4, 5, 1, 2, 3]);
    v.rotate_right(1).unwrap();
    assert_eq!(contents(&v), [3, 4, 5, 1, 2]);
    assert_eq!(v.rotate_right(9), Err(Error::OutOfBounds));
}

#[test]
fn sorted_search_after_interleaved_mutation() {
    let v = BiVec::<i64>::with_capacity(4);
    for x in [40, 10, 30, 20] {
        v.add_ordered(x, i64::cmp).unwrap();
    }
    v.delete_at(1).unwrap(); // drop 20
    assert_eq!(contents(&v), [10, 30, 40]);
    assert_eq!(v.bsearch(&30, i64::cmp), Ok(1));
    assert_eq!(v.bsearch(&20, i64::cmp), Err(1));
}
