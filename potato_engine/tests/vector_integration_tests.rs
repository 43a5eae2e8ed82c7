//! Integration tests for GrowableArray through the public API
//!
//! Run with: cargo test --test vector_integration_tests

use potato_engine::potato::utl::{GrowableArray, NoDestruct};
use potato_engine::potato::Error;

// ============================================================================
// ORDERED / UNORDERED REMOVAL SCENARIOS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    A,
    B,
    C,
    D,
}

fn abcd() -> GrowableArray<Tag> {
    [Tag::A, Tag::B, Tag::C, Tag::D].into_iter().collect()
}

#[test]
fn test_integration_erase_keeps_order() {
    let mut tags = abcd();
    tags.erase(1);
    assert_eq!(tags.as_slice(), &[Tag::A, Tag::C, Tag::D]);
}

#[test]
fn test_integration_erase_unordered_fills_gap_with_last() {
    let mut tags = abcd();
    tags.erase_unordered(1);
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[0], Tag::A);
    assert_eq!(tags[1], Tag::D);
    assert_eq!(tags[2], Tag::C);
}

// ============================================================================
// MIXED OPERATION SEQUENCE
// ============================================================================

#[test]
fn test_integration_mixed_operations_match_reference() {
    let mut array: GrowableArray<String> = GrowableArray::new();
    let mut reference: Vec<String> = Vec::new();

    for round in 0..50u32 {
        let value = format!("v{}", round);
        array.push(value.clone());
        reference.push(value);

        if round % 7 == 6 {
            let index = (round as usize * 3) % array.len();
            array.erase(index);
            reference.remove(index);
        }
        if round % 11 == 10 {
            array.truncate(array.len() / 2);
            reference.truncate(reference.len() / 2);
        }
    }

    assert_eq!(array.len(), reference.len());
    assert!(array.iter().eq(reference.iter()));
}

#[test]
fn test_integration_copy_then_move() {
    let mut original: GrowableArray<Vec<u8>> = GrowableArray::new();
    original.push(vec![1]);
    original.push(vec![2, 2]);

    let copy = original.clone();
    let mut destination: GrowableArray<Vec<u8>> = GrowableArray::new();
    destination.move_from(&mut original);

    assert!(original.is_empty());
    assert_eq!(original.capacity(), 0);
    assert_eq!(destination, copy);

    // The moved-from array is still usable
    original.push(vec![9]);
    assert_eq!(original.len(), 1);
}

#[test]
fn test_integration_checked_operations() {
    let mut handles: GrowableArray<u32, NoDestruct> = (0..3).collect();
    assert_eq!(handles.try_erase(5), Err(Error::IndexOutOfRange { index: 5, len: 3 }));
    assert_eq!(handles.try_erase_unordered(0), Ok(0));
    assert_eq!(handles.as_slice(), &[2, 1]);

    handles.clear();
    assert_eq!(handles.try_back(), Err(Error::EmptyContainer));
    assert!(handles.capacity() >= 3);
}
