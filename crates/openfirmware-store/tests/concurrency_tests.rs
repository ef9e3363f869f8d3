//! Concurrency tests for the blob store.

use openfirmware_store::prelude::*;
use openfirmware_test_helpers::prelude::*;
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_inserts_of_distinct_names() -> TestResult {
    let store = Arc::new(BlobStore::create(4)?);
    let mut handles = vec![];

    for i in 0..8u8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for j in 0..50u8 {
                must(store.insert(&format!("fw-{i}-{j}"), &[i, j]));
            }
        }));
    }

    for handle in handles {
        assert!(handle.join().is_ok(), "Thread should not panic");
    }

    assert_eq!(store.len(), 8 * 50);
    assert_eq!(store.get("fw-3-7").as_deref(), Some(&[3u8, 7][..]));
    Ok(())
}

#[test]
fn test_concurrent_overwrites_leave_one_entry() -> TestResult {
    let store = Arc::new(BlobStore::create(1)?);
    let mut handles = vec![];

    for i in 0..8u8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                must(store.insert("shared", &[i; 16]));
            }
        }));
    }

    for handle in handles {
        assert!(handle.join().is_ok(), "Thread should not panic");
    }

    assert_eq!(store.len(), 1);
    let bytes = must_some(store.get("shared"), "shared entry");
    // Whole-value writes: never a mix of two writers.
    let first = must_some(bytes.first().copied(), "non-empty blob");
    assert!(bytes.iter().all(|b| *b == first));
    Ok(())
}

#[test]
fn test_readers_during_remove_all() -> TestResult {
    let store = Arc::new(BlobStore::create(16)?);
    for i in 0..16u8 {
        store.insert(&format!("fw-{i}"), &[i])?;
    }

    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..1000 {
                if let Some(bytes) = store.get("fw-5") {
                    assert_eq!(&*bytes, &[5u8]);
                }
            }
        })
    };

    store.remove_all()?;
    assert!(reader.join().is_ok(), "Reader should not panic");
    assert!(store.is_empty());
    Ok(())
}
