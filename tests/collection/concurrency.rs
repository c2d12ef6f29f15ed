//! Concurrency Tests
//!
//! Distinct documents live at distinct paths and can be written from many
//! threads through one shared store.

use crate::common::*;
use std::sync::Arc;
use std::thread;

#[test]
fn parallel_writers_on_distinct_documents() {
    let tc = TestCollection::new();
    let store = Arc::new(tc.reopen());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut ids = Vec::new();
                for i in 0..25 {
                    let doc = store
                        .write_document(None, json!({"thread": t, "i": i}))
                        .unwrap();
                    let id = doc.id().unwrap().to_string();
                    store.publish_revision(&id, doc.revision().unwrap()).unwrap();
                    ids.push(id);
                }
                ids
            })
        })
        .collect();

    let mut all = Vec::new();
    for h in handles {
        all.extend(h.join().unwrap());
    }
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 200);
    assert_eq!(store.list_documents().unwrap(), all);
}

#[test]
fn parallel_index_writers() {
    let tc = TestCollection::new();
    let store = Arc::new(tc.reopen());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 0..20 {
                    store
                        .write_index(&format!("idx-{}", t), format!("{}:{}", t, round))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    for t in 0..4 {
        assert_eq!(
            store.get_index(&format!("idx-{}", t)).unwrap(),
            format!("{}:19", t).into_bytes()
        );
    }
    // No temporary files left behind
    assert_eq!(store.list_indexes().unwrap().len(), 4);
    assert_eq!(std::fs::read_dir(tc.path.join("index")).unwrap().count(), 4);
}

#[test]
fn same_meta_entry_last_writer_wins() {
    let tc = TestCollection::new();
    let store = Arc::new(tc.reopen());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.write_document_meta("shared", format!("{}", 1_000_001 + t)).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let raw = store.get_document_meta("shared").unwrap().unwrap();
    let text = String::from_utf8(raw).unwrap();
    assert!(["1000001", "1000002", "1000003", "1000004"].contains(&text.as_str()));
}
