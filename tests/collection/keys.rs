//! Key Validation Tests
//!
//! Ids that cannot name a file in their region are rejected up front, so
//! not-found never surfaces as an I/O error.

use crate::common::*;

fn too_long() -> String {
    "x".repeat(MAX_KEY_LEN + 1)
}

#[test]
fn overlong_ids_answer_false_from_predicates() {
    let tc = TestCollection::new();
    let id = "x".repeat(300);

    assert!(!tc.store.document_exists(&id));
    assert!(!tc.store.index_exists(&id));
    assert!(!tc.store.revision_exists(&id, Revision::new(REVISION_MIN)));
}

#[test]
fn overlong_ids_are_invalid_input_not_io_errors() {
    let tc = TestCollection::new();
    let id = "x".repeat(300);

    assert!(matches!(tc.store.get_index(&id), Err(Error::InvalidInput(_))));
    assert!(matches!(tc.store.get_document_meta(&id), Err(Error::InvalidInput(_))));
    assert!(matches!(tc.store.get_document(&id, None), Err(Error::InvalidInput(_))));
    assert!(matches!(tc.store.list_revisions(&id), Err(Error::InvalidInput(_))));
}

#[test]
fn id_one_past_limit_is_rejected_before_any_write() {
    let tc = TestCollection::new();
    let id = too_long();
    let before = snapshot_tree(&tc.path);

    assert!(matches!(
        tc.store.write_document_meta(&id, "1000001"),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        tc.store.write_document(Some(&id), json!({"a": 1})),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(tc.store.write_index(&id, "blob"), Err(Error::InvalidInput(_))));
    assert!(matches!(tc.store.delete_index(&id), Err(Error::InvalidInput(_))));

    assert_eq!(snapshot_tree(&tc.path), before);
}

#[test]
fn id_at_limit_round_trips() {
    let tc = TestCollection::new();
    let id = "y".repeat(MAX_KEY_LEN);

    let doc = tc.put(Some(&id), json!({"edge": true}));
    assert!(tc.store.document_exists(&id));
    assert_eq!(tc.store.get_document(&id, None).unwrap(), Some(doc));

    tc.store.write_index(&id, "blob").unwrap();
    assert_eq!(tc.store.get_index(&id).unwrap(), b"blob");
    assert_eq!(tc.store.list_indexes().unwrap(), vec![id]);
}
