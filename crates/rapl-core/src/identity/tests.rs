use crate::{
    entity::{FieldAccessible, FieldSet},
    identity::{IdentityMap, Reconciliation, identity_of},
    test_support::layout,
    value::{IdentityKey, KeyValue, Value},
};
use std::{sync::Arc, thread};

fn author(id: i64, name: &str) -> FieldSet {
    FieldSet::new().with("id", id).with("name", name)
}

#[test]
fn reconcile_same_identity_returns_same_instance() {
    let map = IdentityMap::new();
    let layout = layout("Author");

    let first = map
        .reconcile(&layout, author(5, "A"))
        .expect("first reconcile should succeed");
    let second = map
        .reconcile(&layout, author(5, "A2"))
        .expect("second reconcile should succeed");

    assert!(
        first.ptr_eq(&second),
        "same identity must share one instance"
    );
    assert_eq!(first.get("name"), Some(Value::from("A2")));
    assert_eq!(map.len(), 1);
}

#[test]
fn reconcile_reports_outcome() {
    let map = IdentityMap::new();
    let layout = layout("Author");

    let (_, created) = map
        .reconcile_with_outcome(&layout, author(1, "A"))
        .expect("reconcile should succeed");
    let (_, updated) = map
        .reconcile_with_outcome(&layout, author(1, "B"))
        .expect("reconcile should succeed");
    let (_, untracked) = map
        .reconcile_with_outcome(&layout, FieldSet::new().with("name", "C"))
        .expect("reconcile should succeed");

    assert_eq!(created, Reconciliation::Created);
    assert_eq!(updated, Reconciliation::Updated);
    assert_eq!(untracked, Reconciliation::Untracked);
}

#[test]
fn distinct_identities_get_distinct_instances() {
    let map = IdentityMap::new();
    let layout = layout("Author");

    let a = map.reconcile(&layout, author(1, "A")).expect("reconcile");
    let b = map.reconcile(&layout, author(2, "A")).expect("reconcile");

    assert!(!a.ptr_eq(&b));
    assert_eq!(map.len(), 2);
}

#[test]
fn identity_less_field_sets_are_never_shared() {
    let map = IdentityMap::new();
    let layout = layout("Address");
    let fields = FieldSet::new().with("city", "Oslo").with("zip", "0150");

    let a = map.reconcile(&layout, fields.clone()).expect("reconcile");
    let b = map.reconcile(&layout, fields).expect("reconcile");

    assert!(!a.ptr_eq(&b), "value objects must not be shared");
    assert!(map.is_empty(), "untracked entities create no entries");
}

#[test]
fn missing_or_null_identifier_leaves_entity_untracked() {
    let map = IdentityMap::new();
    let layout = layout("Author");

    let a = map
        .reconcile(&layout, FieldSet::new().with("name", "A"))
        .expect("reconcile");
    let b = map
        .reconcile(
            &layout,
            FieldSet::new().with("id", Value::Null).with("name", "A"),
        )
        .expect("reconcile");

    assert!(!a.ptr_eq(&b));
    assert!(map.is_empty());
}

#[test]
fn update_leaves_absent_fields_untouched() {
    let map = IdentityMap::new();
    let layout = layout("Author");

    let entity = map.reconcile(&layout, author(3, "A")).expect("reconcile");
    map.reconcile(&layout, FieldSet::new().with("id", 3i64))
        .expect("reconcile");

    assert_eq!(entity.get("name"), Some(Value::from("A")));
}

#[test]
fn composite_identity_uses_every_identifier_field() {
    let map = IdentityMap::new();
    let layout = layout("Edition");
    let edition = |printing: i64, copies: i64| {
        FieldSet::new()
            .with("isbn", "978-0")
            .with("printing", printing)
            .with("copies", copies)
    };

    let first = map.reconcile(&layout, edition(1, 100)).expect("reconcile");
    let second = map.reconcile(&layout, edition(2, 100)).expect("reconcile");
    let again = map.reconcile(&layout, edition(1, 250)).expect("reconcile");

    assert!(!first.ptr_eq(&second));
    assert!(first.ptr_eq(&again));
    assert_eq!(first.read().get_value("copies"), Some(&Value::Int(250)));

    let key = IdentityKey::new("Edition", vec![KeyValue::from("978-0"), KeyValue::Int(1)]);
    let tracked = map
        .try_get(&key)
        .expect("edition 978-0/1 should be tracked");
    assert!(tracked.ptr_eq(&first));
}

#[test]
fn float_identifier_is_rejected() {
    let layout = layout("Author");
    let fields = FieldSet::new().with("id", 1.5f64);

    let err = identity_of(&layout, &fields).expect_err("float identity should fail");
    assert!(err.to_string().contains("non-keyable float"));
}

#[test]
fn unknown_field_fails_without_creating_an_entry() {
    let map = IdentityMap::new();
    let layout = layout("Author");

    map.reconcile(&layout, author(9, "A").with("nickname", "x"))
        .expect_err("unknown field should be rejected");

    assert!(!map.contains(&IdentityKey::single("Author", 9i64)));
}

#[test]
fn concurrent_reconcile_creates_one_instance() {
    let map = Arc::new(IdentityMap::new());
    let layout = layout("Author");

    let handles: Vec<_> = thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let map = Arc::clone(&map);
                let layout = Arc::clone(&layout);
                scope.spawn(move || {
                    map.reconcile(&layout, author(42, &format!("writer-{i}")))
                        .expect("concurrent reconcile should succeed")
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|w| w.join().expect("worker should not panic"))
            .collect()
    });

    assert_eq!(map.len(), 1);
    assert!(handles.iter().all(|h| h.ptr_eq(&handles[0])));
}

#[test]
fn held_read_guard_does_not_block_other_identities() {
    let map = IdentityMap::new();
    let layout = layout("Author");

    let held = map.reconcile(&layout, author(1, "A")).expect("reconcile");
    let guard = held.read();

    thread::scope(|scope| {
        // blocks on the entity lock until `guard` is released
        let writer = scope.spawn(|| map.reconcile(&layout, author(1, "B")));
        thread::sleep(std::time::Duration::from_millis(50));

        let other = map
            .reconcile(&layout, author(2, "C"))
            .expect("another identity should reconcile while author 1 is read");
        assert_eq!(other.get("name"), Some(Value::from("C")));
        assert_eq!(guard.get_value("name"), Some(&Value::from("A")));

        drop(guard);
        let updated = writer
            .join()
            .expect("writer should not panic")
            .expect("update should succeed once the guard is gone");
        assert!(updated.ptr_eq(&held));
    });

    assert_eq!(held.get("name"), Some(Value::from("B")));
}
