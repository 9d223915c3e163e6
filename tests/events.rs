//! Assignment Event Tests
//!
//! `Field::set` on Object fields publishes on the process-wide channel. This
//! binary holds a single test so no other test sees its subscriber.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use familiar_fields::event::channel;
use familiar_fields::{BeforeObjectAssigned, Field, Instance, Interface, Value};

#[test]
fn test_set_publishes_before_assignment() {
    let schema = Interface::builder("IChild").build();
    let owner = Instance::new(Vec::new()).into_value();
    let wrapped = Instance::new(vec![schema.clone()]).with("wrapped", true).into_value();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let substitute = wrapped.clone();
    channel().subscribe(move |event: &mut BeforeObjectAssigned| {
        counter.fetch_add(1, Ordering::SeqCst);
        if event.name == "child" {
            event.object = substitute.clone();
        }
    });

    let child = Field::object(schema.clone()).name("child").build().unwrap();
    child.set(&owner, Instance::new(vec![schema]).into_value()).unwrap();
    assert_eq!(child.get(&owner).unwrap(), wrapped);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Plain fields assign without an event
    let label = Field::text_line().name("label").build().unwrap();
    label.set(&owner, Value::from("x")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Subscribers run even when the assignment is then refused
    let frozen = Field::object(Interface::any()).name("frozen").readonly(true).build().unwrap();
    assert!(frozen.set(&owner, Value::Missing).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(frozen.query(&owner, Value::Missing).is_missing());

    channel().clear();
}
