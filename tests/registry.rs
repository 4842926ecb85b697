// tests/registry.rs

use std::thread;

use shell_relay::errors::RelayError;
use shell_relay::exec::{KillHandle, Task, TaskRegistry};
use shell_relay::types::TaskId;

fn task(pid: u32, cmd: &str) -> Task {
    Task::new(TaskId::new(pid), cmd, KillHandle::new())
}

#[test]
fn register_lookup_deregister() {
    let registry = TaskRegistry::new();
    registry.register(task(100, "sleep 5")).unwrap();

    let found = registry.lookup(TaskId::new(100)).expect("task must be registered");
    assert_eq!(found.command, "sleep 5");
    assert_eq!(registry.len(), 1);

    assert!(registry.deregister(TaskId::new(100)));
    assert!(registry.lookup(TaskId::new(100)).is_none());
    assert!(registry.is_empty());
}

#[test]
fn duplicate_id_is_an_invariant_violation_and_keeps_the_original() {
    let registry = TaskRegistry::new();
    registry.register(task(7, "first")).unwrap();

    match registry.register(task(7, "second")) {
        Err(RelayError::RegistryInvariantViolation(id)) => assert_eq!(id, "7"),
        other => panic!("Expected RegistryInvariantViolation, got: {:?}", other),
    }
    assert_eq!(registry.lookup(TaskId::new(7)).unwrap().command, "first");
}

#[test]
fn deregister_of_absent_id_is_a_no_op() {
    let registry = TaskRegistry::new();
    assert!(!registry.deregister(TaskId::new(1)));

    registry.register(task(1, "x")).unwrap();
    assert!(registry.deregister(TaskId::new(1)));
    assert!(!registry.deregister(TaskId::new(1)));
}

#[test]
fn snapshot_is_ordered_and_detached_from_later_changes() {
    let registry = TaskRegistry::new();
    registry.register(task(30, "c")).unwrap();
    registry.register(task(10, "a")).unwrap();
    registry.register(task(20, "b")).unwrap();

    let snapshot = registry.list();
    registry.deregister(TaskId::new(10));
    registry.register(task(40, "d")).unwrap();

    let ids: Vec<u32> = snapshot.entries.iter().map(|(id, _)| id.as_u32()).collect();
    assert_eq!(ids, vec![10, 20, 30]);
    assert_eq!(snapshot.render(), "10, a\r\n20, b\r\n30, c");
}

#[test]
fn empty_snapshot_renders_placeholder() {
    assert_eq!(TaskRegistry::new().list().render(), "Task list is empty");
}

#[test]
fn kill_through_registry_reaches_the_handle() {
    let registry = TaskRegistry::new();
    let handle = KillHandle::new();
    registry
        .register(Task::new(TaskId::new(5), "sleep 100", handle.clone()))
        .unwrap();

    let entry = registry.lookup(TaskId::new(5)).unwrap();
    entry.kill();
    entry.kill();

    assert!(handle.is_requested());
    // Kill does not deregister.
    assert_eq!(registry.len(), 1);
}

#[test]
fn concurrent_register_and_deregister_leave_registry_empty() {
    let registry = TaskRegistry::new();

    let workers: Vec<_> = (0..8u32)
        .map(|worker| {
            let registry = registry.clone();
            thread::spawn(move || {
                for i in 0..200u32 {
                    let pid = worker * 1000 + i;
                    registry.register(task(pid, "work")).unwrap();
                    let _ = registry.list();
                    assert!(registry.lookup(TaskId::new(pid)).is_some());
                    assert!(registry.deregister(TaskId::new(pid)));
                }
            })
        })
        .collect();

    for w in workers {
        w.join().unwrap();
    }

    assert!(registry.is_empty());
}
