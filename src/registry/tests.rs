use super::ConnectionRegistry;
use crate::utils::RelayError;

#[test]
fn test_register_and_lookup() {
    let registry = ConnectionRegistry::new();
    registry.register("conn1", "key1").unwrap();

    let info = registry.lookup("conn1").unwrap();
    assert_eq!(info.connection_id, "conn1");
    assert_eq!(info.api_key, "key1");
    assert!(registry.contains("conn1"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_register_duplicate_keeps_original() {
    let registry = ConnectionRegistry::new();
    registry.register("conn1", "key1").unwrap();

    let err = registry.register("conn1", "key2").unwrap_err();
    assert_eq!(err, RelayError::DuplicateConnection("conn1".to_string()));
    assert_eq!(registry.lookup("conn1").unwrap().api_key, "key1");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_unregister_returns_record() {
    let registry = ConnectionRegistry::new();
    registry.register("conn1", "key1").unwrap();

    let removed = registry.unregister("conn1").unwrap();
    assert_eq!(removed.api_key, "key1");
    assert!(registry.lookup("conn1").is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_unregister_twice_is_idempotent() {
    let registry = ConnectionRegistry::new();
    registry.register("conn1", "key1").unwrap();

    assert!(registry.unregister("conn1").is_some());
    assert!(registry.unregister("conn1").is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_unregister_unknown_connection() {
    let registry = ConnectionRegistry::new();
    assert!(registry.unregister("never-seen").is_none());
}

#[test]
fn test_reregister_after_unregister() {
    let registry = ConnectionRegistry::new();
    registry.register("conn1", "key1").unwrap();
    registry.unregister("conn1");

    registry.register("conn1", "key2").unwrap();
    assert_eq!(registry.lookup("conn1").unwrap().api_key, "key2");
}

#[test]
fn test_concurrent_registrations() {
    let registry = ConnectionRegistry::new();

    std::thread::scope(|s| {
        for i in 0..16 {
            let registry = &registry;
            s.spawn(move || {
                registry.register(&format!("conn{i}"), "key").unwrap();
            });
        }
    });

    assert_eq!(registry.len(), 16);
}
