use tempfile::TempDir;

use mcpdeck_core::mcp::McpConnection;
use mcpdeck_core::registry::ServiceRegistry;
use mcpdeck_core::state::{AgentState, AgentStateStore, StateSink};

#[test]
fn load_missing_returns_empty_state() {
    let temp = TempDir::new().unwrap();
    let store = AgentStateStore::from_path(temp.path().join("state.json"));

    let state = store.load().unwrap();

    assert!(state.mcp_config.is_none());
    assert!(state.extra.is_empty());
}

#[test]
fn save_then_load_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = AgentStateStore::from_path(temp.path().join("nested").join("state.json"));

    let state = AgentState::with_config(ServiceRegistry::sample());
    store.save(&state).unwrap();

    assert_eq!(store.load().unwrap(), state);
}

#[test]
fn publish_replaces_config_and_keeps_other_fields() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    std::fs::write(
        &path,
        r#"{"messages": [], "mcp_config": {"old": {"command": "node", "args": [], "transport": "stdio"}}}"#,
    )
    .unwrap();

    let mut store = AgentStateStore::from_path(&path);
    let mut registry = ServiceRegistry::new();
    registry
        .add("math", McpConnection::stdio("python", ["math_server.py"]))
        .unwrap();
    store.publish(&registry).unwrap();

    let state = store.load().unwrap();
    assert_eq!(state.mcp_config, Some(registry));
    assert!(state.extra.contains_key("messages"));
}

#[test]
fn load_rejects_invalid_entries() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    std::fs::write(
        &path,
        r#"{"mcp_config": {"feed": {"url": "not-a-url", "transport": "sse"}}}"#,
    )
    .unwrap();

    let store = AgentStateStore::from_path(&path);
    assert!(store.load().is_err());
}

#[test]
fn load_rejects_malformed_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = AgentStateStore::from_path(&path);
    assert!(store.load().is_err());
}
