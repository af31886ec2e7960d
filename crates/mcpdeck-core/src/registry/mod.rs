//! Service registry: the single source of truth for configured connections.
//!
//! Maps a unique, non-empty service name to one [`McpConnection`]. Every
//! mutating operation validates first and only then touches the map, so a
//! rejected call leaves the registry exactly as it was.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ValidationError;
use crate::mcp::{McpConnection, TransportKind};

/// Maximum length of a service name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Check a service name against the naming rules. Surrounding whitespace
/// is not part of the name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Name → descriptor mapping, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRegistry {
    services: BTreeMap<String, McpConnection>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three demo services shown by the dashboard on first launch.
    pub fn sample() -> Self {
        let mut services = BTreeMap::new();
        services.insert(
            "api-service".to_string(),
            McpConnection::stdio("node", ["api.js"]),
        );
        services.insert(
            "data-processor".to_string(),
            McpConnection::sse("https://data-processor.example.com/events"),
        );
        services.insert(
            "auth-service".to_string(),
            McpConnection::stdio("python", ["-m", "auth_service"]),
        );
        Self { services }
    }

    /// The configuration an agent falls back to when the host supplies none.
    pub fn agent_default() -> Self {
        let mut services = BTreeMap::new();
        services.insert(
            "math".to_string(),
            McpConnection::stdio("python", ["math_server.py"]),
        );
        Self { services }
    }

    /// Insert a new entry under the trimmed `name`.
    ///
    /// Fails if the name is invalid or already present, or if the
    /// descriptor is invalid.
    pub fn add(&mut self, name: &str, connection: McpConnection) -> Result<(), ValidationError> {
        let name = name.trim();
        validate_name(name)?;
        if self.services.contains_key(name) {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }
        connection.validate()?;

        info!(service = name, transport = %connection.transport(), "service added");
        self.services.insert(name.to_string(), connection);
        Ok(())
    }

    /// Replace an existing entry, optionally under a new name.
    ///
    /// A rename removes `old_name` and inserts `new_name`; it fails if
    /// `new_name` already belongs to a different entry.
    pub fn update(
        &mut self,
        old_name: &str,
        new_name: &str,
        connection: McpConnection,
    ) -> Result<(), ValidationError> {
        if !self.services.contains_key(old_name) {
            return Err(ValidationError::UnknownService(old_name.to_string()));
        }
        let new_name = new_name.trim();
        validate_name(new_name)?;
        if old_name != new_name && self.services.contains_key(new_name) {
            return Err(ValidationError::DuplicateName(new_name.to_string()));
        }
        connection.validate()?;

        if old_name != new_name {
            self.services.remove(old_name);
            info!(from = old_name, to = new_name, "service renamed");
        } else {
            info!(service = new_name, "service updated");
        }
        self.services.insert(new_name.to_string(), connection);
        Ok(())
    }

    /// Remove an entry. Absent names are a no-op.
    pub fn remove(&mut self, name: &str) -> Option<McpConnection> {
        let removed = self.services.remove(name);
        if removed.is_some() {
            info!(service = name, "service removed");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<&McpConnection> {
        self.services.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &McpConnection)> {
        self.services.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Number of entries using the given transport.
    pub fn count_by_transport(&self, kind: TransportKind) -> usize {
        self.services
            .values()
            .filter(|conn| conn.transport() == kind)
            .count()
    }

    /// Validate every entry, e.g. after loading from an external source.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, connection) in &self.services {
            validate_name(name).map_err(|e| anyhow::anyhow!("Invalid service '{}': {}", name, e))?;
            connection
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid service '{}': {}", name, e))?;
        }
        Ok(())
    }
}

impl FromIterator<(String, McpConnection)> for ServiceRegistry {
    fn from_iter<T: IntoIterator<Item = (String, McpConnection)>>(iter: T) -> Self {
        Self {
            services: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ServiceRegistry {
    type Item = (&'a String, &'a McpConnection);
    type IntoIter = std::collections::btree_map::Iter<'a, String, McpConnection>;

    fn into_iter(self) -> Self::IntoIter {
        self.services.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_rules() {
        assert_eq!(validate_name(""), Err(ValidationError::EmptyName));
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
        assert!(validate_name(&"a".repeat(50)).is_ok());
        assert_eq!(
            validate_name(&"a".repeat(51)),
            Err(ValidationError::NameTooLong { len: 51, max: 50 })
        );
    }

    #[test]
    fn test_name_length_counts_chars() {
        // 50 multi-byte characters are still within the limit
        assert!(validate_name(&"é".repeat(50)).is_ok());
    }

    #[test]
    fn test_sample_contents() {
        let registry = ServiceRegistry::sample();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.count_by_transport(TransportKind::Stdio), 2);
        assert_eq!(registry.count_by_transport(TransportKind::Sse), 1);
    }

    #[test]
    fn test_names_are_ordered() {
        let registry = ServiceRegistry::sample();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["api-service", "auth-service", "data-processor"]);
    }

    #[test]
    fn test_update_same_name_replaces_descriptor() {
        let mut registry = ServiceRegistry::sample();
        registry
            .update(
                "api-service",
                "api-service",
                McpConnection::sse("http://localhost:9000/sse"),
            )
            .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.get("api-service").unwrap().transport(),
            TransportKind::Sse
        );
    }

    #[test]
    fn test_update_unknown_service() {
        let mut registry = ServiceRegistry::new();
        let err = registry
            .update("ghost", "ghost", McpConnection::stdio("node", ["a.js"]))
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownService("ghost".to_string()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_entry() {
        let registry: ServiceRegistry = [("bad".to_string(), McpConnection::sse("nope"))]
            .into_iter()
            .collect();
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let registry = ServiceRegistry::agent_default();
        let value = serde_json::to_value(&registry).unwrap();
        assert_eq!(value["math"]["command"], "python");
        assert_eq!(value["math"]["transport"], "stdio");
    }
}
