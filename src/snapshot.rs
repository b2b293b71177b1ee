//! Process-wide configuration snapshot.
//!
//! Resolution reads the snapshot through one `Arc` taken at the start of a
//! call, so a `replace` that lands mid-flight only affects later calls.
use std::path::Path;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::error::Error;
use crate::types::{Organization, Section};

/// One immutable view of every organization the platform knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    /// Organizations in display order.
    #[serde(default)]
    pub organizations: Vec<Organization>,
}

impl Snapshot {
    /// Wrap a list of organizations.
    pub const fn new(organizations: Vec<Organization>) -> Self {
        Self { organizations }
    }

    /// Parse the platform's JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the document does not match the configuration shape.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Organization with this exact name.
    pub fn organization_by_name(&self, name: &str) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.name == name)
    }

    /// Organization with this id.
    pub fn organization_by_id(&self, id: &str) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == id)
    }

    /// Section with this id, searched across every organization.
    pub fn section_by_id(&self, id: &str) -> Option<(&Organization, &Section)> {
        self.organizations
            .iter()
            .find_map(|o| o.sections.iter().find(|s| s.id == id).map(|s| (o, s)))
    }
}

/// Holder for the current snapshot with an explicit load/replace lifecycle.
#[derive(Debug, Default)]
pub struct ConfigStore {
    /// Snapshot handed to new readers.
    current: RwLock<Arc<Snapshot>>,
}

impl ConfigStore {
    /// A store that starts with the given snapshot.
    pub fn new(snapshot: Snapshot) -> Self {
        Self { current: RwLock::new(Arc::new(snapshot)) }
    }

    /// Read a JSON snapshot file and make it current.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if the file is missing, `Error::Io` on
    /// other read failures, or `Error::Json` if the document is malformed.
    pub fn load(&self, path: &Path) -> Result<(), Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
        };
        let snapshot = Snapshot::from_json(&content)?;
        tracing::debug!(path = %path.display(), organizations = snapshot.organizations.len(), "loaded snapshot");
        self.replace(snapshot);
        Ok(())
    }

    /// Swap in a new snapshot. Calls already in flight keep the one they took.
    pub fn replace(&self, snapshot: Snapshot) {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Arc::new(snapshot);
    }

    /// The snapshot current at this instant.
    pub fn current(&self) -> Arc<Snapshot> {
        let slot = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&slot)
    }

    /// The process-wide store, empty until someone loads or replaces it.
    pub fn global() -> &'static Self {
        /// Backing cell for the process-wide store.
        static GLOBAL: OnceLock<ConfigStore> = OnceLock::new();
        GLOBAL.get_or_init(Self::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATFORM: &str = r#"{
        "organizations": [
            {"id": "o1", "name": "Acme", "sections": [{"id": "s1", "name": "Incidents", "url": "https://api/incidents"}]},
            {"id": "o2", "name": "Globex", "isEcosystem": true}
        ]
    }"#;

    #[test]
    fn lookups_by_name_and_id() {
        let snapshot = Snapshot::from_json(PLATFORM).unwrap();
        assert_eq!(snapshot.organization_by_name("Acme").map(|o| o.id.as_str()), Some("o1"));
        assert!(snapshot.organization_by_name("acme").is_none());
        assert!(snapshot.organization_by_id("o2").is_some_and(|o| o.is_ecosystem));

        let (org, section) = snapshot.section_by_id("s1").unwrap();
        assert_eq!(org.name, "Acme");
        assert_eq!(section.url, "https://api/incidents");
    }

    #[test]
    fn replace_does_not_disturb_held_snapshots() {
        let store = ConfigStore::new(Snapshot::from_json(PLATFORM).unwrap());
        let held = store.current();

        store.replace(Snapshot::default());

        assert_eq!(held.organizations.len(), 2);
        assert!(store.current().organizations.is_empty());
    }

    #[test]
    fn load_reads_file_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platform.json");
        let store = ConfigStore::default();

        assert!(matches!(store.load(&path), Err(Error::ConfigNotFound { .. })));

        std::fs::write(&path, PLATFORM).unwrap();
        store.load(&path).unwrap();
        assert_eq!(store.current().organizations.len(), 2);
    }
}
