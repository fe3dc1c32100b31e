//! Policy registry
//!
//! Holds published policies by (id, version). Every artifact is validated on
//! the way in, so anything handed out by the registry has already passed its
//! integrity and governance checks once; [`crate::execute`] checks again.

use crate::{EvidencePolicy, PolicyError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Published policies keyed by id and version
#[derive(Debug, Default, Clone)]
pub struct PolicyRegistry {
    policies: BTreeMap<(String, String), Arc<EvidencePolicy>>,
}

impl PolicyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.toml` and `*.json` artifact in `dir`
    ///
    /// Files are visited in name order. The first artifact that fails to
    /// parse or validate aborts the load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_artifact = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("toml") | Some("json")
            );
            if path.is_file() && is_artifact {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = Self::new();
        for path in &paths {
            registry.load_file(path)?;
        }

        info!(
            dir = %dir.display(),
            policies = registry.len(),
            "Loaded policy registry"
        );
        Ok(registry)
    }

    /// Load and register a single artifact, returning it
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<EvidencePolicy>, PolicyError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let policy = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => EvidencePolicy::from_json(&contents)?,
            _ => EvidencePolicy::from_toml(&contents)?,
        };
        debug!(path = %path.display(), policy_id = policy.policy_id(), "Read policy artifact");
        self.insert(policy)
    }

    /// Validate and register a policy
    ///
    /// Published versions are immutable: registering a second artifact under
    /// an existing (id, version) fails, even if the content is identical.
    pub fn insert(&mut self, policy: EvidencePolicy) -> Result<Arc<EvidencePolicy>, PolicyError> {
        policy.validate()?;

        let key = (policy.policy_id().to_string(), policy.version().to_string());
        if self.policies.contains_key(&key) {
            return Err(PolicyError::DuplicatePolicy {
                policy_id: key.0,
                version: key.1,
            });
        }

        info!(
            policy_id = policy.policy_id(),
            version = policy.version(),
            hash = policy.content_hash(),
            "Registered policy"
        );
        let policy = Arc::new(policy);
        self.policies.insert(key, Arc::clone(&policy));
        Ok(policy)
    }

    /// Exact lookup by id and version
    pub fn get(&self, policy_id: &str, version: &str) -> Result<Arc<EvidencePolicy>, PolicyError> {
        self.policies
            .get(&(policy_id.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| PolicyError::NotFound {
                policy_id: policy_id.to_string(),
                version: version.to_string(),
            })
    }

    /// Highest semantic version registered under `policy_id`
    pub fn latest(&self, policy_id: &str) -> Result<Arc<EvidencePolicy>, PolicyError> {
        self.policies
            .values()
            .filter(|p| p.policy_id() == policy_id)
            .filter_map(|p| p.semver().ok().map(|v| (v, p)))
            .max_by_key(|(v, _)| *v)
            .map(|(_, p)| Arc::clone(p))
            .ok_or_else(|| PolicyError::NotFound {
                policy_id: policy_id.to_string(),
                version: "latest".to_string(),
            })
    }

    /// All registered (id, version) pairs, sorted
    pub fn versions(&self) -> Vec<(String, String)> {
        self.policies.keys().cloned().collect()
    }

    /// Number of registered policies
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether no policy is registered
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::fixtures::{draft, policy};

    #[test]
    fn test_insert_and_get() {
        let mut registry = PolicyRegistry::new();
        registry.insert(policy()).unwrap();

        let found = registry.get("nutrition-evidence", "1.0.0").unwrap();
        assert_eq!(found.version(), "1.0.0");
        assert!(matches!(
            registry.get("nutrition-evidence", "2.0.0"),
            Err(PolicyError::NotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_version_rejected() {
        let mut registry = PolicyRegistry::new();
        registry.insert(policy()).unwrap();

        let mut changed = draft();
        changed.baseline_score = 0.2;
        let result = registry.insert(changed.seal().unwrap());
        assert!(matches!(result, Err(PolicyError::DuplicatePolicy { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_latest_compares_semver_numerically() {
        let mut registry = PolicyRegistry::new();
        for version in ["1.2.0", "1.10.0", "1.9.3"] {
            let mut d = draft();
            d.version = version.to_string();
            registry.insert(d.seal().unwrap()).unwrap();
        }

        assert_eq!(registry.latest("nutrition-evidence").unwrap().version(), "1.10.0");
        assert!(registry.latest("other").is_err());
    }

    #[test]
    fn test_tampered_policy_never_registers() {
        let json = serde_json::to_string(&policy()).unwrap();
        let tampered = EvidencePolicy::from_json(&json.replace("\"max_penalty\":0.3", "\"max_penalty\":0.0")).unwrap();

        let mut registry = PolicyRegistry::new();
        assert!(matches!(registry.insert(tampered), Err(PolicyError::HashMismatch { .. })));
        assert!(registry.is_empty());
    }
}
